use serde_json::Value;

use super::format_value;

/// Print just the key answer from the output.
///
/// A nested `verdict.decision` wins (company analysis); otherwise the first
/// present field from the priority list, then the first field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(decision) = result_obj.pointer("/verdict/decision") {
        println!("{}", format_value(decision));
        return;
    }

    let priority_keys = [
        "credit_decision",
        "z_score",
        "default_probability",
        "call_price",
        "annualized",
        "equity_value",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_value(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_value(val));
            return;
        }
    }

    println!("{}", format_value(result_obj));
}
