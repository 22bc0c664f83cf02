use serde_json::Value;
use std::io;

use super::{flatten_fields, format_value};

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            if let Some(Value::Array(results)) = map.get("results") {
                // Batch analysis: one row per company
                write_array_csv(&mut wtr, results);
            } else {
                let body = map.get("result").unwrap_or(value);
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in flatten_fields("", body) {
                    let _ = wtr.write_record([key.as_str(), &csv_cell(&val)]);
                }
            }
        }
        Value::Array(arr) => {
            write_array_csv(&mut wtr, arr);
        }
        _ => {
            let _ = wtr.write_record([&csv_cell(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([&csv_cell(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(csv_cell).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}

/// Nulls stay empty in CSV so spreadsheets treat them as missing.
fn csv_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => format_value(other),
    }
}
