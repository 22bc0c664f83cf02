use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Balance-sheet and income-statement amounts. Decimal keeps ratio
/// boundaries exact.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = f64;

/// Year fractions
pub type Years = f64;

/// A single daily close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub close: f64,
}

/// Time-ascending series of daily closing prices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub points: Vec<PricePoint>,
}

impl PriceHistory {
    pub fn from_closes(closes: &[f64]) -> Self {
        Self {
            points: closes
                .iter()
                .map(|&close| PricePoint { date: None, close })
                .collect(),
        }
    }

    /// Closing prices in time order. Dated points are sorted by date first;
    /// undated points keep their given order.
    pub fn closes(&self) -> Vec<f64> {
        let mut points: Vec<&PricePoint> = self.points.iter().collect();
        if points.iter().all(|p| p.date.is_some()) {
            points.sort_by_key(|p| p.date);
        }
        points.iter().map(|p| p.close).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Wrap a Decimal-based computation result with metadata.
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    build_output(
        methodology,
        assumptions,
        warnings,
        elapsed_us,
        result,
        "rust_decimal_128bit",
    )
}

/// Wrap an f64-based computation result with metadata.
pub fn with_metadata_f64<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    build_output(
        methodology,
        assumptions,
        warnings,
        elapsed_us,
        result,
        "ieee754_f64",
    )
}

fn build_output<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
    precision: &str,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: precision.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closes_sorted_by_date() {
        let history = PriceHistory {
            points: vec![
                PricePoint {
                    date: NaiveDate::from_ymd_opt(2024, 1, 3),
                    close: 12.0,
                },
                PricePoint {
                    date: NaiveDate::from_ymd_opt(2024, 1, 2),
                    close: 11.0,
                },
            ],
        };
        assert_eq!(history.closes(), vec![11.0, 12.0]);
    }

    #[test]
    fn test_undated_keep_order() {
        let history = PriceHistory::from_closes(&[3.0, 1.0, 2.0]);
        assert_eq!(history.closes(), vec![3.0, 1.0, 2.0]);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_metadata_precision() {
        let out = with_metadata_f64("m", &serde_json::json!({}), vec![], 0, 1.0);
        assert_eq!(out.metadata.precision, "ieee754_f64");
        let out = with_metadata("m", &serde_json::json!({}), vec![], 0, 1.0);
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }
}
