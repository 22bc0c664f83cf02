use thiserror::Error;

#[derive(Debug, Error)]
pub enum CreditRiskError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Missing input: {field} could not be resolved from the data source")]
    MissingInput { field: String },
}

impl CreditRiskError {
    /// True when the error means "could not compute" rather than bad usage.
    pub fn is_undefined_result(&self) -> bool {
        matches!(self, CreditRiskError::DivisionByZero { .. })
    }
}
