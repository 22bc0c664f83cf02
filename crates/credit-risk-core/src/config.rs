use serde::{Deserialize, Serialize};

use crate::types::{Rate, Years};
use crate::{CreditRiskError, CreditRiskResult};

/// Market assumptions for a company analysis. Every field has a default so
/// partial JSON configs deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub risk_free_rate: Rate,
    pub maturity_years: Years,
    /// Skip estimation and use this sigma.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volatility_override: Option<Rate>,
    pub trading_days_per_year: u32,
    pub fallback_volatility: Rate,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.05,
            maturity_years: 1.0,
            volatility_override: None,
            trading_days_per_year: 252,
            fallback_volatility: 0.3,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> CreditRiskResult<()> {
        if !self.risk_free_rate.is_finite() {
            return Err(invalid("risk_free_rate", "must be finite"));
        }
        if !(self.maturity_years.is_finite() && self.maturity_years > 0.0) {
            return Err(invalid("maturity_years", "must be positive"));
        }
        if let Some(v) = self.volatility_override {
            if !(v.is_finite() && v > 0.0) {
                return Err(invalid("volatility_override", "must be positive"));
            }
        }
        if self.trading_days_per_year == 0 {
            return Err(invalid("trading_days_per_year", "must be positive"));
        }
        if !(self.fallback_volatility.is_finite() && self.fallback_volatility > 0.0) {
            return Err(invalid("fallback_volatility", "must be positive"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> CreditRiskError {
    CreditRiskError::InvalidInput {
        field: field.into(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fallback_volatility, 0.3);
    }

    #[test]
    fn test_partial_json() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{ "maturity_years": 5.0 }"#).unwrap();
        assert_eq!(config.maturity_years, 5.0);
        assert_eq!(config.risk_free_rate, 0.05);
        assert_eq!(config.trading_days_per_year, 252);
    }

    #[test]
    fn test_rejects_zero_maturity() {
        let config = AnalysisConfig {
            maturity_years: 0.0,
            ..AnalysisConfig::default()
        };
        match config.validate() {
            Err(CreditRiskError::InvalidInput { field, .. }) => assert_eq!(field, "maturity_years"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_negative_override() {
        let config = AnalysisConfig {
            volatility_override: Some(-0.1),
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
