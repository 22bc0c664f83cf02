//! Merton structural model for credit risk.
//!
//! Equity is a European call on firm assets struck at the face value of
//! debt. The closed form is the shared Black-Scholes primitive with
//! `S = V` (asset value) and `K = D` (debt).
//!
//! - equity value  E  = V N(d1) - D e^{-rT} N(d2)
//! - default prob. PD = N(-d2)   (risk-neutral P[V_T < D])

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CreditRiskError;
use crate::evaluation::evaluator::{evaluate_default_probability, DefaultRiskTier};
use crate::pricing::black_scholes::{call_from_params, compute_bs_params, BlackScholesInput};
use crate::pricing::normal::norm_cdf;
use crate::types::*;
use crate::CreditRiskResult;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

/// Input for the Merton structural model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MertonInputs {
    /// Firm asset value (V).
    pub asset_value: f64,
    /// Face value of debt, the default barrier (D).
    pub debt: f64,
    /// Annualized asset volatility (decimal, e.g. 0.20 = 20%).
    pub volatility: Rate,
    /// Risk-free rate (annualized, decimal).
    pub risk_free_rate: Rate,
    /// Time to maturity in years.
    pub time_to_maturity: Years,
}

impl MertonInputs {
    /// Firm-level parameterisation from market data: V = market cap +
    /// total liabilities, D = total liabilities.
    pub fn from_market_data(
        market_cap: f64,
        total_liabilities: f64,
        volatility: Rate,
        risk_free_rate: Rate,
        time_to_maturity: Years,
    ) -> Self {
        Self {
            asset_value: market_cap + total_liabilities,
            debt: total_liabilities,
            volatility,
            risk_free_rate,
            time_to_maturity,
        }
    }

    fn as_option(&self) -> BlackScholesInput {
        BlackScholesInput {
            spot: self.asset_value,
            strike: self.debt,
            time_to_expiry: self.time_to_maturity,
            risk_free_rate: self.risk_free_rate,
            volatility: self.volatility,
        }
    }
}

/// Output of the Merton structural model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MertonResult {
    /// Equity as a call on assets. Never negative.
    pub equity_value: f64,
    /// Risk-neutral default probability, in [0, 1].
    pub default_probability: Rate,
    pub d1: f64,
    pub d2: f64,
    /// Standard deviations between expected log-assets and the barrier (= d2).
    pub distance_to_default: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MertonOutput {
    #[serde(flatten)]
    pub merton: MertonResult,
    pub default_tier: DefaultRiskTier,
    pub leverage: f64,
    /// Market value of debt implied by V - E.
    pub debt_value: f64,
    /// Yield spread of risky debt over the risk-free rate.
    pub credit_spread: Option<Rate>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Equity value and default probability under the Merton model.
///
/// Non-positive `asset_value`, `debt`, `volatility` or `time_to_maturity`
/// fail with [`CreditRiskError::InvalidInput`], field names in firm terms.
pub fn compute_merton(inputs: &MertonInputs) -> CreditRiskResult<MertonResult> {
    let params = compute_bs_params(&inputs.as_option()).map_err(rename_field)?;

    let equity_value = call_from_params(inputs.asset_value, inputs.debt, &params).max(0.0);
    let default_probability = norm_cdf(-params.d2).clamp(0.0, 1.0);

    tracing::debug!(
        equity_value,
        default_probability,
        d2 = params.d2,
        "merton model solved"
    );

    Ok(MertonResult {
        equity_value,
        default_probability,
        d1: params.d1,
        d2: params.d2,
        distance_to_default: params.d2,
    })
}

/// Merton model with leverage, implied debt value and credit spread.
pub fn calculate_merton(
    inputs: &MertonInputs,
) -> CreditRiskResult<ComputationOutput<MertonOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let merton = compute_merton(inputs)?;

    let leverage = inputs.debt / inputs.asset_value;
    let debt_value = inputs.asset_value - merton.equity_value;

    // Risky debt yield: y = -ln(B / D) / T, spread = y - r.
    let credit_spread = if debt_value > 0.0 {
        let risky_yield = -(debt_value / inputs.debt).ln() / inputs.time_to_maturity;
        Some(risky_yield - inputs.risk_free_rate)
    } else {
        warnings.push("Implied debt value is not positive; credit spread undefined.".to_string());
        None
    };

    if leverage >= 1.0 {
        warnings.push(format!(
            "Debt ({:.0}) is at or above asset value ({:.0}); the firm is already at the barrier.",
            inputs.debt, inputs.asset_value
        ));
    }
    if inputs.volatility > 5.0 {
        warnings.push("volatility exceeds 500%, likely an input error.".to_string());
    }

    let output = MertonOutput {
        default_tier: evaluate_default_probability(merton.default_probability),
        merton,
        leverage,
        debt_value,
        credit_spread,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "equity": "E = V*N(d1) - D*exp(-rT)*N(d2)",
        "default_probability": "PD = N(-d2), risk-neutral",
        "barrier": "single debt maturity at T",
    });

    Ok(with_metadata_f64(
        "Merton Structural Model",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

fn rename_field(err: CreditRiskError) -> CreditRiskError {
    match err {
        CreditRiskError::InvalidInput { field, reason } => {
            let field = match field.as_str() {
                "spot" => "asset_value",
                "strike" => "debt",
                "time_to_expiry" => "time_to_maturity",
                "spot/strike" => "asset_value/debt",
                other => other,
            }
            .to_string();
            CreditRiskError::InvalidInput { field, reason }
        }
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn base_input() -> MertonInputs {
        MertonInputs {
            asset_value: 1_000_000.0,
            debt: 800_000.0,
            volatility: 0.20,
            risk_free_rate: 0.05,
            time_to_maturity: 1.0,
        }
    }

    fn base_with(edit: impl FnOnce(&mut MertonInputs)) -> MertonInputs {
        let mut input = base_input();
        edit(&mut input);
        input
    }

    #[test]
    fn test_reference_values() {
        // d1 = (ln 1.25 + 0.07) / 0.2 = 1.465718, d2 = 1.265718
        let out = compute_merton(&base_input()).unwrap();
        assert!((out.d1 - 1.4657177565710489).abs() < 1e-9);
        assert!((out.d2 - 1.265717756571049).abs() < 1e-9);
        assert!(
            (out.equity_value - 245_888.354).abs() < 5.0,
            "equity {}",
            out.equity_value
        );
        assert!(
            (out.default_probability - 0.102807).abs() < 1e-3,
            "pd {}",
            out.default_probability
        );
    }

    #[test]
    fn test_distance_to_default_is_d2() {
        let out = compute_merton(&base_input()).unwrap();
        assert_eq!(out.distance_to_default, out.d2);
        assert!(out.d1 > out.d2);
    }

    #[test]
    fn test_pd_increases_with_volatility() {
        let low = compute_merton(&base_with(|i| i.volatility = 0.1)).unwrap();
        let high = compute_merton(&base_with(|i| i.volatility = 0.5)).unwrap();
        assert!(high.default_probability > low.default_probability);
    }

    #[test]
    fn test_equity_non_negative_deep_distress() {
        let out = compute_merton(&MertonInputs {
            asset_value: 1.0,
            debt: 1e9,
            ..base_input()
        })
        .unwrap();
        assert!(out.equity_value >= 0.0);
        assert!(out.default_probability > 0.999);
    }

    #[test]
    fn test_invalid_inputs_use_firm_names() {
        let cases = [
            (base_with(|i| i.asset_value = 0.0), "asset_value"),
            (base_with(|i| i.debt = -5.0), "debt"),
            (base_with(|i| i.volatility = 0.0), "volatility"),
            (base_with(|i| i.time_to_maturity = 0.0), "time_to_maturity"),
        ];
        for (input, expected) in cases {
            match compute_merton(&input) {
                Err(CreditRiskError::InvalidInput { field, .. }) => assert_eq!(field, expected),
                other => panic!("Expected InvalidInput for {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_from_market_data() {
        let inputs = MertonInputs::from_market_data(600.0, 400.0, 0.3, 0.0, 1.0);
        assert_eq!(inputs.asset_value, 1000.0);
        assert_eq!(inputs.debt, 400.0);
        // With r = 0: d2 = (ln(V/D) - sigma^2/2 T) / (sigma sqrt T)
        let out = compute_merton(&inputs).unwrap();
        let expected_d2 = ((1000.0f64 / 400.0).ln() - 0.5 * 0.09) / 0.3;
        assert!((out.d2 - expected_d2).abs() < 1e-12);
    }

    #[test]
    fn test_calculate_merton_envelope() {
        let out = calculate_merton(&base_input()).unwrap();
        let r = &out.result;
        assert_eq!(r.default_tier, DefaultRiskTier::High);
        assert!((r.leverage - 0.8).abs() < 1e-12);
        assert!((r.debt_value + r.merton.equity_value - 1_000_000.0).abs() < 1e-6);
        assert!(r.credit_spread.unwrap() > 0.0);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_barrier_warning() {
        let out = calculate_merton(&MertonInputs {
            debt: 1_200_000.0,
            ..base_input()
        })
        .unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("barrier")));
    }
}
