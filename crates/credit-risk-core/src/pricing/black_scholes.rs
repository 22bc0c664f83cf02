use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::normal::norm_cdf;
use crate::error::CreditRiskError;
use crate::types::*;
use crate::CreditRiskResult;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// European call on a non-dividend-paying underlying.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlackScholesInput {
    pub spot: f64,
    pub strike: f64,
    pub time_to_expiry: Years,
    pub risk_free_rate: Rate,
    pub volatility: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlackScholesOutput {
    pub call_price: f64,
    pub d1: f64,
    pub d2: f64,
    pub discount_factor: f64,
    pub intrinsic_value: f64,
    pub time_value: f64,
}

/// Intermediate quantities shared by the call price and the Merton model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BsParams {
    pub d1: f64,
    pub d2: f64,
    pub sigma_sqrt_t: f64,
    pub discount_factor: f64,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn require_positive(value: f64, field: &str) -> CreditRiskResult<()> {
    if !value.is_finite() {
        return Err(CreditRiskError::InvalidInput {
            field: field.into(),
            reason: "must be finite".into(),
        });
    }
    if value <= 0.0 {
        return Err(CreditRiskError::InvalidInput {
            field: field.into(),
            reason: "must be positive".into(),
        });
    }
    Ok(())
}

fn validate_input(input: &BlackScholesInput) -> CreditRiskResult<()> {
    require_positive(input.spot, "spot")?;
    require_positive(input.strike, "strike")?;
    require_positive(input.time_to_expiry, "time_to_expiry")?;
    require_positive(input.volatility, "volatility")?;
    if !input.risk_free_rate.is_finite() {
        return Err(CreditRiskError::InvalidInput {
            field: "risk_free_rate".into(),
            reason: "must be finite".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Core
// ---------------------------------------------------------------------------

/// d1 = (ln(S/K) + (r + sigma^2/2) T) / (sigma sqrt(T)), d2 = d1 - sigma sqrt(T)
pub fn compute_bs_params(input: &BlackScholesInput) -> CreditRiskResult<BsParams> {
    validate_input(input)?;

    let sigma = input.volatility;
    let t = input.time_to_expiry;
    let sigma_sqrt_t = sigma * t.sqrt();
    if sigma_sqrt_t <= 0.0 || !sigma_sqrt_t.is_finite() {
        return Err(CreditRiskError::InvalidInput {
            field: "volatility".into(),
            reason: "sigma * sqrt(T) must be positive".into(),
        });
    }

    let d1 = ((input.spot / input.strike).ln() + (input.risk_free_rate + 0.5 * sigma * sigma) * t)
        / sigma_sqrt_t;
    let d2 = d1 - sigma_sqrt_t;
    let discount_factor = (-input.risk_free_rate * t).exp();

    if !d1.is_finite() || !discount_factor.is_finite() {
        return Err(CreditRiskError::InvalidInput {
            field: "spot/strike".into(),
            reason: "inputs produce a non-finite d1 or discount factor".into(),
        });
    }

    Ok(BsParams {
        d1,
        d2,
        sigma_sqrt_t,
        discount_factor,
    })
}

/// Returns `(d1, d2)`.
pub fn d1_d2(input: &BlackScholesInput) -> CreditRiskResult<(f64, f64)> {
    let params = compute_bs_params(input)?;
    Ok((params.d1, params.d2))
}

/// C = S N(d1) - K e^{-rT} N(d2), evaluated from precomputed params.
pub fn call_from_params(spot: f64, strike: f64, params: &BsParams) -> f64 {
    spot * norm_cdf(params.d1) - strike * params.discount_factor * norm_cdf(params.d2)
}

/// European call price.
pub fn call_price(input: &BlackScholesInput) -> CreditRiskResult<f64> {
    let params = compute_bs_params(input)?;
    Ok(call_from_params(input.spot, input.strike, &params))
}

/// European call price with d1/d2 and value decomposition.
pub fn price_call(
    input: &BlackScholesInput,
) -> CreditRiskResult<ComputationOutput<BlackScholesOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let params = compute_bs_params(input)?;
    let call_price = call_from_params(input.spot, input.strike, &params);
    let intrinsic_value = (input.spot - input.strike).max(0.0);

    if input.volatility > 5.0 {
        warnings.push("volatility exceeds 500%, likely an input error.".to_string());
    }
    if input.risk_free_rate < 0.0 {
        warnings.push("negative risk-free rate".to_string());
    }

    let output = BlackScholesOutput {
        call_price,
        d1: params.d1,
        d2: params.d2,
        discount_factor: params.discount_factor,
        intrinsic_value,
        time_value: call_price - intrinsic_value,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "model": "Black-Scholes, European call, no dividends",
        "d1": "(ln(S/K) + (r + sigma^2/2)T) / (sigma*sqrt(T))",
        "d2": "d1 - sigma*sqrt(T)",
        "normal_cdf": "erfc-based closed form",
    });

    Ok(with_metadata_f64(
        "Black-Scholes European Call",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
