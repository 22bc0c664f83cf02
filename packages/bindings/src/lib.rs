use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Altman Z-Score
// ---------------------------------------------------------------------------

#[napi]
pub fn altman_z_score(input_json: String) -> NapiResult<String> {
    let input: credit_risk_core::altman::ratios::FinancialSnapshot =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = credit_risk_core::altman::zscore::calculate_altman_zscore(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Structural
// ---------------------------------------------------------------------------

#[napi]
pub fn black_scholes_call(input_json: String) -> NapiResult<String> {
    let input: credit_risk_core::pricing::black_scholes::BlackScholesInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        credit_risk_core::pricing::black_scholes::price_call(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn merton_model(input_json: String) -> NapiResult<String> {
    let input: credit_risk_core::structural::merton::MertonInputs =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        credit_risk_core::structural::merton::calculate_merton(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct VolatilityRequest {
    prices: Vec<f64>,
}

#[napi]
pub fn estimate_volatility(input_json: String) -> NapiResult<String> {
    let input: VolatilityRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = credit_risk_core::volatility::estimate_volatility_detailed(&input.prices);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct EvaluateRequest {
    #[serde(default)]
    z_score: Option<Decimal>,
    #[serde(default)]
    default_probability: Option<f64>,
}

#[napi]
pub fn evaluate_risk(input_json: String) -> NapiResult<String> {
    let input: EvaluateRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let verdict =
        credit_risk_core::evaluation::evaluator::evaluate(input.z_score, input.default_probability);
    serde_json::to_string(&verdict).map_err(to_napi_error)
}

#[napi]
pub fn analyze_company(input_json: String) -> NapiResult<String> {
    let input: credit_risk_core::analysis::CompanyInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = credit_risk_core::analysis::analyze_company(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
