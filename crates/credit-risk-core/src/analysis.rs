//! Company-level pipeline: statement line items and price history in,
//! Z-Score, Merton PD and a credit verdict out.
//!
//! Missing line items stay missing. A model whose inputs are incomplete is
//! skipped with a warning; nothing is filled in with placeholder figures.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::altman::ratios::FinancialSnapshot;
use crate::altman::zscore::compute_zscore;
use crate::config::AnalysisConfig;
use crate::evaluation::evaluator::{evaluate, RiskVerdict};
use crate::structural::merton::{compute_merton, MertonInputs, MertonResult};
use crate::volatility::{estimate_with, VolatilityEstimate};
use crate::{types::*, CreditRiskError, CreditRiskResult};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Line items resolved by the data-retrieval layer for one reporting period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyFinancials {
    pub working_capital: Option<Money>,
    pub current_assets: Option<Money>,
    pub current_liabilities: Option<Money>,
    pub retained_earnings: Option<Money>,
    pub ebit: Option<Money>,
    pub total_assets: Option<Money>,
    pub total_liabilities: Option<Money>,
    pub revenue: Option<Money>,
    pub market_cap: Option<Money>,
}

impl CompanyFinancials {
    /// Reported working capital, else current assets minus current
    /// liabilities when both are known. `Ok(None)` means not available.
    pub fn resolved_working_capital(&self) -> CreditRiskResult<Option<Money>> {
        if self.working_capital.is_some() {
            return Ok(self.working_capital);
        }
        match (self.current_assets, self.current_liabilities) {
            (Some(ca), Some(cl)) => ca
                .checked_sub(cl)
                .map(Some)
                .ok_or_else(|| CreditRiskError::InvalidInput {
                    field: "working_capital".into(),
                    reason: "current_assets - current_liabilities overflows decimal range".into(),
                }),
            _ => Ok(None),
        }
    }

    /// Names of the Z-Score inputs that are absent.
    pub fn missing_zscore_items(&self) -> Vec<&'static str> {
        let items: [(&'static str, bool); 7] = [
            ("working_capital", !matches!(self.resolved_working_capital(), Ok(None))),
            ("retained_earnings", self.retained_earnings.is_some()),
            ("ebit", self.ebit.is_some()),
            ("total_assets", self.total_assets.is_some()),
            ("market_cap", self.market_cap.is_some()),
            ("total_liabilities", self.total_liabilities.is_some()),
            ("revenue", self.revenue.is_some()),
        ];
        items
            .iter()
            .filter(|(_, present)| !present)
            .map(|(name, _)| *name)
            .collect()
    }

    /// Build the Altman snapshot, or report every missing item.
    pub fn to_snapshot(&self) -> CreditRiskResult<FinancialSnapshot> {
        match (
            self.resolved_working_capital()?,
            self.retained_earnings,
            self.ebit,
            self.total_assets,
            self.market_cap,
            self.total_liabilities,
            self.revenue,
        ) {
            (Some(wc), Some(re), Some(ebit), Some(ta), Some(mc), Some(tl), Some(sales)) => {
                Ok(FinancialSnapshot {
                    working_capital: wc,
                    retained_earnings: re,
                    ebit,
                    total_assets: ta,
                    market_value_equity: mc,
                    total_liabilities: tl,
                    sales,
                })
            }
            _ => Err(CreditRiskError::MissingInput {
                field: self.missing_zscore_items().join(", "),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyInput {
    pub ticker: String,
    #[serde(default)]
    pub financials: CompanyFinancials,
    #[serde(default)]
    pub price_history: PriceHistory,
    #[serde(default)]
    pub config: AnalysisConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolatilitySource {
    Override,
    Historical,
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyRiskReport {
    pub ticker: String,
    pub z_score: Option<Decimal>,
    pub volatility: Rate,
    pub volatility_source: VolatilitySource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volatility_estimate: Option<VolatilityEstimate>,
    pub merton: Option<MertonResult>,
    pub default_probability: Option<Rate>,
    pub verdict: RiskVerdict,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run both models for one company and combine them into a verdict.
///
/// Only an invalid configuration is an error. Missing data produces an
/// absent model output and a warning.
pub fn analyze_company(
    input: &CompanyInput,
) -> CreditRiskResult<ComputationOutput<CompanyRiskReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let config = &input.config;
    config.validate()?;

    let z_score = zscore_for(&input.financials, &mut warnings);

    let (volatility, volatility_source, volatility_estimate) = match config.volatility_override {
        Some(sigma) => (sigma, VolatilitySource::Override, None),
        None => {
            let est = estimate_with(
                &input.price_history.closes(),
                config.trading_days_per_year,
                config.fallback_volatility,
            );
            if est.fallback_used {
                warnings.push(format!(
                    "Price history unusable ({} points); volatility fallback {} applied.",
                    input.price_history.len(),
                    config.fallback_volatility
                ));
                (est.annualized, VolatilitySource::Fallback, Some(est))
            } else {
                (est.annualized, VolatilitySource::Historical, Some(est))
            }
        }
    };

    let merton = merton_for(&input.financials, volatility, config, &mut warnings);
    let default_probability = merton.map(|m| m.default_probability);

    let verdict = evaluate(z_score, default_probability);

    tracing::info!(
        ticker = %input.ticker,
        decision = %verdict.decision,
        "company analysed"
    );

    let report = CompanyRiskReport {
        ticker: input.ticker.clone(),
        z_score,
        volatility,
        volatility_source,
        volatility_estimate,
        merton,
        default_probability,
        verdict,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "asset_value": "market_cap + total_liabilities",
        "debt_barrier": "total_liabilities",
        "risk_free_rate": config.risk_free_rate,
        "drift": "risk-neutral: d2 = (ln(V/D) + (r - sigma^2/2)T) / (sigma*sqrt(T)); \
                  set risk_free_rate to 0 for the zero-drift PD",
        "maturity_years": config.maturity_years,
        "volatility": "historical equity volatility used as asset volatility",
    });

    Ok(with_metadata_f64(
        "Altman Z-Score + Merton credit analysis",
        &assumptions,
        warnings,
        elapsed,
        report,
    ))
}

/// Analyse many companies in parallel. Output order matches input order.
#[cfg(feature = "batch")]
pub fn analyze_batch(
    inputs: &[CompanyInput],
) -> Vec<CreditRiskResult<ComputationOutput<CompanyRiskReport>>> {
    use rayon::prelude::*;

    inputs.par_iter().map(analyze_company).collect()
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn zscore_for(financials: &CompanyFinancials, warnings: &mut Vec<String>) -> Option<Decimal> {
    let snapshot = match financials.to_snapshot() {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "z-score skipped");
            warnings.push(format!("Z-Score not computed: {e}"));
            return None;
        }
    };
    match compute_zscore(&snapshot) {
        Ok(z) => Some(z.value()),
        Err(e) => {
            tracing::warn!(error = %e, "z-score undefined");
            warnings.push(format!("Z-Score undefined: {e}"));
            None
        }
    }
}

fn merton_for(
    financials: &CompanyFinancials,
    volatility: Rate,
    config: &AnalysisConfig,
    warnings: &mut Vec<String>,
) -> Option<MertonResult> {
    let (Some(market_cap), Some(total_liabilities)) =
        (financials.market_cap, financials.total_liabilities)
    else {
        let mut missing = Vec::new();
        if financials.market_cap.is_none() {
            missing.push("market_cap");
        }
        if financials.total_liabilities.is_none() {
            missing.push("total_liabilities");
        }
        warnings.push(format!("Merton model not computed: missing {}", missing.join(", ")));
        return None;
    };

    let (Some(mc), Some(tl)) = (market_cap.to_f64(), total_liabilities.to_f64()) else {
        warnings.push("Merton model not computed: figures out of f64 range".to_string());
        return None;
    };

    let inputs = MertonInputs::from_market_data(
        mc,
        tl,
        volatility,
        config.risk_free_rate,
        config.maturity_years,
    );
    match compute_merton(&inputs) {
        Ok(result) => Some(result),
        Err(e) => {
            tracing::warn!(error = %e, "merton model rejected inputs");
            warnings.push(format!("Merton model not computed: {e}"));
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::evaluator::CreditDecision;
    use rust_decimal_macros::dec;

    fn healthy_financials() -> CompanyFinancials {
        CompanyFinancials {
            working_capital: None,
            current_assets: Some(dec!(900_000)),
            current_liabilities: Some(dec!(400_000)),
            retained_earnings: Some(dec!(800_000)),
            ebit: Some(dec!(400_000)),
            total_assets: Some(dec!(2_000_000)),
            total_liabilities: Some(dec!(500_000)),
            revenue: Some(dec!(3_000_000)),
            market_cap: Some(dec!(4_000_000)),
        }
    }

    fn healthy_input() -> CompanyInput {
        CompanyInput {
            ticker: "HLTH".into(),
            financials: healthy_financials(),
            price_history: PriceHistory::from_closes(&[100.0, 101.0, 100.5, 101.5, 101.0, 102.0]),
            config: AnalysisConfig::default(),
        }
    }

    #[test]
    fn test_working_capital_derived() {
        let f = healthy_financials();
        assert_eq!(f.resolved_working_capital().unwrap(), Some(dec!(500_000)));
    }

    #[test]
    fn test_reported_working_capital_preferred() {
        let f = CompanyFinancials {
            working_capital: Some(dec!(123)),
            ..healthy_financials()
        };
        assert_eq!(f.resolved_working_capital().unwrap(), Some(dec!(123)));
    }

    #[test]
    fn test_zero_rate_gives_higher_pd() {
        let mut input = healthy_input();
        input.config.volatility_override = Some(0.6);
        let with_rate = analyze_company(&input).unwrap();
        assert_eq!(with_rate.assumptions["risk_free_rate"], 0.05);
        assert!(with_rate.assumptions["drift"]
            .as_str()
            .unwrap()
            .contains("risk_free_rate to 0"));

        input.config.risk_free_rate = 0.0;
        let zero_drift = analyze_company(&input).unwrap();
        assert!(
            zero_drift.result.default_probability.unwrap()
                > with_rate.result.default_probability.unwrap()
        );
    }

    #[test]
    fn test_working_capital_overflow_skips_zscore() {
        let huge = Decimal::from_i128_with_scale(7 * 10_i128.pow(28), 0);
        let input = CompanyInput {
            financials: CompanyFinancials {
                current_assets: Some(huge),
                current_liabilities: Some(-huge),
                ..healthy_financials()
            },
            ..healthy_input()
        };
        assert!(matches!(
            input.financials.resolved_working_capital(),
            Err(CreditRiskError::InvalidInput { .. })
        ));
        // Present but unusable, not missing.
        assert!(!input.financials.missing_zscore_items().contains(&"working_capital"));

        let out = analyze_company(&input).unwrap();
        assert_eq!(out.result.z_score, None);
        assert!(out
            .warnings
            .iter()
            .any(|w| w.starts_with("Z-Score not computed") && w.contains("overflows")));
        assert!(out.result.merton.is_some());
    }

    #[test]
    fn test_healthy_company_approved() {
        let out = analyze_company(&healthy_input()).unwrap();
        let report = &out.result;
        assert!(report.z_score.unwrap() >= dec!(3.0));
        assert!(report.default_probability.unwrap() < 0.05);
        assert_eq!(report.volatility_source, VolatilitySource::Historical);
        assert_eq!(report.verdict.decision, CreditDecision::Approved);
        assert!(out.warnings.is_empty(), "warnings: {:?}", out.warnings);
    }

    #[test]
    fn test_missing_items_listed() {
        let input = CompanyInput {
            financials: CompanyFinancials {
                retained_earnings: None,
                current_liabilities: None,
                ..healthy_financials()
            },
            ..healthy_input()
        };
        let out = analyze_company(&input).unwrap();
        assert_eq!(out.result.z_score, None);
        assert_eq!(out.result.verdict.decision, CreditDecision::InsufficientData);
        let warning = out
            .warnings
            .iter()
            .find(|w| w.starts_with("Z-Score not computed"))
            .unwrap();
        assert!(warning.contains("working_capital"));
        assert!(warning.contains("retained_earnings"));
        // Merton still runs.
        assert!(out.result.merton.is_some());
    }

    #[test]
    fn test_missing_market_cap_skips_both_models() {
        let input = CompanyInput {
            financials: CompanyFinancials {
                market_cap: None,
                ..healthy_financials()
            },
            ..healthy_input()
        };
        let out = analyze_company(&input).unwrap();
        assert!(out.result.z_score.is_none());
        assert!(out.result.merton.is_none());
        assert!(out.warnings.iter().any(|w| w.contains("missing market_cap")));
    }

    #[test]
    fn test_zero_total_assets_warns() {
        let input = CompanyInput {
            financials: CompanyFinancials {
                total_assets: Some(Decimal::ZERO),
                ..healthy_financials()
            },
            ..healthy_input()
        };
        let out = analyze_company(&input).unwrap();
        assert!(out.result.z_score.is_none());
        assert!(out.warnings.iter().any(|w| w.starts_with("Z-Score undefined")));
    }

    #[test]
    fn test_volatility_fallback_reported() {
        let input = CompanyInput {
            price_history: PriceHistory::default(),
            ..healthy_input()
        };
        let out = analyze_company(&input).unwrap();
        assert_eq!(out.result.volatility, 0.3);
        assert_eq!(out.result.volatility_source, VolatilitySource::Fallback);
        assert!(out.warnings.iter().any(|w| w.contains("fallback")));
    }

    #[test]
    fn test_volatility_override() {
        let input = CompanyInput {
            config: AnalysisConfig {
                volatility_override: Some(0.45),
                ..AnalysisConfig::default()
            },
            ..healthy_input()
        };
        let out = analyze_company(&input).unwrap();
        assert_eq!(out.result.volatility, 0.45);
        assert_eq!(out.result.volatility_source, VolatilitySource::Override);
        assert!(out.result.volatility_estimate.is_none());
    }

    #[test]
    fn test_zero_liabilities_rejected_by_merton() {
        let input = CompanyInput {
            financials: CompanyFinancials {
                total_liabilities: Some(Decimal::ZERO),
                ..healthy_financials()
            },
            ..healthy_input()
        };
        let out = analyze_company(&input).unwrap();
        assert!(out.result.merton.is_none());
        assert!(out.result.z_score.is_none());
        assert_eq!(out.result.verdict.decision, CreditDecision::InsufficientData);
    }

    #[test]
    fn test_invalid_config_is_error() {
        let input = CompanyInput {
            config: AnalysisConfig {
                maturity_years: -1.0,
                ..AnalysisConfig::default()
            },
            ..healthy_input()
        };
        assert!(analyze_company(&input).is_err());
    }

    #[test]
    fn test_input_from_json() {
        let json = r#"{
            "ticker": "ACME",
            "financials": { "total_assets": "1000", "market_cap": "500" },
            "price_history": { "points": [ { "close": 10.0 }, { "close": 10.5 } ] }
        }"#;
        let input: CompanyInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.financials.total_assets, Some(dec!(1000)));
        assert_eq!(input.financials.ebit, None);
        assert_eq!(input.price_history.len(), 2);
        assert_eq!(input.config, AnalysisConfig::default());
    }
}
