use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::ratios::{calculate_ratios, FinancialSnapshot, RatioSet};
use crate::evaluation::evaluator::{evaluate_zscore, ZScoreTier};
use crate::{types::*, CreditRiskError, CreditRiskResult};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Altman Z-Score for a public manufacturing company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZScore(Decimal);

impl ZScore {
    /// Weighted sum of the five ratios.
    ///
    /// Fails with [`CreditRiskError::InvalidInput`] when a weighted term or
    /// the sum leaves the Decimal range.
    pub fn from_ratios(ratios: &RatioSet) -> CreditRiskResult<Self> {
        let terms = weighted_terms(ratios)?;
        sum_terms(&terms).map(ZScore)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl From<ZScore> for Decimal {
    fn from(z: ZScore) -> Self {
        z.0
    }
}

impl std::fmt::Display for ZScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZScoreComponent {
    pub name: String,
    pub ratio: Decimal,
    pub coefficient: Decimal,
    pub weighted_value: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AltmanOutput {
    pub z_score: Decimal,
    pub tier: ZScoreTier,
    pub ratios: RatioSet,
    pub components: Vec<ZScoreComponent>,
    /// (high_risk_upper_bound, low_risk_lower_bound)
    pub tier_thresholds: (Decimal, Decimal),
}

// ---------------------------------------------------------------------------
// Coefficients
// ---------------------------------------------------------------------------

const Z_COEFF_X1: Decimal = dec!(1.2);
const Z_COEFF_X2: Decimal = dec!(1.4);
const Z_COEFF_X3: Decimal = dec!(3.3);
const Z_COEFF_X4: Decimal = dec!(0.6);
const Z_COEFF_X5: Decimal = dec!(1.0);

const COEFFICIENTS: [Decimal; 5] = [Z_COEFF_X1, Z_COEFF_X2, Z_COEFF_X3, Z_COEFF_X4, Z_COEFF_X5];

const COMPONENT_NAMES: [&str; 5] = [
    "X1: Working Capital / Total Assets",
    "X2: Retained Earnings / Total Assets",
    "X3: EBIT / Total Assets",
    "X4: Market Value of Equity / Total Liabilities",
    "X5: Sales / Total Assets",
];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the Altman Z-Score.
///
/// A zero `total_assets` or `total_liabilities` is reported as
/// [`crate::CreditRiskError::DivisionByZero`] so callers can tell "could not
/// compute" apart from a genuine score of zero.
pub fn compute_zscore(snapshot: &FinancialSnapshot) -> CreditRiskResult<ZScore> {
    let ratios = calculate_ratios(snapshot)?;
    let z = ZScore::from_ratios(&ratios)?;
    tracing::debug!(z_score = %z.value(), "altman z-score computed");
    Ok(z)
}

/// Compute the Altman Z-Score with its component breakdown and risk tier.
pub fn calculate_altman_zscore(
    snapshot: &FinancialSnapshot,
) -> CreditRiskResult<ComputationOutput<AltmanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let ratios = calculate_ratios(snapshot)?;
    let terms = weighted_terms(&ratios)?;
    let z = ZScore(sum_terms(&terms)?);

    let components: Vec<ZScoreComponent> = ratios
        .as_array()
        .iter()
        .zip(COEFFICIENTS.iter())
        .zip(COMPONENT_NAMES.iter())
        .zip(terms.iter())
        .map(|(((ratio, coefficient), name), weighted)| ZScoreComponent {
            name: name.to_string(),
            ratio: *ratio,
            coefficient: *coefficient,
            weighted_value: *weighted,
        })
        .collect();

    if snapshot.total_assets < Decimal::ZERO {
        warnings.push("total_assets is negative; ratios change sign.".to_string());
    }
    if snapshot.total_liabilities < Decimal::ZERO {
        warnings.push("total_liabilities is negative; X4 changes sign.".to_string());
    }

    let output = AltmanOutput {
        z_score: z.value(),
        tier: evaluate_zscore(z.value()),
        ratios,
        components,
        tier_thresholds: (dec!(1.8), dec!(3.0)),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "formula": "Z = 1.2*X1 + 1.4*X2 + 3.3*X3 + 0.6*X4 + 1.0*X5",
        "tiers": "Z < 1.8 high risk, 1.8 <= Z < 3.0 medium, Z >= 3.0 low",
        "applicability": "public manufacturing companies"
    });

    Ok(with_metadata(
        "Altman Z-Score (1968, public manufacturing)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Coefficient times ratio for X1..X5, in order.
fn weighted_terms(ratios: &RatioSet) -> CreditRiskResult<[Decimal; 5]> {
    let mut terms = [Decimal::ZERO; 5];
    for (i, ratio) in ratios.as_array().iter().enumerate() {
        terms[i] = COEFFICIENTS[i]
            .checked_mul(*ratio)
            .ok_or_else(|| out_of_range(COMPONENT_NAMES[i]))?;
    }
    Ok(terms)
}

fn sum_terms(terms: &[Decimal]) -> CreditRiskResult<Decimal> {
    terms.iter().try_fold(Decimal::ZERO, |acc, term| {
        acc.checked_add(*term).ok_or_else(|| out_of_range("Z-Score"))
    })
}

fn out_of_range(field: &str) -> CreditRiskError {
    CreditRiskError::InvalidInput {
        field: field.to_string(),
        reason: "weighted value overflows decimal range".into(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
