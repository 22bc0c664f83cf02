//! Threshold rules that turn model outputs into categorical risk calls.
//!
//! Z-Score tiers are closed on the lower bound (1.8 is Medium, 3.0 is Low).
//! Default-probability tiers are open at both ends of the Moderate band
//! (0.05 and 0.10 are both Moderate).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Rate;

const Z_HIGH_RISK_BELOW: Decimal = dec!(1.8);
const Z_LOW_RISK_FROM: Decimal = dec!(3.0);

const PD_HIGH_RISK_ABOVE: Rate = 0.10;
const PD_LOW_RISK_BELOW: Rate = 0.05;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZScoreTier {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for ZScoreTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "High bankruptcy risk"),
            Self::Medium => write!(f, "Medium bankruptcy risk"),
            Self::Low => write!(f, "Low bankruptcy risk"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefaultRiskTier {
    High,
    Moderate,
    Low,
}

impl std::fmt::Display for DefaultRiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "High default risk"),
            Self::Moderate => write!(f, "Moderate default risk"),
            Self::Low => write!(f, "Low default risk"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreditDecision {
    Approved,
    Denied,
    InsufficientData,
}

impl std::fmt::Display for CreditDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approved => write!(f, "Approved"),
            Self::Denied => write!(f, "Denied"),
            Self::InsufficientData => write!(f, "Insufficient data"),
        }
    }
}

/// Combined verdict. A tier is `None` when its model output was absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskVerdict {
    pub zscore_tier: Option<ZScoreTier>,
    pub default_tier: Option<DefaultRiskTier>,
    pub decision: CreditDecision,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn evaluate_zscore(z_score: Decimal) -> ZScoreTier {
    if z_score < Z_HIGH_RISK_BELOW {
        ZScoreTier::High
    } else if z_score >= Z_LOW_RISK_FROM {
        ZScoreTier::Low
    } else {
        ZScoreTier::Medium
    }
}

/// Tier a risk-neutral default probability. NaN is treated as high risk.
pub fn evaluate_default_probability(default_probability: Rate) -> DefaultRiskTier {
    if default_probability > PD_HIGH_RISK_ABOVE || default_probability.is_nan() {
        DefaultRiskTier::High
    } else if default_probability < PD_LOW_RISK_BELOW {
        DefaultRiskTier::Low
    } else {
        DefaultRiskTier::Moderate
    }
}

/// Approve only when both models are present and both sit in the low-risk
/// tier. No partial credit.
pub fn credit_decision(
    z_score: Option<Decimal>,
    default_probability: Option<Rate>,
) -> CreditDecision {
    match (z_score, default_probability) {
        (Some(z), Some(p)) => {
            if z >= Z_LOW_RISK_FROM && p < PD_LOW_RISK_BELOW {
                CreditDecision::Approved
            } else {
                CreditDecision::Denied
            }
        }
        _ => CreditDecision::InsufficientData,
    }
}

pub fn evaluate(z_score: Option<Decimal>, default_probability: Option<Rate>) -> RiskVerdict {
    let verdict = RiskVerdict {
        zscore_tier: z_score.map(evaluate_zscore),
        default_tier: default_probability.map(evaluate_default_probability),
        decision: credit_decision(z_score, default_probability),
    };
    tracing::debug!(decision = %verdict.decision, "credit verdict");
    verdict
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
