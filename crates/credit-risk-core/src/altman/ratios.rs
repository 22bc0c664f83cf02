use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{types::*, CreditRiskError, CreditRiskResult};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// The seven raw figures the Altman model needs, for a single reporting
/// period. Only `total_assets` and `total_liabilities` are constrained
/// (non-zero); every other figure may take any sign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    pub working_capital: Money,
    pub retained_earnings: Money,
    pub ebit: Money,
    pub total_assets: Money,
    pub market_value_equity: Money,
    pub total_liabilities: Money,
    pub sales: Money,
}

/// The five Altman ratios, in model order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioSet {
    /// X1: Working Capital / Total Assets
    pub working_capital_ratio: Decimal,
    /// X2: Retained Earnings / Total Assets
    pub retained_earnings_ratio: Decimal,
    /// X3: EBIT / Total Assets
    pub ebit_ratio: Decimal,
    /// X4: Market Value of Equity / Total Liabilities
    pub equity_liability_ratio: Decimal,
    /// X5: Sales / Total Assets
    pub sales_ratio: Decimal,
}

impl RatioSet {
    /// Ratios as `[x1, x2, x3, x4, x5]`.
    pub fn as_array(&self) -> [Decimal; 5] {
        [
            self.working_capital_ratio,
            self.retained_earnings_ratio,
            self.ebit_ratio,
            self.equity_liability_ratio,
            self.sales_ratio,
        ]
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the five Altman ratios by direct division.
///
/// Fails with [`CreditRiskError::DivisionByZero`] when `total_assets` or
/// `total_liabilities` is zero; those are the only divisors.
pub fn calculate_ratios(snapshot: &FinancialSnapshot) -> CreditRiskResult<RatioSet> {
    let working_capital_ratio = safe_divide(
        snapshot.working_capital,
        snapshot.total_assets,
        "X1: Working Capital / Total Assets",
    )?;
    let retained_earnings_ratio = safe_divide(
        snapshot.retained_earnings,
        snapshot.total_assets,
        "X2: Retained Earnings / Total Assets",
    )?;
    let ebit_ratio = safe_divide(
        snapshot.ebit,
        snapshot.total_assets,
        "X3: EBIT / Total Assets",
    )?;
    let equity_liability_ratio = safe_divide(
        snapshot.market_value_equity,
        snapshot.total_liabilities,
        "X4: Market Value of Equity / Total Liabilities",
    )?;
    let sales_ratio = safe_divide(
        snapshot.sales,
        snapshot.total_assets,
        "X5: Sales / Total Assets",
    )?;

    Ok(RatioSet {
        working_capital_ratio,
        retained_earnings_ratio,
        ebit_ratio,
        equity_liability_ratio,
        sales_ratio,
    })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn safe_divide(
    numerator: Decimal,
    denominator: Decimal,
    context: &str,
) -> CreditRiskResult<Decimal> {
    if denominator.is_zero() {
        return Err(CreditRiskError::DivisionByZero {
            context: context.to_string(),
        });
    }
    numerator
        .checked_div(denominator)
        .ok_or_else(|| CreditRiskError::InvalidInput {
            field: context.to_string(),
            reason: "ratio overflows decimal range".into(),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
