use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use credit_risk_core::altman::ratios::FinancialSnapshot;
use credit_risk_core::altman::zscore;
use credit_risk_core::evaluation::evaluator;

use crate::input;

/// Arguments for the Altman Z-Score
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ZScoreArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Working capital (current assets - current liabilities)
    #[arg(long)]
    pub working_capital: Option<Decimal>,

    /// Retained earnings
    #[arg(long)]
    pub retained_earnings: Option<Decimal>,

    /// EBIT
    #[arg(long)]
    pub ebit: Option<Decimal>,

    /// Total assets
    #[arg(long)]
    pub total_assets: Option<Decimal>,

    /// Market value of equity (market capitalisation)
    #[arg(long, alias = "market-cap")]
    pub market_value_equity: Option<Decimal>,

    /// Total liabilities
    #[arg(long)]
    pub total_liabilities: Option<Decimal>,

    /// Sales (total revenue)
    #[arg(long, alias = "revenue")]
    pub sales: Option<Decimal>,
}

/// Arguments for the risk verdict
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct EvaluateArgs {
    /// Altman Z-Score (omit if unavailable)
    #[arg(long)]
    pub z_score: Option<Decimal>,

    /// Merton default probability as a decimal (omit if unavailable)
    #[arg(long, alias = "pd")]
    pub default_probability: Option<f64>,
}

pub fn run_zscore(args: ZScoreArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let snapshot: FinancialSnapshot = match input::load(args.input.as_deref())? {
        Some(snapshot) => snapshot,
        None => FinancialSnapshot {
            working_capital: args.working_capital
                .ok_or("--working-capital is required (or provide --input)")?,
            retained_earnings: args.retained_earnings
                .ok_or("--retained-earnings is required (or provide --input)")?,
            ebit: args.ebit
                .ok_or("--ebit is required (or provide --input)")?,
            total_assets: args.total_assets
                .ok_or("--total-assets is required (or provide --input)")?,
            market_value_equity: args.market_value_equity
                .ok_or("--market-value-equity is required (or provide --input)")?,
            total_liabilities: args.total_liabilities
                .ok_or("--total-liabilities is required (or provide --input)")?,
            sales: args.sales
                .ok_or("--sales is required (or provide --input)")?,
        },
    };

    let result = zscore::calculate_altman_zscore(&snapshot)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_evaluate(args: EvaluateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let verdict = evaluator::evaluate(args.z_score, args.default_probability);
    Ok(serde_json::json!({
        "result": {
            "z_score": args.z_score,
            "default_probability": args.default_probability,
            "zscore_evaluation": verdict.zscore_tier.map(|t| t.to_string()),
            "default_evaluation": verdict.default_tier.map(|t| t.to_string()),
            "credit_decision": verdict.decision.to_string(),
        }
    }))
}
