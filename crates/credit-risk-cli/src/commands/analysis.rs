use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use credit_risk_core::analysis::{self, CompanyInput};
use credit_risk_core::config::AnalysisConfig;
use credit_risk_core::{ComputationOutput, CreditRiskResult};

use crate::input;

/// Arguments for the full company analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to JSON company input (object or array of objects)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to JSON analysis config applied to every company
    #[arg(long)]
    pub config: Option<String>,

    /// Risk-free rate override
    #[arg(long)]
    pub rate: Option<f64>,

    /// Debt maturity override in years
    #[arg(long)]
    pub maturity: Option<f64>,

    /// Volatility override (skips estimation)
    #[arg(long)]
    pub volatility: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Companies {
    Many(Vec<CompanyInput>),
    One(Box<CompanyInput>),
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let companies: Companies =
        input::load(args.input.as_deref())?.ok_or("--input <file.json> or stdin required")?;

    let shared_config: Option<AnalysisConfig> = match args.config {
        Some(ref path) => Some(input::read_json(path)?),
        None => None,
    };

    let apply = |mut company: CompanyInput| -> CompanyInput {
        if let Some(ref config) = shared_config {
            company.config = config.clone();
        }
        if let Some(rate) = args.rate {
            company.config.risk_free_rate = rate;
        }
        if let Some(maturity) = args.maturity {
            company.config.maturity_years = maturity;
        }
        if let Some(sigma) = args.volatility {
            company.config.volatility_override = Some(sigma);
        }
        company
    };

    match companies {
        Companies::One(company) => {
            let result = analysis::analyze_company(&apply(*company))?;
            Ok(serde_json::to_value(result)?)
        }
        Companies::Many(list) => {
            let list: Vec<CompanyInput> = list.into_iter().map(apply).collect();
            let rows: Vec<Value> = list
                .iter()
                .zip(analysis::analyze_batch(&list))
                .map(|(company, outcome)| summary_row(&company.ticker, outcome))
                .collect();
            Ok(serde_json::json!({ "results": rows }))
        }
    }
}

/// One flat row per company, suited to table and CSV output.
fn summary_row(
    ticker: &str,
    outcome: CreditRiskResult<ComputationOutput<analysis::CompanyRiskReport>>,
) -> Value {
    match outcome {
        Ok(out) => {
            let report = out.result;
            serde_json::json!({
                "ticker": report.ticker,
                "altman_z_score": report.z_score.map(|z| z.round_dp(4).to_string()),
                "merton_pd": report
                    .default_probability
                    .map(|p| format!("{:.2}%", p * 100.0))
                    .unwrap_or_else(|| "N/A".to_string()),
                "credit_decision": report.verdict.decision.to_string(),
                "warnings": out.warnings.len(),
            })
        }
        Err(e) => serde_json::json!({
            "ticker": ticker,
            "altman_z_score": Value::Null,
            "merton_pd": "N/A",
            "credit_decision": format!("error: {e}"),
            "warnings": 0,
        }),
    }
}
