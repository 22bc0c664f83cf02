use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use credit_risk_core::pricing::black_scholes::{self, BlackScholesInput};
use credit_risk_core::structural::merton::{self, MertonInputs};
use credit_risk_core::types::PriceHistory;
use credit_risk_core::volatility;

use crate::input;

/// Arguments for Black-Scholes call pricing
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct BlackScholesArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Spot price of the underlying
    #[arg(long)]
    pub spot: Option<f64>,

    /// Strike price
    #[arg(long)]
    pub strike: Option<f64>,

    /// Time to expiry in years
    #[arg(long)]
    pub maturity: Option<f64>,

    /// Risk-free rate as a decimal
    #[arg(long, default_value_t = 0.05)]
    pub rate: f64,

    /// Annualised volatility as a decimal
    #[arg(long)]
    pub volatility: Option<f64>,
}

/// Arguments for the Merton structural model
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct MertonArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Firm asset value (V)
    #[arg(long)]
    pub asset_value: Option<f64>,

    /// Face value of debt (D)
    #[arg(long)]
    pub debt: Option<f64>,

    /// Asset volatility as a decimal; estimated from --prices when omitted
    #[arg(long)]
    pub volatility: Option<f64>,

    /// Comma-separated closing prices used to estimate volatility
    #[arg(long, value_delimiter = ',')]
    pub prices: Vec<f64>,

    /// Risk-free rate as a decimal
    #[arg(long, default_value_t = 0.05)]
    pub rate: f64,

    /// Time to maturity in years
    #[arg(long, default_value_t = 1.0)]
    pub maturity: f64,
}

/// Arguments for historical volatility
#[derive(Args)]
pub struct VolatilityArgs {
    /// Path to JSON input file with a price history
    #[arg(long)]
    pub input: Option<String>,

    /// Comma-separated closing prices, oldest first
    #[arg(long, value_delimiter = ',')]
    pub prices: Vec<f64>,
}

/// Volatility input accepted from JSON: either a bare price list or a
/// dated history.
#[derive(Deserialize)]
#[serde(untagged)]
enum PriceInput {
    Closes { prices: Vec<f64> },
    History(PriceHistory),
}

impl PriceInput {
    fn closes(self) -> Vec<f64> {
        match self {
            PriceInput::Closes { prices } => prices,
            PriceInput::History(history) => history.closes(),
        }
    }
}

pub fn run_black_scholes(args: BlackScholesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let bs_input: BlackScholesInput = match input::load(args.input.as_deref())? {
        Some(bs_input) => bs_input,
        None => BlackScholesInput {
            spot: args.spot.ok_or("--spot is required (or provide --input)")?,
            strike: args.strike.ok_or("--strike is required (or provide --input)")?,
            time_to_expiry: args.maturity.ok_or("--maturity is required (or provide --input)")?,
            risk_free_rate: args.rate,
            volatility: args
                .volatility
                .ok_or("--volatility is required (or provide --input)")?,
        },
    };

    let result = black_scholes::price_call(&bs_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_merton(args: MertonArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loaded: Option<MertonInputs> = input::load(args.input.as_deref())?;
    let merton_input = if let Some(merton_input) = loaded {
        merton_input
    } else {
        let volatility = match args.volatility {
            Some(sigma) => sigma,
            None if !args.prices.is_empty() => {
                let est = volatility::estimate_volatility_detailed(&args.prices);
                if est.fallback_used {
                    tracing::warn!("--prices unusable, using fallback volatility {}", est.annualized);
                }
                est.annualized
            }
            None => return Err("--volatility or --prices is required (or provide --input)".into()),
        };
        MertonInputs {
            asset_value: args
                .asset_value
                .ok_or("--asset-value is required (or provide --input)")?,
            debt: args.debt.ok_or("--debt is required (or provide --input)")?,
            volatility,
            risk_free_rate: args.rate,
            time_to_maturity: args.maturity,
        }
    };

    let result = merton::calculate_merton(&merton_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_volatility(args: VolatilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let prices: Vec<f64> = if args.input.is_none() && !args.prices.is_empty() {
        args.prices
    } else {
        input::load::<PriceInput>(args.input.as_deref())?
            .ok_or("--prices or --input <file.json> required")?
            .closes()
    };

    let estimate = volatility::estimate_volatility_detailed(&prices);
    Ok(serde_json::json!({ "result": estimate }))
}
