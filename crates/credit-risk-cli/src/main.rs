mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::analysis::AnalyzeArgs;
use commands::credit::{EvaluateArgs, ZScoreArgs};
use commands::structural::{BlackScholesArgs, MertonArgs, VolatilityArgs};

/// Corporate credit risk from financial statements and market data
#[derive(Parser)]
#[command(
    name = "crisk",
    version,
    about = "Corporate credit risk: Altman Z-Score and Merton structural model",
    long_about = "A CLI for estimating corporate credit risk. Computes the Altman Z-Score \
                  from balance-sheet figures, the Merton default probability from market \
                  data, historical volatility from closing prices, and a combined credit \
                  decision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the Altman Z-Score from seven financial figures
    ZScore(ZScoreArgs),
    /// Price a European call with Black-Scholes
    BlackScholes(BlackScholesArgs),
    /// Run the Merton structural default model
    Merton(MertonArgs),
    /// Estimate annualised volatility from closing prices
    Volatility(VolatilityArgs),
    /// Classify a Z-Score and default probability into a credit decision
    Evaluate(EvaluateArgs),
    /// Full analysis of one or more companies
    Analyze(AnalyzeArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::ZScore(args) => commands::credit::run_zscore(args),
        Commands::BlackScholes(args) => commands::structural::run_black_scholes(args),
        Commands::Merton(args) => commands::structural::run_merton(args),
        Commands::Volatility(args) => commands::structural::run_volatility(args),
        Commands::Evaluate(args) => commands::credit::run_evaluate(args),
        Commands::Analyze(args) => commands::analysis::run_analyze(args),
        Commands::Version => {
            println!("crisk {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
