mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::loan::EmiArgs;

/// Loan EMI calculator
#[derive(Parser)]
#[command(
    name = "emi",
    version,
    about = "Loan EMI (equated monthly installment) calculator",
    long_about = "Calculates the monthly installment, total interest and total payment \
                  of a loan from its principal, annual interest rate (percent) and \
                  tenure (years), with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log calculation steps to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate EMI, total interest and total payment
    Calculate(EmiArgs),
    /// Show the formatted result block, or the error block with flagged fields
    Report(EmiArgs),
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

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Calculate(args) => commands::loan::run_calculate(args),
        Commands::Report(args) => match commands::loan::run_report(args) {
            Ok(rendered) => {
                output::report::print_report(&cli.output, &rendered);
                process::exit(if rendered.is_error() { 1 } else { 0 });
            }
            Err(e) => Err(e),
        },
        Commands::Version => {
            println!("emi {}", env!("CARGO_PKG_VERSION"));
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
