mod commands;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing::Level;

use commands::pro_forma::{CalculateArgs, CashFlowArgs, ValidateArgs};
use commands::solvers::{IrrArgs, NpvArgs, PaymentArgs};

/// Real estate development pro-forma analysis
#[derive(Parser)]
#[command(
    name = "proforma",
    version,
    about = "Real estate development pro-forma analysis",
    long_about = "A CLI for projecting real estate development deals: costs, income, \
                  debt service, monthly cash flows, IRR / NPV, sensitivity scenarios, \
                  stress tests and a viability rating, from a JSON assumptions file."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pro-forma (metrics, cash flows, scenarios, viability)
    Calculate(CalculateArgs),
    /// Check assumptions without projecting
    Validate(ValidateArgs),
    /// Month-by-month cash flow projection only
    CashFlow(CashFlowArgs),
    /// Net present value of a cash-flow series
    Npv(NpvArgs),
    /// Internal rate of return of a cash-flow series
    Irr(IrrArgs),
    /// Monthly payment on a fully amortizing loan
    Payment(PaymentArgs),
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

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Calculate(args) => commands::pro_forma::run_calculate(args),
        Commands::Validate(args) => commands::pro_forma::run_validate(args),
        Commands::CashFlow(args) => commands::pro_forma::run_cash_flow(args),
        Commands::Npv(args) => commands::solvers::run_npv(args),
        Commands::Irr(args) => commands::solvers::run_irr(args),
        Commands::Payment(args) => commands::solvers::run_payment(args),
        Commands::Version => {
            println!("proforma {}", env!("CARGO_PKG_VERSION"));
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
