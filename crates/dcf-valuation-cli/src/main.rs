mod commands;
mod input;
mod output;
mod store;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::adjustments::{CapitalizeArgs, ConvertibleArgs, LeaseArgs, TrappedCashArgs};
use commands::cost_of_debt::CostOfDebtArgs;
use commands::records::{LoadArgs, SaveArgs};
use commands::valuation::{NormalizeArgs, ValueArgs};
use commands::Context;

/// Adjusted DCF valuations with decimal precision
#[derive(Parser)]
#[command(
    name = "dcfv",
    version,
    about = "Adjusted DCF valuations with decimal precision",
    long_about = "A CLI for valuing a company with a ten-year FCFF model after normalizing \
                  its financials: trapped cash, R&D and operating lease capitalization, \
                  cost of debt by direct entry, rating or synthetic rating, and \
                  convertible debt. Saved valuations live in a local JSON store."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Country and rating spread reference data (JSON or YAML)
    #[arg(long, global = true)]
    reference_data: Option<String>,

    /// Saved valuations file
    #[arg(long, default_value = "valuations.json", global = true)]
    store: String,

    /// Owner of saved valuations
    #[arg(long, default_value = "local", global = true, env = "DCFV_USER")]
    user: String,

    /// Log debug detail to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Tax cost of repatriating cash held abroad
    TrappedCash(TrappedCashArgs),
    /// Capitalize an R&D expense history
    Capitalize(CapitalizeArgs),
    /// Capitalize operating lease commitments
    Lease(LeaseArgs),
    /// Resolve pre-tax and after-tax cost of debt
    CostOfDebt(CostOfDebtArgs),
    /// Value the straight-debt part of a convertible
    Convertible(ConvertibleArgs),
    /// Run every adjustment and print the normalized financials
    Normalize(NormalizeArgs),
    /// Run a full adjusted DCF valuation
    Value(ValueArgs),
    /// Value a company and save the result to the store
    Save(SaveArgs),
    /// List saved valuations
    List,
    /// Print the input of a saved valuation
    Load(LoadArgs),
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

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let ctx = Context {
        reference_data: cli.reference_data,
        store: cli.store,
        user: cli.user,
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::TrappedCash(args) => commands::adjustments::run_trapped_cash(args),
        Commands::Capitalize(args) => commands::adjustments::run_capitalize(args),
        Commands::Lease(args) => commands::adjustments::run_lease(args),
        Commands::CostOfDebt(args) => commands::cost_of_debt::run_cost_of_debt(args, &ctx),
        Commands::Convertible(args) => commands::adjustments::run_convertible(args),
        Commands::Normalize(args) => commands::valuation::run_normalize(args, &ctx),
        Commands::Value(args) => commands::valuation::run_value(args, &ctx),
        Commands::Save(args) => commands::records::run_save(args, &ctx),
        Commands::List => commands::records::run_list(&ctx),
        Commands::Load(args) => commands::records::run_load(args, &ctx),
        Commands::Version => {
            println!("dcfv {}", env!("CARGO_PKG_VERSION"));
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
