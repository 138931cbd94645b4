use cconv::cli::convert::{failure_message, split_args};
use cconv::cli::list::ListFilter;
use cconv::core::log::init_logging;
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use std::process::ExitCode;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging, repeat for more detail
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for cconv::AppCommand {
    fn from(cmd: Commands) -> cconv::AppCommand {
        match cmd {
            Commands::Convert { args, swap, json } => {
                let args = split_args(&args);
                cconv::AppCommand::Convert {
                    amount: args.amount.unwrap_or_else(|| "1".to_string()),
                    from: args.from,
                    to: args.to,
                    swap,
                    json,
                }
            }
            Commands::List { fiat, crypto } => cconv::AppCommand::List(match (fiat, crypto) {
                (true, false) => ListFilter::Fiat,
                (false, true) => ListFilter::Crypto,
                _ => ListFilter::All,
            }),
            Commands::Interactive => cconv::AppCommand::Interactive,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two currencies: [AMOUNT] [FROM] [TO]
    ///
    /// FROM and TO are fiat codes (USD) or crypto ids/symbols (bitcoin, btc).
    /// With fewer than three values a leading number is the amount. Missing
    /// currencies come from the configured defaults; a bad amount means 1.
    Convert {
        #[arg(value_name = "ARGS", num_args = 0..=3)]
        args: Vec<String>,
        /// Swap source and destination
        #[arg(short, long)]
        swap: bool,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List supported currencies
    List {
        /// Only fiat currencies
        #[arg(long, conflicts_with = "crypto")]
        fiat: bool,
        /// Only crypto currencies
        #[arg(long)]
        crypto: bool,
    },
    /// Read conversions from stdin until `quit`
    Interactive,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => cconv::cli::setup::setup(),
        Some(cmd) => cconv::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => Cli::command().print_help().map_err(Into::into),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = ?e, "Application failed");
            if let Some(message) = failure_message(&e) {
                eprintln!("{message}");
            }
            ExitCode::FAILURE
        }
    }
}
