//! GroundCrew command-line interface
//!
//! ```text
//! groundcrew check "The Eiffel Tower is 330 metres tall."
//! groundcrew check --url https://example.com/article --json -o state.json
//! groundcrew eval --dataset fever_dev.jsonl -n 200 --workers 8
//! groundcrew eval --analyze -o fever_evaluation_results.json
//! ```
//!
//! API keys are read from the environment (or a `.env` file):
//! `OPENAI_API_KEY`, `TAVILY_API_KEY` and, for `--url`, `FIRECRAWL_API_KEY`.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cmd;

#[derive(Parser)]
#[command(name = "groundcrew")]
#[command(about = "Automated fact-checking: claims, evidence, verdicts")]
#[command(version)]
struct Cli {
    /// Debug logging for the pipeline
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fact-check text or a web page
    Check(cmd::check::CheckArgs),

    /// Benchmark against a FEVER-style JSONL dataset
    Eval(cmd::eval::EvalArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Check(args) => {
            let config = args.config.resolve(cli.verbose)?;
            init_tracing(config.verbose);
            cmd::check::run(args, config).await
        }
        Commands::Eval(args) => {
            let config = args.config.resolve(cli.verbose)?;
            init_tracing(config.verbose);
            cmd::eval::run(args, config).await
        }
    }
}

/// Logs go to stderr so stdout stays clean for reports and JSON.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "info,groundcrew=debug,openai_client=debug"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}
