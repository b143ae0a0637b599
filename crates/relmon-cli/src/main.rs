//! Relmon CLI - Command-line interface for relmon
//!
//! Runs the line-oriented command protocol over a file or standard input and
//! writes report output to a file or standard output.

use clap::{Parser, Subcommand};
use colored::Colorize;
use relmon_protocol::ReportFormat;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "relmon")]
#[command(author = "Relmon Contributors")]
#[command(version)]
#[command(about = "Track entities and typed relations, report the most-referenced destinations", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a command stream
    Run {
        /// Command file (defaults to standard input)
        input: Option<PathBuf>,

        /// Write reports here instead of standard output
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Config file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Report format, overrides the config file
        #[arg(long)]
        format: Option<ReportFormat>,

        /// Fail on malformed lines instead of skipping them
        #[arg(long)]
        strict: bool,

        /// Check store invariants after every mutating command
        #[arg(long)]
        verify: bool,

        /// Print store statistics to stderr when done
        #[arg(long)]
        stats: bool,
    },

    /// Write a default config file
    Init {
        /// Where to write the config
        #[arg(default_value = "relmon.json")]
        path: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let default_filter = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();

    let result = match cli.command {
        Commands::Run {
            input,
            output,
            config,
            format,
            strict,
            verify,
            stats,
        } => commands::run(commands::RunOptions {
            input,
            output,
            config,
            format,
            strict,
            verify,
            stats,
        }),
        Commands::Init { path } => commands::init(&path),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
