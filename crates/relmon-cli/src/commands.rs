//! CLI command implementations.

use colored::Colorize;
use relmon_protocol::{ReportFormat, Session, SessionConfig};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Options for `relmon run`.
#[derive(Debug, Default)]
pub struct RunOptions {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub format: Option<ReportFormat>,
    pub strict: bool,
    pub verify: bool,
    pub stats: bool,
}

/// Resolves the session config: file values first, then flags on top.
pub fn resolve_config(options: &RunOptions) -> Result<SessionConfig> {
    let mut config = match &options.config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            SessionConfig::load(path)?
        }
        None => SessionConfig::default(),
    };
    if let Some(format) = options.format {
        config.format = format;
    }
    config.strict |= options.strict;
    config.verify |= options.verify;
    Ok(config)
}

/// Run a command stream.
pub fn run(options: RunOptions) -> Result<()> {
    let config = resolve_config(&options)?;
    let mut session = Session::new(config);

    let input: Box<dyn io::BufRead> = match &options.input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    };
    let mut output: Box<dyn Write> = match &options.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let summary = session.run(input, &mut output)?;
    output.flush()?;

    if options.stats {
        let stats = session.into_store().stats();
        eprintln!("{}", "Store statistics".cyan().bold());
        eprintln!("  entities:     {}", stats.entities.to_string().cyan());
        eprintln!("  relations:    {}", stats.relations.to_string().cyan());
        eprintln!("  destinations: {}", stats.destinations.to_string().cyan());
        eprintln!("  edges:        {}", stats.edges.to_string().cyan());
        eprintln!(
            "  commands:     {} ({} skipped)",
            summary.commands.to_string().cyan(),
            summary.skipped
        );
    }

    Ok(())
}

/// Write a default config file.
pub fn init(path: &Path) -> Result<()> {
    if path.exists() {
        println!("{} {} already exists", "✓".green(), path.display());
        return Ok(());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    SessionConfig::default().save(path)?;

    println!("{} Wrote default config to {}", "✓".green(), path.display());
    println!(
        "  Run {} to use it",
        format!("relmon run --config {}", path.display()).cyan()
    );
    Ok(())
}
