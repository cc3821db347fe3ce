//! salespipe CLI entry point

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use salespipe::{
    commands::{cmd_init, cmd_once, cmd_report, cmd_run, print_report},
    config::{Config, DEFAULT_CONFIG_FILE},
    error::Result,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "salespipe")]
#[command(version, about = "Scheduled sales ETL into SQLite", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration and create the sales store
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Run the pipeline on its configured cadence, forever
    Run,

    /// Run the pipeline exactly once, then exit
    Once,

    /// Print total revenue per product
    Report,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Handle completions command (doesn't need config or logging)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "salespipe", &mut std::io::stdout());
        return Ok(());
    }

    // Handle init command specially (doesn't need an existing config)
    if let Commands::Init { force } = cli.command {
        init_tracing(cli.verbose, None)?;
        let config_path = cli
            .config
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        cmd_init(&Config::default(), &config_path, force).await?;
        println!("Initialized salespipe at {}", config_path.display());
        return Ok(());
    }

    let config = Config::load_from(cli.config.as_deref())?;
    init_tracing(cli.verbose, config.log.file.as_deref())?;

    match cli.command {
        Commands::Init { .. } | Commands::Completions { .. } => unreachable!(),

        Commands::Run => {
            cmd_run(&config).await?;
        }

        Commands::Once => {
            let report = cmd_once(&config).await?;
            println!(
                "{} extracted, {} transformed, {} inserted",
                report.extracted, report.transformed, report.inserted
            );
        }

        Commands::Report => {
            let rows = cmd_report(&config).await?;
            print_report(&rows);
        }
    }

    Ok(())
}

/// Initialize tracing with console output and, when configured, an
/// append-only log file.
fn init_tracing(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            registry
                .with(fmt::layer())
                .with(fmt::layer().with_ansi(false).with_writer(Arc::new(file)))
                .init();
        }
        None => {
            registry.with(fmt::layer()).init();
        }
    }

    Ok(())
}
