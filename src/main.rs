//! Bikeshare Sync CLI application
//!
//! Command-line interface for synchronizing published bike-share trip
//! archives and deriving a station catalog from trip files.

use std::process;

use tracing::info;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, EnvFilter};

use bikeshare_sync::cli::{handle_catalog, handle_manifest, load_config, Cli, Commands};
use bikeshare_sync::config::AppConfig;
use bikeshare_sync::errors::{AppError, Result};

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    // An explicit --config path is never created on the user's behalf
    if cli.global.config.is_none() {
        AppConfig::initialize_first_run().await?;
    }
    let config = load_config(&cli.global).await?;

    init_logging(&cli, &config)?;

    info!("Bikeshare Sync v{} starting", env!("CARGO_PKG_VERSION"));
    info!("Data root: {}", config.paths.data_root.display());

    let quiet = cli.global.quiet;
    match cli.command {
        Commands::Manifest(args) => {
            info!("Executing manifest command");
            handle_manifest(args, &config, quiet).await
        }
        Commands::Catalog(args) => {
            info!("Executing catalog command");
            handle_catalog(args, &config, quiet).await
        }
    }
}

/// Initialize logging from CLI verbosity flags, falling back to the configured level
fn init_logging(cli: &Cli, config: &AppConfig) -> Result<()> {
    let global = &cli.global;
    let level = if global.quiet || global.verbose || global.very_verbose {
        cli.log_level().to_string()
    } else {
        config.logging.level.clone()
    };

    let directive = format!("bikeshare_sync={}", level.to_ascii_lowercase())
        .parse::<Directive>()
        .map_err(|e| AppError::generic(format!("Invalid log level '{}': {}", level, e)))?;
    let filter = EnvFilter::from_default_env().add_directive(directive);

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(global.very_verbose) // Show levels only in very verbose mode
        .init();

    if global.very_verbose {
        info!("Very verbose logging enabled");
    } else if global.verbose {
        info!("Verbose logging enabled");
    }
    Ok(())
}
