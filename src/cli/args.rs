//! Command-line argument parsing for Bikeshare Sync
//!
//! This module defines the CLI structure using clap derive macros, covering
//! manifest synchronization and station catalog processing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Bikeshare Sync - Keep a local mirror of published bike-share trips
#[derive(Parser, Debug)]
#[command(
    name = "bikeshare_sync",
    version,
    about = "Synchronize published bike-share trip archives and derive a station catalog",
    long_about = "Tracks the published monthly trip archives in a local manifest, archives local trip files \
when their archive is republished, and derives a stable station catalog and trip ledger from trip files."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Data root directory (overrides the configured one)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_root: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage the manifest of published archives
    Manifest(ManifestArgs),

    /// Build and inspect the station catalog
    Catalog(CatalogArgs),
}

/// Arguments for manifest management
#[derive(Args, Debug)]
pub struct ManifestArgs {
    #[command(subcommand)]
    pub action: ManifestAction,
}

/// Manifest management actions
#[derive(Subcommand, Debug)]
pub enum ManifestAction {
    /// Fetch the archive listing and synchronize the manifest
    Sync {
        /// Read the listing from a saved page or text file instead of fetching it
        #[arg(long, value_name = "FILE")]
        listing_file: Option<PathBuf>,
    },

    /// List archives recorded in the manifest
    List {
        /// First month to list (YYYY-MM)
        #[arg(long, value_name = "YYYY-MM", requires = "to")]
        from: Option<String>,

        /// Last month to list (YYYY-MM)
        #[arg(long, value_name = "YYYY-MM", requires = "from")]
        to: Option<String>,
    },
}

/// Arguments for station catalog management
#[derive(Args, Debug)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub action: CatalogAction,
}

/// Station catalog actions
#[derive(Subcommand, Debug)]
pub enum CatalogAction {
    /// Process trip files into the station catalog and trip ledger
    Process {
        /// Trip files to process (defaults to every file under raw/)
        #[arg(value_name = "FILES")]
        files: Vec<PathBuf>,
    },

    /// Print the station mapping
    Show,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level based on global arguments
    pub fn log_level(&self) -> tracing::Level {
        if self.global.quiet {
            tracing::Level::ERROR
        } else if self.global.very_verbose {
            tracing::Level::DEBUG
        } else if self.global.verbose {
            tracing::Level::INFO
        } else {
            tracing::Level::WARN
        }
    }
}
