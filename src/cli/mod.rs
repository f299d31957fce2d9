//! Command-line interface components
//!
//! This module contains CLI-specific code for Bikeshare Sync, including
//! argument parsing, progress display, and command handlers.

pub mod args;
pub mod commands;
pub mod progress;

pub use args::{
    CatalogAction, CatalogArgs, Cli, Commands, GlobalArgs, ManifestAction, ManifestArgs,
};
pub use commands::{handle_catalog, handle_manifest, load_config};
pub use progress::FileProgress;
