//! Manifest of published trip archives
//!
//! This module turns the remote index of monthly trip archives into a
//! persisted manifest table and keeps that table in step with the index.
//! When an archive is republished, the trip file extracted from the previous
//! copy is moved into the archive directory before the manifest row is
//! updated.
//!
//! # Key Features
//!
//! - **Row filtering**: Only lines shaped like `YYYYMM...zip` entries are parsed
//! - **Positional parsing**: Ordinal days, seconds and lowercase meridiems are normalized
//! - **Idempotent sync**: Re-running with the same listing writes nothing
//! - **Versioned archiving**: Superseded artifacts are never overwritten
//! - **Month ranges**: Select entries by their `YYYYMM` stamp
//!
//! # Module Organization
//!
//! - [`types`] - Core data structures (ManifestEntry, ListingStats, SyncReport)
//! - [`parser`] - Row predicate and positional row parser
//! - [`store`] - Persisted manifest table and synchronization
//! - [`range`] - Validated month ranges and archive naming
//! - [`tests`] - Integration tests for complete sync scenarios
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::path::Path;
//! use bikeshare_sync::app::manifest::{parse_listing, ManifestStore};
//!
//! # async fn example(listing: &str) -> Result<(), Box<dyn std::error::Error>> {
//! let (entries, stats) = parse_listing(listing)?;
//! println!("{} entries, {} lines skipped", stats.valid_entries, stats.total_skipped());
//!
//! let store = ManifestStore::from_data_root(Path::new("./data"));
//! let report = store.synchronize(&entries).await?;
//! println!("{} added, {} updated", report.added.len(), report.updated.len());
//! # Ok(())
//! # }
//! ```

pub mod parser;
pub mod range;
pub mod store;
pub mod types;

#[cfg(test)]
pub mod tests;

pub use parser::{is_valid_row, parse_listing, parse_row};
pub use range::MonthRange;
pub use store::ManifestStore;
pub use types::{ListingStats, ManifestEntry, SyncReport};
