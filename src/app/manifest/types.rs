//! Core types for manifest processing
//!
//! This module contains the manifest table row, the statistics gathered while
//! parsing a listing, and the report produced by a synchronization pass.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::app::storage::timestamp;
use crate::constants::{files, listing};

/// One remote archive as recorded in the manifest table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Archive filename, unique key (e.g. "202004-divvy-tripdata.zip")
    pub filename: String,
    /// Last modification time reported by the listing
    #[serde(rename = "last_modified_date", with = "timestamp")]
    pub last_modified: NaiveDateTime,
    /// Human-readable size as listed (e.g. "12.34 MB")
    #[serde(rename = "filesize")]
    pub size: String,
}

impl ManifestEntry {
    /// Create a new manifest entry
    pub fn new(filename: impl Into<String>, last_modified: NaiveDateTime, size: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            last_modified,
            size: size.into(),
        }
    }

    /// Check if this entry was modified after another sighting of the same file
    pub fn is_newer_than(&self, other: &ManifestEntry) -> bool {
        self.last_modified > other.last_modified
    }

    /// The YYYYMM stamp leading the filename, if present
    pub fn stamp(&self) -> Option<&str> {
        let stamp = self.filename.get(..listing::STAMP_LENGTH)?;
        stamp.chars().all(|c| c.is_ascii_digit()).then_some(stamp)
    }

    /// The four-digit year leading the filename
    pub fn year(&self) -> Option<&str> {
        self.stamp().map(|stamp| &stamp[..4])
    }

    /// Name of the trip file extracted from this archive (same stem, `.csv`)
    pub fn artifact_name(&self) -> String {
        let stem = Path::new(&self.filename)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(&self.filename);
        format!("{}.{}", stem, files::TRIP_FILE_EXTENSION)
    }

    /// Local path of the extracted trip file under `raw_dir/{YYYY}/`
    pub fn artifact_path(&self, raw_dir: &Path) -> PathBuf {
        let mut path = raw_dir.to_path_buf();
        if let Some(year) = self.year() {
            path.push(year);
        }
        path.push(self.artifact_name());
        path
    }

    /// URL the archive can be downloaded from; only archive entries have one
    pub fn download_url(&self, base_url: &Url) -> Option<Url> {
        if !self.filename.ends_with(listing::ARCHIVE_MARKER) {
            return None;
        }
        let base = base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{}/{}", base, self.filename)).ok()
    }
}

/// Statistics about listing parsing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingStats {
    /// Total lines processed
    pub lines_processed: usize,
    /// Lines that produced a manifest entry
    pub valid_entries: usize,
    /// Non-empty lines rejected by the row predicate
    pub skipped_lines: usize,
    /// Empty lines skipped
    pub empty_lines: usize,
}

impl ListingStats {
    /// Get total skipped lines
    pub fn total_skipped(&self) -> usize {
        self.skipped_lines + self.empty_lines
    }
}

/// Outcome of one manifest synchronization pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Filenames seen for the first time
    pub added: Vec<String>,
    /// Filenames whose remote copy is newer than the recorded one
    pub updated: Vec<String>,
    /// Entries matching or older than what is recorded
    pub unchanged: usize,
    /// Where superseded local artifacts were archived to
    pub archived: Vec<PathBuf>,
    /// Stale entries with no local artifact to archive
    pub missing_artifacts: Vec<PathBuf>,
    /// Whether the manifest table was rewritten
    pub written: bool,
}

impl SyncReport {
    /// Check if the pass changed anything on disk
    pub fn has_changes(&self) -> bool {
        self.written || !self.archived.is_empty()
    }
}
