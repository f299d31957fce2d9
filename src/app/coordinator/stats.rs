//! Per-file and per-session processing reports

use std::path::PathBuf;

use crate::app::catalog::{BuildStats, MergeReport};
use crate::app::manifest::{ListingStats, SyncReport};
use crate::app::trips::{LedgerReport, ReindexStats};

/// Result of one manifest synchronization run
#[derive(Debug, Clone, Default)]
pub struct ManifestSyncOutcome {
    pub listing: ListingStats,
    pub report: SyncReport,
}

/// Everything that happened while processing one trip file
#[derive(Debug, Clone)]
pub struct TripFileReport {
    pub path: PathBuf,
    pub trips_read: usize,
    pub build: BuildStats,
    pub merge: MergeReport,
    pub reindex: ReindexStats,
    pub ledger: LedgerReport,
}

/// Totals across every trip file of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub files_processed: usize,
    pub trips_read: usize,
    pub new_stations: usize,
    pub rides_appended: usize,
    pub rides_already_present: usize,
    pub rides_dropped: usize,
}

impl SessionSummary {
    pub fn absorb(&mut self, report: &TripFileReport) {
        self.files_processed += 1;
        self.trips_read += report.trips_read;
        self.new_stations += report.merge.new_stations;
        self.rides_appended += report.ledger.appended;
        self.rides_already_present += report.ledger.already_present;
        self.rides_dropped += report.reindex.dropped();
    }
}
