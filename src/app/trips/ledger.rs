//! Persisted ledger of reindexed trips

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::info;

use super::types::TripRecord;
use crate::app::storage;
use crate::constants::files;
use crate::errors::TripResult;

/// What an append did to the ledger
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerReport {
    pub appended: usize,
    /// Records whose ride id was already in the ledger (or earlier in the batch)
    pub already_present: usize,
    pub written: bool,
}

/// Append-only table of reindexed trips, keyed by ride id
#[derive(Debug, Clone)]
pub struct TripLedger {
    path: PathBuf,
}

impl TripLedger {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn from_data_root(data_root: &Path) -> Self {
        Self::new(
            data_root
                .join(files::PROCESSED_DIR)
                .join(files::TRIP_LEDGER_FILE_NAME),
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every record in the ledger; empty before the first append
    pub async fn records(&self) -> TripResult<Vec<TripRecord>> {
        Ok(storage::read_table(&self.path).await?.unwrap_or_default())
    }

    /// Append records whose ride id is not yet in the ledger
    pub async fn append(&self, records: &[TripRecord]) -> TripResult<LedgerReport> {
        let mut ledger = self.records().await?;
        let mut seen: HashSet<String> = ledger.iter().map(|record| record.ride_id.clone()).collect();
        let mut report = LedgerReport::default();

        for record in records {
            if seen.insert(record.ride_id.clone()) {
                ledger.push(record.clone());
                report.appended += 1;
            } else {
                report.already_present += 1;
            }
        }

        if report.appended > 0 {
            report.written = storage::write_table(&self.path, &ledger).await?;
        }

        info!(
            "Trip ledger: {} appended, {} already present ({} total)",
            report.appended,
            report.already_present,
            ledger.len()
        );
        Ok(report)
    }
}
