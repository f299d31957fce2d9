//! On-disk layout below the data root

use std::path::{Path, PathBuf};

use crate::app::catalog::StationCatalog;
use crate::app::manifest::ManifestStore;
use crate::app::trips::TripLedger;
use crate::constants::files;

/// Locations of every table and directory the pipeline touches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.root.join(files::RAW_DIR)
    }

    pub fn archive_dir(&self) -> PathBuf {
        self.root.join(files::ARCHIVE_DIR)
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.root.join(files::PROCESSED_DIR)
    }

    pub fn manifest_store(&self) -> ManifestStore {
        ManifestStore::from_data_root(&self.root)
    }

    pub fn station_catalog(&self) -> StationCatalog {
        StationCatalog::from_data_root(&self.root)
    }

    pub fn trip_ledger(&self) -> TripLedger {
        TripLedger::from_data_root(&self.root)
    }
}
