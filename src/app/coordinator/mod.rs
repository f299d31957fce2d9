//! Pipeline orchestration
//!
//! This module wires the components into the two runs the tool performs:
//!
//! - **Manifest sync**: listing text is parsed and merged into the manifest,
//!   archiving superseded trip files on the way
//! - **Trip processing**: each trip file is turned into station candidates,
//!   merged into the station catalog, reindexed onto station ids and
//!   appended to the trip ledger
//!
//! Both runs are strictly sequential; each step awaits the previous one.
//!
//! # Architecture
//!
//! - [`layout`] - Locations of every table below the data root
//! - [`stats`] - Per-file and per-session reports

pub mod layout;
pub mod stats;

#[cfg(test)]
pub mod tests;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::app::catalog::{GeoJsonLayer, StationCatalog, StationCatalogBuilder, StationMapping};
use crate::app::manifest::{parse_listing, ManifestStore};
use crate::app::trips::{read_trip_file, reindex, TripLedger};
use crate::config::CatalogConfig;
use crate::errors::{CatalogError, Result};

pub use layout::DataLayout;
pub use stats::{ManifestSyncOutcome, SessionSummary, TripFileReport};

/// Runs manifest synchronization and trip processing against one data root
#[derive(Debug, Clone)]
pub struct SyncCoordinator {
    layout: DataLayout,
    manifest: ManifestStore,
    catalog: StationCatalog,
    ledger: TripLedger,
}

impl SyncCoordinator {
    pub fn new(layout: DataLayout) -> Self {
        Self {
            manifest: layout.manifest_store(),
            catalog: layout.station_catalog(),
            ledger: layout.trip_ledger(),
            layout,
        }
    }

    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    pub fn manifest(&self) -> &ManifestStore {
        &self.manifest
    }

    pub fn catalog(&self) -> &StationCatalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &TripLedger {
        &self.ledger
    }

    /// Parse listing text and merge it into the manifest
    pub async fn sync_manifest(&self, listing_text: &str) -> Result<ManifestSyncOutcome> {
        let (entries, listing) = parse_listing(listing_text)?;
        info!(
            "Listing: {} entries, {} lines skipped",
            listing.valid_entries,
            listing.total_skipped()
        );

        let report = self.manifest.synchronize(&entries).await?;
        Ok(ManifestSyncOutcome { listing, report })
    }

    /// Load both boundary layers and build a station builder from them
    pub async fn load_builder(&self, config: &CatalogConfig) -> Result<StationCatalogBuilder> {
        let root = self.layout.root();

        let regions = GeoJsonLayer::load(
            &config.region_boundaries_path(root),
            &config.region_name_property,
            None,
        )
        .await?;
        let neighborhoods = GeoJsonLayer::load(
            &config.neighborhood_boundaries_path(root),
            &config.primary_neighborhood_property,
            Some(config.secondary_neighborhood_property.as_str()),
        )
        .await?;

        Ok(StationCatalogBuilder::new(
            Arc::new(regions),
            Arc::new(neighborhoods),
            config.target_region.clone(),
        ))
    }

    /// Process one trip file through builder, catalog, reindexer and ledger
    pub async fn process_trip_file(
        &self,
        builder: &StationCatalogBuilder,
        path: &Path,
    ) -> Result<TripFileReport> {
        info!("Processing trip file {}", path.display());
        let trips = read_trip_file(path).await?;

        let build = builder.build(&trips);
        let merge = self.catalog.merge(&build.candidates).await?;

        let mapping = match self.catalog.mapping().await {
            Ok(mapping) => mapping,
            Err(CatalogError::NotInitialized { .. }) => StationMapping::default(),
            Err(e) => return Err(e.into()),
        };

        let reindexed = reindex(&trips, &mapping);
        let ledger = self.ledger.append(&reindexed.records).await?;

        Ok(TripFileReport {
            path: path.to_path_buf(),
            trips_read: trips.len(),
            build: build.stats,
            merge,
            reindex: reindexed.stats,
            ledger,
        })
    }

    /// Process trip files in order, calling `on_file` after each one
    ///
    /// Stops at the first failing file; files before it stay processed.
    pub async fn process_trip_files<F>(
        &self,
        builder: &StationCatalogBuilder,
        paths: &[PathBuf],
        mut on_file: F,
    ) -> Result<SessionSummary>
    where
        F: FnMut(&TripFileReport),
    {
        let mut summary = SessionSummary::default();
        for path in paths {
            let report = self.process_trip_file(builder, path).await?;
            summary.absorb(&report);
            on_file(&report);
        }

        info!(
            "Processed {} trip files: {} trips, {} new stations, {} rides appended",
            summary.files_processed,
            summary.trips_read,
            summary.new_stations,
            summary.rides_appended
        );
        Ok(summary)
    }
}
