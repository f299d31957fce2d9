//! Core application logic for Bikeshare Sync
//!
//! This module contains the pipeline components: the listing client, the
//! manifest store with its versioned archive, the station catalog, trip
//! reindexing and the coordinator that runs them in order.
//!
//! # Examples
//!
//! ```rust,no_run
//! use bikeshare_sync::app::{DataLayout, ListingClient, SyncCoordinator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ListingClient::new()?;
//! let listing = client
//!     .fetch_listing("https://divvy-tripdata.s3.amazonaws.com/index.html")
//!     .await?;
//!
//! let coordinator = SyncCoordinator::new(DataLayout::new("./data"));
//! let outcome = coordinator.sync_manifest(&listing).await?;
//! println!("{} archives added", outcome.report.added.len());
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod catalog;
pub mod client;
pub mod coordinator;
pub mod manifest;
pub mod storage;
pub mod trips;

// Re-export main public API
pub use catalog::{
    BoundaryLayer, GeoJsonLayer, MergeReport, StationCandidate, StationCatalog,
    StationCatalogBuilder, StationMapping,
};
pub use client::{read_listing_file, ClientConfig, ListingClient};
pub use coordinator::{DataLayout, SessionSummary, SyncCoordinator, TripFileReport};
pub use manifest::{parse_listing, ManifestEntry, ManifestStore, MonthRange, SyncReport};
pub use trips::{discover_trip_files, read_trip_file, reindex, RawTrip, TripLedger, TripRecord};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_structure() {
        // Ensure public API is accessible
        let config = ClientConfig::default();
        assert!(config.tcp_nodelay);

        let layout = DataLayout::new("data");
        assert!(layout.raw_dir().ends_with("raw"));
    }
}
