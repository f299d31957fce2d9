//! Unit tests for the coordinator
//!
//! These tests drive the coordinator against a temporary data root with
//! small boundary layers and trip files written by the test itself.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::*;
use crate::config::CatalogConfig;
use crate::errors::AppError;

const REGIONS: &str = r#"{"type": "FeatureCollection", "features": [
    {"type": "Feature", "properties": {"NAME": "Illinois"},
     "geometry": {"type": "Polygon", "coordinates": [[[-91.0, 37.0], [-87.5, 37.0], [-87.5, 42.5], [-91.0, 42.5], [-91.0, 37.0]]]}},
    {"type": "Feature", "properties": {"NAME": "Indiana"},
     "geometry": {"type": "Polygon", "coordinates": [[[-87.5, 37.0], [-84.8, 37.0], [-84.8, 41.8], [-87.5, 41.8], [-87.5, 37.0]]]}}
]}"#;

const NEIGHBORHOODS: &str = r#"{"type": "FeatureCollection", "features": [
    {"type": "Feature", "properties": {"pri_neigh": "Loop", "sec_neigh": "LOOP"},
     "geometry": {"type": "Polygon", "coordinates": [[[-87.7, 41.8], [-87.6, 41.8], [-87.6, 41.9], [-87.7, 41.9], [-87.7, 41.8]]]}}
]}"#;

const HEADER: &str = "ride_id,rideable_type,started_at,ended_at,start_station_name,start_station_id,end_station_name,end_station_id,start_lat,start_lng,end_lat,end_lng,member_casual";

/// Create a data root with both boundary layers in processed/
pub fn create_test_root() -> (TempDir, SyncCoordinator) {
    let temp_dir = TempDir::new().unwrap();
    let processed = temp_dir.path().join("processed");
    std::fs::create_dir_all(&processed).unwrap();
    std::fs::write(processed.join("us_states.geojson"), REGIONS).unwrap();
    std::fs::write(processed.join("chicago_neighborhoods.geojson"), NEIGHBORHOODS).unwrap();

    let coordinator = SyncCoordinator::new(DataLayout::new(temp_dir.path()));
    (temp_dir, coordinator)
}

/// Write a trip file under raw/2020/ from `(ride_id, from, to)` triples
pub fn write_trip_file(root: &Path, name: &str, rides: &[(&str, &str, &str)]) -> PathBuf {
    let station = |name: &str| match name {
        "A" => (41.85, -87.65),
        "B" => (41.86, -87.64),
        "C" => (41.87, -87.63),
        // Indiana
        _ => (41.60, -87.30),
    };

    let mut content = format!("{}\n", HEADER);
    for (ride_id, from, to) in rides {
        let (from_lat, from_lng) = station(from);
        let (to_lat, to_lng) = station(to);
        content.push_str(&format!(
            "{},docked_bike,2020-04-01 10:00:00,2020-04-01 10:20:00,{},,{},,{},{},{},{},member\n",
            ride_id, from, to, from_lat, from_lng, to_lat, to_lng
        ));
    }

    let dir = root.join("raw").join("2020");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[tokio::test]
async fn test_sync_manifest_from_listing_text() {
    let (_temp_dir, coordinator) = create_test_root();
    let listing = "Name Last modified Size Type\n\
                   202004-divvy-tripdata.zip Apr 1st 2020, 10:00:00 am 12.34 MB ZIP file\n";

    let outcome = coordinator.sync_manifest(listing).await.unwrap();
    assert_eq!(outcome.listing.valid_entries, 1);
    assert_eq!(outcome.listing.skipped_lines, 1);
    assert_eq!(outcome.report.added, vec!["202004-divvy-tripdata.zip"]);

    let entries = coordinator.manifest().get().await.unwrap();
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn test_process_trip_file_end_to_end() {
    let (temp_dir, coordinator) = create_test_root();
    let builder = coordinator
        .load_builder(&CatalogConfig::default())
        .await
        .unwrap();

    let path = write_trip_file(
        temp_dir.path(),
        "202004-divvy-tripdata.csv",
        &[("r1", "A", "B"), ("r2", "B", "C"), ("r3", "A", "Gary")],
    );

    let report = coordinator.process_trip_file(&builder, &path).await.unwrap();
    assert_eq!(report.trips_read, 3);
    assert!(report.merge.bootstrapped);
    assert_eq!(report.merge.new_stations, 3);
    assert_eq!(report.build.outside_region, 1);
    assert_eq!(report.reindex.reindexed, 2);
    assert_eq!(report.reindex.unresolved_end, 1);
    assert_eq!(report.ledger.appended, 2);

    let rides = coordinator.ledger().records().await.unwrap();
    let mapping = coordinator.catalog().mapping().await.unwrap();
    assert_eq!(rides[0].from_station_id, mapping.id_of("A").unwrap());
    assert_eq!(rides[0].to_station_id, mapping.id_of("B").unwrap());

    // Same file again: nothing new anywhere
    let again = coordinator.process_trip_file(&builder, &path).await.unwrap();
    assert_eq!(again.merge.new_stations, 0);
    assert_eq!(again.ledger.appended, 0);
    assert_eq!(again.ledger.already_present, 2);
}

#[tokio::test]
async fn test_process_trip_files_summary() {
    let (temp_dir, coordinator) = create_test_root();
    let builder = coordinator
        .load_builder(&CatalogConfig::default())
        .await
        .unwrap();

    let paths = vec![
        write_trip_file(temp_dir.path(), "202004-divvy-tripdata.csv", &[("r1", "A", "B")]),
        write_trip_file(temp_dir.path(), "202005-divvy-tripdata.csv", &[("r2", "B", "C")]),
    ];

    let mut seen = Vec::new();
    let summary = coordinator
        .process_trip_files(&builder, &paths, |report| seen.push(report.path.clone()))
        .await
        .unwrap();

    assert_eq!(seen, paths);
    assert_eq!(summary.files_processed, 2);
    assert_eq!(summary.new_stations, 3);
    assert_eq!(summary.rides_appended, 2);
}

#[tokio::test]
async fn test_missing_boundary_layer() {
    let temp_dir = TempDir::new().unwrap();
    let coordinator = SyncCoordinator::new(DataLayout::new(temp_dir.path()));

    let result = coordinator.load_builder(&CatalogConfig::default()).await;
    assert!(matches!(result, Err(AppError::Boundary(_))));
}
