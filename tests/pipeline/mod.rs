//! Integration tests for the synchronization pipeline
//!
//! These tests verify manifest synchronization, artifact archiving and the
//! station catalog through the public library API only.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use bikeshare_sync::app::catalog::MappingEntry;
use bikeshare_sync::app::{
    reindex, DataLayout, RawTrip, StationCandidate, StationMapping, SyncCoordinator,
};
use bikeshare_sync::config::AppConfig;
use bikeshare_sync::errors::{AppError, ConfigError};

/// Listing page for one April 2020 archive published on the given day of `month`
fn listing_published_in(month: &str) -> String {
    format!(
        "Name Last modified Size Type\n\
         202004-divvy-tripdata.zip {} 1st 2020, 10:00:00 am 12.34 MB ZIP file\n\
         index.html\n",
        month
    )
}

fn write_artifact(root: &Path, content: &str) -> PathBuf {
    let dir = root.join("raw").join("2020");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("202004-divvy-tripdata.csv");
    std::fs::write(&path, content).unwrap();
    path
}

fn station(name: &str) -> StationCandidate {
    StationCandidate {
        name: name.to_string(),
        lat: 41.88,
        lng: -87.63,
        state: "Illinois".to_string(),
        primary_neighborhood: "Loop".to_string(),
        secondary_neighborhood: "LOOP".to_string(),
    }
}

fn trip(ride_id: &str, from: &str, to: &str) -> RawTrip {
    let at = chrono::NaiveDate::from_ymd_opt(2020, 4, 1)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();
    RawTrip {
        ride_id: Some(ride_id.to_string()),
        rideable_type: Some("docked_bike".to_string()),
        started_at: Some(at),
        ended_at: Some(at),
        start_station_name: Some(from.to_string()),
        end_station_name: Some(to.to_string()),
        ..RawTrip::default()
    }
}

#[tokio::test]
async fn test_repeated_sync_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let coordinator = SyncCoordinator::new(DataLayout::new(temp_dir.path()));
    let listing = listing_published_in("Apr");

    let first = coordinator.sync_manifest(&listing).await.unwrap();
    assert!(first.report.written);
    assert_eq!(first.listing.valid_entries, 1);

    let manifest_path = temp_dir.path().join("zipfile_metadata.csv");
    let before = std::fs::read(&manifest_path).unwrap();

    let second = coordinator.sync_manifest(&listing).await.unwrap();
    assert!(!second.report.written);
    assert!(second.report.archived.is_empty());
    assert_eq!(second.report.unchanged, 1);
    assert_eq!(std::fs::read(&manifest_path).unwrap(), before);
}

#[tokio::test]
async fn test_republication_versions_archives() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let coordinator = SyncCoordinator::new(DataLayout::new(root));

    coordinator
        .sync_manifest(&listing_published_in("Apr"))
        .await
        .unwrap();

    let mut archived = Vec::new();
    for (revision, month) in [("first", "May"), ("second", "Jun"), ("third", "Jul")] {
        write_artifact(root, revision);
        let outcome = coordinator
            .sync_manifest(&listing_published_in(month))
            .await
            .unwrap();
        assert_eq!(outcome.report.updated, vec!["202004-divvy-tripdata.zip"]);
        assert_eq!(outcome.report.archived.len(), 1);
        archived.push(outcome.report.archived[0].clone());
    }

    let archive_dir = root.join("archive");
    assert_eq!(archived[0], archive_dir.join("202004-divvy-tripdata.csv"));
    assert_eq!(archived[1], archive_dir.join("202004-divvy-tripdata_v2.csv"));
    assert_eq!(archived[2], archive_dir.join("202004-divvy-tripdata_v3.csv"));

    // Every prior revision is preserved untouched
    assert_eq!(std::fs::read_to_string(&archived[0]).unwrap(), "first");
    assert_eq!(std::fs::read_to_string(&archived[1]).unwrap(), "second");
    assert_eq!(std::fs::read_to_string(&archived[2]).unwrap(), "third");

    let entries = coordinator.manifest().get().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].last_modified.format("%m").to_string(), "07");
}

#[tokio::test]
async fn test_catalog_ids_are_stable_across_merges() {
    let temp_dir = TempDir::new().unwrap();
    let coordinator = SyncCoordinator::new(DataLayout::new(temp_dir.path()));
    let catalog = coordinator.catalog();

    let batches = [
        vec![station("A"), station("B")],
        vec![station("B"), station("C")],
        vec![station("D"), station("A"), station("E")],
    ];

    let mut seen: Vec<(String, u32)> = Vec::new();
    for batch in &batches {
        catalog.merge(batch).await.unwrap();
        let mapping = catalog.mapping().await.unwrap();
        for (name, id) in &seen {
            assert_eq!(mapping.id_of(name), Some(*id), "id of {} changed", name);
        }
        seen = mapping
            .entries()
            .iter()
            .map(|entry| (entry.station_name.clone(), entry.id))
            .collect();
    }

    let ids: Vec<u32> = seen.iter().map(|(_, id)| *id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_reindex_drops_unmapped_trips() {
    let mapping = StationMapping::from_entries(vec![
        MappingEntry::new(1, &station("A")),
        MappingEntry::new(2, &station("B")),
    ]);

    let outcome = reindex(&[trip("r1", "A", "B"), trip("r2", "A", "C")], &mapping);

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].ride_id, "r1");
    assert_eq!(outcome.records[0].from_station_id, 1);
    assert_eq!(outcome.records[0].to_station_id, 2);
    assert_eq!(outcome.stats.unresolved_end, 1);
}

#[tokio::test]
async fn test_mapping_before_first_merge() {
    let temp_dir = TempDir::new().unwrap();
    let coordinator = SyncCoordinator::new(DataLayout::new(temp_dir.path()));

    let result = coordinator.catalog().mapping().await;
    let error = AppError::from(result.unwrap_err());
    assert_eq!(error.category(), "catalog");
    assert!(error.to_string().contains("new_station_mapping.csv"));
}

#[tokio::test]
async fn test_config_file_overrides_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        r#"
[paths]
data_root = "/srv/bikeshare"

[listing]
request_timeout = "15s"

[catalog]
target_region = "Indiana"
"#,
    )
    .unwrap();

    let config = AppConfig::load(Some(config_path)).await.unwrap();
    assert_eq!(config.paths.data_root, PathBuf::from("/srv/bikeshare"));
    assert_eq!(config.listing.request_timeout.as_secs(), 15);
    assert_eq!(config.catalog.target_region, "Indiana");
    assert_eq!(config.logging.level, "info");

    let missing = AppConfig::load(Some(temp_dir.path().join("absent.toml"))).await;
    assert!(matches!(
        missing,
        Err(AppError::Config(ConfigError::NotFound { .. }))
    ));
}
