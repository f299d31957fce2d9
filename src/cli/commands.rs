//! Command handlers for Bikeshare Sync CLI
//!
//! This module implements the command handlers that connect CLI arguments
//! to the coordinator.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, info, warn};
use url::Url;

use crate::app::{
    discover_trip_files, read_listing_file, DataLayout, ListingClient, MonthRange,
    SyncCoordinator,
};
use crate::cli::progress::{spinner, FileProgress};
use crate::cli::{CatalogAction, CatalogArgs, GlobalArgs, ManifestAction, ManifestArgs};
use crate::config::AppConfig;
use crate::errors::{AppError, Result};

/// Load configuration and apply command-line overrides
pub async fn load_config(global: &GlobalArgs) -> Result<AppConfig> {
    let mut config = AppConfig::load(global.config.clone()).await?;
    if let Some(data_root) = &global.data_root {
        debug!("Overriding data root with {}", data_root.display());
        config.paths.data_root = data_root.clone();
    }
    Ok(config)
}

/// Handle manifest management commands
pub async fn handle_manifest(args: ManifestArgs, config: &AppConfig, quiet: bool) -> Result<()> {
    let coordinator = SyncCoordinator::new(DataLayout::new(&config.paths.data_root));

    match args.action {
        ManifestAction::Sync { listing_file } => {
            sync_manifest(&coordinator, config, listing_file, quiet).await
        }
        ManifestAction::List { from, to } => {
            list_manifest(&coordinator, config, from.as_deref(), to.as_deref()).await
        }
    }
}

async fn sync_manifest(
    coordinator: &SyncCoordinator,
    config: &AppConfig,
    listing_file: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    let start_time = Instant::now();

    let listing_text = match listing_file {
        Some(path) => {
            info!("Reading listing from {}", path.display());
            read_listing_file(&path).await?
        }
        None => {
            let progress = spinner(format!("Fetching {}", config.listing.index_url), quiet);
            let client = ListingClient::with_config(&config.listing.to_client_config())?;
            let fetched = client.fetch_listing(&config.listing.index_url).await;
            progress.finish_and_clear();
            fetched?
        }
    };

    let outcome = coordinator.sync_manifest(&listing_text).await?;
    let report = &outcome.report;

    if !quiet {
        println!(
            "Listing: {} archives ({} lines skipped)",
            outcome.listing.valid_entries,
            outcome.listing.total_skipped()
        );
        println!(
            "Manifest: {} added, {} updated, {} unchanged",
            report.added.len(),
            report.updated.len(),
            report.unchanged
        );
        for path in &report.archived {
            println!("  archived {}", path.display());
        }
        for path in &report.missing_artifacts {
            println!("  no local copy of {}", path.display());
        }
        if !report.has_changes() {
            println!("Manifest already up to date");
        }
    }

    info!("Manifest sync completed in {:?}", start_time.elapsed());
    Ok(())
}

async fn list_manifest(
    coordinator: &SyncCoordinator,
    config: &AppConfig,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<()> {
    let range = match (from, to) {
        (Some(from), Some(to)) => MonthRange::parse(from, to)?,
        _ => MonthRange::published(),
    };

    let base_url = Url::parse(&config.listing.download_base_url).ok();
    if base_url.is_none() {
        warn!(
            "Download base URL {} is not a valid URL",
            config.listing.download_base_url
        );
    }

    let entries = coordinator.manifest().get().await?;
    let selected = range.select(&entries);

    println!(
        "{} of {} archives between {} and {}",
        selected.len(),
        entries.len(),
        range.start().format("%Y-%m"),
        range.end().format("%Y-%m")
    );
    for entry in selected {
        let url = base_url
            .as_ref()
            .and_then(|base| entry.download_url(base))
            .map(|url| url.to_string())
            .unwrap_or_default();
        println!(
            "{:<32} {}  {:>10}  {}",
            entry.filename,
            entry.last_modified.format("%Y-%m-%d %H:%M:%S"),
            entry.size,
            url
        );
    }

    Ok(())
}

/// Handle station catalog commands
pub async fn handle_catalog(args: CatalogArgs, config: &AppConfig, quiet: bool) -> Result<()> {
    let coordinator = SyncCoordinator::new(DataLayout::new(&config.paths.data_root));

    match args.action {
        CatalogAction::Process { files } => {
            process_trips(&coordinator, config, files, quiet).await
        }
        CatalogAction::Show => show_mapping(&coordinator).await,
    }
}

async fn process_trips(
    coordinator: &SyncCoordinator,
    config: &AppConfig,
    files: Vec<PathBuf>,
    quiet: bool,
) -> Result<()> {
    let start_time = Instant::now();

    let files = if files.is_empty() {
        discover_trip_files(&coordinator.layout().raw_dir()).await?
    } else {
        files
    };
    if files.is_empty() {
        return Err(AppError::generic(format!(
            "No trip files found under {}",
            coordinator.layout().raw_dir().display()
        )));
    }

    let builder = coordinator.load_builder(&config.catalog).await?;

    let progress = FileProgress::new(files.len(), quiet);
    let result = coordinator
        .process_trip_files(&builder, &files, |report| progress.file_done(report))
        .await;
    progress.finish();
    let summary = result?;

    if !quiet {
        println!("Processed {} trip files", summary.files_processed);
        println!("  trips read:        {}", summary.trips_read);
        println!("  new stations:      {}", summary.new_stations);
        println!("  rides appended:    {}", summary.rides_appended);
        println!("  already present:   {}", summary.rides_already_present);
        println!("  rides dropped:     {}", summary.rides_dropped);
    }

    info!("Trip processing completed in {:?}", start_time.elapsed());
    Ok(())
}

async fn show_mapping(coordinator: &SyncCoordinator) -> Result<()> {
    let mapping = coordinator.catalog().mapping().await?;

    println!("{} stations", mapping.len());
    for entry in mapping.entries() {
        println!(
            "{:>6}  {:<48} {:>10.6} {:>11.6}",
            entry.id, entry.station_name, entry.latitude, entry.longitude
        );
    }
    Ok(())
}
