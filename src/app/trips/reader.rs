//! Reading and discovery of monthly trip files

use std::io::{Error as IoError, ErrorKind};
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use super::types::RawTrip;
use crate::app::storage;
use crate::constants::files;
use crate::errors::{StorageError, TripError, TripResult};

/// Read every row of a trip file
///
/// # Errors
///
/// Returns `TripError::Storage` if the file is missing, unreadable or not
/// valid CSV.
pub async fn read_trip_file(path: &Path) -> TripResult<Vec<RawTrip>> {
    let trips = storage::read_table(path)
        .await?
        .ok_or_else(|| StorageError::Io {
            path: path.to_path_buf(),
            source: IoError::new(ErrorKind::NotFound, "trip file not found"),
        })?;

    debug!("Read {} trips from {}", trips.len(), path.display());
    Ok(trips)
}

/// Find every trip file under `raw_dir/{YYYY}/`, sorted by path
///
/// A missing raw directory yields no files.
pub async fn discover_trip_files(raw_dir: &Path) -> TripResult<Vec<PathBuf>> {
    let mut found = Vec::new();

    for year_dir in list_dir(raw_dir).await? {
        if !year_dir.is_dir() {
            continue;
        }
        for path in list_dir(&year_dir).await? {
            let is_trip_file = path.is_file()
                && path
                    .extension()
                    .is_some_and(|extension| extension == files::TRIP_FILE_EXTENSION);
            if is_trip_file {
                found.push(path);
            }
        }
    }

    found.sort();
    debug!("Discovered {} trip files under {}", found.len(), raw_dir.display());
    Ok(found)
}

async fn list_dir(dir: &Path) -> TripResult<Vec<PathBuf>> {
    let scan_failed = |source| TripError::Scan {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(scan_failed(e)),
    };

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(scan_failed)? {
        paths.push(entry.path());
    }
    Ok(paths)
}
