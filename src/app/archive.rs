//! Versioned archiving of superseded local artifacts
//!
//! When the remote copy of a monthly archive is republished, the trip file
//! extracted from the previous copy is moved into a flat archive directory
//! before the new copy replaces it. Names that already exist in the archive
//! are never reused: the second archive of `202004-divvy-tripdata.csv` lands
//! at `202004-divvy-tripdata_v2.csv`, the third at `_v3`, and so on.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, warn};

use crate::errors::{ArchiveError, ArchiveResult};

/// Move `source_path` into `archive_dir`, versioning on name collision
///
/// # Arguments
///
/// * `source_path` - Local artifact being superseded
/// * `base_filename` - Name the artifact is archived under
/// * `archive_dir` - Flat archive directory (created when missing)
///
/// # Returns
///
/// The path the artifact was moved to
///
/// # Errors
///
/// Returns `ArchiveError` if the archive directory cannot be listed or the
/// move fails. Failures are not retried.
pub async fn archive(
    source_path: &Path,
    base_filename: &str,
    archive_dir: &Path,
) -> ArchiveResult<PathBuf> {
    fs::create_dir_all(archive_dir)
        .await
        .map_err(|source| ArchiveError::DirectoryNotAccessible {
            path: archive_dir.to_path_buf(),
            source,
        })?;

    let existing = list_archived(archive_dir).await?;
    let destination = archive_dir.join(versioned_name(base_filename, &existing)?);

    move_file(source_path, &destination).await?;

    info!(
        "Archived {} -> {}",
        source_path.display(),
        destination.display()
    );
    Ok(destination)
}

/// Choose the archive name for `base_filename` given the names already archived
///
/// The plain name is used when it is free. Otherwise the version is one more
/// than the number of archived names starting with the stem, bumped further
/// if that name is somehow taken.
pub fn versioned_name(base_filename: &str, existing: &[String]) -> ArchiveResult<String> {
    if !existing.iter().any(|name| name == base_filename) {
        return Ok(base_filename.to_string());
    }

    let (stem, extension) = split_name(base_filename)?;
    let sharing_stem = existing
        .iter()
        .filter(|name| name.starts_with(stem))
        .count();

    let mut version = sharing_stem + 1;
    loop {
        let candidate = format!("{}_v{}{}", stem, version, extension);
        if !existing.iter().any(|name| *name == candidate) {
            return Ok(candidate);
        }
        warn!("Archive name {} already taken, trying next version", candidate);
        version += 1;
    }
}

/// Split a filename into stem and dotted extension (`"a.csv"` -> `("a", ".csv")`)
fn split_name(filename: &str) -> ArchiveResult<(&str, &str)> {
    let invalid = || ArchiveError::InvalidFilename {
        name: filename.to_string(),
    };

    match filename.rfind('.') {
        Some(0) => Err(invalid()),
        Some(index) => Ok((&filename[..index], &filename[index..])),
        None if filename.is_empty() => Err(invalid()),
        None => Ok((filename, "")),
    }
}

/// Names of the regular files currently in the archive directory
async fn list_archived(archive_dir: &Path) -> ArchiveResult<Vec<String>> {
    let not_accessible = |source| ArchiveError::DirectoryNotAccessible {
        path: archive_dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(archive_dir).await.map_err(not_accessible)?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(not_accessible)? {
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }

    Ok(names)
}

/// Rename, falling back to copy + remove when the rename cannot cross devices
async fn move_file(from: &Path, to: &Path) -> ArchiveResult<()> {
    let move_failed = |source| ArchiveError::MoveFailed {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    match fs::rename(from, to).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(move_failed(e)),
        Err(e) => {
            debug!("Rename failed ({}), falling back to copy", e);
            fs::copy(from, to).await.map_err(move_failed)?;
            fs::remove_file(from).await.map_err(move_failed)?;
            Ok(())
        }
    }
}
