//! Persisted manifest table and its synchronization
//!
//! The manifest records one row per remote archive, keyed by filename. A
//! synchronization pass merges a freshly parsed listing into the table:
//!
//! - unknown filenames are appended in listing order
//! - filenames whose listed timestamp is strictly newer are updated in place,
//!   after the local artifact extracted from the previous copy is archived
//! - everything else is left untouched
//!
//! The table is rewritten only when its content changes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::types::{ManifestEntry, SyncReport};
use crate::app::{archive, storage};
use crate::constants::files;
use crate::errors::{ManifestError, ManifestResult};

/// Manifest table plus the directories its artifacts live in
#[derive(Debug, Clone)]
pub struct ManifestStore {
    manifest_path: PathBuf,
    raw_dir: PathBuf,
    archive_dir: PathBuf,
}

impl ManifestStore {
    /// Create a store over explicit locations
    pub fn new(manifest_path: PathBuf, raw_dir: PathBuf, archive_dir: PathBuf) -> Self {
        Self {
            manifest_path,
            raw_dir,
            archive_dir,
        }
    }

    /// Create a store using the standard layout below `data_root`
    pub fn from_data_root(data_root: &Path) -> Self {
        Self::new(
            data_root.join(files::MANIFEST_FILE_NAME),
            data_root.join(files::RAW_DIR),
            data_root.join(files::ARCHIVE_DIR),
        )
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    pub fn raw_dir(&self) -> &Path {
        &self.raw_dir
    }

    pub fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    /// Load the whole manifest table
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::NotInitialized` if no sync has written the
    /// table yet.
    pub async fn get(&self) -> ManifestResult<Vec<ManifestEntry>> {
        storage::read_table(&self.manifest_path)
            .await?
            .ok_or_else(|| ManifestError::NotInitialized {
                path: self.manifest_path.clone(),
            })
    }

    /// Filenames recorded in the manifest, in table order
    pub async fn filenames(&self) -> ManifestResult<Vec<String>> {
        Ok(self
            .get()
            .await?
            .into_iter()
            .map(|entry| entry.filename)
            .collect())
    }

    /// Merge freshly listed entries into the persisted manifest
    ///
    /// Running this twice with the same entries leaves every file untouched
    /// on the second run.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError` if the table cannot be read or written, or if a
    /// stale artifact cannot be archived. On error the persisted table is
    /// left as it was before the call.
    pub async fn synchronize(&self, fresh: &[ManifestEntry]) -> ManifestResult<SyncReport> {
        let mut table: Vec<ManifestEntry> = storage::read_table(&self.manifest_path)
            .await?
            .unwrap_or_default();
        let mut index: HashMap<String, usize> = table
            .iter()
            .enumerate()
            .map(|(position, entry)| (entry.filename.clone(), position))
            .collect();

        let mut report = SyncReport::default();

        for entry in fresh {
            match index.get(&entry.filename).copied() {
                None => {
                    debug!("New archive listed: {}", entry.filename);
                    index.insert(entry.filename.clone(), table.len());
                    table.push(entry.clone());
                    report.added.push(entry.filename.clone());
                }
                Some(position) if entry.is_newer_than(&table[position]) => {
                    info!(
                        "Archive republished: {} ({} -> {})",
                        entry.filename, table[position].last_modified, entry.last_modified
                    );
                    self.archive_stale_artifact(entry, &mut report).await?;
                    table[position].last_modified = entry.last_modified;
                    table[position].size = entry.size.clone();
                    report.updated.push(entry.filename.clone());
                }
                Some(_) => report.unchanged += 1,
            }
        }

        report.written = storage::write_table(&self.manifest_path, &table).await?;

        info!(
            "Manifest sync: {} added, {} updated, {} unchanged, {} archived",
            report.added.len(),
            report.updated.len(),
            report.unchanged,
            report.archived.len()
        );
        Ok(report)
    }

    async fn archive_stale_artifact(
        &self,
        entry: &ManifestEntry,
        report: &mut SyncReport,
    ) -> ManifestResult<()> {
        let artifact = entry.artifact_path(&self.raw_dir);
        if !artifact.exists() {
            warn!(
                "No local artifact to archive for {}: {}",
                entry.filename,
                artifact.display()
            );
            report.missing_artifacts.push(artifact);
            return Ok(());
        }

        let archived =
            archive::archive(&artifact, &entry.artifact_name(), &self.archive_dir).await?;
        report.archived.push(archived);
        Ok(())
    }
}
