//! Persisted station catalog: master table and name-to-id mapping
//!
//! The first merge bootstraps both tables. Later merges append only names
//! missing from the master table, in first-seen candidate order, and hand
//! out surrogate ids as `max + 1`. Ids, once written, never change.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::{MappingEntry, StationCandidate, StationMapping};
use crate::app::storage;
use crate::constants::files;
use crate::errors::{CatalogError, CatalogResult};

/// What a merge did to the catalog tables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Both tables were created by this merge
    pub bootstrapped: bool,
    /// Names appended to the master table
    pub new_stations: usize,
    /// Ids handed out by this merge, in assignment order
    pub assigned: Vec<(String, u32)>,
    /// Candidates collapsed into an earlier candidate with the same name
    pub duplicate_candidates: usize,
    pub master_written: bool,
    pub mapping_written: bool,
}

/// Owner of the master station table and the station mapping
#[derive(Debug, Clone)]
pub struct StationCatalog {
    master_path: PathBuf,
    mapping_path: PathBuf,
}

impl StationCatalog {
    pub fn new(master_path: PathBuf, mapping_path: PathBuf) -> Self {
        Self {
            master_path,
            mapping_path,
        }
    }

    /// Catalog tables in the processed directory below `data_root`
    pub fn from_data_root(data_root: &Path) -> Self {
        let processed = data_root.join(files::PROCESSED_DIR);
        Self::new(
            processed.join(files::MASTER_STATIONS_FILE_NAME),
            processed.join(files::STATION_MAPPING_FILE_NAME),
        )
    }

    pub fn master_path(&self) -> &Path {
        &self.master_path
    }

    pub fn mapping_path(&self) -> &Path {
        &self.mapping_path
    }

    /// Load the master station table
    pub async fn master(&self) -> CatalogResult<Vec<StationCandidate>> {
        storage::read_table(&self.master_path)
            .await?
            .ok_or_else(|| CatalogError::NotInitialized {
                path: self.master_path.clone(),
            })
    }

    /// Load the station mapping
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotInitialized` before the first merge.
    pub async fn mapping(&self) -> CatalogResult<StationMapping> {
        storage::read_table(&self.mapping_path)
            .await?
            .map(StationMapping::from_entries)
            .ok_or_else(|| CatalogError::NotInitialized {
                path: self.mapping_path.clone(),
            })
    }

    /// Merge station candidates into the catalog
    ///
    /// Merging the same candidates twice writes nothing the second time, and
    /// merging a superset only adds the new names.
    pub async fn merge(&self, candidates: &[StationCandidate]) -> CatalogResult<MergeReport> {
        let (candidates, duplicate_candidates) = collapse_duplicates(candidates);
        let mut report = MergeReport {
            duplicate_candidates,
            ..MergeReport::default()
        };

        let master: Option<Vec<StationCandidate>> = storage::read_table(&self.master_path).await?;
        let mapping: Option<Vec<MappingEntry>> = storage::read_table(&self.mapping_path).await?;

        if master.is_none() && mapping.is_none() {
            if candidates.is_empty() {
                debug!("No station candidates, catalog left uninitialized");
                return Ok(report);
            }
            return self.bootstrap(candidates, report).await;
        }

        let mut master = master.unwrap_or_default();
        let mut mapping = StationMapping::from_entries(mapping.unwrap_or_default());

        let known: HashSet<&str> = master.iter().map(|station| station.name.as_str()).collect();
        let new_stations: Vec<StationCandidate> = candidates
            .into_iter()
            .filter(|candidate| !known.contains(candidate.name.as_str()))
            .collect();

        if new_stations.is_empty() {
            info!("Station catalog up to date ({} stations)", master.len());
            return Ok(report);
        }

        for station in &new_stations {
            if mapping.id_of(&station.name).is_none() {
                let id = mapping.assign(station);
                report.assigned.push((station.name.clone(), id));
            }
        }
        report.new_stations = new_stations.len();
        master.extend(new_stations);

        report.master_written = storage::write_table(&self.master_path, &master).await?;
        report.mapping_written = storage::write_table(&self.mapping_path, mapping.entries()).await?;

        info!(
            "Station catalog: {} new stations, {} ids assigned (max id {})",
            report.new_stations,
            report.assigned.len(),
            mapping.max_id()
        );
        Ok(report)
    }

    async fn bootstrap(
        &self,
        candidates: Vec<StationCandidate>,
        mut report: MergeReport,
    ) -> CatalogResult<MergeReport> {
        let mut mapping = StationMapping::default();
        for candidate in &candidates {
            let id = mapping.assign(candidate);
            report.assigned.push((candidate.name.clone(), id));
        }

        report.bootstrapped = true;
        report.new_stations = candidates.len();
        report.master_written = storage::write_table(&self.master_path, &candidates).await?;
        report.mapping_written = storage::write_table(&self.mapping_path, mapping.entries()).await?;

        info!("Station catalog bootstrapped with {} stations", candidates.len());
        Ok(report)
    }
}

/// Collapse same-name candidates: first position, last attributes
fn collapse_duplicates(candidates: &[StationCandidate]) -> (Vec<StationCandidate>, usize) {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut collapsed: Vec<StationCandidate> = Vec::with_capacity(candidates.len());
    let mut duplicates = 0;

    for candidate in candidates {
        match positions.get(candidate.name.as_str()) {
            Some(&position) => {
                collapsed[position] = candidate.clone();
                duplicates += 1;
            }
            None => {
                positions.insert(candidate.name.as_str(), collapsed.len());
                collapsed.push(candidate.clone());
            }
        }
    }

    (collapsed, duplicates)
}
