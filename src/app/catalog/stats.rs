//! Counters for rows dropped while building and merging the catalog

use tracing::info;

/// Statistics about one catalog build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Station observations projected from the trips
    pub input_observations: usize,
    /// Observations with a missing name, coordinate or timestamp
    pub missing_values: usize,
    /// Older observations of a name collapsed into the latest one
    pub duplicates_collapsed: usize,
    /// Stations outside the target region (or outside every region)
    pub outside_region: usize,
    /// Stations outside every neighborhood
    pub outside_neighborhoods: usize,
}

impl BuildStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stations dropped by a policy filter (missing values are not stations yet)
    pub fn stations_dropped(&self) -> usize {
        self.outside_region + self.outside_neighborhoods
    }

    /// Unique stations that reached the region filter
    pub fn unique_stations(&self) -> usize {
        self.input_observations - self.missing_values - self.duplicates_collapsed
    }

    /// Percentage of unique stations that survived both geographic filters
    pub fn retention_rate(&self) -> f64 {
        let unique = self.unique_stations();
        if unique == 0 {
            0.0
        } else {
            ((unique - self.stations_dropped()) as f64 / unique as f64) * 100.0
        }
    }

    pub fn log_summary(&self) {
        info!(
            "Station build: {} observations, {} missing values, {} duplicates collapsed, \
             {} outside region, {} outside neighborhoods ({:.1}% of stations kept)",
            self.input_observations,
            self.missing_values,
            self.duplicates_collapsed,
            self.outside_region,
            self.outside_neighborhoods,
            self.retention_rate()
        );
    }
}
