//! Station catalog data structures

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One enriched station, as produced by the builder and stored in the master table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationCandidate {
    #[serde(rename = "station_name")]
    pub name: String,
    #[serde(rename = "latitude")]
    pub lat: f64,
    #[serde(rename = "longitude")]
    pub lng: f64,
    pub state: String,
    pub primary_neighborhood: String,
    #[serde(default)]
    pub secondary_neighborhood: String,
}

/// Row of the station mapping table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingEntry {
    #[serde(rename = "ID")]
    pub id: u32,
    pub station_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl MappingEntry {
    pub fn new(id: u32, station: &StationCandidate) -> Self {
        Self {
            id,
            station_name: station.name.clone(),
            latitude: station.lat,
            longitude: station.lng,
        }
    }
}

/// Station name to surrogate id lookup
///
/// Ids are handed out as `max + 1` and never change once assigned.
#[derive(Debug, Clone, Default)]
pub struct StationMapping {
    entries: Vec<MappingEntry>,
    index: HashMap<String, u32>,
}

impl StationMapping {
    pub fn from_entries(entries: Vec<MappingEntry>) -> Self {
        let index = entries
            .iter()
            .map(|entry| (entry.station_name.clone(), entry.id))
            .collect();
        Self { entries, index }
    }

    /// Surrogate id of a station name
    pub fn id_of(&self, station_name: &str) -> Option<u32> {
        self.index.get(station_name).copied()
    }

    /// Largest id handed out so far (0 when empty)
    pub fn max_id(&self) -> u32 {
        self.entries.iter().map(|entry| entry.id).max().unwrap_or(0)
    }

    /// Give `station` the next id unless its name already has one
    pub fn assign(&mut self, station: &StationCandidate) -> u32 {
        if let Some(id) = self.id_of(&station.name) {
            return id;
        }
        let id = self.max_id() + 1;
        self.index.insert(station.name.clone(), id);
        self.entries.push(MappingEntry::new(id, station));
        id
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(name: &str) -> StationCandidate {
        StationCandidate {
            name: name.to_string(),
            lat: 41.88,
            lng: -87.63,
            state: "Illinois".to_string(),
            primary_neighborhood: "Loop".to_string(),
            secondary_neighborhood: "Loop".to_string(),
        }
    }

    #[test]
    fn test_next_id_follows_max_not_count() {
        let mut mapping = StationMapping::from_entries(vec![
            MappingEntry::new(1, &station("A")),
            MappingEntry::new(7, &station("B")),
        ]);

        assert_eq!(mapping.max_id(), 7);
        assert_eq!(mapping.assign(&station("C")), 8);
        assert_eq!(mapping.assign(&station("A")), 1);
        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping.id_of("C"), Some(8));
        assert_eq!(mapping.id_of("D"), None);
    }

    #[test]
    fn test_empty_mapping_starts_at_one() {
        let mut mapping = StationMapping::default();
        assert!(mapping.is_empty());
        assert_eq!(mapping.assign(&station("A")), 1);
    }
}
