//! Rewriting trips onto surrogate station ids

use tracing::info;

use super::types::{RawTrip, TripRecord};
use crate::app::catalog::StationMapping;

/// Counters for one reindex pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReindexStats {
    pub input: usize,
    pub reindexed: usize,
    /// Missing ride id, rideable type or a timestamp
    pub incomplete: usize,
    /// Start station has no id (counted here even if the end is unresolved too)
    pub unresolved_start: usize,
    pub unresolved_end: usize,
}

impl ReindexStats {
    pub fn dropped(&self) -> usize {
        self.incomplete + self.unresolved_start + self.unresolved_end
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReindexOutcome {
    pub records: Vec<TripRecord>,
    pub stats: ReindexStats,
}

/// Replace station names with their mapped ids, dropping trips that cannot be resolved
pub fn reindex(trips: &[RawTrip], mapping: &StationMapping) -> ReindexOutcome {
    let mut stats = ReindexStats::default();
    let mut records = Vec::with_capacity(trips.len());

    for trip in trips {
        stats.input += 1;

        let (Some(ride_id), Some(rideable_type), Some(started_at), Some(ended_at)) = (
            trip.ride_id.as_ref(),
            trip.rideable_type.as_ref(),
            trip.started_at,
            trip.ended_at,
        ) else {
            stats.incomplete += 1;
            continue;
        };

        let from = lookup(mapping, trip.start_station_name.as_deref());
        let to = lookup(mapping, trip.end_station_name.as_deref());

        match (from, to) {
            (Some(from_station_id), Some(to_station_id)) => {
                records.push(TripRecord {
                    ride_id: ride_id.clone(),
                    rideable_type: rideable_type.clone(),
                    from_station_id,
                    to_station_id,
                    started_at,
                    ended_at,
                });
                stats.reindexed += 1;
            }
            (None, _) => stats.unresolved_start += 1,
            (Some(_), None) => stats.unresolved_end += 1,
        }
    }

    info!(
        "Reindexed {} of {} trips ({} incomplete, {} unresolved start, {} unresolved end)",
        stats.reindexed, stats.input, stats.incomplete, stats.unresolved_start, stats.unresolved_end
    );
    ReindexOutcome { records, stats }
}

fn lookup(mapping: &StationMapping, name: Option<&str>) -> Option<u32> {
    mapping.id_of(name?.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::catalog::{MappingEntry, StationCandidate};
    use chrono::NaiveDateTime;

    fn mapping(names: &[(&str, u32)]) -> StationMapping {
        StationMapping::from_entries(
            names
                .iter()
                .map(|(name, id)| {
                    MappingEntry::new(
                        *id,
                        &StationCandidate {
                            name: name.to_string(),
                            lat: 0.0,
                            lng: 0.0,
                            state: String::new(),
                            primary_neighborhood: String::new(),
                            secondary_neighborhood: String::new(),
                        },
                    )
                })
                .collect(),
        )
    }

    fn trip(id: &str, from: Option<&str>, to: Option<&str>) -> RawTrip {
        let at = NaiveDateTime::parse_from_str("2020-04-01 10:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        RawTrip {
            ride_id: Some(id.to_string()),
            rideable_type: Some("docked_bike".to_string()),
            started_at: Some(at),
            ended_at: Some(at),
            start_station_name: from.map(String::from),
            end_station_name: to.map(String::from),
            ..RawTrip::default()
        }
    }

    #[test]
    fn test_resolved_pair_and_unresolved_end() {
        let mapping = mapping(&[("A", 1), ("B", 2)]);
        let outcome = reindex(
            &[trip("r1", Some("A"), Some("B")), trip("r2", Some("A"), Some("C"))],
            &mapping,
        );

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].ride_id, "r1");
        assert_eq!(outcome.records[0].from_station_id, 1);
        assert_eq!(outcome.records[0].to_station_id, 2);
        assert_eq!(outcome.stats.unresolved_end, 1);
        assert_eq!(outcome.stats.unresolved_start, 0);
    }

    #[test]
    fn test_drop_reasons_counted_separately() {
        let mapping = mapping(&[("A", 1)]);
        let mut incomplete = trip("r3", Some("A"), Some("A"));
        incomplete.ended_at = None;

        let outcome = reindex(
            &[
                trip("r1", Some("X"), Some("A")),
                trip("r2", None, Some("Y")),
                incomplete,
                trip("r4", Some("A"), None),
            ],
            &mapping,
        );

        assert!(outcome.records.is_empty());
        assert_eq!(outcome.stats.input, 4);
        assert_eq!(outcome.stats.unresolved_start, 2);
        assert_eq!(outcome.stats.incomplete, 1);
        assert_eq!(outcome.stats.unresolved_end, 1);
        assert_eq!(outcome.stats.dropped(), 4);
    }
}
