//! Derivation of enriched station candidates from raw trips
//!
//! Every trip observes two stations: where it started and where it ended.
//! The builder projects those observations, keeps the most recent one per
//! station name, and enriches it with the enclosing region and neighborhood.
//! Stations outside the target region, or outside every neighborhood, are
//! dropped and counted.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDateTime;

use super::boundaries::BoundaryLayer;
use super::stats::BuildStats;
use super::types::StationCandidate;
use crate::app::trips::RawTrip;

/// Which end of a trip a station observation comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    Start,
    End,
}

/// Candidates plus the counters explaining what was dropped
#[derive(Debug, Clone, Default)]
pub struct BuildOutcome {
    pub candidates: Vec<StationCandidate>,
    pub stats: BuildStats,
}

/// A complete station observation
#[derive(Debug, Clone)]
struct Observation<'a> {
    name: &'a str,
    lat: f64,
    lng: f64,
    observed_at: NaiveDateTime,
}

impl<'a> Observation<'a> {
    fn project(trip: &'a RawTrip, leg: Leg) -> Option<Self> {
        let (name, lat, lng, observed_at) = match leg {
            Leg::Start => (
                trip.start_station_name.as_deref(),
                trip.start_lat,
                trip.start_lng,
                trip.started_at,
            ),
            Leg::End => (
                trip.end_station_name.as_deref(),
                trip.end_lat,
                trip.end_lng,
                trip.ended_at,
            ),
        };

        let name = name.map(str::trim).filter(|name| !name.is_empty())?;
        Some(Self {
            name,
            lat: lat?,
            lng: lng?,
            observed_at: observed_at?,
        })
    }
}

/// Builds station candidates using injected region and neighborhood layers
#[derive(Clone)]
pub struct StationCatalogBuilder {
    regions: Arc<dyn BoundaryLayer>,
    neighborhoods: Arc<dyn BoundaryLayer>,
    target_region: String,
}

impl StationCatalogBuilder {
    pub fn new(
        regions: Arc<dyn BoundaryLayer>,
        neighborhoods: Arc<dyn BoundaryLayer>,
        target_region: impl Into<String>,
    ) -> Self {
        Self {
            regions,
            neighborhoods,
            target_region: target_region.into(),
        }
    }

    pub fn target_region(&self) -> &str {
        &self.target_region
    }

    /// Build candidates from a single leg of every trip
    pub fn build_leg(&self, trips: &[RawTrip], leg: Leg) -> BuildOutcome {
        self.build_from(trips.iter().map(|trip| Observation::project(trip, leg)))
    }

    /// Build candidates from both legs combined
    ///
    /// A station's representative point is its most recent observation
    /// across starts and ends.
    pub fn build(&self, trips: &[RawTrip]) -> BuildOutcome {
        let starts = trips.iter().map(|trip| Observation::project(trip, Leg::Start));
        let ends = trips.iter().map(|trip| Observation::project(trip, Leg::End));
        self.build_from(starts.chain(ends))
    }

    fn build_from<'a>(
        &self,
        observations: impl Iterator<Item = Option<Observation<'a>>>,
    ) -> BuildOutcome {
        let mut stats = BuildStats::new();

        let mut complete: Vec<Observation<'a>> = Vec::new();
        for observation in observations {
            stats.input_observations += 1;
            match observation {
                Some(observation) => complete.push(observation),
                None => stats.missing_values += 1,
            }
        }

        // Stable: equal timestamps keep input order, so "last" stays well defined
        complete.sort_by_key(|observation| observation.observed_at);
        let latest = keep_last_per_name(complete, &mut stats);

        let mut candidates = Vec::with_capacity(latest.len());
        for observation in latest {
            let in_target = self
                .regions
                .locate(observation.lat, observation.lng)
                .filter(|region| region.name == self.target_region);
            let Some(region) = in_target else {
                stats.outside_region += 1;
                continue;
            };

            let Some(neighborhood) = self.neighborhoods.locate(observation.lat, observation.lng)
            else {
                stats.outside_neighborhoods += 1;
                continue;
            };

            candidates.push(StationCandidate {
                name: observation.name.to_string(),
                lat: observation.lat,
                lng: observation.lng,
                state: region.name.clone(),
                primary_neighborhood: neighborhood.name.clone(),
                secondary_neighborhood: neighborhood.secondary_name.clone().unwrap_or_default(),
            });
        }

        stats.log_summary();
        BuildOutcome { candidates, stats }
    }
}

/// Dedup by name keeping the last occurrence, preserving relative order
fn keep_last_per_name<'a>(
    sorted: Vec<Observation<'a>>,
    stats: &mut BuildStats,
) -> Vec<Observation<'a>> {
    let mut seen = HashSet::new();
    let mut latest: Vec<Observation<'a>> = Vec::with_capacity(sorted.len());

    for observation in sorted.into_iter().rev() {
        if seen.insert(observation.name) {
            latest.push(observation);
        } else {
            stats.duplicates_collapsed += 1;
        }
    }

    latest.reverse();
    latest
}
