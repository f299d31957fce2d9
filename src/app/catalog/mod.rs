//! Station catalog derived from trip data
//!
//! Trip files name their stations but carry no stable station key. This
//! module derives one: stations observed in trips are enriched with their
//! region and neighborhood, appended to a master table the first time their
//! name is seen, and given a surrogate id that never changes afterwards.
//!
//! # Module Organization
//!
//! - [`types`] - StationCandidate, MappingEntry and the StationMapping lookup
//! - [`boundaries`] - BoundaryLayer trait and the GeoJSON-backed layer
//! - [`builder`] - Projection, dedup and geographic filtering of observations
//! - [`merger`] - Persisted master table and id assignment
//! - [`stats`] - Counters for dropped observations
//! - [`tests`] - Integration tests for repeated merges

pub mod boundaries;
pub mod builder;
pub mod merger;
pub mod stats;
pub mod types;

#[cfg(test)]
pub mod tests;

pub use boundaries::{Boundary, BoundaryLayer, GeoJsonLayer, Polygon};
pub use builder::{BuildOutcome, Leg, StationCatalogBuilder};
pub use merger::{MergeReport, StationCatalog};
pub use stats::BuildStats;
pub use types::{MappingEntry, StationCandidate, StationMapping};
