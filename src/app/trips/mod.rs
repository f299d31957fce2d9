//! Trip ingestion, reindexing and the trip ledger
//!
//! Monthly trip files are read as [`RawTrip`] rows, rewritten onto the
//! surrogate station ids of the catalog, and appended to the ledger.

pub mod ledger;
pub mod reader;
pub mod reindex;
pub mod types;

pub use ledger::{LedgerReport, TripLedger};
pub use reader::{discover_trip_files, read_trip_file};
pub use reindex::{reindex, ReindexOutcome, ReindexStats};
pub use types::{RawTrip, TripRecord};
