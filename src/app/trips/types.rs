//! Trip rows as read from monthly files and as written to the ledger

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::app::storage::timestamp;

/// One row of a monthly trip file
///
/// Every field is optional: empty cells are common in the published data
/// and are filtered downstream, where the drop can be counted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTrip {
    pub ride_id: Option<String>,
    pub rideable_type: Option<String>,
    #[serde(with = "timestamp::optional")]
    pub started_at: Option<NaiveDateTime>,
    #[serde(with = "timestamp::optional")]
    pub ended_at: Option<NaiveDateTime>,
    pub start_station_name: Option<String>,
    pub start_station_id: Option<String>,
    pub end_station_name: Option<String>,
    pub end_station_id: Option<String>,
    pub start_lat: Option<f64>,
    pub start_lng: Option<f64>,
    pub end_lat: Option<f64>,
    pub end_lng: Option<f64>,
    pub member_casual: Option<String>,
}

/// One row of the reindexed trip ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRecord {
    pub ride_id: String,
    pub rideable_type: String,
    pub from_station_id: u32,
    pub to_station_id: u32,
    #[serde(with = "timestamp")]
    pub started_at: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub ended_at: NaiveDateTime,
}
