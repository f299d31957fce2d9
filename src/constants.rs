//! Application constants for Bikeshare Sync
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain.

use std::time::Duration;

/// Remote listing of published trip archives
pub mod listing {
    /// Index page listing every published archive
    pub const INDEX_URL: &str = "https://divvy-tripdata.s3.amazonaws.com/index.html";

    /// Base URL that archive filenames are appended to
    pub const DOWNLOAD_BASE_URL: &str = "https://divvy-tripdata.s3.amazonaws.com";

    /// Element id of the table body holding the listing rows
    pub const TABLE_BODY_ID: &str = "tbody-content";

    /// CSS selector for listing rows
    pub const ROW_SELECTOR: &str = "#tbody-content tr";

    /// CSS selector for cells inside a listing row
    pub const CELL_SELECTOR: &str = "td";

    /// Rows shorter than this cannot hold a full entry
    pub const MIN_ROW_LENGTH: usize = 67;

    /// Substring marking a row as an archive entry
    pub const ARCHIVE_MARKER: &str = ".zip";

    /// Leading digits encoding the YYYYMM stamp of an entry
    pub const STAMP_LENGTH: usize = 6;

    /// Timestamp grammar after tokens have been normalized
    pub const TIMESTAMP_FORMAT: &str = "%b %d %Y %I:%M%p";

    /// Suffix shared by every monthly trip archive
    pub const ARCHIVE_SUFFIX: &str = "-divvy-tripdata.zip";

    /// First month with published trips in the current schema
    pub const FIRST_PUBLISHED_YEAR: i32 = 2020;

    /// Month of `FIRST_PUBLISHED_YEAR` with the first published trips
    pub const FIRST_PUBLISHED_MONTH: u32 = 4;
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = "Bikeshare-Sync/0.1.0 (Trip Data Pipeline)";

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
}

/// On-disk layout below the data root
pub mod files {
    /// Manifest table, stored directly in the data root
    pub const MANIFEST_FILE_NAME: &str = "zipfile_metadata.csv";

    /// Directory of extracted monthly trip files, one sub-directory per year
    pub const RAW_DIR: &str = "raw";

    /// Directory receiving superseded trip files
    pub const ARCHIVE_DIR: &str = "archive";

    /// Directory of derived tables
    pub const PROCESSED_DIR: &str = "processed";

    /// Master station table
    pub const MASTER_STATIONS_FILE_NAME: &str = "original_station_mapping.csv";

    /// Station name to surrogate id table
    pub const STATION_MAPPING_FILE_NAME: &str = "new_station_mapping.csv";

    /// Reindexed trip ledger
    pub const TRIP_LEDGER_FILE_NAME: &str = "rides.csv";

    /// Extension of extracted trip files
    pub const TRIP_FILE_EXTENSION: &str = "csv";

    /// Temporary file suffix for atomic operations
    pub const TEMP_FILE_SUFFIX: &str = ".tmp";
}

/// Persisted table formats
pub mod tables {
    /// Timestamp format for every timestamp column on disk
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
}

/// Geographic enrichment defaults
pub mod geo {
    /// Region every kept station must fall inside
    pub const DEFAULT_TARGET_REGION: &str = "Illinois";

    /// Region boundary layer file inside the processed directory
    pub const REGION_BOUNDARIES_FILE_NAME: &str = "us_states.geojson";

    /// Neighborhood boundary layer file inside the processed directory
    pub const NEIGHBORHOOD_BOUNDARIES_FILE_NAME: &str = "chicago_neighborhoods.geojson";

    /// Property holding a region's name
    pub const REGION_NAME_PROPERTY: &str = "NAME";

    /// Property holding a neighborhood's primary name
    pub const PRIMARY_NEIGHBORHOOD_PROPERTY: &str = "pri_neigh";

    /// Property holding a neighborhood's secondary name
    pub const SECONDARY_NEIGHBORHOOD_PROPERTY: &str = "sec_neigh";
}

/// Logging constants
pub mod logging {
    /// Default log level
    pub const DEFAULT_LOG_LEVEL: &str = "info";
}

/// Configuration file locations
pub mod config {
    /// Directory name under the user config directory
    pub const APP_DIR_NAME: &str = "bikeshare-sync";

    /// Project-local configuration file
    pub const LOCAL_CONFIG_FILE: &str = "./bikeshare-sync.toml";
}

// Re-export commonly used constants for convenience
pub use files::{MANIFEST_FILE_NAME, TEMP_FILE_SUFFIX};
pub use http::{DEFAULT_TIMEOUT as HTTP_TIMEOUT, USER_AGENT};
pub use listing::{ARCHIVE_MARKER, MIN_ROW_LENGTH};
