//! Error types for Bikeshare Sync
//!
//! This module defines the error types for every component of the pipeline.
//! Each component owns an error enum; `AppError` wraps all of them for the
//! command-line layer.
//!
//! Rows dropped by policy (malformed listing lines, stations outside the
//! service area, trips with unresolved stations) are never errors. They are
//! reported through the statistics types of the component that dropped them.

use std::path::PathBuf;
use thiserror::Error;

/// Listing retrieval errors
#[derive(Error, Debug)]
pub enum ListingError {
    /// HTTP request failed
    #[error("HTTP request for listing failed")]
    Http(#[from] reqwest::Error),

    /// Server returned error status
    #[error("Listing server error: HTTP {status}")]
    ServerError { status: u16 },

    /// Invalid URL provided
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// Listing file could not be read
    #[error("Failed to read listing file: {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// HTML listing could not be interpreted
    #[error("HTML parsing failed: {reason}")]
    HtmlParsing { reason: String },
}

/// Manifest parsing and synchronization errors
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The manifest table has never been written
    #[error(
        "Manifest table not found: {path}. Run 'manifest sync' first to populate it"
    )]
    NotInitialized { path: PathBuf },

    /// A row passed validation but could not be parsed positionally
    #[error("Failed to parse listing row '{row}': {reason}")]
    Parse { row: String, reason: String },

    /// Requested month range is outside the published range
    #[error("Invalid month range {start} to {end}: {reason}")]
    InvalidRange {
        start: String,
        end: String,
        reason: String,
    },

    /// Table persistence failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Archiving a stale artifact failed
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

/// Artifact archiving errors
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Archive directory could not be created or listed
    #[error("Archive directory not accessible: {path}")]
    DirectoryNotAccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Filename has no usable stem
    #[error("Cannot archive file with invalid name: {name}")]
    InvalidFilename { name: String },

    /// Moving the artifact into the archive failed
    #[error("Failed to move {from} to {to}")]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Persisted table errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O error on a table file
    #[error("I/O error on table {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV encoding or decoding failed
    #[error("CSV error in table {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Atomic file operation failed
    #[error("Atomic file operation failed: could not rename {temp_path} to {final_path}")]
    AtomicOperationFailed {
        temp_path: PathBuf,
        final_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Geographic boundary layer errors
#[derive(Error, Debug)]
pub enum BoundaryError {
    /// Boundary file could not be read
    #[error("Failed to read boundary layer: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// GeoJSON could not be decoded
    #[error("Invalid GeoJSON in boundary layer")]
    Json(#[from] serde_json::Error),

    /// Geometry type or coordinates are unusable
    #[error("Invalid boundary geometry: {reason}")]
    InvalidGeometry { reason: String },

    /// Feature lacks the configured name property
    #[error("Boundary feature is missing property '{property}'")]
    MissingProperty { property: String },
}

/// Station catalog errors
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog tables have never been written
    #[error(
        "Station catalog not found: {path}. Process at least one trip file first to populate it"
    )]
    NotInitialized { path: PathBuf },

    /// Table persistence failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Boundary layer failed to load
    #[error(transparent)]
    Boundary(#[from] BoundaryError),
}

/// Trip ingestion and ledger errors
#[derive(Error, Debug)]
pub enum TripError {
    /// Trip directory could not be scanned
    #[error("Failed to scan trip directory: {path}")]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Table persistence failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration file could not be read or written
    #[error("Configuration file I/O failed: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// Could not locate a configuration directory
    #[error("Could not determine user config directory")]
    NoConfigDirectory,
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Listing retrieval error
    #[error(transparent)]
    Listing(#[from] ListingError),

    /// Manifest error
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Archive error
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// Storage error
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Boundary layer error
    #[error(transparent)]
    Boundary(#[from] BoundaryError),

    /// Catalog error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Trip error
    #[error(transparent)]
    Trip(#[from] TripError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if the error is recoverable (transient)
    ///
    /// Nothing in the pipeline retries on its own; this only tells the
    /// caller whether re-running the command may succeed unchanged.
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Listing(ListingError::Http(_))
            | AppError::Listing(ListingError::ServerError { .. }) => true,

            AppError::Manifest(ManifestError::NotInitialized { .. })
            | AppError::Catalog(CatalogError::NotInitialized { .. })
            | AppError::Manifest(ManifestError::Parse { .. })
            | AppError::Config(ConfigError::InvalidFormat(_)) => false,

            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Listing(_) => "listing",
            AppError::Manifest(_) => "manifest",
            AppError::Archive(_) => "archive",
            AppError::Storage(_) => "storage",
            AppError::Boundary(_) => "boundary",
            AppError::Catalog(_) => "catalog",
            AppError::Trip(_) => "trips",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Listing result type alias
pub type ListingResult<T> = std::result::Result<T, ListingError>;

/// Manifest result type alias
pub type ManifestResult<T> = std::result::Result<T, ManifestError>;

/// Archive result type alias
pub type ArchiveResult<T> = std::result::Result<T, ArchiveError>;

/// Storage result type alias
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Boundary result type alias
pub type BoundaryResult<T> = std::result::Result<T, BoundaryError>;

/// Catalog result type alias
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Trip result type alias
pub type TripResult<T> = std::result::Result<T, TripError>;

/// Config result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
