//! Bikeshare Sync Library
//!
//! Incremental synchronizer for public bike-share trip data. Tracks the
//! published monthly archives in a local manifest, archives superseded trip
//! files, and derives a stable station catalog and trip ledger.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;

// Re-export commonly used types for convenience
pub use config::AppConfig;
pub use errors::{AppError, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use constants::*;

    #[test]
    fn test_constants_accessible() {
        assert_eq!(files::MANIFEST_FILE_NAME, "zipfile_metadata.csv");
        assert_eq!(listing::MIN_ROW_LENGTH, 67);
        assert!(http::USER_AGENT.contains("Bikeshare-Sync"));
    }

    #[test]
    fn test_error_types() {
        let manifest_error = errors::ManifestError::NotInitialized {
            path: "zipfile_metadata.csv".into(),
        };
        let app_error = AppError::Manifest(manifest_error);

        assert_eq!(app_error.category(), "manifest");
        assert!(!app_error.is_recoverable());
    }
}
