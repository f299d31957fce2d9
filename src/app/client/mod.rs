//! Retrieval of the published archive listing
//!
//! The listing is either fetched from the remote index page or read from a
//! local file (a saved copy of the page, or text already flattened to one
//! row per line). Either way the result is plain listing text ready for
//! [`crate::app::manifest::parse_listing`].
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `listing`: Flattening of the index page table into listing rows

use std::path::Path;

use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::errors::{ListingError, ListingResult};

pub mod config;
pub mod listing;

pub use config::ClientConfig;
pub use listing::extract_listing_text;

/// HTTP client for the archive index
#[derive(Debug, Clone)]
pub struct ListingClient {
    client: Client,
}

impl ListingClient {
    /// Creates a client with default configuration
    ///
    /// # Errors
    ///
    /// Returns `ListingError` if HTTP client creation fails
    pub fn new() -> ListingResult<Self> {
        Self::with_config(&ClientConfig::default())
    }

    /// Creates a client with custom configuration
    pub fn with_config(config: &ClientConfig) -> ListingResult<Self> {
        Ok(Self {
            client: config.build_http_client()?,
        })
    }

    /// Fetch the index page and return its listing rows
    ///
    /// # Errors
    ///
    /// Returns `ListingError::InvalidUrl` for a malformed URL,
    /// `ListingError::ServerError` for a non-success status and
    /// `ListingError::Http` for transport failures.
    pub async fn fetch_listing(&self, index_url: &str) -> ListingResult<String> {
        let url = Url::parse(index_url).map_err(|e| ListingError::InvalidUrl {
            url: index_url.to_string(),
            error: e.to_string(),
        })?;

        info!("Fetching archive listing from {}", url);
        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ListingError::ServerError {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        debug!("Fetched listing page ({} bytes)", body.len());
        extract_listing_text(&body)
    }
}

/// Read listing rows from a local file (saved page or plain text)
///
/// # Errors
///
/// Returns `ListingError::ReadFile` if the file cannot be read.
pub async fn read_listing_file(path: &Path) -> ListingResult<String> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ListingError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;

    info!("Read archive listing from {}", path.display());
    extract_listing_text(&content)
}
