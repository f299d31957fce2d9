//! Listing row validation and parsing
//!
//! The remote index renders one archive per line, for example:
//!
//! ```text
//! 202004-divvy-tripdata.zip Apr 1st 2020, 10:00:00 am 12.34 MB ZIP file
//! ```
//!
//! Lines that do not look like an archive entry (headers, non-archive files,
//! legacy quarterly files without a YYYYMM prefix) are dropped by
//! [`is_valid_row`] and only show up in [`ListingStats`].

use chrono::NaiveDateTime;
use tracing::debug;

use super::types::{ListingStats, ManifestEntry};
use crate::constants::listing;
use crate::errors::{ManifestError, ManifestResult};

/// Fields a valid row must provide: name, 3 date tokens, 2 time tokens, 2 size tokens
const MIN_FIELDS: usize = 8;

/// Check whether a listing line is an archive entry worth parsing
pub fn is_valid_row(row: &str) -> bool {
    if row.chars().count() < listing::MIN_ROW_LENGTH {
        return false;
    }
    if !row.contains(listing::ARCHIVE_MARKER) {
        return false;
    }

    row.chars()
        .take(listing::STAMP_LENGTH)
        .all(|c| c.is_ascii_digit())
}

/// Parse a row that passed [`is_valid_row`] into a manifest entry
///
/// # Errors
///
/// Returns `ManifestError::Parse` if the positional fields do not follow the
/// `name Mon Dth YYYY, hh:mm:ss am|pm size unit` layout.
pub fn parse_row(row: &str) -> ManifestResult<ManifestEntry> {
    let tokens: Vec<&str> = row.split_whitespace().collect();
    if tokens.len() < MIN_FIELDS {
        return Err(parse_error(
            row,
            format!("expected at least {} fields, found {}", MIN_FIELDS, tokens.len()),
        ));
    }

    let filename = tokens[0];
    let month = tokens[1];
    let day = tokens[2].trim_end_matches(|c: char| c.is_ascii_alphabetic());
    let year = tokens[3].trim_end_matches(',');
    let hour_minute = strip_seconds(tokens[4])
        .ok_or_else(|| parse_error(row, format!("invalid time '{}'", tokens[4])))?;
    let meridiem = tokens[5].to_ascii_uppercase();

    let composed = format!("{} {} {} {}{}", month, day, year, hour_minute, meridiem);
    let last_modified = NaiveDateTime::parse_from_str(&composed, listing::TIMESTAMP_FORMAT)
        .map_err(|e| parse_error(row, format!("invalid timestamp '{}': {}", composed, e)))?;

    let size = tokens[6..MIN_FIELDS].join(" ");

    Ok(ManifestEntry::new(filename, last_modified, size))
}

/// Parse every valid row of a listing, silently skipping the rest
///
/// # Errors
///
/// Returns `ManifestError::Parse` if a row passes validation but cannot be
/// parsed.
pub fn parse_listing(text: &str) -> ManifestResult<(Vec<ManifestEntry>, ListingStats)> {
    let mut stats = ListingStats::default();
    let mut entries = Vec::new();

    for line in text.lines() {
        stats.lines_processed += 1;
        let line = line.trim();

        if line.is_empty() {
            stats.empty_lines += 1;
            continue;
        }
        if !is_valid_row(line) {
            debug!("Skipping listing line: {}", line);
            stats.skipped_lines += 1;
            continue;
        }

        entries.push(parse_row(line)?);
        stats.valid_entries += 1;
    }

    Ok((entries, stats))
}

/// "10:00:00" -> "10:00"
fn strip_seconds(time: &str) -> Option<String> {
    let parts: Vec<&str> = time.split(':').collect();
    if parts.len() < 2 || parts.iter().any(|part| part.is_empty()) {
        return None;
    }
    Some(parts[..parts.len() - 1].join(":"))
}

fn parse_error(row: &str, reason: String) -> ManifestError {
    ManifestError::Parse {
        row: row.to_string(),
        reason,
    }
}
