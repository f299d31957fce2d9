//! Extraction of listing text from the index page
//!
//! The index renders one `<tr>` per published object inside
//! `#tbody-content`. Each row is flattened into one line, cells separated by
//! a single space, which yields the
//! `name Mon Dth YYYY, hh:mm:ss am size unit type` lines the manifest parser
//! expects.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::constants::listing;
use crate::errors::{ListingError, ListingResult};

/// Flatten the listing table of an index page into newline-separated rows
///
/// Input without a listing table is treated as already-extracted text and
/// returned unchanged.
///
/// # Errors
///
/// Returns `ListingError::HtmlParsing` if the row selectors are invalid.
pub fn extract_listing_text(document_text: &str) -> ListingResult<String> {
    if !document_text.contains(listing::TABLE_BODY_ID) {
        debug!("No listing table found, using input as plain listing text");
        return Ok(document_text.to_string());
    }

    let document = Html::parse_document(document_text);
    let row_selector = selector(listing::ROW_SELECTOR)?;
    let cell_selector = selector(listing::CELL_SELECTOR)?;

    let rows: Vec<String> = document
        .select(&row_selector)
        .map(|row| flatten_row(row, &cell_selector))
        .filter(|line| !line.is_empty())
        .collect();

    debug!("Extracted {} listing rows", rows.len());
    Ok(rows.join("\n"))
}

fn flatten_row(row: ElementRef<'_>, cell_selector: &Selector) -> String {
    let cells: Vec<String> = row
        .select(cell_selector)
        .map(|cell| normalize_whitespace(&cell.text().collect::<String>()))
        .filter(|text| !text.is_empty())
        .collect();

    if cells.is_empty() {
        normalize_whitespace(&row.text().collect::<String>())
    } else {
        cells.join(" ")
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn selector(css: &str) -> ListingResult<Selector> {
    Selector::parse(css).map_err(|e| ListingError::HtmlParsing {
        reason: format!("invalid selector '{}': {}", css, e),
    })
}
