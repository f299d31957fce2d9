//! Month ranges over published archives
//!
//! Monthly archives are keyed by a leading `YYYYMM` stamp. A [`MonthRange`]
//! is validated against the published window (first month through today)
//! and is used to select manifest entries or to name the archives expected
//! for each month.

use chrono::{Datelike, Local, NaiveDate};

use super::types::ManifestEntry;
use crate::constants::listing;
use crate::errors::{ManifestError, ManifestResult};

/// Inclusive range of calendar months
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl MonthRange {
    /// Build a range validated against the current local date
    pub fn new(start: NaiveDate, end: NaiveDate) -> ManifestResult<Self> {
        Self::with_today(start, end, Local::now().date_naive())
    }

    /// Build a range validated against an explicit "today"
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::InvalidRange` if `start` precedes the first
    /// published month, `end` lies in the future, or `start` is after `end`.
    pub fn with_today(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> ManifestResult<Self> {
        let invalid = |reason: &str| ManifestError::InvalidRange {
            start: start.format("%Y-%m").to_string(),
            end: end.format("%Y-%m").to_string(),
            reason: reason.to_string(),
        };

        let first = first_published_month();
        if start < first {
            return Err(invalid("start precedes the first published month (2020-04)"));
        }
        if end > today {
            return Err(invalid("end lies in the future"));
        }
        if start > end {
            return Err(invalid("start is after end"));
        }

        Ok(Self {
            start: month_start(start),
            end: month_start(end),
        })
    }

    /// Parse `YYYY-MM` (or `YYYY-MM-DD`) bounds
    pub fn parse(start: &str, end: &str) -> ManifestResult<Self> {
        Self::new(parse_month(start, end)?, parse_month(end, start)?)
    }

    /// Every month from the first published one through the current month
    pub fn published() -> Self {
        let today = Local::now().date_naive();
        Self {
            start: first_published_month(),
            end: month_start(today),
        }
    }

    /// First month of the range
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last month of the range
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// `YYYYMM` stamps of every month in the range, ascending
    pub fn stamps(&self) -> Vec<String> {
        let mut stamps = Vec::new();
        let (mut year, mut month) = (self.start.year(), self.start.month());
        while (year, month) <= (self.end.year(), self.end.month()) {
            stamps.push(format!("{:04}{:02}", year, month));
            if month == 12 {
                year += 1;
                month = 1;
            } else {
                month += 1;
            }
        }
        stamps
    }

    /// Canonical archive names for every month in the range
    pub fn archive_names(&self) -> Vec<String> {
        self.stamps()
            .into_iter()
            .map(|stamp| format!("{}{}", stamp, listing::ARCHIVE_SUFFIX))
            .collect()
    }

    /// Check whether an entry's stamp falls inside the range
    pub fn contains(&self, entry: &ManifestEntry) -> bool {
        let Some(stamp) = entry.stamp() else {
            return false;
        };
        let (Ok(year), Ok(month)) = (stamp[..4].parse::<i32>(), stamp[4..].parse::<u32>()) else {
            return false;
        };
        (self.start.year(), self.start.month()) <= (year, month)
            && (year, month) <= (self.end.year(), self.end.month())
    }

    /// Entries of `entries` inside the range, in their original order
    pub fn select<'a>(&self, entries: &'a [ManifestEntry]) -> Vec<&'a ManifestEntry> {
        entries.iter().filter(|entry| self.contains(entry)).collect()
    }
}

fn first_published_month() -> NaiveDate {
    NaiveDate::from_ymd_opt(listing::FIRST_PUBLISHED_YEAR, listing::FIRST_PUBLISHED_MONTH, 1)
        .unwrap_or(NaiveDate::MIN)
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn parse_month(value: &str, other: &str) -> ManifestResult<NaiveDate> {
    let value = value.trim();
    let parsed = if value.len() == 7 {
        NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d")
    } else {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
    };

    parsed.map_err(|e| ManifestError::InvalidRange {
        start: value.to_string(),
        end: other.to_string(),
        reason: format!("expected YYYY-MM: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(filename: &str) -> ManifestEntry {
        ManifestEntry::new(filename, date(2020, 1, 1).and_hms_opt(0, 0, 0).unwrap(), "1 MB")
    }

    #[test]
    fn test_range_bounds_validated() {
        let today = date(2021, 6, 15);

        assert!(MonthRange::with_today(date(2020, 4, 1), date(2021, 6, 1), today).is_ok());
        assert!(matches!(
            MonthRange::with_today(date(2020, 3, 1), date(2021, 1, 1), today),
            Err(ManifestError::InvalidRange { .. })
        ));
        assert!(matches!(
            MonthRange::with_today(date(2020, 4, 1), date(2021, 7, 1), today),
            Err(ManifestError::InvalidRange { .. })
        ));
        assert!(matches!(
            MonthRange::with_today(date(2021, 1, 1), date(2020, 5, 1), today),
            Err(ManifestError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_stamps_cross_year_boundary() {
        let range =
            MonthRange::with_today(date(2020, 11, 20), date(2021, 2, 3), date(2022, 1, 1)).unwrap();

        assert_eq!(range.stamps(), vec!["202011", "202012", "202101", "202102"]);
        assert_eq!(
            range.archive_names()[0],
            "202011-divvy-tripdata.zip".to_string()
        );
    }

    #[test]
    fn test_select_by_stamp() {
        let range =
            MonthRange::with_today(date(2020, 5, 1), date(2020, 6, 1), date(2022, 1, 1)).unwrap();
        let entries = vec![
            entry("202004-divvy-tripdata.zip"),
            entry("202005-divvy-tripdata.zip"),
            entry("202006-divvy-tripdata.zip"),
            entry("Divvy_Trips_2020_Q1.zip"),
        ];

        let selected: Vec<&str> = range
            .select(&entries)
            .iter()
            .map(|e| e.filename.as_str())
            .collect();
        assert_eq!(
            selected,
            vec!["202005-divvy-tripdata.zip", "202006-divvy-tripdata.zip"]
        );
    }

    #[test]
    fn test_parse_month_strings() {
        let range = MonthRange::parse("2020-04", "2020-06").unwrap();
        assert_eq!(range.start(), date(2020, 4, 1));
        assert_eq!(range.end(), date(2020, 6, 1));

        assert!(MonthRange::parse("April", "2020-06").is_err());
    }
}
