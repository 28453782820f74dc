//! Core data types for the harvester.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

/// A single normalized job listing.
///
/// Only ever built by the normalizer or the store loader, and only when every
/// required field is present and the publication date parses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobListing {
    /// Upstream identifier. Used for diagnostics only.
    pub id: i64,

    pub title: String,

    pub company_name: String,

    pub category: String,

    /// Link back to the listing on the source site.
    pub source_url: String,

    pub publication_date: DateTime<FixedOffset>,

    /// Description as HTML, stored and rendered verbatim.
    pub description_html: String,

    /// Candidate required location (e.g. "Worldwide", "USA only").
    pub location: Option<String>,

    pub salary: Option<String>,

    /// Employment type (e.g. "full_time", "contract").
    pub job_type: Option<String>,
}

/// Optional filters for a fetch. Absent or empty values are left out of the
/// request entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub limit: Option<u32>,
}

impl JobQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query parameters in request order: `category`, `search`, `limit`.
    ///
    /// # Examples
    /// ```
    /// use remoteboard_harvester::JobQuery;
    ///
    /// let query = JobQuery::new().search("rust").limit(5);
    /// assert_eq!(
    ///     query.params(),
    ///     vec![("search", "rust".to_string()), ("limit", "5".to_string())]
    /// );
    /// ```
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            params.push(("category", category.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

/// Listings that survived validation, plus one warning per dropped record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    pub listings: Vec<JobListing>,
    pub warnings: Vec<String>,
}

impl Normalized {
    /// Number of records dropped during validation.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.warnings.len()
    }
}

/// Offset-carrying formats tried after RFC 3339.
///
/// `%#z` also accepts hour-only offsets such as `+00`.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%z",
];

/// Offset-less formats, interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parse an ISO-8601 publication date.
///
/// A trailing `Z` is rewritten to `+00:00` first. Timestamps without an offset
/// are taken to be UTC. A bare date or a date with only an hour means the
/// start of that day or hour.
///
/// # Examples
/// ```
/// use remoteboard_harvester::types::parse_publication_date;
///
/// let zulu = parse_publication_date("2023-10-26T10:00:00Z").unwrap();
/// let offset = parse_publication_date("2023-10-26T10:00:00+00:00").unwrap();
/// assert_eq!(zulu, offset);
/// assert!(parse_publication_date("invalid-date-format").is_none());
/// ```
pub fn parse_publication_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    let normalized = match raw.strip_suffix(['Z', 'z']) {
        Some(stem) => format!("{stem}+00:00"),
        None => raw.to_string(),
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(parsed);
    }

    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(&normalized, format) {
            return Some(parsed);
        }
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&normalized, format).ok())
        .or_else(|| {
            // Hour-only time, e.g. `2023-10-26T10`
            NaiveDateTime::parse_from_str(&format!("{normalized}:00"), "%Y-%m-%dT%H:%M").ok()
        })
        .or_else(|| {
            NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc().fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_zulu_equals_zero_offset() {
        let zulu = parse_publication_date("2023-10-26T10:00:00Z").unwrap();
        let offset = parse_publication_date("2023-10-26T10:00:00+00:00").unwrap();
        assert_eq!(zulu, offset);
        assert_eq!(zulu.timestamp(), offset.timestamp());
    }

    #[test]
    fn test_naive_is_utc() {
        let naive = parse_publication_date("2023-10-26T10:00:00").unwrap();
        let zulu = parse_publication_date("2023-10-26T10:00:00Z").unwrap();
        assert_eq!(naive, zulu);
    }

    #[test]
    fn test_explicit_offset_is_kept() {
        let parsed = parse_publication_date("2023-10-26T12:00:00+02:00").unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), 2 * 3600);
        assert_eq!(parsed, parse_publication_date("2023-10-26T10:00:00Z").unwrap());
    }

    #[test]
    fn test_fractional_seconds_and_space_separator() {
        let parsed = parse_publication_date("2024-01-15 08:30:45.123456").unwrap();
        assert_eq!(parsed.year(), 2024);
        assert_eq!(parsed.hour(), 8);
        assert_eq!(parsed.second(), 45);
        assert_eq!(parsed.nanosecond(), 123_456_000);
    }

    #[test]
    fn test_date_only_is_utc_midnight() {
        let parsed = parse_publication_date("2023-10-26").unwrap();
        assert_eq!(parsed, parse_publication_date("2023-10-26T00:00:00Z").unwrap());
        assert_eq!(parsed.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_hour_only_time() {
        let parsed = parse_publication_date("2023-10-26T10").unwrap();
        assert_eq!(parsed, parse_publication_date("2023-10-26T10:00:00Z").unwrap());
    }

    #[test]
    fn test_offsets_without_colon() {
        let expected = parse_publication_date("2023-10-26T10:00:00+00:00").unwrap();
        assert_eq!(parse_publication_date("2023-10-26T10:00:00+0000").unwrap(), expected);
        assert_eq!(parse_publication_date("2023-10-26T10:00:00+00").unwrap(), expected);

        let shifted = parse_publication_date("2023-10-26T12:00:00.5+0200").unwrap();
        assert_eq!(shifted.offset().local_minus_utc(), 2 * 3600);
        assert_eq!(shifted.timestamp(), expected.timestamp());
    }

    #[test]
    fn test_invalid_dates() {
        assert!(parse_publication_date("").is_none());
        assert!(parse_publication_date("invalid-date-format").is_none());
        assert!(parse_publication_date("2023-13-01T00:00:00").is_none());
        assert!(parse_publication_date("26/10/2023").is_none());
    }

    #[test]
    fn test_query_params_skip_absent_and_empty() {
        assert!(JobQuery::new().params().is_empty());

        let query = JobQuery {
            category: Some(String::new()),
            search: Some("python".to_string()),
            limit: Some(0),
        };
        assert_eq!(
            query.params(),
            vec![
                ("search", "python".to_string()),
                ("limit", "0".to_string())
            ]
        );
    }

    #[test]
    fn test_normalized_skipped() {
        let normalized = Normalized {
            listings: Vec::new(),
            warnings: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(normalized.skipped(), 2);
    }
}
