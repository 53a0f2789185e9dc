//! Event feed ingestion
//!
//! Parses the JSON feed document and validates each record once, at load
//! time. Records missing a required field or carrying an unparseable
//! timestamp are rejected individually; the rest keep their feed order.

use crate::types::{Book, Event, FilterError, Location, Registration, Result, Timestamp};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

/// Top-level feed document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedDocument {
    /// When the feed was generated (as written by the producer)
    #[serde(default)]
    pub generated_at: Option<String>,
    /// Event count reported by the producer
    #[serde(default)]
    pub total_events: Option<u64>,
    /// Number of libraries fetched successfully by the producer
    #[serde(default)]
    pub total_libraries: Option<u64>,
    /// Raw event records; an absent field is an empty list
    #[serde(default)]
    pub events: Vec<RawEvent>,
}

/// An event record exactly as it appears in the feed, before validation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawEvent {
    pub id: Option<String>,
    pub title: Option<String>,
    pub library: Option<String>,
    pub library_slug: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub image: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_virtual: bool,
    pub location: Option<Location>,
    pub registration: Option<Registration>,
    pub categories: Option<Vec<String>>,
    pub book: Option<Book>,
    pub state: Option<String>,
    pub state_full: Option<String>,
    pub city: Option<String>,
}

/// A record that failed validation
#[derive(Debug)]
pub struct RejectedRecord {
    /// Position of the record in the feed
    pub index: usize,
    /// Why it was rejected
    pub error: FilterError,
}

/// Result of ingesting a feed: validated events plus rejected records
#[derive(Debug, Default)]
pub struct FeedLoad {
    pub events: Vec<Event>,
    pub rejected: Vec<RejectedRecord>,
}

impl FeedDocument {
    /// Parse a feed document from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate every record, splitting them into accepted and rejected
    pub fn into_load(self) -> FeedLoad {
        let mut load = FeedLoad::default();

        for (index, raw) in self.events.into_iter().enumerate() {
            match Event::try_from_raw(raw, index) {
                Ok(event) => load.events.push(event),
                Err(error) => {
                    log::warn!("Rejecting feed record #{}: {}", index, error);
                    load.rejected.push(RejectedRecord { index, error });
                }
            }
        }

        log::debug!(
            "Feed validated: {} accepted, {} rejected",
            load.events.len(),
            load.rejected.len()
        );
        load
    }
}

/// Parse and validate a feed in one step
pub fn parse_feed(json: &str) -> Result<FeedLoad> {
    Ok(FeedDocument::from_json(json)?.into_load())
}

impl Event {
    /// Validate a raw feed record
    ///
    /// `index` names the record in errors when it has no usable id.
    pub fn try_from_raw(raw: RawEvent, index: usize) -> Result<Event> {
        let record = match non_blank(raw.id.as_deref()) {
            Some(id) => format!("{id:?}"),
            None => format!("#{index}"),
        };

        let id = require(raw.id, "id", &record)?;
        let title = require(raw.title, "title", &record)?;
        let library = require(raw.library, "library", &record)?;
        let description = require(raw.description, "description", &record)?;
        let start_date = parse_optional_timestamp(raw.start_date, "start_date", &record)?;
        let end_date = parse_optional_timestamp(raw.end_date, "end_date", &record)?;

        Ok(Event {
            id,
            title,
            library,
            library_slug: raw.library_slug,
            description,
            link: raw.link,
            image: raw.image,
            start_date,
            end_date,
            is_virtual: raw.is_virtual,
            location: raw.location,
            registration: raw.registration,
            categories: raw.categories.unwrap_or_default(),
            book: raw.book,
            state: raw.state.unwrap_or_default(),
            state_full: raw.state_full.unwrap_or_default(),
            city: raw.city.unwrap_or_default(),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn require(value: Option<String>, field: &'static str, record: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(FilterError::MissingField {
            record: record.to_string(),
            field,
        }),
    }
}

fn parse_optional_timestamp(
    value: Option<String>,
    field: &'static str,
    record: &str,
) -> Result<Option<Timestamp>> {
    let Some(text) = value else {
        return Ok(None);
    };
    let trimmed = text.trim();
    // Producers write an empty string for "unknown"
    if trimmed.is_empty() {
        return Ok(None);
    }
    parse_timestamp(trimmed)
        .map(Some)
        .ok_or_else(|| FilterError::InvalidTimestamp {
            record: record.to_string(),
            field,
            value: text.clone(),
        })
}

/// Parse an ISO-8601 timestamp; values without an offset are taken as UTC
pub fn parse_timestamp(text: &str) -> Option<Timestamp> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(naive.and_utc());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_missing_events_field_is_empty() {
        let load = parse_feed(r#"{"generated_at": "2024-06-01T00:00:00Z"}"#).unwrap();
        assert!(load.events.is_empty());
        assert!(load.rejected.is_empty());
    }

    #[test]
    fn test_malformed_json_is_error() {
        let result = parse_feed(r#"{"events": [ {"id": "1", "#);
        assert!(matches!(result, Err(FilterError::FeedParse(_))));
    }

    #[test]
    fn test_valid_record() {
        let json = r#"{
            "total_events": 1,
            "events": [{
                "id": "abc",
                "title": "Sci-Fi Club",
                "library": "Boston Public Library",
                "description": "Discussing Dune",
                "start_date": "2024-06-13T19:00:00+00:00",
                "end_date": null,
                "is_virtual": true,
                "categories": ["Science Fiction"],
                "book": {"title": "Dune", "author": "Frank Herbert"},
                "state": "MA",
                "state_full": "Massachusetts"
            }]
        }"#;
        let doc = FeedDocument::from_json(json).unwrap();
        assert_eq!(doc.total_events, Some(1));

        let load = doc.into_load();
        assert_eq!(load.events.len(), 1);
        let event = &load.events[0];
        assert_eq!(event.id, "abc");
        assert!(event.is_virtual);
        assert_eq!(
            event.start_date,
            Some(Utc.with_ymd_and_hms(2024, 6, 13, 19, 0, 0).unwrap())
        );
        assert_eq!(event.end_date, None);
        assert_eq!(event.city, "");
    }

    #[test]
    fn test_missing_required_field_rejected() {
        let json = r#"{"events": [
            {"id": "a", "title": "Kept", "library": "L", "description": "d"},
            {"id": "b", "title": "No library", "description": "d"},
            {"title": "No id", "library": "L", "description": "d"},
            {"id": "c", "title": "   ", "library": "L", "description": "d"}
        ]}"#;
        let load = parse_feed(json).unwrap();

        assert_eq!(load.events.len(), 1);
        assert_eq!(load.events[0].id, "a");
        assert_eq!(load.rejected.len(), 3);

        assert_eq!(load.rejected[0].index, 1);
        assert!(matches!(
            load.rejected[0].error,
            FilterError::MissingField { field: "library", .. }
        ));
        assert!(matches!(
            load.rejected[1].error,
            FilterError::MissingField { field: "id", .. }
        ));
        assert!(matches!(
            load.rejected[2].error,
            FilterError::MissingField { field: "title", .. }
        ));
    }

    #[test]
    fn test_invalid_timestamp_rejected() {
        let json = r#"{"events": [
            {"id": "a", "title": "t", "library": "L", "description": "d", "start_date": "next tuesday"}
        ]}"#;
        let load = parse_feed(json).unwrap();
        assert!(load.events.is_empty());
        assert!(matches!(
            load.rejected[0].error,
            FilterError::InvalidTimestamp { field: "start_date", .. }
        ));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2026, 1, 8, 3, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2026-01-08T03:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2026-01-08T03:00:00+00:00"), Some(expected));
        assert_eq!(parse_timestamp("2026-01-07T22:00:00-05:00"), Some(expected));
        assert_eq!(parse_timestamp("2026-01-08T03:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2026-01-08T03:00"), Some(expected));
        assert_eq!(parse_timestamp("January 8"), None);
    }

    #[test]
    fn test_empty_timestamp_is_absent() {
        let json = r#"{"events": [
            {"id": "a", "title": "t", "library": "L", "description": "d", "start_date": "", "end_date": ""}
        ]}"#;
        let load = parse_feed(json).unwrap();
        assert_eq!(load.events[0].start_date, None);
        assert_eq!(load.events[0].end_date, None);
    }
}
