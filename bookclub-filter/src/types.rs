//! Core types for the book club event filter library
//!
//! This module defines the validated event record that the store holds and the
//! error type shared by every fallible operation. Events are read-only once
//! loaded; a new feed replaces the whole list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp type used throughout the library
pub type Timestamp = DateTime<Utc>;

/// Result type for filter operations
pub type Result<T> = std::result::Result<T, FilterError>;

/// A single book club event from the feed
///
/// Required text fields (`id`, `title`, `library`, `description`) are checked
/// when the feed is ingested, so every `Event` the store sees has them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Opaque unique identifier
    pub id: String,
    /// Event title
    pub title: String,
    /// Hosting library name (also the key for regional allow-lists)
    pub library: String,
    /// URL-friendly library identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_slug: Option<String>,
    /// Plain-text description
    pub description: String,
    /// Link to the event page at the library
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Start time
    #[serde(default)]
    pub start_date: Option<Timestamp>,
    /// End time (may be absent; liveness then falls back to start + 3h)
    #[serde(default)]
    pub end_date: Option<Timestamp>,
    /// True if the event is held online
    #[serde(default)]
    pub is_virtual: bool,
    /// Physical address, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Registration details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration: Option<Registration>,
    /// Category tags
    #[serde(default)]
    pub categories: Vec<String>,
    /// Book being discussed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book: Option<Book>,
    /// Two-letter state abbreviation
    #[serde(default)]
    pub state: String,
    /// Full state name
    #[serde(default)]
    pub state_full: String,
    /// City name
    #[serde(default)]
    pub city: String,
}

/// Structured event address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub name: String,
    pub street: String,
    pub number: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub details: String,
}

/// Registration requirements for an event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Registration {
    pub required: bool,
    pub full: bool,
    pub capacity: String,
    pub registered: String,
}

/// Book discussed at the event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Book {
    pub title: Option<String>,
    pub author: Option<String>,
}

/// Field of an event that a categorical filter reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventField {
    Library,
    StateFull,
    State,
    City,
}

impl EventField {
    /// Borrow the value of this field from an event
    pub fn value<'a>(&self, event: &'a Event) -> &'a str {
        match self {
            EventField::Library => &event.library,
            EventField::StateFull => &event.state_full,
            EventField::State => &event.state,
            EventField::City => &event.city,
        }
    }
}

impl fmt::Display for EventField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventField::Library => write!(f, "library"),
            EventField::StateFull => write!(f, "state_full"),
            EventField::State => write!(f, "state"),
            EventField::City => write!(f, "city"),
        }
    }
}

impl Event {
    /// Text fields searched by free-text queries, in match order
    ///
    /// Title, library and description are always present; the book title and
    /// category tags follow when the event carries them.
    pub fn search_fields(&self) -> impl Iterator<Item = &str> {
        [self.title.as_str(), self.library.as_str(), self.description.as_str()]
            .into_iter()
            .chain(self.book.as_ref().and_then(|b| b.title.as_deref()))
            .chain(self.categories.iter().map(String::as_str))
    }
}

/// Errors that can occur while ingesting or filtering events
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("Failed to parse event feed: {0}")]
    FeedParse(#[from] serde_json::Error),

    #[error("Event {record} is missing required field `{field}`")]
    MissingField { record: String, field: &'static str },

    #[error("Event {record} has invalid {field} timestamp: {value:?}")]
    InvalidTimestamp {
        record: String,
        field: &'static str,
        value: String,
    },

    #[error("Unknown filter dimension: {0}")]
    UnknownDimension(String),

    #[error("Filter dimension `{dimension}` expects {expected}")]
    DimensionValueMismatch {
        dimension: String,
        expected: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> Event {
        Event {
            id: "1".into(),
            title: "Mystery Lovers".into(),
            library: "Oakland Public Library".into(),
            library_slug: None,
            description: "Monthly meetup".into(),
            link: None,
            image: None,
            start_date: None,
            end_date: None,
            is_virtual: false,
            location: None,
            registration: None,
            categories: vec!["Science Fiction".into()],
            book: Some(Book {
                title: Some("Dune".into()),
                author: None,
            }),
            state: "CA".into(),
            state_full: "California".into(),
            city: "Oakland".into(),
        }
    }

    #[test]
    fn test_search_fields_order() {
        let ev = event();
        let fields: Vec<&str> = ev.search_fields().collect();
        assert_eq!(
            fields,
            vec![
                "Mystery Lovers",
                "Oakland Public Library",
                "Monthly meetup",
                "Dune",
                "Science Fiction"
            ]
        );
    }

    #[test]
    fn test_event_field_value() {
        let e = event();
        assert_eq!(EventField::Library.value(&e), "Oakland Public Library");
        assert_eq!(EventField::StateFull.value(&e), "California");
        assert_eq!(EventField::State.value(&e), "CA");
        assert_eq!(EventField::City.value(&e), "Oakland");
        assert_eq!(format!("{}", EventField::StateFull), "state_full");
    }

    #[test]
    fn test_error_messages() {
        let err = FilterError::MissingField {
            record: "#3".into(),
            field: "title",
        };
        assert_eq!(err.to_string(), "Event #3 is missing required field `title`");

        let err = FilterError::DimensionValueMismatch {
            dimension: "region-bay-area".into(),
            expected: "a flag",
        };
        assert_eq!(
            err.to_string(),
            "Filter dimension `region-bay-area` expects a flag"
        );

        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(FilterError::from(parse), FilterError::FeedParse(_)));
    }
}
