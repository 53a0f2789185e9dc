//! Event predicates
//!
//! Each predicate is a pure function of the event, the criteria and the
//! reference instant. The store ANDs them together.

use crate::criteria::LocationMode;
use crate::date_range::{DateRangeResolver, Interval};
use crate::dimensions::{DimensionValue, Profile};
use crate::types::{Event, Timestamp};
use chrono::Duration;
use std::collections::BTreeMap;

/// Assumed length of an event that has no end time
pub const FALLBACK_EVENT_HOURS: i64 = 3;

/// True if the event has already ended at `now`
///
/// Uses the end time when present, otherwise start + 3 hours. Events with
/// neither date never count as ended.
pub fn has_ended(event: &Event, now: Timestamp) -> bool {
    match (event.end_date, event.start_date) {
        (Some(end), _) => end < now,
        (None, Some(start)) => start + Duration::hours(FALLBACK_EVENT_HOURS) < now,
        (None, None) => false,
    }
}

/// Case-insensitive substring search over title, library, description,
/// book title and categories
///
/// `term` must already be lowercased.
pub fn matches_search(event: &Event, term: &str) -> bool {
    event
        .search_fields()
        .any(|field| field.to_lowercase().contains(term))
}

/// Date-range check on the event's start time (no start time passes)
pub fn matches_date_range(event: &Event, range: Option<&Interval>) -> bool {
    DateRangeResolver::contains(event.start_date, range)
}

/// Online / in-person check
pub fn matches_location(event: &Event, mode: LocationMode) -> bool {
    mode.allows(event.is_virtual)
}

/// All active categorical dimensions must match
///
/// Entries naming a dimension the profile does not define are ignored; the
/// store rejects them before they reach the criteria.
pub fn matches_categorical(
    event: &Event,
    profile: &Profile,
    active: &BTreeMap<String, DimensionValue>,
) -> bool {
    active.iter().all(|(name, value)| match profile.dimension(name) {
        Some(dimension) => dimension.matches(event, value),
        None => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Book;
    use chrono::{TimeZone, Utc};

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 6, 13, 10, 0, 0).unwrap()
    }

    fn event() -> Event {
        Event {
            id: "e1".into(),
            title: "Evening Readers".into(),
            library: "Hartford Public Library".into(),
            library_slug: None,
            description: "A relaxed discussion".into(),
            link: None,
            image: None,
            start_date: None,
            end_date: None,
            is_virtual: true,
            location: None,
            registration: None,
            categories: vec!["Science Fiction".into(), "Adults".into()],
            book: Some(Book {
                title: Some("The Left Hand of Darkness".into()),
                author: Some("Ursula K. Le Guin".into()),
            }),
            state: "CT".into(),
            state_full: "Connecticut".into(),
            city: "Hartford".into(),
        }
    }

    #[test]
    fn test_end_date_liveness() {
        let mut e = event();
        e.end_date = Some(now() - Duration::seconds(1));
        assert!(has_ended(&e, now()));

        e.end_date = Some(now() + Duration::seconds(1));
        assert!(!has_ended(&e, now()));

        // Ending exactly now is not yet ended
        e.end_date = Some(now());
        assert!(!has_ended(&e, now()));
    }

    #[test]
    fn test_start_date_fallback_liveness() {
        let mut e = event();
        e.start_date = Some(now() - Duration::hours(2) - Duration::minutes(59));
        assert!(!has_ended(&e, now()));

        e.start_date = Some(now() - Duration::hours(3) - Duration::minutes(1));
        assert!(has_ended(&e, now()));
    }

    #[test]
    fn test_end_date_wins_over_start_date() {
        let mut e = event();
        e.start_date = Some(now() - Duration::days(2));
        e.end_date = Some(now() + Duration::hours(1));
        assert!(!has_ended(&e, now()));
    }

    #[test]
    fn test_undated_event_never_ends() {
        assert!(!has_ended(&event(), now()));
    }

    #[test]
    fn test_search_fields() {
        let e = event();
        assert!(matches_search(&e, "fic"));
        assert!(matches_search(&e, "hartford"));
        assert!(matches_search(&e, "left hand"));
        assert!(matches_search(&e, "relaxed"));
        // Author is not searched
        assert!(!matches_search(&e, "le guin"));
        assert!(!matches_search(&e, "poetry"));
    }

    #[test]
    fn test_location_predicate() {
        let e = event();
        assert!(matches_location(&e, LocationMode::All));
        assert!(matches_location(&e, LocationMode::Online));
        assert!(!matches_location(&e, LocationMode::InPerson));
    }

    #[test]
    fn test_date_range_predicate() {
        let range = Interval::new(now(), now() + Duration::days(1));
        let mut e = event();
        assert!(matches_date_range(&e, Some(&range)));

        e.start_date = Some(now() + Duration::days(2));
        assert!(!matches_date_range(&e, Some(&range)));
        assert!(matches_date_range(&e, None));
    }
}
