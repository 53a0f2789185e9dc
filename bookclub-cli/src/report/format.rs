//! Display helpers shared by the text and HTML reports

use bookclub_filter::{Location, Timestamp};
use chrono_tz::Tz;
use url::form_urlencoded;

/// Short date label relative to `now`: "Today · 7:00 PM", "Tue · Jan 23 · 7:00 PM"
pub fn format_date(start: Option<Timestamp>, now: Timestamp, tz: Tz) -> String {
    let Some(start) = start else {
        return String::new();
    };
    let local = start.with_timezone(&tz);
    let today = now.with_timezone(&tz).date_naive();
    let time = local.format("%-I:%M %p").to_string();

    match (local.date_naive() - today).num_days() {
        0 => format!("Today · {time}"),
        1 => format!("Tomorrow · {time}"),
        -1 => format!("Yesterday · {time}"),
        _ => format!("{} · {time}", local.format("%a · %b %-d")),
    }
}

/// Long date label: "Thursday, June 13, 2024 at 7:00 PM"
pub fn format_full_date(start: Option<Timestamp>, tz: Tz) -> String {
    match start {
        Some(start) => start
            .with_timezone(&tz)
            .format("%A, %B %-d, %Y at %-I:%M %p")
            .to_string(),
        None => String::new(),
    }
}

/// One-line location label
pub fn format_location(location: Option<&Location>, is_virtual: bool) -> String {
    if is_virtual {
        return "Virtual Event".to_string();
    }
    match location {
        Some(loc) if !loc.name.is_empty() => [loc.name.as_str(), loc.city.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" · "),
        _ => "Location TBA".to_string(),
    }
}

/// Postal address: "123 Main St, Oakland, CA 94612, Room B"
pub fn format_full_address(location: Option<&Location>) -> String {
    let Some(loc) = location else {
        return String::new();
    };
    let mut parts = Vec::new();

    if !loc.number.is_empty() && !loc.street.is_empty() {
        parts.push(format!("{} {}", loc.number, loc.street));
    } else if !loc.street.is_empty() {
        parts.push(loc.street.clone());
    }

    if !loc.city.is_empty() && !loc.state.is_empty() {
        parts.push(format!("{}, {} {}", loc.city, loc.state, loc.zip).trim_end().to_string());
    } else if !loc.city.is_empty() {
        parts.push(loc.city.clone());
    }

    if !loc.details.is_empty() {
        parts.push(loc.details.clone());
    }

    parts.join(", ")
}

/// Cut `text` to `max_chars` characters, appending "..." when shortened
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}

/// Link to the event detail page
pub fn event_url(id: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("id", id)
        .finish();
    format!("event.html?{query}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 6, 13, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_relative_dates() {
        let tz = Tz::UTC;
        let today = Utc.with_ymd_and_hms(2024, 6, 13, 19, 0, 0).unwrap();
        let tomorrow = Utc.with_ymd_and_hms(2024, 6, 14, 9, 5, 0).unwrap();
        let yesterday = Utc.with_ymd_and_hms(2024, 6, 12, 12, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 6, 18, 19, 0, 0).unwrap();

        assert_eq!(format_date(Some(today), now(), tz), "Today · 7:00 PM");
        assert_eq!(format_date(Some(tomorrow), now(), tz), "Tomorrow · 9:05 AM");
        assert_eq!(format_date(Some(yesterday), now(), tz), "Yesterday · 12:00 PM");
        assert_eq!(format_date(Some(later), now(), tz), "Tue · Jun 18 · 7:00 PM");
        assert_eq!(format_date(None, now(), tz), "");
    }

    #[test]
    fn test_full_date() {
        let start = Utc.with_ymd_and_hms(2024, 6, 13, 19, 0, 0).unwrap();
        assert_eq!(
            format_full_date(Some(start), Tz::UTC),
            "Thursday, June 13, 2024 at 7:00 PM"
        );
    }

    #[test]
    fn test_location_labels() {
        let loc = Location {
            name: "Main Library".into(),
            city: "Oakland".into(),
            ..Default::default()
        };
        assert_eq!(format_location(Some(&loc), true), "Virtual Event");
        assert_eq!(format_location(Some(&loc), false), "Main Library · Oakland");
        assert_eq!(format_location(None, false), "Location TBA");
        assert_eq!(
            format_location(Some(&Location::default()), false),
            "Location TBA"
        );
    }

    #[test]
    fn test_full_address() {
        let loc = Location {
            number: "125".into(),
            street: "14th St".into(),
            city: "Oakland".into(),
            state: "CA".into(),
            zip: "94612".into(),
            details: "Room B".into(),
            ..Default::default()
        };
        assert_eq!(
            format_full_address(Some(&loc)),
            "125 14th St, Oakland, CA 94612, Room B"
        );

        let no_zip = Location {
            city: "Oakland".into(),
            state: "CA".into(),
            ..Default::default()
        };
        assert_eq!(format_full_address(Some(&no_zip)), "Oakland, CA");
        assert_eq!(format_full_address(None), "");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("San José Public Library", 8), "San José...");
    }

    #[test]
    fn test_event_url_encoding() {
        assert_eq!(event_url("abc-123"), "event.html?id=abc-123");
        assert_eq!(event_url("a b/c&d"), "event.html?id=a+b%2Fc%26d");
    }
}
