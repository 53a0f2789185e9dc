//! Date range resolution
//!
//! Maps a symbolic date filter ("today", "this-week", ...) plus a reference
//! instant to a concrete half-open interval `[start, end)`. Ranges start at a
//! local midnight in the resolver's calendar time zone. Day-sized ranges span a
//! fixed 24 hours from that midnight; month ranges end at the first local
//! midnight of a month. The resolver never reads the clock; callers pass `now` in.

use crate::types::Timestamp;
use chrono::{Datelike, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-open time interval `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl Interval {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    /// True if `timestamp` lies in `[start, end)`
    pub fn contains(&self, timestamp: Timestamp) -> bool {
        self.start <= timestamp && timestamp < self.end
    }
}

/// Symbolic date filter selected by the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateRangeToken {
    /// No date constraint
    #[default]
    None,
    Today,
    Tomorrow,
    /// Today through the upcoming Saturday (weeks start on Sunday)
    ThisWeek,
    /// Today through the end of the current month
    ThisMonth,
    NextMonth,
    /// A concrete interval chosen by the caller
    Custom(Interval),
}

impl DateRangeToken {
    /// Parse a token string
    ///
    /// Unrecognized strings (including "none" and "") mean no constraint.
    pub fn parse(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "today" => DateRangeToken::Today,
            "tomorrow" => DateRangeToken::Tomorrow,
            "this-week" => DateRangeToken::ThisWeek,
            "this-month" => DateRangeToken::ThisMonth,
            "next-month" => DateRangeToken::NextMonth,
            _ => DateRangeToken::None,
        }
    }

    /// Kebab-case name of a symbolic token (None for custom intervals)
    pub fn as_token(&self) -> Option<&'static str> {
        match self {
            DateRangeToken::None => Some("none"),
            DateRangeToken::Today => Some("today"),
            DateRangeToken::Tomorrow => Some("tomorrow"),
            DateRangeToken::ThisWeek => Some("this-week"),
            DateRangeToken::ThisMonth => Some("this-month"),
            DateRangeToken::NextMonth => Some("next-month"),
            DateRangeToken::Custom(_) => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, DateRangeToken::None)
    }
}

impl fmt::Display for DateRangeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateRangeToken::Custom(interval) => write!(
                f,
                "{}..{}",
                interval.start.to_rfc3339(),
                interval.end.to_rfc3339()
            ),
            other => write!(f, "{}", other.as_token().unwrap_or("none")),
        }
    }
}

/// Resolves date tokens to intervals in a fixed calendar time zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRangeResolver {
    calendar: Tz,
}

impl Default for DateRangeResolver {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl DateRangeResolver {
    /// Create a resolver whose ranges start at midnights in `calendar`
    pub fn new(calendar: Tz) -> Self {
        Self { calendar }
    }

    /// Calendar time zone used for day boundaries
    pub fn calendar(&self) -> Tz {
        self.calendar
    }

    /// Resolve a token against the reference instant `now`
    ///
    /// Returns `None` when the token imposes no constraint.
    pub fn resolve(&self, token: &DateRangeToken, now: Timestamp) -> Option<Interval> {
        let today = now.with_timezone(&self.calendar).date_naive();
        let midnight = self.local_midnight(today);
        let day = Duration::hours(24);

        let interval = match token {
            DateRangeToken::None => return None,
            DateRangeToken::Custom(interval) => return Some(*interval),
            DateRangeToken::Today => Interval::new(midnight, midnight + day),
            DateRangeToken::Tomorrow => Interval::new(midnight + day, midnight + day + day),
            DateRangeToken::ThisWeek => {
                // Saturday is day 6 counting from Sunday; the range ends 24h after its midnight
                let to_saturday = 6 - i64::from(today.weekday().num_days_from_sunday());
                let saturday = today + Duration::days(to_saturday);
                Interval::new(midnight, self.local_midnight(saturday) + day)
            }
            DateRangeToken::ThisMonth => Interval::new(
                midnight,
                self.local_midnight(first_of_following_month(today, 1)),
            ),
            DateRangeToken::NextMonth => Interval::new(
                self.local_midnight(first_of_following_month(today, 1)),
                self.local_midnight(first_of_following_month(today, 2)),
            ),
        };

        Some(interval)
    }

    /// Resolve a token given as a string (see [`DateRangeToken::parse`])
    pub fn resolve_str(&self, token: &str, now: Timestamp) -> Option<Interval> {
        self.resolve(&DateRangeToken::parse(token), now)
    }

    /// True if no interval is given, the timestamp is absent, or it lies in the interval
    pub fn contains(timestamp: Option<Timestamp>, interval: Option<&Interval>) -> bool {
        match (timestamp, interval) {
            (Some(ts), Some(range)) => range.contains(ts),
            _ => true,
        }
    }

    /// First instant of `date` in the calendar time zone
    fn local_midnight(&self, date: NaiveDate) -> Timestamp {
        let naive = date.and_time(NaiveTime::MIN);
        match self.calendar.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            // Midnight skipped by a DST jump: the day starts at the first valid hour
            LocalResult::None => {
                let shifted = naive + Duration::hours(1);
                self.calendar
                    .from_local_datetime(&shifted)
                    .earliest()
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
            }
        }
    }
}

/// First day of the month `months_ahead` months after `date`'s month
fn first_of_following_month(date: NaiveDate, months_ahead: u32) -> NaiveDate {
    let month_index = date.month0() + months_ahead;
    let year = date.year() + (month_index / 12) as i32;
    let month = month_index % 12 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}
