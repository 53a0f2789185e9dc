//! Book Club Event Filter Library
//!
//! A pure, reusable library for filtering a directory of library book club
//! events: free-text search, date ranges, online / in-person, and categorical
//! filters such as state, library and regional library groups.
//!
//! # Architecture
//!
//! This library is intentionally minimal and focused on filtering:
//! - Parses and validates the JSON event feed once, at load time
//! - Holds the event list and filter criteria in an explicit `EventStore`
//! - Resolves symbolic date filters against an injected reference instant
//!
//! The library does NOT:
//! - Fetch the feed over the network
//! - Render HTML or text
//! - Read the system clock
//!
//! Fetching and rendering live in the application layer (bookclub-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use bookclub_filter::{parse_feed, DateRangeToken, EventStore, FilterPatch, LocationMode};
//!
//! let json = std::fs::read_to_string("events.json").unwrap();
//! let feed = parse_feed(&json).unwrap();
//!
//! let mut store = EventStore::new();
//! store.load(feed.events);
//!
//! store
//!     .set_filter(
//!         FilterPatch::new()
//!             .with_search("mystery")
//!             .with_date_range(DateRangeToken::ThisWeek)
//!             .with_location_mode(LocationMode::Online),
//!     )
//!     .unwrap();
//!
//! for event in store.recompute(chrono::Utc::now()) {
//!     println!("{} at {}", event.title, event.library);
//! }
//! ```

// Public modules
pub mod criteria;
pub mod date_range;
pub mod dimensions;
pub mod feed;
pub mod predicates;
pub mod store;
pub mod types;

// Re-export main types for convenience
pub use criteria::{FilterCriteria, FilterPatch, LocationMode};
pub use date_range::{DateRangeResolver, DateRangeToken, Interval};
pub use dimensions::{DimensionKind, DimensionValue, FilterDimension, Profile, Region};
pub use feed::{parse_feed, FeedDocument, FeedLoad, RejectedRecord};
pub use store::EventStore;
pub use types::{Book, Event, EventField, FilterError, Location, Registration, Result, Timestamp};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
