//! Event store
//!
//! The `EventStore` owns the loaded event list and the current filter
//! criteria, and computes the filtered view on request. It performs no I/O
//! and never reads the clock.

use crate::criteria::{FilterCriteria, FilterPatch};
use crate::date_range::DateRangeResolver;
use crate::dimensions::Profile;
use crate::predicates;
use crate::types::{Event, EventField, FilterError, Result, Timestamp};
use std::collections::BTreeSet;

/// Holds the event list and filter state for one directory page
pub struct EventStore {
    /// Page variant: dimensions offered and load-time scope
    profile: Profile,
    /// Resolves date tokens to intervals
    resolver: DateRangeResolver,
    /// Full event list from the last load (after scoping)
    events: Vec<Event>,
    /// Current filter state
    criteria: FilterCriteria,
    /// Indices into `events` of the filtered view, in list order
    filtered: Vec<usize>,
}

impl EventStore {
    /// Create an empty store for the nationwide directory, using UTC day boundaries
    pub fn new() -> Self {
        Self::with_profile(Profile::directory(), DateRangeResolver::default())
    }

    /// Create an empty store for a specific page variant and calendar
    pub fn with_profile(profile: Profile, resolver: DateRangeResolver) -> Self {
        Self {
            profile,
            resolver,
            events: Vec::new(),
            criteria: FilterCriteria::default(),
            filtered: Vec::new(),
        }
    }

    /// Replace the full event list
    ///
    /// Events outside the profile's scope are dropped. The filtered view is
    /// reset to the whole list; the criteria are left as they are.
    pub fn load(&mut self, events: Vec<Event>) {
        let offered = events.len();
        self.events = events
            .into_iter()
            .filter(|event| self.profile.in_scope(event))
            .collect();
        self.filtered = (0..self.events.len()).collect();

        log::debug!(
            "Loaded {} events into '{}' store ({} outside scope)",
            self.events.len(),
            self.profile.name,
            offered - self.events.len()
        );
    }

    /// Merge a partial update into the criteria
    ///
    /// Does not recompute. Categorical entries are checked against the
    /// profile first; if any is invalid nothing is merged.
    pub fn set_filter(&mut self, patch: FilterPatch) -> Result<()> {
        for (name, value) in &patch.categorical {
            let dimension = self
                .profile
                .dimension(name)
                .ok_or_else(|| FilterError::UnknownDimension(name.clone()))?;

            if let Some(value) = value {
                if !dimension.accepts(value) {
                    return Err(FilterError::DimensionValueMismatch {
                        dimension: name.clone(),
                        expected: dimension.expected_kind(),
                    });
                }
            }
        }

        self.criteria.merge(patch);
        log::trace!("Filter criteria now {:?}", self.criteria);
        Ok(())
    }

    /// Reset the criteria to "all events"
    pub fn reset_filters(&mut self) {
        self.criteria = FilterCriteria::default();
    }

    /// Recompute the filtered view at `now` and return it
    ///
    /// The result keeps list order. Predicates, ANDed: not yet ended, search,
    /// date range, online / in-person, categorical dimensions.
    pub fn recompute(&mut self, now: Timestamp) -> Vec<&Event> {
        let range = self.resolver.resolve(&self.criteria.date_range, now);
        let term = self.criteria.search_term();

        let criteria = &self.criteria;
        let profile = &self.profile;
        self.filtered = self
            .events
            .iter()
            .enumerate()
            .filter(|(_, event)| {
                !predicates::has_ended(event, now)
                    && term
                        .as_deref()
                        .map_or(true, |t| predicates::matches_search(event, t))
                    && predicates::matches_date_range(event, range.as_ref())
                    && predicates::matches_location(event, criteria.location_mode)
                    && predicates::matches_categorical(event, profile, &criteria.categorical)
            })
            .map(|(index, _)| index)
            .collect();

        log::debug!(
            "Recomputed at {}: {} of {} events match",
            now.to_rfc3339(),
            self.filtered.len(),
            self.events.len()
        );

        self.filtered()
    }

    /// The filtered view from the last load or recompute
    pub fn filtered(&self) -> Vec<&Event> {
        self.filtered.iter().map(|&i| &self.events[i]).collect()
    }

    /// The full loaded list
    pub fn all(&self) -> &[Event] {
        &self.events
    }

    /// Number of loaded events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when nothing is loaded
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of events in the filtered view
    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// Current criteria
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn resolver(&self) -> &DateRangeResolver {
        &self.resolver
    }

    /// Sorted distinct non-empty values of `field` over the loaded list
    pub fn distinct_values(&self, field: EventField) -> Vec<String> {
        self.events
            .iter()
            .map(|event| field.value(event))
            .filter(|value| !value.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new()
    }
}
