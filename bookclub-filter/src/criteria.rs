//! Filter criteria types
//!
//! `FilterCriteria` is the current filter state. `FilterPatch` carries a
//! partial update: only the fields it sets are merged, the rest are left
//! untouched.

use crate::date_range::DateRangeToken;
use crate::dimensions::{DimensionValue, Region};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Online / in-person filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocationMode {
    #[default]
    All,
    Online,
    InPerson,
}

impl LocationMode {
    /// Check if an event with the given virtual flag passes
    pub fn allows(&self, is_virtual: bool) -> bool {
        match self {
            LocationMode::All => true,
            LocationMode::Online => is_virtual,
            LocationMode::InPerson => !is_virtual,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LocationMode::All => "all",
            LocationMode::Online => "online",
            LocationMode::InPerson => "in-person",
        }
    }
}

impl fmt::Display for LocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LocationMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(LocationMode::All),
            "online" => Ok(LocationMode::Online),
            "in-person" => Ok(LocationMode::InPerson),
            other => Err(format!(
                "unknown location mode {other:?} (expected all, online or in-person)"
            )),
        }
    }
}

/// Current filter state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Case-insensitive substring to search for
    #[serde(default)]
    pub search_text: String,

    /// Active date filter
    #[serde(default)]
    pub date_range: DateRangeToken,

    /// Online / in-person filter
    #[serde(default)]
    pub location_mode: LocationMode,

    /// Active categorical dimensions by name (inactive ones are absent)
    #[serde(default)]
    pub categorical: BTreeMap<String, DimensionValue>,
}

impl FilterCriteria {
    /// Create criteria with no filters ("all events")
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing filters beyond liveness
    pub fn is_default(&self) -> bool {
        self.search_text.is_empty()
            && self.date_range.is_none()
            && self.location_mode == LocationMode::All
            && self.categorical.is_empty()
    }

    /// Lowercased search term, or None when search is off
    pub fn search_term(&self) -> Option<String> {
        if self.search_text.is_empty() {
            None
        } else {
            Some(self.search_text.to_lowercase())
        }
    }

    /// Merge a patch; unset fields are left unchanged
    pub fn merge(&mut self, patch: FilterPatch) {
        if let Some(search) = patch.search_text {
            self.search_text = search;
        }
        if let Some(range) = patch.date_range {
            self.date_range = range;
        }
        if let Some(mode) = patch.location_mode {
            self.location_mode = mode;
        }
        for (name, value) in patch.categorical {
            match value {
                Some(v) if v.is_active() => {
                    self.categorical.insert(name, v);
                }
                _ => {
                    self.categorical.remove(&name);
                }
            }
        }
    }

    /// Active regional toggles
    pub fn active_regions(&self) -> Vec<Region> {
        Region::ALL
            .into_iter()
            .filter(|r| {
                self.categorical.get(r.dimension_name()) == Some(&DimensionValue::Flag(true))
            })
            .collect()
    }
}

/// Partial update for [`FilterCriteria`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub search_text: Option<String>,
    pub date_range: Option<DateRangeToken>,
    pub location_mode: Option<LocationMode>,
    /// Dimension updates; `None` clears the dimension
    pub categorical: BTreeMap<String, Option<DimensionValue>>,
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the search text
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    /// Builder method: set the date filter
    pub fn with_date_range(mut self, token: DateRangeToken) -> Self {
        self.date_range = Some(token);
        self
    }

    /// Builder method: set the online / in-person filter
    pub fn with_location_mode(mut self, mode: LocationMode) -> Self {
        self.location_mode = Some(mode);
        self
    }

    /// Builder method: set an equality dimension
    pub fn with_value(mut self, dimension: impl Into<String>, value: impl Into<String>) -> Self {
        self.categorical
            .insert(dimension.into(), Some(DimensionValue::Value(value.into())));
        self
    }

    /// Builder method: toggle an allow-list dimension
    pub fn with_flag(mut self, dimension: impl Into<String>, enabled: bool) -> Self {
        self.categorical
            .insert(dimension.into(), Some(DimensionValue::Flag(enabled)));
        self
    }

    /// Builder method: toggle a region
    pub fn with_region(self, region: Region, enabled: bool) -> Self {
        self.with_flag(region.dimension_name(), enabled)
    }

    /// Builder method: clear a dimension
    pub fn clear(mut self, dimension: impl Into<String>) -> Self {
        self.categorical.insert(dimension.into(), None);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.search_text.is_none()
            && self.date_range.is_none()
            && self.location_mode.is_none()
            && self.categorical.is_empty()
    }
}
