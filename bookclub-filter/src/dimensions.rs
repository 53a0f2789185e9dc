//! Categorical filter dimensions and regional library groups
//!
//! A page variant of the directory is described declaratively: which
//! categorical dimensions it offers and, optionally, a region the whole event
//! list is restricted to at load time.

use crate::types::{Event, EventField};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bay Area library allow-list
pub const BAY_AREA_LIBRARIES: &[&str] = &[
    "San Francisco Public Library",
    "San José Public Library",
    "Oakland Public Library",
    "San Mateo County Libraries",
    "Santa Clara County Library",
    "Alameda County Library",
    "Contra Costa County Library",
    "Palo Alto City Library",
    "Pleasanton Public Library",
];

/// New England library allow-list
pub const NEW_ENGLAND_LIBRARIES: &[&str] = &[
    "Boston Public Library",
    "Providence Public Library",
    "Hartford Public Library",
    "New Haven Free Public Library",
    "Portland Public Library",
    "Manchester City Library",
    "Burlington Public Library",
    "Rhode Island State Library",
    "Connecticut State Library",
    "Maine State Library",
];

/// A named regional group of libraries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    BayArea,
    NewEngland,
}

impl Region {
    pub const ALL: [Region; 2] = [Region::BayArea, Region::NewEngland];

    /// Short slug ("bay-area")
    pub fn slug(&self) -> &'static str {
        match self {
            Region::BayArea => "bay-area",
            Region::NewEngland => "new-england",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Region::BayArea => "Bay Area",
            Region::NewEngland => "New England",
        }
    }

    /// Name of the categorical dimension that toggles this region
    pub fn dimension_name(&self) -> &'static str {
        match self {
            Region::BayArea => "region-bay-area",
            Region::NewEngland => "region-new-england",
        }
    }

    /// Libraries belonging to this region
    pub fn libraries(&self) -> &'static [&'static str] {
        match self {
            Region::BayArea => BAY_AREA_LIBRARIES,
            Region::NewEngland => NEW_ENGLAND_LIBRARIES,
        }
    }

    /// Look a region up by slug
    pub fn from_slug(slug: &str) -> Option<Region> {
        Region::ALL.into_iter().find(|r| r.slug() == slug)
    }

    /// Allow-list dimension for this region
    pub fn dimension(&self) -> FilterDimension {
        FilterDimension::allow_list(
            self.dimension_name(),
            EventField::Library,
            self.libraries().iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// How a categorical dimension matches an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimensionKind {
    /// Field must equal the value chosen in the criteria
    Equals(EventField),
    /// Field must be one of a fixed list; the criteria only switch it on or off
    AllowList {
        field: EventField,
        members: Vec<String>,
    },
}

/// A named categorical filter dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDimension {
    pub name: String,
    pub kind: DimensionKind,
}

impl FilterDimension {
    /// Equality dimension over `field`
    pub fn equals(name: impl Into<String>, field: EventField) -> Self {
        Self {
            name: name.into(),
            kind: DimensionKind::Equals(field),
        }
    }

    /// Allow-list dimension over `field`
    pub fn allow_list(name: impl Into<String>, field: EventField, members: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind: DimensionKind::AllowList { field, members },
        }
    }

    /// Test an event against this dimension's active value
    pub fn matches(&self, event: &Event, value: &DimensionValue) -> bool {
        match (&self.kind, value) {
            (DimensionKind::Equals(field), DimensionValue::Value(expected)) => {
                field.value(event) == expected
            }
            (DimensionKind::AllowList { field, members }, DimensionValue::Flag(true)) => {
                let actual = field.value(event);
                members.iter().any(|m| m == actual)
            }
            // Inactive or mismatched values impose no constraint
            _ => true,
        }
    }

    /// Whether `value` is the right kind for this dimension
    pub fn accepts(&self, value: &DimensionValue) -> bool {
        matches!(
            (&self.kind, value),
            (DimensionKind::Equals(_), DimensionValue::Value(_))
                | (DimensionKind::AllowList { .. }, DimensionValue::Flag(_))
        )
    }

    /// Description of the value kind this dimension expects
    pub fn expected_kind(&self) -> &'static str {
        match self.kind {
            DimensionKind::Equals(_) => "a value",
            DimensionKind::AllowList { .. } => "an on/off flag",
        }
    }
}

/// Active value of a categorical dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DimensionValue {
    /// Equality value (e.g. a library or state name)
    Value(String),
    /// Allow-list toggle; `false` is inactive
    Flag(bool),
}

impl DimensionValue {
    pub fn is_active(&self) -> bool {
        !matches!(self, DimensionValue::Flag(false))
    }
}

/// Declarative description of a directory page variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Name used in logs and reports
    pub name: String,
    /// Categorical dimensions the page offers
    pub dimensions: Vec<FilterDimension>,
    /// Region the event list is restricted to on load
    pub scope: Option<Region>,
}

impl Profile {
    /// The nationwide directory: library and state filters plus both regional toggles
    pub fn directory() -> Self {
        Self {
            name: "directory".to_string(),
            dimensions: vec![
                FilterDimension::equals("library", EventField::Library),
                FilterDimension::equals("state", EventField::StateFull),
                Region::BayArea.dimension(),
                Region::NewEngland.dimension(),
            ],
            scope: None,
        }
    }

    /// A regional page: only that region's libraries, filterable by library
    pub fn region(region: Region) -> Self {
        Self {
            name: region.slug().to_string(),
            dimensions: vec![FilterDimension::equals("library", EventField::Library)],
            scope: Some(region),
        }
    }

    /// Look a profile up by name ("directory", "bay-area", "new-england")
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "directory" => Some(Self::directory()),
            other => Region::from_slug(other).map(Self::region),
        }
    }

    /// Find a dimension by name
    pub fn dimension(&self, name: &str) -> Option<&FilterDimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    /// Whether an event survives the load-time scope
    pub fn in_scope(&self, event: &Event) -> bool {
        match self.scope {
            Some(region) => region.libraries().contains(&event.library.as_str()),
            None => true,
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::directory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_at(library: &str) -> Event {
        Event {
            id: "1".into(),
            title: "t".into(),
            library: library.into(),
            library_slug: None,
            description: "d".into(),
            link: None,
            image: None,
            start_date: None,
            end_date: None,
            is_virtual: false,
            location: None,
            registration: None,
            categories: Vec::new(),
            book: None,
            state: String::new(),
            state_full: "California".into(),
            city: String::new(),
        }
    }

    #[test]
    fn test_region_lists_are_disjoint() {
        for lib in BAY_AREA_LIBRARIES {
            assert!(!NEW_ENGLAND_LIBRARIES.contains(lib));
        }
    }

    #[test]
    fn test_region_dimension_matching() {
        let oakland = event_at("Oakland Public Library");
        let on = DimensionValue::Flag(true);

        assert!(Region::BayArea.dimension().matches(&oakland, &on));
        assert!(!Region::NewEngland.dimension().matches(&oakland, &on));
        // Switched off: no constraint
        assert!(Region::NewEngland
            .dimension()
            .matches(&oakland, &DimensionValue::Flag(false)));
    }

    #[test]
    fn test_equals_dimension() {
        let dim = FilterDimension::equals("state", EventField::StateFull);
        let event = event_at("Oakland Public Library");
        assert!(dim.matches(&event, &DimensionValue::Value("California".into())));
        assert!(!dim.matches(&event, &DimensionValue::Value("california".into())));
        assert!(dim.accepts(&DimensionValue::Value("x".into())));
        assert!(!dim.accepts(&DimensionValue::Flag(true)));
    }

    #[test]
    fn test_profiles() {
        let directory = Profile::directory();
        assert!(directory.dimension("region-bay-area").is_some());
        assert!(directory.dimension("state").is_some());
        assert!(directory.scope.is_none());

        let bay = Profile::by_name("bay-area").unwrap();
        assert_eq!(bay.scope, Some(Region::BayArea));
        assert!(bay.dimension("state").is_none());
        assert!(bay.in_scope(&event_at("Palo Alto City Library")));
        assert!(!bay.in_scope(&event_at("Boston Public Library")));

        assert!(Profile::by_name("midwest").is_none());
    }
}
