//! Filter state as a shareable query string
//!
//! Uses the same parameters the directory page keeps in its address bar:
//! `search`, `filter` (date token), `type`, `state`, `library`, `region`.
//! Values are form-encoded, so a space becomes `+`.

use bookclub_filter::{
    DateRangeToken, DimensionValue, FilterCriteria, FilterPatch, LocationMode, Region,
};
use url::form_urlencoded;

/// Build the query string for `criteria` ("" when nothing is filtered)
pub fn to_query_string(criteria: &FilterCriteria) -> String {
    let mut params = form_urlencoded::Serializer::new(String::new());

    if !criteria.search_text.is_empty() {
        params.append_pair("search", &criteria.search_text);
    }
    if let Some(token) = criteria.date_range.as_token() {
        if !criteria.date_range.is_none() {
            params.append_pair("filter", token);
        }
    }
    if criteria.location_mode != LocationMode::All {
        params.append_pair("type", criteria.location_mode.as_str());
    }
    for key in ["state", "library"] {
        if let Some(DimensionValue::Value(value)) = criteria.categorical.get(key) {
            params.append_pair(key, value);
        }
    }
    // Only one region fits in the parameter; the first active one wins
    if let Some(region) = criteria.active_regions().first() {
        params.append_pair("region", region.slug());
    }

    let query = params.finish();
    if query.is_empty() {
        query
    } else {
        format!("?{query}")
    }
}

/// Read a query string back into a filter update
///
/// A leading `?` is optional. Unknown parameters are ignored; unknown
/// `type` and `region` values are skipped with a warning. `filter` also
/// accepts a region slug, as older shared links did.
pub fn from_query_string(query: &str) -> FilterPatch {
    let query = query.trim().trim_start_matches('?');
    let mut patch = FilterPatch::new();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "search" => patch = patch.with_search(value.into_owned()),
            "filter" => match Region::from_slug(&value) {
                Some(region) => patch = patch.with_region(region, true),
                None => patch = patch.with_date_range(DateRangeToken::parse(&value)),
            },
            "type" => match value.parse::<LocationMode>() {
                Ok(mode) => patch = patch.with_location_mode(mode),
                Err(e) => log::warn!("Ignoring query parameter type={value:?}: {e}"),
            },
            "state" | "library" => patch = patch.with_value(key.as_ref(), value.into_owned()),
            "region" => match Region::from_slug(&value) {
                Some(region) => patch = patch.with_region(region, true),
                None => log::warn!("Ignoring unknown region {value:?} in query"),
            },
            other => log::debug!("Ignoring query parameter {other:?}"),
        }
    }
    patch
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_criteria() -> FilterCriteria {
        let mut criteria = FilterCriteria::new();
        criteria.merge(
            FilterPatch::new()
                .with_search("sci fi")
                .with_date_range(DateRangeToken::ThisWeek)
                .with_location_mode(LocationMode::InPerson)
                .with_value("state", "New York")
                .with_value("library", "Brooklyn Public Library")
                .with_region(Region::NewEngland, true),
        );
        criteria
    }

    #[test]
    fn test_empty_criteria() {
        assert_eq!(to_query_string(&FilterCriteria::new()), "");
    }

    #[test]
    fn test_full_query_is_form_encoded() {
        assert_eq!(
            to_query_string(&full_criteria()),
            "?search=sci+fi&filter=this-week&type=in-person&state=New+York\
             &library=Brooklyn+Public+Library&region=new-england"
        );
    }

    #[test]
    fn test_query_round_trip() {
        let criteria = full_criteria();
        let mut restored = FilterCriteria::new();
        restored.merge(from_query_string(&to_query_string(&criteria)));
        assert_eq!(restored, criteria);
    }

    #[test]
    fn test_parse_query() {
        let patch = from_query_string("search=tea%20%26+crime&filter=tomorrow&type=online");
        assert_eq!(patch.search_text.as_deref(), Some("tea & crime"));
        assert_eq!(patch.date_range, Some(DateRangeToken::Tomorrow));
        assert_eq!(patch.location_mode, Some(LocationMode::Online));
        assert!(patch.categorical.is_empty());
    }

    #[test]
    fn test_region_slug_in_filter_parameter() {
        let patch = from_query_string("?filter=bay-area");
        assert_eq!(patch.date_range, None);
        assert_eq!(
            patch.categorical.get(Region::BayArea.dimension_name()),
            Some(&Some(DimensionValue::Flag(true)))
        );
    }

    #[test]
    fn test_bad_values_are_skipped() {
        let patch = from_query_string("?type=hybrid&region=midwest&page=2");
        assert!(patch.is_empty());
    }
}
