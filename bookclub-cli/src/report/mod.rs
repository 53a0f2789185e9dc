//! Report generation
//!
//! Renders the filtered event list as a plain-text table, HTML table rows,
//! or JSON.

pub mod format;
pub mod html;
pub mod txt;

use crate::config::OutputFormat;
use anyhow::{Context, Result};
use bookclub_filter::{Event, Region, Timestamp};
use chrono_tz::Tz;

/// Everything a report needs besides the events themselves
pub struct ReportContext<'a> {
    /// Filtered events, in display order
    pub events: &'a [&'a Event],
    /// Number of loaded events before filtering
    pub total: usize,
    /// Reference instant for relative dates
    pub now: Timestamp,
    /// Calendar used for displayed times
    pub tz: Tz,
    /// Region the page is restricted to, if any
    pub scope: Option<Region>,
}

impl ReportContext<'_> {
    /// "Showing 3 of 10 events" (or "... Bay Area events" on a regional page)
    pub fn results_line(&self) -> String {
        let noun = match self.scope {
            Some(region) => format!("{} events", region.display_name()),
            None => "events".to_string(),
        };
        format!("Showing {} of {} {}", self.events.len(), self.total, noun)
    }
}

/// Render a report in the requested format
pub fn render(format: OutputFormat, ctx: &ReportContext<'_>) -> Result<String> {
    match format {
        OutputFormat::Txt => Ok(txt::render(ctx)),
        OutputFormat::Html => Ok(html::render(ctx)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(ctx.events).context("Failed to serialize events")
        }
    }
}
