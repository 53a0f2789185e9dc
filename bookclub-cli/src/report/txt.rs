//! Plain-text report

use super::format::{format_date, format_full_address, format_location, truncate};
use super::ReportContext;
use std::fmt::Write;

const TITLE_WIDTH: usize = 40;
const LIBRARY_WIDTH: usize = 30;

/// Render an ASCII table with one row per event
pub fn render(ctx: &ReportContext<'_>) -> String {
    let mut out = String::new();

    if ctx.events.is_empty() {
        out.push_str("No events found\n");
        out.push_str("Try adjusting your filters or search terms\n");
        let _ = writeln!(out, "\n{}", ctx.results_line());
        return out;
    }

    let _ = writeln!(
        out,
        "{:<tw$}  {:<9}  {:<lw$}  {}",
        "EVENT",
        "TYPE",
        "LIBRARY",
        "WHEN",
        tw = TITLE_WIDTH,
        lw = LIBRARY_WIDTH
    );
    let _ = writeln!(out, "{}", "─".repeat(TITLE_WIDTH + LIBRARY_WIDTH + 40));

    for event in ctx.events {
        let badge = if event.is_virtual { "ONLINE" } else { "IN PERSON" };
        let _ = writeln!(
            out,
            "{:<tw$}  {:<9}  {:<lw$}  {}",
            truncate(&event.title, TITLE_WIDTH - 3),
            badge,
            truncate(&event.library, LIBRARY_WIDTH - 3),
            format_date(event.start_date, ctx.now, ctx.tz),
            tw = TITLE_WIDTH,
            lw = LIBRARY_WIDTH
        );
        let mut place = format_location(event.location.as_ref(), event.is_virtual);
        let address = format_full_address(event.location.as_ref());
        if !event.is_virtual && !address.is_empty() {
            let _ = write!(place, " ({address})");
        }
        let _ = writeln!(out, "{:<tw$}  {}", "", place, tw = TITLE_WIDTH);
    }

    let _ = writeln!(out, "\n{}", ctx.results_line());
    out
}
