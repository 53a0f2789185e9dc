//! HTML report: table rows for the events container

use super::format::{event_url, format_date, format_full_date, format_location};
use super::ReportContext;
use bookclub_filter::Event;
use maud::{html, Markup, DOCTYPE};

/// Render a standalone page with the results table
pub fn render(ctx: &ReportContext<'_>) -> String {
    page(ctx).into_string()
}

fn page(ctx: &ReportContext<'_>) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { "Book Club Events" }
            }
            body {
                p id="results-info" {
                    "Showing " span class="results-count" { (ctx.events.len()) }
                    " of " (ctx.total) " "
                    @if let Some(region) = ctx.scope { (region.display_name()) " " }
                    "events"
                }
                table class="events-table" {
                    thead {
                        tr {
                            th { "Event" }
                            th { "Type" }
                            th { "Library" }
                            th { "Date" }
                            th { "Location" }
                            th {}
                        }
                    }
                    tbody id="events-container" {
                        @if ctx.events.is_empty() {
                            (empty_state())
                        } @else {
                            @for event in ctx.events {
                                (event_row(event, ctx))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn event_row(event: &Event, ctx: &ReportContext<'_>) -> Markup {
    let url = event_url(&event.id);
    html! {
        tr {
            td class="event-name" {
                a href=(url) { (event.title) }
            }
            td {
                @if event.is_virtual {
                    span class="type-badge online" { "ONLINE" }
                } @else {
                    span class="type-badge in-person" { "IN PERSON" }
                }
            }
            td class="library-name" { (event.library) }
            td class="event-date" title=(format_full_date(event.start_date, ctx.tz)) {
                (format_date(event.start_date, ctx.now, ctx.tz))
            }
            td class="event-location" { (format_location(event.location.as_ref(), event.is_virtual)) }
            td {
                a href=(url) class="details-link" { "View →" }
            }
        }
    }
}

fn empty_state() -> Markup {
    html! {
        tr {
            td colspan="6" {
                div class="empty-state" {
                    h3 { "No events found" }
                    p { "Try adjusting your filters or search terms" }
                }
            }
        }
    }
}
