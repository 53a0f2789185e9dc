//! Book Club Events CLI Application
//!
//! This is the command-line interface for the book club event directory.
//! It uses the bookclub-filter library and adds:
//! - Feed loading from a file or URL
//! - Configuration file with default filters
//! - Report generation (TXT/HTML/JSON)

use anyhow::{anyhow, bail, Context, Result};
use bookclub_filter::{
    DateRangeResolver, DateRangeToken, EventField, EventStore, FilterPatch, Interval,
    LocationMode, Profile, Region, Timestamp,
};
use chrono::Utc;
use chrono_tz::Tz;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

mod config;
mod query;
mod report;
mod source;

use config::{AppConfig, OutputFormat};
use report::ReportContext;
use source::FeedSource;

/// Book Club Events - Filter a directory of library book club events
#[derive(Parser, Debug)]
#[command(name = "bookclub-cli")]
#[command(about = "Search and filter library book club events", long_about = None)]
#[command(version)]
struct Args {
    /// Path or http(s) URL of the events JSON feed
    #[arg(short, long, value_name = "PATH|URL")]
    feed: Option<String>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Page variant: directory, bay-area or new-england
    #[arg(long, value_name = "NAME")]
    profile: Option<String>,

    /// Free-text search (title, library, description, book, categories)
    #[arg(short, long, value_name = "TEXT")]
    search: Option<String>,

    /// Date filter: today, tomorrow, this-week, this-month, next-month
    #[arg(short, long, value_name = "TOKEN")]
    date: Option<String>,

    /// Custom range start (RFC 3339); requires --to, replaces --date
    #[arg(long, value_name = "TIME", requires = "to", conflicts_with = "date")]
    from: Option<String>,

    /// Custom range end, exclusive (RFC 3339); requires --from
    #[arg(long, value_name = "TIME", requires = "from")]
    to: Option<String>,

    /// Event type: all, online or in-person
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    location: Option<String>,

    /// Only events in this state (full name, e.g. "California")
    #[arg(long, value_name = "STATE")]
    state: Option<String>,

    /// Only events at this library
    #[arg(long, value_name = "LIBRARY")]
    library: Option<String>,

    /// Restrict to a regional library group (can be repeated; all must match)
    #[arg(short, long, value_name = "REGION")]
    region: Vec<String>,

    /// Turn off regions set in the config file or query before applying --region
    #[arg(long)]
    no_region: bool,

    /// Filters from a shared page link, e.g. "?search=mystery&filter=this-week"
    #[arg(long, value_name = "QUERY")]
    query: Option<String>,

    /// IANA time zone for day boundaries and displayed times (default UTC)
    #[arg(long, value_name = "TZ")]
    timezone: Option<String>,

    /// Reference time instead of the current time (RFC 3339)
    #[arg(long, value_name = "TIME")]
    now: Option<String>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// List the states and libraries present in the feed instead of events
    #[arg(long)]
    facets: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Book Club Events CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using filter library v{}", bookclub_filter::VERSION);

    let config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    run(&args, &config)
}

fn run(args: &Args, config: &AppConfig) -> Result<()> {
    let source = args
        .feed
        .as_deref()
        .or(config.feed.source.as_deref())
        .ok_or_else(|| anyhow!("No feed given. Use --feed <PATH|URL> or [feed] source in config"))?;
    let source = FeedSource::parse(source);

    let tz = parse_timezone(args.timezone.as_deref().or(config.calendar.timezone.as_deref()))?;
    let now = match &args.now {
        Some(text) => parse_instant(text)?,
        None => Utc::now(),
    };

    let profile_name = args
        .profile
        .as_deref()
        .or(config.filters.profile.as_deref())
        .unwrap_or("directory");
    let profile = Profile::by_name(profile_name)
        .ok_or_else(|| anyhow!("Unknown profile {profile_name:?}"))?;
    let scope = profile.scope;

    // Load the feed before touching the store so a failure leaves nothing half-loaded
    let feed = source.load(Duration::from_secs(config.feed.timeout_secs))?;

    let mut store = EventStore::with_profile(profile, DateRangeResolver::new(tz));
    store.load(feed.events);

    if args.facets {
        return write_output(&facets(&store), args, config);
    }

    store.set_filter(config_patch(config)?)?;
    if let Some(link) = &args.query {
        store
            .set_filter(query::from_query_string(link))
            .with_context(|| format!("Query {link:?} does not fit the {profile_name} page"))?;
    }
    if args.no_region {
        let cleared = clear_regions(store.profile());
        store.set_filter(cleared)?;
    }
    store.set_filter(args_patch(args)?)?;
    log::debug!("Filter query: {}", query::to_query_string(store.criteria()));

    let total = store.len();
    let events = store.recompute(now);
    let ctx = ReportContext {
        events: &events,
        total,
        now,
        tz,
        scope,
    };

    let format = args
        .format
        .or(config.output.format)
        .unwrap_or(OutputFormat::Txt);
    let rendered = report::render(format, &ctx)?;
    write_output(&rendered, args, config)
}

/// Default filters from the configuration file
fn config_patch(config: &AppConfig) -> Result<FilterPatch> {
    let filters = &config.filters;
    let mut patch = FilterPatch::new();

    if let Some(search) = &filters.search {
        patch = patch.with_search(search.clone());
    }
    if let Some(date) = &filters.date {
        patch = patch.with_date_range(DateRangeToken::parse(date));
    }
    if let Some(location) = &filters.location {
        patch = patch.with_location_mode(parse_location(location)?);
    }
    if let Some(state) = &filters.state {
        patch = patch.with_value("state", state.clone());
    }
    if let Some(library) = &filters.library {
        patch = patch.with_value("library", library.clone());
    }
    for region in &filters.regions {
        patch = patch.with_region(parse_region(region)?, true);
    }
    Ok(patch)
}

/// Filters given on the command line
fn args_patch(args: &Args) -> Result<FilterPatch> {
    let mut patch = FilterPatch::new();

    if let Some(search) = &args.search {
        patch = patch.with_search(search.clone());
    }
    if let (Some(from), Some(to)) = (&args.from, &args.to) {
        let interval = Interval::new(parse_instant(from)?, parse_instant(to)?);
        if interval.end <= interval.start {
            bail!("--to must be after --from");
        }
        patch = patch.with_date_range(DateRangeToken::Custom(interval));
    } else if let Some(date) = &args.date {
        let token = DateRangeToken::parse(date);
        if token.is_none() && !date.eq_ignore_ascii_case("none") {
            log::warn!("Unrecognized date filter {date:?}; showing all dates");
        }
        patch = patch.with_date_range(token);
    }
    if let Some(location) = &args.location {
        patch = patch.with_location_mode(parse_location(location)?);
    }
    if let Some(state) = &args.state {
        patch = patch.with_value("state", state.clone());
    }
    if let Some(library) = &args.library {
        patch = patch.with_value("library", library.clone());
    }
    for region in &args.region {
        patch = patch.with_region(parse_region(region)?, true);
    }
    Ok(patch)
}

/// Turn off every region toggle the profile offers
fn clear_regions(profile: &Profile) -> FilterPatch {
    Region::ALL
        .into_iter()
        .map(|region| region.dimension_name())
        .filter(|name| profile.dimension(name).is_some())
        .fold(FilterPatch::new(), |patch, name| patch.clear(name))
}

/// Distinct states and libraries, one per line under a heading
fn facets(store: &EventStore) -> String {
    let mut out = String::new();
    for (heading, field) in [("States", EventField::StateFull), ("Libraries", EventField::Library)] {
        out.push_str(heading);
        out.push_str(":\n");
        for value in store.distinct_values(field) {
            out.push_str("  ");
            out.push_str(&value);
            out.push('\n');
        }
    }
    out
}

fn write_output(rendered: &str, args: &Args, config: &AppConfig) -> Result<()> {
    match args.output.as_ref().or(config.output.path.as_ref()) {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write output file: {:?}", path))?;
            log::info!("Report written to {:?}", path);
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn parse_location(text: &str) -> Result<LocationMode> {
    text.parse::<LocationMode>().map_err(|e| anyhow!(e))
}

fn parse_region(text: &str) -> Result<Region> {
    Region::from_slug(text.trim())
        .ok_or_else(|| anyhow!("Unknown region {text:?} (expected bay-area or new-england)"))
}

fn parse_timezone(name: Option<&str>) -> Result<Tz> {
    match name {
        Some(name) => name
            .parse::<Tz>()
            .map_err(|e| anyhow!("Invalid time zone {name:?}: {e}")),
        None => Ok(Tz::UTC),
    }
}

fn parse_instant(text: &str) -> Result<Timestamp> {
    bookclub_filter::feed::parse_timestamp(text.trim())
        .ok_or_else(|| anyhow!("Invalid time {text:?} (expected RFC 3339, e.g. 2024-06-13T10:00:00Z)"))
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
