//! Feed source: local file or one-shot HTTP fetch

use anyhow::{Context, Result};
use bookclub_filter::{parse_feed, FeedLoad};
use reqwest::blocking::Client;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Where the events JSON comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    File(String),
    Url(String),
}

impl FeedSource {
    /// Classify a source string: http(s) URLs are fetched, anything else is a path
    pub fn parse(source: &str) -> Self {
        let trimmed = source.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            FeedSource::Url(trimmed.to_string())
        } else {
            FeedSource::File(trimmed.to_string())
        }
    }

    /// Read the raw JSON text
    pub fn read(&self, timeout: Duration) -> Result<String> {
        match self {
            FeedSource::File(path) => fs::read_to_string(Path::new(path))
                .with_context(|| format!("Failed to read feed file: {path}")),
            FeedSource::Url(url) => fetch_json(url, timeout),
        }
    }

    /// Read and validate the feed
    ///
    /// Either the whole document parses or nothing is returned.
    pub fn load(&self, timeout: Duration) -> Result<FeedLoad> {
        let json = self.read(timeout)?;
        let feed = parse_feed(&json).with_context(|| format!("Invalid event feed from {self}"))?;
        log::info!(
            "Loaded {} events from {} ({} rejected)",
            feed.events.len(),
            self,
            feed.rejected.len()
        );
        Ok(feed)
    }
}

impl std::fmt::Display for FeedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedSource::File(path) => write!(f, "{path}"),
            FeedSource::Url(url) => write!(f, "{url}"),
        }
    }
}

fn fetch_json(url: &str, timeout: Duration) -> Result<String> {
    log::debug!("Fetching feed: {url}");
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(concat!("bookclub-cli/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let response = client
        .get(url)
        .send()
        .with_context(|| format!("request failed for {url}"))?;
    let response = response
        .error_for_status()
        .with_context(|| format!("non-success status for {url}"))?;
    response
        .text()
        .with_context(|| format!("unable to read response body for {url}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_source_classification() {
        assert_eq!(
            FeedSource::parse("https://example.org/events.json"),
            FeedSource::Url("https://example.org/events.json".into())
        );
        assert_eq!(
            FeedSource::parse("public/events.json"),
            FeedSource::File("public/events.json".into())
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"events": [{{"id": "1", "title": "t", "library": "L", "description": "d"}}]}}"#
        )
        .unwrap();

        let source = FeedSource::File(file.path().to_string_lossy().into_owned());
        let feed = source.load(Duration::from_secs(1)).unwrap();
        assert_eq!(feed.events.len(), 1);
    }

    #[test]
    fn test_malformed_file_fails_whole_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"events\": [").unwrap();

        let source = FeedSource::File(file.path().to_string_lossy().into_owned());
        assert!(source.load(Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_missing_file() {
        let source = FeedSource::parse("/nonexistent/events.json");
        assert!(source.read(Duration::from_secs(1)).is_err());
    }
}
