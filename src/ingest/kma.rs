//! KMA API Hub weather-warning client (`wrn_met_data.php`).
//!
//! Handles URL construction, the blocking HTTP fetch and parsing of the
//! comma-delimited text response:
//!   https://apihub.kma.go.kr/api/typ01/url/wrn_met_data.php
//!
//! See `fixtures.rs` for annotated examples of the response layout.

use std::time::Duration;

use tracing::debug;

use crate::config::FeedSettings;
use crate::ingest::WarningFeed;
use crate::model::{FeedError, RegionQuery, WarningRecord, FIELD_COUNT};

/// Marks a comment or framing line in the feed.
const COMMENT_MARKER: char = '#';

/// Ends every data line.
const LINE_TERMINATOR: char = '=';

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds the feed URL for `query`.
///
/// `help=0` suppresses the column legend; the legend is comment lines and
/// would be skipped anyway, but it bloats every response.
pub fn build_warning_url(base_url: &str, query: &RegionQuery, auth_key: &str) -> String {
    format!(
        "{}?reg={}&wrn={}&tmfc1={}&tmfc2={}&disp={}&help=0&authKey={}",
        base_url,
        query.region.code(),
        urlencoding::encode(&query.warning_type),
        query.tmfc1(),
        query.tmfc2(),
        query.display_level,
        urlencoding::encode(auth_key),
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Result of parsing one response body.
#[derive(Debug)]
pub enum FeedOutcome<'a> {
    /// The body was empty or whitespace only.
    EmptyResponse,
    /// The body had content; the iterator yields its well-formed data lines.
    /// It may yield nothing at all.
    Records(WarningLines<'a>),
}

/// Parses a response body.
///
/// An empty body is reported separately from a body that simply has no
/// data lines, since the former usually means the request itself went wrong.
pub fn parse_feed(text: &str) -> FeedOutcome<'_> {
    if text.trim().is_empty() {
        FeedOutcome::EmptyResponse
    } else {
        FeedOutcome::Records(WarningLines { lines: text.lines() })
    }
}

/// Lazy iterator over the records of a response body.
///
/// Comment lines, blank lines and malformed data lines are skipped.
#[derive(Debug, Clone)]
pub struct WarningLines<'a> {
    lines: std::str::Lines<'a>,
}

impl Iterator for WarningLines<'_> {
    type Item = WarningRecord;

    fn next(&mut self) -> Option<WarningRecord> {
        self.lines.by_ref().find_map(parse_line)
    }
}

/// Parses one line of feed text.
///
/// Returns `None` for comment lines, blank lines, lines without the `=`
/// terminator and lines that do not split into exactly 11 fields. The
/// bulletin column is not quoted, so a comma inside it makes the line
/// unparseable.
pub fn parse_line(line: &str) -> Option<WarningRecord> {
    if line.starts_with(COMMENT_MARKER) {
        return None;
    }

    let body = line.trim().strip_suffix(LINE_TERMINATOR)?;
    let fields: Vec<&str> = body.split(',').map(str::trim).collect();
    if fields.len() != FIELD_COUNT {
        debug!(fields = fields.len(), "skipping line with unexpected field count");
        return None;
    }

    WarningRecord::from_fields(&fields)
}

// ---------------------------------------------------------------------------
// HTTP client
// ---------------------------------------------------------------------------

/// Blocking client for the warning feed.
pub struct KmaClient {
    client: reqwest::blocking::Client,
    base_url: String,
    auth_key: String,
}

impl KmaClient {
    /// Builds a client with the configured timeout and TLS policy.
    pub fn new(settings: &FeedSettings, auth_key: Option<String>) -> Result<Self, FeedError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .build()
            .map_err(|e| FeedError::Transport(e.to_string()))?;

        Ok(KmaClient {
            client,
            base_url: settings.base_url.clone(),
            auth_key: auth_key.unwrap_or_default(),
        })
    }
}

impl WarningFeed for KmaClient {
    fn fetch(&self, query: &RegionQuery) -> Result<String, FeedError> {
        let url = build_warning_url(&self.base_url, query, &self.auth_key);
        debug!(url = %build_warning_url(&self.base_url, query, "***"), "fetching warnings");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| FeedError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        // The feed does not always declare a charset; it is always UTF-8.
        let bytes = response
            .bytes()
            .map_err(|e| FeedError::Body(e.without_url().to_string()))?;
        let text = String::from_utf8_lossy(&bytes).into_owned();

        if !status.is_success() {
            return Err(FeedError::HttpStatus {
                status: status.as_u16(),
                body: text.trim().chars().take(200).collect(),
            });
        }

        Ok(text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
