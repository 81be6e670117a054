//! Core data types for the KMA weather-warning monitor.
//!
//! This module defines the shared domain model imported by all other modules:
//! the parsed warning record, its dedup identity, the per-region feed query
//! and the error types for the two remote collaborators.

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use thiserror::Error;

use crate::regions::Region;

// ---------------------------------------------------------------------------
// Feed layout
// ---------------------------------------------------------------------------

/// Number of comma-separated fields on a `wrn_met_data.php` data line:
/// TM_FC, TM_EF, TM_IN, STN, REG_ID, WRN, LVL, CMD, GRD, CNT, RPT.
pub const FIELD_COUNT: usize = 11;

/// Warning-type filter meaning "all warning types".
pub const ALL_WARNING_TYPES: &str = "A";

/// KMA timestamps are Korea Standard Time, UTC+09:00.
pub fn kst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).expect("UTC+09:00 is a valid offset")
}

/// Format used by the feed for `tmfc1`/`tmfc2` and the `TM_*` columns.
pub const FEED_TIME_FORMAT: &str = "%Y%m%d%H%M";

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One warning announcement, as listed on a single feed data line.
///
/// All fields are kept as the trimmed strings the feed sent; code fields
/// are translated to labels only when formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarningRecord {
    pub tm_fc: String,   // issue time, YYYYMMDDHHMM
    pub tm_ef: String,   // effective time
    pub tm_in: String,   // input time
    pub stn: String,     // issuing station
    pub reg_id: String,  // warning zone code, e.g. "L1010000"
    pub wrn: String,     // warning type code, e.g. "W"
    pub lvl: String,     // level code, e.g. "2"
    pub cmd: String,     // command code, e.g. "1"
    pub grd: String,
    pub cnt: String,     // work status
    pub rpt: String,     // bulletin text
}

impl WarningRecord {
    /// Builds a record from exactly [`FIELD_COUNT`] fields in feed order.
    ///
    /// Returns `None` for any other field count.
    pub fn from_fields(fields: &[&str]) -> Option<Self> {
        let [tm_fc, tm_ef, tm_in, stn, reg_id, wrn, lvl, cmd, grd, cnt, rpt] = fields else {
            return None;
        };

        Some(WarningRecord {
            tm_fc: tm_fc.to_string(),
            tm_ef: tm_ef.to_string(),
            tm_in: tm_in.to_string(),
            stn: stn.to_string(),
            reg_id: reg_id.to_string(),
            wrn: wrn.to_string(),
            lvl: lvl.to_string(),
            cmd: cmd.to_string(),
            grd: grd.to_string(),
            cnt: cnt.to_string(),
            rpt: rpt.to_string(),
        })
    }

    /// The key used to tell one announcement event from another.
    pub fn identity(&self) -> WarningIdentity {
        WarningIdentity {
            tm_fc: self.tm_fc.clone(),
            reg_id: self.reg_id.clone(),
            wrn: self.wrn.clone(),
            lvl: self.lvl.clone(),
            cmd: self.cmd.clone(),
        }
    }
}

/// Dedup key of a [`WarningRecord`]: (issue time, zone, type, level, command).
///
/// A lifted warning (command 해제) differs from its announcement (발표) in
/// the command code, so it is a distinct identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WarningIdentity {
    pub tm_fc: String,
    pub reg_id: String,
    pub wrn: String,
    pub lvl: String,
    pub cmd: String,
}

impl std::fmt::Display for WarningIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}_{}_{}_{}", self.tm_fc, self.reg_id, self.wrn, self.lvl, self.cmd)
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Parameters of one `wrn_met_data.php` request.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionQuery {
    pub region: Region,
    /// `wrn` parameter; [`ALL_WARNING_TYPES`] for every type.
    pub warning_type: String,
    /// `disp` parameter.
    pub display_level: u8,
    /// Window start (`tmfc1`), KST.
    pub from: DateTime<FixedOffset>,
    /// Window end (`tmfc2`), KST.
    pub to: DateTime<FixedOffset>,
}

impl RegionQuery {
    /// Query for a trailing window of `window` ending at `now`.
    pub fn trailing(
        region: Region,
        warning_type: &str,
        display_level: u8,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Self {
        let to = kst().from_utc_datetime(&now.naive_utc());
        RegionQuery {
            region,
            warning_type: warning_type.to_string(),
            display_level,
            from: to - window,
            to,
        }
    }

    /// `tmfc1` in feed format.
    pub fn tmfc1(&self) -> String {
        self.from.format(FEED_TIME_FORMAT).to_string()
    }

    /// `tmfc2` in feed format.
    pub fn tmfc2(&self) -> String {
        self.to.format(FEED_TIME_FORMAT).to_string()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching the KMA warning feed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeedError {
    /// Connection, TLS or timeout failure.
    #[error("transport error: {0}")]
    Transport(String),
    /// Non-2xx HTTP response from the feed.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
    /// The body could not be read as text.
    #[error("unreadable response body: {0}")]
    Body(String),
}

/// Errors that can arise when posting to the chat webhook.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeliveryError {
    /// Connection, TLS or timeout failure.
    #[error("transport error: {0}")]
    Transport(String),
    /// The webhook answered with something other than 200.
    #[error("HTTP {status} - {body}")]
    Status { status: u16, body: String },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
