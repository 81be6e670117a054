//! wrnmon_service: KMA weather-warning monitor with Slack delivery.
//!
//! # Module structure
//!
//! ```text
//! wrnmon_service
//! ├── model       - shared data types (WarningRecord, WarningIdentity, RegionQuery, FeedError, …)
//! ├── regions     - KMA query regions 0–9 and their display names
//! ├── config      - environment secrets + wrnmon.toml settings
//! ├── logging     - tracing subscriber setup (stdout + optional log file)
//! ├── daemon      - per-region tick, single-shot and recurring entry points
//! ├── schedule    - primary/backup due-time trackers for recurring mode
//! ├── slack       - incoming-webhook delivery client
//! ├── ingest
//! │   ├── kma     - wrn_met_data.php: URL construction, fetch, text parsing
//! │   └── fixtures (test only) - representative feed responses
//! └── alert
//!     ├── dedup   - seen-set of warning identities
//!     └── format  - code labels, record template, aggregate message
//! ```

// Public modules
pub mod alert;
pub mod config;
pub mod daemon;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod regions;
pub mod schedule;
pub mod slack;
