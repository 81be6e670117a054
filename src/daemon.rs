/// Core daemon implementation for the weather-warning monitor
///
/// One tick:
/// 1. Builds a trailing-window query for each region 0..9, in order
/// 2. Fetches and parses the feed text for that region
/// 3. Filters out warnings reported on an earlier tick
/// 4. Formats what is left and collects it across regions
/// 5. Marks every identity of the tick as seen
/// 6. Delivers one aggregate message, or nothing when no region has news
///
/// A failing region never stops the others. The daemon runs a tick either
/// once (`run_once`) or on the recurring schedule (`run`).

use crate::alert::dedup::SeenSet;
use crate::alert::format::{aggregate_message, region_report, RegionReport};
use crate::config::Settings;
use crate::ingest::kma::{parse_feed, FeedOutcome};
use crate::ingest::WarningFeed;
use crate::model::{RegionQuery, WarningIdentity, WarningRecord, ALL_WARNING_TYPES};
use crate::regions::Region;
use crate::schedule::Schedule;
use crate::slack::Notifier;
use chrono::{DateTime, Duration, Utc};
use tracing::{error, info, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// `wrn` filter sent with every query (default: all types)
    pub warning_type: String,

    /// `disp` parameter sent with every query
    pub display_level: u8,

    /// Length of the trailing query window (default: 60 minutes)
    pub window: Duration,

    /// Primary tick cadence (default: 5 minutes)
    pub primary_interval: Duration,

    /// Backup tick cadence (default: 60 minutes)
    pub backup_interval: Duration,

    /// How often the schedule is checked (default: 60 seconds)
    pub poll_interval: std::time::Duration,

    /// Run a tick right away in recurring mode
    pub run_on_start: bool,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            warning_type: ALL_WARNING_TYPES.to_string(),
            display_level: 0,
            window: Duration::minutes(60),
            primary_interval: Duration::minutes(5),
            backup_interval: Duration::minutes(60),
            poll_interval: std::time::Duration::from_secs(60),
            run_on_start: false,
        }
    }
}

impl From<&Settings> for DaemonConfig {
    fn from(settings: &Settings) -> Self {
        DaemonConfig {
            warning_type: settings.feed.warning_type.clone(),
            display_level: settings.feed.display_level,
            window: Duration::minutes(i64::from(settings.feed.window_minutes)),
            primary_interval: Duration::minutes(i64::from(settings.schedule.primary_minutes)),
            backup_interval: Duration::minutes(i64::from(settings.schedule.backup_minutes)),
            poll_interval: std::time::Duration::from_secs(settings.schedule.poll_seconds),
            run_on_start: settings.schedule.run_on_start,
        }
    }
}

// ---------------------------------------------------------------------------
// Tick result
// ---------------------------------------------------------------------------

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    /// One report per region, in region order.
    pub reports: Vec<RegionReport>,
    /// `None` when there was nothing to send, otherwise the delivery result.
    pub delivered: Option<bool>,
}

impl TickSummary {
    /// Regions that contributed new warnings.
    pub fn regions_with_news(&self) -> Vec<Region> {
        self.reports
            .iter()
            .filter(|r| r.is_deliverable())
            .map(RegionReport::region)
            .collect()
    }
}

/// One region's outcome before the tick's identities are merged.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionPoll {
    pub report: RegionReport,
    /// Identities of every record in the response, new or not.
    pub observed: Vec<WarningIdentity>,
}

impl RegionPoll {
    fn without_records(report: RegionReport) -> Self {
        Self {
            report,
            observed: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Daemon State
// ---------------------------------------------------------------------------

/// Main daemon state
pub struct Daemon<F, N> {
    config: DaemonConfig,
    feed: F,
    notifier: N,
    seen: SeenSet,
}

impl<F: WarningFeed, N: Notifier> Daemon<F, N> {
    /// Create a new daemon instance with default configuration
    pub fn new(feed: F, notifier: N) -> Self {
        Self::with_config(DaemonConfig::default(), feed, notifier)
    }

    /// Create daemon with custom configuration
    pub fn with_config(config: DaemonConfig, feed: F, notifier: N) -> Self {
        Self {
            config,
            feed,
            notifier,
            seen: SeenSet::new(),
        }
    }

    pub fn config(&self) -> &DaemonConfig {
        &self.config
    }

    /// Every warning identity reported so far
    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    /// Fetch, parse, dedup and format a single region
    ///
    /// Records are classified against the seen set as it stands; nothing is
    /// merged here. `run_tick` merges every region's identities once the
    /// whole tick has been classified.
    pub fn poll_region(&self, region: Region, now: DateTime<Utc>) -> RegionPoll {
        let query = RegionQuery::trailing(
            region,
            &self.config.warning_type,
            self.config.display_level,
            now,
            self.config.window,
        );
        info!(region = region.code(), name = region.name(), "querying region");

        let text = match self.feed.fetch(&query) {
            Ok(text) => text,
            Err(e) => {
                error!(region = region.code(), error = %e, "warning feed request failed");
                return RegionPoll::without_records(RegionReport::FetchError {
                    region,
                    reason: e.to_string(),
                });
            }
        };

        let records: Vec<WarningRecord> = match parse_feed(&text) {
            FeedOutcome::EmptyResponse => {
                warn!(region = region.code(), "warning feed returned an empty body");
                return RegionPoll::without_records(RegionReport::EmptyResponse { region });
            }
            FeedOutcome::Records(lines) => lines.collect(),
        };

        let observed: Vec<WarningIdentity> = records.iter().map(WarningRecord::identity).collect();
        let mut fresh = self.seen.unseen(observed.iter().cloned());
        if !fresh.is_empty() {
            info!(region = region.code(), count = fresh.len(), "new warnings found");
        }

        // Keep the first record for each new identity; repeats and records
        // already reported on an earlier tick are dropped.
        let selected = records.iter().filter(|record| fresh.remove(&record.identity()));
        let report = region_report(region, selected);

        if !report.is_deliverable() {
            info!(region = region.code(), name = region.name(), "no new warnings");
        }
        RegionPoll { report, observed }
    }

    /// Run one tick across all regions and deliver the result
    pub fn run_tick(&mut self, now: DateTime<Utc>) -> TickSummary {
        let polls: Vec<RegionPoll> = Region::all()
            .map(|region| self.poll_region(region, now))
            .collect();

        let mut reports = Vec::with_capacity(polls.len());
        for poll in polls {
            self.seen.merge(poll.observed);
            reports.push(poll.report);
        }

        let delivered = match aggregate_message(&reports) {
            Some(message) => Some(self.notifier.deliver(&message)),
            None => {
                info!("no new warnings in any region, nothing sent");
                None
            }
        };

        TickSummary { reports, delivered }
    }

    /// Single-shot mode: one tick against the current time
    pub fn run_once(&mut self) -> TickSummary {
        info!("weather warning check started");
        let summary = self.run_tick(Utc::now());
        info!(
            regions_with_news = summary.regions_with_news().len(),
            "weather warning check finished"
        );
        summary
    }

    /// Recurring mode (runs indefinitely)
    pub fn run(&mut self) -> ! {
        let mut schedule = Schedule::new(
            Utc::now(),
            &[self.config.primary_interval, self.config.backup_interval],
        );
        info!(
            primary_minutes = self.config.primary_interval.num_minutes(),
            backup_minutes = self.config.backup_interval.num_minutes(),
            poll_seconds = self.config.poll_interval.as_secs(),
            "scheduler started"
        );

        if self.config.run_on_start {
            self.run_once();
        }

        loop {
            let now = Utc::now();
            if schedule.any_due(now) {
                self.run_once();
                schedule.mark_run(now, Utc::now());
            }
            std::thread::sleep(self.config.poll_interval);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
