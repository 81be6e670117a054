//! Feed ingestion.
//!
//! `kma` holds the `wrn_met_data.php` client and text parser. When other
//! warning sources are added they each get their own file here.

pub mod kma;

#[cfg(test)]
pub(crate) mod fixtures;

use crate::model::{FeedError, RegionQuery};

/// A source of raw warning-feed text, one request per region query.
///
/// Implemented by [`kma::KmaClient`]; tests substitute in-memory feeds.
pub trait WarningFeed {
    fn fetch(&self, query: &RegionQuery) -> Result<String, FeedError>;
}
