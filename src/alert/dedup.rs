//! New-warning detection.
//!
//! The feed is queried with a trailing one-hour window, so consecutive
//! ticks see the same announcements again. `SeenSet` remembers every
//! identity reported on an earlier tick. Within a tick every region is
//! classified against the set as it stood when the tick began; the tick's
//! identities are merged only once all regions are done. The set lives for
//! the whole process and is never pruned.

use std::collections::{BTreeSet, HashSet};

use crate::model::WarningIdentity;

/// Every warning identity observed since process start.
#[derive(Debug, Default, Clone)]
pub struct SeenSet {
    seen: HashSet<WarningIdentity>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identities in `current` that are not in the set. Does not modify it.
    ///
    /// Ordered so that callers iterating the result get a stable order
    /// regardless of hashing.
    pub fn unseen<I>(&self, current: I) -> BTreeSet<WarningIdentity>
    where
        I: IntoIterator<Item = WarningIdentity>,
    {
        current.into_iter().filter(|id| !self.contains(id)).collect()
    }

    /// Adds all of `current` to the set (union, never replace).
    pub fn merge<I>(&mut self, current: I)
    where
        I: IntoIterator<Item = WarningIdentity>,
    {
        self.seen.extend(current);
    }

    pub fn contains(&self, identity: &WarningIdentity) -> bool {
        self.seen.contains(identity)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
