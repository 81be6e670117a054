//! Region registry for the KMA warning feed.
//!
//! The `reg` query parameter of `wrn_met_data.php` selects one of ten
//! broad regions. Region 0 is the whole country and overlaps every other
//! region. This is the single source of truth for region codes and their
//! display names.

// ---------------------------------------------------------------------------
// Region metadata
// ---------------------------------------------------------------------------

/// Display names indexed by region code.
static REGION_NAMES: [&str; 10] = [
    "전국",
    "서울/경기",
    "강원",
    "충북",
    "충남",
    "전북",
    "전남",
    "경북",
    "경남",
    "제주",
];

/// A validated KMA region code, 0 through 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Region(u8);

impl Region {
    /// Returns `None` for codes outside 0..=9.
    pub fn new(code: u8) -> Option<Self> {
        (usize::from(code) < REGION_NAMES.len()).then_some(Region(code))
    }

    /// Every region, in the order a tick visits them.
    pub fn all() -> impl Iterator<Item = Region> {
        (0..REGION_NAMES.len() as u8).map(Region)
    }

    pub fn code(self) -> u8 {
        self.0
    }

    pub fn name(self) -> &'static str {
        REGION_NAMES[usize::from(self.0)]
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
