//! Test fixtures: representative `wrn_met_data.php` response bodies.
//!
//! The feed answers with plain UTF-8 text framed by `#START7777` /
//! `#7777END` marker lines. Comment lines start with `#`; each data line
//! carries 11 comma-separated columns and ends with `=`:
//!
//!   TM_FC, TM_EF, TM_IN, STN, REG_ID, WRN, LVL, CMD, GRD, CNT, RPT=
//!
//! Columns are padded with spaces, so parsers must trim every field.

/// Two announcements in the Seoul/Gyeonggi zone: a wind advisory (W/2/1)
/// and a heavy-rain warning (R/3/1).
#[cfg(test)]
pub(crate) fn fixture_two_warnings() -> &'static str {
    "#START7777\n\
     #--------------------------------------------------------------------------------------------------\n\
     #  기상특보 목록\n\
     #--------------------------------------------------------------------------------------------------\n\
     # TM_FC, TM_EF, TM_IN, STN, REG_ID, WRN, LVL, CMD, GRD, CNT, RPT\n\
     #--------------------------------------------------------------------------------------------------\n\
     202401010000, 202401010100, 202401010005, 108, L1010000, W, 2, 1, 0, 0, 0=\n\
     202401010030, 202401010100, 202401010035, 109, L1100100, R, 3, 1, 0, 1, 2=\n\
     #7777END\n"
}

/// Header and footer only: a valid response for a quiet hour.
#[cfg(test)]
pub(crate) fn fixture_no_warnings() -> &'static str {
    "#START7777\n\
     # TM_FC, TM_EF, TM_IN, STN, REG_ID, WRN, LVL, CMD, GRD, CNT, RPT\n\
     #7777END\n"
}

/// Mixed good and malformed lines. Only the first and last data lines are
/// well formed; the others are missing the terminator, short a field, or
/// carry a comma inside the bulletin column.
#[cfg(test)]
pub(crate) fn fixture_mixed_lines() -> &'static str {
    "#START7777\n\
     \n\
     202401010000, 202401010100, 202401010005, 108, L1010000, W, 2, 1, 0, 0, 0=\n\
     202401010000, 202401010100, 202401010005, 108, L1010000, W, 2, 1, 0, 0, 0\n\
     202401010000, 202401010100, 202401010005, 108, L1010000, W, 2, 1, 0, 0=\n\
     202401010000, 202401010100, 202401010005, 108, L1010000, W, 2, 1, 0, 0, a,b=\n\
     \x20\x20\x20\n\
     202401010200, 202401010300, 202401010205, 159, L1080100, V, 2, 3, 0, 0, 0=\r\n\
     #7777END\n"
}

/// An announcement followed later by the lift of the same warning.
#[cfg(test)]
pub(crate) fn fixture_announce_then_lift() -> &'static str {
    "#START7777\n\
     202401010000, 202401010100, 202401010005, 108, L1010000, W, 2, 1, 0, 0, 0=\n\
     202401010000, 202401010600, 202401010605, 108, L1010000, W, 2, 3, 0, 0, 0=\n\
     #7777END\n"
}
