//! Turning parsed records into notifications.
//!
//! - `dedup`  - which warnings have not been reported yet
//! - `format` - code labels, the record template and the aggregate message

pub mod dedup;
pub mod format;
