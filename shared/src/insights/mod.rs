//! Display computations over already-fetched collections.
//!
//! Nothing here touches storage. Every function is recomputed from scratch on
//! each call, and every relationship is resolved by exact name match
//! (`Member::full_name`, `Community::name`, `Event::name`).

mod attendance;
mod communities;
mod dashboard;
mod finance;
mod members;
mod retention;

pub use attendance::*;
pub use communities::*;
pub use dashboard::*;
pub use finance::*;
pub use members::*;
pub use retention::*;

use chrono::NaiveDate;

/// Parse the leading `YYYY-MM-DD` of a stored date string.
///
/// Accepts bare dates and RFC 3339 timestamps; anything else yields `None`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let head = value.trim().get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}
