//! Fix list
//!
//! Persistent record of which files still need an ownership fix.

pub mod results;
pub mod store;

pub use results::{FixListEntry, FixStatus};
pub use store::FixList;
