//! Ownership corrector
//!
//! Hands a local path to the privileged correction executable and reports its
//! exit status.

pub mod command;
pub mod validation;

pub use command::{CorrectionStatus, OwnershipCorrector, ScriptCorrector};
pub use validation::validate_target;
