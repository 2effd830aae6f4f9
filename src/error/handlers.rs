//! Error handlers
//!
//! Failure logging for the reconciliation paths.

use crate::error::types::FixError;
use log::{error, warn};

/// Log target shared by every failure path.
pub const LOG_TARGET: &str = "owner_fixer";

/// Log a failed ownership fix attempt.
///
/// `operation` names the entry point (`runtime` or `cron`).
pub fn log_fix_failure(operation: &str, err: &FixError) {
    match err {
        FixError::NotManaged { username, path } => error!(
            target: LOG_TARGET,
            "[{}] no directory identity for: {} Node Path: {}", operation, username, path
        ),
        FixError::CorrectionFailed { path, code } => error!(
            target: LOG_TARGET,
            "[{}] owner could not fix (exit {}). Node Path: {}", operation, code, path
        ),
        _ => error!(target: LOG_TARGET, "[{}] {}", operation, err),
    }
}

/// Log a corrector that wrote to stderr while failing.
pub fn log_corrector_stderr(path: &str, stderr: &str) {
    if !stderr.trim().is_empty() {
        warn!(target: LOG_TARGET, "corrector stderr for {}: {}", path, stderr.trim());
    }
}
