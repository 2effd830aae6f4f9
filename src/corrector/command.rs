//! Corrector invocation
//!
//! Runs the privileged executable as `<script> <path> <uid> <umask>` with an
//! argument vector. No shell is involved, so spaces and quotes in file names
//! reach the executable untouched.

use async_trait::async_trait;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::corrector::validation::validate_target;
use crate::error::CorrectionError;
use crate::error::handlers::log_corrector_stderr;
use crate::identity::NumericIdentity;

/// Exit status of one corrector run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrectionStatus {
    /// Process exit code; -1 when the process was killed by a signal
    pub code: i32,
}

impl CorrectionStatus {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

#[async_trait]
pub trait OwnershipCorrector: Send + Sync {
    /// Apply `identity` and `permission_mask` to `path`.
    async fn correct(
        &self,
        path: &Path,
        identity: NumericIdentity,
        permission_mask: &str,
    ) -> Result<CorrectionStatus, CorrectionError>;
}

/// Corrector backed by an external executable
#[derive(Debug, Clone)]
pub struct ScriptCorrector {
    script_path: PathBuf,
    timeout: Duration,
}

impl ScriptCorrector {
    pub fn new(script_path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            script_path: script_path.into(),
            timeout,
        }
    }
}

#[async_trait]
impl OwnershipCorrector for ScriptCorrector {
    async fn correct(
        &self,
        path: &Path,
        identity: NumericIdentity,
        permission_mask: &str,
    ) -> Result<CorrectionStatus, CorrectionError> {
        let target = validate_target(path)?;

        let child = Command::new(&self.script_path)
            .arg(target)
            .arg(identity.to_string())
            .arg(permission_mask)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(CorrectionError::Spawn)?;

        // Dropping the future on timeout kills the child
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| CorrectionError::TimedOut(target.to_string()))?
            .map_err(CorrectionError::Spawn)?;

        let status = CorrectionStatus {
            code: output.status.code().unwrap_or(-1),
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            debug!("corrector stdout for {}: {}", target, stdout.trim());
        }

        if status.success() {
            info!("Corrected {} -> uid {} (mask {})", target, identity, permission_mask);
        } else {
            log_corrector_stderr(target, &String::from_utf8_lossy(&output.stderr));
        }

        Ok(status)
    }
}
