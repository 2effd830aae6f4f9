//! Scheduled re-fix of pending entries

use log::{info, warn};

use crate::engine::{FixOutcome, ReconciliationEngine, SweepReport};
use crate::error::handlers::log_fix_failure;
use crate::error::{FixError, FixListError};
use crate::storage::FileId;

impl ReconciliationEngine {
    /// Retry the ownership fix for `id`, retiring entries whose file is gone.
    pub async fn fix_owner_in_cron(&self, id: FileId) -> Result<FixOutcome, FixError> {
        let _guard = self.locks.acquire(id).await;
        self.fix_cron_locked(id)
            .await
            .inspect_err(|e| log_fix_failure("cron", e))
    }

    async fn fix_cron_locked(&self, id: FileId) -> Result<FixOutcome, FixError> {
        let mounts = self.storage.mounts_for_id(id)?;
        let Some(mount) = mounts.first() else {
            self.fix_list.delete(id)?;
            info!("File {} no longer exists, dropped from fix list", id);
            return Ok(FixOutcome::Retired);
        };
        let owner = mount.username.as_str();

        if self.is_admin(owner).await {
            self.fix_list.mark_fixed(id)?;
            return Ok(FixOutcome::Exempt);
        }

        let internal_path = self
            .storage
            .internal_path_by_id(owner, id)?
            .ok_or(FixError::PathNotFound(id))?;
        let local_path = self.storage.local_path(owner, &internal_path)?;

        match self.correct_and_record(id, owner, &local_path).await {
            Err(e @ FixError::NotManaged { .. }) => {
                self.fix_list.delete(id)?;
                Err(e)
            }
            result => result,
        }
    }

    /// Process up to `sweep_batch_size` pending entries, one at a time.
    pub async fn sweep(&self) -> Result<SweepReport, FixListError> {
        let limit = self.runtime.read().await.sweep_batch_size;
        let pending = self.fix_list.pending(limit)?;

        let mut report = SweepReport::default();
        for id in pending {
            let outcome = self.fix_owner_in_cron(id).await.ok();
            if outcome.is_none() {
                // Failed entries go to the back of the queue
                self.fix_list.touch(id)?;
            }
            report.record(outcome);
        }

        if report.failed > 0 {
            warn!(
                "Sweep finished: {} examined, {} corrected, {} exempt, {} retired, {} failed",
                report.examined, report.corrected, report.exempt, report.retired, report.failed
            );
        } else if report.examined > 0 {
            info!(
                "Sweep finished: {} examined, {} corrected, {} exempt, {} retired",
                report.examined, report.corrected, report.exempt, report.retired
            );
        }

        Ok(report)
    }
}
