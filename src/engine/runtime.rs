//! Write-time ownership fix

use crate::engine::{FixOutcome, ReconciliationEngine};
use crate::error::FixError;
use crate::error::handlers::log_fix_failure;
use crate::storage::{FileId, FilesystemObject};

impl ReconciliationEngine {
    /// Post-write hook: track the object as Pending, then try to fix it now.
    ///
    /// A failed attempt leaves the Pending row behind for the sweep, unless
    /// the owner is outside the directory: that is never retried.
    pub async fn on_write(&self, object: &FilesystemObject) -> Result<FixOutcome, FixError> {
        let _guard = self.locks.acquire(object.id).await;
        self.fix_list.add_pending(object.id)?;
        match self.fix_runtime_locked(object).await {
            Err(e @ FixError::NotManaged { .. }) => {
                self.fix_list.delete(object.id)?;
                log_fix_failure("runtime", &e);
                Err(e)
            }
            result => result.inspect_err(|e| log_fix_failure("runtime", e)),
        }
    }

    /// `on_write` for a file known only by id
    pub async fn on_write_id(&self, id: FileId) -> Result<FixOutcome, FixError> {
        let object = self
            .storage
            .object(id)?
            .ok_or(FixError::UnknownObject(id))
            .inspect_err(|e| log_fix_failure("runtime", e))?;
        self.on_write(&object).await
    }

    /// Fix ownership of a freshly written object without touching the fix
    /// list on failure.
    pub async fn fix_owner_in_runtime(
        &self,
        object: &FilesystemObject,
    ) -> Result<FixOutcome, FixError> {
        let _guard = self.locks.acquire(object.id).await;
        self.fix_runtime_locked(object)
            .await
            .inspect_err(|e| log_fix_failure("runtime", e))
    }

    async fn fix_runtime_locked(&self, object: &FilesystemObject) -> Result<FixOutcome, FixError> {
        if self.is_admin(&object.owner).await {
            self.fix_list.mark_fixed(object.id)?;
            return Ok(FixOutcome::Exempt);
        }

        let local_path = self
            .storage
            .local_path(&object.owner, &object.internal_path)?;

        self.correct_and_record(object.id, &object.owner, &local_path)
            .await
    }
}
