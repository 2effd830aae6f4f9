//! Reconciliation engine
//!
//! Owns the fix list and drives the collaborators for both trigger paths:
//! the synchronous write hooks (`enforce_quota`, `on_write`) and the periodic
//! sweep (`fix_owner_in_cron`, `sweep`).

pub mod locks;
pub mod quota_gate;
pub mod results;
pub mod runtime;
pub mod sweep;

use std::path::Path;
use std::sync::Arc;

use crate::config::SharedRuntimeConfig;
use crate::corrector::OwnershipCorrector;
use crate::error::FixError;
use crate::fixlist::FixList;
use crate::identity::{IdentityResolver, Resolution};
use crate::quota::QuotaService;
use crate::storage::{FileId, StorageBackend};

pub use locks::ObjectLocks;
pub use results::{FixOutcome, SweepReport};

pub struct ReconciliationEngine {
    storage: Arc<dyn StorageBackend>,
    resolver: IdentityResolver,
    quota: Arc<dyn QuotaService>,
    corrector: Arc<dyn OwnershipCorrector>,
    fix_list: Arc<FixList>,
    runtime: SharedRuntimeConfig,
    locks: ObjectLocks,
}

impl ReconciliationEngine {
    pub fn new(
        storage: Arc<dyn StorageBackend>,
        resolver: IdentityResolver,
        quota: Arc<dyn QuotaService>,
        corrector: Arc<dyn OwnershipCorrector>,
        fix_list: Arc<FixList>,
        runtime: SharedRuntimeConfig,
    ) -> Self {
        Self {
            storage,
            resolver,
            quota,
            corrector,
            fix_list,
            runtime,
            locks: ObjectLocks::default(),
        }
    }

    pub fn fix_list(&self) -> &FixList {
        &self.fix_list
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    /// Whether `username` is exempt from quota and ownership correction
    pub async fn is_admin(&self, username: &str) -> bool {
        self.runtime.read().await.is_admin(username)
    }

    /// Resolve `owner`, run the corrector on `local_path` and record Fixed on exit 0.
    ///
    /// Caller holds the object lock.
    async fn correct_and_record(
        &self,
        id: FileId,
        owner: &str,
        local_path: &Path,
    ) -> Result<FixOutcome, FixError> {
        let path = local_path.display().to_string();

        let identity = match self.resolver.resolve(owner).await {
            Ok(Resolution::Managed(identity)) => identity,
            Ok(Resolution::NotManaged) => {
                return Err(FixError::NotManaged {
                    username: owner.to_string(),
                    path,
                });
            }
            Err(error) => return Err(FixError::Resolution { path, error }),
        };

        let mask = self.runtime.read().await.permission_umask.clone();
        let status = self
            .corrector
            .correct(local_path, identity, &mask)
            .await
            .map_err(|error| FixError::Corrector {
                path: path.clone(),
                error,
            })?;

        if !status.success() {
            return Err(FixError::CorrectionFailed {
                path,
                code: status.code,
            });
        }

        self.fix_list.mark_fixed(id)?;
        Ok(FixOutcome::Corrected)
    }
}
