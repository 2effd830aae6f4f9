//! Upload quota enforcement
//!
//! Fails closed: a missing identity or an unreachable quota service rejects
//! the upload.

use log::error;

use crate::engine::ReconciliationEngine;
use crate::error::handlers::LOG_TARGET;
use crate::identity::Resolution;
use crate::quota::{QuotaRejection, evaluate, upload_size_kib};
use crate::storage::FilesystemObject;

impl ReconciliationEngine {
    /// Decide whether `actor` may write `candidate` (or the upload `batch`, in bytes).
    pub async fn enforce_quota(
        &self,
        actor: &str,
        candidate: Option<&FilesystemObject>,
        batch: Option<&[u64]>,
    ) -> Result<(), QuotaRejection> {
        if self.is_admin(actor).await {
            return Ok(());
        }

        let total_kib = upload_size_kib(candidate.map(|object| object.size), batch);

        let identity = match self.resolver.resolve(actor).await {
            Ok(Resolution::Managed(identity)) => identity,
            Ok(Resolution::NotManaged) => {
                error!(target: LOG_TARGET, "Upload by non-directory user {} rejected", actor);
                return Err(QuotaRejection::NotDirectoryUser);
            }
            Err(e) => {
                error!(target: LOG_TARGET, "Quota check for {} failed: {}", actor, e);
                return Err(QuotaRejection::NotDirectoryUser);
            }
        };

        let snapshot = self.quota.fetch_quota(identity).await.map_err(|e| {
            error!(target: LOG_TARGET, "Quota service unavailable for uid {}: {}", identity, e);
            QuotaRejection::ServiceUnreachable
        })?;

        evaluate(&snapshot, total_kib).inspect_err(|_| {
            error!(
                target: LOG_TARGET,
                "Upload by {} rejected: {:.3} KiB requested, {:.3} KiB free",
                actor,
                total_kib,
                snapshot.remaining()
            );
        })
    }
}
