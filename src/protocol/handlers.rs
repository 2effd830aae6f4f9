//! Hook command handlers
//!
//! Dispatches parsed hook commands to the reconciliation engine and shapes
//! the JSON answer.

use log::error;
use serde_json::json;

use crate::engine::ReconciliationEngine;
use crate::error::handlers::LOG_TARGET;
use crate::messages::Locale;
use crate::protocol::{HookCommand, HookResponse};
use crate::storage::FileId;

/// Result of handling one command
pub struct CommandResult {
    pub response: HookResponse,
    pub close_connection: bool,
}

impl From<HookResponse> for CommandResult {
    fn from(response: HookResponse) -> Self {
        Self {
            response,
            close_connection: false,
        }
    }
}

/// Dispatches a hook command to its handler.
pub async fn handle_command(
    engine: &ReconciliationEngine,
    locale: Locale,
    command: &HookCommand,
) -> CommandResult {
    match command {
        HookCommand::Check {
            actor,
            file_id,
            batch,
        } => handle_check(engine, locale, actor, *file_id, batch.as_deref())
            .await
            .into(),
        HookCommand::Written(id) => handle_written(engine, *id).await.into(),
        HookCommand::Sweep => handle_sweep(engine).await.into(),
        HookCommand::Status(id) => handle_status(engine, *id).into(),
        HookCommand::Quit => CommandResult {
            response: HookResponse::success(json!({ "message": "bye" })),
            close_connection: true,
        },
        HookCommand::Unknown(reason) => HookResponse::error(reason.clone()).into(),
    }
}

/// Pre-write quota gate. Any rejection must stop the upload.
async fn handle_check(
    engine: &ReconciliationEngine,
    locale: Locale,
    actor: &str,
    file_id: Option<FileId>,
    batch: Option<&[u64]>,
) -> HookResponse {
    let candidate = match file_id.map(|id| engine.storage().object(id)).transpose() {
        Ok(candidate) => candidate.flatten(),
        Err(e) => {
            error!(target: LOG_TARGET, "Quota check for {} could not read file index: {}", actor, e);
            return HookResponse::error("storage index unavailable");
        }
    };

    // Without a batch the candidate is the only size source
    if let (Some(id), None, None) = (file_id, &candidate, batch) {
        if !engine.is_admin(actor).await {
            error!(target: LOG_TARGET, "Quota check for {} names unknown file id {}", actor, id);
            return HookResponse::error(format!("unknown file id: {id}"));
        }
    }

    match engine.enforce_quota(actor, candidate.as_ref(), batch).await {
        Ok(()) => HookResponse::success(json!({ "allowed": true })),
        Err(rejection) => HookResponse::error(locale.render(&rejection)),
    }
}

/// Post-write fix. The write already happened, so a failed fix is reported
/// as `fixed: false` rather than an error; the sweep retries it.
async fn handle_written(engine: &ReconciliationEngine, id: FileId) -> HookResponse {
    match engine.on_write_id(id).await {
        Ok(outcome) => HookResponse::success(json!({
            "file_id": id.0,
            "fixed": true,
            "outcome": outcome.as_str(),
        })),
        Err(_) => HookResponse::success(json!({ "file_id": id.0, "fixed": false })),
    }
}

async fn handle_sweep(engine: &ReconciliationEngine) -> HookResponse {
    match engine.sweep().await {
        Ok(report) => HookResponse::success(json!(report)),
        Err(e) => {
            error!(target: LOG_TARGET, "Sweep failed: {}", e);
            HookResponse::error("sweep failed")
        }
    }
}

fn handle_status(engine: &ReconciliationEngine, id: FileId) -> HookResponse {
    match engine.fix_list().get(id) {
        Ok(Some(entry)) => HookResponse::success(json!({
            "file_id": id.0,
            "status": entry.status.as_str(),
            "last_updated": entry.last_updated,
        })),
        Ok(None) => HookResponse::success(json!({ "file_id": id.0, "status": null })),
        Err(e) => {
            error!(target: LOG_TARGET, "Status lookup for {} failed: {}", id, e);
            HookResponse::error("fix list unavailable")
        }
    }
}
