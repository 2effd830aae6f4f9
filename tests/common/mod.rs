#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::RwLock;

use owner_fixer::ReconciliationEngine;
use owner_fixer::config::{RuntimeConfig, SharedRuntimeConfig};
use owner_fixer::corrector::{CorrectionStatus, OwnershipCorrector};
use owner_fixer::error::{CorrectionError, DirectoryError, QuotaError};
use owner_fixer::fixlist::FixList;
use owner_fixer::identity::{DirectoryConnector, IdentityResolver, NumericIdentity, StaticDirectory};
use owner_fixer::quota::{QuotaService, QuotaSnapshot};
use owner_fixer::storage::{FileId, FilesystemObject, IndexedStorage};

pub const DATA_ROOT: &str = "/srv/data";

/// Directory whose every lookup fails
pub struct BrokenDirectory;

#[async_trait]
impl DirectoryConnector for BrokenDirectory {
    async fn search_uid_number(
        &self,
        username: &str,
    ) -> Result<Option<NumericIdentity>, DirectoryError> {
        Err(DirectoryError::Lookup {
            username: username.to_string(),
            reason: "connection reset".to_string(),
        })
    }
}

/// Quota service answering a fixed snapshot, or failing when `None`
pub struct FixedQuota(pub Option<QuotaSnapshot>);

#[async_trait]
impl QuotaService for FixedQuota {
    async fn fetch_quota(&self, _identity: NumericIdentity) -> Result<QuotaSnapshot, QuotaError> {
        self.0.ok_or(QuotaError::Transport("connection refused".to_string()))
    }
}

/// Corrector that records its calls and exits with a configurable code
#[derive(Default)]
pub struct RecordingCorrector {
    pub exit_code: AtomicI32,
    pub calls: Mutex<Vec<(PathBuf, NumericIdentity, String)>>,
}

impl RecordingCorrector {
    pub fn exiting_with(code: i32) -> Self {
        Self {
            exit_code: AtomicI32::new(code),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn set_exit_code(&self, code: i32) {
        self.exit_code.store(code, Ordering::SeqCst);
    }
}

#[async_trait]
impl OwnershipCorrector for RecordingCorrector {
    async fn correct(
        &self,
        path: &Path,
        identity: NumericIdentity,
        permission_mask: &str,
    ) -> Result<CorrectionStatus, CorrectionError> {
        self.calls
            .lock()
            .unwrap()
            .push((path.to_path_buf(), identity, permission_mask.to_string()));
        Ok(CorrectionStatus {
            code: self.exit_code.load(Ordering::SeqCst),
        })
    }
}

pub fn runtime_config() -> SharedRuntimeConfig {
    Arc::new(RwLock::new(RuntimeConfig {
        permission_umask: "0027".to_string(),
        admin_users: vec!["admin".to_string()],
        sweep_interval_secs: 3600,
        sweep_batch_size: 100,
    }))
}

pub fn directory() -> Arc<dyn DirectoryConnector> {
    Arc::new(StaticDirectory::new(HashMap::from([
        ("alice".to_string(), 5001),
        ("bob".to_string(), 4242),
    ])))
}

pub struct Harness {
    pub engine: Arc<ReconciliationEngine>,
    pub storage: Arc<IndexedStorage>,
    pub corrector: Arc<RecordingCorrector>,
    pub runtime: SharedRuntimeConfig,
}

impl Harness {
    pub fn new(
        directory: Arc<dyn DirectoryConnector>,
        quota: Option<QuotaSnapshot>,
        exit_code: i32,
    ) -> Self {
        let storage = Arc::new(IndexedStorage::open_in_memory(Path::new(DATA_ROOT)).unwrap());
        let corrector = Arc::new(RecordingCorrector::exiting_with(exit_code));
        let runtime = runtime_config();
        let engine = ReconciliationEngine::new(
            storage.clone(),
            IdentityResolver::new(directory, Duration::from_secs(2)),
            Arc::new(FixedQuota(quota)),
            corrector.clone(),
            Arc::new(FixList::open_in_memory().unwrap()),
            runtime.clone(),
        );
        Self {
            engine: Arc::new(engine),
            storage,
            corrector,
            runtime,
        }
    }

    pub fn standard() -> Self {
        Self::new(
            directory(),
            Some(QuotaSnapshot {
                limit: 1000.0,
                current_usage: 500.0,
            }),
            0,
        )
    }

    pub fn register(&self, id: i64, owner: &str, internal_path: &str, size: u64) -> FilesystemObject {
        let object = FilesystemObject {
            id: FileId(id),
            owner: owner.to_string(),
            internal_path: internal_path.to_string(),
            size,
        };
        self.storage.register(&object).unwrap();
        object
    }
}
