//! SQLite-backed file index
//!
//! Reference storage backend: the host application registers files in a
//! `file_index` table and keeps their bytes under `<data_root>/<owner>/`.

use log::info;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use crate::error::StorageError;
use crate::storage::validation::owner_to_local_path;
use crate::storage::{FileId, FilesystemObject, Mount, StorageBackend};

pub struct IndexedStorage {
    conn: Mutex<Connection>,
    data_root: PathBuf,
}

impl IndexedStorage {
    /// Open (or create) the index at `db_path`
    pub fn open(db_path: &Path, data_root: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;
        Self::init(conn, data_root)
    }

    /// Index held in memory, for tests and dry runs
    pub fn open_in_memory(data_root: &Path) -> Result<Self, StorageError> {
        Self::init(Connection::open_in_memory()?, data_root)
    }

    fn init(conn: Connection, data_root: &Path) -> Result<Self, StorageError> {
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS file_index (
                file_id INTEGER PRIMARY KEY,
                owner TEXT NOT NULL,
                internal_path TEXT NOT NULL,
                size INTEGER NOT NULL
            )",
            [],
        )?;

        info!("File index ready (data root: {})", data_root.display());

        Ok(Self {
            conn: Mutex::new(conn),
            data_root: data_root.to_path_buf(),
        })
    }

    /// Record or replace a file in the index
    pub fn register(&self, object: &FilesystemObject) -> Result<(), StorageError> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO file_index (file_id, owner, internal_path, size)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(file_id) DO UPDATE SET
                owner = excluded.owner,
                internal_path = excluded.internal_path,
                size = excluded.size",
            params![
                object.id.0,
                object.owner,
                object.internal_path,
                object.size as i64
            ],
        )?;
        Ok(())
    }

    /// Drop a file from the index
    pub fn forget(&self, id: FileId) -> Result<bool, StorageError> {
        let conn = self.lock();
        let removed = conn.execute("DELETE FROM file_index WHERE file_id = ?1", params![id.0])?;
        Ok(removed > 0)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        // The connection outlives a panicked holder
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StorageBackend for IndexedStorage {
    fn object(&self, id: FileId) -> Result<Option<FilesystemObject>, StorageError> {
        let conn = self.lock();
        let object = conn
            .query_row(
                "SELECT owner, internal_path, size FROM file_index WHERE file_id = ?1",
                params![id.0],
                |row| {
                    Ok(FilesystemObject {
                        id,
                        owner: row.get(0)?,
                        internal_path: row.get(1)?,
                        size: row.get::<_, i64>(2)?.max(0) as u64,
                    })
                },
            )
            .optional()?;
        Ok(object)
    }

    fn local_path(&self, owner: &str, internal_path: &str) -> Result<PathBuf, StorageError> {
        owner_to_local_path(&self.data_root, owner, internal_path)
    }

    fn mounts_for_id(&self, id: FileId) -> Result<Vec<Mount>, StorageError> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT owner FROM file_index WHERE file_id = ?1")?;
        let mounts = stmt
            .query_map(params![id.0], |row| {
                Ok(Mount {
                    username: row.get(0)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(mounts)
    }

    fn internal_path_by_id(&self, owner: &str, id: FileId) -> Result<Option<String>, StorageError> {
        let conn = self.lock();
        let path = conn
            .query_row(
                "SELECT internal_path FROM file_index WHERE file_id = ?1 AND owner = ?2",
                params![id.0, owner],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(path.filter(|p| !p.is_empty()))
    }
}
