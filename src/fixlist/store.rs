//! SQLite fix list
//!
//! One row per file id. Every mutation is a single-statement upsert or delete,
//! so concurrent writers can never produce duplicate rows.

use log::{debug, info};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::FixListError;
use crate::fixlist::{FixListEntry, FixStatus};
use crate::storage::FileId;

pub struct FixList {
    conn: Mutex<Connection>,
}

impl FixList {
    /// Open (or create) the fix list stored at `db_path`
    pub fn open(db_path: &Path) -> Result<Self, FixListError> {
        let conn = Connection::open(db_path)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, FixListError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, FixListError> {
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS fixed_list (
                file_id INTEGER PRIMARY KEY,
                status INTEGER NOT NULL,
                last_updated INTEGER NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_fixed_list_status
             ON fixed_list(status, last_updated)",
            [],
        )?;

        info!("Fix list ready");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Track `id` as needing correction. Resets a Fixed entry to Pending.
    pub fn add_pending(&self, id: FileId) -> Result<(), FixListError> {
        self.upsert(id, FixStatus::Pending)
    }

    /// Record a successful correction or an administrator exemption.
    pub fn mark_fixed(&self, id: FileId) -> Result<(), FixListError> {
        self.upsert(id, FixStatus::Fixed)
    }

    /// Forget `id`. Returns whether an entry existed.
    pub fn delete(&self, id: FileId) -> Result<bool, FixListError> {
        let conn = self.lock();
        let removed = conn.execute("DELETE FROM fixed_list WHERE file_id = ?1", params![id.0])?;
        debug!("Deleted fix list entry {} ({} rows)", id, removed);
        Ok(removed > 0)
    }

    /// Move a still-Pending entry to the back of the sweep queue.
    pub fn touch(&self, id: FileId) -> Result<(), FixListError> {
        let conn = self.lock();
        conn.execute(
            "UPDATE fixed_list SET last_updated = ?1 WHERE file_id = ?2 AND status = ?3",
            params![unix_now(), id.0, FixStatus::Pending.as_i64()],
        )?;
        Ok(())
    }

    pub fn get(&self, id: FileId) -> Result<Option<FixListEntry>, FixListError> {
        let conn = self.lock();
        let row = conn
            .query_row(
                "SELECT status, last_updated FROM fixed_list WHERE file_id = ?1",
                params![id.0],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
            )
            .optional()?;

        match row {
            Some((status, last_updated)) => Ok(Some(FixListEntry {
                file_id: id,
                status: FixStatus::from_i64(status)?,
                last_updated,
            })),
            None => Ok(None),
        }
    }

    /// Oldest pending ids first, at most `limit` of them
    pub fn pending(&self, limit: usize) -> Result<Vec<FileId>, FixListError> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT file_id FROM fixed_list
             WHERE status = ?1
             ORDER BY last_updated, file_id
             LIMIT ?2",
        )?;
        let ids = stmt
            .query_map(
                params![FixStatus::Pending.as_i64(), limit as i64],
                |row| row.get::<_, i64>(0).map(FileId),
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    /// Number of tracked entries
    pub fn len(&self) -> Result<usize, FixListError> {
        let conn = self.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM fixed_list", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn upsert(&self, id: FileId, status: FixStatus) -> Result<(), FixListError> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO fixed_list (file_id, status, last_updated)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(file_id) DO UPDATE SET
                status = excluded.status,
                last_updated = excluded.last_updated",
            params![id.0, status.as_i64(), unix_now()],
        )?;
        debug!("Fix list entry {} -> {}", id, status.as_str());
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // SQLite rolled back whatever statement the panicking holder was running
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_lifecycle() {
        let list = FixList::open_in_memory().unwrap();
        let id = FileId(42);

        list.add_pending(id).unwrap();
        assert_eq!(list.get(id).unwrap().unwrap().status, FixStatus::Pending);
        assert_eq!(list.pending(10).unwrap(), vec![id]);

        list.mark_fixed(id).unwrap();
        assert_eq!(list.get(id).unwrap().unwrap().status, FixStatus::Fixed);
        assert!(list.pending(10).unwrap().is_empty());

        assert!(list.delete(id).unwrap());
        assert_eq!(list.get(id).unwrap(), None);
        assert!(!list.delete(id).unwrap());
    }

    #[test]
    fn test_repeated_writes_keep_one_row() {
        let list = FixList::open_in_memory().unwrap();
        let id = FileId(7);
        list.add_pending(id).unwrap();
        list.mark_fixed(id).unwrap();
        list.add_pending(id).unwrap();
        list.mark_fixed(id).unwrap();
        assert_eq!(list.len().unwrap(), 1);
    }

    #[test]
    fn test_pending_respects_limit() {
        let list = FixList::open_in_memory().unwrap();
        for id in 1..=5 {
            list.add_pending(FileId(id)).unwrap();
        }
        assert_eq!(list.pending(3).unwrap().len(), 3);
    }
}
