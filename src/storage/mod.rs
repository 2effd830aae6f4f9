//! Storage collaborator
//!
//! The owner fixer never touches file contents. It only needs to know who
//! owns an object, where it lives on local disk, and how large it is.

pub mod index;
pub mod validation;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::StorageError;

pub use index::IndexedStorage;

/// Stable identifier the storage backend assigns to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub i64);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FileId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(FileId)
    }
}

/// Read-only view of a file as the storage backend reports it
#[derive(Debug, Clone, PartialEq)]
pub struct FilesystemObject {
    pub id: FileId,
    pub owner: String,
    pub internal_path: String,
    /// Size in bytes
    pub size: u64,
}

/// A user mount through which a file id is reachable
#[derive(Debug, Clone, PartialEq)]
pub struct Mount {
    pub username: String,
}

/// Narrow view of the storage backend used by the reconciliation engine.
pub trait StorageBackend: Send + Sync {
    /// Look up a file by id.
    fn object(&self, id: FileId) -> Result<Option<FilesystemObject>, StorageError>;

    /// Resolve an owner-relative internal path to an absolute local path.
    fn local_path(&self, owner: &str, internal_path: &str) -> Result<PathBuf, StorageError>;

    /// Every mount the file id is reachable through. Empty means the file is gone.
    fn mounts_for_id(&self, id: FileId) -> Result<Vec<Mount>, StorageError>;

    /// Internal path of `id` inside `owner`'s storage, if the cache knows it.
    fn internal_path_by_id(&self, owner: &str, id: FileId) -> Result<Option<String>, StorageError>;
}
