//! Error types
//!
//! Defines domain-specific error types for each collaborator of the owner fixer.

use std::fmt;
use std::io;

use crate::storage::FileId;

/// Directory connector errors. Every variant means "resolution failed";
/// a user unknown to the directory is not an error.
#[derive(Debug)]
pub enum DirectoryError {
    Timeout(String),
    Lookup { username: String, reason: String },
    Malformed { username: String, entry: String },
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryError::Timeout(u) => write!(f, "Directory lookup timed out for: {}", u),
            DirectoryError::Lookup { username, reason } => {
                write!(f, "Directory lookup failed for {}: {}", username, reason)
            }
            DirectoryError::Malformed { username, entry } => {
                write!(f, "Malformed directory entry for {}: {}", username, entry)
            }
        }
    }
}

impl std::error::Error for DirectoryError {}

/// Quota service errors. Callers treat all of them as "service unavailable".
#[derive(Debug)]
pub enum QuotaError {
    Transport(String),
    Status(u16),
    Malformed(String),
    Timeout,
}

impl fmt::Display for QuotaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuotaError::Transport(e) => write!(f, "Quota service transport error: {}", e),
            QuotaError::Status(code) => write!(f, "Quota service answered HTTP {}", code),
            QuotaError::Malformed(e) => write!(f, "Malformed quota response: {}", e),
            QuotaError::Timeout => write!(f, "Quota service timed out"),
        }
    }
}

impl std::error::Error for QuotaError {}

/// Errors raised before the corrector could report an exit status
#[derive(Debug)]
pub enum CorrectionError {
    InvalidPath(String),
    Spawn(io::Error),
    TimedOut(String),
}

impl fmt::Display for CorrectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrectionError::InvalidPath(p) => write!(f, "Refusing to correct path: {}", p),
            CorrectionError::Spawn(e) => write!(f, "Failed to run corrector: {}", e),
            CorrectionError::TimedOut(p) => write!(f, "Corrector timed out on: {}", p),
        }
    }
}

impl std::error::Error for CorrectionError {}

/// FixList persistence errors
#[derive(Debug)]
pub enum FixListError {
    Database(rusqlite::Error),
    UnknownStatus(i64),
}

impl fmt::Display for FixListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixListError::Database(e) => write!(f, "Fix list database error: {}", e),
            FixListError::UnknownStatus(s) => write!(f, "Unknown fix list status: {}", s),
        }
    }
}

impl std::error::Error for FixListError {}

impl From<rusqlite::Error> for FixListError {
    fn from(error: rusqlite::Error) -> Self {
        FixListError::Database(error)
    }
}

/// Storage collaborator errors
#[derive(Debug)]
pub enum StorageError {
    Database(rusqlite::Error),
    Io(io::Error),
    InvalidPath(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Database(e) => write!(f, "Storage index error: {}", e),
            StorageError::Io(e) => write!(f, "Storage IO error: {}", e),
            StorageError::InvalidPath(p) => write!(f, "Invalid storage path: {}", p),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(error: rusqlite::Error) -> Self {
        StorageError::Database(error)
    }
}

impl From<io::Error> for StorageError {
    fn from(error: io::Error) -> Self {
        StorageError::Io(error)
    }
}

/// Reasons an ownership fix attempt did not complete.
///
/// None of these reach the end user; they are logged and the object stays
/// Pending for the next sweep.
#[derive(Debug)]
pub enum FixError {
    NotManaged { username: String, path: String },
    Resolution { path: String, error: DirectoryError },
    PathNotFound(FileId),
    UnknownObject(FileId),
    Storage(StorageError),
    Corrector { path: String, error: CorrectionError },
    CorrectionFailed { path: String, code: i32 },
    FixList(FixListError),
}

impl fmt::Display for FixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixError::NotManaged { username, path } => {
                write!(f, "Not a directory user: {} (path: {})", username, path)
            }
            FixError::Resolution { path, error } => {
                write!(f, "Identity resolution failed: {} (path: {})", error, path)
            }
            FixError::PathNotFound(id) => write!(f, "Could not find file with fileid: {}", id),
            FixError::UnknownObject(id) => write!(f, "Unknown file id: {}", id),
            FixError::Storage(e) => write!(f, "{}", e),
            FixError::Corrector { path, error } => write!(f, "{} (path: {})", error, path),
            FixError::CorrectionFailed { path, code } => {
                write!(f, "Owner could not be fixed (exit {}). Node path: {}", code, path)
            }
            FixError::FixList(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for FixError {}

impl From<StorageError> for FixError {
    fn from(error: StorageError) -> Self {
        FixError::Storage(error)
    }
}

impl From<FixListError> for FixError {
    fn from(error: FixListError) -> Self {
        FixError::FixList(error)
    }
}

/// Top-level daemon error
#[derive(Debug)]
pub enum OwnerFixerError {
    Config(config::ConfigError),
    FixList(FixListError),
    Storage(StorageError),
    Quota(QuotaError),
    IoError(io::Error),
}

impl fmt::Display for OwnerFixerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerFixerError::Config(e) => write!(f, "Configuration error: {}", e),
            OwnerFixerError::FixList(e) => write!(f, "{}", e),
            OwnerFixerError::Storage(e) => write!(f, "{}", e),
            OwnerFixerError::Quota(e) => write!(f, "{}", e),
            OwnerFixerError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for OwnerFixerError {}

impl From<config::ConfigError> for OwnerFixerError {
    fn from(error: config::ConfigError) -> Self {
        OwnerFixerError::Config(error)
    }
}

impl From<FixListError> for OwnerFixerError {
    fn from(error: FixListError) -> Self {
        OwnerFixerError::FixList(error)
    }
}

impl From<StorageError> for OwnerFixerError {
    fn from(error: StorageError) -> Self {
        OwnerFixerError::Storage(error)
    }
}

impl From<QuotaError> for OwnerFixerError {
    fn from(error: QuotaError) -> Self {
        OwnerFixerError::Quota(error)
    }
}

impl From<io::Error> for OwnerFixerError {
    fn from(error: io::Error) -> Self {
        OwnerFixerError::IoError(error)
    }
}
