//! Fix list entry types

use crate::error::FixListError;
use crate::storage::FileId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixStatus {
    Pending,
    Fixed,
}

impl FixStatus {
    pub fn as_i64(self) -> i64 {
        match self {
            FixStatus::Pending => 0,
            FixStatus::Fixed => 1,
        }
    }

    pub fn from_i64(value: i64) -> Result<Self, FixListError> {
        match value {
            0 => Ok(FixStatus::Pending),
            1 => Ok(FixStatus::Fixed),
            other => Err(FixListError::UnknownStatus(other)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FixStatus::Pending => "pending",
            FixStatus::Fixed => "fixed",
        }
    }
}

/// One tracked object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixListEntry {
    pub file_id: FileId,
    pub status: FixStatus,
    /// UNIX seconds of the last status write
    pub last_updated: i64,
}
