//! Path validation
//!
//! Handles path validation and security checks for storage-derived paths.

use std::path::{Component, Path, PathBuf};

use crate::error::StorageError;

/// Validate that an owner name can be used as a single path segment
pub fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\', '\0', '\n', '\r'])
}

/// Join `root/owner/internal_path`, refusing anything that escapes the owner's directory
pub fn owner_to_local_path(
    root: &Path,
    owner: &str,
    internal_path: &str,
) -> Result<PathBuf, StorageError> {
    if !is_safe_segment(owner) {
        return Err(StorageError::InvalidPath(format!("owner {owner:?}")));
    }

    if internal_path.contains('\0') {
        return Err(StorageError::InvalidPath(internal_path.to_string()));
    }

    let mut path = root.join(owner);
    for component in Path::new(internal_path.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            // Check for directory traversal attempts
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(StorageError::InvalidPath(internal_path.to_string()));
            }
        }
    }

    Ok(path)
}
