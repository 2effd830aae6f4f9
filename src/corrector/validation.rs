//! Path validation
//!
//! Only clean absolute paths are handed to the privileged corrector.

use std::path::{Component, Path};

use crate::error::CorrectionError;

/// Validate that `path` is absolute, normalized and free of control characters
pub fn validate_target(path: &Path) -> Result<&str, CorrectionError> {
    let text = path
        .to_str()
        .ok_or_else(|| CorrectionError::InvalidPath(path.to_string_lossy().into_owned()))?;

    if !path.is_absolute() || text.contains(['\0', '\n', '\r']) {
        return Err(CorrectionError::InvalidPath(text.to_string()));
    }

    // Check for directory traversal attempts
    let clean = path
        .components()
        .all(|c| matches!(c, Component::RootDir | Component::Normal(_)));
    if !clean {
        return Err(CorrectionError::InvalidPath(text.to_string()));
    }

    Ok(text)
}
