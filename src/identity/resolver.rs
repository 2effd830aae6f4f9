//! Identity resolution
//!
//! Maps a storage-layer username to the directory's numeric identity, with a
//! bounded lookup time.

use log::debug;
use std::sync::Arc;
use std::time::Duration;

use crate::error::DirectoryError;
use crate::identity::{DirectoryConnector, NumericIdentity};

/// Outcome of a successful directory query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Managed(NumericIdentity),
    /// The directory does not know this user (local or admin account)
    NotManaged,
}

#[derive(Clone)]
pub struct IdentityResolver {
    connector: Arc<dyn DirectoryConnector>,
    timeout: Duration,
}

impl IdentityResolver {
    pub fn new(connector: Arc<dyn DirectoryConnector>, timeout: Duration) -> Self {
        Self { connector, timeout }
    }

    /// Resolve `username`. Unknown users are `NotManaged`, not errors.
    pub async fn resolve(&self, username: &str) -> Result<Resolution, DirectoryError> {
        if username.trim().is_empty() {
            return Ok(Resolution::NotManaged);
        }

        let lookup = self.connector.search_uid_number(username);
        let found = tokio::time::timeout(self.timeout, lookup)
            .await
            .map_err(|_| DirectoryError::Timeout(username.to_string()))??;

        // uid 0 would hand the file to root; treat it like an unknown user
        let resolution = match found {
            Some(identity) if identity.0 != 0 => Resolution::Managed(identity),
            _ => Resolution::NotManaged,
        };
        debug!("Resolved {} -> {:?}", username, resolution);
        Ok(resolution)
    }
}
