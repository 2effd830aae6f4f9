//! Directory connectors
//!
//! Answer one question: which numeric identity does the directory assign to
//! this username, if any.

use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use tokio::process::Command;

use crate::error::DirectoryError;
use crate::identity::NumericIdentity;

/// `getent` exit status for "key not found in database"
const GETENT_NOT_FOUND: i32 = 2;

#[async_trait]
pub trait DirectoryConnector: Send + Sync {
    /// `Ok(None)` when the directory has no such user.
    async fn search_uid_number(
        &self,
        username: &str,
    ) -> Result<Option<NumericIdentity>, DirectoryError>;
}

/// Username → uid table taken from configuration
#[derive(Debug, Default, Clone)]
pub struct StaticDirectory {
    users: HashMap<String, u32>,
}

impl StaticDirectory {
    pub fn new(users: HashMap<String, u32>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl DirectoryConnector for StaticDirectory {
    async fn search_uid_number(
        &self,
        username: &str,
    ) -> Result<Option<NumericIdentity>, DirectoryError> {
        Ok(self.users.get(username).copied().map(NumericIdentity))
    }
}

/// Looks users up through the system name service (`getent passwd`).
///
/// With sssd or nss-ldap configured this reaches the LDAP directory.
#[derive(Debug, Clone)]
pub struct NssDirectory {
    getent_path: String,
}

impl NssDirectory {
    pub fn new(getent_path: impl Into<String>) -> Self {
        Self {
            getent_path: getent_path.into(),
        }
    }
}

#[async_trait]
impl DirectoryConnector for NssDirectory {
    async fn search_uid_number(
        &self,
        username: &str,
    ) -> Result<Option<NumericIdentity>, DirectoryError> {
        // getent would read these as options or field separators
        if username.starts_with('-') || username.contains([':', '\0', '\n']) {
            return Ok(None);
        }

        let output = Command::new(&self.getent_path)
            .arg("passwd")
            .arg(username)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| DirectoryError::Lookup {
                username: username.to_string(),
                reason: e.to_string(),
            })?;

        match output.status.code() {
            Some(0) => {}
            Some(GETENT_NOT_FOUND) => return Ok(None),
            other => {
                return Err(DirectoryError::Lookup {
                    username: username.to_string(),
                    reason: format!("getent exited with {other:?}"),
                });
            }
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!("getent passwd {}: {}", username, stdout.trim());
        parse_passwd_entry(username, &stdout).map(Some)
    }
}

/// Extract the uid field from a `name:x:uid:gid:gecos:home:shell` line
fn parse_passwd_entry(username: &str, line: &str) -> Result<NumericIdentity, DirectoryError> {
    let line = line.lines().next().unwrap_or("");
    let malformed = || DirectoryError::Malformed {
        username: username.to_string(),
        entry: line.to_string(),
    };

    let mut fields = line.split(':');
    let name = fields.next().ok_or_else(malformed)?;
    if name != username {
        return Err(malformed());
    }
    let uid = fields.nth(1).ok_or_else(malformed)?;
    uid.parse::<u32>().map(NumericIdentity).map_err(|_| malformed())
}
