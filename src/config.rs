//! Configuration management for the owner fixer
//!
//! Separates startup configuration (requires restart) from runtime configuration
//! (shared behind a lock so the sweep and hooks always read the current values).

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::messages::Locale;

/// Complete service configuration with startup/runtime separation
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(flatten)]
    pub startup: StartupConfig,

    #[serde(flatten)]
    pub runtime: RuntimeConfig,
}

/// Configuration that requires a restart to take effect
#[derive(Debug, Deserialize, Clone)]
pub struct StartupConfig {
    // ═══ HOOK LISTENER (Environment Override Supported) ═══
    /// IP address the write-hook listener binds to
    pub bind_address: String,

    /// Port of the write-hook listener
    pub hook_port: u16,

    /// Longest accepted hook command line, in bytes
    #[serde(default = "default_max_command_length")]
    pub max_command_length: usize,

    // ═══ PERSISTENCE ═══
    /// SQLite database holding the fix list and the file index
    pub database_path: String,

    /// Root under which `<owner>/<internal path>` resolves to a local file
    pub data_root: String,

    // ═══ COLLABORATORS ═══
    /// Privileged executable invoked as `<path> <uid> <umask>`
    pub corrector_path: String,
    pub corrector_timeout_secs: u64,

    /// Base URL of the quota service (`GET {url}/quota/{uid}`)
    pub quota_service_url: String,
    pub quota_timeout_secs: u64,

    pub directory_timeout_secs: u64,
    pub directory: DirectoryConfig,

    /// Language of user-facing rejection messages
    #[serde(default)]
    pub locale: Locale,
}

/// Which directory connector resolves usernames to numeric identities
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum DirectoryConfig {
    /// Fixed username → uid table
    Static {
        #[serde(default)]
        users: HashMap<String, u32>,
    },
    /// `getent passwd`, which sees LDAP accounts through nss/sssd
    Nss {
        #[serde(default = "default_getent_path")]
        getent_path: String,
    },
}

/// Configuration read on every operation
#[derive(Debug, Deserialize, Clone)]
pub struct RuntimeConfig {
    /// Umask-style mask handed to the corrector, e.g. `0027`
    /// Environment: OWNER_FIXER__PERMISSION_UMASK
    pub permission_umask: String,

    /// Accounts exempt from quota and ownership correction
    #[serde(default)]
    pub admin_users: Vec<String>,

    /// Seconds between background sweeps
    pub sweep_interval_secs: u64,

    /// Pending entries processed per sweep
    #[serde(default = "default_sweep_batch_size")]
    pub sweep_batch_size: usize,
}

/// Thread-safe runtime configuration wrapper
pub type SharedRuntimeConfig = Arc<RwLock<RuntimeConfig>>;

fn default_max_command_length() -> usize {
    1024
}

fn default_getent_path() -> String {
    "getent".to_string()
}

fn default_sweep_batch_size() -> usize {
    500
}

impl ServiceConfig {
    /// Load configuration from the first config file found, with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        // Try the system path first, then the working directory
        let config_paths = ["/etc/owner-fixer/owner-fixer", "owner-fixer"];

        let mut last_error = None;

        for config_path in &config_paths {
            match Self::load_from(config_path) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    last_error = Some(e);
                    continue;
                }
            }
        }

        Err(config::ConfigError::Message(format!(
            "Failed to load configuration from any location. Tried: {config_paths:?}. Last error: {last_error:?}"
        )))
    }

    /// Load configuration from a specific file (extension optional)
    pub fn load_from(path: &str) -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("OWNER_FIXER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        let config: ServiceConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text, without environment overrides
    pub fn from_toml_str(toml: &str) -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        let config: ServiceConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Split into startup (immutable) and runtime (shared) parts
    pub fn split(self) -> (StartupConfig, SharedRuntimeConfig) {
        let runtime = Arc::new(RwLock::new(self.runtime));
        (self.startup, runtime)
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.startup.hook_port == 0 {
            return Err(config::ConfigError::Message("hook_port cannot be 0".into()));
        }

        if self.startup.corrector_path.is_empty() {
            return Err(config::ConfigError::Message(
                "corrector_path cannot be empty".into(),
            ));
        }

        if self.startup.database_path.is_empty() || self.startup.data_root.is_empty() {
            return Err(config::ConfigError::Message(
                "database_path and data_root cannot be empty".into(),
            ));
        }

        if self.startup.quota_service_url.is_empty() {
            return Err(config::ConfigError::Message(
                "quota_service_url cannot be empty".into(),
            ));
        }

        if self.startup.corrector_timeout_secs == 0
            || self.startup.quota_timeout_secs == 0
            || self.startup.directory_timeout_secs == 0
        {
            return Err(config::ConfigError::Message(
                "timeouts must be greater than 0".into(),
            ));
        }

        self.runtime.validate()
    }
}

impl StartupConfig {
    /// Bind address and hook port as socket address
    pub fn hook_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.hook_port)
    }

    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.database_path)
    }

    pub fn data_root_path(&self) -> PathBuf {
        PathBuf::from(&self.data_root)
    }

    pub fn corrector_timeout(&self) -> Duration {
        Duration::from_secs(self.corrector_timeout_secs)
    }

    pub fn quota_timeout(&self) -> Duration {
        Duration::from_secs(self.quota_timeout_secs)
    }

    pub fn directory_timeout(&self) -> Duration {
        Duration::from_secs(self.directory_timeout_secs)
    }
}

impl RuntimeConfig {
    /// Whether `username` is exempt from quota and ownership correction
    pub fn is_admin(&self, username: &str) -> bool {
        self.admin_users.iter().any(|admin| admin == username)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if !is_valid_umask(&self.permission_umask) {
            return Err(config::ConfigError::Message(format!(
                "permission_umask must be 3 or 4 octal digits, got {:?}",
                self.permission_umask
            )));
        }

        if self.sweep_interval_secs == 0 {
            return Err(config::ConfigError::Message(
                "sweep_interval_secs must be greater than 0".into(),
            ));
        }

        if self.sweep_batch_size == 0 {
            return Err(config::ConfigError::Message(
                "sweep_batch_size must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

fn is_valid_umask(mask: &str) -> bool {
    (3..=4).contains(&mask.len()) && mask.chars().all(|c| ('0'..='7').contains(&c))
}
