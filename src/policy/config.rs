use crate::constants::{
    DEFAULT_LOCK_ON_CREATE, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_SYSFS_ROOT, ENV_SYSFS_ROOT,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Policy governs how directory locks wait and where disk attributes are read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Policy {
    /// Delay between lock attempts while the directory is held elsewhere.
    pub poll_interval: Duration,
    /// Acquire as part of `DirectoryLock::new()`.
    pub lock_on_create: bool,
    /// Mount point of sysfs.
    pub sysfs_root: PathBuf,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            lock_on_create: DEFAULT_LOCK_ON_CREATE,
            sysfs_root: PathBuf::from(DEFAULT_SYSFS_ROOT),
        }
    }
}

/// On-disk shape of a policy file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PolicyFile {
    poll_interval_secs: Option<u64>,
    lock_on_create: Option<bool>,
    sysfs_root: Option<PathBuf>,
}

impl Policy {
    /// Parse a JSON policy document, filling unspecified fields from `Policy::default()`.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the document is malformed or names an unknown field.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        let file: PolicyFile = serde_json::from_str(s)?;
        let mut p = Self::default();
        if let Some(secs) = file.poll_interval_secs {
            p.poll_interval = Duration::from_secs(secs);
        }
        if let Some(v) = file.lock_on_create {
            p.lock_on_create = v;
        }
        if let Some(root) = file.sysfs_root {
            p.sysfs_root = root;
        }
        Ok(p)
    }

    /// Apply `DIRLOCK_SYSFS_ROOT` when set and non-empty.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(root) = std::env::var_os(ENV_SYSFS_ROOT).filter(|v| !v.is_empty()) {
            self.sysfs_root = PathBuf::from(root);
        }
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    #[must_use]
    pub fn with_lock_on_create(mut self, lock_on_create: bool) -> Self {
        self.lock_on_create = lock_on_create;
        self
    }

    #[must_use]
    pub fn with_sysfs_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.sysfs_root = root.into();
        self
    }
}
