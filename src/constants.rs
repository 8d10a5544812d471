//! Shared crate-wide constants for dirlock.
//!
//! Centralizes magic values and default knobs used across modules.
//! `Policy::default()` reads from here.

/// Seconds between lock attempts while another holder keeps the directory locked.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Whether `DirectoryLock::new()` acquires immediately.
pub const DEFAULT_LOCK_ON_CREATE: bool = true;

/// Mount point of sysfs on Linux.
pub const DEFAULT_SYSFS_ROOT: &str = "/sys";

/// Environment variable overriding the sysfs mount point (see `Policy::with_env_overrides`).
pub const ENV_SYSFS_ROOT: &str = "DIRLOCK_SYSFS_ROOT";

/// Directory under the sysfs root holding `<major>:<minor>` links for block devices.
pub const SYSFS_DEV_BLOCK: &str = "dev/block";

/// Per-device attribute, relative to the device directory, reporting rotational media.
pub const ROTATIONAL_ATTR: &str = "queue/rotational";

/// `log` target used by `LogSink`.
pub const LOG_TARGET: &str = "dirlock";
