//! Block-device introspection: which device backs a directory, and does it spin.
//!
//! On Linux the directory's `st_dev` is mapped to `<sysfs>/dev/block/<major>:<minor>`, resolved
//! canonically, and the device's `queue/rotational` attribute is read. Platforms without sysfs
//! report "no locking needed" without touching the filesystem.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::constants::{ROTATIONAL_ATTR, SYSFS_DEV_BLOCK};
use crate::policy::Policy;
use crate::types::{BlockDevice, DeviceNumber, Error, Result};

/// Whether block-device introspection is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Introspection {
    Sysfs,
    Unsupported,
}

impl Introspection {
    #[must_use]
    pub const fn native() -> Self {
        if cfg!(any(target_os = "linux", target_os = "android")) {
            Self::Sysfs
        } else {
            Self::Unsupported
        }
    }
}

pub trait DiskInspector {
    fn introspection(&self) -> Introspection;

    /// Resolve the block device holding the filesystem that contains `dir`.
    ///
    /// # Errors
    ///
    /// Returns `ErrorKind::Resolution` if `dir` cannot be stat'd or its device link cannot be
    /// canonically resolved.
    fn resolve_backing_device(&self, dir: &Path) -> Result<BlockDevice>;

    /// `true` when the device reports non-rotational (solid-state) media.
    ///
    /// # Errors
    ///
    /// Returns `ErrorKind::Query` if the rotational attribute cannot be opened.
    fn is_non_rotational(&self, device: &BlockDevice) -> Result<bool>;

    /// `true` iff writers to `dir` should serialize, i.e. its device is rotational.
    /// Always `false` where introspection is unsupported.
    ///
    /// # Errors
    ///
    /// Propagates resolution and query failures unchanged.
    fn should_lock_directory(&self, dir: &Path) -> Result<bool> {
        if self.introspection() == Introspection::Unsupported {
            return Ok(false);
        }
        let device = self.resolve_backing_device(dir)?;
        let non_rotational = self.is_non_rotational(&device)?;
        log::debug!(
            target: crate::constants::LOG_TARGET,
            "{} is backed by {device} (non_rotational={non_rotational})",
            dir.display()
        );
        Ok(!non_rotational)
    }
}

/// Production inspector reading sysfs.
#[derive(Debug, Clone)]
pub struct SysfsInspector {
    root: PathBuf,
    introspection: Introspection,
}

impl Default for SysfsInspector {
    fn default() -> Self {
        Self::from_policy(&Policy::default())
    }
}

impl SysfsInspector {
    #[must_use]
    pub fn from_policy(policy: &Policy) -> Self {
        Self {
            root: policy.sysfs_root.clone(),
            introspection: Introspection::native(),
        }
    }

    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    #[must_use]
    pub fn with_introspection(mut self, introspection: Introspection) -> Self {
        self.introspection = introspection;
        self
    }
}

/// Major/minor numbers of the filesystem device containing `dir`.
///
/// # Errors
///
/// Returns `ErrorKind::Resolution` if `dir` cannot be stat'd.
#[cfg(unix)]
pub fn device_number(dir: &Path) -> Result<DeviceNumber> {
    let st = rustix::fs::stat(dir).map_err(|e| {
        Error::resolution(format!(
            "Unable to find device name for dir {}: {e}",
            dir.display()
        ))
    })?;
    Ok(DeviceNumber {
        major: rustix::fs::major(st.st_dev),
        minor: rustix::fs::minor(st.st_dev),
    })
}

/// # Errors
///
/// Always `ErrorKind::Unsupported`: there are no device numbers off unix.
#[cfg(not(unix))]
pub fn device_number(dir: &Path) -> Result<DeviceNumber> {
    Err(Error {
        kind: crate::types::ErrorKind::Unsupported,
        msg: format!("no device numbers for dir {} on this platform", dir.display()),
    })
}

/// First line starting with `0` means non-rotational; anything else, including an empty
/// or unreadable line, counts as rotational.
fn first_line_is_zero(file: File) -> bool {
    let mut line = String::new();
    if BufReader::new(file).read_line(&mut line).is_err() {
        return false;
    }
    line.starts_with('0')
}

impl DiskInspector for SysfsInspector {
    fn introspection(&self) -> Introspection {
        self.introspection
    }

    fn resolve_backing_device(&self, dir: &Path) -> Result<BlockDevice> {
        let number = device_number(dir)?;
        let link = self.root.join(SYSFS_DEV_BLOCK).join(number.to_string());
        let sysfs_path = std::fs::canonicalize(&link).map_err(|e| {
            Error::resolution(format!(
                "Unable to find device name for {}: {e}",
                link.display()
            ))
        })?;
        let name = sysfs_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                Error::resolution(format!(
                    "Unable to find device name for {}: resolved to {}",
                    link.display(),
                    sysfs_path.display()
                ))
            })?;
        Ok(BlockDevice {
            number,
            name,
            sysfs_path,
        })
    }

    fn is_non_rotational(&self, device: &BlockDevice) -> Result<bool> {
        let own = device.sysfs_path.join(ROTATIONAL_ATTR);
        let first_err = match File::open(&own) {
            Ok(f) => return Ok(first_line_is_zero(f)),
            Err(e) => e,
        };
        // Partitions carry no queue/; the whole disk is their parent directory.
        if let Some(disk) = device.sysfs_path.parent() {
            if let Ok(f) = File::open(disk.join(ROTATIONAL_ATTR)) {
                return Ok(first_line_is_zero(f));
            }
        }
        Err(Error::query(format!(
            "Unable to open {} for reading: {first_err}",
            own.display()
        )))
    }
}

/// Resolve the device backing `dir` using the default sysfs root (or `DIRLOCK_SYSFS_ROOT`).
///
/// # Errors
///
/// See [`DiskInspector::resolve_backing_device`].
pub fn resolve_backing_device(dir: &Path) -> Result<BlockDevice> {
    default_inspector().resolve_backing_device(dir)
}

/// # Errors
///
/// See [`DiskInspector::is_non_rotational`].
pub fn is_non_rotational(device: &BlockDevice) -> Result<bool> {
    default_inspector().is_non_rotational(device)
}

/// Whether writers to `dir` should take a `DirectoryLock` first.
///
/// # Errors
///
/// See [`DiskInspector::should_lock_directory`].
pub fn should_lock_directory(dir: &Path) -> Result<bool> {
    default_inspector().should_lock_directory(dir)
}

fn default_inspector() -> SysfsInspector {
    SysfsInspector::from_policy(&Policy::default().with_env_overrides())
}
