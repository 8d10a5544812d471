//! Data-only device types.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Major/minor pair of the filesystem device backing a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DeviceNumber {
    pub major: u32,
    pub minor: u32,
}

impl fmt::Display for DeviceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.major, self.minor)
    }
}

/// A block device resolved through the sysfs device namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockDevice {
    /// Number the directory's filesystem reported.
    pub number: DeviceNumber,
    /// Kernel name, e.g. `sda1` or `nvme0n1p2`.
    pub name: String,
    /// Canonical sysfs directory of the device.
    pub sysfs_path: PathBuf,
}

impl fmt::Display for BlockDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.number)
    }
}
