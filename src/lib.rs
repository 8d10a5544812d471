#![forbid(unsafe_code)]
//! dirlock: rotational-disk detection and blocking advisory directory locks.
//!
//! Typical use by a writer:
//! - ask [`should_lock_directory`] whether the directory sits on spinning media;
//! - if so, hold a [`DirectoryLock`] for the duration of the writes.
//!
//! Both halves degrade to "no locking" on platforms without sysfs or advisory locks.
//! This crate forbids `unsafe` and uses `rustix` and `fs2` for syscalls.

pub mod constants;
pub mod adapters;
pub mod fs;
pub mod guard;
pub mod logging;
pub mod policy;
pub mod types;

pub use fs::{
    is_non_rotational, resolve_backing_device, should_lock_directory, DiskInspector,
    Introspection, SysfsInspector,
};
pub use guard::{DirectoryLock, DirectoryLockBuilder, LockState};
pub use policy::Policy;
pub use types::{BlockDevice, DeviceNumber, Error, ErrorKind, Result};
