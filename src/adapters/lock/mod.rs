//! Advisory-lock backends.
//!
//! `DirectoryLock` drives a `LockBackend` through open → try-lock (looped) → unlock → close.
//! `Backend` picks the concrete implementation for the running platform.

pub mod posix;
pub mod unsupported;

use std::fs::File;
use std::io;
use std::path::Path;

pub use posix::PosixAdvisoryLock;
pub use unsupported::UnsupportedLock;

/// Outcome of `LockBackend::close`. On failure the handle is returned to the caller.
pub type CloseResult<H> = Result<(), (H, io::Error)>;

pub trait LockBackend {
    /// Open resource whose lifetime bounds the lock.
    type Handle;

    /// Open `dir` for locking.
    ///
    /// # Errors
    ///
    /// Returns the OS error when the directory cannot be opened. Callers treat this as terminal.
    fn open(&self, dir: &Path) -> io::Result<Self::Handle>;

    /// Try to take the exclusive lock without blocking.
    /// `Ok(false)` means another holder has it.
    ///
    /// # Errors
    ///
    /// Returns any OS error other than contention.
    fn try_lock_exclusive(&self, handle: &Self::Handle) -> io::Result<bool>;

    /// Release the lock held through `handle`.
    ///
    /// # Errors
    ///
    /// Returns the OS error reported by the unlock call.
    fn unlock(&self, handle: &Self::Handle) -> io::Result<()>;

    /// Close `handle`.
    ///
    /// # Errors
    ///
    /// Hands `handle` back with the OS error when the backend observes a failed close.
    fn close(&self, handle: Self::Handle) -> CloseResult<Self::Handle>;

    /// Short name used in log lines.
    fn label(&self) -> &'static str;
}

/// Platform lock backend chosen at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// `flock(LOCK_EX | LOCK_NB)` on a read-only directory descriptor.
    PosixAdvisoryLock,
    /// No advisory locking facility; every operation succeeds without touching the OS.
    Unsupported,
}

impl Backend {
    /// Backend for the platform this binary runs on.
    #[must_use]
    pub const fn native() -> Self {
        if cfg!(unix) {
            Self::PosixAdvisoryLock
        } else {
            Self::Unsupported
        }
    }
}

impl Default for Backend {
    fn default() -> Self {
        Self::native()
    }
}

#[derive(Debug)]
pub enum BackendHandle {
    Posix(File),
    Unsupported,
}

impl LockBackend for Backend {
    type Handle = BackendHandle;

    fn open(&self, dir: &Path) -> io::Result<BackendHandle> {
        match self {
            Self::PosixAdvisoryLock => PosixAdvisoryLock.open(dir).map(BackendHandle::Posix),
            Self::Unsupported => UnsupportedLock.open(dir).map(|()| BackendHandle::Unsupported),
        }
    }

    fn try_lock_exclusive(&self, handle: &BackendHandle) -> io::Result<bool> {
        match handle {
            BackendHandle::Posix(f) => PosixAdvisoryLock.try_lock_exclusive(f),
            BackendHandle::Unsupported => UnsupportedLock.try_lock_exclusive(&()),
        }
    }

    fn unlock(&self, handle: &BackendHandle) -> io::Result<()> {
        match handle {
            BackendHandle::Posix(f) => PosixAdvisoryLock.unlock(f),
            BackendHandle::Unsupported => UnsupportedLock.unlock(&()),
        }
    }

    fn close(&self, handle: BackendHandle) -> CloseResult<BackendHandle> {
        match handle {
            BackendHandle::Posix(f) => PosixAdvisoryLock
                .close(f)
                .map_err(|(f, e)| (BackendHandle::Posix(f), e)),
            BackendHandle::Unsupported => UnsupportedLock
                .close(())
                .map_err(|((), e)| (BackendHandle::Unsupported, e)),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::PosixAdvisoryLock => PosixAdvisoryLock.label(),
            Self::Unsupported => UnsupportedLock.label(),
        }
    }
}
