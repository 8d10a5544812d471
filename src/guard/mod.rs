//! Blocking, process-exclusive advisory lock on a directory.
//!
//! A `DirectoryLock` is bound to one path. `lock()` opens the directory and polls an exclusive,
//! non-blocking advisory lock until it is granted, sleeping `Policy::poll_interval` between
//! attempts. There is no timeout and no cancellation. `unlock()` releases and closes; `Drop`
//! calls `unlock()` on every exit path, unwinding included.
//!
//! The lock only excludes holders that use the same protocol on the same directory. With the
//! POSIX backend, two instances on one directory inside a single process also exclude each
//! other, because the lock belongs to the open descriptor rather than the process.

mod builder;

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::Level;

use crate::adapters::{Backend, LockBackend, Sleeper, ThreadSleeper};
use crate::logging::{AuditSink, LogSink};

pub use builder::DirectoryLockBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Unlocked,
    Locked,
}

/// Acquisition progress inside a single `lock()` call.
enum Step<H> {
    Open,
    Attempt(H),
    Wait(H),
    Held(H),
    Failed,
}

pub struct DirectoryLock<B: LockBackend = Backend, S: Sleeper = ThreadSleeper, A: AuditSink = LogSink>
{
    path: PathBuf,
    backend: B,
    sleeper: S,
    audit: A,
    poll_interval: Duration,
    handle: Option<B::Handle>,
    attempts: u64,
}

impl DirectoryLock {
    /// Bind to `dir` with the platform backend and acquire immediately (per
    /// `Policy::lock_on_create`). Check `is_locked()` if the directory may be unopenable.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectoryLockBuilder::new(dir).build()
    }

    /// Bind to `dir` without acquiring.
    pub fn unlocked(dir: impl Into<PathBuf>) -> Self {
        DirectoryLockBuilder::new(dir).lock_on_create(false).build()
    }

    pub fn builder(dir: impl Into<PathBuf>) -> DirectoryLockBuilder {
        DirectoryLockBuilder::new(dir)
    }
}

impl<B: LockBackend, S: Sleeper, A: AuditSink> DirectoryLock<B, S, A> {
    pub(crate) fn from_parts(
        path: PathBuf,
        backend: B,
        sleeper: S,
        audit: A,
        poll_interval: Duration,
    ) -> Self {
        Self {
            path,
            backend,
            sleeper,
            audit,
            poll_interval,
            handle: None,
            attempts: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub const fn is_locked(&self) -> bool {
        self.handle.is_some()
    }

    pub const fn state(&self) -> LockState {
        if self.is_locked() {
            LockState::Locked
        } else {
            LockState::Unlocked
        }
    }

    /// Lock attempts made by the most recent `lock()` call that reached the OS.
    pub const fn attempts(&self) -> u64 {
        self.attempts
    }

    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Acquire the lock, blocking until no other holder has it.
    ///
    /// Returns `true` once held (immediately if already held). Returns `false` only when the
    /// directory cannot be opened; that failure is logged and not retried.
    pub fn lock(&mut self) -> bool {
        if self.is_locked() {
            return true;
        }
        self.attempts = 0;
        let mut step = Step::Open;
        loop {
            step = match step {
                Step::Open => match self.backend.open(&self.path) {
                    Ok(h) => Step::Attempt(h),
                    Err(e) => {
                        self.audit.log(
                            Level::Error,
                            &format!(
                                "Unable to open directory for locking: {}. Error: {e}",
                                self.path.display()
                            ),
                        );
                        Step::Failed
                    }
                },
                Step::Attempt(h) => {
                    self.attempts += 1;
                    match self.backend.try_lock_exclusive(&h) {
                        Ok(true) => Step::Held(h),
                        Ok(false) => {
                            self.audit.log(
                                Level::Info,
                                &format!(
                                    "Directory locked, waiting (retrying in {}s): {}",
                                    self.poll_interval.as_secs(),
                                    self.path.display()
                                ),
                            );
                            Step::Wait(h)
                        }
                        Err(e) => {
                            self.audit.log(
                                Level::Warn,
                                &format!(
                                    "Unable to lock directory (retrying in {}s): {}. Error: {e}",
                                    self.poll_interval.as_secs(),
                                    self.path.display()
                                ),
                            );
                            Step::Wait(h)
                        }
                    }
                }
                Step::Wait(h) => {
                    self.sleeper.sleep(self.poll_interval);
                    Step::Attempt(h)
                }
                Step::Held(h) => {
                    self.audit.log(
                        Level::Debug,
                        &format!(
                            "Locked {} via {} after {} attempt(s)",
                            self.path.display(),
                            self.backend.label(),
                            self.attempts
                        ),
                    );
                    self.handle = Some(h);
                    return true;
                }
                Step::Failed => return false,
            };
        }
    }

    /// Release the lock and close the directory.
    ///
    /// Returns `false` without any OS call when not held. If the unlock call fails the lock is
    /// still considered held and `false` is returned. The same holds when the close call fails:
    /// the handle is kept and the state stays `Locked`.
    pub fn unlock(&mut self) -> bool {
        let Some(handle) = self.handle.take() else {
            return false;
        };
        if let Err(e) = self.backend.unlock(&handle) {
            self.audit.log(
                Level::Error,
                &format!(
                    "Failed to unlock the directory: {}. Error: {e}",
                    self.path.display()
                ),
            );
            self.handle = Some(handle);
            return false;
        }
        if let Err((handle, e)) = self.backend.close(handle) {
            self.audit.log(
                Level::Error,
                &format!(
                    "Failed to close the directory during unlocking: {}. Error: {e}",
                    self.path.display()
                ),
            );
            self.handle = Some(handle);
            return false;
        }
        self.audit.log(
            Level::Debug,
            &format!("Unlocked {}", self.path.display()),
        );
        true
    }
}

impl<B: LockBackend, S: Sleeper, A: AuditSink> Drop for DirectoryLock<B, S, A> {
    fn drop(&mut self) {
        self.unlock();
    }
}

impl<B: LockBackend, S: Sleeper, A: AuditSink> std::fmt::Debug for DirectoryLock<B, S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryLock")
            .field("path", &self.path)
            .field("backend", &self.backend.label())
            .field("state", &self.state())
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}
