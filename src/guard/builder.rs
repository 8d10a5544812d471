use std::path::PathBuf;
use std::time::Duration;

use crate::adapters::{Backend, LockBackend, Sleeper, ThreadSleeper};
use crate::logging::{AuditSink, LogSink};
use crate::policy::Policy;

use super::DirectoryLock;

/// Assembles a `DirectoryLock` with a custom backend, sleeper, audit sink, or policy.
#[derive(Debug)]
pub struct DirectoryLockBuilder<B = Backend, S = ThreadSleeper, A = LogSink> {
    path: PathBuf,
    backend: B,
    sleeper: S,
    audit: A,
    policy: Policy,
}

impl DirectoryLockBuilder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into(),
            backend: Backend::native(),
            sleeper: ThreadSleeper,
            audit: LogSink,
            policy: Policy::default(),
        }
    }
}

impl<B, S, A> DirectoryLockBuilder<B, S, A> {
    pub fn backend<B2: LockBackend>(self, backend: B2) -> DirectoryLockBuilder<B2, S, A> {
        DirectoryLockBuilder {
            path: self.path,
            backend,
            sleeper: self.sleeper,
            audit: self.audit,
            policy: self.policy,
        }
    }

    pub fn sleeper<S2: Sleeper>(self, sleeper: S2) -> DirectoryLockBuilder<B, S2, A> {
        DirectoryLockBuilder {
            path: self.path,
            backend: self.backend,
            sleeper,
            audit: self.audit,
            policy: self.policy,
        }
    }

    pub fn audit<A2: AuditSink>(self, audit: A2) -> DirectoryLockBuilder<B, S, A2> {
        DirectoryLockBuilder {
            path: self.path,
            backend: self.backend,
            sleeper: self.sleeper,
            audit,
            policy: self.policy,
        }
    }

    #[must_use]
    pub fn policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.policy.poll_interval = interval;
        self
    }

    #[must_use]
    pub fn lock_on_create(mut self, lock_on_create: bool) -> Self {
        self.policy.lock_on_create = lock_on_create;
        self
    }
}

impl<B: LockBackend, S: Sleeper, A: AuditSink> DirectoryLockBuilder<B, S, A> {
    /// Build the lock, acquiring it first when `lock_on_create` is set.
    pub fn build(self) -> DirectoryLock<B, S, A> {
        let mut lock = DirectoryLock::from_parts(
            self.path,
            self.backend,
            self.sleeper,
            self.audit,
            self.policy.poll_interval,
        );
        if self.policy.lock_on_create {
            lock.lock();
        }
        lock
    }
}
