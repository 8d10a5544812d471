//! Shared test helpers for the dirlock integration tests.
#![allow(dead_code)]

use log::Level;
use std::cell::{Cell, RefCell};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use dirlock::adapters::Sleeper;
use dirlock::logging::AuditSink;

/// Captures audit lines so tests can assert on them.
#[derive(Clone, Default, Debug)]
pub struct TestAudit {
    pub lines: Arc<Mutex<Vec<(Level, String)>>>,
}

impl AuditSink for TestAudit {
    fn log(&self, level: Level, msg: &str) {
        self.lines.lock().unwrap().push((level, msg.to_string()));
    }
}

impl TestAudit {
    pub fn count(&self, level: Level) -> usize {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .count()
    }
}

/// Returns immediately, counting how often the lock wanted to wait, and runs `on_sleep` first.
pub struct HookSleeper<F: Fn()> {
    pub count: Cell<u32>,
    on_sleep: F,
}

impl<F: Fn()> HookSleeper<F> {
    pub fn new(on_sleep: F) -> Self {
        Self {
            count: Cell::new(0),
            on_sleep,
        }
    }
}

impl<F: Fn()> Sleeper for HookSleeper<F> {
    fn sleep(&self, _duration: Duration) {
        self.count.set(self.count.get() + 1);
        (self.on_sleep)();
    }
}

/// Sleeper that must never be asked to wait.
pub struct NoWait;

impl Sleeper for NoWait {
    fn sleep(&self, duration: Duration) {
        panic!("lock should not have waited (asked to sleep {duration:?})");
    }
}

/// Drops the held value the first time the lock waits.
pub fn release_on_wait<T>(holder: &RefCell<Option<T>>) -> impl Fn() + '_ {
    move || {
        holder.borrow_mut().take();
    }
}

/// Block until `path` exists or `timeout` passes.
pub fn wait_for(path: &Path, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while !path.exists() {
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    true
}
