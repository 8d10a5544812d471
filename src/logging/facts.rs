use log::Level;

use crate::constants::LOG_TARGET;

/// Destination for the human-readable lines emitted while locking.
pub trait AuditSink {
    fn log(&self, level: Level, msg: &str);
}

impl<A: AuditSink + ?Sized> AuditSink for &A {
    fn log(&self, level: Level, msg: &str) {
        (**self).log(level, msg);
    }
}

/// Forwards to the `log` facade under the `dirlock` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl AuditSink for LogSink {
    fn log(&self, level: Level, msg: &str) {
        log::log!(target: LOG_TARGET, level, "{msg}");
    }
}

/// Drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl AuditSink for NullSink {
    fn log(&self, _level: Level, _msg: &str) {}
}
