pub mod facts;

pub use facts::{AuditSink, LogSink, NullSink};
