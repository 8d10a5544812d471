pub mod lock;
pub mod sleep;

pub use lock::{Backend, CloseResult, LockBackend, PosixAdvisoryLock, UnsupportedLock};
pub use sleep::{Sleeper, ThreadSleeper};
