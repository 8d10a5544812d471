use std::io;
use std::path::Path;

use super::{CloseResult, LockBackend};

/// Stand-in for platforms without advisory locks. Locking always "succeeds".
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedLock;

impl LockBackend for UnsupportedLock {
    type Handle = ();

    fn open(&self, _dir: &Path) -> io::Result<()> {
        Ok(())
    }

    fn try_lock_exclusive(&self, _handle: &()) -> io::Result<bool> {
        Ok(true)
    }

    fn unlock(&self, _handle: &()) -> io::Result<()> {
        Ok(())
    }

    fn close(&self, _handle: ()) -> CloseResult<()> {
        Ok(())
    }

    fn label(&self) -> &'static str {
        "unsupported"
    }
}
