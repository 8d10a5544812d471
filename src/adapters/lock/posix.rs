use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use fs2::FileExt;

use super::{CloseResult, LockBackend};

/// `flock`-style exclusive advisory lock on a directory descriptor.
///
/// Locks belong to the open file description, so two handles opened separately on the same
/// directory conflict even inside one process.
#[derive(Debug, Default, Clone, Copy)]
pub struct PosixAdvisoryLock;

fn is_contended(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::WouldBlock
        || e.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

impl LockBackend for PosixAdvisoryLock {
    type Handle = File;

    fn open(&self, dir: &Path) -> io::Result<File> {
        OpenOptions::new().read(true).open(dir)
    }

    fn try_lock_exclusive(&self, handle: &File) -> io::Result<bool> {
        match FileExt::try_lock_exclusive(handle) {
            Ok(()) => Ok(true),
            Err(e) if is_contended(&e) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn unlock(&self, handle: &File) -> io::Result<()> {
        FileExt::unlock(handle)
    }

    fn close(&self, handle: File) -> CloseResult<File> {
        // std closes on drop and discards the close(2) result.
        drop(handle);
        Ok(())
    }

    fn label(&self) -> &'static str {
        "flock"
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn second_descriptor_sees_contention_until_first_unlocks() {
        let td = tempfile::tempdir().unwrap();
        let b = PosixAdvisoryLock;
        let a = b.open(td.path()).unwrap();
        let c = b.open(td.path()).unwrap();

        assert!(b.try_lock_exclusive(&a).unwrap());
        assert!(!b.try_lock_exclusive(&c).unwrap(), "second descriptor must be contended");

        b.unlock(&a).unwrap();
        assert!(b.try_lock_exclusive(&c).unwrap());
        assert!(b.close(c).is_ok());
        assert!(b.close(a).is_ok());
    }

    #[test]
    fn closing_releases_the_lock() {
        let td = tempfile::tempdir().unwrap();
        let b = PosixAdvisoryLock;
        let a = b.open(td.path()).unwrap();
        assert!(b.try_lock_exclusive(&a).unwrap());
        assert!(b.close(a).is_ok());

        let c = b.open(td.path()).unwrap();
        assert!(b.try_lock_exclusive(&c).unwrap());
    }

    #[test]
    fn open_fails_for_missing_directory() {
        let td = tempfile::tempdir().unwrap();
        let err = PosixAdvisoryLock.open(&td.path().join("gone")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
