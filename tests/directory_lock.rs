mod common;

use std::cell::RefCell;
use std::time::Duration;

use dirlock::logging::NullSink;
use dirlock::{DirectoryLock, LockState, Policy};
use log::Level;

use common::{release_on_wait, HookSleeper, NoWait, TestAudit};

#[test]
fn new_locks_an_existing_directory_immediately() {
    let td = tempfile::tempdir().unwrap();
    let lock = DirectoryLock::new(td.path());
    assert_eq!(lock.state(), LockState::Locked);
    assert_eq!(lock.path(), td.path());
}

#[test]
fn unlocked_constructor_defers_acquisition() {
    let td = tempfile::tempdir().unwrap();
    let mut lock = DirectoryLock::unlocked(td.path());
    assert_eq!(lock.state(), LockState::Unlocked);
    assert!(lock.lock());
    assert!(lock.unlock());
    assert_eq!(lock.state(), LockState::Unlocked);
    assert!(!lock.unlock(), "second unlock has nothing to release");
}

#[cfg(unix)]
#[test]
fn missing_directory_fails_without_waiting() {
    let td = tempfile::tempdir().unwrap();
    let audit = TestAudit::default();
    let mut lock = DirectoryLock::builder(td.path().join("removed"))
        .sleeper(NoWait)
        .audit(audit.clone())
        .lock_on_create(false)
        .build();
    assert!(!lock.lock());
    assert_eq!(lock.state(), LockState::Unlocked);
    assert_eq!(audit.count(Level::Error), 1);
}

#[cfg(unix)]
#[test]
fn second_instance_waits_until_first_is_dropped() {
    let td = tempfile::tempdir().unwrap();
    let first = DirectoryLock::builder(td.path()).audit(NullSink).build();
    assert!(first.is_locked());

    let holder = RefCell::new(Some(first));
    let sleeper = HookSleeper::new(release_on_wait(&holder));
    let audit = TestAudit::default();
    let mut second = DirectoryLock::builder(td.path())
        .sleeper(&sleeper)
        .audit(audit.clone())
        .policy(Policy::default().with_lock_on_create(false))
        .build();

    assert!(second.lock());
    assert_eq!(sleeper.count.get(), 1);
    assert_eq!(second.attempts(), 2);
    assert!(holder.borrow().is_none());
    assert_eq!(audit.count(Level::Info), 1);
}

#[cfg(unix)]
#[test]
fn second_instance_waits_until_first_unlocks_explicitly() {
    let td = tempfile::tempdir().unwrap();
    let first = RefCell::new(DirectoryLock::builder(td.path()).audit(NullSink).build());
    let sleeper = HookSleeper::new(|| {
        assert!(first.borrow_mut().unlock());
    });
    let mut second = DirectoryLock::builder(td.path())
        .sleeper(&sleeper)
        .audit(NullSink)
        .lock_on_create(false)
        .build();

    assert!(second.lock());
    assert_eq!(sleeper.count.get(), 1);
    assert!(!first.borrow().is_locked());
}

#[test]
fn dropped_guard_leaves_no_lock_behind() {
    let td = tempfile::tempdir().unwrap();
    {
        let lock = DirectoryLock::builder(td.path()).audit(NullSink).build();
        assert!(lock.is_locked());
    }
    let mut again = DirectoryLock::builder(td.path())
        .sleeper(NoWait)
        .audit(NullSink)
        .lock_on_create(false)
        .build();
    assert!(again.lock());
    assert_eq!(again.attempts(), 1);
}

#[test]
fn guard_released_on_early_return() {
    fn write_batch(dir: &std::path::Path, bail: bool) -> Result<(), &'static str> {
        let lock = DirectoryLock::builder(dir).audit(NullSink).build();
        if !lock.is_locked() {
            return Err("unlockable");
        }
        if bail {
            return Err("bailed");
        }
        Ok(())
    }

    let td = tempfile::tempdir().unwrap();
    assert_eq!(write_batch(td.path(), true), Err("bailed"));
    assert_eq!(write_batch(td.path(), false), Ok(()));

    let mut probe = DirectoryLock::builder(td.path())
        .sleeper(NoWait)
        .audit(NullSink)
        .poll_interval(Duration::from_millis(1))
        .lock_on_create(false)
        .build();
    assert!(probe.lock());
}
