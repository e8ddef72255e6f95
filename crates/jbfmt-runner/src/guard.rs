//! Single-slot gate preventing overlapping formatter runs.
//!
//! The external formatter rewrites files in place, so two runs racing on
//! the same settings file or target would corrupt each other. Each
//! orchestrator owns one [`BusyGuard`]; a request that finds it held is
//! rejected, never queued.

use std::sync::atomic::{AtomicBool, Ordering};

/// Busy flag owned by a single orchestrator instance.
#[derive(Debug, Default)]
pub struct BusyGuard {
    busy: AtomicBool,
}

impl BusyGuard {
    /// Creates an idle guard.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
        }
    }

    /// Claims the guard, returning `None` when it is already held.
    #[must_use]
    pub fn try_acquire(&self) -> Option<BusyPermit<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyPermit { guard: self })
    }

    /// Returns true while a permit is outstanding.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Proof that the holder owns the guard. Dropping it releases the guard on
/// every exit path, including unwinding.
#[derive(Debug)]
#[must_use = "the guard is released as soon as the permit is dropped"]
pub struct BusyPermit<'a> {
    guard: &'a BusyGuard,
}

impl Drop for BusyPermit<'_> {
    fn drop(&mut self) {
        self.guard.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use super::*;

    #[test]
    fn second_acquire_is_rejected_while_held() {
        let guard = BusyGuard::new();
        let permit = guard.try_acquire().expect("first acquire succeeds");
        assert!(guard.is_busy());
        assert!(guard.try_acquire().is_none());
        drop(permit);
        assert!(!guard.is_busy());
    }

    #[test]
    fn guard_is_reusable_after_release() {
        let guard = BusyGuard::new();
        for _ in 0..3 {
            let permit = guard.try_acquire().expect("acquire succeeds");
            drop(permit);
        }
        assert!(!guard.is_busy());
    }

    #[test]
    fn guard_is_released_when_holder_panics() {
        let guard = BusyGuard::new();
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _permit = guard.try_acquire().expect("acquire succeeds");
            panic!("formatter host crashed");
        }));
        assert!(result.is_err());
        assert!(!guard.is_busy());
    }

    #[test]
    fn guards_do_not_share_state() {
        let first = BusyGuard::new();
        let second = BusyGuard::new();
        let _held = first.try_acquire().expect("acquire succeeds");
        assert!(second.try_acquire().is_some());
    }
}
