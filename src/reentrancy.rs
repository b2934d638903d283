//! Debug-only reentrancy guard.
//!
//! The interner calls user `Hash`/`Eq` implementations while its index is
//! borrowed. A `Hash` or `Eq` impl that reaches back into the same interner
//! would observe it mid-update; debug builds catch that with a panic.
//! Release builds compile the guard away.

use core::cell::Cell;
use core::marker::PhantomData;

/// Per-instance nesting tracker. Guard entry points with
/// `let _busy = self.reentrancy.enter();`.
#[derive(Debug, Default)]
pub(crate) struct DebugReentrancy {
    #[cfg(debug_assertions)]
    busy: Cell<bool>,
    // Same auto traits in every profile: Send, not Sync.
    _not_sync: PhantomData<Cell<()>>,
}

impl DebugReentrancy {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            busy: Cell::new(false),
            _not_sync: PhantomData,
        }
    }

    /// Marks the owner busy until the returned guard drops. Panics in debug
    /// builds if the owner is already busy.
    #[inline]
    pub(crate) fn enter(&self) -> BusyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            assert!(
                !self.busy.replace(true),
                "reentrant call into an interner from its own Hash or Eq"
            );
            return BusyGuard { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            return BusyGuard { _owner: PhantomData };
        }
    }
}

pub(crate) struct BusyGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _owner: PhantomData<&'a DebugReentrancy>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.owner.busy.set(false);
    }
}
