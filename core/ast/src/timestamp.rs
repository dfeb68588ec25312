//! Compilation timestamps.
//!
//! A [`CompilationTimestamp`] is a totally ordered tick identifying one
//! semantic-check generation. Every cached semantic result stores the
//! timestamp at which it was last validated; the result is reused only if
//! the stored timestamp is not less than the current one. This replaces ad
//! hoc dirty flags with a single monotonic comparison.

use std::cell::Cell;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct CompilationTimestamp(u64);

impl CompilationTimestamp {
    #[must_use]
    pub fn tick(self) -> Self {
        Self(self.0 + 1)
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Monotonic source of check generations. One logical edit/check pass
/// advances the source once and hands the resulting tick to every check.
#[derive(Debug, Default)]
pub struct TimestampSource {
    current: Cell<CompilationTimestamp>,
}

impl TimestampSource {
    pub fn advance(&self) -> CompilationTimestamp {
        let next = self.current.get().tick();
        self.current.set(next);
        next
    }

    #[must_use]
    pub fn current(&self) -> CompilationTimestamp {
        self.current.get()
    }
}

/// Timestamp-gated memoization record attached to a checkable entity.
/// Absence of a stored timestamp means "never checked."
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct CheckCache {
    last_checked: Cell<Option<CompilationTimestamp>>,
}

impl CheckCache {
    /// True when the cached result is still valid at `now`.
    #[must_use]
    pub fn is_fresh(&self, now: CompilationTimestamp) -> bool {
        self.last_checked.get().is_some_and(|stamp| stamp >= now)
    }

    /// Records a completed check. Called unconditionally, even when the
    /// check reported findings, so repeated checks on an unchanged tree
    /// stay O(1).
    pub fn record(&self, now: CompilationTimestamp) {
        self.last_checked.set(Some(now));
    }

    pub fn invalidate(&self) {
        self.last_checked.set(None);
    }

    #[must_use]
    pub fn last_checked(&self) -> Option<CompilationTimestamp> {
        self.last_checked.get()
    }
}
