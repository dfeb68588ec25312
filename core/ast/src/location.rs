//! Source locations.
//!
//! A [`Location`] is an immutable half-open offset range `[start, end)` over
//! a source buffer plus the identity of the file the buffer came from.
//! Generated nodes that never existed in source text carry the null sentinel.

use core::fmt;
use std::fmt::{Display, Formatter};

use serde::Serialize;

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize)]
pub struct Location {
    pub file: String,
    pub start: u32,
    pub end: u32,
}

impl Location {
    #[must_use]
    pub fn new(file: impl Into<String>, start: u32, end: u32) -> Self {
        let location = Self {
            file: file.into(),
            start,
            end,
        };
        debug_assert!(location.start <= location.end, "inverted location range");
        location
    }

    /// Sentinel location for synthetic nodes (e.g. generated default
    /// parameters). Never compares as intersecting any real range.
    #[must_use]
    pub fn null() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.file.is_empty() && self.start == 0 && self.end == 0
    }

    #[must_use]
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True when this range and `[start, end)` share at least one position.
    #[must_use]
    pub fn intersects(&self, start: u32, end: u32) -> bool {
        !self.is_null() && self.start < end && start < self.end
    }

    /// True when this range fully contains `[start, end)`.
    #[must_use]
    pub fn contains(&self, start: u32, end: u32) -> bool {
        !self.is_null() && self.start <= start && end <= self.end
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.is_null() {
            write!(f, "<generated>")
        } else {
            write!(f, "{}:{}..{}", self.file, self.start, self.end)
        }
    }
}
