//! Size/count accumulation.
//!
//! [`Totals`] is the unit every recursive sizing frame produces and merges
//! into its parent. It is a plain value type: two signed 64-bit counters
//! combined by pairwise addition.

use std::{
    iter::Sum,
    ops::{Add, AddAssign},
};

use serde::Serialize;

/// Aggregated byte size and file count of a directory subtree.
///
/// Both fields are signed to match the file-size contract of the handles
/// (`i64` lengths). Addition saturates rather than wrapping, so a tree too
/// large to represent reports `i64::MAX` instead of a negative total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Totals {
    /// Total size in bytes of every file counted
    pub size: i64,

    /// Number of file objects counted
    pub count: i64,
}

impl Totals {
    /// Totals for a single file of `size` bytes.
    #[must_use]
    pub const fn file(size: i64) -> Self {
        Self { size, count: 1 }
    }

    /// Size as an unsigned byte count, for formatting.
    ///
    /// Totals built by the sizer are never negative; anything below zero is
    /// clamped to zero.
    #[must_use]
    pub fn size_bytes(&self) -> u64 {
        u64::try_from(self.size).unwrap_or(0)
    }
}

impl Add for Totals {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            size: self.size.saturating_add(other.size),
            count: self.count.saturating_add(other.count),
        }
    }
}

impl AddAssign for Totals {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sum for Totals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}
