//! Inclusive index interval covered by a segment tree node
//!
//! Span = [left, right] ⊆ [0, n-1]
//! Children computed via midpoint: m = ⌊(left + right) / 2⌋
//!   Left child: [left, m]
//!   Right child: [m+1, right]

use std::fmt;

/// Node interval (inclusive on both ends)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Left leaf index (inclusive)
    pub left: usize,

    /// Right leaf index (inclusive)
    pub right: usize,
}

impl Span {
    /// Create span covering [left, right]
    pub fn root(left: usize, right: usize) -> Self {
        debug_assert!(left <= right, "inverted span [{}, {}]", left, right);
        Self { left, right }
    }

    /// Check if leaf (unit interval)
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left == self.right
    }

    /// Interval length
    #[inline]
    pub fn length(&self) -> usize {
        self.right - self.left + 1
    }

    /// Split point: m = ⌊(left + right) / 2⌋
    #[inline]
    pub fn midpoint(&self) -> usize {
        // Same floor as (left + right) / 2 without overflowing near usize::MAX.
        self.left + (self.right - self.left) / 2
    }

    /// Get children via midpoint split
    ///
    /// Returns: ([left, mid], [mid+1, right])
    /// The halves are contiguous and exactly partition `self`.
    pub fn children(&self) -> (Span, Span) {
        debug_assert!(!self.is_leaf(), "Leaf has no children");

        let mid = self.midpoint();
        let left_child = Span {
            left: self.left,
            right: mid,
        };
        let right_child = Span {
            left: mid + 1,
            right: self.right,
        };

        (left_child, right_child)
    }

    /// Whether `index` falls inside this span
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.left <= index && index <= self.right
    }

    /// Whether `[low, high]` is a non-inverted range inside this span
    #[inline]
    pub fn covers(&self, low: usize, high: usize) -> bool {
        low <= high && self.contains(low) && self.contains(high)
    }

    /// Whether this span is exactly `[low, high]`
    #[inline]
    pub fn matches(&self, low: usize, high: usize) -> bool {
        self.left == low && self.right == high
    }

    /// Depth from this span down to a leaf along the left spine
    ///
    /// Left halves are never shorter than right halves, so this is the
    /// maximum depth: ⌈log2(length)⌉.
    pub fn depth_to_leaf(&self) -> usize {
        let mut span = *self;
        let mut depth = 0;

        while !span.is_leaf() {
            let (left_child, _) = span.children();
            span = left_child;
            depth += 1;
        }

        depth
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_leaf() {
            write!(f, "[{}]", self.left)
        } else {
            write!(f, "[{}, {}]", self.left, self.right)
        }
    }
}
