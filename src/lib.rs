//! # Generic Segment Tree
//!
//! Static, array-backed range aggregation over any associative combiner.
//!
//! ## Core Algorithm
//!
//! 1. **Midpoint partition**: [0, n-1] split at m = ⌊(l + r) / 2⌋ down to single leaves
//! 2. **Stored aggregates**: every node keeps combine(left, right) of its children
//! 3. **Exact-range reuse**: a query that lines up with a node returns its aggregate directly
//! 4. **Path recompute**: replacing a leaf recombines only its O(log n) ancestors
//!
//! Result: build O(n), query O(log n), replace O(log n)
//!
//! ## Usage Example
//!
//! ```
//! use segtree::{SegmentTree, algebra::Gcd};
//!
//! let mut tree = SegmentTree::new(vec![2u64, 4, 6, 3, 5], Gcd)?;
//! assert_eq!(tree.query(0, 1)?, 2);
//! assert_eq!(tree.query(1, 3)?, 1);
//!
//! tree.replace(3, 10)?;
//! assert_eq!(tree.query(3, 4)?, 5);
//! # Ok::<(), segtree::SegmentTreeError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod algebra;  // Combiner trait and stock operations
pub mod rotation; // Single/double BST rotations for external balancers
pub mod tree;     // Segment tree and spans

// Re-exports for convenience
pub use algebra::Combiner;
pub use tree::{SegmentTree, Span};

use thiserror::Error;

/// Construction-time options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeConfig {
    /// Assert the partition invariant after construction and along every
    /// replaced path. Violations panic: they are defects, not input errors.
    pub check_invariants: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            check_invariants: cfg!(debug_assertions),
        }
    }
}

impl TreeConfig {
    /// Enable or disable invariant assertions.
    pub fn with_invariant_checks(mut self, enabled: bool) -> Self {
        self.check_invariants = enabled;
        self
    }
}

/// Errors reported by segment tree operations
///
/// All of these are detected before any node is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SegmentTreeError {
    /// Construction called with no values
    #[error("cannot build a segment tree over an empty sequence")]
    EmptyInput,

    /// Requested range is inverted or reaches past the last index
    #[error("range [{low}, {high}] out of bounds for length {len}")]
    IndexOutOfRange {
        /// Lower bound requested (the index itself for replacements)
        low: usize,
        /// Upper bound requested (the index itself for replacements)
        high: usize,
        /// Number of leaves in the tree
        len: usize,
    },
}
