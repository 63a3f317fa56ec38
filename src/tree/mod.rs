//! Materialized segment tree
//!
//! Built once by midpoint recursion over [0, n-1]:
//! - Height ⌈log2 n⌉, 2n - 1 nodes
//! - Query: O(log n) nodes visited, exact-range matches reuse stored aggregates
//! - Replace: O(log n), only the root-to-leaf path is recomputed
//!
//! Split points never change after construction; only leaf values do.
//!
//! # Concurrency
//!
//! `replace` takes `&mut self`, so the borrow checker rules out a query
//! observing a half-updated path within one thread. Sharing a tree across
//! threads that mutate it needs external synchronization (e.g. an `RwLock`
//! with a single writer); the tree carries none of its own.

mod node;
mod span;

pub use span::Span;

use std::fmt;
use std::ops::{Bound, RangeBounds};

use tracing::{debug, trace};

use crate::algebra::Combiner;
use crate::{SegmentTreeError, TreeConfig};
use node::Node;

/// Segment tree over a fixed-length sequence
///
/// The combiner is stored once at tree level and threaded through every
/// recursive call.
pub struct SegmentTree<T, F> {
    root: Node<T>,
    combiner: F,
    len: usize,
    config: TreeConfig,
}

impl<T, F> SegmentTree<T, F>
where
    T: Clone,
    F: Combiner<T>,
{
    /// Build a tree over `values` with the default [`TreeConfig`]
    ///
    /// Fails with [`SegmentTreeError::EmptyInput`] if `values` is empty.
    ///
    /// ```
    /// use segtree::{SegmentTree, algebra::Sum};
    ///
    /// let tree = SegmentTree::new(vec![1i64, 2, 3, 4], Sum).unwrap();
    /// assert_eq!(tree.query(1, 2).unwrap(), 5);
    /// ```
    pub fn new(values: Vec<T>, combiner: F) -> Result<Self, SegmentTreeError> {
        Self::with_config(values, combiner, TreeConfig::default())
    }

    /// Build a tree with explicit configuration
    pub fn with_config(
        values: Vec<T>,
        combiner: F,
        config: TreeConfig,
    ) -> Result<Self, SegmentTreeError> {
        if values.is_empty() {
            return Err(SegmentTreeError::EmptyInput);
        }

        let len = values.len();
        let root = Node::build(&values, Span::root(0, len - 1), &combiner);

        if config.check_invariants {
            root.assert_partition_recursive();
        }

        let tree = Self {
            root,
            combiner,
            len,
            config,
        };
        debug!(len, height = tree.height(), "built segment tree");
        Ok(tree)
    }

    /// Combiner folded left to right over `values[low..=high]`
    ///
    /// Fails with [`SegmentTreeError::IndexOutOfRange`] unless
    /// `low <= high < len`.
    pub fn query(&self, low: usize, high: usize) -> Result<T, SegmentTreeError> {
        self.check_range(low, high)?;
        trace!(low, high, "segment tree query");
        Ok(self.root.query(low, high, &self.combiner))
    }

    /// [`query`](Self::query) over a Rust range (`2..5`, `..=3`, `..`)
    ///
    /// Empty ranges have no aggregate and are reported as out of range.
    pub fn query_range<R: RangeBounds<usize>>(&self, range: R) -> Result<T, SegmentTreeError> {
        let out_of_range = |low: usize, high: usize| SegmentTreeError::IndexOutOfRange {
            low,
            high,
            len: self.len,
        };

        let low = match range.start_bound() {
            Bound::Included(&low) => low,
            Bound::Excluded(&low) => low.checked_add(1).ok_or_else(|| out_of_range(low, low))?,
            Bound::Unbounded => 0,
        };
        let high = match range.end_bound() {
            Bound::Included(&high) => high,
            Bound::Excluded(&end) => end.checked_sub(1).ok_or_else(|| out_of_range(low, end))?,
            Bound::Unbounded => self.len - 1,
        };

        self.query(low, high)
    }

    /// Replace the value at `index` and recompute its ancestors
    ///
    /// Fails with [`SegmentTreeError::IndexOutOfRange`] unless `index < len`;
    /// nothing is mutated on failure.
    pub fn replace(&mut self, index: usize, item: T) -> Result<(), SegmentTreeError> {
        self.check_range(index, index)?;
        debug!(index, "segment tree replace");
        self.root.replace(index, item, &self.combiner);

        if self.config.check_invariants {
            self.root.assert_partition_path(index);
        }
        Ok(())
    }

    fn check_range(&self, low: usize, high: usize) -> Result<(), SegmentTreeError> {
        if self.root.span.covers(low, high) {
            Ok(())
        } else {
            Err(SegmentTreeError::IndexOutOfRange {
                low,
                high,
                len: self.len,
            })
        }
    }
}

impl<T, F> SegmentTree<T, F> {
    /// Number of leaves
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: construction rejects empty input
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Depth of the deepest leaf: ⌈log2 n⌉
    pub fn height(&self) -> usize {
        self.root.span.depth_to_leaf()
    }

    /// Span of the root, `[0, len - 1]`
    pub fn span(&self) -> Span {
        self.root.span
    }

    /// Aggregate over the whole sequence
    pub fn total(&self) -> &T {
        &self.root.value
    }

    /// Current value at `index`, read from its leaf without combining
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len {
            Some(self.root.leaf(index))
        } else {
            None
        }
    }

    /// Current leaf values in index order
    pub fn leaves(&self) -> Vec<&T> {
        let mut out = Vec::with_capacity(self.len);
        self.root.collect_leaves(&mut out);
        out
    }

    /// Spans of every node in pre-order (root first, left before right)
    pub fn spans(&self) -> Vec<Span> {
        let mut out = Vec::with_capacity(2 * self.len - 1);
        self.root.for_each_span(&mut |span| out.push(span));
        out
    }

    /// The combiner this tree was built with
    pub fn combiner(&self) -> &F {
        &self.combiner
    }

    /// Configuration this tree was built with
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }
}

impl<T, F> SegmentTree<T, F>
where
    T: Clone + PartialEq,
    F: Combiner<T>,
{
    /// Whether every internal aggregate equals the combine of its children
    pub fn is_consistent(&self) -> bool {
        self.root.is_consistent(&self.combiner)
    }
}

impl<T: fmt::Debug, F> fmt::Debug for SegmentTree<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentTree")
            .field("len", &self.len)
            .field("height", &self.height())
            .field("total", &self.root.value)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
