//! Materialized segment tree node
//!
//! Node = (span, aggregate)
//! Internal nodes own both halves of their midpoint split through a single
//! `Option<Box<Children>>`, so a node has two children or none.

use super::Span;
use crate::algebra::Combiner;

/// Both halves of an internal node
#[derive(Debug, Clone)]
pub(crate) struct Children<T> {
    pub(crate) left: Node<T>,
    pub(crate) right: Node<T>,
}

/// Segment tree node
#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    /// Combiner folded over every leaf in `span`, left to right
    pub(crate) value: T,

    /// Covered leaf indices, fixed at construction
    pub(crate) span: Span,

    /// `None` iff `span.is_leaf()`
    pub(crate) children: Option<Box<Children<T>>>,
}

impl<T: Clone> Node<T> {
    /// Build the subtree covering `span` over `values`
    ///
    /// Work: O(length) nodes, each combined once.
    pub(crate) fn build<F: Combiner<T>>(values: &[T], span: Span, combiner: &F) -> Self {
        if span.is_leaf() {
            return Self {
                value: values[span.left].clone(),
                span,
                children: None,
            };
        }

        let (left_span, right_span) = span.children();
        let left = Node::build(values, left_span, combiner);
        let right = Node::build(values, right_span, combiner);
        let value = combiner.combine(&left.value, &right.value);

        Self {
            value,
            span,
            children: Some(Box::new(Children { left, right })),
        }
    }

    /// Fold over `[low, high]`
    ///
    /// Caller guarantees `self.span.covers(low, high)`.
    pub(crate) fn query<F: Combiner<T>>(&self, low: usize, high: usize, combiner: &F) -> T {
        // Exact-range match: reuse the precomputed aggregate.
        if self.span.matches(low, high) {
            return self.value.clone();
        }

        let children = self.split_children(low, high);
        let (left, right) = (&children.left, &children.right);

        if left.span.right < low {
            right.query(low, high, combiner)
        } else if right.span.left > high {
            left.query(low, high, combiner)
        } else {
            let left_result = left.query(low, left.span.right, combiner);
            let right_result = right.query(right.span.left, high, combiner);
            combiner.combine(&left_result, &right_result)
        }
    }

    /// Set the leaf at `index` and recompute every ancestor on unwind
    ///
    /// Caller guarantees `self.span.contains(index)`.
    pub(crate) fn replace<F: Combiner<T>>(&mut self, index: usize, item: T, combiner: &F) {
        match self.children.as_deref_mut() {
            None => {
                debug_assert_eq!(self.span.left, index, "descended to the wrong leaf");
                self.value = item;
            }
            Some(children) => {
                if children.left.span.right >= index {
                    children.left.replace(index, item, combiner);
                } else {
                    children.right.replace(index, item, combiner);
                }
                self.value = combiner.combine(&children.left.value, &children.right.value);
            }
        }
    }
}

impl<T> Node<T> {
    /// Children of a node the query must split
    ///
    /// # Panics
    /// Panics if this is a leaf: a leaf only ever receives its own exact
    /// range, so reaching here means the range was not validated upstream.
    fn split_children(&self, low: usize, high: usize) -> &Children<T> {
        match self.children.as_deref() {
            Some(children) => children,
            None => panic!(
                "leaf {} reached while splitting query [{}, {}]",
                self.span, low, high
            ),
        }
    }

    /// Leaf holding `index`, without combining anything
    pub(crate) fn leaf(&self, index: usize) -> &T {
        let mut node = self;
        while let Some(children) = node.children.as_deref() {
            node = if children.left.span.right >= index {
                &children.left
            } else {
                &children.right
            };
        }
        &node.value
    }

    /// Append leaf values in index order
    pub(crate) fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a T>) {
        match self.children.as_deref() {
            None => out.push(&self.value),
            Some(children) => {
                children.left.collect_leaves(out);
                children.right.collect_leaves(out);
            }
        }
    }

    /// Assert the partition invariant on this node and its direct children
    ///
    /// # Panics
    /// Panics if the children are missing/present against the span, or do
    /// not exactly and contiguously partition it.
    pub(crate) fn assert_partition(&self) {
        match self.children.as_deref() {
            None => assert!(
                self.span.is_leaf(),
                "internal span {} has no children",
                self.span
            ),
            Some(children) => {
                let (left, right) = (children.left.span, children.right.span);
                assert!(!self.span.is_leaf(), "leaf span {} has children", self.span);
                assert!(
                    left.left == self.span.left
                        && right.right == self.span.right
                        && left.right + 1 == right.left,
                    "children {} and {} do not partition {}",
                    left,
                    right,
                    self.span
                );
            }
        }
    }

    /// Assert the partition invariant on the whole subtree
    pub(crate) fn assert_partition_recursive(&self) {
        self.assert_partition();
        if let Some(children) = self.children.as_deref() {
            children.left.assert_partition_recursive();
            children.right.assert_partition_recursive();
        }
    }

    /// Assert the partition invariant along the root-to-leaf path of `index`
    pub(crate) fn assert_partition_path(&self, index: usize) {
        let mut node = self;
        loop {
            node.assert_partition();
            match node.children.as_deref() {
                None => break,
                Some(children) => {
                    node = if children.left.span.right >= index {
                        &children.left
                    } else {
                        &children.right
                    };
                }
            }
        }
    }

    /// Visit every span in pre-order
    pub(crate) fn for_each_span(&self, visit: &mut impl FnMut(Span)) {
        visit(self.span);
        if let Some(children) = self.children.as_deref() {
            children.left.for_each_span(visit);
            children.right.for_each_span(visit);
        }
    }
}

impl<T: Clone + PartialEq> Node<T> {
    /// Whether every internal aggregate equals the combine of its children
    pub(crate) fn is_consistent<F: Combiner<T>>(&self, combiner: &F) -> bool {
        match self.children.as_deref() {
            None => true,
            Some(children) => {
                children.left.is_consistent(combiner)
                    && children.right.is_consistent(combiner)
                    && combiner.combine(&children.left.value, &children.right.value)
                        == self.value
            }
        }
    }
}
