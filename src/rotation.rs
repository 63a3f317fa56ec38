//! Binary search tree rotations
//!
//! Four constant-time link rearrangements for an external AVL-style balancer:
//!
//! | Function                        | Imbalance case     |
//! |---------------------------------|--------------------|
//! | `rotate_with_left_child`        | left-left (1)      |
//! | `double_rotate_with_left_child` | left-right (2)     |
//! | `double_rotate_with_right_child`| right-left (3)     |
//! | `rotate_with_right_child`       | right-right (4)    |
//!
//! Each takes the owning slot of a subtree root and leaves the new subtree
//! root in that same slot. Choosing the case and tracking heights is up to
//! the caller. Required children are checked before any link moves, so an
//! error leaves the subtree untouched.

use std::fmt;
use std::mem;

use thiserror::Error;

/// Child position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Left child
    Left,
    /// Right child
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// Rotation preconditions not met
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationError {
    /// The pivot child needed by the rotation is absent
    #[error("rotation requires a {0} child")]
    MissingChild(Side),
}

/// Owned binary tree link
pub type Link<T> = Option<Box<BinaryNode<T>>>;

/// Binary tree node with mutable child links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryNode<T> {
    /// Stored element
    pub element: T,
    /// Left subtree
    pub left: Link<T>,
    /// Right subtree
    pub right: Link<T>,
}

impl<T> BinaryNode<T> {
    /// Boxed node without children
    pub fn leaf(element: T) -> Box<Self> {
        Box::new(Self {
            element,
            left: None,
            right: None,
        })
    }

    /// Boxed node with the given subtrees
    pub fn with_children(element: T, left: Link<T>, right: Link<T>) -> Box<Self> {
        Box::new(Self {
            element,
            left,
            right,
        })
    }

    /// Height in edges; a lone node has height 0
    pub fn height(&self) -> usize {
        let left = self.left.as_ref().map_or(0, |n| n.height() + 1);
        let right = self.right.as_ref().map_or(0, |n| n.height() + 1);
        left.max(right)
    }

    /// Elements in in-order sequence (unchanged by every rotation)
    pub fn in_order(&self) -> Vec<&T> {
        let mut out = Vec::new();
        self.collect_in_order(&mut out);
        out
    }

    fn collect_in_order<'a>(&'a self, out: &mut Vec<&'a T>) {
        if let Some(left) = &self.left {
            left.collect_in_order(out);
        }
        out.push(&self.element);
        if let Some(right) = &self.right {
            right.collect_in_order(out);
        }
    }
}

/// Single rotation with the left child (case 1)
///
/// ```text
///       k2            k1
///      /  \          /  \
///     k1   C   =>   A    k2
///    /  \               /  \
///   A    B             B    C
/// ```
pub fn rotate_with_left_child<T>(k2: &mut Box<BinaryNode<T>>) -> Result<(), RotationError> {
    let mut k1 = k2.left.take().ok_or(RotationError::MissingChild(Side::Left))?;
    k2.left = k1.right.take();
    // Slot now holds k1; `k1` holds the old root.
    mem::swap(k2, &mut k1);
    k2.right = Some(k1);
    Ok(())
}

/// Single rotation with the right child (case 4)
///
/// ```text
///     k1                k2
///    /  \              /  \
///   A    k2    =>    k1    C
///       /  \        /  \
///      B    C      A    B
/// ```
pub fn rotate_with_right_child<T>(k1: &mut Box<BinaryNode<T>>) -> Result<(), RotationError> {
    let mut k2 = k1.right.take().ok_or(RotationError::MissingChild(Side::Right))?;
    k1.right = k2.left.take();
    mem::swap(k1, &mut k2);
    k1.left = Some(k2);
    Ok(())
}

/// Double rotation: left child with its right child, then the root with
/// its new left child (case 2)
pub fn double_rotate_with_left_child<T>(
    k3: &mut Box<BinaryNode<T>>,
) -> Result<(), RotationError> {
    let left = k3.left.as_mut().ok_or(RotationError::MissingChild(Side::Left))?;
    rotate_with_right_child(left)?;
    rotate_with_left_child(k3)
}

/// Double rotation: right child with its left child, then the root with
/// its new right child (case 3)
pub fn double_rotate_with_right_child<T>(
    k1: &mut Box<BinaryNode<T>>,
) -> Result<(), RotationError> {
    let right = k1.right.as_mut().ok_or(RotationError::MissingChild(Side::Right))?;
    rotate_with_left_child(right)?;
    rotate_with_right_child(k1)
}
