//! Associative combiners for range aggregation
//!
//! combine(combine(a, b), c) == combine(a, combine(b, c))
//! Commutativity is NOT required: the left argument always covers the
//! lower indices.

use std::ops::{Add, Mul};

/// Associative binary operation folded over a range
///
/// Implemented for every `Fn(&T, &T) -> T`, so closures and fn items can be
/// passed straight to [`SegmentTree::new`](crate::SegmentTree::new).
/// Associativity is trusted, not checked. A combiner that is not
/// associative, or whose output depends on hidden mutable state, yields
/// aggregates that depend on the tree's split points.
pub trait Combiner<T> {
    /// Combine the aggregate of a left range with that of the adjacent right range.
    fn combine(&self, left: &T, right: &T) -> T;
}

impl<T, F> Combiner<T> for F
where
    F: Fn(&T, &T) -> T,
{
    #[inline]
    fn combine(&self, left: &T, right: &T) -> T {
        self(left, right)
    }
}

/// Addition (`a + b`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sum;

impl<T> Combiner<T> for Sum
where
    T: Add<Output = T> + Clone,
{
    #[inline]
    fn combine(&self, left: &T, right: &T) -> T {
        left.clone() + right.clone()
    }
}

/// Multiplication (`a * b`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Product;

impl<T> Combiner<T> for Product
where
    T: Mul<Output = T> + Clone,
{
    #[inline]
    fn combine(&self, left: &T, right: &T) -> T {
        left.clone() * right.clone()
    }
}

/// Minimum. Ties keep the left value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Min;

impl<T> Combiner<T> for Min
where
    T: Ord + Clone,
{
    #[inline]
    fn combine(&self, left: &T, right: &T) -> T {
        if right < left {
            right.clone()
        } else {
            left.clone()
        }
    }
}

/// Maximum. Ties keep the left value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Max;

impl<T> Combiner<T> for Max
where
    T: Ord + Clone,
{
    #[inline]
    fn combine(&self, left: &T, right: &T) -> T {
        if right > left {
            right.clone()
        } else {
            left.clone()
        }
    }
}

/// Greatest common divisor (Euclid). `gcd(0, x) == |x|`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gcd;

macro_rules! impl_gcd_unsigned {
    ($($t:ty),*) => {$(
        impl Combiner<$t> for Gcd {
            fn combine(&self, left: &$t, right: &$t) -> $t {
                let (mut a, mut b) = (*left, *right);
                while b != 0 {
                    let r = a % b;
                    a = b;
                    b = r;
                }
                a
            }
        }
    )*};
}

macro_rules! impl_gcd_signed {
    ($($t:ty => $u:ty),*) => {$(
        impl Combiner<$t> for Gcd {
            /// Computed on magnitudes. Non-negative whenever it fits:
            /// `gcd(MIN, MIN)` and `gcd(MIN, 0)` equal `|MIN|` and wrap to `MIN`.
            fn combine(&self, left: &$t, right: &$t) -> $t {
                let magnitude = <Gcd as Combiner<$u>>::combine(
                    self,
                    &left.unsigned_abs(),
                    &right.unsigned_abs(),
                );
                magnitude as $t
            }
        }
    )*};
}

impl_gcd_unsigned!(u8, u16, u32, u64, u128, usize);
impl_gcd_signed!(i8 => u8, i16 => u16, i32 => u32, i64 => u64, i128 => u128, isize => usize);

/// Concatenation, the canonical non-commutative combiner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Concat;

impl Combiner<String> for Concat {
    fn combine(&self, left: &String, right: &String) -> String {
        let mut joined = String::with_capacity(left.len() + right.len());
        joined.push_str(left);
        joined.push_str(right);
        joined
    }
}

impl<U: Clone> Combiner<Vec<U>> for Concat {
    fn combine(&self, left: &Vec<U>, right: &Vec<U>) -> Vec<U> {
        let mut joined = Vec::with_capacity(left.len() + right.len());
        joined.extend_from_slice(left);
        joined.extend_from_slice(right);
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_combiner() {
        let max = |a: &i32, b: &i32| *a.max(b);
        assert_eq!(max.combine(&3, &7), 7);
    }

    #[test]
    fn test_gcd_matches_euclid() {
        assert_eq!(Gcd.combine(&2u64, &4u64), 2);
        assert_eq!(Gcd.combine(&6u64, &3u64), 3);
        assert_eq!(Gcd.combine(&4u64, &5u64), 1);
        assert_eq!(Gcd.combine(&0u64, &9u64), 9);
        assert_eq!(Gcd.combine(&9u64, &0u64), 9);
    }

    #[test]
    fn test_gcd_signed_is_non_negative() {
        assert_eq!(Gcd.combine(&-12i64, &18i64), 6);
        assert_eq!(Gcd.combine(&-12i64, &-8i64), 4);
        assert_eq!(Gcd.combine(&i64::MIN, &6i64), 2);
    }

    #[test]
    fn test_gcd_of_min_wraps() {
        assert_eq!(Gcd.combine(&i64::MIN, &0i64), i64::MIN);
        assert_eq!(Gcd.combine(&i8::MIN, &i8::MIN), i8::MIN);
    }

    #[test]
    fn test_concat_preserves_order() {
        let joined = Concat.combine(&"ab".to_string(), &"cd".to_string());
        assert_eq!(joined, "abcd");
        assert_eq!(Concat.combine(&vec![1, 2], &vec![3]), vec![1, 2, 3]);
    }

    #[test]
    fn test_min_max() {
        assert_eq!(Min.combine(&2i32, &1i32), 1);
        assert_eq!(Max.combine(&2i32, &5i32), 5);
        assert_eq!(Max.combine(&3i32, &3i32), 3);
        assert_eq!(Min.combine(&"b", &"a"), "a");
    }

    #[test]
    fn test_sum_and_product() {
        assert_eq!(Sum.combine(&2i64, &3i64), 5);
        assert_eq!(Product.combine(&2i64, &3i64), 6);
        assert_eq!(Sum.combine(&1.5f64, &2.0f64), 3.5);
    }
}
