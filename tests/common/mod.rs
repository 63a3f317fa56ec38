//! Shared helpers: a naive left-to-right fold used as the oracle.

#![allow(dead_code)]

use segtree::Combiner;

/// Fold `combiner` over `values[low..=high]` one element at a time.
pub fn fold<T: Clone, C: Combiner<T>>(values: &[T], low: usize, high: usize, combiner: &C) -> T {
    values[low + 1..=high]
        .iter()
        .fold(values[low].clone(), |acc, item| combiner.combine(&acc, item))
}

/// Every `(low, high)` pair with `low <= high < len`.
pub fn all_ranges(len: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..len).flat_map(move |low| (low..len).map(move |high| (low, high)))
}

/// Strings from single characters, handy for order-sensitive checks.
pub fn letters(chars: &str) -> Vec<String> {
    chars.chars().map(|c| c.to_string()).collect()
}
