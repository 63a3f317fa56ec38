//! Combining operations for segment tree aggregation
//!
//! A combiner is any associative `(T, T) -> T`:
//! - Closures / fn items via the blanket [`Combiner`] impl
//! - Named operations: [`Sum`], [`Product`], [`Min`], [`Max`], [`Gcd`], [`Concat`]

mod combiner;

pub use combiner::{Combiner, Concat, Gcd, Max, Min, Product, Sum};
