//! # duomap
//!
//! Reference associative containers for Rust: one uniform map contract,
//! realized by two interchangeable backends.
//!
//! ## Overview
//!
//! This library provides two standalone implementations of the map
//! abstraction, both satisfying the same [`map::Map`] contract:
//!
//! - **[`map::OrderedTreeMap`]**: an unbalanced binary search tree keyed by a
//!   total order (`Ord`)
//! - **[`map::BucketHashMap`]**: a chaining hash table keyed by a hash
//!   function (`Hash + Eq`), with pluggable bucket storage and dynamic growth
//!
//! Neither backend depends on the other; callers that program against the
//! [`map::Map`] trait can swap one for the other without changes.
//!
//! ## Feature Flags
//!
//! - `smallvec`: inline bucket storage ([`map::InlineBucket`]) for short
//!   collision chains (enabled by default)
//! - `fxhash`: use `rustc-hash` as the crate-default hash builder
//! - `ahash`: use `ahash` as the crate-default hash builder
//! - `serde`: serialization support for both map backends
//!
//! ## Example
//!
//! ```rust
//! use duomap::prelude::*;
//!
//! fn count_words(map: &mut dyn Map<String, usize>, words: &[&str]) {
//!     for word in words {
//!         let seen = map.get(&(*word).to_string()).copied().unwrap_or(0);
//!         map.insert((*word).to_string(), seen + 1);
//!     }
//! }
//!
//! let mut tree: OrderedTreeMap<String, usize> = OrderedTreeMap::new();
//! let mut hash: BucketHashMap<String, usize> = BucketHashMap::new();
//!
//! count_words(&mut tree, &["to", "be", "or", "not", "to", "be"]);
//! count_words(&mut hash, &["to", "be", "or", "not", "to", "be"]);
//!
//! assert_eq!(tree.get("to"), Some(&2));
//! assert_eq!(hash.get("to"), Some(&2));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use duomap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::map::*;
}

pub mod map;
