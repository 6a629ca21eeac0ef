//! # lrusim
//!
//! Fixed-capacity LRU cache of keys.
//!
//! ## Architecture
//! - **HashMap**: AHash index from key to list handle (O(1))
//! - **Recency list**: arena-backed doubly-linked list, LRU at the front (O(1))
//! - **Stats**: hit/miss/eviction counters since the last reset
//!
//! ## Policy
//! - `write` promotes on a hit, inserts (evicting the LRU key if full) on a miss
//! - `read` promotes on a hit and never inserts
//!
//! ```
//! use lrusim::{Access, LruCache};
//!
//! let mut cache = LruCache::new(2).unwrap();
//! assert_eq!(cache.write("a"), Access::Miss);
//! assert_eq!(cache.write("b"), Access::Miss);
//! assert_eq!(cache.write("a"), Access::Hit);
//! assert_eq!(cache.write("c"), Access::Miss); // evicts "b"
//! assert_eq!(cache.contents().copied().collect::<Vec<_>>(), ["a", "c"]);
//! ```

#![warn(missing_docs)]

mod cache;
mod error;
pub mod recency;
mod stats;

pub use cache::{Access, LruCache};
pub use error::{Error, InvariantError, Result};
pub use recency::{Handle, RecencyList};
pub use stats::CacheStats;
