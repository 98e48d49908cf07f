//! Eviction policy implementations (replacers).
//!
//! Currently implements:
//! - [`LruKReplacer`] - LRU-K, distinguishing frames by whether they have
//!   been accessed at least `k` times

mod lru_k;

pub use lru_k::LruKReplacer;
