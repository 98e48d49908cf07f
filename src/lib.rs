//! BurrowDB - a teaching-grade storage engine.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           BurrowDB                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │              Index Layer (index/)                        │   │
//! │  │      Persistent copy-on-write Trie (versioned map)       │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │            Buffer Pool (buffer/)                         │   │
//! │  │   ┌─────────────────────────────────────────────────┐   │   │
//! │  │   │            Eviction Policy: LRU-K               │   │   │
//! │  │   └─────────────────────────────────────────────────┘   │   │
//! │  │   BufferPoolManager + Frame + Guards + Statistics        │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │           Storage Layer (storage/)                       │   │
//! │  │              DiskManager + Page                          │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (PageId, FrameId, Error, config)
//! - [`buffer`] - Buffer pool management and LRU-K eviction
//! - [`storage`] - Disk I/O and the page format
//! - [`index`] - The persistent trie index
//!
//! # Quick Start
//! ```no_run
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use burrowdb::{BufferPoolManager, DiskManager};
//!
//! let disk = Arc::new(Mutex::new(DiskManager::create("my_database.db").unwrap()));
//! let bpm = BufferPoolManager::new(10, disk, 2);
//!
//! // Allocate a page and write into it
//! let mut guard = bpm.new_page().unwrap();
//! guard.as_mut_slice()[0] = 0xAB;
//! ```

pub mod buffer;
pub mod common;
pub mod index;
pub mod storage;

// Re-export commonly used items at crate root for convenience
pub use common::config::PAGE_SIZE;
pub use common::{Error, FrameId, PageId, Result};

pub use buffer::replacer::LruKReplacer;
pub use buffer::{BufferPoolManager, BufferPoolStats, Frame, StatsSnapshot};
pub use index::Trie;
pub use storage::page::Page;
pub use storage::DiskManager;
