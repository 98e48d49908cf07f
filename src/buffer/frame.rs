//! Frame - a slot in the buffer pool.
//!
//! A [`Frame`] couples one page buffer with the bookkeeping the pool keeps
//! per slot: which page is resident, how many pins are outstanding, and
//! whether the bytes have diverged from disk.
//!
//! Note what a frame does *not* know: whether it is evictable. The replacer
//! is the single authority on eviction candidates; the pool feeds it as pin
//! counts rise and fall. Keeping no evictable flag here means there is no
//! second copy of that state to fall out of sync.

use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::common::PageId;
use crate::storage::page::Page;

/// A slot in the buffer pool, holding at most one page.
///
/// # Locking
/// Every metadata *transition* (load, pin, unpin, reset) happens while the
/// pool holds its state mutex, which is what actually serializes them. The
/// fields are still atomics - not for ordering, but so that pin-count
/// queries, statistics, and dropping guards can *read* metadata without
/// queueing on that mutex. The resident id is stored as its raw `i32` with
/// `PageId::INVALID` standing in for "empty", so no lock is needed around
/// an `Option`.
///
/// The page bytes live under their own reader/writer latch: a guard keeps
/// that latch (and a pin) across pool calls, long after the state mutex has
/// been released.
pub struct Frame {
    /// The page bytes, under their own latch so guard holders outlive pool
    /// calls.
    page: RwLock<Page>,

    /// Raw id of the resident page; `PageId::INVALID` while empty.
    page_id: AtomicI32,

    /// Outstanding pins. Non-zero keeps this frame off the replacer's
    /// victim lists.
    pin_count: AtomicU32,

    /// Set when the in-memory bytes may differ from disk; cleared by
    /// write-back.
    dirty: AtomicBool,
}

impl Frame {
    /// Create an empty frame.
    pub fn new() -> Self {
        Self {
            page: RwLock::new(Page::new()),
            page_id: AtomicI32::new(PageId::INVALID.0),
            pin_count: AtomicU32::new(0),
            dirty: AtomicBool::new(false),
        }
    }

    // ========================================================================
    // Page bytes
    // ========================================================================

    /// Latch the page bytes for reading.
    #[inline]
    pub fn page(&self) -> RwLockReadGuard<'_, Page> {
        self.page.read()
    }

    /// Latch the page bytes for writing.
    #[inline]
    pub fn page_mut(&self) -> RwLockWriteGuard<'_, Page> {
        self.page.write()
    }

    // ========================================================================
    // Resident page id (sentinel-encoded)
    // ========================================================================

    /// Id of the resident page, or `None` for an empty frame.
    #[inline]
    pub fn page_id(&self) -> Option<PageId> {
        let id = PageId::new(self.page_id.load(Ordering::Relaxed));
        id.is_valid().then_some(id)
    }

    /// Record which page now lives in this frame.
    #[inline]
    pub fn set_page_id(&self, page_id: PageId) {
        debug_assert!(page_id.is_valid(), "use clear_page_id to empty a frame");
        self.page_id.store(page_id.0, Ordering::Relaxed);
    }

    /// Mark the frame as holding no page.
    #[inline]
    pub fn clear_page_id(&self) {
        self.page_id.store(PageId::INVALID.0, Ordering::Relaxed);
    }

    // ========================================================================
    // Pinning
    // ========================================================================

    /// Take one pin. Returns the new pin count.
    #[inline]
    pub fn pin(&self) -> u32 {
        self.pin_count.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Release one pin. Returns the new pin count.
    ///
    /// # Panics
    /// Panics on underflow: an unpin without a matching pin is a bug in the
    /// caller, not a recoverable state.
    #[inline]
    pub fn unpin(&self) -> u32 {
        let old = self.pin_count.fetch_sub(1, Ordering::Relaxed);
        assert!(old > 0, "pin count underflow");
        old - 1
    }

    /// Current number of pins.
    #[inline]
    pub fn pin_count(&self) -> u32 {
        self.pin_count.load(Ordering::Relaxed)
    }

    /// Whether any pins are outstanding.
    #[inline]
    pub fn is_pinned(&self) -> bool {
        self.pin_count() > 0
    }

    // ========================================================================
    // Dirty tracking
    // ========================================================================

    /// Note that the in-memory bytes may differ from disk.
    #[inline]
    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Relaxed);
    }

    /// Note that the bytes have been written back.
    #[inline]
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::Relaxed);
    }

    /// Whether the frame needs a write-back before its page can be dropped.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Relaxed)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Wipe the frame back to its initial state: zeroed bytes, no resident
    /// page, no pins, clean. Used when a page is deleted.
    pub fn reset(&self) {
        self.page_mut().reset();
        self.clear_page_id();
        self.pin_count.store(0, Ordering::Relaxed);
        self.dirty.store(false, Ordering::Relaxed);
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}
