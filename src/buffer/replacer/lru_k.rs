//! LRU-K replacement policy (O'Neil et al.).
//!
//! Frames are classified by access history: a frame accessed fewer than `k`
//! times is "cold" and lives in the history list; once its use count reaches
//! `k` it is "hot" and moves to the cache list. Victims are taken from the
//! history list first (oldest insertion), then from the cache list in LRU
//! order.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::common::FrameId;

/// Per-instance state, guarded by the replacer's latch.
struct ReplacerInner {
    /// Cold frames (use count < k), most recent insertion at the front.
    history: VecDeque<FrameId>,

    /// Hot frames (use count >= k), most recently accessed at the front.
    cache: VecDeque<FrameId>,

    /// Accesses since last reset, indexed by frame id (slot 0 unused).
    use_count: Vec<usize>,

    /// Evictable flag per frame id (slot 0 unused).
    evictable: Vec<bool>,

    /// Number of frames currently marked evictable.
    curr_size: usize,
}

/// An LRU-K eviction policy over a fixed set of frames.
///
/// Valid frame ids run from 1 to `num_frames`; id 0 is reserved. A frame
/// with use count 0 is tracked by neither list. The per-frame invariant is
/// that a frame with `0 < use_count < k` sits in exactly one position of the
/// history list, and a frame with `use_count >= k` in exactly one position
/// of the cache list.
///
/// # Thread Safety
/// Every public operation takes an internal mutex for the duration of the
/// call. Operations never block on I/O.
///
/// # Panics
/// All operations panic on a frame id of 0 or greater than `num_frames`;
/// that is a programmer error, not a recoverable condition.
pub struct LruKReplacer {
    inner: Mutex<ReplacerInner>,
    num_frames: usize,
    k: usize,
}

impl LruKReplacer {
    /// Create a replacer tracking frames `1..=num_frames` with parameter `k`.
    ///
    /// # Panics
    /// Panics if `k` is 0.
    pub fn new(num_frames: usize, k: usize) -> Self {
        assert!(k > 0, "k must be at least 1");

        Self {
            inner: Mutex::new(ReplacerInner {
                history: VecDeque::new(),
                cache: VecDeque::new(),
                use_count: vec![0; num_frames + 1],
                evictable: vec![false; num_frames + 1],
                curr_size: 0,
            }),
            num_frames,
            k,
        }
    }

    /// Record an access to the given frame.
    ///
    /// The frame's use count is incremented. On the k-th access the frame is
    /// promoted from the history list to the front of the cache list; later
    /// accesses move it back to the front (LRU within the hot set). Cold
    /// re-accesses do not reorder the history list.
    pub fn record_access(&self, frame_id: FrameId) {
        self.check_frame_id(frame_id);
        let mut inner = self.inner.lock();

        inner.use_count[frame_id.0] += 1;
        let count = inner.use_count[frame_id.0];

        if count == self.k {
            // Promotion: leave the history list and enter the hot set.
            if let Some(pos) = inner.history.iter().position(|&f| f == frame_id) {
                inner.history.remove(pos);
            }
            inner.cache.push_front(frame_id);
        } else if count > self.k {
            // Already hot: move to front.
            if let Some(pos) = inner.cache.iter().position(|&f| f == frame_id) {
                inner.cache.remove(pos);
            }
            inner.cache.push_front(frame_id);
        } else if count == 1 {
            // First access since reset; counts above 1 mean the frame is
            // already in the history list.
            inner.history.push_front(frame_id);
        }
    }

    /// Set whether a frame may be chosen as an eviction victim.
    ///
    /// Frames with use count 0 (never accessed since last reset) are ignored.
    pub fn set_evictable(&self, frame_id: FrameId, evictable: bool) {
        self.check_frame_id(frame_id);
        let mut inner = self.inner.lock();

        if inner.use_count[frame_id.0] == 0 {
            return;
        }

        if evictable && !inner.evictable[frame_id.0] {
            inner.curr_size += 1;
        } else if !evictable && inner.evictable[frame_id.0] {
            inner.curr_size -= 1;
        }
        inner.evictable[frame_id.0] = evictable;
    }

    /// Choose and remove an eviction victim, or `None` if no frame is
    /// evictable.
    ///
    /// Cold frames go first, oldest insertion first; only when no cold frame
    /// is evictable is the cache list scanned, least recently used first.
    /// The victim's use count and evictable flag are reset.
    pub fn evict(&self) -> Option<FrameId> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let victim = match Self::take_victim(&mut inner.history, &inner.evictable) {
            Some(frame_id) => frame_id,
            None => Self::take_victim(&mut inner.cache, &inner.evictable)?,
        };

        inner.use_count[victim.0] = 0;
        inner.evictable[victim.0] = false;
        inner.curr_size -= 1;
        Some(victim)
    }

    /// Drop a frame from the replacer entirely.
    ///
    /// No-op unless the frame is currently evictable. Used when a page is
    /// deleted and its frame returns to the free list.
    pub fn remove(&self, frame_id: FrameId) {
        self.check_frame_id(frame_id);
        let mut inner = self.inner.lock();

        if !inner.evictable[frame_id.0] {
            return;
        }

        let list = if inner.use_count[frame_id.0] < self.k {
            &mut inner.history
        } else {
            &mut inner.cache
        };
        if let Some(pos) = list.iter().position(|&f| f == frame_id) {
            list.remove(pos);
        }

        inner.use_count[frame_id.0] = 0;
        inner.evictable[frame_id.0] = false;
        inner.curr_size -= 1;
    }

    /// Number of frames currently evictable.
    pub fn size(&self) -> usize {
        self.inner.lock().curr_size
    }

    /// Scan a list back-to-front (oldest first) for an evictable frame and
    /// remove it.
    fn take_victim(list: &mut VecDeque<FrameId>, evictable: &[bool]) -> Option<FrameId> {
        let pos = list.iter().rposition(|&f| evictable[f.0])?;
        list.remove(pos)
    }

    fn check_frame_id(&self, frame_id: FrameId) {
        if frame_id.0 == 0 || frame_id.0 > self.num_frames {
            panic!(
                "invalid frame id {} (replacer capacity {})",
                frame_id, self.num_frames
            );
        }
    }
}
