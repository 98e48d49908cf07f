//! Buffer pool statistics tracking.
//!
//! The pool records events through the crate-private `record_*` methods;
//! external code observes a coherent [`StatsSnapshot`]. Disk writes are
//! counted by cause - write-backs of dirty eviction victims separately from
//! explicit flushes - because "was the victim written?" is the question the
//! eviction path has to answer correctly.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Event counters kept by the buffer pool.
///
/// Counters are updated while the pool holds its state mutex, but they are
/// plain atomics so that samplers never have to queue on that mutex. All
/// counters increase monotonically between [`reset`](Self::reset) calls;
/// `Relaxed` ordering is enough since no reader infers cross-counter
/// ordering from them.
///
/// # Example
/// ```
/// use burrowdb::BufferPoolStats;
///
/// let stats = BufferPoolStats::new();
/// let snap = stats.snapshot();
/// assert_eq!(snap.lookups(), 0);
/// assert_eq!(snap.hit_rate(), 0.0);
/// ```
#[derive(Debug, Default)]
pub struct BufferPoolStats {
    /// Lookups answered from a resident frame.
    hits: AtomicU64,

    /// Lookups that had to go to disk.
    misses: AtomicU64,

    /// Victims taken from the replacer.
    evictions: AtomicU64,

    /// Pages read from disk into a frame.
    reads: AtomicU64,

    /// Dirty victims written out during eviction.
    write_backs: AtomicU64,

    /// Pages written by an explicit flush or delete.
    flushes: AtomicU64,
}

impl BufferPoolStats {
    /// Create a stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_write_back(&self) {
        self.write_backs.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_flush(&self) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
    }

    /// Sample every counter into a plain, copyable snapshot.
    ///
    /// Counters are loaded one by one, so a snapshot taken while the pool
    /// is running is approximate across fields; each field on its own is
    /// exact.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            reads: self.reads.load(Ordering::Relaxed),
            write_backs: self.write_backs.load(Ordering::Relaxed),
            flushes: self.flushes.load(Ordering::Relaxed),
        }
    }

    /// Zero every counter.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
        self.reads.store(0, Ordering::Relaxed);
        self.write_backs.store(0, Ordering::Relaxed);
        self.flushes.store(0, Ordering::Relaxed);
    }
}

/// A point-in-time copy of the pool's counters, with derived metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub reads: u64,
    pub write_backs: u64,
    pub flushes: u64,
}

impl StatsSnapshot {
    /// Total page lookups (hits + misses).
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of lookups served without disk I/O, 0.0 when idle.
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.lookups();
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }

    /// Total pages written to disk, regardless of cause.
    pub fn disk_writes(&self) -> u64 {
        self.write_backs + self.flushes
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lookups {}/{} ({:.2}% hit), evictions {}, reads {}, writes {} ({} write-back, {} flush)",
            self.hits,
            self.lookups(),
            self.hit_rate() * 100.0,
            self.evictions,
            self.reads,
            self.disk_writes(),
            self.write_backs,
            self.flushes,
        )
    }
}
