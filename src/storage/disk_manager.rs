//! Disk Manager - low-level file I/O for database pages.
//!
//! The [`DiskManager`] is a plain block sink: it reads and writes fixed-size
//! pages at offsets derived from their page id. Page ids are allocated by
//! the buffer pool, not here.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::debug;

use crate::common::config::PAGE_SIZE;
use crate::common::{Error, PageId, Result};

/// Manages disk I/O for a single database file.
///
/// # File Layout
/// The database is stored as a single file with pages laid out sequentially:
/// ```text
/// ┌─────────┬─────────┬─────────┬─────────┬─────────┐
/// │ Page 0  │ Page 1  │ Page 2  │  ...    │ Page N  │
/// │ (4KB)   │ (4KB)   │ (4KB)   │         │ (4KB)   │
/// └─────────┴─────────┴─────────┴─────────┴─────────┘
/// Offset:  0      4096     8192    ...    N×4096
/// ```
///
/// Page N is located at file offset `N × PAGE_SIZE`.
///
/// Reading a page that was never written yields an all-zero buffer; the file
/// is extended on demand when a page past the current end is written.
///
/// # Thread Safety
/// `DiskManager` is **single-threaded**. The `BufferPoolManager` is responsible
/// for serializing access to the disk manager.
pub struct DiskManager {
    file: File,
    /// Number of pages currently backed by the file.
    page_count: u32,
}

impl DiskManager {
    /// Create a new database file.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&path)?;
        debug!(path = %path.as_ref().display(), "created database file");

        Ok(Self {
            file,
            page_count: 0,
        })
    }

    /// Open an existing database file.
    ///
    /// # Errors
    /// Returns an error if the file doesn't exist or cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(&path)?;

        // Calculate page count from file size
        let metadata = file.metadata()?;
        let file_size = metadata.len();
        let page_count = (file_size / PAGE_SIZE as u64) as u32;
        debug!(path = %path.as_ref().display(), page_count, "opened database file");

        Ok(Self { file, page_count })
    }

    /// Open an existing database file, or create if it doesn't exist.
    pub fn open_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::open(path)
        } else {
            Self::create(path)
        }
    }

    /// Read a page from disk into the caller's buffer.
    ///
    /// `buf` must be exactly `PAGE_SIZE` bytes. Pages beyond the end of the
    /// file (never written) read as all zeroes.
    ///
    /// # Errors
    /// Returns `Error::InvalidPageId` for the invalid sentinel.
    pub fn read_page(&mut self, page_id: PageId, buf: &mut [u8]) -> Result<()> {
        debug_assert_eq!(buf.len(), PAGE_SIZE);
        if !page_id.is_valid() {
            return Err(Error::InvalidPageId(page_id));
        }

        if page_id.0 as u32 >= self.page_count {
            buf.fill(0);
            return Ok(());
        }

        let offset = (page_id.0 as u64) * (PAGE_SIZE as u64);
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(buf)?;

        Ok(())
    }

    /// Write a page to disk.
    ///
    /// `buf` must be exactly `PAGE_SIZE` bytes. Writing past the current end
    /// of the file extends it.
    ///
    /// # Durability
    /// This method calls `fsync()` after writing so the data reaches disk.
    ///
    /// # Errors
    /// Returns `Error::InvalidPageId` for the invalid sentinel.
    pub fn write_page(&mut self, page_id: PageId, buf: &[u8]) -> Result<()> {
        debug_assert_eq!(buf.len(), PAGE_SIZE);
        if !page_id.is_valid() {
            return Err(Error::InvalidPageId(page_id));
        }

        let offset = (page_id.0 as u64) * (PAGE_SIZE as u64);
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(buf)?;
        self.file.sync_all()?;

        self.page_count = self.page_count.max(page_id.0 as u32 + 1);
        Ok(())
    }

    /// Get the number of pages backed by the database file.
    #[inline]
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Get the total size of the database file in bytes.
    #[inline]
    pub fn file_size(&self) -> u64 {
        (self.page_count as u64) * (PAGE_SIZE as u64)
    }
}
