//! Error types for BurrowDB.

use thiserror::Error;

use crate::common::PageId;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
/// This is a common Rust pattern (see `std::io::Result`).
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in BurrowDB.
///
/// Absence (a cache miss, an unpin of an unknown page) is reported through
/// `Option`/`bool` returns, never through this enum. Out-of-range replacer
/// frame ids are programmer errors and panic instead.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from disk operations.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Buffer pool has no free frames and cannot evict any pages.
    ///
    /// This happens when all frames are pinned.
    #[error("buffer pool exhausted: no free or evictable frames")]
    PoolExhausted,

    /// The provided page ID is the invalid sentinel or otherwise unusable.
    #[error("invalid page id: {0}")]
    InvalidPageId(PageId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidPageId(PageId::INVALID);
        assert_eq!(format!("{}", err), "invalid page id: Page(INVALID)");

        let err = Error::PoolExhausted;
        assert_eq!(
            format!("{}", err),
            "buffer pool exhausted: no free or evictable frames"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();

        match err {
            Error::Io(_) => {} // Success
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_result_type_alias() {
        // This function returns our Result type
        fn might_fail() -> Result<u32> {
            Ok(42)
        }

        assert_eq!(might_fail().unwrap(), 42);
    }
}
