//! Runtime-tagged values stored in the trie.
//!
//! The trie is heterogeneous: every value-bearing node carries its own
//! tagged value, and `get` is parametric over the expected type. Rather
//! than downcasting through `Any`, the supported types form a closed sum.

/// A payload without `Clone`, used to verify that the trie shares values
/// between versions instead of copying them.
#[derive(Debug, PartialEq, Eq)]
pub struct MoveOnly(pub u32);

/// A value carried by a value-bearing trie node.
///
/// The variants are the types the index supports; a mismatch between the
/// stored tag and the type requested by [`Trie::get`](crate::index::Trie::get)
/// reads as a miss, never as an error.
#[derive(Debug)]
pub enum TrieValue {
    U32(u32),
    U64(u64),
    Str(String),
    /// Unique-owned 32-bit integer.
    UniqueU32(Box<u32>),
    /// Non-clonable sentinel.
    MoveOnly(MoveOnly),
}

/// Types that can be stored in and read back out of the trie.
pub trait TrieValueType: Sized {
    /// Wrap a concrete value in its tagged representation.
    fn into_value(self) -> TrieValue;

    /// Borrow the concrete value back out, or `None` on a tag mismatch.
    fn from_value(value: &TrieValue) -> Option<&Self>;
}

impl TrieValueType for u32 {
    fn into_value(self) -> TrieValue {
        TrieValue::U32(self)
    }

    fn from_value(value: &TrieValue) -> Option<&Self> {
        match value {
            TrieValue::U32(v) => Some(v),
            _ => None,
        }
    }
}

impl TrieValueType for u64 {
    fn into_value(self) -> TrieValue {
        TrieValue::U64(self)
    }

    fn from_value(value: &TrieValue) -> Option<&Self> {
        match value {
            TrieValue::U64(v) => Some(v),
            _ => None,
        }
    }
}

impl TrieValueType for String {
    fn into_value(self) -> TrieValue {
        TrieValue::Str(self)
    }

    fn from_value(value: &TrieValue) -> Option<&Self> {
        match value {
            TrieValue::Str(v) => Some(v),
            _ => None,
        }
    }
}

impl TrieValueType for Box<u32> {
    fn into_value(self) -> TrieValue {
        TrieValue::UniqueU32(self)
    }

    fn from_value(value: &TrieValue) -> Option<&Self> {
        match value {
            TrieValue::UniqueU32(v) => Some(v),
            _ => None,
        }
    }
}

impl TrieValueType for MoveOnly {
    fn into_value(self) -> TrieValue {
        TrieValue::MoveOnly(self)
    }

    fn from_value(value: &TrieValue) -> Option<&Self> {
        match value {
            TrieValue::MoveOnly(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_tags() {
        let v = 233u32.into_value();
        assert_eq!(u32::from_value(&v), Some(&233));
        assert_eq!(u64::from_value(&v), None);

        let v = "hello".to_string().into_value();
        assert_eq!(String::from_value(&v).map(String::as_str), Some("hello"));
        assert_eq!(u32::from_value(&v), None);
    }

    #[test]
    fn test_unique_and_move_only() {
        let v = Box::new(7u32).into_value();
        assert_eq!(Box::<u32>::from_value(&v), Some(&Box::new(7)));

        let v = MoveOnly(9).into_value();
        assert_eq!(MoveOnly::from_value(&v), Some(&MoveOnly(9)));
        assert_eq!(u32::from_value(&v), None);
    }
}
