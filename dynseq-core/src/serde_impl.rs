//! Serde support: a `DynSeq` is a plain sequence on the wire

use crate::allocator::Allocator;
use crate::sequence::DynSeq;
use core::fmt;
use core::marker::PhantomData;
use serde::de::{self, Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};

impl<T: Serialize, A: Allocator> Serialize for DynSeq<T, A> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.as_slice())
    }
}

struct SeqVisitor<T, A> {
    _marker: PhantomData<(T, A)>,
}

impl<'de, T, A> Visitor<'de> for SeqVisitor<T, A>
where
    T: Deserialize<'de>,
    A: Allocator + Default,
{
    type Value = DynSeq<T, A>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a sequence")
    }

    fn visit_seq<S: SeqAccess<'de>>(self, mut access: S) -> Result<Self::Value, S::Error> {
        // Untrusted size hints are capped so a bogus length can't force a
        // huge allocation up front.
        let hint = access.size_hint().unwrap_or(0).min(4096);
        let mut seq = DynSeq::with_capacity_in(hint, A::default())
            .map_err(|e| de::Error::custom(format_args!("{:?}", e)))?;
        while let Some(value) = access.next_element()? {
            seq.push_back(value)
                .map_err(|e| de::Error::custom(format_args!("{:?}", e)))?;
        }
        Ok(seq)
    }
}

impl<'de, T, A> Deserialize<'de> for DynSeq<T, A>
where
    T: Deserialize<'de>,
    A: Allocator + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(SeqVisitor {
            _marker: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{dynseq, DynSeq, TrackingAllocator};
    use alloc::string::String;

    #[test]
    fn test_serializes_as_array() {
        let seq = dynseq![1, 2, 3];
        assert_eq!(serde_json::to_string(&seq).unwrap(), "[1,2,3]");
    }

    #[test]
    fn test_deserializes_into_tracked_sequence() {
        let seq: DynSeq<String, TrackingAllocator> =
            serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(seq, ["a", "b"]);
        assert_eq!(seq.allocator().stats().constructed, 2);
    }

    #[test]
    fn test_rejects_non_sequence() {
        let result: Result<DynSeq<u8>, _> = serde_json::from_str("{}");
        assert!(result.is_err());
    }
}
