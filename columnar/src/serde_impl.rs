use std::fmt;

use serde::{
    de::{self, SeqAccess, Visitor},
    ser::SerializeTuple,
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::{BooleanColumn, CodePointColumn, Column, FixedBytesColumn, VarBytesColumn};

/// Serializes a borrowed buffer with `serialize_bytes`.
struct RawBytes<'a>(&'a [u8]);

impl Serialize for RawBytes<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(self.0)
    }
}

/// An owned buffer read back from either a byte string or a sequence of
/// integers, for formats (like JSON) without native bytes.
struct ByteBuf(Vec<u8>);

struct ByteBufVisitor;

impl<'de> Visitor<'de> for ByteBufVisitor {
    type Value = ByteBuf;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a column buffer")
    }

    fn visit_bytes<E>(self, bytes: &[u8]) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(ByteBuf(bytes.to_vec()))
    }

    fn visit_byte_buf<E>(self, bytes: Vec<u8>) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(ByteBuf(bytes))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
        while let Some(byte) = seq.next_element::<u8>()? {
            bytes.push(byte);
        }
        Ok(ByteBuf(bytes))
    }
}

impl<'de> Deserialize<'de> for ByteBuf {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_byte_buf(ByteBufVisitor)
    }
}

impl Serialize for BooleanColumn {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(self.as_bytes())
    }
}

impl<'de> Deserialize<'de> for BooleanColumn {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ByteBuf(bytes) = ByteBuf::deserialize(deserializer)?;
        Ok(BooleanColumn::from_bytes(bytes))
    }
}

impl Serialize for VarBytesColumn {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(self.as_bytes())
    }
}

impl<'de> Deserialize<'de> for VarBytesColumn {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ByteBuf(bytes) = ByteBuf::deserialize(deserializer)?;
        VarBytesColumn::from_bytes(bytes).map_err(|e| de::Error::custom(e.to_string()))
    }
}

/// Fixed-width string columns travel as `(chars, buffer)`; the width is not
/// recoverable from the buffer alone.
macro_rules! impl_fixed_width_serde {
    ($column:ident) => {
        impl Serialize for $column {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                let mut tuple = serializer.serialize_tuple(2)?;
                tuple.serialize_element(&self.chars())?;
                tuple.serialize_element(&RawBytes(self.as_bytes()))?;
                tuple.end()
            }
        }

        impl<'de> Deserialize<'de> for $column {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                struct FixedVisitor;

                impl<'de> Visitor<'de> for FixedVisitor {
                    type Value = $column;

                    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                        formatter.write_str(concat!("a ", stringify!($column)))
                    }

                    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
                    where
                        A: SeqAccess<'de>,
                    {
                        let chars: usize = match seq.next_element()? {
                            Some(chars) => chars,
                            None => return Err(de::Error::invalid_length(0, &self)),
                        };
                        let ByteBuf(bytes) = match seq.next_element()? {
                            Some(bytes) => bytes,
                            None => return Err(de::Error::invalid_length(1, &self)),
                        };
                        $column::from_bytes(bytes, chars)
                            .map_err(|e| de::Error::custom(e.to_string()))
                    }
                }

                deserializer.deserialize_tuple(2, FixedVisitor)
            }
        }
    };
}

impl_fixed_width_serde!(FixedBytesColumn);
impl_fixed_width_serde!(CodePointColumn);
