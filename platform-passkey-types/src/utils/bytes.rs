use std::{fmt, ops::Deref};

use serde::{
    de::{Error, SeqAccess, Unexpected, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};
use typeshare::typeshare;

use super::encoding;

/// A newtype around `Vec<u8>` for every binary WebAuthn member.
///
/// It always serializes into an unpadded `base64url` string, which is the representation relying
/// parties expect in `PublicKeyCredential` JSON. Deserialization is lenient and accepts
/// `base64url`, `base64` or an array of numbers, since hosts hand over options in all three shapes.
#[typeshare(serialized_as = "String")]
#[derive(Debug, Default, PartialEq, Eq, Clone, Hash)]
#[repr(transparent)]
pub struct Bytes(Vec<u8>);

impl Bytes {
    /// Consume the wrapper.
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for Bytes {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.0
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(inner: Vec<u8>) -> Self {
        Self(inner)
    }
}

impl From<&[u8]> for Bytes {
    fn from(inner: &[u8]) -> Self {
        Self(inner.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for Bytes {
    fn from(inner: [u8; N]) -> Self {
        Self(inner.to_vec())
    }
}

impl From<Bytes> for Vec<u8> {
    fn from(bytes: Bytes) -> Self {
        bytes.0
    }
}

/// The string given for decoding is neither `base64url` nor `base64`.
#[derive(Debug, PartialEq, Eq)]
pub struct NotBase64Encoded;

impl fmt::Display for NotBase64Encoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("not base64 or base64url encoded")
    }
}

impl std::error::Error for NotBase64Encoded {}

impl TryFrom<&str> for Bytes {
    type Error = NotBase64Encoded;

    fn try_from(value: &str) -> Result<Self, NotBase64Encoded> {
        encoding::try_from_base64url(value)
            .or_else(|| encoding::try_from_base64(value))
            .map(Self)
            .ok_or(NotBase64Encoded)
    }
}

impl Serialize for Bytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encoding::base64url(&self.0))
    }
}

struct BytesVisitor;

impl<'de> Visitor<'de> for BytesVisitor {
    type Value = Bytes;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a base64url string, a base64 string or an array of bytes")
    }

    fn visit_str<E: Error>(self, v: &str) -> Result<Bytes, E> {
        Bytes::try_from(v).map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
    }

    fn visit_bytes<E: Error>(self, v: &[u8]) -> Result<Bytes, E> {
        Ok(v.into())
    }

    fn visit_byte_buf<E: Error>(self, v: Vec<u8>) -> Result<Bytes, E> {
        Ok(v.into())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Bytes, A::Error> {
        let mut buf = Vec::with_capacity(seq.size_hint().unwrap_or_default());
        while let Some(byte) = seq.next_element::<u8>()? {
            buf.push(byte);
        }
        Ok(buf.into())
    }
}

impl<'de> Deserialize<'de> for Bytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(BytesVisitor)
    }
}
