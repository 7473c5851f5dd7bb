use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Length in bytes of every non-empty ledger hash (SHA-256).
pub const HASH_LEN: usize = 32;

/// A hash participating in journal verification.
///
/// A `LedgerHash` is either empty or exactly [`HASH_LEN`] bytes. The empty
/// hash is a sentinel, not an error: it is the Merkle root of no leaves and
/// the previous-block hash of the first block in a strand. Any other length
/// is rejected at construction, so code holding a `LedgerHash` never needs
/// to re-check it.
///
/// On the wire a hash is a standard base64 string; the empty string and
/// `null` both decode to the empty hash.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LedgerHash(Option<[u8; HASH_LEN]>);

impl LedgerHash {
    /// The empty (zero-length) hash.
    pub const fn empty() -> Self {
        Self(None)
    }

    /// Wrap a pre-computed 32-byte hash.
    pub const fn from_array(bytes: [u8; HASH_LEN]) -> Self {
        Self(Some(bytes))
    }

    /// Validate raw bytes: zero bytes yield the empty hash, 32 bytes a full
    /// hash, anything else is an error.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypeError> {
        match bytes.len() {
            0 => Ok(Self::empty()),
            HASH_LEN => {
                let mut arr = [0u8; HASH_LEN];
                arr.copy_from_slice(bytes);
                Ok(Self(Some(arr)))
            }
            actual => Err(TypeError::InvalidLength {
                expected: HASH_LEN,
                actual,
            }),
        }
    }

    /// Returns `true` for the empty hash.
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// The hash bytes; an empty slice for the empty hash.
    pub fn as_bytes(&self) -> &[u8] {
        match &self.0 {
            Some(bytes) => bytes,
            None => &[],
        }
    }

    /// The fixed-size bytes, or `None` for the empty hash.
    pub fn as_array(&self) -> Option<&[u8; HASH_LEN]> {
        self.0.as_ref()
    }

    /// Number of bytes: 0 or 32.
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.as_bytes()[..self.len().min(4)])
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Standard base64 representation, as used in ledger exports.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.as_bytes())
    }

    /// Parse from a standard base64 string.
    pub fn from_base64(s: &str) -> Result<Self, TypeError> {
        let bytes = STANDARD
            .decode(s.trim())
            .map_err(|e| TypeError::InvalidBase64(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Debug for LedgerHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "LedgerHash(<empty>)")
        } else {
            write!(f, "LedgerHash({})", self.short_hex())
        }
    }
}

impl fmt::Display for LedgerHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; HASH_LEN]> for LedgerHash {
    fn from(bytes: [u8; HASH_LEN]) -> Self {
        Self::from_array(bytes)
    }
}

impl TryFrom<&[u8]> for LedgerHash {
    type Error = TypeError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(bytes)
    }
}

impl Serialize for LedgerHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for LedgerHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = Option::<String>::deserialize(deserializer)?;
        match encoded {
            None => Ok(Self::empty()),
            Some(s) => Self::from_base64(&s).map_err(serde::de::Error::custom),
        }
    }
}
