use jv_types::{HASH_LEN, LedgerHash, TypeError};
use rand::Rng;
use sha2::{Digest, Sha256};

/// SHA-256 hashing for ledger content.
///
/// Stateless: every function builds its own hasher, so calls are safe from
/// any thread without coordination.
pub struct LedgerHasher;

impl LedgerHasher {
    /// SHA-256 over arbitrary bytes.
    pub fn digest(data: &[u8]) -> LedgerHash {
        LedgerHash::from_array(Sha256::digest(data).into())
    }

    /// SHA-256 over the canonical JSON encoding of a value.
    ///
    /// The value is first converted to a `serde_json::Value`, whose object
    /// keys are kept sorted, then written without whitespace. Two values
    /// that compare equal as JSON always hash the same regardless of the
    /// field order they were parsed from.
    pub fn digest_canonical<T: serde::Serialize + ?Sized>(
        value: &T,
    ) -> Result<LedgerHash, HashError> {
        let canonical =
            serde_json::to_value(value).map_err(|e| HashError::Serialization(e.to_string()))?;
        let bytes =
            serde_json::to_vec(&canonical).map_err(|e| HashError::Serialization(e.to_string()))?;
        Ok(Self::digest(&bytes))
    }

    /// Byte-for-byte equality.
    pub fn equals(a: &LedgerHash, b: &LedgerHash) -> bool {
        a.as_bytes() == b.as_bytes()
    }

    /// Copy of `hash` with one bit toggled at a uniformly random position.
    ///
    /// Only meant for negative-path checks.
    pub fn flip_random_bit(hash: &LedgerHash) -> Result<LedgerHash, HashError> {
        Self::flip_random_bit_with(hash, &mut rand::thread_rng())
    }

    /// Same as [`flip_random_bit`](Self::flip_random_bit) with a caller-supplied RNG.
    pub fn flip_random_bit_with<R: Rng + ?Sized>(
        hash: &LedgerHash,
        rng: &mut R,
    ) -> Result<LedgerHash, HashError> {
        if hash.is_empty() {
            return Err(HashError::EmptyInput);
        }
        let byte = rng.gen_range(0..HASH_LEN);
        let bit = rng.gen_range(0..8);
        Self::flip_bit(hash, byte, bit)
    }

    /// Copy of `hash` with bit `bit` of byte `byte` toggled.
    pub fn flip_bit(hash: &LedgerHash, byte: usize, bit: u8) -> Result<LedgerHash, HashError> {
        let Some(bytes) = hash.as_array() else {
            return Err(HashError::EmptyInput);
        };
        if byte >= HASH_LEN || bit >= 8 {
            return Err(HashError::BitOutOfRange { byte, bit });
        }
        let mut flipped = *bytes;
        flipped[byte] ^= 1 << bit;
        Ok(LedgerHash::from_array(flipped))
    }
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HashError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("cannot flip a bit of an empty hash")]
    EmptyInput,

    #[error("bit position out of range: byte {byte}, bit {bit}")]
    BitOutOfRange { byte: usize, bit: u8 },

    #[error("invalid hash: {0}")]
    InvalidHash(#[from] TypeError),
}
