use std::cmp::Ordering;

use jv_types::{HASH_LEN, LedgerHash};
use sha2::{Digest, Sha256};

use crate::hasher::HashError;

/// Compare two hashes the way the journal orders siblings.
///
/// Bytes are compared from the last index down to the first, each read as
/// a signed 8-bit integer. The first differing byte decides.
pub fn compare_hashes(a: &[u8; HASH_LEN], b: &[u8; HASH_LEN]) -> Ordering {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .map(|(x, y)| (*x as i8).cmp(&(*y as i8)))
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// The `dot` operator: an order-independent combination of two hashes.
///
/// `dot(a, b)` is SHA-256 over the concatenation of `a` and `b`, with the
/// lesser hash (per [`compare_hashes`]) first. The empty hash is the
/// identity: `dot(a, empty) == a`.
pub struct PairHasher;

impl PairHasher {
    /// Combine two hashes.
    pub fn dot(a: &LedgerHash, b: &LedgerHash) -> LedgerHash {
        let (left, right) = match (a.as_array(), b.as_array()) {
            (None, _) => return *b,
            (_, None) => return *a,
            (Some(x), Some(y)) => {
                if compare_hashes(x, y) == Ordering::Less {
                    (x, y)
                } else {
                    (y, x)
                }
            }
        };

        let mut hasher = Sha256::new();
        hasher.update(left);
        hasher.update(right);
        LedgerHash::from_array(hasher.finalize().into())
    }

    /// Combine two unvalidated byte strings.
    ///
    /// Each input must be empty or exactly 32 bytes.
    pub fn dot_bytes(a: &[u8], b: &[u8]) -> Result<LedgerHash, HashError> {
        let a = LedgerHash::from_slice(a)?;
        let b = LedgerHash::from_slice(b)?;
        Ok(Self::dot(&a, &b))
    }
}
