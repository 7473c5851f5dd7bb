use std::fmt;
use std::str::FromStr;

use jv_types::LedgerHash;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dot::PairHasher;
use crate::hasher::{HashError, LedgerHasher};

/// Ordered sibling hashes leading from one leaf to a digest.
///
/// Every hash in a proof is a full 32-byte value.
///
/// Text form is either an Ion-style blob list, `[{{<base64>}},{{<base64>}}]`,
/// as returned by the ledger service, or a JSON array of base64 strings.
///
/// Only that Ion subset is read: a bracketed, comma-separated list of
/// base64 blobs with optional whitespace. Annotations, comments, clobs and
/// nested values are rejected as malformed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LedgerHash>", into = "Vec<LedgerHash>")]
pub struct Proof {
    internal_hashes: Vec<LedgerHash>,
}

impl Proof {
    /// Build a proof, rejecting empty hashes.
    pub fn new(internal_hashes: Vec<LedgerHash>) -> Result<Self, ProofError> {
        if let Some(position) = internal_hashes.iter().position(LedgerHash::is_empty) {
            return Err(ProofError::Malformed(format!(
                "element {position} is an empty hash"
            )));
        }
        Ok(Self { internal_hashes })
    }

    /// Sibling hashes already known to be non-empty (e.g. taken from a tree).
    pub(crate) fn from_trusted(internal_hashes: Vec<LedgerHash>) -> Self {
        Self { internal_hashes }
    }

    /// Decode proof text.
    pub fn parse(text: &str) -> Result<Self, ProofError> {
        let trimmed = text.trim();
        let inner = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(|| ProofError::Malformed("expected a bracketed list".into()))?;

        if inner.contains("{{") {
            Self::parse_blob_list(inner)
        } else {
            let encoded: Vec<String> = serde_json::from_str(trimmed)
                .map_err(|e| ProofError::Malformed(e.to_string()))?;
            let hashes = encoded
                .iter()
                .enumerate()
                .map(|(i, s)| decode_element(i, s))
                .collect::<Result<Vec<_>, _>>()?;
            Self::new(hashes)
        }
    }

    fn parse_blob_list(inner: &str) -> Result<Self, ProofError> {
        let hashes = inner
            .split(',')
            .map(str::trim)
            .filter(|element| !element.is_empty())
            .enumerate()
            .map(|(i, element)| {
                let base64 = element
                    .strip_prefix("{{")
                    .and_then(|rest| rest.strip_suffix("}}"))
                    .ok_or_else(|| {
                        ProofError::Malformed(format!("element {i} is not a blob: {element}"))
                    })?;
                decode_element(i, base64)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(hashes)
    }

    /// The sibling hashes in fold order.
    pub fn internal_hashes(&self) -> &[LedgerHash] {
        &self.internal_hashes
    }

    pub fn len(&self) -> usize {
        self.internal_hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.internal_hashes.is_empty()
    }

    /// Render as an Ion-style blob list.
    pub fn to_ion_text(&self) -> String {
        let blobs: Vec<String> = self
            .internal_hashes
            .iter()
            .map(|h| format!("{{{{{}}}}}", h.to_base64()))
            .collect();
        format!("[{}]", blobs.join(","))
    }
}

fn decode_element(index: usize, encoded: &str) -> Result<LedgerHash, ProofError> {
    let hash = LedgerHash::from_base64(encoded)
        .map_err(|e| ProofError::Malformed(format!("element {index}: {e}")))?;
    if hash.is_empty() {
        return Err(ProofError::Malformed(format!(
            "element {index} is an empty hash"
        )));
    }
    Ok(hash)
}

impl FromStr for Proof {
    type Err = ProofError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Proof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ion_text())
    }
}

impl TryFrom<Vec<LedgerHash>> for Proof {
    type Error = ProofError;

    fn try_from(hashes: Vec<LedgerHash>) -> Result<Self, Self::Error> {
        Self::new(hashes)
    }
}

impl From<Proof> for Vec<LedgerHash> {
    fn from(proof: Proof) -> Self {
        proof.internal_hashes
    }
}

/// Verifies a leaf hash against a trusted digest.
///
/// A mismatch is an ordinary `false`, never an error.
pub struct ProofVerifier;

impl ProofVerifier {
    /// Fold the proof into the leaf with `dot`, in proof order.
    pub fn candidate_digest(leaf: &LedgerHash, proof: &Proof) -> LedgerHash {
        proof
            .internal_hashes()
            .iter()
            .fold(*leaf, |acc, sibling| PairHasher::dot(&acc, sibling))
    }

    /// Returns `true` when the folded proof equals the digest.
    pub fn verify(leaf: &LedgerHash, digest: &LedgerHash, proof: &Proof) -> bool {
        let candidate = Self::candidate_digest(leaf, proof);
        let verified = LedgerHasher::equals(&candidate, digest);
        debug!(
            leaf = %leaf.short_hex(),
            steps = proof.len(),
            verified,
            "proof folded"
        );
        verified
    }

    /// Decode `proof_text` and verify. Only undecodable text is an error.
    pub fn verify_text(
        leaf: &LedgerHash,
        digest: &LedgerHash,
        proof_text: &str,
    ) -> Result<bool, ProofError> {
        let proof = Proof::parse(proof_text)?;
        Ok(Self::verify(leaf, digest, &proof))
    }

    /// Negative self-check.
    ///
    /// For each trial, a random bit is flipped in the digest and, separately,
    /// in the leaf; neither tampered input may verify. Returns `true` when
    /// every tampered input was rejected.
    pub fn verify_tampered(
        leaf: &LedgerHash,
        digest: &LedgerHash,
        proof: &Proof,
        trials: usize,
    ) -> Result<bool, ProofError> {
        for _ in 0..trials {
            let bad_digest = LedgerHasher::flip_random_bit(digest)?;
            if Self::verify(leaf, &bad_digest, proof) {
                return Ok(false);
            }
            let bad_leaf = LedgerHasher::flip_random_bit(leaf)?;
            if Self::verify(&bad_leaf, digest, proof) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Errors from proof decoding.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProofError {
    #[error("malformed proof: {0}")]
    Malformed(String),

    #[error(transparent)]
    Hash(#[from] HashError),
}
