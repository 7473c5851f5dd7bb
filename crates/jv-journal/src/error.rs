use std::fmt;

use jv_crypto::{HashError, ProofError};
use jv_types::{BlockAddress, TypeError};

/// Errors produced by journal decoding and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JournalError {
    #[error("malformed record: {0}")]
    Decode(String),

    #[error("missing required field `{field}` in {record}")]
    MissingField {
        record: &'static str,
        field: &'static str,
    },

    #[error("unsupported table `{table}`")]
    UnsupportedTable { table: String },

    #[error("{check} at block {address}")]
    Mismatch {
        address: BlockAddress,
        check: MismatchKind,
    },

    #[error("hash error: {0}")]
    Hash(String),

    #[error("proof error: {0}")]
    Proof(String),
}

impl JournalError {
    /// Returns `true` for a broken journal invariant, as opposed to input
    /// that could not be decoded.
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::Mismatch { .. })
    }
}

impl From<HashError> for JournalError {
    fn from(e: HashError) -> Self {
        Self::Hash(e.to_string())
    }
}

impl From<ProofError> for JournalError {
    fn from(e: ProofError) -> Self {
        Self::Proof(e.to_string())
    }
}

impl From<TypeError> for JournalError {
    fn from(e: TypeError) -> Self {
        Self::Decode(e.to_string())
    }
}

impl From<serde_json::Error> for JournalError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

/// The journal invariant a validation failure broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MismatchKind {
    /// Hash of the transaction info is not among the entries hashes.
    TransactionInfoNotInEntries,
    /// A revision's declared hash differs from the recomputed one.
    RevisionHash { document_id: String, version: u64 },
    /// Merkle root of the revision hashes is not among the entries hashes.
    RevisionsHashNotInEntries,
    /// Merkle root of the entries hash list differs from `entriesHash`.
    EntriesHash,
    /// `dot(entriesHash, previousBlockHash)` differs from `blockHash`.
    BlockHash,
    /// `previousBlockHash` differs from the preceding block's `blockHash`.
    PreviousBlockHash,
    /// `dot(entriesHash, preceding blockHash)` differs from `blockHash`.
    ChainBroken,
}

impl fmt::Display for MismatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransactionInfoNotInEntries => {
                write!(f, "transactionInfo hash not in entries list")
            }
            Self::RevisionHash {
                document_id,
                version,
            } => write!(
                f,
                "revision hash mismatch for document {document_id} version {version}"
            ),
            Self::RevisionsHashNotInEntries => write!(f, "revisions hash not in entries list"),
            Self::EntriesHash => write!(f, "computed entries hash mismatch"),
            Self::BlockHash => write!(f, "computed block hash mismatch"),
            Self::PreviousBlockHash => write!(f, "previous block hash mismatch"),
            Self::ChainBroken => write!(
                f,
                "chain broken: entries hash dot previous block hash does not match block hash"
            ),
        }
    }
}
