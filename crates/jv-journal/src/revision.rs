use jv_crypto::{LedgerHasher, PairHasher};
use jv_types::{BlockAddress, LedgerHash};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{JournalError, MismatchKind};

/// Metadata the ledger attaches to every user revision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionMetadata {
    pub id: String,
    pub version: u64,
    pub tx_time: String,
    pub tx_id: String,
}

/// A revision of a user document.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRevision {
    pub block_address: BlockAddress,
    pub metadata: RevisionMetadata,
    pub hash: LedgerHash,
    /// `None` for the revision that deletes a document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl UserRevision {
    /// `dot(H(metadata), H(data))`, or `H(metadata)` for a deleted document.
    pub fn compute_hash(
        metadata: &RevisionMetadata,
        data: Option<&Value>,
    ) -> Result<LedgerHash, JournalError> {
        let metadata_hash = LedgerHasher::digest_canonical(metadata)?;
        match data {
            Some(data) => {
                let data_hash = LedgerHasher::digest_canonical(data)?;
                Ok(PairHasher::dot(&metadata_hash, &data_hash))
            }
            None => Ok(metadata_hash),
        }
    }
}

/// One revision inside a journal block.
///
/// System revisions carry only a hash; they exist for hash-chain
/// completeness and are trusted as Merkle leaves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRevision", into = "RawRevision")]
pub enum RevisionRecord {
    System { hash: LedgerHash },
    User(UserRevision),
}

impl RevisionRecord {
    /// Build a user revision whose declared hash is computed from its content.
    pub fn new_user(
        block_address: BlockAddress,
        metadata: RevisionMetadata,
        data: Option<Value>,
    ) -> Result<Self, JournalError> {
        let hash = UserRevision::compute_hash(&metadata, data.as_ref())?;
        Ok(Self::User(UserRevision {
            block_address,
            metadata,
            hash,
            data,
        }))
    }

    /// The declared hash.
    pub fn hash(&self) -> &LedgerHash {
        match self {
            Self::System { hash } => hash,
            Self::User(user) => &user.hash,
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, Self::System { .. })
    }

    /// Recompute a user revision's hash and compare it to the declared one.
    /// System revisions always pass.
    pub fn verify_hash(&self) -> Result<(), JournalError> {
        let Self::User(user) = self else {
            return Ok(());
        };
        let computed = UserRevision::compute_hash(&user.metadata, user.data.as_ref())?;
        if computed != user.hash {
            return Err(JournalError::Mismatch {
                address: user.block_address.clone(),
                check: MismatchKind::RevisionHash {
                    document_id: user.metadata.id.clone(),
                    version: user.metadata.version,
                },
            });
        }
        debug!(
            document = %user.metadata.id,
            version = user.metadata.version,
            "revision hash verified"
        );
        Ok(())
    }

    /// Decode a revision from its JSON text.
    pub fn from_json(text: &str) -> Result<Self, JournalError> {
        let raw: RawRevision = serde_json::from_str(text)?;
        Self::try_from(raw)
    }
}

/// Wire shape of a revision, with every field optional so that system
/// revisions and missing-field errors can be told apart.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRevision {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_address: Option<BlockAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RevisionMetadata>,
    #[serde(default)]
    pub hash: Option<LedgerHash>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl TryFrom<RawRevision> for RevisionRecord {
    type Error = JournalError;

    fn try_from(raw: RawRevision) -> Result<Self, Self::Error> {
        let hash = raw
            .hash
            .filter(|h| !h.is_empty())
            .ok_or(JournalError::MissingField {
                record: "revision",
                field: "hash",
            })?;

        match (raw.block_address, raw.metadata, raw.data) {
            (None, None, None) => Ok(Self::System { hash }),
            (Some(block_address), Some(metadata), data) => Ok(Self::User(UserRevision {
                block_address,
                metadata,
                hash,
                data,
            })),
            (None, _, _) => Err(JournalError::MissingField {
                record: "revision",
                field: "blockAddress",
            }),
            (Some(_), None, _) => Err(JournalError::MissingField {
                record: "revision",
                field: "metadata",
            }),
        }
    }
}

impl From<RevisionRecord> for RawRevision {
    fn from(revision: RevisionRecord) -> Self {
        match revision {
            RevisionRecord::System { hash } => Self {
                hash: Some(hash),
                ..Default::default()
            },
            RevisionRecord::User(user) => Self {
                block_address: Some(user.block_address),
                metadata: Some(user.metadata),
                hash: Some(user.hash),
                data: user.data,
            },
        }
    }
}
