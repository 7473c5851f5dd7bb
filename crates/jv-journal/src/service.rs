//! Ledger service responses that carry a record together with its proof.

use std::fmt;

use jv_crypto::Proof;
use jv_types::ValueHolder;
use serde::{Deserialize, Serialize};

use crate::block::JournalBlockRecord;
use crate::error::JournalError;
use crate::revision::RevisionRecord;

/// Response to a block request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetBlockResult {
    #[serde(rename = "Block")]
    pub block: ValueHolder,
    #[serde(rename = "Proof", default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<ValueHolder>,
}

impl GetBlockResult {
    /// Decode the embedded block.
    pub fn block(&self) -> Result<JournalBlockRecord, JournalError> {
        JournalBlockRecord::from_json(&self.block.ion_text)
    }

    /// Decode the embedded proof, if the response has one.
    pub fn proof(&self) -> Result<Option<Proof>, JournalError> {
        decode_proof(self.proof.as_ref())
    }
}

impl fmt::Display for GetBlockResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{Block: {}", self.block)?;
        if let Some(proof) = &self.proof {
            write!(f, ", Proof: {proof}")?;
        }
        write!(f, "}}")
    }
}

/// Response to a document revision request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetRevisionResult {
    #[serde(rename = "Revision")]
    pub revision: ValueHolder,
    #[serde(rename = "Proof", default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<ValueHolder>,
}

impl GetRevisionResult {
    /// Decode the embedded revision.
    pub fn revision(&self) -> Result<RevisionRecord, JournalError> {
        RevisionRecord::from_json(&self.revision.ion_text)
    }

    /// Decode the embedded proof, if the response has one.
    pub fn proof(&self) -> Result<Option<Proof>, JournalError> {
        decode_proof(self.proof.as_ref())
    }
}

impl fmt::Display for GetRevisionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{Revision: {}", self.revision)?;
        if let Some(proof) = &self.proof {
            write!(f, ", Proof: {proof}")?;
        }
        write!(f, "}}")
    }
}

fn decode_proof(holder: Option<&ValueHolder>) -> Result<Option<Proof>, JournalError> {
    holder
        .map(|h| Proof::parse(&h.ion_text))
        .transpose()
        .map_err(JournalError::from)
}
