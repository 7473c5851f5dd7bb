use std::collections::BTreeMap;

use jv_types::LedgerHash;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::JournalError;

/// What a transaction did: the statements it ran and the documents each
/// statement touched.
///
/// A read-only view. Blocks keep and hash the raw `transactionInfo`
/// document; see [`JournalBlockRecord`](crate::JournalBlockRecord).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInfo {
    #[serde(default)]
    pub statements: Vec<StatementInfo>,
    /// Keyed by document id.
    #[serde(default)]
    pub documents: BTreeMap<String, DocumentInfo>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementInfo {
    pub statement: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default)]
    pub statement_digest: LedgerHash,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub table_name: String,
    pub table_id: String,
    /// Indexes into [`TransactionInfo::statements`].
    #[serde(default)]
    pub statements: Vec<u32>,
}

impl TransactionInfo {
    /// Decode the typed view of a `transactionInfo` document.
    pub fn from_document(document: &Value) -> Result<Self, JournalError> {
        Self::deserialize(document)
            .map_err(|e| JournalError::Decode(format!("transactionInfo: {e}")))
    }
}
