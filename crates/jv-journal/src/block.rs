use chrono::{DateTime, Utc};
use jv_types::{BlockAddress, LedgerHash};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::JournalError;
use crate::revision::RevisionRecord;
use crate::transaction::TransactionInfo;

/// One journal block as found in an export or a ledger response.
///
/// Immutable once decoded; validation only reads it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawBlock")]
pub struct JournalBlockRecord {
    pub block_address: BlockAddress,
    pub transaction_id: String,
    pub block_timestamp: DateTime<Utc>,
    pub block_hash: LedgerHash,
    pub entries_hash: LedgerHash,
    /// Empty for the first block of a strand.
    pub previous_block_hash: LedgerHash,
    /// Every hash in the block's Merkle base.
    pub entries_hash_list: Vec<LedgerHash>,
    /// The `transactionInfo` document exactly as decoded. Its hash is taken
    /// over this value, so fields unknown to [`TransactionInfo`] still count.
    pub transaction_info: Value,
    pub revisions: Vec<RevisionRecord>,
}

impl JournalBlockRecord {
    /// Decode one block from its JSON text.
    pub fn from_json(text: &str) -> Result<Self, JournalError> {
        let raw: RawBlock = serde_json::from_str(text)?;
        Self::try_from(raw)
    }

    /// Typed view of the transaction info document.
    pub fn decode_transaction_info(&self) -> Result<TransactionInfo, JournalError> {
        TransactionInfo::from_document(&self.transaction_info)
    }

    /// Decode newline-delimited blocks, in order. Blank lines are skipped.
    pub fn from_json_lines(text: &str) -> Result<Vec<Self>, JournalError> {
        text.lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(number, line)| {
                Self::from_json(line).map_err(|e| match e {
                    JournalError::Decode(msg) => {
                        JournalError::Decode(format!("line {}: {msg}", number + 1))
                    }
                    other => other,
                })
            })
            .collect()
    }
}

/// Wire shape of a block. Hash fields are optional here so that a missing
/// field is reported by name instead of decoding as the empty hash.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlock {
    block_address: Option<BlockAddress>,
    transaction_id: Option<String>,
    block_timestamp: Option<DateTime<Utc>>,
    block_hash: Option<LedgerHash>,
    entries_hash: Option<LedgerHash>,
    #[serde(default)]
    previous_block_hash: Option<LedgerHash>,
    entries_hash_list: Option<Vec<LedgerHash>>,
    transaction_info: Option<Value>,
    #[serde(default)]
    revisions: Option<Vec<RevisionRecord>>,
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, JournalError> {
    value.ok_or(JournalError::MissingField {
        record: "block",
        field,
    })
}

fn required_hash(
    value: Option<LedgerHash>,
    field: &'static str,
) -> Result<LedgerHash, JournalError> {
    required(value.filter(|h| !h.is_empty()), field)
}

impl TryFrom<RawBlock> for JournalBlockRecord {
    type Error = JournalError;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        Ok(Self {
            block_address: required(raw.block_address, "blockAddress")?,
            transaction_id: required(raw.transaction_id, "transactionId")?,
            block_timestamp: required(raw.block_timestamp, "blockTimestamp")?,
            block_hash: required_hash(raw.block_hash, "blockHash")?,
            entries_hash: required_hash(raw.entries_hash, "entriesHash")?,
            previous_block_hash: raw.previous_block_hash.unwrap_or_default(),
            entries_hash_list: required(raw.entries_hash_list, "entriesHashList")?,
            transaction_info: required(
                raw.transaction_info.filter(|v| !v.is_null()),
                "transactionInfo",
            )?,
            revisions: raw.revisions.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_support;

    #[test]
    fn json_roundtrip_keeps_wire_names() {
        let block = test_support::block(3, LedgerHash::from_array([9; 32]));
        let text = serde_json::to_string(&block).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert!(value.get("entriesHashList").is_some());
        assert!(value.get("previousBlockHash").is_some());
        assert_eq!(value["blockAddress"]["sequenceNo"], 3);
        assert_eq!(JournalBlockRecord::from_json(&text).unwrap(), block);
    }

    #[test]
    fn previous_hash_may_be_absent() {
        let block = test_support::block(0, LedgerHash::empty());
        let mut value = serde_json::to_value(&block).unwrap();
        value.as_object_mut().unwrap().remove("previousBlockHash");
        let parsed = JournalBlockRecord::from_json(&value.to_string()).unwrap();
        assert!(parsed.previous_block_hash.is_empty());
    }

    #[test]
    fn missing_block_hash_is_named() {
        let block = test_support::block(1, LedgerHash::empty());
        let mut value = serde_json::to_value(&block).unwrap();
        value.as_object_mut().unwrap().remove("blockHash");
        assert_eq!(
            JournalBlockRecord::from_json(&value.to_string()).unwrap_err(),
            JournalError::MissingField {
                record: "block",
                field: "blockHash"
            }
        );
    }

    #[test]
    fn wrong_hash_length_is_rejected() {
        let block = test_support::block(1, LedgerHash::empty());
        let mut value = serde_json::to_value(&block).unwrap();
        value["entriesHash"] = json!("AAAA");
        assert!(matches!(
            JournalBlockRecord::from_json(&value.to_string()),
            Err(JournalError::Decode(_))
        ));
    }

    #[test]
    fn malformed_revision_fails_block_decode() {
        let block = test_support::block(1, LedgerHash::empty());
        let mut value = serde_json::to_value(&block).unwrap();
        value["revisions"][0]
            .as_object_mut()
            .unwrap()
            .remove("metadata");
        let err = JournalBlockRecord::from_json(&value.to_string()).unwrap_err();
        assert!(err.to_string().contains("metadata"), "{err}");
    }

    #[test]
    fn json_lines_preserve_order() {
        let blocks = test_support::chain(3);
        let text = blocks
            .iter()
            .map(|b| serde_json::to_string(b).unwrap())
            .collect::<Vec<_>>()
            .join("\n\n");
        let parsed = JournalBlockRecord::from_json_lines(&text).unwrap();
        assert_eq!(parsed, blocks);
    }

    #[test]
    fn json_lines_report_line_number() {
        let good = serde_json::to_string(&test_support::block(0, LedgerHash::empty())).unwrap();
        let text = format!("{good}\n{{not json");
        let err = JournalBlockRecord::from_json_lines(&text).unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
    }

    #[test]
    fn transaction_info_is_kept_as_decoded() {
        let block = test_support::block(2, LedgerHash::empty());
        let mut value = serde_json::to_value(&block).unwrap();
        value["transactionInfo"]["statements"][0]
            .as_object_mut()
            .unwrap()
            .remove("statementDigest");
        value["transactionInfo"]["origin"] = json!("console");
        let parsed = JournalBlockRecord::from_json(&value.to_string()).unwrap();
        assert_eq!(parsed.transaction_info, value["transactionInfo"]);

        let view = parsed.decode_transaction_info().unwrap();
        assert_eq!(view.statements[0].statement, "INSERT INTO Person ?");
        assert!(view.statements[0].statement_digest.is_empty());
    }

    #[test]
    fn null_transaction_info_is_missing() {
        let block = test_support::block(1, LedgerHash::empty());
        let mut value = serde_json::to_value(&block).unwrap();
        value["transactionInfo"] = Value::Null;
        assert_eq!(
            JournalBlockRecord::from_json(&value.to_string()).unwrap_err(),
            JournalError::MissingField {
                record: "block",
                field: "transactionInfo"
            }
        );
    }
}
