//! Builders for internally consistent journal fixtures.

use jv_crypto::{LedgerHasher, MerkleTree, PairHasher};
use jv_types::{BlockAddress, LedgerHash};
use serde_json::{Value, json};

use crate::block::JournalBlockRecord;
use crate::revision::{RevisionMetadata, RevisionRecord};

pub(crate) fn metadata(id: &str, version: u64) -> RevisionMetadata {
    RevisionMetadata {
        id: id.into(),
        version,
        tx_time: "2019-11-05T21:49:19.213Z".into(),
        tx_id: "FnQeJBAicTX0Ah32ZnVtSX".into(),
    }
}

pub(crate) fn user_revision(id: &str, version: u64, data: Value) -> RevisionRecord {
    RevisionRecord::new_user(BlockAddress::new("strand", 1), metadata(id, version), Some(data))
        .expect("fixture revision hashes")
}

/// A `transactionInfo` document for one insert into `Person`.
pub(crate) fn transaction_info(doc_id: &str) -> Value {
    json!({
        "statements": [{
            "statement": "INSERT INTO Person ?",
            "startTime": "2019-11-05T21:49:19.213Z",
            "statementDigest": LedgerHasher::digest(b"INSERT INTO Person ?").to_base64(),
        }],
        "documents": {
            doc_id: {
                "tableName": "Person",
                "tableId": "8F0TPCmdNQ6JTRpiLj2TmW",
                "statements": [0],
            }
        }
    })
}

pub(crate) fn empty_transaction_info() -> Value {
    json!({ "statements": [], "documents": {} })
}

/// A block at `seq` linked to `previous`, with all declared hashes computed.
pub(crate) fn block(seq: u64, previous: LedgerHash) -> JournalBlockRecord {
    let doc_id = format!("doc-{seq}");
    let revisions = vec![
        user_revision(&doc_id, 0, json!({"FirstName": "Raul", "Seq": seq})),
        RevisionRecord::System {
            hash: LedgerHasher::digest(format!("system-{seq}").as_bytes()),
        },
    ];
    block_with(seq, previous, transaction_info(&doc_id), revisions)
}

pub(crate) fn block_with(
    seq: u64,
    previous: LedgerHash,
    transaction_info: Value,
    revisions: Vec<RevisionRecord>,
) -> JournalBlockRecord {
    let info_hash = LedgerHasher::digest_canonical(&transaction_info).expect("fixture info hashes");
    let mut entries_hash_list = vec![info_hash];
    if !revisions.is_empty() {
        let revision_hashes: Vec<LedgerHash> = revisions.iter().map(|r| *r.hash()).collect();
        entries_hash_list.push(MerkleTree::root_hash(&revision_hashes));
    }
    let entries_hash = MerkleTree::root_hash(&entries_hash_list);
    JournalBlockRecord {
        block_address: BlockAddress::new("strand", seq),
        transaction_id: format!("tx-{seq}"),
        block_timestamp: "2019-11-05T21:49:19.213Z".parse().expect("fixture timestamp"),
        block_hash: PairHasher::dot(&entries_hash, &previous),
        entries_hash,
        previous_block_hash: previous,
        entries_hash_list,
        transaction_info,
        revisions,
    }
}

/// `count` blocks, each linked to the one before.
pub(crate) fn chain(count: u64) -> Vec<JournalBlockRecord> {
    let mut blocks = Vec::new();
    let mut previous = LedgerHash::empty();
    for seq in 0..count {
        let b = block(seq, previous);
        previous = b.block_hash;
        blocks.push(b);
    }
    blocks
}
