use std::collections::HashSet;

use jv_crypto::{LedgerHasher, MerkleTree, PairHasher};
use jv_types::LedgerHash;
use tracing::{debug, warn};

use crate::block::JournalBlockRecord;
use crate::error::{JournalError, MismatchKind};

/// Checks one journal block for internal consistency.
///
/// Checks run in order and the first failure is returned:
/// 1. the transaction info hash is one of the entries hashes
/// 2. every user revision's declared hash matches its content
/// 3. the Merkle root of the revision hashes is one of the entries hashes
///    (skipped when the block has no revisions)
/// 4. the Merkle root of the entries hash list equals `entriesHash`
/// 5. `dot(entriesHash, previousBlockHash)` equals `blockHash`
pub struct BlockHashValidator;

impl BlockHashValidator {
    pub fn verify_block(block: &JournalBlockRecord) -> Result<(), JournalError> {
        let entries: HashSet<&LedgerHash> = block.entries_hash_list.iter().collect();

        let info_hash = Self::transaction_info_hash(block)?;
        if !entries.contains(&info_hash) {
            return Err(mismatch(block, MismatchKind::TransactionInfoNotInEntries));
        }

        for revision in &block.revisions {
            revision.verify_hash()?;
        }

        if let Some(revisions_hash) = Self::revisions_hash(block) {
            if !entries.contains(&revisions_hash) {
                return Err(mismatch(block, MismatchKind::RevisionsHashNotInEntries));
            }
        }

        if !LedgerHasher::equals(&Self::entries_hash(block), &block.entries_hash) {
            return Err(mismatch(block, MismatchKind::EntriesHash));
        }

        let block_hash = Self::block_hash(&block.entries_hash, &block.previous_block_hash);
        if !LedgerHasher::equals(&block_hash, &block.block_hash) {
            return Err(mismatch(block, MismatchKind::BlockHash));
        }

        debug!(
            address = %block.block_address,
            revisions = block.revisions.len(),
            "block hash verified"
        );
        Ok(())
    }

    /// Hash of the block's transaction info document, as decoded.
    pub fn transaction_info_hash(block: &JournalBlockRecord) -> Result<LedgerHash, JournalError> {
        Ok(LedgerHasher::digest_canonical(&block.transaction_info)?)
    }

    /// Merkle root of the declared revision hashes, `None` without revisions.
    pub fn revisions_hash(block: &JournalBlockRecord) -> Option<LedgerHash> {
        if block.revisions.is_empty() {
            return None;
        }
        let hashes: Vec<LedgerHash> = block.revisions.iter().map(|r| *r.hash()).collect();
        Some(MerkleTree::root_hash(&hashes))
    }

    /// Merkle root of the entries hash list.
    pub fn entries_hash(block: &JournalBlockRecord) -> LedgerHash {
        MerkleTree::root_hash(&block.entries_hash_list)
    }

    /// `dot(entries_hash, previous_block_hash)`.
    pub fn block_hash(entries_hash: &LedgerHash, previous_block_hash: &LedgerHash) -> LedgerHash {
        PairHasher::dot(entries_hash, previous_block_hash)
    }
}

fn mismatch(block: &JournalBlockRecord, check: MismatchKind) -> JournalError {
    warn!(address = %block.block_address, %check, "block validation failed");
    JournalError::Mismatch {
        address: block.block_address.clone(),
        check,
    }
}

#[cfg(test)]
mod tests {
    use jv_types::BlockAddress;
    use serde_json::json;

    use super::*;
    use crate::revision::RevisionRecord;
    use crate::test_support::{self, block_with, empty_transaction_info, transaction_info};

    fn check_of(err: JournalError) -> MismatchKind {
        match err {
            JournalError::Mismatch { check, .. } => check,
            other => panic!("expected a mismatch, got {other:?}"),
        }
    }

    /// entriesHashList = [X, Y] where X is the transaction info hash, no
    /// revisions, previous hash P.
    fn two_entry_block() -> JournalBlockRecord {
        let info = transaction_info("doc-x");
        let x = LedgerHasher::digest_canonical(&info).unwrap();
        let y = LedgerHasher::digest(b"Y");
        let p = LedgerHasher::digest(b"P");
        let entries_hash = PairHasher::dot(&x, &y);
        JournalBlockRecord {
            block_address: BlockAddress::new("strand", 10),
            transaction_id: "tx-10".into(),
            block_timestamp: "2020-01-01T00:00:00Z".parse().unwrap(),
            block_hash: PairHasher::dot(&entries_hash, &p),
            entries_hash,
            previous_block_hash: p,
            entries_hash_list: vec![x, y],
            transaction_info: info,
            revisions: vec![],
        }
    }

    #[test]
    fn two_entry_block_verifies() {
        assert!(BlockHashValidator::verify_block(&two_entry_block()).is_ok());
    }

    #[test]
    fn mutated_block_hash_fails() {
        let mut block = two_entry_block();
        block.block_hash = LedgerHasher::flip_random_bit(&block.block_hash).unwrap();
        let err = BlockHashValidator::verify_block(&block).unwrap_err();
        assert_eq!(check_of(err), MismatchKind::BlockHash);
    }

    #[test]
    fn mutated_entries_hash_fails() {
        let mut block = two_entry_block();
        block.entries_hash = LedgerHasher::digest(b"other");
        let err = BlockHashValidator::verify_block(&block).unwrap_err();
        assert_eq!(check_of(err), MismatchKind::EntriesHash);
    }

    #[test]
    fn mutated_previous_hash_fails() {
        let mut block = two_entry_block();
        block.previous_block_hash = LedgerHasher::digest(b"not P");
        let err = BlockHashValidator::verify_block(&block).unwrap_err();
        assert_eq!(check_of(err), MismatchKind::BlockHash);
    }

    #[test]
    fn mutated_entries_list_fails() {
        let mut block = two_entry_block();
        block.entries_hash_list[1] = LedgerHasher::digest(b"not Y");
        let err = BlockHashValidator::verify_block(&block).unwrap_err();
        assert_eq!(check_of(err), MismatchKind::EntriesHash);
    }

    #[test]
    fn transaction_info_not_in_entries_fails() {
        let mut block = two_entry_block();
        block.transaction_info["statements"][0]["statement"] = json!("DELETE FROM Person");
        let err = BlockHashValidator::verify_block(&block).unwrap_err();
        assert_eq!(check_of(err), MismatchKind::TransactionInfoNotInEntries);
        assert!(err_message(&block).contains("transactionInfo hash not in entries list"));
    }

    fn err_message(block: &JournalBlockRecord) -> String {
        BlockHashValidator::verify_block(block).unwrap_err().to_string()
    }

    #[test]
    fn error_names_block_address() {
        let mut block = two_entry_block();
        block.block_hash = LedgerHasher::digest(b"wrong");
        let message = err_message(&block);
        assert!(message.contains("computed block hash mismatch"), "{message}");
        assert!(message.contains("sequenceNo: 10"), "{message}");
    }

    #[test]
    fn entries_membership_ignores_order() {
        let mut block = two_entry_block();
        block.entries_hash_list.reverse();
        block.entries_hash = MerkleTree::root_hash(&block.entries_hash_list);
        block.block_hash = PairHasher::dot(&block.entries_hash, &block.previous_block_hash);
        assert!(BlockHashValidator::verify_block(&block).is_ok());
    }

    #[test]
    fn block_with_revisions_verifies() {
        let block = test_support::block(4, LedgerHasher::digest(b"prev"));
        assert!(BlockHashValidator::verify_block(&block).is_ok());
        assert!(BlockHashValidator::revisions_hash(&block).is_some());
    }

    #[test]
    fn first_block_dots_with_empty_previous() {
        let block = test_support::block(0, LedgerHash::empty());
        assert_eq!(block.block_hash, block.entries_hash);
        assert!(BlockHashValidator::verify_block(&block).is_ok());
    }

    #[test]
    fn tampered_revision_fails_before_merkle_checks() {
        let mut block = test_support::block(2, LedgerHash::empty());
        if let RevisionRecord::User(user) = &mut block.revisions[0] {
            user.data = Some(json!({"FirstName": "Mallory"}));
        }
        let err = BlockHashValidator::verify_block(&block).unwrap_err();
        assert!(matches!(check_of(err), MismatchKind::RevisionHash { .. }));
    }

    #[test]
    fn revisions_root_missing_from_entries_fails() {
        let info = empty_transaction_info();
        let revision = test_support::user_revision("doc-1", 0, json!({"a": 1}));
        let mut block = block_with(5, LedgerHash::empty(), info, vec![revision]);
        // swap in an extra revision without updating the entries list
        block.revisions.push(RevisionRecord::System {
            hash: LedgerHasher::digest(b"late"),
        });
        let err = BlockHashValidator::verify_block(&block).unwrap_err();
        assert_eq!(check_of(err), MismatchKind::RevisionsHashNotInEntries);
    }

    #[test]
    fn no_revisions_skips_revision_root() {
        let block = block_with(6, LedgerHash::empty(), empty_transaction_info(), vec![]);
        assert!(BlockHashValidator::revisions_hash(&block).is_none());
        assert!(BlockHashValidator::verify_block(&block).is_ok());
    }

    #[test]
    fn unknown_transaction_info_field_is_committed() {
        let mut block = two_entry_block();
        block.transaction_info["extra"] = json!("tampered");
        let err = BlockHashValidator::verify_block(&block).unwrap_err();
        assert_eq!(check_of(err), MismatchKind::TransactionInfoNotInEntries);
    }

    #[test]
    fn transaction_info_hashes_wire_document() {
        // no statementDigest: the hash must cover the document as sent
        let info = json!({ "statements": [{ "statement": "SELECT 1" }], "documents": {} });
        let expected =
            LedgerHasher::digest(br#"{"documents":{},"statements":[{"statement":"SELECT 1"}]}"#);
        let block = block_with(7, LedgerHash::empty(), info, vec![]);
        assert_eq!(BlockHashValidator::transaction_info_hash(&block).unwrap(), expected);
        assert!(BlockHashValidator::verify_block(&block).is_ok());
    }
}
