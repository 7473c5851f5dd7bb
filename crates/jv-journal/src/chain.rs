use jv_crypto::{LedgerHasher, PairHasher};
use jv_types::{BlockAddress, LedgerHash};
use tracing::{debug, info, warn};

use crate::block::JournalBlockRecord;
use crate::error::{JournalError, MismatchKind};
use crate::validation::BlockHashValidator;

/// Summary of a successfully validated run of blocks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChainReport {
    pub blocks_verified: usize,
    pub first: Option<BlockAddress>,
    pub last: Option<BlockAddress>,
    /// `blockHash` of the last block; empty for an empty run.
    pub tip_hash: LedgerHash,
}

/// Hash chain integrity verifier.
///
/// Verifies that an ordered run of journal blocks forms a valid chain: each
/// block is internally consistent, each block's `previousBlockHash` is the
/// preceding block's `blockHash`, and each `blockHash` is the `dot` of the
/// block's entries hash with that preceding hash.
pub struct ChainValidator;

impl ChainValidator {
    /// Verify a run of blocks, stopping at the first broken block or link.
    pub fn verify_chain(blocks: &[JournalBlockRecord]) -> Result<ChainReport, JournalError> {
        let Some(first) = blocks.first() else {
            return Ok(ChainReport::default());
        };

        BlockHashValidator::verify_block(first)?;

        for pair in blocks.windows(2) {
            let (prev, curr) = (&pair[0], &pair[1]);
            BlockHashValidator::verify_block(curr)?;
            Self::verify_link(prev, curr)?;
            debug!(
                prev = %prev.block_address,
                curr = %curr.block_address,
                "chain link verified"
            );
        }

        let last = &blocks[blocks.len() - 1];
        info!(blocks = blocks.len(), tip = %last.block_address, "hash chain verified");
        Ok(ChainReport {
            blocks_verified: blocks.len(),
            first: Some(first.block_address.clone()),
            last: Some(last.block_address.clone()),
            tip_hash: last.block_hash,
        })
    }

    /// Check that `curr` links to `prev`.
    ///
    /// The second comparison repeats the block-hash check against the
    /// preceding block's hash. It is usable on its own for blocks that never
    /// went through [`BlockHashValidator`].
    pub fn verify_link(
        prev: &JournalBlockRecord,
        curr: &JournalBlockRecord,
    ) -> Result<(), JournalError> {
        if !LedgerHasher::equals(&prev.block_hash, &curr.previous_block_hash) {
            return Err(broken(curr, MismatchKind::PreviousBlockHash));
        }
        let expected = PairHasher::dot(&curr.entries_hash, &prev.block_hash);
        if !LedgerHasher::equals(&expected, &curr.block_hash) {
            return Err(broken(curr, MismatchKind::ChainBroken));
        }
        Ok(())
    }
}

fn broken(block: &JournalBlockRecord, check: MismatchKind) -> JournalError {
    warn!(address = %block.block_address, %check, "hash chain broken");
    JournalError::Mismatch {
        address: block.block_address.clone(),
        check,
    }
}
