use jv_crypto::{Proof, ProofVerifier};
use jv_types::LedgerDigest;
use tracing::info;

use crate::block::JournalBlockRecord;
use crate::error::JournalError;
use crate::revision::RevisionRecord;
use crate::validation::BlockHashValidator;

/// Ties a revision or a block to a trusted ledger digest.
///
/// The record's own integrity is checked first; corruption there is an
/// error. The proof check itself answers `true` or `false`.
pub struct DigestVerifier;

impl DigestVerifier {
    /// Verify a document revision against a digest.
    pub fn verify_revision(
        revision: &RevisionRecord,
        digest: &LedgerDigest,
        proof: &Proof,
    ) -> Result<bool, JournalError> {
        revision.verify_hash()?;
        let verified = ProofVerifier::verify(revision.hash(), &digest.digest, proof);
        info!(
            revision = %revision.hash().short_hex(),
            verified,
            "revision checked against digest"
        );
        Ok(verified)
    }

    /// Verify a journal block against a digest, using `blockHash` as the leaf.
    pub fn verify_block(
        block: &JournalBlockRecord,
        digest: &LedgerDigest,
        proof: &Proof,
    ) -> Result<bool, JournalError> {
        BlockHashValidator::verify_block(block)?;
        let verified = ProofVerifier::verify(&block.block_hash, &digest.digest, proof);
        info!(
            address = %block.block_address,
            verified,
            "block checked against digest"
        );
        Ok(verified)
    }
}
