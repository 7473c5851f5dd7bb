//! Journal records and their integrity checks.
//!
//! This crate turns decoded journal data into verification results:
//! - Revision, transaction info, and journal block record types
//! - Per-revision hash checks (`RevisionRecord::verify_hash`)
//! - `BlockHashValidator` for one block's internal consistency
//! - `ChainValidator` for an ordered run of blocks
//! - `DigestVerifier` tying a revision or block to a trusted digest
//! - Typed table records decoded from change-stream revisions

pub mod block;
pub mod chain;
pub mod error;
pub mod records;
pub mod revision;
pub mod service;
pub mod transaction;
pub mod validation;
pub mod verifier;

#[cfg(test)]
pub(crate) mod test_support;

pub use block::JournalBlockRecord;
pub use chain::{ChainReport, ChainValidator};
pub use error::{JournalError, MismatchKind};
pub use records::{
    DriversLicense, Owner, Owners, Person, RevisionDetailsRecord, TableInfo, TableRecord, Vehicle,
    VehicleRegistration,
};
pub use revision::{RevisionMetadata, RevisionRecord, UserRevision};
pub use service::{GetBlockResult, GetRevisionResult};
pub use transaction::{DocumentInfo, StatementInfo, TransactionInfo};
pub use validation::BlockHashValidator;
pub use verifier::DigestVerifier;
