//! Foundation types for journal verification.
//!
//! Every other `jv` crate depends on `jv-types`.
//!
//! # Key Types
//!
//! - [`LedgerHash`]: Empty sentinel or a 32-byte SHA-256 value
//! - [`BlockAddress`]: Strand id and sequence number locating a block
//! - [`LedgerDigest`]: Trusted digest plus the opaque tip address it covers
//! - [`ValueHolder`]: Opaque text payload as returned by the ledger service

pub mod address;
pub mod digest;
pub mod error;
pub mod hash;

pub use address::BlockAddress;
pub use digest::{LedgerDigest, ValueHolder};
pub use error::TypeError;
pub use hash::{HASH_LEN, LedgerHash};
