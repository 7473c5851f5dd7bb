//! Cryptographic primitives for journal verification.
//!
//! Provides SHA-256 hashing over raw and canonical JSON input, the
//! order-independent `dot` combination of two hashes, sequential Merkle
//! root computation, and proof decoding and verification against a
//! trusted digest.
//!
//! All hashing wraps the `sha2` crate; nothing here holds state.

pub mod dot;
pub mod hasher;
pub mod merkle;
pub mod proof;

pub use dot::{PairHasher, compare_hashes};
pub use hasher::{HashError, LedgerHasher};
pub use merkle::MerkleTree;
pub use proof::{Proof, ProofError, ProofVerifier};
