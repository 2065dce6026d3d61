// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # Nomen Kernel Types
//!
//! This crate is the foundational library for the Nomen Kernel, containing
//! the consensus data model (hashes, covenants, transactions, headers,
//! blocks, proof-of-work solutions), the byte-exact wire codec, the
//! per-network parameter tables, and the unified error types.
//!
//! ## Architectural Role
//!
//! As the base crate, `nomen-types` has minimal dependencies and is itself
//! a dependency for every other crate in the workspace. This structure
//! prevents circular dependencies and provides a stable, canonical
//! definition for shared types like [`block::Block`],
//! [`tx::Transaction`], [`covenant::Covenant`] and the error enums.

/// A top-level, crate-wide `Result` type alias with a default error type.
pub type Result<T, E = crate::error::ChainError> = std::result::Result<T, E>;

/// Block headers, blocks and transaction merkle commitments.
pub mod block;
/// The canonical, deterministic binary codec for all consensus-critical data.
pub mod codec;
/// Authoritative consensus constants (amounts, caps, header layout).
pub mod constants;
/// Covenants: the typed side-channel on outputs driving the name auctions.
pub mod covenant;
/// A unified set of all error types used across the workspace.
pub mod error;
/// 32-byte hashes and the Blake2b-256 helpers used for all commitments.
pub mod hash;
/// Immutable per-network parameter tables (main, testnet, regtest, simnet).
pub mod network;
/// Fixed-arity cuckoo-cycle solutions.
pub mod solution;
/// Transactions, inputs, outputs, addresses and witnesses.
pub mod tx;
