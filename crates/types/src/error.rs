// Path: crates/types/src/error.rs

//! Core error types for the Nomen Kernel.
//!
//! Errors are grouped by concern and carry a stable machine-readable code
//! via [`ErrorCode`]. The chain-facing [`ChainError`] additionally maps
//! every failure onto one of the five recovery classes in
//! [`ErrorKind`], which the chain writer uses to decide between rejecting
//! an input and halting.

use thiserror::Error;

use crate::hash::Hash;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// The five recovery classes of the consensus core.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input; reject it, no state change.
    Parse,
    /// A block violated a consensus rule; reject the block.
    Consensus,
    /// An illegal covenant transition; reject the containing block.
    Covenant,
    /// The database contradicts itself; the chain writer must halt.
    Invariant,
    /// A store read or write failed; bubbled to the caller.
    Environmental,
}

/// Errors produced while decoding consensus wire data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The input ended before the value was complete.
    #[error("Unexpected end of input")]
    UnexpectedEnd,
    /// Bytes remained after the value was fully decoded.
    #[error("{0} trailing byte(s) after value")]
    TrailingBytes(usize),
    /// A compact-size prefix was not minimally encoded.
    #[error("Non-canonical length prefix")]
    NonCanonicalLength,
    /// A length-prefixed field exceeded its consensus bound.
    #[error("Oversized field: {0}")]
    Oversized(&'static str),
    /// A field held a structurally invalid value.
    #[error("Malformed field: {0}")]
    Malformed(&'static str),
}

impl ErrorCode for CodecError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnexpectedEnd => "CODEC_UNEXPECTED_END",
            Self::TrailingBytes(_) => "CODEC_TRAILING_BYTES",
            Self::NonCanonicalLength => "CODEC_NON_CANONICAL_LENGTH",
            Self::Oversized(_) => "CODEC_OVERSIZED",
            Self::Malformed(_) => "CODEC_MALFORMED",
        }
    }
}

/// Errors produced by proof-of-work and block-shape validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsensusError {
    /// The compact target decoded to zero, negative or >256 bits.
    #[error("Unusable compact target {0:#010x}")]
    BadTarget(u32),
    /// The header hash exceeds the target.
    #[error("Header hash above target")]
    HighHash,
    /// The solution arity does not match the network parameter.
    #[error("Bad solution size: expected {expected}, got {got}")]
    BadSolutionSize {
        /// Required per-network cycle length.
        expected: usize,
        /// Arity of the submitted solution.
        got: usize,
    },
    /// A cuckoo edge index is at or above the easiness bound.
    #[error("Cuckoo edge index above easiness")]
    PowTooBig,
    /// Cuckoo edge indices are not strictly increasing.
    #[error("Cuckoo edge indices not strictly increasing")]
    PowTooSmall,
    /// A cuckoo edge index is outside the graph.
    #[error("Cuckoo edge index outside graph")]
    PowNonMatching,
    /// The solution graph branches and cannot be a simple cycle.
    #[error("Cuckoo solution branches")]
    PowBranch,
    /// The solution graph dead-ends before closing.
    #[error("Cuckoo solution dead-ends")]
    PowDeadEnd,
    /// The solution cycle closes early.
    #[error("Cuckoo cycle shorter than proof size")]
    PowShortCycle,
    /// The block's transaction merkle root does not match its header.
    #[error("Merkle root mismatch")]
    BadMerkleRoot,
    /// The block's witness root does not match its header.
    #[error("Witness root mismatch")]
    BadWitnessRoot,
    /// The block exceeds a size, weight or update cap.
    #[error("Block exceeds {0} cap")]
    Oversized(&'static str),
    /// The header time is at or below the median time past.
    #[error("Header time not past median")]
    TimeTooOld,
    /// The block has no coinbase in slot zero.
    #[error("First transaction is not a coinbase")]
    BadCoinbase,
}

impl ErrorCode for ConsensusError {
    fn code(&self) -> &'static str {
        match self {
            Self::BadTarget(_) => "CONSENSUS_BAD_TARGET",
            Self::HighHash => "CONSENSUS_HIGH_HASH",
            Self::BadSolutionSize { .. } => "CONSENSUS_BAD_SOLUTION_SIZE",
            Self::PowTooBig => "CONSENSUS_POW_TOO_BIG",
            Self::PowTooSmall => "CONSENSUS_POW_TOO_SMALL",
            Self::PowNonMatching => "CONSENSUS_POW_NON_MATCHING",
            Self::PowBranch => "CONSENSUS_POW_BRANCH",
            Self::PowDeadEnd => "CONSENSUS_POW_DEAD_END",
            Self::PowShortCycle => "CONSENSUS_POW_SHORT_CYCLE",
            Self::BadMerkleRoot => "CONSENSUS_BAD_MERKLE_ROOT",
            Self::BadWitnessRoot => "CONSENSUS_BAD_WITNESS_ROOT",
            Self::Oversized(_) => "CONSENSUS_OVERSIZED_BLOCK",
            Self::TimeTooOld => "CONSENSUS_TIME_TOO_OLD",
            Self::BadCoinbase => "CONSENSUS_BAD_COINBASE",
        }
    }
}

/// Errors produced by the name-auction state machine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CovenantError {
    /// The name fails the charset or length rules.
    #[error("Invalid name")]
    InvalidName,
    /// The covenant is illegal in the auction's current state.
    #[error("Covenant illegal in state {0}")]
    WrongState(&'static str),
    /// The covenant arrived outside its height window.
    #[error("Covenant outside the {0} window")]
    OutsideWindow(&'static str),
    /// The revealed value and nonce do not hash to the committed blind.
    #[error("Reveal does not match blind")]
    BadBlind,
    /// Only the auction winner may perform this operation.
    #[error("Transaction does not spend the winning output")]
    NotWinner,
    /// The transaction does not spend the current owner outpoint.
    #[error("Transaction does not spend the owner output")]
    NotOwner,
    /// An output value disagrees with the auction record.
    #[error("Output value must be {expected}, got {got}")]
    BadValue {
        /// Value the record requires.
        expected: u64,
        /// Value the output carries.
        got: u64,
    },
    /// A RENEW named a block hash that is not on the main chain.
    #[error("Renewal anchor not on the main chain")]
    UnknownAnchor,
    /// A RENEW named a main-chain block outside the anchor window.
    #[error("Renewal anchor too old")]
    StaleAnchor,
    /// A TRANSFER is already pending for this name.
    #[error("Transfer already pending")]
    PendingTransfer,
    /// FINALIZE requires a pending transfer.
    #[error("No pending transfer")]
    NoTransfer,
    /// FINALIZE arrived before the transfer lockup elapsed.
    #[error("Transfer still locked")]
    TransferLocked,
    /// The name was revoked and is permanently unusable.
    #[error("Name is revoked")]
    Revoked,
    /// A CLAIM does not derive from the genesis claimant path.
    #[error("Claim does not derive from the genesis claimant")]
    BadProvenance,
    /// The name is not expired, so it cannot be re-opened.
    #[error("Name is not expired")]
    NotExpired,
}

impl ErrorCode for CovenantError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidName => "COVENANT_INVALID_NAME",
            Self::WrongState(_) => "COVENANT_WRONG_STATE",
            Self::OutsideWindow(_) => "COVENANT_OUTSIDE_WINDOW",
            Self::BadBlind => "COVENANT_BAD_BLIND",
            Self::NotWinner => "COVENANT_NOT_WINNER",
            Self::NotOwner => "COVENANT_NOT_OWNER",
            Self::BadValue { .. } => "COVENANT_BAD_VALUE",
            Self::UnknownAnchor => "COVENANT_UNKNOWN_ANCHOR",
            Self::StaleAnchor => "COVENANT_STALE_ANCHOR",
            Self::PendingTransfer => "COVENANT_PENDING_TRANSFER",
            Self::NoTransfer => "COVENANT_NO_TRANSFER",
            Self::TransferLocked => "COVENANT_TRANSFER_LOCKED",
            Self::Revoked => "COVENANT_REVOKED",
            Self::BadProvenance => "COVENANT_BAD_PROVENANCE",
            Self::NotExpired => "COVENANT_NOT_EXPIRED",
        }
    }
}

/// Errors surfaced by the chain writer and its store.
#[derive(Debug, Error)]
pub enum ChainError {
    /// A wire value failed to decode.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// A consensus rule was violated.
    #[error(transparent)]
    Consensus(#[from] ConsensusError),
    /// A covenant transition was illegal.
    #[error(transparent)]
    Covenant(#[from] CovenantError),
    /// The block's parent is unknown.
    #[error("Orphan block {0}")]
    Orphan(Hash),
    /// A block or entry was requested that the store does not hold.
    #[error("Unknown block {0}")]
    UnknownBlock(Hash),
    /// The header commits to a different post-apply tree root.
    #[error("Tree root mismatch: header {header}, computed {computed}")]
    BadTreeRoot {
        /// Root committed in the header.
        header: Hash,
        /// Root computed after applying the block.
        computed: Hash,
    },
    /// An undo log could not be replayed against the store.
    #[error("Undo log inconsistent for block {0}")]
    UndoInconsistency(Hash),
    /// The persistent store failed.
    #[error("Store failure: {0}")]
    Store(String),
}

impl ChainError {
    /// Maps the error onto its recovery class.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Codec(_) => ErrorKind::Parse,
            Self::Consensus(_) | Self::Orphan(_) => ErrorKind::Consensus,
            Self::Covenant(_) => ErrorKind::Covenant,
            Self::UnknownBlock(_) => ErrorKind::Environmental,
            Self::BadTreeRoot { .. } | Self::UndoInconsistency(_) => ErrorKind::Invariant,
            Self::Store(_) => ErrorKind::Environmental,
        }
    }

    /// True when the chain writer must halt rather than continue.
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind(), ErrorKind::Invariant | ErrorKind::Environmental)
    }
}

impl ErrorCode for ChainError {
    fn code(&self) -> &'static str {
        match self {
            Self::Codec(e) => e.code(),
            Self::Consensus(e) => e.code(),
            Self::Covenant(e) => e.code(),
            Self::Orphan(_) => "CHAIN_ORPHAN",
            Self::UnknownBlock(_) => "CHAIN_UNKNOWN_BLOCK",
            Self::BadTreeRoot { .. } => "CHAIN_BAD_TREE_ROOT",
            Self::UndoInconsistency(_) => "CHAIN_UNDO_INCONSISTENT",
            Self::Store(_) => "CHAIN_STORE_FAILURE",
        }
    }
}

/// Errors produced by the genesis builder.
#[derive(Debug, Error)]
pub enum GenesisError {
    /// A root-zone entry failed validation.
    #[error("Invalid root-zone entry {0:?}")]
    InvalidEntry(String),
    /// Artifact serialization failed.
    #[error("Artifact serialization failed: {0}")]
    Artifact(String),
}

impl ErrorCode for GenesisError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidEntry(_) => "GENESIS_INVALID_ENTRY",
            Self::Artifact(_) => "GENESIS_ARTIFACT",
        }
    }
}
