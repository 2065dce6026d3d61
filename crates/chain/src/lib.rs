// Path: crates/chain/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented
    )
)]

//! Chain state for the Nomen Kernel.
//!
//! A single logical chain writer owns the active tip: it derives a
//! [`entry::ChainEntry`] for each incoming block, drives the name-auction
//! state machine through a per-block [`view::View`], commits the result
//! atomically together with its [`undo::UndoNames`] log, and publishes
//! typed [`events::ChainEvent`]s to bounded per-subscriber queues.
//! Readers never block the writer; a slow subscriber loses its oldest
//! events and is handed a `Reset` to resynchronize.

/// Per-name auction records and their transitions.
pub mod auction;
/// Bloom predicates for rescan filtering.
pub mod bloom;
/// The chain writer: connect, disconnect, reorganize, rescan.
pub mod chain;
/// The covenant dispatch of the auction state machine.
pub mod covenants;
/// Chain entries: headers plus height and accumulated work.
pub mod entry;
/// Typed events and per-subscriber bounded queues.
pub mod events;
/// Store traits and the in-memory reference store.
pub mod store;
/// The name-tree commitment committed by each header.
pub mod tree;
/// Per-block rollback logs.
pub mod undo;
/// The per-block working set over the auction store.
pub mod view;

pub use auction::{Auction, AuctionState};
pub use chain::Chain;
pub use entry::ChainEntry;
pub use events::{CancelToken, ChainEvent, Subscription};
pub use store::{ChainStore, MemoryStore};
