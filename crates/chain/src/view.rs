// Path: crates/chain/src/view.rs

//! The per-block working set over the auction store.
//!
//! A view caches a mutable copy of every auction a block touches and
//! remembers the prior state for the undo log. Views are never shared
//! across blocks: the commit of block `h` strictly happens-before the
//! view of `h + 1`, because the single chain writer owns both.

use std::collections::HashMap;

use nomen_types::error::ChainError;
use nomen_types::hash::Hash;

use crate::auction::Auction;
use crate::store::ChainStore;
use crate::undo::UndoNames;

/// A transactional batch of auction reads and writes for one block.
#[derive(Default)]
pub struct View {
    auctions: HashMap<Hash, Auction>,
    prior: HashMap<Hash, Option<Auction>>,
    order: Vec<Hash>,
}

impl View {
    /// An empty view.
    pub fn new() -> View {
        View::default()
    }

    /// Returns the view's mutable copy of an auction, loading it from
    /// the store on first touch and inserting a fresh null record if the
    /// store has none. The returned record is owned by the view.
    pub async fn get_auction(
        &mut self,
        store: &dyn ChainStore,
        name_hash: &Hash,
    ) -> Result<&mut Auction, ChainError> {
        if !self.auctions.contains_key(name_hash) {
            let loaded = store.get_auction(name_hash).await?;
            self.prior.insert(*name_hash, loaded.clone());
            self.order.push(*name_hash);
            let record = loaded.unwrap_or_else(|| Auction::unknown(*name_hash));
            self.auctions.insert(*name_hash, record);
        }
        self.auctions
            .get_mut(name_hash)
            .ok_or_else(|| ChainError::Store("view record vanished".into()))
    }

    /// Number of names this view has touched.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when no names were touched.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The touched records, keyed by name hash.
    pub fn auctions(&self) -> &HashMap<Hash, Auction> {
        &self.auctions
    }

    /// Builds the rollback log: prior states in first-touch order.
    pub fn to_undo(&self) -> UndoNames {
        UndoNames {
            entries: self
                .order
                .iter()
                .map(|nh| (*nh, self.prior.get(nh).cloned().flatten()))
                .collect(),
        }
    }

    /// Consumes the view, yielding the dirty records in first-touch
    /// order for an atomic commit.
    pub fn into_writes(mut self) -> Vec<(Hash, Auction)> {
        let mut writes = Vec::with_capacity(self.order.len());
        for nh in &self.order {
            if let Some(auction) = self.auctions.remove(nh) {
                writes.push((*nh, auction));
            }
        }
        writes
    }
}
