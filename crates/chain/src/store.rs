// Path: crates/chain/src/store.rs

//! Store traits and the in-memory reference store.
//!
//! Every persistent-store call is `async`: these are the only suspension
//! points of the chain writer. Real deployments back this trait with a
//! database engine; the in-memory implementation here serves tests and
//! light embedding.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;

use nomen_types::block::Block;
use nomen_types::error::ChainError;
use nomen_types::hash::Hash;
use nomen_types::tx::{Outpoint, Output, Transaction};

use crate::auction::Auction;
use crate::entry::ChainEntry;
use crate::undo::UndoNames;

/// Persistent storage consumed by the chain writer.
#[async_trait]
pub trait ChainStore: Send + Sync {
    /// Fetches an entry by block hash (main chain or not).
    async fn get_entry(&self, hash: &Hash) -> Result<Option<ChainEntry>, ChainError>;
    /// Persists an entry.
    async fn save_entry(&self, entry: &ChainEntry) -> Result<(), ChainError>;

    /// Fetches a full block by hash.
    async fn get_block(&self, hash: &Hash) -> Result<Option<Block>, ChainError>;
    /// Persists a full block.
    async fn save_block(&self, block: &Block) -> Result<(), ChainError>;

    /// Hash of the main-chain block at `height`, if any.
    async fn get_main_hash(&self, height: u32) -> Result<Option<Hash>, ChainError>;
    /// Marks `hash` as the main-chain block at `height`.
    async fn set_main(&self, height: u32, hash: &Hash) -> Result<(), ChainError>;
    /// Clears the main-chain marker at `height`.
    async fn clear_main(&self, height: u32) -> Result<(), ChainError>;

    /// The persisted tip hash.
    async fn get_tip(&self) -> Result<Option<Hash>, ChainError>;
    /// Persists the tip hash.
    async fn set_tip(&self, hash: &Hash) -> Result<(), ChainError>;

    /// Fetches an auction record.
    async fn get_auction(&self, name_hash: &Hash) -> Result<Option<Auction>, ChainError>;
    /// Writes an auction record.
    async fn put_auction(&self, auction: &Auction) -> Result<(), ChainError>;
    /// Deletes an auction record.
    async fn del_auction(&self, name_hash: &Hash) -> Result<(), ChainError>;
    /// All auction records, ordered by name hash.
    async fn all_auctions(&self) -> Result<BTreeMap<Hash, Auction>, ChainError>;

    /// Resolves a previously-connected output.
    async fn get_output(&self, outpoint: &Outpoint) -> Result<Option<Output>, ChainError>;
    /// Indexes every output of a connected transaction.
    async fn save_outputs(&self, tx: &Transaction) -> Result<(), ChainError>;

    /// Persists a block's undo log.
    async fn save_undo(&self, hash: &Hash, undo: &UndoNames) -> Result<(), ChainError>;
    /// Fetches a block's undo log.
    async fn get_undo(&self, hash: &Hash) -> Result<Option<UndoNames>, ChainError>;
}

#[derive(Default)]
struct MemoryInner {
    entries: HashMap<Hash, ChainEntry>,
    blocks: HashMap<Hash, Block>,
    main: HashMap<u32, Hash>,
    tip: Option<Hash>,
    auctions: BTreeMap<Hash, Auction>,
    outputs: HashMap<Outpoint, Output>,
    undos: HashMap<Hash, UndoNames>,
}

/// A heap-backed [`ChainStore`] for tests and light embedding.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    fn with<T>(&self, f: impl FnOnce(&mut MemoryInner) -> T) -> Result<T, ChainError> {
        match self.inner.lock() {
            Ok(mut inner) => Ok(f(&mut inner)),
            Err(_) => Err(ChainError::Store("memory store poisoned".into())),
        }
    }
}

#[async_trait]
impl ChainStore for MemoryStore {
    async fn get_entry(&self, hash: &Hash) -> Result<Option<ChainEntry>, ChainError> {
        self.with(|s| s.entries.get(hash).cloned())
    }

    async fn save_entry(&self, entry: &ChainEntry) -> Result<(), ChainError> {
        self.with(|s| {
            s.entries.insert(entry.hash, entry.clone());
        })
    }

    async fn get_block(&self, hash: &Hash) -> Result<Option<Block>, ChainError> {
        self.with(|s| s.blocks.get(hash).cloned())
    }

    async fn save_block(&self, block: &Block) -> Result<(), ChainError> {
        self.with(|s| {
            s.blocks.insert(block.hash(), block.clone());
        })
    }

    async fn get_main_hash(&self, height: u32) -> Result<Option<Hash>, ChainError> {
        self.with(|s| s.main.get(&height).copied())
    }

    async fn set_main(&self, height: u32, hash: &Hash) -> Result<(), ChainError> {
        self.with(|s| {
            s.main.insert(height, *hash);
        })
    }

    async fn clear_main(&self, height: u32) -> Result<(), ChainError> {
        self.with(|s| {
            s.main.remove(&height);
        })
    }

    async fn get_tip(&self) -> Result<Option<Hash>, ChainError> {
        self.with(|s| s.tip)
    }

    async fn set_tip(&self, hash: &Hash) -> Result<(), ChainError> {
        self.with(|s| {
            s.tip = Some(*hash);
        })
    }

    async fn get_auction(&self, name_hash: &Hash) -> Result<Option<Auction>, ChainError> {
        self.with(|s| s.auctions.get(name_hash).cloned())
    }

    async fn put_auction(&self, auction: &Auction) -> Result<(), ChainError> {
        self.with(|s| {
            s.auctions.insert(auction.name_hash, auction.clone());
        })
    }

    async fn del_auction(&self, name_hash: &Hash) -> Result<(), ChainError> {
        self.with(|s| {
            s.auctions.remove(name_hash);
        })
    }

    async fn all_auctions(&self) -> Result<BTreeMap<Hash, Auction>, ChainError> {
        self.with(|s| s.auctions.clone())
    }

    async fn get_output(&self, outpoint: &Outpoint) -> Result<Option<Output>, ChainError> {
        self.with(|s| s.outputs.get(outpoint).cloned())
    }

    async fn save_outputs(&self, tx: &Transaction) -> Result<(), ChainError> {
        let txid = tx.txid();
        self.with(|s| {
            for (index, output) in tx.outputs.iter().enumerate() {
                s.outputs
                    .insert(Outpoint::new(txid, index as u32), output.clone());
            }
        })
    }

    async fn save_undo(&self, hash: &Hash, undo: &UndoNames) -> Result<(), ChainError> {
        self.with(|s| {
            s.undos.insert(*hash, undo.clone());
        })
    }

    async fn get_undo(&self, hash: &Hash) -> Result<Option<UndoNames>, ChainError> {
        self.with(|s| s.undos.get(hash).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nomen_types::hash::hash_name;
    use nomen_types::tx::{Address, Input};

    #[tokio::test]
    async fn auction_crud() {
        let store = MemoryStore::new();
        let nh = hash_name(b"crud");
        assert!(store.get_auction(&nh).await.unwrap().is_none());

        let mut auction = Auction::unknown(nh);
        auction.open(b"crud", 3);
        store.put_auction(&auction).await.unwrap();
        assert_eq!(store.get_auction(&nh).await.unwrap(), Some(auction));
        assert_eq!(store.all_auctions().await.unwrap().len(), 1);

        store.del_auction(&nh).await.unwrap();
        assert!(store.get_auction(&nh).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn output_index() {
        let store = MemoryStore::new();
        let tx = Transaction {
            version: 0,
            inputs: vec![Input::from_outpoint(Outpoint::NULL)],
            outputs: vec![
                Output::plain(1, Address::from_key_hash([1; 20])),
                Output::plain(2, Address::from_key_hash([2; 20])),
            ],
            locktime: 0,
        };
        store.save_outputs(&tx).await.unwrap();
        let op = Outpoint::new(tx.txid(), 1);
        assert_eq!(store.get_output(&op).await.unwrap().unwrap().value, 2);
        assert!(store
            .get_output(&Outpoint::new(tx.txid(), 9))
            .await
            .unwrap()
            .is_none());
    }
}
