// Path: crates/chain/src/chain.rs

//! The chain writer.
//!
//! One `Chain` value owns the active tip and is the only component that
//! mutates chain state. Block application is a strict pipeline: pure
//! shape checks, header proof-of-work and cuckoo verification, covenant
//! processing through a fresh [`View`], a tree-root equality check, then
//! an atomic commit with its undo log. Reorganizations disconnect back
//! to the fork point before connecting the heavier branch, and every
//! step is published to the subscriber queues.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use tracing::{debug, info, warn};

use nomen_consensus::{verify_pow, CuckooVerifier};
use nomen_types::block::Block;
use nomen_types::codec::Encodable;
use nomen_types::constants::{
    MAX_BLOCK_SIZE, MAX_BLOCK_UPDATES, MAX_BLOCK_WEIGHT, MAX_RAW_BLOCK_SIZE, MEDIAN_TIMESPAN,
};
use nomen_types::covenant::Covenant;
use nomen_types::error::{ChainError, ConsensusError};
use nomen_types::hash::{hash_name, Hash};
use nomen_types::network::NetworkParams;
use nomen_types::tx::{Outpoint, Output, Transaction};

use crate::covenants::{apply_covenant, CovenantContext};
use crate::entry::ChainEntry;
use crate::events::{CancelToken, ChainEvent, EventQueue, Subscription};
use crate::store::ChainStore;
use crate::tree;
use crate::view::View;

/// The single logical chain writer plus the read surface it offers to
/// subscribers.
pub struct Chain {
    network: &'static NetworkParams,
    store: Arc<dyn ChainStore>,
    verifier: CuckooVerifier,
    tip: ChainEntry,
    claimer_hash: Hash,
    subscribers: Mutex<Vec<Weak<EventQueue>>>,
}

impl Chain {
    /// Opens a chain over `store`, installing `genesis` if the store is
    /// empty.
    pub async fn new(
        network: &'static NetworkParams,
        store: Arc<dyn ChainStore>,
        genesis: Block,
    ) -> Result<Chain, ChainError> {
        let claimer_hash = genesis.txs.get(1).map_or(Hash::ZERO, |tx| tx.txid());
        let verifier = CuckooVerifier::new(&network.cuckoo);

        let tip = match store.get_tip().await? {
            Some(hash) => store
                .get_entry(&hash)
                .await?
                .ok_or(ChainError::UnknownBlock(hash))?,
            None => {
                let entry = ChainEntry::from_block(&genesis, None);
                // Genesis claims bootstrap off the coinbase; provenance
                // checks key on it instead of the claimer itself.
                let boot_claimer = genesis.txs.first().map_or(Hash::ZERO, |tx| tx.txid());
                let view =
                    process_names(store.as_ref(), network, &genesis.txs, 0, boot_claimer).await?;
                commit_block(store.as_ref(), &entry, &genesis, view).await?;
                info!(hash = %entry.hash, network = network.network.as_str(), "installed genesis block");
                entry
            }
        };

        Ok(Chain {
            network,
            store,
            verifier,
            tip,
            claimer_hash,
            subscribers: Mutex::new(Vec::new()),
        })
    }

    /// The active tip entry.
    pub fn tip(&self) -> &ChainEntry {
        &self.tip
    }

    /// The network this chain runs on.
    pub fn network(&self) -> &'static NetworkParams {
        self.network
    }

    /// Registers a subscriber with a bounded event queue.
    pub fn subscribe(&self, capacity: usize) -> Subscription {
        let subscription = Subscription::new(capacity);
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(Arc::downgrade(&subscription.queue));
        }
        subscription
    }

    /// Validates and connects a block, extending the best chain,
    /// triggering a reorganization, or storing a side-chain entry.
    pub async fn add_block(&mut self, block: Block) -> Result<ChainEntry, ChainError> {
        let hash = block.hash();
        if let Some(existing) = self.store.get_entry(&hash).await? {
            debug!(hash = %hash, "duplicate block ignored");
            return Ok(existing);
        }

        self.check_block(&block)?;

        let prev = self
            .store
            .get_entry(&block.header.prev_block)
            .await?
            .ok_or(ChainError::Orphan(hash))?;
        self.check_header(&block, &prev).await?;

        let entry = ChainEntry::from_block(&block, Some(&prev));
        self.store.save_entry(&entry).await?;
        self.store.save_block(&block).await?;

        if entry.prev_block == self.tip.hash {
            self.apply_block(entry.clone(), block).await?;
        } else if entry.chainwork > self.tip.chainwork {
            self.reorganize(entry.clone()).await?;
        } else {
            debug!(hash = %entry.hash, height = entry.height, "stored side-chain block");
        }
        Ok(entry)
    }

    /// Announces a transaction accepted outside a block.
    pub fn notify_tx(&self, tx: Transaction) {
        self.publish(ChainEvent::Tx { tx });
    }

    /// Fetches a main-chain entry by hash; side-chain entries resolve to
    /// `None`.
    pub async fn get_entry(&self, hash: &Hash) -> Result<Option<ChainEntry>, ChainError> {
        let Some(entry) = self.store.get_entry(hash).await? else {
            return Ok(None);
        };
        if self.store.get_main_hash(entry.height).await? == Some(*hash) {
            Ok(Some(entry))
        } else {
            Ok(None)
        }
    }

    /// Fetches the main-chain entry at `height`.
    pub async fn get_entry_by_height(&self, height: u32) -> Result<Option<ChainEntry>, ChainError> {
        match self.store.get_main_hash(height).await? {
            Some(hash) => self.store.get_entry(&hash).await,
            None => Ok(None),
        }
    }

    /// Main-chain hashes for heights `start..=end`, clamped to the tip.
    pub async fn get_hashes(&self, start: u32, end: u32) -> Result<Vec<Hash>, ChainError> {
        let end = end.min(self.tip.height);
        let mut hashes = Vec::new();
        for height in start..=end {
            match self.store.get_main_hash(height).await? {
                Some(hash) => hashes.push(hash),
                None => break,
            }
        }
        Ok(hashes)
    }

    /// Replays history from `start` to the tip into `subscription`,
    /// filtered by its bloom predicate (no filter matches everything).
    /// Cancellation is honored between blocks and answered with a final
    /// `Reset` carrying the current tip.
    pub async fn rescan(
        &self,
        subscription: &Subscription,
        start: u32,
        cancel: &CancelToken,
    ) -> Result<(), ChainError> {
        debug!(start, tip = self.tip.height, "rescan requested");
        let mut cancelled = false;
        for height in start..=self.tip.height {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            let Some(hash) = self.store.get_main_hash(height).await? else {
                break;
            };
            let entry = self
                .store
                .get_entry(&hash)
                .await?
                .ok_or(ChainError::UnknownBlock(hash))?;
            let block = self
                .store
                .get_block(&hash)
                .await?
                .ok_or(ChainError::UnknownBlock(hash))?;
            let txs: Vec<Transaction> = block
                .txs
                .iter()
                .filter(|tx| subscription.filter_matches(tx))
                .cloned()
                .collect();
            subscription
                .queue
                .push(ChainEvent::Rescan { entry, txs }, &self.tip);
        }
        if cancelled {
            debug!("rescan cancelled");
            subscription.queue.push(
                ChainEvent::Reset {
                    tip: self.tip.clone(),
                },
                &self.tip,
            );
        }
        Ok(())
    }

    /// The tree root the store would commit after applying `txs` at
    /// `height`. Miners use this to fill the header before sealing.
    pub async fn compute_tree_root(
        &self,
        height: u32,
        txs: &[Transaction],
    ) -> Result<Hash, ChainError> {
        let claimer = if height == 0 {
            txs.first().map_or(Hash::ZERO, |tx| tx.txid())
        } else {
            self.claimer_hash
        };
        let view = process_names(self.store.as_ref(), self.network, txs, height, claimer).await?;
        let base = self.store.all_auctions().await?;
        Ok(tree::compute_root_with_view(&base, &view))
    }

    /// Pure block-shape checks: coinbase position, caps and merkle
    /// commitments.
    fn check_block(&self, block: &Block) -> Result<(), ChainError> {
        match block.txs.first() {
            Some(tx) if tx.is_coinbase() => {}
            _ => return Err(ConsensusError::BadCoinbase.into()),
        }
        if block.txs.iter().skip(1).any(Transaction::is_coinbase) {
            return Err(ConsensusError::BadCoinbase.into());
        }
        if block.base_size() > MAX_BLOCK_SIZE {
            return Err(ConsensusError::Oversized("size").into());
        }
        if block.raw_size() > MAX_RAW_BLOCK_SIZE {
            return Err(ConsensusError::Oversized("raw size").into());
        }
        if block.weight() > MAX_BLOCK_WEIGHT {
            return Err(ConsensusError::Oversized("weight").into());
        }
        if block.merkle_root() != block.header.merkle_root {
            return Err(ConsensusError::BadMerkleRoot.into());
        }
        if block.witness_root() != block.header.witness_root {
            return Err(ConsensusError::BadWitnessRoot.into());
        }
        Ok(())
    }

    /// Contextual header checks: proof-of-work, cuckoo solution and
    /// median time past.
    async fn check_header(&self, block: &Block, prev: &ChainEntry) -> Result<(), ChainError> {
        verify_pow(&block.hash(), block.header.bits)?;
        self.verifier
            .verify_header(&block.header.encode(), &block.solution)?;
        let mtp = self.median_time_past(prev).await?;
        if block.header.time <= mtp {
            return Err(ConsensusError::TimeTooOld.into());
        }
        Ok(())
    }

    /// Median of the previous [`MEDIAN_TIMESPAN`] header times.
    async fn median_time_past(&self, prev: &ChainEntry) -> Result<u64, ChainError> {
        let mut times = Vec::with_capacity(MEDIAN_TIMESPAN);
        let mut cursor = prev.clone();
        loop {
            times.push(cursor.time);
            if times.len() == MEDIAN_TIMESPAN || cursor.is_genesis() {
                break;
            }
            cursor = self
                .store
                .get_entry(&cursor.prev_block)
                .await?
                .ok_or(ChainError::UnknownBlock(cursor.prev_block))?;
        }
        times.sort_unstable();
        Ok(times.get(times.len() / 2).copied().unwrap_or(0))
    }

    /// Applies a block on top of the current tip and commits it.
    async fn apply_block(&mut self, entry: ChainEntry, block: Block) -> Result<(), ChainError> {
        let claimer = if entry.is_genesis() {
            block.txs.first().map_or(Hash::ZERO, |tx| tx.txid())
        } else {
            self.claimer_hash
        };
        let view = process_names(
            self.store.as_ref(),
            self.network,
            &block.txs,
            entry.height,
            claimer,
        )
        .await?;

        // The header commits to the post-apply tree; genesis commits the
        // empty tree by construction and is exempt.
        if !entry.is_genesis() {
            let base = self.store.all_auctions().await?;
            let computed = tree::compute_root_with_view(&base, &view);
            if computed != entry.tree_root {
                return Err(ChainError::BadTreeRoot {
                    header: entry.tree_root,
                    computed,
                });
            }
        }

        let updates = view.len();
        commit_block(self.store.as_ref(), &entry, &block, view).await?;
        self.tip = entry.clone();
        info!(
            height = entry.height,
            hash = %entry.hash,
            txs = block.txs.len(),
            names = updates,
            "connected block"
        );
        self.publish(ChainEvent::Connect {
            entry,
            txs: Arc::new(block.txs),
        });
        Ok(())
    }

    /// Rolls the tip back one block by replaying its undo log in
    /// reverse.
    async fn disconnect_tip(&mut self) -> Result<ChainEntry, ChainError> {
        let entry = self.tip.clone();
        if entry.is_genesis() {
            return Err(ChainError::Store("cannot disconnect genesis".into()));
        }
        let undo = self
            .store
            .get_undo(&entry.hash)
            .await?
            .ok_or(ChainError::UndoInconsistency(entry.hash))?;
        for (name_hash, prior) in undo.entries.iter().rev() {
            match prior {
                Some(auction) => self.store.put_auction(auction).await?,
                None => self.store.del_auction(name_hash).await?,
            }
        }
        self.store.clear_main(entry.height).await?;
        let prev = self
            .store
            .get_entry(&entry.prev_block)
            .await?
            .ok_or(ChainError::UnknownBlock(entry.prev_block))?;
        self.store.set_tip(&prev.hash).await?;
        self.tip = prev;
        info!(height = entry.height, hash = %entry.hash, "disconnected block");
        self.publish(ChainEvent::Disconnect {
            entry: entry.clone(),
        });
        Ok(entry)
    }

    /// Switches the best chain to the branch ending in `new_tip`.
    async fn reorganize(&mut self, new_tip: ChainEntry) -> Result<(), ChainError> {
        // Collect the new branch back to the fork point.
        let mut branch = vec![new_tip.clone()];
        let fork = loop {
            let last = match branch.last() {
                Some(entry) => entry,
                None => return Err(ChainError::Store("empty reorg branch".into())),
            };
            let prev = self
                .store
                .get_entry(&last.prev_block)
                .await?
                .ok_or(ChainError::UnknownBlock(last.prev_block))?;
            if self.store.get_main_hash(prev.height).await? == Some(prev.hash) {
                break prev;
            }
            branch.push(prev);
        };
        branch.reverse();

        warn!(
            from = self.tip.height,
            fork = fork.height,
            to = new_tip.height,
            "chain reorganization"
        );

        while self.tip.hash != fork.hash {
            self.disconnect_tip().await?;
        }
        for entry in branch {
            let block = self
                .store
                .get_block(&entry.hash)
                .await?
                .ok_or(ChainError::UnknownBlock(entry.hash))?;
            self.apply_block(entry, block).await?;
        }
        Ok(())
    }

    fn publish(&self, event: ChainEvent) {
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.retain(|weak| match weak.upgrade() {
                Some(queue) => {
                    queue.push(event.clone(), &self.tip);
                    true
                }
                None => false,
            });
        }
    }
}

/// Commits a processed block: undo log, auction writes, output index,
/// main-chain marker and tip, in that order.
async fn commit_block(
    store: &dyn ChainStore,
    entry: &ChainEntry,
    block: &Block,
    view: View,
) -> Result<(), ChainError> {
    let undo = view.to_undo();
    store.save_undo(&entry.hash, &undo).await?;
    for (name_hash, auction) in view.into_writes() {
        if auction.is_null() {
            store.del_auction(&name_hash).await?;
        } else {
            store.put_auction(&auction).await?;
        }
    }
    for tx in &block.txs {
        store.save_outputs(tx).await?;
    }
    store.save_entry(entry).await?;
    store.save_block(block).await?;
    store.set_main(entry.height, &entry.hash).await?;
    store.set_tip(&entry.hash).await?;
    Ok(())
}

/// Resolves a RENEW anchor to its main-chain height.
async fn resolve_anchor(
    store: &dyn ChainStore,
    block_hash: &Hash,
) -> Result<Option<u32>, ChainError> {
    let Some(entry) = store.get_entry(block_hash).await? else {
        return Ok(None);
    };
    if store.get_main_hash(entry.height).await? == Some(entry.hash) {
        Ok(Some(entry.height))
    } else {
        Ok(None)
    }
}

/// Runs every name covenant of a block through a fresh view, in
/// transaction order then output order.
async fn process_names(
    store: &dyn ChainStore,
    network: &'static NetworkParams,
    txs: &[Transaction],
    height: u32,
    claimer_hash: Hash,
) -> Result<View, ChainError> {
    let mut view = View::new();
    let mut block_outputs: HashMap<Outpoint, Output> = HashMap::new();
    let mut updates = 0usize;

    for tx in txs {
        let txid = tx.txid();

        // Resolve the outputs this transaction spends, preferring
        // outputs created earlier in the same block.
        let mut spent: HashMap<Outpoint, Output> = HashMap::new();
        for input in &tx.inputs {
            if input.prevout.is_null() {
                continue;
            }
            if let Some(output) = block_outputs.get(&input.prevout) {
                spent.insert(input.prevout, output.clone());
            } else if let Some(output) = store.get_output(&input.prevout).await? {
                spent.insert(input.prevout, output);
            }
        }

        for (index, output) in tx.outputs.iter().enumerate() {
            let outpoint = Outpoint::new(txid, index as u32);
            if let Some(name) = output.covenant.name() {
                updates += 1;
                if updates > MAX_BLOCK_UPDATES {
                    return Err(ConsensusError::Oversized("update").into());
                }
                let name_hash = hash_name(name);
                let anchor_height = match &output.covenant {
                    Covenant::Renew { block_hash, .. } => {
                        resolve_anchor(store, block_hash).await?
                    }
                    _ => None,
                };
                let auction = view.get_auction(store, &name_hash).await?;
                let ctx = CovenantContext {
                    network,
                    height,
                    outpoint,
                    output_value: output.value,
                    tx,
                    spent: &spent,
                    claimer_hash,
                    anchor_height,
                };
                apply_covenant(auction, &output.covenant, &ctx)?;
            }
            block_outputs.insert(outpoint, output.clone());
        }
    }
    Ok(view)
}
