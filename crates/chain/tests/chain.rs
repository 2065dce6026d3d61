// Path: crates/chain/tests/chain.rs

//! End-to-end chain-writer scenarios on regtest parameters. Blocks are
//! actually mined: the harness searches the tiny regtest cuckoo graph
//! for a 4-cycle per header, so every connected block passes the same
//! verification a peer-supplied block would.

use std::collections::HashMap;
use std::hash::Hasher;
use std::sync::Arc;

use siphasher::sip::SipHasher24;

use nomen_chain::auction::{compute_blind, AuctionState};
use nomen_chain::bloom::BloomFilter;
use nomen_chain::{CancelToken, Chain, ChainEntry, ChainEvent, ChainStore, MemoryStore};
use nomen_consensus::get_reward;
use nomen_types::block::{Block, BlockHeader};
use nomen_types::codec::Encodable;
use nomen_types::constants::COIN;
use nomen_types::covenant::Covenant;
use nomen_types::error::{ChainError, CovenantError, ErrorKind};
use nomen_types::hash::{blake2b256, hash_name, Hash};
use nomen_types::network::Network;
use nomen_types::solution::Solution;
use nomen_types::tx::{Address, Input, Outpoint, Output, Transaction};

const NAME: &[u8] = b"hello";

/// Regtest cuckoo parameters, mirrored for the miner.
const EDGE_BOUND: u64 = 1 << 8;
const EASINESS: u64 = EDGE_BOUND / 2;
const NODE_MASK: u64 = (EDGE_BOUND >> 1) - 1;

fn sipnode(k0: u64, k1: u64, edge: u64, uorv: u64) -> u64 {
    let mut hasher = SipHasher24::new_with_keys(k0, k1);
    hasher.write(&(2 * edge + uorv).to_le_bytes());
    ((hasher.finish() & NODE_MASK) << 1) | uorv
}

/// Finds a 4-cycle in the header's graph, if one exists.
fn find_cycle(header_bytes: &[u8]) -> Option<Vec<u32>> {
    let seed = blake2b256(header_bytes);
    let k0 = u64::from_le_bytes(seed.0[0..8].try_into().unwrap());
    let k1 = u64::from_le_bytes(seed.0[8..16].try_into().unwrap());

    let mut by_u: HashMap<u64, Vec<(u64, u32)>> = HashMap::new();
    for nonce in 0..EASINESS as u32 {
        let u = sipnode(k0, k1, nonce as u64, 0);
        let v = sipnode(k0, k1, nonce as u64, 1);
        by_u.entry(u).or_default().push((v, nonce));
    }

    let groups: Vec<&Vec<(u64, u32)>> = by_u.values().filter(|g| g.len() >= 2).collect();
    for (gi, a) in groups.iter().enumerate() {
        for b in groups.iter().skip(gi + 1) {
            let a_map: HashMap<u64, u32> = a.iter().map(|&(v, n)| (v, n)).collect();
            let shared: Vec<(u32, u32)> = b
                .iter()
                .filter_map(|&(v, n)| a_map.get(&v).map(|&an| (an, n)))
                .collect();
            if shared.len() >= 2 {
                let mut nonces = vec![shared[0].0, shared[0].1, shared[1].0, shared[1].1];
                nonces.sort_unstable();
                nonces.dedup();
                if nonces.len() == 4 {
                    return Some(nonces);
                }
            }
        }
    }
    None
}

/// Seals a header by scanning nonces until its graph contains a cycle.
fn seal(mut header: BlockHeader) -> (BlockHeader, Solution) {
    for attempt in 0u64..10_000 {
        header.nonce[0..8].copy_from_slice(&attempt.to_le_bytes());
        if let Some(nonces) = find_cycle(&header.encode()) {
            return (header, Solution::new(nonces).unwrap());
        }
    }
    panic!("regtest graph yielded no cycle in 10k attempts");
}

struct Harness {
    chain: Chain,
    store: Arc<MemoryStore>,
}

impl Harness {
    async fn new() -> Harness {
        let store = Arc::new(MemoryStore::new());
        let genesis = nomen_genesis::genesis_for(Network::Regtest).unwrap();
        let chain = Chain::new(Network::Regtest.params(), store.clone(), genesis)
            .await
            .unwrap();
        Harness { chain, store }
    }

    fn coinbase(height: u32, salt: u64) -> Transaction {
        let mut input = Input::from_outpoint(Outpoint::NULL);
        input.witness = vec![b"mined".to_vec()];
        Transaction {
            version: 0,
            inputs: vec![input],
            outputs: vec![Output::plain(
                get_reward(height, Network::Regtest.params().halving_interval) + salt,
                Address::from_key_hash([7; 20]),
            )],
            locktime: height,
        }
    }

    /// Builds and seals a block on the current tip.
    async fn build_block(&self, txs: Vec<Transaction>, salt: u64) -> Block {
        let tip = self.chain.tip().clone();
        let height = tip.height + 1;
        let mut all = vec![Self::coinbase(height, salt)];
        all.extend(txs);

        // Covenant-invalid blocks cannot produce a root; seal them with
        // a placeholder, they are rejected before the tree check anyway.
        let tree_root = match self.chain.compute_tree_root(height, &all).await {
            Ok(root) => root,
            Err(_) => Hash::ZERO,
        };
        self.seal_on(&tip, all, tree_root)
    }

    fn seal_on(&self, parent: &ChainEntry, txs: Vec<Transaction>, tree_root: Hash) -> Block {
        let mut header = BlockHeader {
            version: 0,
            prev_block: parent.hash,
            merkle_root: Hash::ZERO,
            witness_root: Hash::ZERO,
            tree_root,
            reserved_root: Hash::ZERO,
            time: parent.time + 1,
            bits: Network::Regtest.params().pow_bits,
            nonce: [0; 20],
        };
        let probe = Block {
            header: header.clone(),
            solution: Solution::zeroed(4),
            txs,
        };
        header.merkle_root = probe.merkle_root();
        header.witness_root = probe.witness_root();
        let (header, solution) = seal(header);
        Block {
            header,
            solution,
            txs: probe.txs,
        }
    }

    async fn mine(&mut self, txs: Vec<Transaction>) -> ChainEntry {
        let block = self.build_block(txs, 0).await;
        self.chain.add_block(block).await.unwrap()
    }

    async fn mine_empty_until(&mut self, height: u32) {
        while self.chain.tip().height < height {
            self.mine(vec![]).await;
        }
    }
}

fn spend(prevout: Outpoint, outputs: Vec<Output>) -> Transaction {
    Transaction {
        version: 0,
        inputs: vec![Input::from_outpoint(prevout)],
        outputs,
        locktime: 0,
    }
}

fn covenant_output(value: u64, covenant: Covenant) -> Output {
    Output {
        value,
        address: Address::from_key_hash([9; 20]),
        covenant,
    }
}

#[tokio::test]
async fn genesis_registers_the_root_zone() {
    let harness = Harness::new().await;
    assert_eq!(harness.chain.tip().height, 0);

    let auctions = harness.store.all_auctions().await.unwrap();
    assert_eq!(auctions.len(), nomen_genesis::rootzone::ROOT_ZONE.len());
    for entry in nomen_genesis::rootzone::ROOT_ZONE {
        let record = &auctions[&hash_name(entry.name.as_bytes())];
        assert_eq!(record.state, AuctionState::Closed);
        assert!(!record.claimed, "{} should be fully registered", entry.name);
        assert_eq!(record.renewal, 0);
    }
}

#[tokio::test]
async fn restart_resumes_from_the_stored_tip() {
    let mut harness = Harness::new().await;
    harness.mine(vec![]).await;
    harness.mine(vec![]).await;
    let tip = harness.chain.tip().clone();

    let genesis = nomen_genesis::genesis_for(Network::Regtest).unwrap();
    let reopened = Chain::new(Network::Regtest.params(), harness.store.clone(), genesis)
        .await
        .unwrap();
    assert_eq!(reopened.tip(), &tip);
}

#[tokio::test]
async fn auction_happy_path_notifies_subscribers() {
    let mut harness = Harness::new().await;
    let windows = Network::Regtest.params().windows;
    let subscription = harness.chain.subscribe(64);

    let nh = hash_name(NAME);
    let nonce_a = blake2b256(b"nonce-a");
    let nonce_b = blake2b256(b"nonce-b");
    let value_a = 5 * COIN;
    let value_b = 3 * COIN;

    // 1. SETUP: two blinded bids open the auction.
    let bid_a = spend(
        Outpoint::new(blake2b256(b"funds-a"), 0),
        vec![covenant_output(
            value_a * 2,
            Covenant::Bid {
                name: NAME.to_vec(),
                blind: compute_blind(value_a, &nonce_a, &nh),
            },
        )],
    );
    let bid_b = spend(
        Outpoint::new(blake2b256(b"funds-b"), 0),
        vec![covenant_output(
            value_b * 2,
            Covenant::Bid {
                name: NAME.to_vec(),
                blind: compute_blind(value_b, &nonce_b, &nh),
            },
        )],
    );
    let bid_a_op = Outpoint::new(bid_a.txid(), 0);
    let bid_b_op = Outpoint::new(bid_b.txid(), 0);
    let open_entry = harness.mine(vec![bid_a, bid_b]).await;
    let open_height = open_entry.height;

    // The undo log keys are exactly the names the block's covenants
    // referenced: both bids touch one name.
    let undo = harness
        .store
        .get_undo(&open_entry.hash)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(undo.entries.len(), 1);
    assert_eq!(undo.entries[0], (nh, None));

    // 2. ACT: reveal both bids once the window opens, then register.
    harness.mine_empty_until(open_height + windows.bidding - 1).await;
    let reveal_a = spend(
        bid_a_op,
        vec![covenant_output(
            value_a,
            Covenant::Reveal {
                name: NAME.to_vec(),
                nonce: nonce_a,
            },
        )],
    );
    let reveal_b = spend(
        bid_b_op,
        vec![covenant_output(
            value_b,
            Covenant::Reveal {
                name: NAME.to_vec(),
                nonce: nonce_b,
            },
        )],
    );
    let reveal_a_op = Outpoint::new(reveal_a.txid(), 0);
    let reveal_entry = harness.mine(vec![reveal_a, reveal_b]).await;
    assert_eq!(reveal_entry.height, open_height + windows.bidding);

    harness
        .mine_empty_until(open_height + windows.bidding + windows.reveal - 1)
        .await;
    let register = spend(
        reveal_a_op,
        vec![covenant_output(
            value_b,
            Covenant::Register {
                name: NAME.to_vec(),
                resource: vec![0xca, 0xfe],
                tree_hash: Hash::ZERO,
            },
        )],
    );
    let register_op = Outpoint::new(register.txid(), 0);
    let register_entry = harness.mine(vec![register]).await;

    // 3. ASSERT: the winner owns the name at the second price.
    let record = harness.store.get_auction(&nh).await.unwrap().unwrap();
    assert_eq!(record.state, AuctionState::Closed);
    assert_eq!(record.highest, value_a);
    assert_eq!(record.value, value_b);
    assert_eq!(record.owner, register_op);
    assert_eq!(record.renewal, register_entry.height);

    // Connect events arrived for every block, in height order.
    let mut heights = Vec::new();
    while let Some(event) = subscription.try_recv() {
        match event {
            ChainEvent::Connect { entry, .. } => heights.push(entry.height),
            other => panic!("unexpected event {other:?}"),
        }
    }
    let expected: Vec<u32> = (open_height..=register_entry.height).collect();
    assert_eq!(heights, expected);
}

#[tokio::test]
async fn losing_bid_redeems_and_winner_cannot() {
    let mut harness = Harness::new().await;
    let windows = Network::Regtest.params().windows;
    let nh = hash_name(NAME);
    let nonce_a = blake2b256(b"na");
    let nonce_b = blake2b256(b"nb");

    let bid_a = spend(
        Outpoint::new(blake2b256(b"fa"), 0),
        vec![covenant_output(
            10 * COIN,
            Covenant::Bid {
                name: NAME.to_vec(),
                blind: compute_blind(5 * COIN, &nonce_a, &nh),
            },
        )],
    );
    let bid_b = spend(
        Outpoint::new(blake2b256(b"fb"), 0),
        vec![covenant_output(
            6 * COIN,
            Covenant::Bid {
                name: NAME.to_vec(),
                blind: compute_blind(3 * COIN, &nonce_b, &nh),
            },
        )],
    );
    let (a_op, b_op) = (
        Outpoint::new(bid_a.txid(), 0),
        Outpoint::new(bid_b.txid(), 0),
    );
    let open = harness.mine(vec![bid_a, bid_b]).await.height;

    harness.mine_empty_until(open + windows.bidding - 1).await;
    let reveal_a = spend(
        a_op,
        vec![covenant_output(
            5 * COIN,
            Covenant::Reveal {
                name: NAME.to_vec(),
                nonce: nonce_a,
            },
        )],
    );
    let reveal_b = spend(
        b_op,
        vec![covenant_output(
            3 * COIN,
            Covenant::Reveal {
                name: NAME.to_vec(),
                nonce: nonce_b,
            },
        )],
    );
    let winner_op = Outpoint::new(reveal_a.txid(), 0);
    let loser_op = Outpoint::new(reveal_b.txid(), 0);
    harness.mine(vec![reveal_a, reveal_b]).await;
    harness
        .mine_empty_until(open + windows.bidding + windows.reveal - 1)
        .await;

    // The loser reclaims its lockup.
    let redeem = spend(
        loser_op,
        vec![covenant_output(
            3 * COIN,
            Covenant::Redeem {
                name: NAME.to_vec(),
            },
        )],
    );
    harness.mine(vec![redeem]).await;

    // The winner's reveal cannot redeem.
    let bad_redeem = spend(
        winner_op,
        vec![covenant_output(
            5 * COIN,
            Covenant::Redeem {
                name: NAME.to_vec(),
            },
        )],
    );
    let block = harness.build_block(vec![bad_redeem], 0).await;
    let err = harness.chain.add_block(block).await.unwrap_err();
    assert!(matches!(
        err,
        ChainError::Covenant(CovenantError::NotWinner)
    ));
}

#[tokio::test]
async fn reorg_rolls_names_back_and_forward() {
    // 1. SETUP: the main chain carries a bid; a scratch chain built on
    // the same genesis carries a different name two blocks further.
    let mut main = Harness::new().await;
    let subscription = main.chain.subscribe(64);

    let bid_alpha = spend(
        Outpoint::new(blake2b256(b"alpha-funds"), 0),
        vec![covenant_output(
            COIN,
            Covenant::Bid {
                name: b"alpha".to_vec(),
                blind: blake2b256(b"alpha-blind"),
            },
        )],
    );
    main.mine(vec![bid_alpha]).await;
    main.mine(vec![]).await;
    let old_tip = main.chain.tip().clone();

    let mut scratch = Harness::new().await;
    let bid_beta = spend(
        Outpoint::new(blake2b256(b"beta-funds"), 0),
        vec![covenant_output(
            COIN,
            Covenant::Bid {
                name: b"beta".to_vec(),
                blind: blake2b256(b"beta-blind"),
            },
        )],
    );
    scratch.mine(vec![bid_beta]).await;
    scratch.mine(vec![]).await;
    scratch.mine(vec![]).await;
    let branch_tip = scratch.chain.tip().clone();

    // 2. ACT: feed the heavier branch into the main chain.
    while subscription.try_recv().is_some() {}
    let hashes = scratch.chain.get_hashes(1, branch_tip.height).await.unwrap();
    for hash in &hashes {
        let block = scratch.store.get_block(hash).await.unwrap().unwrap();
        main.chain.add_block(block).await.unwrap();
    }

    // 3. ASSERT: the tip moved, alpha is gone, beta exists, and the
    // store matches the directly-built branch exactly.
    assert_eq!(main.chain.tip().hash, branch_tip.hash);
    let main_auctions = main.store.all_auctions().await.unwrap();
    let scratch_auctions = scratch.store.all_auctions().await.unwrap();
    assert_eq!(main_auctions, scratch_auctions);
    assert!(!main_auctions.contains_key(&hash_name(b"alpha")));
    assert!(main_auctions.contains_key(&hash_name(b"beta")));

    // The old branch is no longer reachable through the client surface.
    assert!(main.chain.get_entry(&old_tip.hash).await.unwrap().is_none());
    assert_eq!(
        main.chain
            .get_entry(&branch_tip.hash)
            .await
            .unwrap()
            .unwrap()
            .height,
        branch_tip.height
    );

    // Disconnects arrive tip-first, then the new branch in height order.
    let mut log = Vec::new();
    while let Some(event) = subscription.try_recv() {
        match event {
            ChainEvent::Disconnect { entry } => log.push(("disconnect", entry.height)),
            ChainEvent::Connect { entry, .. } => log.push(("connect", entry.height)),
            other => panic!("unexpected event {other:?}"),
        }
    }
    assert_eq!(
        log,
        vec![
            ("disconnect", 2),
            ("disconnect", 1),
            ("connect", 1),
            ("connect", 2),
            ("connect", 3),
        ]
    );
}

#[tokio::test]
async fn expiry_reopens_bidding_at_the_exact_boundary() {
    let mut harness = Harness::new().await;
    let windows = Network::Regtest.params().windows;
    let nh = hash_name(NAME);
    let nonce = blake2b256(b"nonce");
    let value = 2 * COIN;

    // Run a one-bidder auction to CLOSED.
    let bid = spend(
        Outpoint::new(blake2b256(b"funds"), 0),
        vec![covenant_output(
            value * 2,
            Covenant::Bid {
                name: NAME.to_vec(),
                blind: compute_blind(value, &nonce, &nh),
            },
        )],
    );
    let bid_op = Outpoint::new(bid.txid(), 0);
    let open = harness.mine(vec![bid]).await.height;
    harness.mine_empty_until(open + windows.bidding - 1).await;
    let reveal = spend(
        bid_op,
        vec![covenant_output(
            value,
            Covenant::Reveal {
                name: NAME.to_vec(),
                nonce,
            },
        )],
    );
    let reveal_op = Outpoint::new(reveal.txid(), 0);
    harness.mine(vec![reveal]).await;
    harness
        .mine_empty_until(open + windows.bidding + windows.reveal - 1)
        .await;
    let register = spend(
        reveal_op,
        vec![covenant_output(
            0,
            Covenant::Register {
                name: NAME.to_vec(),
                resource: vec![1],
                tree_hash: Hash::ZERO,
            },
        )],
    );
    let renewal = harness.mine(vec![register]).await.height;

    // One block before expiry the name is still owned.
    harness.mine_empty_until(renewal + windows.expire - 2).await;
    let early_bid = spend(
        Outpoint::new(blake2b256(b"early"), 0),
        vec![covenant_output(
            COIN,
            Covenant::Bid {
                name: NAME.to_vec(),
                blind: blake2b256(b"early-blind"),
            },
        )],
    );
    let block = harness.build_block(vec![early_bid], 0).await;
    let err = harness.chain.add_block(block).await.unwrap_err();
    assert!(matches!(
        err,
        ChainError::Covenant(CovenantError::NotExpired)
    ));
    assert_eq!(err.kind(), ErrorKind::Covenant);

    // At exactly renewal + expire, bidding reopens.
    harness.mine_empty_until(renewal + windows.expire - 1).await;
    let fresh_bid = spend(
        Outpoint::new(blake2b256(b"fresh"), 0),
        vec![covenant_output(
            COIN,
            Covenant::Bid {
                name: NAME.to_vec(),
                blind: blake2b256(b"fresh-blind"),
            },
        )],
    );
    let entry = harness.mine(vec![fresh_bid]).await;
    assert_eq!(entry.height, renewal + windows.expire);
    let record = harness.store.get_auction(&nh).await.unwrap().unwrap();
    assert_eq!(record.state, AuctionState::Bidding);
    assert_eq!(record.height, renewal + windows.expire);
}

#[tokio::test]
async fn bogus_tree_root_is_rejected_as_invariant() {
    let mut harness = Harness::new().await;
    let bid = spend(
        Outpoint::new(blake2b256(b"funds"), 0),
        vec![covenant_output(
            COIN,
            Covenant::Bid {
                name: NAME.to_vec(),
                blind: blake2b256(b"blind"),
            },
        )],
    );
    // Seal a block whose header commits the parent's tree root instead
    // of the post-apply one.
    let tip = harness.chain.tip().clone();
    let height = tip.height + 1;
    let txs = vec![Harness::coinbase(height, 0), bid];
    let stale_root = tip.tree_root;
    let block = harness.seal_on(&tip, txs, stale_root);

    let err = harness.chain.add_block(block).await.unwrap_err();
    assert!(matches!(err, ChainError::BadTreeRoot { .. }));
    assert_eq!(err.kind(), ErrorKind::Invariant);
    assert!(err.is_fatal());
    // The tip did not move.
    assert_eq!(harness.chain.tip().height, tip.height);
}

#[tokio::test]
async fn stale_header_time_is_rejected() {
    let mut harness = Harness::new().await;
    harness.mine(vec![]).await;
    let tip = harness.chain.tip().clone();

    let txs = vec![Harness::coinbase(tip.height + 1, 0)];
    let tree_root = harness
        .chain
        .compute_tree_root(tip.height + 1, &txs)
        .await
        .unwrap();
    let mut block = harness.seal_on(&tip, txs, tree_root);
    // Rewind the time to the median and re-seal.
    block.header.time = tip.time.saturating_sub(1);
    let (header, solution) = {
        let mut h = block.header.clone();
        h.merkle_root = block.merkle_root();
        h.witness_root = block.witness_root();
        seal(h)
    };
    block.header = header;
    block.solution = solution;

    let err = harness.chain.add_block(block).await.unwrap_err();
    assert!(matches!(
        err,
        ChainError::Consensus(nomen_types::error::ConsensusError::TimeTooOld)
    ));
}

#[tokio::test]
async fn rescan_respects_filters_and_cancellation() {
    let mut harness = Harness::new().await;
    let bid = spend(
        Outpoint::new(blake2b256(b"funds"), 0),
        vec![covenant_output(
            COIN,
            Covenant::Bid {
                name: NAME.to_vec(),
                blind: blake2b256(b"blind"),
            },
        )],
    );
    let bid_height = harness.mine(vec![bid]).await.height;
    harness.mine(vec![]).await;
    harness.mine(vec![]).await;
    let tip_height = harness.chain.tip().height;

    // Filtered rescan: only the bid block delivers transactions beyond
    // nothing; empty blocks deliver empty tx lists.
    let subscription = harness.chain.subscribe(64);
    let mut filter = BloomFilter::new(128, 5, 1);
    filter.insert(NAME);
    subscription.set_filter(filter);

    harness
        .chain
        .rescan(&subscription, 0, &CancelToken::new())
        .await
        .unwrap();

    let mut seen = Vec::new();
    while let Some(event) = subscription.try_recv() {
        match event {
            ChainEvent::Rescan { entry, txs } => seen.push((entry.height, txs.len())),
            other => panic!("unexpected event {other:?}"),
        }
    }
    assert_eq!(seen.len() as u32, tip_height + 1);
    for (height, matched) in &seen {
        if *height == bid_height {
            assert_eq!(*matched, 1, "bid block must match the name filter");
        } else {
            assert_eq!(*matched, 0, "height {height} should not match");
        }
    }

    // An unfiltered subscription matches everything (coinbases too).
    let open = harness.chain.subscribe(64);
    harness
        .chain
        .rescan(&open, bid_height, &CancelToken::new())
        .await
        .unwrap();
    match open.recv().await {
        ChainEvent::Rescan { entry, txs } => {
            assert_eq!(entry.height, bid_height);
            assert_eq!(txs.len(), 2);
        }
        other => panic!("unexpected event {other:?}"),
    }

    // A pre-cancelled rescan yields only the final reset.
    let cancelled = harness.chain.subscribe(64);
    let token = CancelToken::new();
    token.cancel();
    harness.chain.rescan(&cancelled, 0, &token).await.unwrap();
    match cancelled.recv().await {
        ChainEvent::Reset { tip } => assert_eq!(tip.height, tip_height),
        other => panic!("unexpected event {other:?}"),
    }
    assert!(cancelled.try_recv().is_none());
}

#[tokio::test]
async fn client_surface_serves_main_chain_only() {
    let mut harness = Harness::new().await;
    let first = harness.mine(vec![]).await;
    let second = harness.mine(vec![]).await;

    let hashes = harness.chain.get_hashes(0, 100).await.unwrap();
    assert_eq!(hashes.len(), 3);
    assert_eq!(hashes[1], first.hash);
    assert_eq!(hashes[2], second.hash);

    assert_eq!(
        harness
            .chain
            .get_entry_by_height(1)
            .await
            .unwrap()
            .unwrap()
            .hash,
        first.hash
    );
    assert!(harness
        .chain
        .get_entry(&blake2b256(b"unknown"))
        .await
        .unwrap()
        .is_none());

    // Tx notifications reach subscribers as unordered mempool events.
    let subscription = harness.chain.subscribe(8);
    let tx = spend(Outpoint::new(blake2b256(b"m"), 0), vec![]);
    harness.chain.notify_tx(tx.clone());
    match subscription.recv().await {
        ChainEvent::Tx { tx: seen } => assert_eq!(seen.txid(), tx.txid()),
        other => panic!("unexpected event {other:?}"),
    }
}
