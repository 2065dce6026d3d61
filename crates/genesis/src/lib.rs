// Path: crates/genesis/src/lib.rs
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

//! Deterministic genesis construction for the Nomen Kernel.
//!
//! Every byte of a genesis block is a function of the per-network
//! parameters and the embedded root-zone snapshot: a coinbase paying the
//! five reserved outputs, a claimer staking one CLAIM per reserved name,
//! and a registry installing each name's DNS resource. The artifact
//! emitters in [`artifacts`] render the four networks' blocks for
//! consumption elsewhere in the system.

/// Emitters for the constants snippet, raw-block JSON and C header.
pub mod artifacts;
/// The embedded root-zone snapshot.
pub mod rootzone;

use nomen_types::block::{empty_merkle_root, Block, BlockHeader};
use nomen_types::constants::{
    GENESIS_FLAGS, GENESIS_REWARD, MAX_AIRDROP, MAX_CREATORS, MAX_FOUNDATION, MAX_INVESTORS,
};
use nomen_types::covenant::Covenant;
use nomen_types::error::GenesisError;
use nomen_types::hash::Hash;
use nomen_types::network::{Network, NetworkParams};
use nomen_types::solution::Solution;
use nomen_types::tx::{Address, Input, Outpoint, Output, Transaction};

use rootzone::{validate_snapshot, RootEntry, ROOT_ZONE};

fn build_coinbase(params: &NetworkParams) -> Transaction {
    let mut input = Input::from_outpoint(Outpoint::NULL);
    input.witness = vec![GENESIS_FLAGS.to_vec()];
    Transaction {
        version: 0,
        inputs: vec![input],
        outputs: vec![
            Output::plain(GENESIS_REWARD, Address::from_key_hash(params.keys.claimant)),
            Output::plain(MAX_INVESTORS, Address::from_key_hash(params.keys.investors)),
            Output::plain(
                MAX_FOUNDATION,
                Address::from_key_hash(params.keys.foundation),
            ),
            Output::plain(MAX_CREATORS, Address::from_key_hash(params.keys.creators)),
            Output::plain(MAX_AIRDROP, Address::from_key_hash(params.keys.airdrop)),
        ],
        locktime: 0,
    }
}

fn build_claimer(
    params: &NetworkParams,
    coinbase: &Transaction,
    names: &[RootEntry],
) -> Transaction {
    let claimant = Address::from_key_hash(params.keys.claimant);
    let mut outputs = Vec::with_capacity(1 + names.len());
    outputs.push(Output::plain(GENESIS_REWARD, claimant.clone()));
    for entry in names {
        outputs.push(Output {
            value: 0,
            address: claimant.clone(),
            covenant: Covenant::Claim {
                name: entry.name.as_bytes().to_vec(),
            },
        });
    }
    Transaction {
        version: 0,
        inputs: vec![Input::from_outpoint(Outpoint::new(coinbase.txid(), 0))],
        outputs,
        locktime: 0,
    }
}

fn build_registry(
    params: &NetworkParams,
    claimer: &Transaction,
    names: &[RootEntry],
) -> Transaction {
    let claimant = Address::from_key_hash(params.keys.claimant);
    let claimer_hash = claimer.txid();
    let inputs = (0..names.len())
        .map(|index| Input::from_outpoint(Outpoint::new(claimer_hash, (index + 1) as u32)))
        .collect();
    let outputs = names
        .iter()
        .map(|entry| Output {
            value: 0,
            address: claimant.clone(),
            covenant: Covenant::Register {
                name: entry.name.as_bytes().to_vec(),
                resource: entry.encode_resource(),
                tree_hash: Hash::ZERO,
            },
        })
        .collect();
    Transaction {
        version: 0,
        inputs,
        outputs,
        locktime: 0,
    }
}

/// Builds the genesis block for one network from the shipped snapshot.
pub fn create_genesis_block(params: &NetworkParams) -> Result<Block, GenesisError> {
    validate_snapshot(ROOT_ZONE)?;

    let coinbase = build_coinbase(params);
    let claimer = build_claimer(params, &coinbase, ROOT_ZONE);
    let registry = build_registry(params, &claimer, ROOT_ZONE);

    let mut block = Block {
        header: BlockHeader {
            version: 0,
            prev_block: Hash::ZERO,
            merkle_root: Hash::ZERO,
            witness_root: Hash::ZERO,
            tree_root: empty_merkle_root(),
            reserved_root: Hash::ZERO,
            time: params.genesis_time,
            bits: params.pow_bits,
            nonce: [0u8; 20],
        },
        solution: Solution::zeroed(params.cuckoo.size),
        txs: vec![coinbase, claimer, registry],
    };
    block.header.merkle_root = block.merkle_root();
    block.header.witness_root = block.witness_root();
    Ok(block)
}

/// Builds the genesis block for `network`.
pub fn genesis_for(network: Network) -> Result<Block, GenesisError> {
    create_genesis_block(network.params())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nomen_types::codec::{Decodable, Encodable};
    use nomen_types::constants::MAX_PREMINE;
    use nomen_types::network::NETWORKS;

    #[test]
    fn construction_is_deterministic() {
        for network in NETWORKS {
            let first = genesis_for(network).unwrap();
            let second = genesis_for(network).unwrap();
            assert_eq!(first.encode(), second.encode());
            assert_eq!(first.hash(), second.hash());
        }
    }

    #[test]
    fn mainnet_genesis_roundtrips_byte_identically() {
        let block = genesis_for(Network::Main).unwrap();
        assert_eq!(block.header.time, 1514765688);
        let bytes = block.encode();
        let decoded = Block::decode(&bytes).unwrap();
        assert_eq!(decoded, block);
        assert_eq!(decoded.encode(), bytes);
        assert_eq!(decoded.hash(), block.hash());
    }

    #[test]
    fn networks_produce_distinct_blocks() {
        let main = genesis_for(Network::Main).unwrap();
        let testnet = genesis_for(Network::Testnet).unwrap();
        assert_ne!(main.hash(), testnet.hash());
    }

    #[test]
    fn coinbase_pays_the_premine() {
        let block = genesis_for(Network::Main).unwrap();
        let coinbase = &block.txs[0];
        assert!(coinbase.is_coinbase());
        assert_eq!(coinbase.inputs[0].witness[0], GENESIS_FLAGS);
        assert_eq!(coinbase.outputs.len(), 5);
        assert_eq!(coinbase.outputs[0].value, GENESIS_REWARD);
        let premine: u64 = coinbase.outputs.iter().skip(1).map(|o| o.value).sum();
        assert_eq!(premine, MAX_PREMINE);
    }

    #[test]
    fn claimer_and_registry_are_linked() {
        let block = genesis_for(Network::Main).unwrap();
        let [coinbase, claimer, registry] = &block.txs[..] else {
            panic!("expected exactly three transactions");
        };

        // Claimer redistributes the genesis reward and claims each name
        // in sorted order.
        assert_eq!(claimer.inputs[0].prevout, Outpoint::new(coinbase.txid(), 0));
        assert_eq!(claimer.outputs[0].value, GENESIS_REWARD);
        let claim_names: Vec<&[u8]> = claimer.outputs[1..]
            .iter()
            .filter_map(|o| o.covenant.name())
            .collect();
        let mut sorted = claim_names.clone();
        sorted.sort();
        assert_eq!(claim_names, sorted);
        assert_eq!(claim_names.len(), ROOT_ZONE.len());

        // Registry spends each claim output and registers the same name.
        assert_eq!(registry.inputs.len(), ROOT_ZONE.len());
        for (index, input) in registry.inputs.iter().enumerate() {
            assert_eq!(
                input.prevout,
                Outpoint::new(claimer.txid(), (index + 1) as u32)
            );
        }
        for (output, entry) in registry.outputs.iter().zip(ROOT_ZONE) {
            match &output.covenant {
                Covenant::Register {
                    name,
                    resource,
                    tree_hash,
                } => {
                    assert_eq!(name, entry.name.as_bytes());
                    assert_eq!(resource, &entry.encode_resource());
                    assert!(tree_hash.is_null());
                }
                other => panic!("expected register covenant, got {other:?}"),
            }
        }
    }

    #[test]
    fn header_commits_to_the_empty_tree() {
        let block = genesis_for(Network::Regtest).unwrap();
        assert_eq!(block.header.tree_root, empty_merkle_root());
        assert!(block.header.prev_block.is_null());
        assert_eq!(block.solution.size(), Network::Regtest.params().cuckoo.size);
        assert_eq!(block.header.merkle_root, block.merkle_root());
        assert_eq!(block.header.witness_root, block.witness_root());
    }
}
