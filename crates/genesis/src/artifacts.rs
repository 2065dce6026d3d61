// Path: crates/genesis/src/artifacts.rs

//! Artifact emitters.
//!
//! The rest of the system consumes the genesis blocks through three
//! deterministic renderings: a Rust constants snippet, a JSON document
//! with the base64-encoded raw blocks, and a C header carrying each raw
//! header as an escaped byte literal.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use nomen_types::block::Block;
use nomen_types::codec::Encodable;
use nomen_types::error::GenesisError;
use nomen_types::network::{Network, NETWORKS};

use crate::genesis_for;

/// Builds the genesis block of every network, in artifact order.
pub fn build_all() -> Result<Vec<(Network, Block)>, GenesisError> {
    NETWORKS
        .iter()
        .map(|&network| Ok((network, genesis_for(network)?)))
        .collect()
}

/// Renders the Rust constants snippet: one hash and one raw-size
/// constant per network.
pub fn constants_snippet(blocks: &[(Network, Block)]) -> String {
    let mut out = String::from("// Generated by nomen-genesis. Do not edit.\n\n");
    for (network, block) in blocks {
        let upper = network.as_str().to_uppercase();
        let _ = writeln!(
            out,
            "pub const {upper}_GENESIS_HASH: &str =\n    \"{}\";",
            block.hash()
        );
        let _ = writeln!(
            out,
            "pub const {upper}_GENESIS_SIZE: usize = {};\n",
            block.encode().len()
        );
    }
    out
}

/// Renders the JSON document keyed `main`/`testnet`/`regtest`/`simnet`,
/// each value the base64-encoded raw block.
pub fn raw_json(blocks: &[(Network, Block)]) -> Result<String, GenesisError> {
    let map: BTreeMap<&str, String> = blocks
        .iter()
        .map(|(network, block)| (network.as_str(), BASE64.encode(block.encode())))
        .collect();
    serde_json::to_string_pretty(&map).map_err(|e| GenesisError::Artifact(e.to_string()))
}

fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 4);
    for byte in bytes {
        let _ = write!(out, "\\x{byte:02x}");
    }
    out
}

/// Renders the C header with each network's raw 196-byte header as an
/// escaped string literal.
pub fn c_header(blocks: &[(Network, Block)]) -> String {
    let mut out = String::from(
        "/* Generated by nomen-genesis. Do not edit. */\n\
         #ifndef NOMEN_GENESIS_H\n\
         #define NOMEN_GENESIS_H\n\n",
    );
    for (network, block) in blocks {
        let header = block.header.encode();
        let _ = writeln!(
            out,
            "static const unsigned char {}_genesis_header[{}] =\n    \"{}\";\n",
            network.as_str(),
            header.len(),
            escape_bytes(&header)
        );
    }
    out.push_str("#endif /* NOMEN_GENESIS_H */\n");
    out
}
