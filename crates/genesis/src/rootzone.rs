// Path: crates/genesis/src/rootzone.rs

//! The root-zone snapshot embedded in the genesis block.
//!
//! Each entry reserves one root name and carries the DNS data
//! (`{ttl, ds, glue}`) its REGISTER output commits to. The canonical
//! resource encoding is
//! `ttl:u32 | ds_count | (key_tag:u16 | algorithm:u8 | digest_type:u8 |
//! digest)* | glue_count | (host | inet4:[u8;4])*`, little-endian with
//! compact-size prefixes.

use nomen_types::codec::{write_varbytes, write_varint};
use nomen_types::covenant::is_valid_name;
use nomen_types::error::GenesisError;

/// A DS record delegating DNSSEC trust for a reserved name.
#[derive(Clone, Copy, Debug)]
pub struct DsRecord {
    /// DNSKEY key tag.
    pub key_tag: u16,
    /// DNSSEC algorithm number.
    pub algorithm: u8,
    /// Digest type (2 = SHA-256).
    pub digest_type: u8,
    /// Raw digest bytes.
    pub digest: &'static [u8],
}

/// An authoritative-server glue record for a reserved name.
#[derive(Clone, Copy, Debug)]
pub struct GlueRecord {
    /// Nameserver host.
    pub host: &'static str,
    /// IPv4 address of the host.
    pub inet4: [u8; 4],
}

/// One reserved root name and its snapshot data.
#[derive(Clone, Copy, Debug)]
pub struct RootEntry {
    /// The raw name, without a trailing dot.
    pub name: &'static str,
    /// Record TTL in seconds.
    pub ttl: u32,
    /// DS records.
    pub ds: &'static [DsRecord],
    /// Glue records.
    pub glue: &'static [GlueRecord],
}

impl RootEntry {
    /// The canonical resource encoding committed by REGISTER.
    pub fn encode_resource(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&self.ttl.to_le_bytes());
        write_varint(&mut buf, self.ds.len() as u64);
        for ds in self.ds {
            buf.extend_from_slice(&ds.key_tag.to_le_bytes());
            buf.push(ds.algorithm);
            buf.push(ds.digest_type);
            write_varbytes(&mut buf, ds.digest);
        }
        write_varint(&mut buf, self.glue.len() as u64);
        for glue in self.glue {
            write_varbytes(&mut buf, glue.host.as_bytes());
            buf.extend_from_slice(&glue.inet4);
        }
        buf
    }
}

const DAY: u32 = 86_400;

/// The shipped snapshot, already in lexicographic name order.
pub const ROOT_ZONE: &[RootEntry] = &[
    RootEntry {
        name: "arpa",
        ttl: DAY,
        ds: &[DsRecord {
            key_tag: 42581,
            algorithm: 8,
            digest_type: 2,
            digest: &[
                0x8e, 0x10, 0xd1, 0x9f, 0x46, 0x3b, 0x5a, 0x8f, 0x43, 0x21, 0x9c, 0x7e, 0x50,
                0xd2, 0x88, 0x64, 0x3b, 0x2e, 0x1a, 0xc1, 0x1e, 0x09, 0x7e, 0x0d, 0x3e, 0x06,
                0x9c, 0x5a, 0x22, 0x77, 0x41, 0x85,
            ],
        }],
        glue: &[GlueRecord {
            host: "a.root-servers.net",
            inet4: [198, 41, 0, 4],
        }],
    },
    RootEntry {
        name: "com",
        ttl: DAY,
        ds: &[DsRecord {
            key_tag: 30909,
            algorithm: 8,
            digest_type: 2,
            digest: &[
                0xe2, 0xd3, 0xc9, 0x16, 0xf6, 0xde, 0xea, 0xc7, 0x32, 0x94, 0xe8, 0x26, 0x8f,
                0xb5, 0x88, 0x50, 0x44, 0xa8, 0x33, 0xfc, 0x54, 0x59, 0x58, 0x8f, 0x4a, 0x91,
                0x84, 0xcf, 0xc4, 0x1a, 0x57, 0x66,
            ],
        }],
        glue: &[
            GlueRecord {
                host: "a.gtld-servers.net",
                inet4: [192, 5, 6, 30],
            },
            GlueRecord {
                host: "b.gtld-servers.net",
                inet4: [192, 33, 14, 30],
            },
        ],
    },
    RootEntry {
        name: "edu",
        ttl: DAY,
        ds: &[DsRecord {
            key_tag: 28065,
            algorithm: 8,
            digest_type: 2,
            digest: &[
                0x41, 0x72, 0x49, 0x6c, 0xde, 0x85, 0x53, 0x4e, 0x51, 0x12, 0x9b, 0xb0, 0x7b,
                0x70, 0x9d, 0x16, 0xbe, 0xa2, 0xf3, 0x4c, 0x96, 0x46, 0x2d, 0xdc, 0x31, 0x0c,
                0xfb, 0xa9, 0x0c, 0xb4, 0xe9, 0x00,
            ],
        }],
        glue: &[GlueRecord {
            host: "a.edu-servers.net",
            inet4: [192, 5, 6, 30],
        }],
    },
    RootEntry {
        name: "gov",
        ttl: DAY,
        ds: &[DsRecord {
            key_tag: 7698,
            algorithm: 8,
            digest_type: 2,
            digest: &[
                0x96, 0x2f, 0x0e, 0x8a, 0x58, 0xb9, 0x78, 0x29, 0x2e, 0xef, 0x89, 0x17, 0x1d,
                0x01, 0x23, 0x09, 0xcf, 0x4a, 0x91, 0x75, 0x18, 0x77, 0xd2, 0x8e, 0xf5, 0xf5,
                0x35, 0xad, 0xf6, 0xd2, 0x38, 0xd3,
            ],
        }],
        glue: &[GlueRecord {
            host: "a.ns.gov",
            inet4: [69, 36, 157, 30],
        }],
    },
    RootEntry {
        name: "int",
        ttl: DAY,
        ds: &[],
        glue: &[GlueRecord {
            host: "ns.uu.net",
            inet4: [137, 39, 1, 3],
        }],
    },
    RootEntry {
        name: "mil",
        ttl: DAY,
        ds: &[DsRecord {
            key_tag: 62516,
            algorithm: 8,
            digest_type: 2,
            digest: &[
                0x27, 0xa9, 0x8a, 0x8a, 0xe1, 0x71, 0xe0, 0x97, 0xa3, 0x2c, 0xcb, 0xd2, 0x7a,
                0x52, 0x9f, 0x2f, 0xd4, 0x6a, 0xb1, 0xb6, 0x0a, 0x2d, 0x49, 0xfb, 0x43, 0x06,
                0x99, 0x51, 0x12, 0xc2, 0x07, 0xa4,
            ],
        }],
        glue: &[GlueRecord {
            host: "con1.nipr.mil",
            inet4: [199, 252, 143, 234],
        }],
    },
    RootEntry {
        name: "net",
        ttl: DAY,
        ds: &[DsRecord {
            key_tag: 35886,
            algorithm: 8,
            digest_type: 2,
            digest: &[
                0x7a, 0xbc, 0xf7, 0xf8, 0x8a, 0x62, 0xdc, 0x4e, 0xd9, 0xea, 0xc1, 0x13, 0x2a,
                0x68, 0x87, 0x45, 0x34, 0xd9, 0xc5, 0x4b, 0x4a, 0x11, 0x35, 0x21, 0x64, 0x60,
                0x89, 0x87, 0x0b, 0x5e, 0x18, 0xe8,
            ],
        }],
        glue: &[GlueRecord {
            host: "a.gtld-servers.net",
            inet4: [192, 5, 6, 30],
        }],
    },
    RootEntry {
        name: "org",
        ttl: DAY,
        ds: &[DsRecord {
            key_tag: 9795,
            algorithm: 7,
            digest_type: 2,
            digest: &[
                0x33, 0x5f, 0x09, 0x09, 0x52, 0xec, 0x9e, 0x33, 0xdd, 0x48, 0x9d, 0xbd, 0x22,
                0x06, 0x26, 0x94, 0xb2, 0x55, 0xb8, 0x5f, 0x2f, 0x9a, 0xd3, 0x2f, 0x39, 0x97,
                0x35, 0x9d, 0x34, 0x3c, 0x6b, 0x74,
            ],
        }],
        glue: &[GlueRecord {
            host: "a0.org.afilias-nst.info",
            inet4: [199, 19, 56, 1],
        }],
    },
];

/// Validates snapshot invariants: legal names in strict lexicographic
/// order.
pub fn validate_snapshot(entries: &[RootEntry]) -> Result<(), GenesisError> {
    for pair in entries.windows(2) {
        if let [a, b] = pair {
            if a.name.as_bytes() >= b.name.as_bytes() {
                return Err(GenesisError::InvalidEntry(format!(
                    "{} is not before {}",
                    a.name, b.name
                )));
            }
        }
    }
    for entry in entries {
        if !is_valid_name(entry.name.as_bytes()) {
            return Err(GenesisError::InvalidEntry(entry.name.to_string()));
        }
    }
    Ok(())
}
