//! Core types for the audit chain
//!
//! All types are designed for:
//! - Deterministic serialization (serde_json with stable field order)
//! - Tamper evidence (every sealed block carries a SHA-256 content hash)

use crate::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Sentinel hash carried by the genesis block.
pub const GENESIS_HASH: &str = "0";

/// One audit entry describing a single generation request and its result.
///
/// Exactly one of `random_numbers` / `random_floats` is populated depending
/// on the requested mode. `stats` maps each generated integer to its
/// occurrence count and is present whenever integer generation was used.
/// Immutable once created; owned by whichever buffer slot or block holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Identity of the requester (client IP at the HTTP boundary).
    pub requester: String,

    /// Lower bound of the requested range.
    pub min: f64,

    /// Upper bound of the requested range.
    pub max: f64,

    /// Number of values requested.
    pub count: u32,

    /// Whether per-call uniqueness was requested.
    pub unique: bool,

    /// Formatted elapsed time of the generation call.
    pub generation_time: String,

    /// Generated integers (integer mode only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_numbers: Option<Vec<i64>>,

    /// Generated fractions (float mode only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_floats: Option<Vec<f64>>,

    /// Value to occurrence count, ordered by key so serialization is
    /// reproducible. Always 1 per value in unique mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<BTreeMap<i64, u64>>,

    /// Opaque free-form description of the request.
    pub request_details: String,
}

/// An immutable, hash-identified batch of records, linked to its
/// predecessor by hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Monotonically increasing identifier, 0 for genesis.
    pub id: u64,

    /// RFC 3339 creation timestamp, assigned at seal time.
    pub timestamp: String,

    /// Records sealed into this block.
    #[serde(rename = "block_info")]
    pub records: Vec<Record>,

    /// Hex-encoded SHA-256 content hash.
    pub hash: String,

    /// Hash of the predecessor block, empty for genesis.
    pub previous_hash: String,
}

impl Block {
    /// Synthesize the genesis block for a fresh chain.
    pub fn genesis() -> Self {
        Self {
            id: 0,
            timestamp: Utc::now().to_rfc3339(),
            records: Vec::new(),
            hash: GENESIS_HASH.to_string(),
            previous_hash: String::new(),
        }
    }

    /// Seal a new block on top of `previous`.
    ///
    /// Pure function of (previous block, records) plus wall-clock time:
    /// `id = previous.id + 1`, predecessor hash taken from `previous`,
    /// content hash computed over the new block's own fields. A record
    /// serialization failure aborts sealing and leaves the caller's
    /// records untouched.
    pub fn seal(previous: &Block, records: &[Record]) -> Result<Block> {
        let mut block = Block {
            id: previous.id + 1,
            timestamp: Utc::now().to_rfc3339(),
            records: records.to_vec(),
            hash: String::new(),
            previous_hash: previous.hash.clone(),
        };
        block.hash = block.compute_hash()?;
        Ok(block)
    }

    /// Compute the content hash over this block's fields.
    ///
    /// Digest input is the concatenation of the decimal identifier, the
    /// timestamp, the predecessor hash, and the canonical JSON form of the
    /// record sequence.
    pub fn compute_hash(&self) -> Result<String> {
        let body = serde_json::to_vec(&self.records)?;

        let mut hasher = Sha256::new();
        hasher.update(self.id.to_string().as_bytes());
        hasher.update(self.timestamp.as_bytes());
        hasher.update(self.previous_hash.as_bytes());
        hasher.update(&body);

        Ok(hex::encode(hasher.finalize()))
    }

    /// Check the stored hash against a fresh recomputation.
    pub fn verify_hash(&self) -> Result<bool> {
        Ok(self.hash == self.compute_hash()?)
    }

    /// True for the synthetic identifier-0 block.
    pub fn is_genesis(&self) -> bool {
        self.id == 0 && self.hash == GENESIS_HASH
    }
}
