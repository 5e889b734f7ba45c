//! RandLedger Chain Core
//!
//! Append-only, hash-chained audit log for numeric-generation requests.
//!
//! # Architecture
//!
//! - **Generation Engine**: cryptographically secure integers and
//!   fractions, with optional per-call uniqueness and exact occurrence
//!   statistics
//! - **Deferred Write Buffer**: fixed ring of delay slots that advances by
//!   one every publish cycle
//! - **Chain**: ordered sequence of immutable blocks linked by SHA-256
//!   content hashes
//! - **Persistence Store**: one JSON document per sealed block, recovered
//!   by directory scan at startup
//! - **Ledger Service**: single-lock owner of all shared state, driven by
//!   a periodic publish task
//!
//! # Invariants
//!
//! - Chain integrity: every non-genesis block links to its predecessor's
//!   hash and its own hash is recomputable from its fields
//! - At-most-once sealing: a record is promoted into exactly one block
//! - Scheduling bound: a record deferred by k slots seals after at least
//!   k and at most k + 1 publish cycles

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod buffer;
pub mod chain;
pub mod config;
pub mod error;
pub mod generator;
pub mod metrics;
pub mod service;
pub mod storage;
pub mod types;

// Re-exports
pub use chain::Chain;
pub use config::Config;
pub use error::{Error, Result};
pub use service::{spawn_publisher, LedgerService, Snapshot};
pub use storage::{BlockStore, FsBlockStore};
pub use types::{Block, Record};
