//! Hash-linked chain of sealed blocks
//!
//! The chain is append-only: every non-genesis block's `previous_hash`
//! equals its predecessor's `hash`, and each block's own hash is
//! recomputable from its fields. There is no consensus and no fork
//! resolution; the chain exists to make the single-writer audit log
//! tamper-evident.

use crate::{
    storage::BlockStore,
    types::{Block, Record},
    Error, Result,
};

/// Ordered, append-only sequence of sealed blocks.
#[derive(Debug)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    /// Start a fresh chain containing only the genesis block.
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::genesis()],
        }
    }

    /// Reconstruct the chain from durable storage.
    ///
    /// Persisted blocks are sorted by identifier before the chain order is
    /// trusted (directory scan order is arbitrary). A chain that fails
    /// verification halts startup rather than silently truncating history.
    /// When storage is empty a genesis block is synthesized.
    pub fn bootstrap(store: &dyn BlockStore) -> Result<Self> {
        let blocks = store.load_all()?;

        if blocks.is_empty() {
            tracing::info!("no persisted blocks found, starting a fresh chain");
            return Ok(Self::new());
        }

        let chain = Self { blocks };
        chain.verify()?;
        tracing::info!(
            blocks = chain.len(),
            height = chain.last().id,
            "chain reconstructed from storage"
        );
        Ok(chain)
    }

    /// Seal a new block from `records` on top of the current last block.
    pub fn seal_next(&self, records: &[Record]) -> Result<Block> {
        Block::seal(self.last(), records)
    }

    /// Append a sealed block.
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// The most recently appended block.
    pub fn last(&self) -> &Block {
        // A chain is never empty: it starts from genesis or loaded blocks.
        self.blocks.last().expect("chain contains at least one block")
    }

    /// All blocks in chain order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// True when the chain holds no blocks. Kept for API symmetry; a
    /// constructed chain always has at least genesis.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Verify predecessor links and recompute every non-genesis hash.
    pub fn verify(&self) -> Result<()> {
        for pair in self.blocks.windows(2) {
            if pair[1].previous_hash != pair[0].hash {
                return Err(Error::ChainIntegrity(format!(
                    "block {} does not link to block {}",
                    pair[1].id, pair[0].id
                )));
            }
        }

        for block in &self.blocks {
            // The genesis sentinel hash is assigned, not computed.
            if block.is_genesis() {
                continue;
            }
            if !block.verify_hash()? {
                return Err(Error::ChainIntegrity(format!(
                    "block {} fails hash recomputation",
                    block.id
                )));
            }
        }

        Ok(())
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn record(requester: &str) -> Record {
        Record {
            requester: requester.to_string(),
            min: 1.0,
            max: 10.0,
            count: 2,
            unique: false,
            generation_time: "2ms".to_string(),
            random_numbers: Some(vec![3, 7]),
            random_floats: None,
            stats: Some(BTreeMap::from([(3, 1), (7, 1)])),
            request_details: "min=1&max=10&count=2&flo=false&unique=false".to_string(),
        }
    }

    fn chain_with_blocks(count: usize) -> Chain {
        let mut chain = Chain::new();
        for i in 0..count {
            let block = chain.seal_next(&[record(&format!("10.0.0.{i}"))]).unwrap();
            chain.push(block);
        }
        chain
    }

    #[test]
    fn test_new_chain_is_genesis_only() {
        let chain = Chain::new();
        assert_eq!(chain.len(), 1);
        assert!(chain.last().is_genesis());
        chain.verify().unwrap();
    }

    #[test]
    fn test_sealed_blocks_link() {
        let chain = chain_with_blocks(5);
        assert_eq!(chain.len(), 6);
        assert_eq!(chain.last().id, 5);
        chain.verify().unwrap();

        for pair in chain.blocks().windows(2) {
            assert_eq!(pair[1].previous_hash, pair[0].hash);
        }
    }

    #[test]
    fn test_verify_detects_tampered_record() {
        let mut chain = chain_with_blocks(3);
        chain.blocks[2].records[0].requester = "attacker".to_string();

        assert!(matches!(chain.verify(), Err(Error::ChainIntegrity(_))));
    }

    #[test]
    fn test_verify_detects_broken_link() {
        let mut chain = chain_with_blocks(3);
        chain.blocks[2].previous_hash = "deadbeef".to_string();

        assert!(matches!(chain.verify(), Err(Error::ChainIntegrity(_))));
    }

    #[test]
    fn test_chain_position_matches_identifier() {
        let chain = chain_with_blocks(4);
        for (position, block) in chain.blocks().iter().enumerate() {
            assert_eq!(block.id as usize, position);
        }
    }
}
