//! Durable block storage
//!
//! One JSON document per sealed block, named `block_<id>.json` inside the
//! data directory, so the chain can be reconstructed by a directory scan
//! at startup. The sink is a trait so the publish path can be tested
//! against a failing store and so a future variant may persist outside
//! the critical section.

use crate::{types::Block, Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

const BLOCK_PREFIX: &str = "block_";
const BLOCK_SUFFIX: &str = ".json";

/// Durable sink and source for sealed blocks.
pub trait BlockStore: Send + Sync {
    /// Durably write one sealed block.
    fn persist(&self, block: &Block) -> Result<()>;

    /// Load one block by identifier.
    fn load(&self, id: u64) -> Result<Block>;

    /// Load every persisted block, sorted by identifier.
    fn load_all(&self) -> Result<Vec<Block>>;
}

/// Filesystem-backed store.
#[derive(Debug)]
pub struct FsBlockStore {
    dir: PathBuf,
}

impl FsBlockStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, id: u64) -> PathBuf {
        self.dir.join(format!("{BLOCK_PREFIX}{id}{BLOCK_SUFFIX}"))
    }

    fn parse_block(path: &Path) -> Result<Block> {
        let data = fs::read(path)?;
        serde_json::from_slice(&data).map_err(|source| Error::Corrupt {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl BlockStore for FsBlockStore {
    fn persist(&self, block: &Block) -> Result<()> {
        let json = serde_json::to_vec_pretty(block)?;

        // Write through a temp file so a crash mid-write cannot leave a
        // half-written block unit behind.
        let tmp = self.dir.join(format!(".{BLOCK_PREFIX}{}.tmp", block.id));
        fs::write(&tmp, &json)?;
        fs::rename(&tmp, self.path_for(block.id))?;

        tracing::info!(
            block_id = block.id,
            records = block.records.len(),
            "block persisted"
        );
        Ok(())
    }

    fn load(&self, id: u64) -> Result<Block> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(Error::BlockNotFound(id));
        }
        Self::parse_block(&path)
    }

    fn load_all(&self) -> Result<Vec<Block>> {
        let mut blocks = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !name.starts_with(BLOCK_PREFIX) || !name.ends_with(BLOCK_SUFFIX) {
                continue;
            }
            blocks.push(Self::parse_block(&entry.path())?);
        }

        // Directory scan order is arbitrary; chain order comes from ids.
        blocks.sort_by_key(|block| block.id);
        Ok(blocks)
    }
}
