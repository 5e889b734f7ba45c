//! Ledger service and publish scheduler
//!
//! All mutable shared state (the sealed chain, the pending accumulator,
//! and the deferred write buffer) lives behind one process-wide exclusive
//! lock. Every insertion, buffer shift, seal, and chain append happens
//! while holding that lock; the state is small and operations are short,
//! so no finer-grained locking is used.
//!
//! The reference design's "open block" is modeled as an explicit pending
//! accumulator: records wait there until the next publish cycle promotes
//! them into a new immutable block, so a stored hash is never mutated in
//! place.

use crate::{
    buffer::DeferredBuffer,
    chain::Chain,
    metrics::Metrics,
    storage::{BlockStore, FsBlockStore},
    types::{Block, Record},
    Config, Result,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

/// Mutable state guarded by the service lock.
struct LedgerState {
    chain: Chain,
    pending: Vec<Record>,
    deferred: DeferredBuffer,
}

/// Point-in-time view of the ledger, taken under the lock.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Sealed chain in order.
    pub blocks: Vec<Block>,

    /// Records accumulated for the next sealing cycle.
    pub pending: Vec<Record>,

    /// Records per deferred slot, in schedule order.
    pub deferred_depths: Vec<usize>,
}

/// Synchronized owner of the chain, the pending accumulator, and the
/// deferred write buffer. External code never mutates that state directly.
pub struct LedgerService {
    state: Mutex<LedgerState>,
    store: Arc<dyn BlockStore>,
    metrics: Metrics,
}

impl LedgerService {
    /// Open the service against a filesystem store rooted at the
    /// configured data directory.
    pub fn open(config: &Config) -> Result<Arc<Self>> {
        let store = Arc::new(FsBlockStore::open(&config.data_dir)?);
        Self::with_store(config, store)
    }

    /// Open the service against an arbitrary block store.
    pub fn with_store(config: &Config, store: Arc<dyn BlockStore>) -> Result<Arc<Self>> {
        let chain = Chain::bootstrap(store.as_ref())?;
        let metrics = Metrics::new()?;

        Ok(Arc::new(Self {
            state: Mutex::new(LedgerState {
                chain,
                pending: Vec::new(),
                deferred: DeferredBuffer::new(config.publish.deferred_slots),
            }),
            store,
            metrics,
        }))
    }

    /// Stage a record for the next sealing cycle.
    pub fn append_immediate(&self, record: Record) {
        let mut state = self.state.lock();
        state.pending.push(record);

        self.metrics.records_appended_total.inc();
        self.metrics.pending_records.set(state.pending.len() as i64);
        tracing::debug!(pending = state.pending.len(), "record staged for next seal");
    }

    /// Schedule a record `slot` cycles into the future. The slot index is
    /// clamped into the buffer's valid range.
    pub fn append_deferred(&self, record: Record, slot: usize) {
        let mut state = self.state.lock();
        let used = state.deferred.insert(slot, record);

        self.metrics.records_deferred_total.inc();
        self.metrics.deferred_records.set(state.deferred.depth() as i64);
        tracing::debug!(slot = used, "record scheduled for a future cycle");
    }

    /// Run one publish cycle.
    ///
    /// The deferred buffer always advances, so schedules keep moving even
    /// when nothing is sealed. When content is ready, pending records are
    /// merged ahead of the due slot's records (preserving arrival order
    /// within each group), sealed into a new block, appended, and
    /// persisted. A persistence failure is surfaced to the caller but the
    /// in-memory append stands; a sealing failure puts every merged record
    /// back into the accumulator.
    pub fn publish_cycle(&self) -> Result<Option<Block>> {
        let start = Instant::now();
        let mut state = self.state.lock();

        let due = state.deferred.advance();
        self.metrics.deferred_records.set(state.deferred.depth() as i64);

        if state.pending.is_empty() && due.is_empty() {
            tracing::debug!("publish cycle: nothing ready, buffer advanced");
            return Ok(None);
        }

        let LedgerState { chain, pending, .. } = &mut *state;
        pending.extend(due);

        let sealed = chain.seal_next(pending).map_err(|err| {
            tracing::error!(error = %err, "seal failed, records kept for the next cycle");
            err
        })?;
        pending.clear();
        chain.push(sealed);

        self.metrics.blocks_sealed_total.inc();
        self.metrics.pending_records.set(0);
        self.metrics
            .seal_duration_seconds
            .observe(start.elapsed().as_secs_f64());

        let block = state.chain.last().clone();
        if let Err(err) = self.store.persist(&block) {
            self.metrics.persist_failures_total.inc();
            tracing::error!(
                block_id = block.id,
                error = %err,
                "durable write failed, block exists in memory only"
            );
            return Err(err);
        }

        Ok(Some(block))
    }

    /// Clone the current ledger state.
    pub fn snapshot(&self) -> Snapshot {
        let state = self.state.lock();
        Snapshot {
            blocks: state.chain.blocks().to_vec(),
            pending: state.pending.clone(),
            deferred_depths: state.deferred.slot_depths(),
        }
    }

    /// Fetch one block from durable storage.
    pub fn block(&self, id: u64) -> Result<Block> {
        self.store.load(id)
    }

    /// Metrics collector for this service.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

/// Spawn the periodic publish task. Runs for the life of the process;
/// cycle errors are logged and the cadence continues.
pub fn spawn_publisher(service: Arc<LedgerService>, period: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match service.publish_cycle() {
                Ok(Some(block)) => {
                    tracing::info!(
                        block_id = block.id,
                        records = block.records.len(),
                        "block sealed"
                    );
                }
                Ok(None) => tracing::debug!("no records ready, cycle skipped"),
                Err(err) => tracing::error!(error = %err, "publish cycle failed"),
            }
        }
    })
}
