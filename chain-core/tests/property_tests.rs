//! Property-based tests for the audit chain invariants
//!
//! These tests use proptest to verify the critical invariants:
//! - Range containment: generated values stay inside the requested bounds
//! - Uniqueness: unique mode never produces duplicates
//! - Chain integrity: links and hashes hold for arbitrary seal sequences
//! - Buffer schedule: a full rotation with no insertions drains every slot

use chain_core::{
    buffer::DeferredBuffer,
    generator::{generate_floats, generate_integers},
    types::{Block, Record},
    Chain,
};
use proptest::prelude::*;
use std::collections::BTreeMap;

/// Strategy for valid integer bounds (min <= max)
fn bounds_strategy() -> impl Strategy<Value = (i64, i64)> {
    (-1_000i64..1_000).prop_flat_map(|min| (Just(min), min..min + 200))
}

/// Strategy for a unique-mode case: count never exceeds the range size
fn unique_case_strategy() -> impl Strategy<Value = (i64, i64, u32)> {
    bounds_strategy().prop_flat_map(|(min, max)| {
        let range_size = (max - min) as u32 + 1;
        (Just(min), Just(max), 1..=range_size.min(64))
    })
}

/// Strategy for audit records
fn record_strategy() -> impl Strategy<Value = Record> {
    ("[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}", 1u32..20).prop_map(
        |(requester, count)| {
            let values: Vec<i64> = (0..count as i64).collect();
            let stats: BTreeMap<i64, u64> = values.iter().map(|v| (*v, 1)).collect();
            Record {
                requester,
                min: 0.0,
                max: count as f64,
                count,
                unique: false,
                generation_time: "1ms".to_string(),
                random_numbers: Some(values),
                random_floats: None,
                stats: Some(stats),
                request_details: format!("min=0&max={count}&count={count}&flo=false&unique=false"),
            }
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: generated integers always fall inside [min, max]
    #[test]
    fn prop_integers_in_range((min, max) in bounds_strategy(), count in 1u32..64) {
        let generation = generate_integers(min, max, count, false).unwrap();

        prop_assert_eq!(generation.values.len(), count as usize);
        for value in &generation.values {
            prop_assert!((min..=max).contains(value));
        }
    }

    /// Property: stats counts exactly account for every generated value
    #[test]
    fn prop_stats_account_for_all_values((min, max) in bounds_strategy(), count in 1u32..64) {
        let generation = generate_integers(min, max, count, false).unwrap();

        let total: u64 = generation.stats.values().sum();
        prop_assert_eq!(total, u64::from(count));

        for (value, occurrences) in &generation.stats {
            let seen = generation.values.iter().filter(|v| *v == value).count() as u64;
            prop_assert_eq!(seen, *occurrences);
        }
    }

    /// Property: unique mode yields no duplicates and every count is 1
    #[test]
    fn prop_unique_mode_distinct((min, max, count) in unique_case_strategy()) {
        let generation = generate_integers(min, max, count, true).unwrap();

        prop_assert_eq!(generation.values.len(), count as usize);

        let mut sorted = generation.values.clone();
        sorted.sort_unstable();
        sorted.dedup();
        prop_assert_eq!(sorted.len(), count as usize);

        for occurrences in generation.stats.values() {
            prop_assert_eq!(*occurrences, 1);
        }
    }

    /// Property: generated floats fall inside the half-open [min, max)
    #[test]
    fn prop_floats_in_half_open_range(min in -500.0f64..500.0, span in 0.001f64..100.0, count in 1u32..64) {
        let max = min + span;
        let values = generate_floats(min, max, count).unwrap();

        prop_assert_eq!(values.len(), count as usize);
        for value in &values {
            prop_assert!(*value >= min && *value < max);
        }
    }

    /// Property: arbitrary seal sequences keep the chain verifiable
    #[test]
    fn prop_chain_integrity(batches in prop::collection::vec(
        prop::collection::vec(record_strategy(), 1..4), 1..8
    )) {
        let mut chain = Chain::new();

        for batch in &batches {
            let block = chain.seal_next(batch).unwrap();
            chain.push(block);
        }

        chain.verify().unwrap();
        prop_assert_eq!(chain.len(), batches.len() + 1);

        // Chain position matches the block identifier.
        for (position, block) in chain.blocks().iter().enumerate() {
            prop_assert_eq!(block.id as usize, position);
        }
    }

    /// Property: recomputing a sealed block's hash reproduces it exactly
    #[test]
    fn prop_hash_recomputation(records in prop::collection::vec(record_strategy(), 1..5)) {
        let genesis = Block::genesis();
        let block = Block::seal(&genesis, &records).unwrap();

        prop_assert_eq!(block.compute_hash().unwrap(), block.hash.clone());
        prop_assert!(block.verify_hash().unwrap());
    }

    /// Property: a full rotation with no new insertions drains the buffer
    #[test]
    fn prop_buffer_drains(inserts in prop::collection::vec((0usize..20, record_strategy()), 0..30)) {
        let total = inserts.len();
        let mut buffer = DeferredBuffer::new(10);
        for (slot, record) in inserts {
            buffer.insert(slot, record);
        }

        let mut released = 0;
        for _ in 0..buffer.slot_count() {
            released += buffer.advance().len();
        }

        prop_assert_eq!(buffer.depth(), 0);
        prop_assert_eq!(released, total);
    }
}

mod integration {
    use super::*;
    use chain_core::{BlockStore, FsBlockStore};
    use tempfile::TempDir;

    #[test]
    fn test_persisted_chain_survives_reload() {
        let temp = TempDir::new().unwrap();
        let store = FsBlockStore::open(temp.path()).unwrap();

        let mut chain = Chain::new();
        for i in 0..4 {
            let records: Vec<Record> = vec![Record {
                requester: format!("10.0.0.{i}"),
                min: 1.0,
                max: 100.0,
                count: 1,
                unique: false,
                generation_time: "4ms".to_string(),
                random_numbers: Some(vec![42]),
                random_floats: None,
                stats: Some(BTreeMap::from([(42, 1)])),
                request_details: "min=1&max=100&count=1&flo=false&unique=false".to_string(),
            }];
            let block = chain.seal_next(&records).unwrap();
            store.persist(&block).unwrap();
            chain.push(block);
        }

        let reloaded = Chain::bootstrap(&store).unwrap();
        // Genesis is never persisted; everything sealed comes back intact.
        assert_eq!(reloaded.blocks(), &chain.blocks()[1..]);
        reloaded.verify().unwrap();
    }
}
