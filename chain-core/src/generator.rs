//! Cryptographically secure random generation engine
//!
//! Draws come from the OS entropy source via `OsRng`. Any failure of the
//! source aborts the whole call with [`Error::Entropy`](crate::Error);
//! partial results are never returned.
//!
//! The boundary layer is responsible for validating inputs before calling
//! in here: `min <= max`, `count >= 1`, and in unique mode `count` clamped
//! to the range size.

use crate::Result;
use rand::{rngs::OsRng, RngCore};
use std::collections::{BTreeMap, HashSet};

/// Denominator used to map secure integers into unit-interval fractions.
const FLOAT_RESOLUTION: u64 = 1_000_000_000;

/// Result of an integer generation call: values in draw order plus exact
/// per-value occurrence counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    /// Generated values in the order they were drawn.
    pub values: Vec<i64>,

    /// Value to occurrence count, ordered by key. Every count is 1 in
    /// unique mode.
    pub stats: BTreeMap<i64, u64>,
}

/// Draw a uniform integer in `[0, bound)` from the OS entropy source.
///
/// Uses an unbiased rejection threshold; the expected number of redraws is
/// below one for any bound.
fn secure_below(bound: u64) -> Result<u64> {
    debug_assert!(bound > 0);

    // Largest multiple of `bound` representable in a u64. Raw draws at or
    // above it would skew the modulus and are redrawn.
    let zone = u64::MAX - u64::MAX % bound;

    let mut buf = [0u8; 8];
    loop {
        OsRng.try_fill_bytes(&mut buf)?;
        let raw = u64::from_le_bytes(buf);
        if raw < zone {
            return Ok(raw % bound);
        }
    }
}

/// Generate `count` secure uniform integers in `[min, max]`.
///
/// Non-unique mode draws independently and accumulates occurrence counts.
/// Unique mode keeps drawing and discarding duplicates until `count`
/// distinct values are collected; worst-case draws are unbounded but the
/// expected number stays small while `count` is below the range size.
pub fn generate_integers(min: i64, max: i64, count: u32, unique: bool) -> Result<Generation> {
    debug_assert!(min <= max);

    let range = (max - min) as u64 + 1;
    let mut values = Vec::with_capacity(count as usize);
    let mut stats = BTreeMap::new();

    if unique {
        debug_assert!(u64::from(count) <= range);

        let mut seen = HashSet::with_capacity(count as usize);
        while (values.len() as u32) < count {
            let value = min + secure_below(range)? as i64;
            if seen.insert(value) {
                values.push(value);
                stats.insert(value, 1);
            }
        }
    } else {
        for _ in 0..count {
            let value = min + secure_below(range)? as i64;
            values.push(value);
            *stats.entry(value).or_insert(0) += 1;
        }
    }

    Ok(Generation { values, stats })
}

/// Generate `count` secure uniform fractions in `[min, max)`.
///
/// Each value is a uniform integer in `[0, 10^9)` divided by `10^9` and
/// mapped affinely into the requested range. No uniqueness variant exists
/// for floats.
pub fn generate_floats(min: f64, max: f64, count: u32) -> Result<Vec<f64>> {
    let span = max - min;
    let mut values = Vec::with_capacity(count as usize);

    for _ in 0..count {
        let fraction = secure_below(FLOAT_RESOLUTION)? as f64 / FLOAT_RESOLUTION as f64;
        values.push(min + fraction * span);
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_in_range() {
        let generation = generate_integers(-5, 5, 200, false).unwrap();
        assert_eq!(generation.values.len(), 200);
        assert!(generation.values.iter().all(|v| (-5..=5).contains(v)));
    }

    #[test]
    fn test_stats_counts_are_exact() {
        let generation = generate_integers(1, 3, 100, false).unwrap();

        let total: u64 = generation.stats.values().sum();
        assert_eq!(total, 100);

        for (value, count) in &generation.stats {
            let occurrences = generation.values.iter().filter(|v| *v == value).count();
            assert_eq!(occurrences as u64, *count);
        }
    }

    #[test]
    fn test_unique_mode_has_no_duplicates() {
        let generation = generate_integers(1, 50, 50, true).unwrap();
        assert_eq!(generation.values.len(), 50);

        let mut sorted = generation.values.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 50);

        assert!(generation.stats.values().all(|&count| count == 1));
    }

    #[test]
    fn test_unique_exhausts_full_range() {
        // count == range size forces every value to be produced exactly once
        let generation = generate_integers(10, 14, 5, true).unwrap();
        let mut sorted = generation.values.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![10, 11, 12, 13, 14]);
    }

    #[test]
    fn test_single_value_range() {
        let generation = generate_integers(7, 7, 3, false).unwrap();
        assert_eq!(generation.values, vec![7, 7, 7]);
        assert_eq!(generation.stats.get(&7), Some(&3));
    }

    #[test]
    fn test_floats_in_half_open_range() {
        let values = generate_floats(2.0, 4.0, 500).unwrap();
        assert_eq!(values.len(), 500);
        assert!(values.iter().all(|v| (2.0..4.0).contains(v)));
    }

    #[test]
    fn test_floats_negative_span() {
        let values = generate_floats(-1.5, 0.5, 100).unwrap();
        assert!(values.iter().all(|v| (-1.5..0.5).contains(v)));
    }

    #[test]
    fn test_secure_below_bound() {
        for _ in 0..100 {
            assert!(secure_below(10).unwrap() < 10);
        }
        assert_eq!(secure_below(1).unwrap(), 0);
    }
}
