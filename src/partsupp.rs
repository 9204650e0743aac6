//! The PARTSUPP relationship between parts and suppliers.
//!
//! Every part draws a fan-out of 1 to 4 supplier slots. Each slot samples a
//! supplier uniformly and keeps it only if the `(part, supplier)` pair has not
//! been emitted yet; after [`BoundedRetry::max_attempts`] collisions the slot
//! is dropped. Parts can therefore end up with fewer suppliers than drawn,
//! and with fewer than 4 suppliers overall drops become common.

use std::fmt;

use ahash::AHashSet;
use rand::Rng;

use crate::sampling::{key, money, BoundedRetry};
use crate::serializer::TblRow;
use crate::table::Table;
use crate::values::Decimal;

pub const MAX_SUPPLIERS_PER_PART: u64 = 4;
pub const AVAILQTY_MAX: i32 = 9_999;
/// Supply cost bounds, in hundredths.
pub const SUPPLYCOST_MIN: i64 = 100;
pub const SUPPLYCOST_MAX: i64 = 100_000;

/// The set of `(partkey, suppkey)` pairs emitted so far in one run.
///
/// Pairs are packed into one `u64` (part in the high half), which holds for
/// any key below 2^32.
#[derive(Debug, Default, Clone)]
pub struct SeenPairs {
    pairs: AHashSet<u64>,
}

impl SeenPairs {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pairs: AHashSet::with_capacity(capacity),
        }
    }

    #[inline]
    fn pack(partkey: i64, suppkey: i64) -> u64 {
        ((partkey as u64) << 32) | (suppkey as u64 & 0xFFFF_FFFF)
    }

    /// Records the pair, returning `false` if it was already present.
    pub fn insert(&mut self, partkey: i64, suppkey: i64) -> bool {
        self.pairs.insert(Self::pack(partkey, suppkey))
    }

    pub fn contains(&self, partkey: i64, suppkey: i64) -> bool {
        self.pairs.contains(&Self::pack(partkey, suppkey))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// The PARTSUPP table
///
/// ```text
/// 1|412|3377|517.42|Comment 0-0
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PartSupp {
    /// Foreign key to PART
    pub ps_partkey: i64,
    /// Foreign key to SUPPLIER
    pub ps_suppkey: i64,
    pub ps_availqty: i32,
    pub ps_supplycost: Decimal,
    pub ps_comment: String,
}

impl fmt::Display for PartSupp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}",
            self.ps_partkey, self.ps_suppkey, self.ps_availqty, self.ps_supplycost, self.ps_comment
        )
    }
}

impl TblRow for PartSupp {
    const TABLE: Table = Table::Partsupp;
}

/// Result of one PARTSUPP pass.
#[derive(Debug)]
pub struct PartSuppOutcome {
    pub rows: Vec<PartSupp>,
    /// Pair set after the pass, handed back so callers can extend or inspect it.
    pub seen: SeenPairs,
    /// Slots drawn across all parts.
    pub requested_slots: u64,
    /// Slots abandoned after exhausting their retry budget.
    pub dropped_slots: u64,
}

impl PartSuppOutcome {
    /// Fraction of requested slots that produced a row.
    pub fn fill_ratio(&self) -> f64 {
        if self.requested_slots == 0 {
            return 1.0;
        }
        (self.requested_slots - self.dropped_slots) as f64 / self.requested_slots as f64
    }
}

/// Builds the PARTSUPP rows for parts `1..=part_count` against suppliers
/// `1..=supplier_count`, threading `seen` through the pass.
pub fn generate_partsupp<R: Rng + ?Sized>(
    rng: &mut R,
    part_count: u64,
    supplier_count: u64,
    mut seen: SeenPairs,
    retry: BoundedRetry,
) -> PartSuppOutcome {
    let mut rows = Vec::with_capacity((part_count * (MAX_SUPPLIERS_PER_PART + 1) / 2) as usize);
    let mut requested_slots = 0;
    let mut dropped_slots = 0;

    for index in 0..part_count {
        let partkey = index as i64 + 1;
        let fan_out = rng.random_range(1..=MAX_SUPPLIERS_PER_PART);
        requested_slots += fan_out;

        for slot in 0..fan_out {
            if supplier_count == 0 {
                dropped_slots += 1;
                continue;
            }
            let accepted = retry.sample(
                rng,
                |r| key(r, supplier_count) as i64,
                |suppkey| seen.insert(partkey, *suppkey),
            );
            let Some(suppkey) = accepted else {
                dropped_slots += 1;
                continue;
            };
            rows.push(PartSupp {
                ps_partkey: partkey,
                ps_suppkey: suppkey,
                ps_availqty: rng.random_range(1..=AVAILQTY_MAX),
                ps_supplycost: money(rng, SUPPLYCOST_MIN, SUPPLYCOST_MAX),
                ps_comment: format!("Comment {index}-{slot}"),
            });
        }
    }

    PartSuppOutcome {
        rows,
        seen,
        requested_slots,
        dropped_slots,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::{BTreeMap, HashSet};

    fn run(seed: u64, parts: u64, suppliers: u64) -> PartSuppOutcome {
        let mut rng = StdRng::seed_from_u64(seed);
        generate_partsupp(
            &mut rng,
            parts,
            suppliers,
            SeenPairs::default(),
            BoundedRetry::default(),
        )
    }

    #[test]
    fn pairs_are_unique_and_in_range() {
        let outcome = run(1, 20_000, 1_000);
        let rows = &outcome.rows;
        assert!(rows.len() >= 20_000 && rows.len() <= 80_000);

        let pairs: HashSet<(i64, i64)> = rows.iter().map(|r| (r.ps_partkey, r.ps_suppkey)).collect();
        assert_eq!(pairs.len(), rows.len());
        assert_eq!(outcome.seen.len(), rows.len());

        for r in rows {
            assert!((1..=20_000).contains(&r.ps_partkey));
            assert!((1..=1_000).contains(&r.ps_suppkey));
            assert!((1..=AVAILQTY_MAX).contains(&r.ps_availqty));
            assert!((SUPPLYCOST_MIN..=SUPPLYCOST_MAX).contains(&r.ps_supplycost.hundredths()));
        }
    }

    #[test]
    fn every_part_gets_one_to_four_suppliers() {
        let outcome = run(2, 2_000, 500);
        let mut per_part: BTreeMap<i64, usize> = BTreeMap::new();
        for r in &outcome.rows {
            *per_part.entry(r.ps_partkey).or_default() += 1;
        }
        // the first slot of a part can never collide
        assert_eq!(per_part.len(), 2_000);
        assert!(per_part.values().all(|n| (1..=4).contains(n)));
        assert_eq!(
            outcome.rows.len() as u64,
            outcome.requested_slots - outcome.dropped_slots
        );
    }

    #[test]
    fn tiny_supplier_pool_terminates() {
        let outcome = run(3, 1_000, 1);
        // one supplier means one row per part, every later slot is dropped
        assert_eq!(outcome.rows.len(), 1_000);
        assert!(outcome.rows.iter().all(|r| r.ps_suppkey == 1));
        assert_eq!(outcome.dropped_slots, outcome.requested_slots - 1_000);
        assert!(outcome.fill_ratio() < 1.0);
    }

    #[test]
    fn empty_supplier_pool_drops_everything() {
        let outcome = run(4, 10, 0);
        assert!(outcome.rows.is_empty());
        assert_eq!(outcome.dropped_slots, outcome.requested_slots);
    }

    #[test]
    fn seen_pairs_are_threaded_through() {
        let mut seen = SeenPairs::default();
        for suppkey in 1..=3 {
            seen.insert(1, suppkey);
        }
        let mut rng = StdRng::seed_from_u64(5);
        let outcome = generate_partsupp(&mut rng, 1, 3, seen, BoundedRetry::default());
        assert!(outcome.rows.is_empty());
        assert_eq!(outcome.seen.len(), 3);
        assert!(outcome.seen.contains(1, 2));
    }

    #[test]
    fn deterministic_under_seed() {
        let a = run(6, 500, 50);
        let b = run(6, 500, 50);
        assert_eq!(a.rows, b.rows);
        assert_eq!(a.dropped_slots, b.dropped_slots);
    }
}
