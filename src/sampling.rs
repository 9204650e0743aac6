//! Seeded random sources and the small sampling primitives every generator
//! draws from.

use rand::prelude::*;

use crate::table::Table;
use crate::values::{Date, Decimal};

/// Attempts allowed per slot before a unique draw is abandoned.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

const STREAM_SPACING: u64 = 0x9E37_79B9_7F4A_7C15;

/// Returns the random stream for one table.
///
/// Each table draws from its own stream derived from the run seed, so
/// generating a subset of tables yields the same rows as a full run.
pub fn table_rng(seed: u64, table: Table) -> StdRng {
    let stream = (table as u64 + 1).wrapping_mul(STREAM_SPACING);
    StdRng::seed_from_u64(seed ^ stream)
}

/// Rejection sampling with a give-up threshold.
///
/// Draws candidates until one satisfies the acceptance predicate or the
/// attempt budget is spent, in which case the slot is abandoned.
#[derive(Debug, Clone, Copy)]
pub struct BoundedRetry {
    max_attempts: usize,
}

impl Default for BoundedRetry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl BoundedRetry {
    pub fn new(max_attempts: usize) -> Self {
        Self { max_attempts }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// `accept` may record the candidate (e.g. insert into a seen set); it is
    /// called exactly once per draw.
    pub fn sample<R, T>(
        &self,
        rng: &mut R,
        mut draw: impl FnMut(&mut R) -> T,
        mut accept: impl FnMut(&T) -> bool,
    ) -> Option<T>
    where
        R: Rng + ?Sized,
    {
        for _ in 0..self.max_attempts {
            let candidate = draw(rng);
            if accept(&candidate) {
                return Some(candidate);
            }
        }
        None
    }
}

/// Uniform key in `1..=count`. `count` must be non-zero.
pub fn key<R: Rng + ?Sized>(rng: &mut R, count: u64) -> u64 {
    rng.random_range(1..=count)
}

/// Uniform choice from a non-empty fixed vocabulary.
pub fn pick<R: Rng + ?Sized>(rng: &mut R, pool: &[&'static str]) -> &'static str {
    pool[rng.random_range(0..pool.len())]
}

/// Uniform amount with two decimals, both bounds inclusive (in hundredths).
pub fn money<R: Rng + ?Sized>(rng: &mut R, low: i64, high: i64) -> Decimal {
    Decimal::from_hundredths(rng.random_range(low..=high))
}

/// Date with year in 1992..=1998 and day capped at 28.
pub fn date<R: Rng + ?Sized>(rng: &mut R) -> Date {
    let year = rng.random_range(1992..=1998);
    let month = rng.random_range(1..=12);
    let day = rng.random_range(1..=28);
    Date::new(year, month, day)
}

/// `AA-BBB-CCC-DDDD` phone number.
pub fn phone<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{}-{}-{}-{}",
        rng.random_range(10..=99),
        rng.random_range(100..=999),
        rng.random_range(100..=999),
        rng.random_range(1000..=9999)
    )
}
