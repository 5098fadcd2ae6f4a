//! Train/test partitioning of row indices.
//!
//! Both splitters draw from a `ChaCha8` generator seeded by the caller, so the
//! same seed always yields the same partition on every platform.

use super::encode::observed_levels;
use super::types::Table;
use crate::error::{PrepError, Result};
use rand::SeedableRng as _;
use rand::seq::index;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Slack absorbing float error in `rows * fraction`, so 300 * 0.7 is 210.
const SIZE_EPSILON: f64 = 1e-9;

/// A partition of `0..rows`. Both sides are sorted ascending.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl Split {
    fn from_train(rows: usize, mut train: Vec<usize>) -> Self {
        train.sort_unstable();
        let mut in_train = vec![false; rows];
        for &row in &train {
            if let Some(slot) = in_train.get_mut(row) {
                *slot = true;
            }
        }
        let test = (0..rows)
            .filter(|&row| !in_train.get(row).copied().unwrap_or(false))
            .collect();
        Self { train, test }
    }

    pub fn rows(&self) -> usize {
        self.train.len() + self.test.len()
    }
}

fn check_fraction(fraction: f64) -> Result<()> {
    if fraction.is_finite() && fraction > 0.0 && fraction < 1.0 {
        Ok(())
    } else {
        Err(PrepError::InvalidFraction(fraction))
    }
}

/// Training share of `rows` rows before flooring.
fn quota(rows: usize, fraction: f64) -> f64 {
    rows as f64 * fraction + SIZE_EPSILON
}

/// Number of training rows for `rows` rows: `floor(rows * fraction)`.
pub fn train_size(rows: usize, fraction: f64) -> usize {
    (quota(rows, fraction).floor() as usize).min(rows)
}

/// Samples `floor(rows * fraction)` training rows uniformly without replacement.
///
/// # Errors
///
/// Returns [`PrepError::InvalidFraction`] unless `0 < fraction < 1`.
pub fn random_split(rows: usize, fraction: f64, seed: u64) -> Result<Split> {
    check_fraction(fraction)?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let train = index::sample(&mut rng, rows, train_size(rows, fraction)).into_vec();

    let split = Split::from_train(rows, train);
    tracing::debug!(
        rows,
        train = split.train.len(),
        test = split.test.len(),
        "Random split"
    );
    Ok(split)
}

/// Stratum key for a row: the position of its outcome level in natural order,
/// or `None` for a missing outcome.
type Stratum = Option<usize>;

/// Splits `0..rows` by outcome level so every level keeps its share of the table.
///
/// The training size is `floor(rows * fraction)` as in [`random_split`]. It is
/// shared out between levels by largest remainder of `level_rows * fraction`;
/// ties go to the larger level, then to the earlier level in the natural order
/// of the stored values (`2` before `10`). Each level is then
/// sampled independently. Rows with a missing outcome form a stratum of their
/// own but do not count as a level.
///
/// # Errors
///
/// - [`PrepError::InvalidFraction`] unless `0 < fraction < 1`
/// - [`PrepError::ColumnNotFound`] if `outcome` is not a column
/// - [`PrepError::InvalidStratificationTarget`] for fewer than two observed levels
pub fn stratified_split(table: &Table, outcome: &str, fraction: f64, seed: u64) -> Result<Split> {
    check_fraction(fraction)?;
    let series = table.series(outcome)?;
    let observed = observed_levels(series)?;
    let position: HashMap<&str, usize> = observed
        .iter()
        .enumerate()
        .map(|(i, level)| (level.as_str(), i))
        .collect();

    let labels = series.cast(&polars::prelude::DataType::String)?;
    let mut strata: BTreeMap<Stratum, Vec<usize>> = BTreeMap::new();
    for (row, label) in labels.str()?.into_iter().enumerate() {
        let key = label.and_then(|l| position.get(l).copied());
        strata.entry(key).or_default().push(row);
    }

    let levels = observed.len();
    if levels < 2 {
        return Err(PrepError::InvalidStratificationTarget {
            column: outcome.to_owned(),
            levels,
        });
    }

    let rows = table.height();
    let allocation = allocate(&strata, rows, fraction);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(train_size(rows, fraction));
    for (key, members) in &strata {
        let take = allocation.get(key).copied().unwrap_or(0);
        train.extend(
            index::sample(&mut rng, members.len(), take)
                .iter()
                .filter_map(|i| members.get(i).copied()),
        );
    }

    let split = Split::from_train(rows, train);
    tracing::debug!(
        outcome,
        levels,
        train = split.train.len(),
        test = split.test.len(),
        "Stratified split"
    );
    Ok(split)
}

/// Largest-remainder apportionment of `floor(rows * fraction)` over the strata.
fn allocate(
    strata: &BTreeMap<Stratum, Vec<usize>>,
    rows: usize,
    fraction: f64,
) -> BTreeMap<Stratum, usize> {
    let mut allocation = BTreeMap::new();
    let mut remainders = Vec::with_capacity(strata.len());
    let mut assigned = 0;

    for (position, (key, members)) in strata.iter().enumerate() {
        let exact = members.len() as f64 * fraction;
        let base = train_size(members.len(), fraction);
        assigned += base;
        allocation.insert(*key, base);
        remainders.push((exact - base as f64, members.len(), position, key));
    }

    remainders.sort_by(|a, b| {
        b.0.total_cmp(&a.0)
            .then_with(|| b.1.cmp(&a.1))
            .then_with(|| a.2.cmp(&b.2))
    });

    let mut left = train_size(rows, fraction).saturating_sub(assigned);
    for (_, size, _, key) in remainders {
        if left == 0 {
            break;
        }
        if let Some(count) = allocation.get_mut(key)
            && *count < size
        {
            *count += 1;
            left -= 1;
        }
    }

    allocation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_train_size_absorbs_float_error() {
        assert_eq!(train_size(300, 0.7), 210);
        assert_eq!(train_size(10, 0.7), 7);
        assert_eq!(train_size(3, 0.5), 1);
    }

    #[test]
    fn test_invalid_fraction() {
        for fraction in [0.0, 1.0, -0.2, 1.5, f64::NAN] {
            assert!(matches!(
                random_split(10, fraction, 1),
                Err(PrepError::InvalidFraction(_))
            ));
        }
    }

    #[test]
    fn test_from_train_builds_complement() {
        let split = Split::from_train(6, vec![4, 1, 3]);
        assert_eq!(split.train, vec![1, 3, 4]);
        assert_eq!(split.test, vec![0, 2, 5]);
        assert_eq!(split.rows(), 6);
    }

    #[test]
    fn test_allocate_uses_largest_remainder() {
        let mut strata: BTreeMap<Stratum, Vec<usize>> = BTreeMap::new();
        strata.insert(Some(0), (0..5).collect());
        strata.insert(Some(1), (5..10).collect());
        strata.insert(Some(2), (10..13).collect());

        // 13 * 0.5 = 6; quotas 2.5, 2.5, 1.5 floor to 5, one row goes to the larger first level.
        let allocation = allocate(&strata, 13, 0.5);
        assert_eq!(allocation.values().sum::<usize>(), 6);
        assert_eq!(allocation.get(&Some(0)), Some(&3));
        assert_eq!(allocation.get(&Some(1)), Some(&2));
        assert_eq!(allocation.get(&Some(2)), Some(&1));
    }
}
