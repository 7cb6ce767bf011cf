//! Exhaustive ordered enumeration.
//!
//! Every ordered selection of `draws` distinct cards from the population is
//! visited once. Outcomes are weighted by card identity, not by rank
//! combination: two cards of equal value are two distinct outcomes.

use rustc_hash::FxHashMap;

use super::histogram::ValueDistribution;

/// `n! / (n - k)!`, or `None` on overflow. Zero when `k > n`.
#[must_use]
pub fn permutation_count(n: usize, k: usize) -> Option<u64> {
    if k > n {
        return Some(0);
    }
    ((n - k + 1)..=n).try_fold(1u64, |acc, f| acc.checked_mul(f as u64))
}

/// Tally `base + Σ selection` over every ordered selection of `draws` values.
#[must_use]
pub fn enumerate_ordered_sums(values: &[i64], draws: usize, base: i64) -> ValueDistribution {
    let mut tally: FxHashMap<i64, u64> = FxHashMap::default();
    let mut used = vec![false; values.len()];
    walk(values, &mut used, draws, base, &mut tally);
    ValueDistribution::from_counts(tally)
}

fn walk(
    values: &[i64],
    used: &mut [bool],
    remaining: usize,
    acc: i64,
    tally: &mut FxHashMap<i64, u64>,
) {
    if remaining == 0 {
        *tally.entry(acc).or_insert(0) += 1;
        return;
    }
    for i in 0..values.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        walk(values, used, remaining - 1, acc + values[i], tally);
        used[i] = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permutation_count() {
        assert_eq!(permutation_count(5, 0), Some(1));
        assert_eq!(permutation_count(5, 2), Some(20));
        assert_eq!(permutation_count(52, 3), Some(132_600));
        assert_eq!(permutation_count(2, 3), Some(0));
        assert_eq!(permutation_count(100, 100), None);
    }

    #[test]
    fn test_two_of_two() {
        let dist = enumerate_ordered_sums(&[3, 4], 2, 2);
        assert_eq!(dist.iter().collect::<Vec<_>>(), vec![(9, 2)]);
    }

    #[test]
    fn test_identity_weighting() {
        // Two cards worth 5 and one worth 1: value 5 appears twice as often
        let dist = enumerate_ordered_sums(&[5, 5, 1], 1, 0);
        assert_eq!(dist.count(5), 2);
        assert_eq!(dist.count(1), 1);
    }

    #[test]
    fn test_counts_match_permutations() {
        let values = [1, 2, 3, 4, 5, 6];
        let dist = enumerate_ordered_sums(&values, 3, 10);
        assert_eq!(dist.total(), permutation_count(6, 3).unwrap());
        assert_eq!(dist.min(), Some(10 + 1 + 2 + 3));
        assert_eq!(dist.max(), Some(10 + 4 + 5 + 6));
    }

    #[test]
    fn test_zero_draws() {
        let dist = enumerate_ordered_sums(&[1, 2], 0, 7);
        assert_eq!(dist.iter().collect::<Vec<_>>(), vec![(7, 1)]);
    }
}
