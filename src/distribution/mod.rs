//! Distribution engine: the exact value distribution of a partially hidden hand.
//!
//! For `k` face-down slots and an unseen population `U`, every ordered
//! selection of `k` distinct cards from `U` is enumerated and
//! `face_up_sum + Σ selection` is tallied. The table sums to `|U|! / (|U| - k)!`.
//!
//! The cost is exactly that permutation count, so enumeration is guarded by a
//! configurable limit and refuses large populations up front.

pub mod enumerate;
pub mod histogram;

pub use enumerate::{enumerate_ordered_sums, permutation_count};
pub use histogram::{HistogramBin, ValueDistribution};

use tracing::debug;

use crate::error::{MarketError, Result};

/// Inputs for one hidden-hand enumeration.
#[derive(Clone, Debug)]
pub struct HiddenHand<'a> {
    /// Sum of the face-up cards.
    pub face_up_sum: i64,
    /// True value of the whole hand, used when nothing can be enumerated.
    pub exact_sum: i64,
    /// Values of the unseen population.
    pub unseen: &'a [i64],
    /// Number of face-down slots.
    pub draws: usize,
}

/// Enumerate the value distribution of a hidden hand.
///
/// With no face-down slots the result is a point mass at the face-up sum. With
/// an unseen population too small to fill the hidden slots it is a point mass
/// at the exact hand value.
pub fn hidden_value_distribution(hand: &HiddenHand<'_>, limit: u64) -> Result<ValueDistribution> {
    if hand.draws == 0 {
        return Ok(ValueDistribution::point_mass(hand.face_up_sum));
    }
    if hand.unseen.len() < hand.draws {
        debug!(
            unseen = hand.unseen.len(),
            draws = hand.draws,
            "unseen population cannot fill hidden slots; using exact value"
        );
        return Ok(ValueDistribution::point_mass(hand.exact_sum));
    }

    let too_large = || MarketError::EnumerationTooLarge {
        population: hand.unseen.len(),
        draws: hand.draws,
        limit,
    };
    let required = permutation_count(hand.unseen.len(), hand.draws).ok_or_else(too_large)?;
    if required > limit {
        return Err(too_large());
    }

    debug!(required, "enumerating hidden hand values");
    Ok(enumerate_ordered_sums(hand.unseen, hand.draws, hand.face_up_sum))
}
