//! Error taxonomy for the round engine.
//!
//! Three families of failure exist:
//!
//! - **Configuration**: empty rank/suit lists, missing rank values, bad settings.
//!   These abort round setup.
//! - **Invalid orders**: an order the player's balance cannot cover, or one whose
//!   P/L would not fit in an `i64`. Recoverable; the round is untouched and the
//!   caller re-prompts.
//! - **Misuse**: calling an operation in the wrong lifecycle phase.
//!
//! Invariant fallbacks (a zero EV denominator, an empty unseen population) are
//! handled inside the engine and never surface here.

use crate::cards::Rank;
use crate::round::{RoundPhase, Side};

/// Errors raised by the card market engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MarketError {
    #[error("cannot build a deck without ranks")]
    EmptyRanks,

    #[error("cannot build a deck without suits")]
    EmptySuits,

    #[error("no value configured for rank {0}")]
    MissingRankValue(Rank),

    #[error("invalid settings: {0}")]
    Settings(String),

    #[error("market event '{0}' leaves no cards in the population")]
    EmptyPopulation(String),

    #[error("{side} of {units} units needs {required}, balance is {balance}")]
    OrderRejected {
        side: Side,
        units: i64,
        required: i64,
        balance: i64,
    },

    #[error("{0} is out of the representable balance range")]
    Overflow(&'static str),

    #[error("{0} orders need a positive number of units")]
    InvalidUnits(Side),

    #[error("cannot {operation} while the round is {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: RoundPhase,
    },

    #[error("hand is full ({0} cards)")]
    HandFull(usize),

    #[error("hand has no cards")]
    EmptyHand,

    #[error("slot {slot} is out of range for a hand of {len}")]
    SlotOutOfRange { slot: usize, len: usize },

    #[error("ordered draws of {draws} from {population} cards exceed the limit of {limit}")]
    EnumerationTooLarge {
        population: usize,
        draws: usize,
        limit: u64,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MarketError>;
