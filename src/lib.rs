//! # card-market
//!
//! Engine for a market-making card game.
//!
//! A few cards are dealt and some are turned face-up. A synthetic market
//! maker quotes a bid/ask around the expected value of the hand, the player
//! trades against that quote, and the round settles against the true total.
//!
//! ## Design Principles
//!
//! 1. **Immutable population, growing ledger**: each round reasons about a
//!    read-only reference deck plus a set of card ids the player has seen.
//!    Nothing is removed from the population mid-round.
//!
//! 2. **Injected randomness**: visibility, quote noise, shuffles and market
//!    events all draw from a caller-supplied `GameRng`, so any round replays
//!    from its seed.
//!
//! 3. **No I/O in the core**: rounds expose accessors and rendered strings;
//!    front ends do the printing.
//!
//! ## Modules
//!
//! - `core`: RNG and configuration
//! - `cards`: cards, decks, rank values
//! - `round`: the round engine (EV, max exposure, spread, orders, settlement)
//! - `distribution`: exact hand-value distributions by exhaustive enumeration
//! - `events`: market events (deck restrictions, value modifiers)
//! - `session`: multi-round orchestration

pub mod cards;
pub mod core;
pub mod distribution;
pub mod error;
pub mod events;
pub mod round;
pub mod session;

// Re-export commonly used types
pub use crate::core::{DeckSchema, GameRng, GameRngState, GameSettings, SeenMemory, SpreadConfig, TurnTimer};

pub use crate::cards::{Card, CardId, Deck, Rank, RankValues, Suit};

pub use crate::round::{Order, Round, RoundContext, RoundPhase, Settlement, Side, Spread};

pub use crate::distribution::{HistogramBin, ValueDistribution};

pub use crate::events::{DeckRestriction, EventKind, MarketEvent, Modifier, Restriction, ValueModifier};

pub use crate::error::{MarketError, Result};

pub use crate::session::{Player, Session, SessionRecord};
