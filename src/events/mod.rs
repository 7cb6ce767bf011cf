//! Market events: per-round rewrites of the population and value table.
//!
//! An event is a strategy applied to a `RoundContext` before dealing, EV
//! estimation and quoting. Two families exist:
//!
//! - `DeckRestriction`: only some cards of the universe are in play
//! - `ValueModifier`: some ranks are worth something else this round
//!
//! Events are off by default. The catalog mirrors the classic preset ids.

pub mod catalog;
pub mod modifier;
pub mod restriction;

pub use catalog::{preset, roll_event, PRESET_IDS};
pub use modifier::{Modifier, ValueModifier};
pub use restriction::{DeckRestriction, Restriction};

use serde::{Deserialize, Serialize};

use crate::cards::{Card, RankValues};
use crate::error::{MarketError, Result};
use crate::round::RoundContext;

/// Event family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    DeckRestriction,
    ValueModifier,
}

/// A market event applied to a round's context.
pub trait MarketEvent: std::fmt::Debug + Send + Sync {
    /// Catalog id.
    fn id(&self) -> u16;

    fn kind(&self) -> EventKind;

    /// Player-facing description with parameters filled in.
    fn description(&self) -> String;

    /// Whether a card stays in the population. Sees the adjusted values.
    fn allows(&self, _card: &Card, _values: &RankValues) -> bool {
        true
    }

    /// Rewrite rank values in place.
    fn adjust_values(&self, _values: &mut RankValues) {}

    /// Produce the context for a round under this event.
    ///
    /// Values are adjusted first, then the population is filtered.
    fn apply(&self, context: &RoundContext) -> Result<RoundContext> {
        let mut values = context.values().clone();
        self.adjust_values(&mut values);
        let reference = context
            .reference()
            .filtered(|card| self.allows(card, &values));
        if reference.is_empty() {
            return Err(MarketError::EmptyPopulation(self.description()));
        }
        RoundContext::new(reference, values)
    }
}
