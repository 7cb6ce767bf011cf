//! Per-round population and value schema.

use im::HashSet;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId, Deck, RankValues};
use crate::core::DeckSchema;
use crate::error::Result;

/// The read-only reference population and rank values a round reasons about.
///
/// Every card in the reference deck is guaranteed to have a value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundContext {
    reference: Deck,
    values: RankValues,
}

impl RoundContext {
    /// Pair a reference deck with a value table.
    ///
    /// Fails with `MissingRankValue` if any reference card has no value.
    pub fn new(reference: Deck, values: RankValues) -> Result<Self> {
        for card in reference.iter() {
            values.card_value(card)?;
        }
        Ok(Self { reference, values })
    }

    /// The unshuffled full population of a schema.
    pub fn from_schema(schema: &DeckSchema) -> Result<Self> {
        Self::new(Deck::from_schema(schema)?, RankValues::from_schema(schema)?)
    }

    #[must_use]
    pub fn reference(&self) -> &Deck {
        &self.reference
    }

    #[must_use]
    pub fn values(&self) -> &RankValues {
        &self.values
    }

    /// Value of a card under this round's table.
    pub fn value(&self, card: &Card) -> Result<i64> {
        self.values.card_value(card)
    }

    /// Reference cards whose ids are not in `seen`.
    pub fn unseen<'a>(&'a self, seen: &'a HashSet<CardId>) -> impl Iterator<Item = &'a Card> + 'a {
        self.reference.iter().filter(move |c| !seen.contains(&c.id))
    }

    /// Values of the unseen reference cards, in reference order.
    pub fn unseen_values(&self, seen: &HashSet<CardId>) -> Result<Vec<i64>> {
        self.unseen(seen).map(|c| self.value(c)).collect()
    }
}
