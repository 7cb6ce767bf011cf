//! Rank → value table.
//!
//! Numeric ranks are worth their face number; symbolic ranks (J, Q, K, A)
//! need an explicit entry. Market events can rewrite entries for a round.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::card::{Card, Rank};
use crate::core::DeckSchema;
use crate::error::{MarketError, Result};

/// Total mapping from every rank in play to a non-negative value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankValues {
    values: FxHashMap<Rank, i64>,
}

impl RankValues {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table for a schema.
    ///
    /// Fails with `MissingRankValue` for a symbolic rank without a face value
    /// and with `Settings` for a negative face value.
    pub fn from_schema(schema: &DeckSchema) -> Result<Self> {
        let mut table = Self::new();
        for symbol in &schema.ranks {
            let value = match symbol.parse::<i64>() {
                Ok(v) if v >= 0 => v,
                _ => *schema
                    .face_values
                    .get(symbol)
                    .ok_or_else(|| MarketError::MissingRankValue(Rank::new(symbol.as_str())))?,
            };
            if value < 0 {
                return Err(MarketError::Settings(format!(
                    "face value {value} for rank {symbol} is negative"
                )));
            }
            table.set(Rank::new(symbol.as_str()), value);
        }
        Ok(table)
    }

    /// Insert or overwrite a value. Negative values are clamped to zero.
    pub fn set(&mut self, rank: Rank, value: i64) {
        self.values.insert(rank, value.max(0));
    }

    /// Value of a rank.
    pub fn value_of(&self, rank: &Rank) -> Result<i64> {
        self.values
            .get(rank)
            .copied()
            .ok_or_else(|| MarketError::MissingRankValue(rank.clone()))
    }

    /// Value of a card.
    pub fn card_value(&self, card: &Card) -> Result<i64> {
        self.value_of(&card.rank)
    }

    /// Sum of card values.
    pub fn sum<'a>(&self, cards: impl IntoIterator<Item = &'a Card>) -> Result<i64> {
        cards.into_iter().map(|c| self.card_value(c)).sum()
    }

    #[must_use]
    pub fn contains(&self, rank: &Rank) -> bool {
        self.values.contains_key(rank)
    }

    /// Iterate over `(rank, value)` entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&Rank, i64)> {
        self.values.iter().map(|(r, v)| (r, *v))
    }

    /// Apply `f` to every value.
    pub fn map_values(&mut self, mut f: impl FnMut(&Rank, i64) -> i64) {
        for (rank, value) in self.values.iter_mut() {
            *value = f(rank, *value).max(0);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardId, Suit};

    #[test]
    fn test_standard_values() {
        let values = RankValues::from_schema(&DeckSchema::standard()).unwrap();
        assert_eq!(values.len(), 13);
        assert_eq!(values.value_of(&Rank::new("7")).unwrap(), 7);
        assert_eq!(values.value_of(&Rank::new("J")).unwrap(), 11);
        assert_eq!(values.value_of(&Rank::new("A")).unwrap(), 14);
    }

    #[test]
    fn test_missing_face_value_is_config_error() {
        let schema = DeckSchema::new(["2", "X"], ["♥"]);
        assert_eq!(
            RankValues::from_schema(&schema),
            Err(MarketError::MissingRankValue(Rank::new("X")))
        );
    }

    #[test]
    fn test_negative_face_value_is_config_error() {
        let schema = DeckSchema::new(["2", "Q"], ["♥"]).with_face_value("Q", -12);
        assert_eq!(
            RankValues::from_schema(&schema),
            Err(MarketError::Settings("face value -12 for rank Q is negative".into()))
        );
    }

    #[test]
    fn test_unknown_rank_lookup() {
        let values = RankValues::from_schema(&DeckSchema::new(["2"], ["♥"])).unwrap();
        assert!(values.value_of(&Rank::new("3")).is_err());
    }

    #[test]
    fn test_sum_and_map() {
        let mut values = RankValues::from_schema(&DeckSchema::new(["2", "3"], ["♥"])).unwrap();
        let cards = [
            Card::new(CardId::new(0), Rank::new("2"), Suit::new("♥")),
            Card::new(CardId::new(1), Rank::new("3"), Suit::new("♥")),
        ];
        assert_eq!(values.sum(&cards).unwrap(), 5);

        values.map_values(|_, v| v * 2);
        assert_eq!(values.sum(&cards).unwrap(), 10);

        values.set(Rank::new("2"), -4);
        assert_eq!(values.value_of(&Rank::new("2")).unwrap(), 0);
    }
}
