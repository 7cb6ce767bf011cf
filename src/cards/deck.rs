//! Ordered card population.
//!
//! A `Deck` plays two roles:
//! - the shuffled **game deck** the session deals from, and
//! - the unshuffled **reference deck**, a read-only snapshot of the whole
//!   rank×suit universe that rounds reason about.
//!
//! Backed by `im::Vector`, so taking a reference snapshot is O(1).

use im::Vector;
use serde::{Deserialize, Serialize};

use super::card::{Card, CardId, Rank, Suit};
use crate::core::{DeckSchema, GameRng};
use crate::error::{MarketError, Result};

/// An ordered population of cards. The top of the deck is the back.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vector<Card>,
}

impl Deck {
    /// Build the rank×suit cross product in rank-major order.
    ///
    /// Ids run from 0 in construction order.
    pub fn from_ranks_and_suits<R, S>(ranks: &[R], suits: &[S]) -> Result<Self>
    where
        R: AsRef<str>,
        S: AsRef<str>,
    {
        if ranks.is_empty() {
            return Err(MarketError::EmptyRanks);
        }
        if suits.is_empty() {
            return Err(MarketError::EmptySuits);
        }

        let mut cards = Vector::new();
        let mut next_id = 0u32;
        for rank in ranks {
            for suit in suits {
                cards.push_back(Card::new(
                    CardId::new(next_id),
                    Rank::new(rank.as_ref()),
                    Suit::new(suit.as_ref()),
                ));
                next_id += 1;
            }
        }
        Ok(Self { cards })
    }

    /// Build the full population of a schema.
    pub fn from_schema(schema: &DeckSchema) -> Result<Self> {
        Self::from_ranks_and_suits(&schema.ranks, &schema.suits)
    }

    /// Wrap an explicit card sequence.
    #[must_use]
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    /// Shuffle in place.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        let mut cards: Vec<Card> = self.cards.iter().cloned().collect();
        rng.shuffle(&mut cards);
        self.cards = cards.into_iter().collect();
    }

    /// Remove and return the top card.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop_back()
    }

    /// Put a card underneath the rest.
    pub fn put_bottom(&mut self, card: Card) {
        self.cards.push_front(card);
    }

    /// Draw the first card from the top that satisfies `accept`.
    ///
    /// Rejected cards rotate to the bottom. Gives up after one pass over the deck.
    pub fn draw_matching(&mut self, mut accept: impl FnMut(&Card) -> bool) -> Option<Card> {
        for _ in 0..self.cards.len() {
            let card = self.cards.pop_back()?;
            if accept(&card) {
                return Some(card);
            }
            self.cards.push_front(card);
        }
        None
    }

    /// Keep only cards satisfying `keep`.
    #[must_use]
    pub fn filtered(&self, mut keep: impl FnMut(&Card) -> bool) -> Self {
        Self {
            cards: self.cards.iter().filter(|c| keep(c)).cloned().collect(),
        }
    }

    /// Look up a card by id.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.get(id).is_some()
    }

    /// Iterate from bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl std::fmt::Display for Deck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cards: Vec<String> = self.cards.iter().map(ToString::to_string).collect();
        f.write_str(&cards.join(", "))
    }
}
