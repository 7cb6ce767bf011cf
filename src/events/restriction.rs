//! Events that narrow the card population.

use serde::{Deserialize, Serialize};

use super::{EventKind, MarketEvent};
use crate::cards::{Card, RankValues, Suit};

/// Which cards remain in play.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Restriction {
    /// Odd card values only.
    OddValues,
    /// Even card values only.
    EvenValues,
    /// Only cards of these suits.
    Suits(Vec<Suit>),
    /// Card value X or less only.
    AtMost(i64),
    /// Card value X or more only.
    AtLeast(i64),
}

/// A deck-restriction event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckRestriction {
    pub id: u16,
    pub rule: Restriction,
}

impl DeckRestriction {
    #[must_use]
    pub fn new(id: u16, rule: Restriction) -> Self {
        Self { id, rule }
    }
}

impl MarketEvent for DeckRestriction {
    fn id(&self) -> u16 {
        self.id
    }

    fn kind(&self) -> EventKind {
        EventKind::DeckRestriction
    }

    fn description(&self) -> String {
        match &self.rule {
            Restriction::OddValues => "Odd card values only".to_string(),
            Restriction::EvenValues => "Even card values only".to_string(),
            Restriction::Suits(suits) => {
                let suits: Vec<&str> = suits.iter().map(Suit::as_str).collect();
                format!("These suits only: {}", suits.join(" "))
            }
            Restriction::AtMost(x) => format!("Card value {x} or less only"),
            Restriction::AtLeast(x) => format!("Card value {x} or more only"),
        }
    }

    fn allows(&self, card: &Card, values: &RankValues) -> bool {
        let Ok(value) = values.card_value(card) else {
            return false;
        };
        match &self.rule {
            Restriction::OddValues => value % 2 == 1,
            Restriction::EvenValues => value % 2 == 0,
            Restriction::Suits(suits) => suits.contains(&card.suit),
            Restriction::AtMost(x) => value <= *x,
            Restriction::AtLeast(x) => value >= *x,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DeckSchema;
    use crate::error::MarketError;
    use crate::round::RoundContext;

    fn context() -> RoundContext {
        RoundContext::from_schema(&DeckSchema::new(["2", "3", "4", "5"], ["♥", "♠"])).unwrap()
    }

    #[test]
    fn test_odd_only() {
        let event = DeckRestriction::new(100, Restriction::OddValues);
        let restricted = event.apply(&context()).unwrap();
        assert_eq!(restricted.reference().len(), 4);
        assert!(restricted
            .reference()
            .iter()
            .all(|c| restricted.value(c).unwrap() % 2 == 1));
        assert_eq!(event.kind(), EventKind::DeckRestriction);
    }

    #[test]
    fn test_suits_only() {
        let event = DeckRestriction::new(110, Restriction::Suits(vec![Suit::new("♠")]));
        let restricted = event.apply(&context()).unwrap();
        assert_eq!(restricted.reference().len(), 4);
        assert_eq!(event.description(), "These suits only: ♠");
    }

    #[test]
    fn test_thresholds() {
        let at_most = DeckRestriction::new(120, Restriction::AtMost(3));
        assert_eq!(at_most.apply(&context()).unwrap().reference().len(), 4);

        let at_least = DeckRestriction::new(121, Restriction::AtLeast(5));
        assert_eq!(at_least.apply(&context()).unwrap().reference().len(), 2);
        assert_eq!(at_least.description(), "Card value 5 or more only");
    }

    #[test]
    fn test_empty_population_is_config_error() {
        let event = DeckRestriction::new(121, Restriction::AtLeast(50));
        assert!(matches!(
            event.apply(&context()),
            Err(MarketError::EmptyPopulation(_))
        ));
    }
}
