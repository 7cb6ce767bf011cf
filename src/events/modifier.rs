//! Events that change what cards are worth.

use serde::{Deserialize, Serialize};

use super::{EventKind, MarketEvent};
use crate::cards::{Rank, RankValues};

/// How rank values change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modifier {
    /// Card X is now worth Y.
    SetRank { rank: Rank, value: i64 },
    /// Even cards are now worth double.
    DoubleEven,
    /// Odd cards are now worth double.
    DoubleOdd,
}

/// A value-modifier event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueModifier {
    pub id: u16,
    pub rule: Modifier,
}

impl ValueModifier {
    #[must_use]
    pub fn new(id: u16, rule: Modifier) -> Self {
        Self { id, rule }
    }
}

impl MarketEvent for ValueModifier {
    fn id(&self) -> u16 {
        self.id
    }

    fn kind(&self) -> EventKind {
        EventKind::ValueModifier
    }

    fn description(&self) -> String {
        match &self.rule {
            Modifier::SetRank { rank, value } => format!("Card {rank} is now worth {value}"),
            Modifier::DoubleEven => "Even cards are now worth double".to_string(),
            Modifier::DoubleOdd => "Odd cards are now worth double".to_string(),
        }
    }

    fn adjust_values(&self, values: &mut RankValues) {
        match &self.rule {
            Modifier::SetRank { rank, value } => {
                if values.contains(rank) {
                    values.set(rank.clone(), *value);
                }
            }
            Modifier::DoubleEven => values.map_values(|_, v| if v % 2 == 0 { v * 2 } else { v }),
            Modifier::DoubleOdd => values.map_values(|_, v| if v % 2 == 1 { v * 2 } else { v }),
        }
    }
}
