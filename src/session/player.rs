//! The trading player.

use serde::{Deserialize, Serialize};

use crate::error::{MarketError, Result};

/// Running balance of the player across rounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    balance: i64,
}

impl Player {
    #[must_use]
    pub const fn new(balance: i64) -> Self {
        Self { balance }
    }

    #[must_use]
    pub const fn balance(&self) -> i64 {
        self.balance
    }

    /// Add a round's profit (or subtract its loss) and return the new balance.
    ///
    /// The balance is left unchanged when the result would overflow.
    pub fn apply_pnl(&mut self, pnl: i64) -> Result<i64> {
        self.balance = self
            .balance
            .checked_add(pnl)
            .ok_or(MarketError::Overflow("player balance"))?;
        Ok(self.balance)
    }
}
