//! Player orders and their settlement.

use serde::{Deserialize, Serialize};

/// Which side of the market the player takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Lift the ask.
    Buy,
    /// Hit the bid.
    Sell,
    /// No trade.
    Pass,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Side::Buy => "Buy",
            Side::Sell => "Sell",
            Side::Pass => "Pass",
        };
        f.write_str(name)
    }
}

/// A placed order. Frozen for the rest of the round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub side: Side,
    /// Zero for `Pass`, positive otherwise.
    pub units: i64,
}

impl Order {
    /// The no-trade order.
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            side: Side::Pass,
            units: 0,
        }
    }
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.units > 0 {
            write!(f, "{} {}", self.side, self.units)
        } else {
            write!(f, "{}", self.side)
        }
    }
}

/// Outcome of a settled round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Sum of all card values in the hand.
    pub true_value: i64,
    /// Profit (positive) or loss (negative) of the order.
    pub pnl: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_display() {
        assert_eq!(Order::pass().to_string(), "Pass");
        let buy = Order { side: Side::Buy, units: 10 };
        assert_eq!(buy.to_string(), "Buy 10");
    }
}
