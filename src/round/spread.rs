//! Market-maker quoting.
//!
//! The quote is centered on the EV plus integer noise proportional to the EV,
//! with a random integer width:
//!
//! ```text
//! L      = ⌊EV / noise_divisor⌋
//! offset ∈ [-L, L]
//! width  ∈ [min_width, max_width]
//! bid    = ⌊EV + offset − width/2⌋
//! ask    = ⌊EV + offset + width/2⌋      (width/2 is integer division)
//! ```

use serde::{Deserialize, Serialize};

use crate::core::{GameRng, SpreadConfig};

/// A bid/ask pair. `bid <= ask` always holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spread {
    pub bid: i64,
    pub ask: i64,
}

impl Spread {
    /// Quote around `ev`.
    pub fn quote(ev: f64, config: &SpreadConfig, rng: &mut GameRng) -> Self {
        let limit = (ev / config.noise_divisor as f64).floor().abs() as i64;
        let offset = rng.gen_range_inclusive(-limit..=limit);
        let width = rng.gen_range_inclusive(config.min_width..=config.max_width);
        Self::around(ev, offset, width)
    }

    /// Build the quote for a given noise offset and width.
    #[must_use]
    pub fn around(ev: f64, offset: i64, width: i64) -> Self {
        let half = width / 2;
        let center = ev + offset as f64;
        Self {
            bid: (center - half as f64).floor() as i64,
            ask: (center + half as f64).floor() as i64,
        }
    }

    #[must_use]
    pub const fn width(&self) -> i64 {
        self.ask - self.bid
    }
}

impl std::fmt::Display for Spread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.bid, self.ask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_around_integer_ev() {
        let spread = Spread::around(24.0, -2, 5);
        assert_eq!(spread, Spread { bid: 20, ask: 24 });
    }

    #[test]
    fn test_around_floors_fractional_ev() {
        let spread = Spread::around(9.5, 0, 3);
        assert_eq!(spread, Spread { bid: 8, ask: 10 });

        // Floor, not truncation, below zero
        let low = Spread::around(1.5, 0, 6);
        assert_eq!(low, Spread { bid: -2, ask: 4 });
    }

    #[test]
    fn test_small_ev_has_no_noise() {
        let config = SpreadConfig::default();
        let mut rng = GameRng::new(5);
        for _ in 0..200 {
            let spread = Spread::quote(4.0, &config, &mut rng);
            // Offset range collapses to [0, 0]; only the width varies
            assert!(spread.bid <= 3 && spread.bid >= 1);
            assert!(spread.ask >= 5 && spread.ask <= 7);
        }
    }

    #[test]
    fn test_quote_bounds() {
        let config = SpreadConfig::default();
        let mut rng = GameRng::new(11);
        let ev = 27.0;
        for _ in 0..500 {
            let spread = Spread::quote(ev, &config, &mut rng);
            assert!(spread.bid <= spread.ask);
            assert!((2..=6).contains(&spread.width()));
            assert!(spread.bid >= 27 - 5 - 3);
            assert!(spread.ask <= 27 + 5 + 3);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Spread { bid: 10, ask: 14 }.to_string(), "10 at 14");
    }
}
