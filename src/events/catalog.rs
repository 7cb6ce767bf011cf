//! Preset events and random rolls.
//!
//! | id  | event |
//! |-----|-------|
//! | 100 | Odd card values only |
//! | 101 | Even card values only |
//! | 110 | These suits only |
//! | 120 | Card value X or less only |
//! | 121 | Card value X or more only |
//! | 200 | Card X is now worth Y |
//! | 201 | Even cards are now worth double |
//! | 202 | Odd cards are now worth double |
//!
//! Parameters (X, Y, suit sets) are drawn from the round's context.

use tracing::debug;

use super::{DeckRestriction, MarketEvent, Modifier, Restriction, ValueModifier};
use crate::cards::{Rank, Suit};
use crate::core::GameRng;
use crate::round::RoundContext;

/// Every preset id, in catalog order.
pub const PRESET_IDS: [u16; 8] = [100, 101, 110, 120, 121, 200, 201, 202];

/// Instantiate preset `id`, drawing its parameters from `context`.
///
/// Returns `None` for an unknown id or an empty context.
pub fn preset(id: u16, context: &RoundContext, rng: &mut GameRng) -> Option<Box<dyn MarketEvent>> {
    let mut values: Vec<i64> = context
        .reference()
        .iter()
        .filter_map(|c| context.value(c).ok())
        .collect();
    values.sort_unstable();
    values.dedup();
    let (&low, &high) = (values.first()?, values.last()?);

    let event: Box<dyn MarketEvent> = match id {
        100 => Box::new(DeckRestriction::new(id, Restriction::OddValues)),
        101 => Box::new(DeckRestriction::new(id, Restriction::EvenValues)),
        110 => {
            let mut suits: Vec<Suit> = Vec::new();
            for card in context.reference().iter() {
                if !suits.contains(&card.suit) {
                    suits.push(card.suit.clone());
                }
            }
            rng.shuffle(&mut suits);
            suits.truncate(suits.len().div_ceil(2));
            Box::new(DeckRestriction::new(id, Restriction::Suits(suits)))
        }
        120 => Box::new(DeckRestriction::new(id, Restriction::AtMost(*rng.choose(&values)?))),
        121 => Box::new(DeckRestriction::new(id, Restriction::AtLeast(*rng.choose(&values)?))),
        200 => {
            let mut ranks: Vec<Rank> = context.values().iter().map(|(r, _)| r.clone()).collect();
            ranks.sort();
            let rank = rng.choose(&ranks)?.clone();
            let value = rng.gen_range_inclusive(low..=high);
            Box::new(ValueModifier::new(id, Modifier::SetRank { rank, value }))
        }
        201 => Box::new(ValueModifier::new(id, Modifier::DoubleEven)),
        202 => Box::new(ValueModifier::new(id, Modifier::DoubleOdd)),
        _ => return None,
    };
    Some(event)
}

/// With probability `chance`, draw a uniformly chosen preset.
pub fn roll_event(
    rng: &mut GameRng,
    chance: f64,
    context: &RoundContext,
) -> Option<Box<dyn MarketEvent>> {
    if !rng.gen_bool(chance) {
        return None;
    }
    let id = *rng.choose(&PRESET_IDS)?;
    let event = preset(id, context, rng)?;
    debug!(id, description = %event.description(), "market event rolled");
    Some(event)
}
