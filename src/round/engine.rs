//! The round engine.
//!
//! A `Round` owns one dealt hand and walks through a fixed lifecycle:
//!
//! ```text
//! Dealing ─assign_visibility→ Visible ─estimate_ev→ Estimated ─quote_spread→ Quoted
//!         ─place_order→ Ordered ─settle→ Settled
//! ```
//!
//! Operations called out of phase fail with `InvalidPhase` and leave the round
//! unchanged. The seen ledger only grows.

use im::HashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use super::context::RoundContext;
use super::order::{Order, Settlement, Side};
use super::spread::Spread;
use crate::cards::{Card, CardId};
use crate::core::{GameRng, SpreadConfig};
use crate::distribution::{hidden_value_distribution, HiddenHand, ValueDistribution};
use crate::error::{MarketError, Result};

/// Placeholder shown for face-down cards.
pub const FACE_DOWN: &str = "--";

/// Lifecycle phase of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundPhase {
    Dealing,
    Visible,
    Estimated,
    Quoted,
    Ordered,
    Settled,
}

impl std::fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RoundPhase::Dealing => "dealing",
            RoundPhase::Visible => "visible",
            RoundPhase::Estimated => "estimated",
            RoundPhase::Quoted => "quoted",
            RoundPhase::Ordered => "ordered",
            RoundPhase::Settled => "settled",
        };
        f.write_str(name)
    }
}

/// One round of the market-making game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Round {
    number: usize,
    context: RoundContext,
    hand_size: usize,
    hand: SmallVec<[Card; 8]>,
    face_up: SmallVec<[bool; 8]>,
    seen: HashSet<CardId>,
    dealt_view: String,
    ev: Option<f64>,
    spread: Option<Spread>,
    order: Option<Order>,
    settlement: Option<Settlement>,
    start_balance: i64,
    end_balance: i64,
    reported_pnl: i64,
    event: Option<String>,
    phase: RoundPhase,
}

impl Round {
    /// Create an empty round that accepts up to `hand_size` cards.
    #[must_use]
    pub fn new(number: usize, context: RoundContext, hand_size: usize) -> Self {
        Self {
            number,
            context,
            hand_size,
            hand: SmallVec::new(),
            face_up: SmallVec::new(),
            seen: HashSet::new(),
            dealt_view: String::new(),
            ev: None,
            spread: None,
            order: None,
            settlement: None,
            start_balance: 0,
            end_balance: 0,
            reported_pnl: 0,
            event: None,
            phase: RoundPhase::Dealing,
        }
    }

    /// Start from a ledger carried over from earlier rounds.
    #[must_use]
    pub fn with_seen(mut self, seen: HashSet<CardId>) -> Self {
        self.seen = seen;
        self
    }

    /// Attach the description of the market event shaping this round.
    #[must_use]
    pub fn with_event(mut self, description: impl Into<String>) -> Self {
        self.event = Some(description.into());
        self
    }

    fn require(&self, allowed: &[RoundPhase], operation: &'static str) -> Result<()> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(MarketError::InvalidPhase {
                operation,
                phase: self.phase,
            })
        }
    }

    // =========================================================================
    // Dealing and visibility
    // =========================================================================

    /// Append a face-down card.
    pub fn add_card(&mut self, card: Card) -> Result<()> {
        self.require(&[RoundPhase::Dealing], "add a card")?;
        self.context.value(&card)?;
        if self.hand.len() >= self.hand_size {
            return Err(MarketError::HandFull(self.hand_size));
        }
        self.hand.push(card);
        self.face_up.push(false);
        Ok(())
    }

    /// Randomly turn up part of the first third of the hand.
    ///
    /// Only slots below `⌊N/3⌋` are eligible; each is face-up with probability
    /// `face_up_chance`. Everything else stays face-down.
    pub fn assign_visibility(&mut self, rng: &mut GameRng, face_up_chance: f64) -> Result<()> {
        self.require(&[RoundPhase::Dealing], "assign visibility")?;
        if self.hand.is_empty() {
            return Err(MarketError::EmptyHand);
        }

        let eligible = self.hand.len() / 3;
        for (slot, up) in self.face_up.iter_mut().enumerate() {
            *up = slot < eligible && rng.gen_bool(face_up_chance);
        }
        for (card, up) in self.hand.iter().zip(&self.face_up) {
            if *up {
                self.seen.insert(card.id);
            }
        }

        self.dealt_view = self.show_hand(FACE_DOWN);
        self.phase = RoundPhase::Visible;
        debug!(
            round = self.number,
            hand = %self.dealt_view,
            "visibility assigned"
        );
        Ok(())
    }

    /// Disclose one slot. Revealing a seen card again is a no-op.
    pub fn reveal(&mut self, slot: usize) -> Result<()> {
        if self.phase == RoundPhase::Dealing {
            return Err(MarketError::InvalidPhase {
                operation: "reveal a card",
                phase: self.phase,
            });
        }
        let len = self.hand.len();
        let card = self
            .hand
            .get(slot)
            .ok_or(MarketError::SlotOutOfRange { slot, len })?;
        self.seen.insert(card.id);
        self.face_up[slot] = true;
        Ok(())
    }

    /// Disclose the whole hand and return its rendering.
    pub fn reveal_all(&mut self) -> String {
        for (card, up) in self.hand.iter().zip(self.face_up.iter_mut()) {
            self.seen.insert(card.id);
            *up = true;
        }
        self.show_hand(FACE_DOWN)
    }

    /// Render the hand as 4-wide cells, face-down cards as `face_down_symbol`.
    #[must_use]
    pub fn show_hand(&self, face_down_symbol: &str) -> String {
        self.hand
            .iter()
            .zip(&self.face_up)
            .map(|(card, up)| {
                if *up {
                    format!("{:<4}", card.to_string())
                } else {
                    format!("{:<4}", face_down_symbol)
                }
            })
            .collect()
    }

    // =========================================================================
    // Valuation
    // =========================================================================

    /// True value of the whole hand.
    pub fn sum_value(&self) -> Result<i64> {
        self.hand.iter().map(|c| self.context.value(c)).sum()
    }

    /// Sum of the face-up cards.
    pub fn face_up_sum(&self) -> Result<i64> {
        self.hand
            .iter()
            .zip(&self.face_up)
            .filter(|(_, up)| **up)
            .map(|(c, _)| self.context.value(c))
            .sum()
    }

    /// Number of face-down slots.
    #[must_use]
    pub fn face_down_count(&self) -> usize {
        self.face_up.iter().filter(|up| !**up).count()
    }

    /// Expected hand value given what the player has seen.
    ///
    /// Face-up cards count exactly; each face-down card counts as the mean of
    /// the reference cards not in the seen ledger. With nothing left unseen the
    /// hand is fully known and the exact sum is used.
    pub fn estimate_ev(&mut self) -> Result<f64> {
        self.require(&[RoundPhase::Visible, RoundPhase::Estimated], "estimate EV")?;

        let unseen = self.context.unseen_values(&self.seen)?;
        let ev = if unseen.is_empty() {
            debug!(round = self.number, "no unseen cards left; EV is exact");
            self.sum_value()? as f64
        } else {
            let ev_unseen = unseen.iter().sum::<i64>() as f64 / unseen.len() as f64;
            let mut ev = 0.0;
            for (card, up) in self.hand.iter().zip(&self.face_up) {
                ev += if *up {
                    self.context.value(card)? as f64
                } else {
                    ev_unseen
                };
            }
            ev
        };

        self.ev = Some(ev);
        self.phase = RoundPhase::Estimated;
        debug!(round = self.number, ev, "EV estimated");
        Ok(ev)
    }

    /// Worst-case hand value consistent with what has been seen.
    ///
    /// Face-down slots take, in order, the highest remaining unseen values
    /// without replacement.
    pub fn compute_max_exposure(&self) -> Result<i64> {
        if self.phase == RoundPhase::Dealing {
            return Err(MarketError::InvalidPhase {
                operation: "compute max exposure",
                phase: self.phase,
            });
        }

        let mut unseen = self.context.unseen_values(&self.seen)?;
        unseen.sort_unstable_by(|a, b| b.cmp(a));
        let mut highest = unseen.into_iter();

        let mut total = 0;
        for (card, up) in self.hand.iter().zip(&self.face_up) {
            let value = self.context.value(card)?;
            total += if *up {
                value
            } else {
                highest.next().unwrap_or(value)
            };
        }
        Ok(total)
    }

    /// Exact distribution of the hand value over all ordered unseen draws.
    ///
    /// Refuses with `EnumerationTooLarge` past `limit` permutations.
    pub fn compute_value_distribution(&self, limit: u64) -> Result<ValueDistribution> {
        if self.phase == RoundPhase::Dealing {
            return Err(MarketError::InvalidPhase {
                operation: "compute the value distribution",
                phase: self.phase,
            });
        }

        let unseen = self.context.unseen_values(&self.seen)?;
        let hidden = HiddenHand {
            face_up_sum: self.face_up_sum()?,
            exact_sum: self.sum_value()?,
            unseen: &unseen,
            draws: self.face_down_count(),
        };
        hidden_value_distribution(&hidden, limit)
    }

    // =========================================================================
    // Trading
    // =========================================================================

    /// Quote a bid/ask around the estimated EV.
    pub fn quote_spread(&mut self, config: &SpreadConfig, rng: &mut GameRng) -> Result<Spread> {
        self.require(&[RoundPhase::Estimated], "quote a spread")?;
        let ev = self.ev.ok_or(MarketError::InvalidPhase {
            operation: "quote a spread",
            phase: self.phase,
        })?;

        let spread = Spread::quote(ev, config, rng);
        self.spread = Some(spread);
        self.phase = RoundPhase::Quoted;
        debug!(round = self.number, bid = spread.bid, ask = spread.ask, "spread quoted");
        Ok(spread)
    }

    /// Balance an order of `units` ties up at the current quote.
    fn required_balance(&self, side: Side, units: i64) -> Result<i64> {
        let spread = self.spread.ok_or(MarketError::InvalidPhase {
            operation: "price an order",
            phase: self.phase,
        })?;
        let per_unit = match side {
            Side::Buy => Some(spread.ask),
            Side::Sell => self.compute_max_exposure()?.checked_sub(spread.bid),
            Side::Pass => return Ok(0),
        };
        per_unit
            .and_then(|p| p.checked_mul(units))
            .ok_or(MarketError::Overflow("order size"))
    }

    /// Check that the order's P/L, and the balance after it, stay in range
    /// for every hand value in `[0, max_exposure]`.
    fn check_pnl_range(&self, side: Side, units: i64) -> Result<()> {
        let high = self.compute_max_exposure()?;
        for true_value in [0, high] {
            let pnl = self.pnl_at(side, units, true_value)?;
            self.start_balance
                .checked_add(pnl)
                .ok_or(MarketError::Overflow("balance after settlement"))?;
        }
        Ok(())
    }

    /// P/L of an order if the hand is worth `true_value`.
    fn pnl_at(&self, side: Side, units: i64, true_value: i64) -> Result<i64> {
        let spread = self.spread.ok_or(MarketError::InvalidPhase {
            operation: "price an order",
            phase: self.phase,
        })?;
        let per_unit = match side {
            Side::Buy => true_value.checked_sub(spread.ask),
            Side::Sell => spread.bid.checked_sub(true_value),
            Side::Pass => return Ok(0),
        };
        per_unit
            .and_then(|p| p.checked_mul(units))
            .ok_or(MarketError::Overflow("order P/L"))
    }

    /// Whether the starting balance covers an order.
    ///
    /// Buy needs `ask × units`; Sell needs `(max_exposure − bid) × units`.
    /// Pass is always valid. Without a quote nothing but Pass is valid, and
    /// neither is an order whose P/L could leave the `i64` range.
    /// This is a balance check only; `place_order` also demands positive units.
    #[must_use]
    pub fn validate_order(&self, side: Side, units: i64) -> bool {
        match side {
            Side::Pass => true,
            _ if units < 0 => false,
            _ => {
                self.required_balance(side, units)
                    .is_ok_and(|required| required <= self.start_balance)
                    && self.check_pnl_range(side, units).is_ok()
            }
        }
    }

    /// Place the round's single order.
    ///
    /// A rejected order leaves the round untouched so the caller can retry.
    pub fn place_order(&mut self, side: Side, units: i64) -> Result<Order> {
        self.require(&[RoundPhase::Quoted], "place an order")?;

        let order = match side {
            Side::Pass => Order::pass(),
            _ if units <= 0 => return Err(MarketError::InvalidUnits(side)),
            _ => {
                let required = self.required_balance(side, units)?;
                if required > self.start_balance {
                    debug!(round = self.number, %side, units, required, "order rejected");
                    return Err(MarketError::OrderRejected {
                        side,
                        units,
                        required,
                        balance: self.start_balance,
                    });
                }
                self.check_pnl_range(side, units)?;
                Order { side, units }
            }
        };

        self.order = Some(order);
        self.phase = RoundPhase::Ordered;
        debug!(round = self.number, %order, "order placed");
        Ok(order)
    }

    /// Reveal the hand and compute the order's true P/L.
    ///
    /// Settling again returns the stored result.
    pub fn settle(&mut self) -> Result<Settlement> {
        if let Some(settlement) = self.settlement {
            return Ok(settlement);
        }
        self.require(&[RoundPhase::Ordered], "settle")?;
        let Some(order) = self.order else {
            return Err(MarketError::InvalidPhase {
                operation: "settle",
                phase: self.phase,
            });
        };

        let true_value = self.sum_value()?;
        let pnl = self.pnl_at(order.side, order.units, true_value)?;
        self.reveal_all();

        let settlement = Settlement { true_value, pnl };
        self.settlement = Some(settlement);
        self.phase = RoundPhase::Settled;
        debug!(round = self.number, true_value, pnl, "round settled");
        Ok(settlement)
    }

    // =========================================================================
    // Balances and reporting
    // =========================================================================

    pub fn set_start_balance(&mut self, balance: i64) {
        self.start_balance = balance;
    }

    pub fn set_end_balance(&mut self, balance: i64) {
        self.end_balance = balance;
    }

    /// Record the P/L the player worked out themselves.
    pub fn record_reported_pnl(&mut self, pnl: i64) {
        self.reported_pnl = pnl;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn number(&self) -> usize {
        self.number
    }

    #[must_use]
    pub fn context(&self) -> &RoundContext {
        &self.context
    }

    #[must_use]
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    #[must_use]
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    #[must_use]
    pub fn visibility(&self) -> &[bool] {
        &self.face_up
    }

    #[must_use]
    pub fn seen(&self) -> &HashSet<CardId> {
        &self.seen
    }

    /// The hand as first shown to the player.
    #[must_use]
    pub fn dealt_view(&self) -> &str {
        &self.dealt_view
    }

    #[must_use]
    pub fn ev(&self) -> Option<f64> {
        self.ev
    }

    #[must_use]
    pub fn spread(&self) -> Option<Spread> {
        self.spread
    }

    #[must_use]
    pub fn order(&self) -> Option<Order> {
        self.order
    }

    #[must_use]
    pub fn settlement(&self) -> Option<Settlement> {
        self.settlement
    }

    #[must_use]
    pub fn event(&self) -> Option<&str> {
        self.event.as_deref()
    }

    #[must_use]
    pub fn start_balance(&self) -> i64 {
        self.start_balance
    }

    #[must_use]
    pub fn end_balance(&self) -> i64 {
        self.end_balance
    }

    #[must_use]
    pub fn reported_pnl(&self) -> i64 {
        self.reported_pnl
    }

    /// Engine-computed P/L, zero until settled.
    #[must_use]
    pub fn true_pnl(&self) -> i64 {
        self.settlement.map_or(0, |s| s.pnl)
    }
}

impl std::fmt::Display for Round {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ev = self.ev.unwrap_or_default();
        let reveal: String = self
            .hand
            .iter()
            .map(|c| format!("{:<4}", c.to_string()))
            .collect();
        let actual = self.sum_value().unwrap_or_default();
        let spread = self
            .spread
            .map_or_else(|| "none".to_string(), |s| s.to_string());
        let order = self.order.map_or_else(|| "none".to_string(), |o| o.to_string());

        writeln!(f, "Round:         {}", self.number)?;
        if let Some(event) = &self.event {
            writeln!(f, "Event:         {event}")?;
        }
        writeln!(f, "Cards:         {} (EV = {ev:.2})", self.dealt_view)?;
        writeln!(f, "Reveal:        {reveal} (Actual = {actual})")?;
        writeln!(f, "Spread:        {spread}")?;
        writeln!(f, "Order:         {order}")?;
        writeln!(f, "P/L reported:  {}", self.reported_pnl)?;
        writeln!(f, "P/L actual:    {}", self.true_pnl())?;
        writeln!(f, "Start balance: {}", self.start_balance)?;
        write!(f, "End balance:   {}", self.end_balance)
    }
}
