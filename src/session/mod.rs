//! Session orchestration: a sequence of rounds against one shuffled deck.
//!
//! The session owns the settings, the game deck, the player's balance and the
//! archive of finished rounds. Each round gets a fresh `Round` and its own
//! forked random stream.
//!
//! ```
//! use card_market::core::GameSettings;
//! use card_market::round::Side;
//! use card_market::session::Session;
//!
//! let mut session = Session::new(GameSettings::default(), 42).unwrap();
//! while let Some(mut round) = session.start_round().unwrap() {
//!     round.place_order(Side::Pass, 0).unwrap();
//!     session.finish_round(round, None).unwrap();
//! }
//! assert_eq!(session.history().len(), 3);
//! assert_eq!(session.balance(), 500);
//! ```

pub mod player;

pub use player::Player;

use im::HashSet;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cards::{CardId, Deck, Rank};
use crate::core::{GameRng, GameRngState, GameSettings, SeenMemory};
use crate::distribution::ValueDistribution;
use crate::error::Result;
use crate::events::roll_event;
use crate::round::{Round, RoundContext, Settlement};

/// Exported session: where its random stream stands and every finished round.
///
/// `GameRng::from_state(&record.rng)` continues the stream the next round
/// would have forked from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub seed: u64,
    pub rng: GameRngState,
    pub balance: i64,
    pub rounds: Vec<Round>,
}

/// A game session.
#[derive(Debug)]
pub struct Session {
    settings: GameSettings,
    base: RoundContext,
    deck: Deck,
    rng: GameRng,
    player: Player,
    history: Vec<Round>,
    seen: HashSet<CardId>,
    next_round: usize,
}

impl Session {
    /// Validate settings, build the deck and shuffle it.
    pub fn new(settings: GameSettings, seed: u64) -> Result<Self> {
        settings.validate()?;
        let base = RoundContext::from_schema(&settings.deck)?;
        let rng = GameRng::new(seed);

        let mut deck = base.reference().clone();
        deck.shuffle(&mut rng.for_context("shuffle"));

        info!(
            seed,
            cards = deck.len(),
            rounds = settings.rounds,
            "session started"
        );
        Ok(Self {
            player: Player::new(settings.start_balance),
            settings,
            base,
            deck,
            rng,
            history: Vec::new(),
            seen: HashSet::new(),
            next_round: 1,
        })
    }

    /// Deal and quote the next round.
    ///
    /// Returns `None` once every round has been played or the deck runs dry.
    /// The returned round is `Quoted`; the caller places the order.
    pub fn start_round(&mut self) -> Result<Option<Round>> {
        if self.next_round > self.settings.rounds || self.deck.is_empty() {
            return Ok(None);
        }

        let mut rng = self.rng.fork();
        let mut round = self.prepare_round(&mut rng);
        let restricted = round
            .event()
            .map(|_| round.context().reference().clone());

        for _ in 0..self.settings.cards_per_round {
            let card = match &restricted {
                Some(reference) => self.deck.draw_matching(|c| reference.contains(c.id)),
                None => self.deck.draw(),
            };
            let Some(card) = card else { break };
            if let Err(e) = round.add_card(card.clone()) {
                for dealt in round.hand().iter().cloned().chain([card]) {
                    self.deck.put_bottom(dealt);
                }
                return Err(e);
            }
        }
        if round.hand().is_empty() {
            return Ok(None);
        }

        round.assign_visibility(&mut rng, self.settings.face_up_chance)?;
        round.estimate_ev()?;
        round.set_start_balance(self.player.balance());
        round.quote_spread(&self.settings.spread, &mut rng)?;

        self.next_round += 1;
        Ok(Some(round))
    }

    /// Build the empty round, applying a market event when one fires.
    fn prepare_round(&self, rng: &mut GameRng) -> Round {
        let number = self.next_round;
        let hand_size = self.settings.cards_per_round;
        let mut round = Round::new(number, self.base.clone(), hand_size);

        if self.settings.market_events {
            if let Some(event) = roll_event(rng, self.settings.market_event_chance, &self.base) {
                match event.apply(&self.base) {
                    Ok(context) if self.dealable(&context) => {
                        info!(round = number, event = %event.description(), "market event");
                        round = Round::new(number, context, hand_size).with_event(event.description());
                    }
                    Ok(_) => warn!(
                        round = number,
                        event = %event.description(),
                        "too few eligible cards left; event skipped"
                    ),
                    Err(e) => warn!(round = number, error = %e, "market event skipped"),
                }
            }
        }

        if self.settings.seen_memory == SeenMemory::Session {
            round = round.with_seen(self.seen.clone());
        }
        round
    }

    /// Whether the deck still holds a full hand of cards from `context`.
    fn dealable(&self, context: &RoundContext) -> bool {
        let eligible = self
            .deck
            .iter()
            .filter(|c| context.reference().contains(c.id))
            .count();
        eligible >= self.settings.cards_per_round
    }

    /// Exact value distribution of a round's hidden cards.
    pub fn distribution(&self, round: &Round) -> Result<ValueDistribution> {
        round.compute_value_distribution(self.settings.max_enumeration)
    }

    /// Settle a round, apply its P/L to the balance and archive it.
    pub fn finish_round(&mut self, mut round: Round, reported_pnl: Option<i64>) -> Result<Settlement> {
        let settlement = round.settle()?;
        if let Some(pnl) = reported_pnl {
            round.record_reported_pnl(pnl);
        }

        let balance = self.player.apply_pnl(settlement.pnl)?;
        round.set_end_balance(balance);
        if self.settings.seen_memory == SeenMemory::Session {
            self.seen = self.seen.clone().union(round.seen().clone());
        }

        info!(
            round = round.number(),
            true_value = settlement.true_value,
            pnl = settlement.pnl,
            balance = self.player.balance(),
            "round finished"
        );
        self.history.push(round);
        Ok(settlement)
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    #[must_use]
    pub fn balance(&self) -> i64 {
        self.player.balance()
    }

    /// Finished rounds, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Round] {
        &self.history
    }

    /// Cards left in the game deck.
    #[must_use]
    pub fn cards_remaining(&self) -> usize {
        self.deck.len()
    }

    /// `"K ♥♦♣♠ = 13"` style lines for every rank.
    #[must_use]
    pub fn card_value_lines(&self) -> Vec<String> {
        let suits = self.settings.deck.suits.concat();
        self.settings
            .deck
            .ranks
            .iter()
            .map(|rank| {
                let value = self
                    .base
                    .values()
                    .value_of(&Rank::new(rank.as_str()))
                    .map_or_else(|_| "?".to_string(), |v| v.to_string());
                format!("{rank:<2}{suits} = {value}")
            })
            .collect()
    }

    /// Post-game summary of every finished round.
    #[must_use]
    pub fn summary(&self) -> String {
        self.history
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Snapshot of the session for export.
    #[must_use]
    pub fn record(&self) -> SessionRecord {
        SessionRecord {
            seed: self.rng.seed(),
            rng: self.rng.state(),
            balance: self.player.balance(),
            rounds: self.history.clone(),
        }
    }

    /// The session record as JSON.
    pub fn history_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.record())
    }
}
