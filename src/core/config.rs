//! Game configuration.
//!
//! Everything the original game kept in process-wide constants lives in
//! `GameSettings`, which the session threads into each round:
//! - `DeckSchema`: ranks, suits and face-card values
//! - `SpreadConfig`: market-maker noise and width bounds
//! - `SeenMemory`: whether the seen ledger survives between rounds
//!
//! Settings can be built in code or loaded from JSON.

use std::time::Duration;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{MarketError, Result};

/// Rank/suit universe and the values of non-numeric ranks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckSchema {
    /// Rank symbols in display order.
    pub ranks: Vec<String>,
    /// Suit symbols. Suits never affect value.
    pub suits: Vec<String>,
    /// Values for ranks that are not plain integers.
    #[serde(default)]
    pub face_values: FxHashMap<String, i64>,
}

impl DeckSchema {
    /// Create a schema from explicit ranks and suits.
    pub fn new<R, S>(ranks: R, suits: S) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            ranks: ranks.into_iter().map(Into::into).collect(),
            suits: suits.into_iter().map(Into::into).collect(),
            face_values: FxHashMap::default(),
        }
    }

    /// Add a value for a symbolic rank.
    #[must_use]
    pub fn with_face_value(mut self, rank: impl Into<String>, value: i64) -> Self {
        self.face_values.insert(rank.into(), value);
        self
    }

    /// 2-10, J, Q, K, A over the four French suits. Aces are high.
    #[must_use]
    pub fn standard() -> Self {
        let ranks = (2..=10)
            .map(|r| r.to_string())
            .chain(["J", "Q", "K", "A"].map(String::from));
        Self::new(ranks, ["♥", "♦", "♣", "♠"])
            .with_face_value("J", 11)
            .with_face_value("Q", 12)
            .with_face_value("K", 13)
            .with_face_value("A", 14)
    }

    /// Ranks 1-20 over five animal suits.
    #[must_use]
    pub fn animals() -> Self {
        Self::new(
            (1..=20).map(|r| r.to_string()),
            ["🐄", "🐍", "🐕", "🐬", "🐞"],
        )
    }

    /// Ranks 1-30 over seven symbol suits.
    #[must_use]
    pub fn symbols() -> Self {
        Self::new(
            (1..=30).map(|r| r.to_string()),
            ["⚽", "⭐", "❌", "🔶", "✅", "♒", "🔵"],
        )
    }

    /// Number of cards in the full population.
    #[must_use]
    pub fn population(&self) -> usize {
        self.ranks.len() * self.suits.len()
    }
}

impl Default for DeckSchema {
    fn default() -> Self {
        Self::standard()
    }
}

/// Market-maker quoting parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadConfig {
    /// Offset noise is drawn from `[-EV/divisor, EV/divisor]`.
    pub noise_divisor: i64,
    /// Narrowest quote width.
    pub min_width: i64,
    /// Widest quote width.
    pub max_width: i64,
}

impl Default for SpreadConfig {
    fn default() -> Self {
        Self {
            noise_divisor: 5,
            min_width: 2,
            max_width: 6,
        }
    }
}

/// Scope of the seen-card ledger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeenMemory {
    /// Each round starts with an empty ledger.
    #[default]
    PerRound,
    /// Cards disclosed in earlier rounds stay seen for the whole session.
    Session,
}

/// Per-turn time allowance.
///
/// Displayed to the player but never enforced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnTimer {
    turn_time: Duration,
}

impl TurnTimer {
    /// Create a timer with the given allowance in seconds.
    #[must_use]
    pub const fn new(seconds: u64) -> Self {
        Self {
            turn_time: Duration::from_secs(seconds),
        }
    }

    /// The configured allowance.
    #[must_use]
    pub const fn turn_time(&self) -> Duration {
        self.turn_time
    }
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Cards dealt into each round's hand.
    pub cards_per_round: usize,
    /// Rounds per session.
    pub rounds: usize,
    /// Turn time limit in seconds (informational).
    pub time_limit: u64,
    /// Whether market events may fire.
    pub market_events: bool,
    /// Probability a market event fires in a round.
    pub market_event_chance: f64,
    /// Player balance at session start.
    pub start_balance: i64,
    /// Whether the front end shows the balance.
    pub show_balance: bool,
    /// Whether the front end shows the hidden-value histogram each round.
    pub show_distribution: bool,
    /// Probability an eligible slot is dealt face-up.
    pub face_up_chance: f64,
    /// Quoting parameters.
    pub spread: SpreadConfig,
    /// Ledger scope.
    pub seen_memory: SeenMemory,
    /// Largest permutation count the distribution engine will enumerate.
    pub max_enumeration: u64,
    /// Rank/suit universe.
    pub deck: DeckSchema,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            cards_per_round: 3,
            rounds: 3,
            time_limit: 60,
            market_events: false,
            market_event_chance: 0.5,
            start_balance: 500,
            show_balance: true,
            show_distribution: true,
            face_up_chance: 0.5,
            spread: SpreadConfig::default(),
            seen_memory: SeenMemory::default(),
            max_enumeration: 10_000_000,
            deck: DeckSchema::default(),
        }
    }
}

impl GameSettings {
    /// Default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| MarketError::Settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    #[must_use]
    pub fn with_cards_per_round(mut self, cards: usize) -> Self {
        self.cards_per_round = cards;
        self
    }

    #[must_use]
    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    #[must_use]
    pub fn with_start_balance(mut self, balance: i64) -> Self {
        self.start_balance = balance;
        self
    }

    #[must_use]
    pub fn with_market_events(mut self, chance: f64) -> Self {
        self.market_events = true;
        self.market_event_chance = chance;
        self
    }

    #[must_use]
    pub fn with_face_up_chance(mut self, chance: f64) -> Self {
        self.face_up_chance = chance;
        self
    }

    #[must_use]
    pub fn with_seen_memory(mut self, memory: SeenMemory) -> Self {
        self.seen_memory = memory;
        self
    }

    #[must_use]
    pub fn with_deck(mut self, deck: DeckSchema) -> Self {
        self.deck = deck;
        self
    }

    /// The (unenforced) turn timer.
    #[must_use]
    pub fn turn_timer(&self) -> TurnTimer {
        TurnTimer::new(self.time_limit)
    }

    /// Reject settings no session could run with.
    pub fn validate(&self) -> Result<()> {
        if self.deck.ranks.is_empty() {
            return Err(MarketError::EmptyRanks);
        }
        if self.deck.suits.is_empty() {
            return Err(MarketError::EmptySuits);
        }
        if let Some((rank, value)) = self.deck.face_values.iter().find(|(_, v)| **v < 0) {
            return Err(MarketError::Settings(format!(
                "face value {value} for rank {rank} is negative"
            )));
        }
        if self.cards_per_round == 0 {
            return Err(MarketError::Settings("cards_per_round must be positive".into()));
        }
        if self.cards_per_round > self.deck.population() {
            return Err(MarketError::Settings(format!(
                "cards_per_round {} exceeds deck of {}",
                self.cards_per_round,
                self.deck.population()
            )));
        }
        if self.rounds == 0 {
            return Err(MarketError::Settings("rounds must be positive".into()));
        }
        if self.start_balance < 0 {
            return Err(MarketError::Settings("start_balance cannot be negative".into()));
        }
        for (name, p) in [
            ("face_up_chance", self.face_up_chance),
            ("market_event_chance", self.market_event_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(MarketError::Settings(format!("{name} must lie in [0, 1]")));
            }
        }
        let spread = &self.spread;
        if spread.noise_divisor <= 0 {
            return Err(MarketError::Settings("noise_divisor must be positive".into()));
        }
        if spread.min_width < 0 || spread.min_width > spread.max_width {
            return Err(MarketError::Settings(format!(
                "spread widths [{}, {}] are not a valid range",
                spread.min_width, spread.max_width
            )));
        }
        Ok(())
    }

    /// Human-readable settings, one `Name = value` line each.
    #[must_use]
    pub fn display_lines(&self) -> Vec<String> {
        vec![
            format!("Cards Per Round = {}", self.cards_per_round),
            format!("Rounds = {}", self.rounds),
            format!("Time Limit = {}", self.time_limit),
            format!("Market Events = {}", self.market_events),
            format!("Start Balance = {}", self.start_balance),
            format!("Show Balance = {}", self.show_balance),
            format!("Show Distribution = {}", self.show_distribution),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_classic_game() {
        let settings = GameSettings::default();
        assert_eq!(settings.cards_per_round, 3);
        assert_eq!(settings.rounds, 3);
        assert_eq!(settings.start_balance, 500);
        assert_eq!(settings.deck.population(), 52);
        assert_eq!(settings.spread, SpreadConfig { noise_divisor: 5, min_width: 2, max_width: 6 });
        assert_eq!(settings.seen_memory, SeenMemory::PerRound);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        assert_eq!(DeckSchema::animals().population(), 100);
        assert_eq!(DeckSchema::symbols().population(), 210);
        assert_eq!(DeckSchema::standard().face_values.get("A"), Some(&14));
    }

    #[test]
    fn test_builder() {
        let settings = GameSettings::new()
            .with_cards_per_round(6)
            .with_rounds(5)
            .with_start_balance(1000)
            .with_market_events(0.25)
            .with_seen_memory(SeenMemory::Session);

        assert_eq!(settings.cards_per_round, 6);
        assert_eq!(settings.rounds, 5);
        assert_eq!(settings.start_balance, 1000);
        assert!(settings.market_events);
        assert_eq!(settings.market_event_chance, 0.25);
        assert_eq!(settings.seen_memory, SeenMemory::Session);
    }

    #[test]
    fn test_validate_rejects_empty_deck() {
        let no_ranks = GameSettings::new().with_deck(DeckSchema::new(Vec::<String>::new(), ["♥"]));
        assert_eq!(no_ranks.validate(), Err(MarketError::EmptyRanks));

        let no_suits = GameSettings::new().with_deck(DeckSchema::new(["2"], Vec::<String>::new()));
        assert_eq!(no_suits.validate(), Err(MarketError::EmptySuits));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(GameSettings::new().with_face_up_chance(1.5).validate().is_err());
        assert!(GameSettings::new().with_cards_per_round(0).validate().is_err());
        assert!(GameSettings::new().with_cards_per_round(53).validate().is_err());
        assert!(GameSettings::new().with_start_balance(-1).validate().is_err());

        let negative = GameSettings::new().with_deck(DeckSchema::standard().with_face_value("K", -13));
        assert_eq!(
            negative.validate(),
            Err(MarketError::Settings("face value -13 for rank K is negative".into()))
        );
        assert!(GameSettings::from_json(r#"{"deck": {"ranks": ["2", "Q"], "suits": ["♥"], "face_values": {"Q": -1}}}"#).is_err());

        let mut inverted = GameSettings::new();
        inverted.spread.min_width = 8;
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let settings = GameSettings::from_json(r#"{"rounds": 5, "start_balance": 250}"#).unwrap();
        assert_eq!(settings.rounds, 5);
        assert_eq!(settings.start_balance, 250);
        assert_eq!(settings.cards_per_round, 3);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            GameSettings::from_json("{ not json"),
            Err(MarketError::Settings(_))
        ));
        assert!(GameSettings::from_json(r#"{"rounds": 0}"#).is_err());
    }

    #[test]
    fn test_display_lines() {
        let lines = GameSettings::default().display_lines();
        assert!(lines.contains(&"Start Balance = 500".to_string()));
        assert!(lines.contains(&"Market Events = false".to_string()));
        assert!(lines.contains(&"Show Distribution = true".to_string()));
    }

    #[test]
    fn test_turn_timer() {
        let timer = GameSettings::default().turn_timer();
        assert_eq!(timer.turn_time(), Duration::from_secs(60));
    }
}
