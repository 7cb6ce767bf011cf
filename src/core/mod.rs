//! Core building blocks: the seedable random source and game configuration.

pub mod config;
pub mod rng;

pub use config::{DeckSchema, GameSettings, SeenMemory, SpreadConfig, TurnTimer};
pub use rng::{GameRng, GameRngState};
