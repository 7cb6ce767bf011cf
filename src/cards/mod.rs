//! Cards, decks and the rank-value table.
//!
//! ## Key Types
//!
//! - `CardId`: identity stable across shuffles
//! - `Card`: immutable id/rank/suit triple
//! - `Deck`: ordered population (game deck or reference snapshot)
//! - `RankValues`: rank → integer value mapping

pub mod card;
pub mod deck;
pub mod values;

pub use card::{Card, CardId, Rank, Suit};
pub use deck::Deck;
pub use values::RankValues;
