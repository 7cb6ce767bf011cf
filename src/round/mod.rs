//! Round engine: dealing, visibility, EV estimation, quoting, orders and settlement.
//!
//! ## Key Types
//!
//! - `Round`: one hand and its lifecycle
//! - `RoundContext`: reference population and rank values for the round
//! - `Spread`: the market maker's bid/ask
//! - `Order`, `Side`, `Settlement`: the player's trade and its outcome

pub mod context;
pub mod engine;
pub mod order;
pub mod spread;

pub use context::RoundContext;
pub use engine::{Round, RoundPhase, FACE_DOWN};
pub use order::{Order, Settlement, Side};
pub use spread::Spread;
