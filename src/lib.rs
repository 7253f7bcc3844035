//! Bobr Ladder - a two-column wagering ladder
//!
//! Core modules:
//! - `game`: Pure rules (round state machine, rewards, board view-model)
//! - `bet`: Bet progression and adjustment
//! - `amount`: Fixed-point money and the shared rounding rule
//! - `config`: Game configuration
//! - `session`: Owns the state and RNG, the entry point for front ends
//! - `web`: Browser bindings (wasm32 only)

pub mod amount;
pub mod bet;
pub mod config;
pub mod error;
pub mod game;
pub mod session;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use amount::{Amount, format_value};
pub use bet::BetAdjust;
pub use config::GameConfig;
pub use error::{Error, Result};
pub use game::{Action, ControlState, GameState, Side};
pub use session::Session;
