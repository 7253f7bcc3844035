//! Ladder game core
//!
//! All rules live here. Like a simulation step, every transition is pure:
//! - One action in, one new state out
//! - Seeded RNG only, drawn once per round
//! - No rendering, storage or platform dependencies

pub mod board;
pub mod rewards;
pub mod state;
pub mod transition;

pub use board::{BoardRow, Cell, rows};
pub use rewards::{reward_at, reward_table};
pub use state::{
    ControlState, FIRST_PRESENTED_LEVEL, GameState, LevelResult, RoundOutcome, Settlement, Side,
};
pub use transition::{Action, apply, primary_target};
