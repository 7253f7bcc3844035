//! Ladder board view-model
//!
//! Turns a state snapshot into the rows a front end draws: top level first,
//! down to the first presented level.

use serde::{Deserialize, Serialize};

use super::rewards::reward_table;
use super::state::{FIRST_PRESENTED_LEVEL, GameState, LevelResult, Side};
use crate::amount::Amount;
use crate::config::GameConfig;

/// What one cell of a row shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    /// The level's reward
    Reward,
    /// The player's correct pick
    Correct,
    /// The player's wrong pick
    Missed,
    /// The correct side, revealed after a loss
    Revealed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardRow {
    pub level: u32,
    pub reward: Amount,
    /// The level awaiting a choice
    pub is_current: bool,
    pub left: Cell,
    pub right: Cell,
}

fn cell_for(result: Option<&LevelResult>, side: Side) -> Cell {
    match result {
        Some(r) if r.chosen_side == side => match (r.forced_reveal, r.was_correct) {
            (true, _) => Cell::Revealed,
            (false, true) => Cell::Correct,
            (false, false) => Cell::Missed,
        },
        _ => Cell::Reward,
    }
}

/// Board rows for `state`, highest level first
pub fn rows(state: &GameState, config: &GameConfig) -> Vec<BoardRow> {
    let rewards = reward_table(state.bet, config);
    let lowest = FIRST_PRESENTED_LEVEL.min(config.max_levels);

    (lowest..=config.max_levels)
        .rev()
        .map(|level| {
            let result = state.result_at(level);
            BoardRow {
                level,
                reward: rewards[(level - 1) as usize],
                is_current: state.round_active && level == state.current_level,
                left: cell_for(result, Side::Left),
                right: cell_for(result, Side::Right),
            }
        })
        .collect()
}
