//! Game state and round data
//!
//! Everything a presentation layer needs to draw the table lives here and
//! serializes to a JSON snapshot.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::config::GameConfig;
use crate::error::Error;

/// Level a round opens on. Level 1 is the entry level and is never presented.
pub const FIRST_PRESENTED_LEVEL: u32 = 2;

/// One of the two columns of the ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" | "l" => Ok(Side::Left),
            "right" | "r" => Ok(Side::Right),
            other => Err(Error::InvalidInput(format!("unknown side {other:?}"))),
        }
    }
}

/// The secret correct side for every level of a round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome(Vec<Side>);

impl RoundOutcome {
    /// Draw `levels` independent fair coin flips
    pub fn generate<R: Rng>(rng: &mut R, levels: u32) -> Self {
        Self(
            (0..levels)
                .map(|_| if rng.random_bool(0.5) { Side::Left } else { Side::Right })
                .collect(),
        )
    }

    /// Correct side at a 1-based level
    pub fn side_at(&self, level: u32) -> Option<Side> {
        let index = usize::try_from(level).ok()?.checked_sub(1)?;
        self.0.get(index).copied()
    }

    pub fn as_slice(&self) -> &[Side] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Side>> for RoundOutcome {
    fn from(sides: Vec<Side>) -> Self {
        Self(sides)
    }
}

/// What happened at one level of the current round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelResult {
    /// 1-based level
    pub level: u32,
    pub chosen_side: Side,
    pub was_correct: bool,
    /// Synthesized after a loss to reveal the rest of the ladder (display only)
    pub forced_reveal: bool,
}

/// Primary button mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlState {
    /// No round: the button starts one ("PLAY")
    Ready,
    /// Round started, nothing chosen yet: the button refunds the bet ("END")
    Cancelable,
    /// At least one choice made: the button banks the reward ("TAKE")
    Collectible,
}

impl ControlState {
    /// Derive the button mode from the round flags
    pub fn derive(round_active: bool, has_acted: bool) -> Self {
        match (round_active, has_acted) {
            (false, _) => ControlState::Ready,
            (true, false) => ControlState::Cancelable,
            (true, true) => ControlState::Collectible,
        }
    }

    /// Button caption
    pub fn label(&self) -> &'static str {
        match self {
            ControlState::Ready => "PLAY",
            ControlState::Cancelable => "END",
            ControlState::Collectible => "TAKE",
        }
    }
}

impl fmt::Display for ControlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How the last round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Settlement {
    /// Cleared the top level; the top reward was credited
    Completed(Amount),
    /// Banked the accrued reward mid-ladder
    CashedOut(Amount),
    /// Cancelled before choosing; the bet was returned
    Refunded(Amount),
    /// Wrong side; the bet is gone
    Forfeited(Amount),
}

/// Complete game state (one per session)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Short session id for display and logs
    pub game_id: String,
    pub balance: Amount,
    /// 1-based level awaiting a choice (1 when idle after a reset)
    pub current_level: u32,
    pub round_active: bool,
    /// Locked (and already deducted from `balance`) while a round is active
    pub bet: Amount,
    /// Reward banked so far this round
    pub accrued_reward: Amount,
    pub round_outcome: RoundOutcome,
    pub selected_side: Option<Side>,
    pub level_results: Vec<LevelResult>,
    /// Cached `ControlState::derive(round_active, has_acted)`
    pub control_state: ControlState,
    /// Whether a side was chosen this round
    pub has_acted: bool,
    /// Outcome of the most recent round, if any
    pub last_settlement: Option<Settlement>,
}

impl GameState {
    /// Fresh session state: full balance, minimum bet, no round
    pub fn new(config: &GameConfig, game_id: String) -> Self {
        Self {
            game_id,
            balance: config.initial_balance,
            current_level: 1,
            round_active: false,
            bet: config.min_bet.min(config.initial_balance),
            accrued_reward: Amount::ZERO,
            round_outcome: RoundOutcome::default(),
            selected_side: None,
            level_results: Vec::new(),
            control_state: ControlState::Ready,
            has_acted: false,
            last_settlement: None,
        }
    }

    /// Derived button mode
    pub fn control(&self) -> ControlState {
        ControlState::derive(self.round_active, self.has_acted)
    }

    /// Refresh the cached control state after a mutation
    pub(crate) fn sync_control(&mut self) {
        self.control_state = self.control();
    }

    /// Clear every per-round field after a cash-out or cancel
    pub(crate) fn reset_round(&mut self) {
        self.current_level = 1;
        self.round_active = false;
        self.accrued_reward = Amount::ZERO;
        self.round_outcome = RoundOutcome::default();
        self.selected_side = None;
        self.level_results.clear();
        self.has_acted = false;
        self.sync_control();
    }

    /// Result recorded for a level, if any
    pub fn result_at(&self, level: u32) -> Option<&LevelResult> {
        self.level_results.iter().find(|r| r.level == level)
    }
}
