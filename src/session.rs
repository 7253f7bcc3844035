//! Session driver
//!
//! Owns the config, the only mutable `GameState` and the seeded RNG. Front
//! ends call the action methods and redraw from the returned snapshot.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::amount::Amount;
use crate::bet::{self, BetAdjust};
use crate::config::GameConfig;
use crate::error::{Error, Result};
use crate::game::{self, Action, BoardRow, ControlState, GameState, Side};

/// A single-player session
#[derive(Debug, Clone)]
pub struct Session {
    config: GameConfig,
    state: GameState,
    rng: Pcg32,
    seed: u64,
}

impl Session {
    /// Start a session; the seed fixes every round outcome it will deal
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, seed))
    }

    /// Default rules
    pub fn with_seed(seed: u64) -> Self {
        Self::from_parts(GameConfig::default(), seed)
    }

    fn from_parts(config: GameConfig, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let state = GameState::new(&config, base36(rng.random()));
        log::info!(
            "Session {} ready: balance {}, {} levels at {}x",
            state.game_id,
            state.balance,
            config.max_levels,
            config.multiplier()
        );
        Self {
            config,
            state,
            rng,
            seed,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Apply an action; on error the state is unchanged
    pub fn dispatch(&mut self, action: Action) -> Result<&GameState> {
        match game::apply(&self.state, &self.config, action, &mut self.rng) {
            Ok(next) => {
                self.state = next;
                Ok(&self.state)
            }
            Err(e) => {
                log::warn!("[{}] Rejected {}: {e}", self.state.game_id, action.name());
                Err(e)
            }
        }
    }

    /// Change the bet; a no-op while a round is live
    pub fn adjust_bet(&mut self, request: BetAdjust) -> &GameState {
        // Bet adjustments recover from bad input instead of failing
        let _ = self.dispatch(Action::AdjustBet(request));
        &self.state
    }

    /// Set the bet from free-form text
    pub fn set_bet_from_input(&mut self, raw: &str) -> &GameState {
        let coins = bet::parse_bet_input(raw, self.config.min_bet);
        self.adjust_bet(BetAdjust::Exact(coins))
    }

    pub fn start_round(&mut self) -> Result<&GameState> {
        self.dispatch(Action::StartRound)
    }

    pub fn choose_side(&mut self, side: Side) -> Result<&GameState> {
        self.dispatch(Action::ChooseSide(side))
    }

    /// Choose a side by name. A name that is neither side is rejected as an
    /// invalid transition, the same as any other illegal choice.
    pub fn choose_side_named(&mut self, name: &str) -> Result<&GameState> {
        match name.parse::<Side>() {
            Ok(side) => self.choose_side(side),
            Err(e) => {
                log::warn!("[{}] Rejected choice: {e}", self.state.game_id);
                Err(Error::InvalidTransition {
                    action: "choose a side",
                    state: self.state.control(),
                })
            }
        }
    }

    pub fn cancel(&mut self) -> Result<&GameState> {
        self.dispatch(Action::Cancel)
    }

    pub fn cash_out(&mut self) -> Result<&GameState> {
        self.dispatch(Action::CashOut)
    }

    /// PLAY / END / TAKE
    pub fn primary_action(&mut self) -> Result<&GameState> {
        self.dispatch(Action::Primary)
    }

    pub fn control(&self) -> ControlState {
        self.state.control()
    }

    /// Rewards for the current bet, index 0 = level 1
    pub fn reward_table(&self) -> Vec<Amount> {
        game::reward_table(self.state.bet, &self.config)
    }

    pub fn board(&self) -> Vec<BoardRow> {
        game::rows(&self.state, &self.config)
    }

    /// Current progression of bet steps
    pub fn bet_steps(&self) -> Vec<Amount> {
        bet::progression(self.state.balance)
    }

    /// JSON snapshot of the state for a front end
    pub fn snapshot_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.state)?)
    }
}

/// Lowercase base-36 rendering (session ids)
fn base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
