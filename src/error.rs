//! Error taxonomy for ladder actions
//!
//! Every variant is a rejected action: the state it was aimed at is left
//! exactly as it was.

use thiserror::Error;

use crate::amount::Amount;
use crate::game::ControlState;

#[derive(Debug, Error)]
pub enum Error {
    /// The current bet is larger than the balance at round start
    #[error("insufficient balance: bet {bet} exceeds balance {balance}")]
    InsufficientBalance { bet: Amount, balance: Amount },
    /// The current bet is zero or under the configured minimum at round start
    #[error("bet {bet} is below the minimum of {min_bet}")]
    BetBelowMinimum { bet: Amount, min_bet: Amount },
    /// The action is not legal in the current control state
    #[error("cannot {action} while the control is {state}")]
    InvalidTransition {
        action: &'static str,
        state: ControlState,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
