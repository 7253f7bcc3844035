//! Game configuration
//!
//! Fixed for the lifetime of a session. Loaded from a JSON file on native
//! builds; the browser build always runs the defaults.

use serde::{Deserialize, Serialize};

use crate::amount::{self, Amount, BPS_ONE};
use crate::error::{Error, Result};

/// Ladder rules and starting bankroll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Balance a new session starts with
    #[serde(with = "amount::as_coins")]
    pub initial_balance: Amount,
    /// Reward growth per level in basis points (18_500 = 1.85x)
    pub multiplier_bps: u32,
    /// Levels on the ladder, including the implicit entry level
    pub max_levels: u32,
    /// Smallest bet the engine will step down to
    #[serde(with = "amount::as_coins")]
    pub min_bet: Amount,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_balance: Amount::from_whole(100),
            multiplier_bps: 18_500,
            max_levels: 13,
            min_bet: Amount::from_units(100), // 0.000001
        }
    }
}

impl GameConfig {
    /// Multiplier as a plain ratio (display only)
    pub fn multiplier(&self) -> f64 {
        self.multiplier_bps as f64 / BPS_ONE as f64
    }

    /// Check the rules are playable
    pub fn validate(&self) -> Result<()> {
        if u64::from(self.multiplier_bps) <= BPS_ONE {
            return Err(Error::InvalidConfig(format!(
                "multiplier must exceed 1x, got {}x",
                self.multiplier()
            )));
        }
        if self.max_levels == 0 {
            return Err(Error::InvalidConfig("max_levels must be at least 1".into()));
        }
        if self.min_bet.is_zero() {
            return Err(Error::InvalidConfig("min_bet must be positive".into()));
        }
        // Coin fields are written as JSON numbers
        let coin_fields = [
            ("initial_balance", self.initial_balance),
            ("min_bet", self.min_bet),
        ];
        for (name, value) in coin_fields {
            if value.units() > amount::MAX_EXACT_UNITS {
                return Err(Error::InvalidConfig(format!(
                    "{name} {value} is too large to store exactly"
                )));
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON config (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, falling back to defaults (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded game config from {}", path.display());
                    return config;
                }
                Err(e) => log::warn!("Ignoring {}: {e}", path.display()),
            },
            Err(e) => log::warn!("Could not read {}: {e}", path.display()),
        }

        log::info!("Using default game config");
        Self::default()
    }
}
