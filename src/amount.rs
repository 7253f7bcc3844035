//! Fixed-point money
//!
//! Every balance, bet and reward is an integer count of base units with
//! 8 decimal places. Floating point only shows up at the input boundary
//! (`from_coins`) and in the shared rounding rule (`format_value`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Decimal places carried by every stored amount
pub const MAX_DECIMALS: u32 = 8;
/// Fewest decimal places ever shown
pub const MIN_DECIMALS: u32 = 2;
/// Base units per whole coin (10^MAX_DECIMALS)
pub const UNITS_PER_COIN: u64 = 100_000_000;
/// Largest integer an f64 represents exactly (2^53 - 1)
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
/// Largest unit count that survives a trip through an f64 coin value
pub const MAX_EXACT_UNITS: u64 = (1 << 53) - 1;

/// Scaled magnitudes at or past this point are returned unrounded: the f64
/// spacing there no longer resolves every 8th decimal reliably.
const ROUNDING_LIMIT: f64 = 1e15;

const SCALE: f64 = UNITS_PER_COIN as f64;

/// Basis points in 1.0x
pub const BPS_ONE: u64 = 10_000;

/// An amount of coins in base units (1e-8 coin)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);
    pub const MAX: Amount = Amount(u64::MAX);

    #[inline]
    pub const fn from_units(units: u64) -> Self {
        Self(units)
    }

    /// Whole coins, saturating at `Amount::MAX`
    #[inline]
    pub const fn from_whole(coins: u64) -> Self {
        Self(coins.saturating_mul(UNITS_PER_COIN))
    }

    /// Convert a raw number of coins, applying the formatting rule first.
    ///
    /// Non-finite input becomes zero, negative input clamps to zero (balances
    /// and bets are never negative) and anything past `Amount::MAX` saturates.
    pub fn from_coins(value: f64) -> Self {
        let value = format_value(value);
        if value <= 0.0 {
            return Self::ZERO;
        }
        let units = (value * SCALE).round();
        if units >= u64::MAX as f64 {
            Self::MAX
        } else {
            Self(units as u64)
        }
    }

    #[inline]
    pub const fn units(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn to_coins(self) -> f64 {
        self.0 as f64 / SCALE
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn saturating_add(self, other: Amount) -> Amount {
        Amount(self.0.saturating_add(other.0))
    }

    #[inline]
    pub const fn saturating_sub(self, other: Amount) -> Amount {
        Amount(self.0.saturating_sub(other.0))
    }

    #[inline]
    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    /// `self * bps / 10_000`, rounded half-up to a multiple of `step`
    pub fn mul_bps_round(self, bps: u64, step: Amount) -> Amount {
        let step = step.0.max(1) as u128;
        let denom = BPS_ONE as u128 * step;
        let numer = self.0 as u128 * bps as u128;
        let quotient = (numer + denom / 2) / denom;
        Self::saturate(quotient.saturating_mul(step))
    }

    /// `self * bps / 10_000`, floored to a multiple of `step`
    pub fn mul_bps_floor(self, bps: u64, step: Amount) -> Amount {
        let step = step.0.max(1) as u128;
        let denom = BPS_ONE as u128 * step;
        let numer = self.0 as u128 * bps as u128;
        Self::saturate((numer / denom).saturating_mul(step))
    }

    #[inline]
    pub(crate) fn saturate(units: u128) -> Amount {
        Amount(u64::try_from(units).unwrap_or(u64::MAX))
    }

    /// Decimal places this amount is displayed with
    pub fn effective_decimals(self) -> u32 {
        if self.0 == 0 || self.0 >= UNITS_PER_COIN {
            return MIN_DECIMALS;
        }
        // -floor(log10(units / 1e8)) + 1 == 9 - floor(log10(units))
        let magnitude = self.0.ilog10();
        (MAX_DECIMALS + 1 - magnitude).clamp(MIN_DECIMALS, MAX_DECIMALS)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / UNITS_PER_COIN;
        let frac = format!("{:08}", self.0 % UNITS_PER_COIN);
        let keep = self.effective_decimals() as usize;
        let trimmed = frac.trim_end_matches('0');
        let shown = if trimmed.len() > keep {
            trimmed
        } else {
            &frac[..keep]
        };
        write!(f, "{whole}.{shown}")
    }
}

/// Round a raw number to the stored precision (8 decimals).
///
/// Non-finite values are rejected as zero. Values are clamped to the
/// f64 safe-integer range first. The function is idempotent.
pub fn format_value(value: f64) -> f64 {
    if !value.is_finite() {
        log::warn!("Invalid amount {value}, treating as zero");
        return 0.0;
    }
    let clamped = value.clamp(-MAX_SAFE_INTEGER, MAX_SAFE_INTEGER);
    let scaled = clamped * SCALE;
    if scaled.abs() >= ROUNDING_LIMIT {
        return clamped;
    }
    scaled.round() / SCALE
}

/// Display precision for a raw number: more decimals for smaller magnitudes,
/// between `MIN_DECIMALS` and `MAX_DECIMALS`.
pub fn effective_decimals(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 || value >= 1.0 {
        return MIN_DECIMALS;
    }
    let wanted = -(value.log10().floor()) + 1.0;
    (wanted as i64).clamp(MIN_DECIMALS as i64, MAX_DECIMALS as i64) as u32
}

/// Serialize an `Amount` as a number of coins (for human-edited files)
pub mod as_coins {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Amount;

    pub fn serialize<S: Serializer>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(amount.to_coins())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        let coins = f64::deserialize(deserializer)?;
        Ok(Amount::from_coins(coins))
    }
}
