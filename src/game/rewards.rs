//! Reward table
//!
//! `reward[i] = bet * multiplier^i`, computed in integers. The exact rational
//! is used whenever it fits in a u128 so repeated exponentiation never drifts.

use crate::amount::{Amount, BPS_ONE};
use crate::config::GameConfig;

/// Extra fixed-point digits kept by the overflow fallback
const EXTENDED_SCALE: u128 = 1_000_000_000_000;

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Reward for a 0-based level index, rounded half-up to one base unit
pub fn reward_at(bet: Amount, multiplier_bps: u32, index: u32) -> Amount {
    let divisor = gcd(u64::from(multiplier_bps), BPS_ONE).max(1);
    let num = u128::from(u64::from(multiplier_bps) / divisor);
    let den = u128::from(BPS_ONE / divisor);
    let bet = u128::from(bet.units());

    exact_reward(bet, num, den, index)
        .unwrap_or_else(|| extended_reward(bet, num, den, index))
}

fn exact_reward(bet: u128, num: u128, den: u128, index: u32) -> Option<Amount> {
    let numer = bet.checked_mul(num.checked_pow(index)?)?;
    let denom = den.checked_pow(index)?;
    let rounded = numer.checked_add(denom / 2)? / denom;
    Some(Amount::saturate(rounded))
}

/// Step-by-step product with 12 guard digits; saturates instead of overflowing
fn extended_reward(bet: u128, num: u128, den: u128, index: u32) -> Amount {
    let mut value = bet.saturating_mul(EXTENDED_SCALE);
    for _ in 0..index {
        value = match value.checked_mul(num) {
            Some(scaled) => (scaled + den / 2) / den,
            None => return Amount::MAX,
        };
        if value / EXTENDED_SCALE > u128::from(u64::MAX) {
            return Amount::MAX;
        }
    }
    Amount::saturate((value + EXTENDED_SCALE / 2) / EXTENDED_SCALE)
}

/// Rewards for every level of the ladder, index 0 = level 1
pub fn reward_table(bet: Amount, config: &GameConfig) -> Vec<Amount> {
    (0..config.max_levels)
        .map(|index| reward_at(bet, config.multiplier_bps, index))
        .collect()
}
