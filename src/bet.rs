//! Bet engine
//!
//! Builds the ladder of bet sizes the +/- buttons step through and resolves
//! an adjustment request into a new bet clamped to `[min_bet, balance]`.

use serde::{Deserialize, Serialize};

use crate::amount::{Amount, UNITS_PER_COIN};

const fn coins(units: u64) -> Amount {
    Amount::from_units(units)
}

const COIN: u64 = UNITS_PER_COIN;

/// Fixed micro steps, 0.000001 up to 100
pub const MICRO_STEPS: [Amount; 25] = [
    coins(100),
    coins(200),
    coins(500),
    coins(1_000),
    coins(2_000),
    coins(5_000),
    coins(10_000),
    coins(20_000),
    coins(50_000),
    coins(100_000),
    coins(200_000),
    coins(500_000),
    coins(1_000_000),
    coins(2_000_000),
    coins(5_000_000),
    coins(10_000_000),
    coins(20_000_000),
    coins(50_000_000),
    coins(COIN),
    coins(2 * COIN),
    coins(5 * COIN),
    coins(10 * COIN),
    coins(25 * COIN),
    coins(50 * COIN),
    coins(100 * COIN),
];

/// Fixed medium steps, 0.2 up to 100
pub const MEDIUM_STEPS: [Amount; 9] = [
    coins(20_000_000),
    coins(50_000_000),
    coins(COIN),
    coins(2 * COIN),
    coins(5 * COIN),
    coins(10 * COIN),
    coins(25 * COIN),
    coins(50 * COIN),
    coins(100 * COIN),
];

/// Fixed large steps, 200 up to 10_000
pub const LARGE_STEPS: [Amount; 6] = [
    coins(200 * COIN),
    coins(500 * COIN),
    coins(1_000 * COIN),
    coins(2_500 * COIN),
    coins(5_000 * COIN),
    coins(10_000 * COIN),
];

/// Fractions of the balance offered as steps (basis points)
const BALANCE_FRACTIONS_BPS: [u64; 9] = [
    2_500, 5_000, 7_500, 12_500, 15_000, 20_000, 30_000, 50_000, 100_000,
];

/// Balance multiples offered once the balance outgrows the fixed steps
const BALANCE_MULTIPLES_BPS: [u64; 5] = [15_000, 20_000, 30_000, 50_000, 100_000];

/// Largest value typed into the bet box
pub const MAX_TYPED_BET: f64 = 100_000.0;

/// How the player wants the bet changed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BetAdjust {
    /// Next step up the progression
    Increase,
    /// Next step down the progression
    Decrease,
    /// An explicit amount of coins (sanitized by the formatting rule)
    Exact(f64),
    /// Jump to the configured minimum
    Min,
    /// Jump to the whole balance
    Max,
}

/// Ascending, duplicate-free bet sizes available for a balance
pub fn progression(balance: Amount) -> Vec<Amount> {
    let mut steps: Vec<Amount> = MICRO_STEPS
        .iter()
        .copied()
        .filter(|&step| step <= balance)
        .collect();
    // The whole micro ladder goes in again; dedup at the end sorts it out
    steps.extend_from_slice(&MICRO_STEPS);

    let six_decimals = Amount::from_units(100);
    for bps in BALANCE_FRACTIONS_BPS {
        let step = balance.mul_bps_round(bps, six_decimals);
        if steps.last().is_some_and(|&last| step > last) {
            steps.push(step);
        }
    }

    steps.extend(MEDIUM_STEPS.iter().copied().filter(|&step| step <= balance));
    steps.extend(LARGE_STEPS.iter().copied().filter(|&step| step <= balance));

    if steps.last().is_some_and(|&last| balance > last) {
        let whole = Amount::from_whole(1);
        for bps in BALANCE_MULTIPLES_BPS {
            let step = balance.mul_bps_floor(bps, whole);
            if steps.last().is_some_and(|&last| step > last) {
                steps.push(step);
            }
        }
    }

    steps.sort_unstable();
    steps.dedup();
    steps
}

/// Resolve an adjustment into the new bet.
///
/// The result never exceeds `balance`. Stepping below the first progression
/// entry lands on `min_bet`; stepping up from a bet past the whole progression
/// wraps around to its first entry.
pub fn adjust(current: Amount, balance: Amount, min_bet: Amount, request: BetAdjust) -> Amount {
    let next = match request {
        BetAdjust::Exact(coins) => clamp(Amount::from_coins(coins), min_bet, balance),
        BetAdjust::Min => clamp(min_bet, min_bet, balance),
        BetAdjust::Max => clamp(balance, min_bet, balance),
        BetAdjust::Increase => {
            let steps = progression(balance);
            match steps.iter().position(|&step| step >= current) {
                Some(i) if i + 1 < steps.len() => steps[i + 1],
                Some(_) => steps.last().copied().unwrap_or(balance).min(balance),
                None => steps.first().copied().unwrap_or(min_bet),
            }
        }
        BetAdjust::Decrease => {
            let steps = progression(balance);
            match steps.iter().position(|&step| step >= current) {
                Some(i) if i > 0 => steps[i - 1],
                _ => min_bet,
            }
        }
    };

    next.min(balance)
}

/// `max(min_bet, min(value, balance))`, then capped at `balance` again so an
/// exhausted balance wins over the minimum.
fn clamp(value: Amount, min_bet: Amount, balance: Amount) -> Amount {
    value.min(balance).max(min_bet).min(balance)
}

/// Sanitize free-form bet text into a number of coins.
///
/// Keeps digits and the first decimal point, at most 12 characters and 8
/// fractional digits. Anything that does not parse to a positive number falls
/// back to `min_bet`; the result is capped at `MAX_TYPED_BET`.
pub fn parse_bet_input(raw: &str, min_bet: Amount) -> f64 {
    let mut seen_point = false;
    let filtered: String = raw
        .chars()
        .filter(|&c| {
            if c == '.' {
                !std::mem::replace(&mut seen_point, true)
            } else {
                c.is_ascii_digit()
            }
        })
        .take(12)
        .collect();

    let (int_part, frac_part) = match filtered.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (filtered.as_str(), None),
    };
    let int_part = match int_part.trim_start_matches('0') {
        "" => "0",
        digits => digits,
    };
    let sanitized = match frac_part {
        Some(frac) => format!("{int_part}.{}", &frac[..frac.len().min(8)]),
        None => int_part.to_string(),
    };

    let floor = min_bet.to_coins();
    match sanitized.parse::<f64>() {
        Ok(value) if value > 0.0 => value.clamp(floor, MAX_TYPED_BET.max(floor)),
        _ => {
            log::warn!("Unusable bet input {raw:?}, using the minimum");
            floor
        }
    }
}
