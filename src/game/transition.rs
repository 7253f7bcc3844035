//! State transitions
//!
//! `apply` is the whole rulebook: it takes the current state and one player
//! action and returns the next state. Rejections return an error and leave
//! the input untouched; the only side effect is drawing a round outcome from
//! the supplied RNG when a round starts.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rewards::reward_at;
use super::state::{
    ControlState, FIRST_PRESENTED_LEVEL, GameState, LevelResult, RoundOutcome, Settlement, Side,
};
use crate::amount::Amount;
use crate::bet::{self, BetAdjust};
use crate::config::GameConfig;
use crate::error::{Error, Result};

/// A single player action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Change the bet (ignored while a round is live)
    AdjustBet(BetAdjust),
    /// Stake the current bet and open a round
    StartRound,
    /// Pick a column at the current level
    ChooseSide(Side),
    /// Abandon a round before the first choice and get the bet back
    Cancel,
    /// Bank the accrued reward
    CashOut,
    /// The primary button: PLAY, END or TAKE depending on the control state
    Primary,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::AdjustBet(_) => "adjust the bet",
            Action::StartRound => "start a round",
            Action::ChooseSide(_) => "choose a side",
            Action::Cancel => "cancel the round",
            Action::CashOut => "cash out",
            Action::Primary => "press the main button",
        }
    }
}

/// Apply one action to `state`, returning the next state
pub fn apply<R: Rng>(
    state: &GameState,
    config: &GameConfig,
    action: Action,
    rng: &mut R,
) -> Result<GameState> {
    let mut next = state.clone();
    match action {
        Action::AdjustBet(request) => adjust_bet(&mut next, config, request),
        Action::StartRound => start_round(&mut next, config, rng)?,
        Action::ChooseSide(side) => choose_side(&mut next, config, side)?,
        Action::Cancel => cancel(&mut next)?,
        Action::CashOut => cash_out(&mut next)?,
        Action::Primary => return apply(state, config, primary_target(state), rng),
    }
    next.sync_control();
    Ok(next)
}

/// What the primary button does in the current control state
pub fn primary_target(state: &GameState) -> Action {
    match state.control() {
        ControlState::Ready => Action::StartRound,
        ControlState::Cancelable => Action::Cancel,
        ControlState::Collectible => Action::CashOut,
    }
}

fn reject(state: &GameState, action: Action) -> Error {
    Error::InvalidTransition {
        action: action.name(),
        state: state.control(),
    }
}

fn adjust_bet(state: &mut GameState, config: &GameConfig, request: BetAdjust) {
    if state.round_active {
        log::debug!("Bet is locked during a round, ignoring {request:?}");
        return;
    }
    let bet = bet::adjust(state.bet, state.balance, config.min_bet, request);
    log::debug!("Bet {} -> {} ({request:?})", state.bet, bet);
    state.bet = bet;
}

fn start_round<R: Rng>(state: &mut GameState, config: &GameConfig, rng: &mut R) -> Result<()> {
    if state.round_active {
        return Err(reject(state, Action::StartRound));
    }
    if state.bet > state.balance {
        return Err(Error::InsufficientBalance {
            bet: state.bet,
            balance: state.balance,
        });
    }
    if state.bet.is_zero() || state.bet < config.min_bet {
        return Err(Error::BetBelowMinimum {
            bet: state.bet,
            min_bet: config.min_bet,
        });
    }

    state.round_outcome = RoundOutcome::generate(rng, config.max_levels);
    state.current_level = FIRST_PRESENTED_LEVEL.min(config.max_levels);
    state.balance = state.balance.saturating_sub(state.bet);
    state.round_active = true;
    state.accrued_reward = Amount::ZERO;
    state.selected_side = None;
    state.level_results.clear();
    state.has_acted = false;
    state.last_settlement = None;

    log::info!(
        "[{}] Round started: bet {}, balance {}",
        state.game_id,
        state.bet,
        state.balance
    );
    Ok(())
}

fn choose_side(state: &mut GameState, config: &GameConfig, side: Side) -> Result<()> {
    if !state.round_active {
        return Err(reject(state, Action::ChooseSide(side)));
    }
    let level = state.current_level;
    let correct = state
        .round_outcome
        .side_at(level)
        .ok_or_else(|| reject(state, Action::ChooseSide(side)))?;

    state.has_acted = true;
    state.selected_side = Some(side);

    if side == correct {
        state.accrued_reward = reward_at(state.bet, config.multiplier_bps, level - 1);
        state.level_results.push(LevelResult {
            level,
            chosen_side: side,
            was_correct: true,
            forced_reveal: false,
        });
        log::debug!(
            "[{}] Level {level}: {} correct, reward {}",
            state.game_id,
            side.as_str(),
            state.accrued_reward
        );

        if level >= config.max_levels {
            let payout = state.accrued_reward;
            state.balance = state.balance.saturating_add(payout);
            state.accrued_reward = Amount::ZERO;
            state.round_active = false;
            state.last_settlement = Some(Settlement::Completed(payout));
            log::info!(
                "[{}] Ladder cleared: +{payout}, balance {}",
                state.game_id,
                state.balance
            );
        } else {
            state.current_level += 1;
        }
        return Ok(());
    }

    state.level_results.push(LevelResult {
        level,
        chosen_side: side,
        was_correct: false,
        forced_reveal: false,
    });
    let reveals: Vec<LevelResult> = state.round_outcome.as_slice()[level as usize..]
        .iter()
        .zip(level + 1..)
        .map(|(&truth, reveal_level)| LevelResult {
            level: reveal_level,
            chosen_side: truth,
            was_correct: true,
            forced_reveal: true,
        })
        .collect();
    state.level_results.extend(reveals);
    state.accrued_reward = Amount::ZERO;
    state.round_active = false;
    state.last_settlement = Some(Settlement::Forfeited(state.bet));
    log::info!(
        "[{}] Level {level}: {} wrong, bet {} lost, balance {}",
        state.game_id,
        side.as_str(),
        state.bet,
        state.balance
    );
    Ok(())
}

fn cancel(state: &mut GameState) -> Result<()> {
    if state.control() != ControlState::Cancelable {
        return Err(reject(state, Action::Cancel));
    }
    let refund = state.bet;
    state.balance = state.balance.saturating_add(refund);
    state.reset_round();
    state.last_settlement = Some(Settlement::Refunded(refund));
    log::info!(
        "[{}] Round cancelled: {refund} refunded, balance {}",
        state.game_id,
        state.balance
    );
    Ok(())
}

fn cash_out(state: &mut GameState) -> Result<()> {
    if state.control() != ControlState::Collectible {
        return Err(reject(state, Action::CashOut));
    }
    let payout = state.accrued_reward;
    state.balance = state.balance.saturating_add(payout);
    state.reset_round();
    state.last_settlement = Some(Settlement::CashedOut(payout));
    log::info!(
        "[{}] Cashed out {payout}, balance {}",
        state.game_id,
        state.balance
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup(bet: Amount) -> (GameState, GameConfig, Pcg32) {
        let config = GameConfig::default();
        let mut state = GameState::new(&config, "test".into());
        state.bet = bet;
        (state, config, Pcg32::seed_from_u64(12345))
    }

    fn correct_side(state: &GameState) -> Side {
        state.round_outcome.side_at(state.current_level).unwrap()
    }

    #[test]
    fn test_start_round_deducts_bet() {
        let (state, config, mut rng) = setup(Amount::from_whole(1));
        let state = apply(&state, &config, Action::StartRound, &mut rng).unwrap();
        assert!(state.round_active);
        assert_eq!(state.balance, Amount::from_whole(99));
        assert_eq!(state.current_level, 2);
        assert_eq!(state.round_outcome.len(), 13);
        assert_eq!(state.control_state, ControlState::Cancelable);
    }

    #[test]
    fn test_start_round_insufficient_balance() {
        let (state, config, mut rng) = setup(Amount::from_whole(101));
        let result = apply(&state, &config, Action::StartRound, &mut rng);
        assert!(matches!(result, Err(Error::InsufficientBalance { .. })));
    }

    #[test]
    fn test_start_round_rejects_zero_bet() {
        let (state, config, mut rng) = setup(Amount::ZERO);
        let result = apply(&state, &config, Action::StartRound, &mut rng);
        assert!(matches!(result, Err(Error::BetBelowMinimum { .. })));
    }

    #[test]
    fn test_wrong_choice_forfeits_bet() {
        let (state, config, mut rng) = setup(Amount::from_whole(1));
        let state = apply(&state, &config, Action::StartRound, &mut rng).unwrap();
        let wrong = correct_side(&state).opposite();
        let state = apply(&state, &config, Action::ChooseSide(wrong), &mut rng).unwrap();

        assert!(!state.round_active);
        assert_eq!(state.balance, Amount::from_whole(99));
        assert_eq!(state.accrued_reward, Amount::ZERO);
        assert_eq!(state.control_state, ControlState::Ready);
        assert_eq!(
            state.last_settlement,
            Some(Settlement::Forfeited(Amount::from_whole(1)))
        );

        // The miss plus a reveal for every level above it
        assert_eq!(state.level_results.len(), 12);
        let miss = state.level_results[0];
        assert_eq!((miss.level, miss.was_correct, miss.forced_reveal), (2, false, false));
        for result in &state.level_results[1..] {
            assert!(result.forced_reveal && result.was_correct);
            assert_eq!(
                state.round_outcome.side_at(result.level),
                Some(result.chosen_side)
            );
        }
        assert_eq!(state.level_results.last().map(|r| r.level), Some(13));
    }

    #[test]
    fn test_cancel_refunds_exactly() {
        let (state, config, mut rng) = setup(Amount::from_whole(1));
        let started = apply(&state, &config, Action::StartRound, &mut rng).unwrap();
        assert_eq!(started.balance, Amount::from_whole(99));
        let state = apply(&started, &config, Action::Cancel, &mut rng).unwrap();
        assert_eq!(state.balance, Amount::from_whole(100));
        assert!(!state.round_active);
        assert!(state.round_outcome.is_empty());
        assert_eq!(state.current_level, 1);
    }

    #[test]
    fn test_cancel_after_acting_is_rejected() {
        let (state, config, mut rng) = setup(Amount::from_whole(1));
        let state = apply(&state, &config, Action::StartRound, &mut rng).unwrap();
        let side = correct_side(&state);
        let state = apply(&state, &config, Action::ChooseSide(side), &mut rng).unwrap();
        let result = apply(&state, &config, Action::Cancel, &mut rng);
        assert!(matches!(
            result,
            Err(Error::InvalidTransition {
                state: ControlState::Collectible,
                ..
            })
        ));
    }

    #[test]
    fn test_win_then_cash_out() {
        let (state, config, mut rng) = setup(Amount::from_whole(1));
        let state = apply(&state, &config, Action::StartRound, &mut rng).unwrap();
        let side = correct_side(&state);
        let state = apply(&state, &config, Action::ChooseSide(side), &mut rng).unwrap();

        assert!(state.round_active);
        assert_eq!(state.current_level, 3);
        assert_eq!(state.accrued_reward, Amount::from_coins(1.85));
        assert_eq!(state.control_state.label(), "TAKE");

        let state = apply(&state, &config, Action::CashOut, &mut rng).unwrap();
        assert!(!state.round_active);
        assert_eq!(state.balance, Amount::from_coins(100.85));
        assert!(state.level_results.is_empty());
        assert_eq!(
            state.last_settlement,
            Some(Settlement::CashedOut(Amount::from_coins(1.85)))
        );
    }

    #[test]
    fn test_full_ladder_win() {
        let (mut state, config, mut rng) = setup(Amount::from_whole(1));
        state = apply(&state, &config, Action::StartRound, &mut rng).unwrap();
        while state.round_active {
            let side = correct_side(&state);
            state = apply(&state, &config, Action::ChooseSide(side), &mut rng).unwrap();
        }

        // 100 - 1 + 1.85^12
        assert_eq!(state.balance, Amount::from_units(170_616_601_705));
        assert_eq!(state.current_level, 13);
        assert_eq!(state.level_results.len(), 12);
        assert_eq!(state.accrued_reward, Amount::ZERO);
        assert_eq!(
            state.last_settlement,
            Some(Settlement::Completed(Amount::from_units(160_716_601_705)))
        );
        assert_eq!(state.control_state, ControlState::Ready);
    }

    #[test]
    fn test_single_level_ladder() {
        let config = GameConfig {
            max_levels: 1,
            ..GameConfig::default()
        };
        let mut state = GameState::new(&config, "one".into());
        state.bet = Amount::from_whole(1);
        let mut rng = Pcg32::seed_from_u64(1);
        let state = apply(&state, &config, Action::StartRound, &mut rng).unwrap();
        assert_eq!(state.current_level, 1);
        let side = correct_side(&state);
        let state = apply(&state, &config, Action::ChooseSide(side), &mut rng).unwrap();
        assert!(!state.round_active);
        assert_eq!(state.balance, Amount::from_whole(100));
    }

    #[test]
    fn test_primary_dispatch() {
        let (state, config, mut rng) = setup(Amount::from_whole(1));
        let state = apply(&state, &config, Action::Primary, &mut rng).unwrap();
        assert!(state.round_active);
        // END cancels
        let cancelled = apply(&state, &config, Action::Primary, &mut rng).unwrap();
        assert_eq!(cancelled.balance, Amount::from_whole(100));
        assert_eq!(cancelled.last_settlement, Some(Settlement::Refunded(Amount::from_whole(1))));

        // TAKE cashes out
        let side = correct_side(&state);
        let state = apply(&state, &config, Action::ChooseSide(side), &mut rng).unwrap();
        let banked = apply(&state, &config, Action::Primary, &mut rng).unwrap();
        assert_eq!(banked.balance, Amount::from_coins(100.85));
    }

    #[test]
    fn test_bet_locked_during_round() {
        let (state, config, mut rng) = setup(Amount::from_whole(1));
        let state = apply(&state, &config, Action::StartRound, &mut rng).unwrap();
        let after = apply(
            &state,
            &config,
            Action::AdjustBet(BetAdjust::Max),
            &mut rng,
        )
        .unwrap();
        assert_eq!(after, state);
    }

    #[test]
    fn test_idle_rejections() {
        let (state, config, mut rng) = setup(Amount::from_whole(1));
        for action in [Action::ChooseSide(Side::Left), Action::Cancel, Action::CashOut] {
            let result = apply(&state, &config, action, &mut rng);
            assert!(
                matches!(
                    result,
                    Err(Error::InvalidTransition {
                        state: ControlState::Ready,
                        ..
                    })
                ),
                "{action:?} should be rejected while idle"
            );
        }
    }

    #[test]
    fn test_cash_out_before_acting_is_rejected() {
        let (state, config, mut rng) = setup(Amount::from_whole(1));
        let state = apply(&state, &config, Action::StartRound, &mut rng).unwrap();
        assert!(apply(&state, &config, Action::CashOut, &mut rng).is_err());
        assert!(apply(&state, &config, Action::StartRound, &mut rng).is_err());
    }

    #[test]
    fn test_next_round_clears_previous_results() {
        let (state, config, mut rng) = setup(Amount::from_whole(1));
        let state = apply(&state, &config, Action::StartRound, &mut rng).unwrap();
        let wrong = correct_side(&state).opposite();
        let lost = apply(&state, &config, Action::ChooseSide(wrong), &mut rng).unwrap();
        assert!(!lost.level_results.is_empty());

        let again = apply(&lost, &config, Action::StartRound, &mut rng).unwrap();
        assert!(again.level_results.is_empty());
        assert!(!again.has_acted);
        assert_eq!(again.balance, Amount::from_whole(98));
    }

    proptest! {
        #[test]
        fn prop_rejected_choice_leaves_state_untouched(seed in any::<u64>(), left in any::<bool>()) {
            let (state, config, _) = setup(Amount::from_whole(1));
            let mut rng = Pcg32::seed_from_u64(seed);
            let side = if left { Side::Left } else { Side::Right };
            let before = state.clone();
            prop_assert!(apply(&state, &config, Action::ChooseSide(side), &mut rng).is_err());
            prop_assert_eq!(state, before);
        }

        #[test]
        fn prop_played_results_never_pass_current_level(
            seed in any::<u64>(),
            picks in proptest::collection::vec(any::<bool>(), 1..13),
        ) {
            let (mut state, config, _) = setup(Amount::from_whole(1));
            let mut rng = Pcg32::seed_from_u64(seed);
            state = apply(&state, &config, Action::StartRound, &mut rng).unwrap();
            let start_balance = state.balance;
            for left in picks {
                if !state.round_active {
                    break;
                }
                let side = if left { Side::Left } else { Side::Right };
                state = apply(&state, &config, Action::ChooseSide(side), &mut rng).unwrap();
                let played = state.level_results.iter().filter(|r| !r.forced_reveal).count();
                prop_assert!(played as u32 <= state.current_level);
                prop_assert!(state.current_level <= config.max_levels);
            }
            // Balance only moves at settlement
            if state.round_active {
                prop_assert_eq!(state.balance, start_balance);
            }
        }
    }
}
