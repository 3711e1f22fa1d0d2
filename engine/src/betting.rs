//! Betting Engine (spec.md §4.4): validates and applies one action at a
//! time, advances streets, and decides when a hand is won by fold.

use crate::config::Config;
use crate::errors::EngineError;
use crate::lifecycle::next_in;
use crate::runtime::{Round, TableRuntime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Fold,
    Check,
    Call,
    Raise,
}

/// What happened after an action was applied, for the gateway to broadcast
/// and to decide whether to schedule the next timer or kick off showdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Betting continues; the next seat is on the clock.
    Continue { next_turn_seat: u32 },
    /// Everyone else folded; `winner_seat` takes the pot uncontested.
    WonByFold { winner_seat: u32 },
    /// The betting round is settled and the hand advances to `next_round`.
    /// `auto_runout` is set when every remaining contender is all-in and the
    /// board should be dealt out without further action.
    RoundSettled { next_round: Round, auto_runout: bool },
}

/// Applies one action by `seat_no` to `runtime`, mutating it in place.
///
/// `amount` is the raise-to total (the seat's new `bet` for the street) and
/// is only consulted for [`Action::Raise`].
pub fn apply(
    runtime: &mut TableRuntime,
    seat_no: u32,
    action: Action,
    amount: Option<u64>,
    seat_count: u32,
    config: &Config,
    now_ms: i64,
) -> Result<ApplyOutcome, EngineError> {
    if runtime.round == Round::Showdown {
        return Err(EngineError::NoHandRunning);
    }
    if runtime.is_dealing_board {
        return Err(EngineError::DealingBoard);
    }
    if runtime.current_turn_seat != Some(seat_no) {
        return Err(EngineError::NotYourTurn);
    }

    let seat = runtime.seat(seat_no).ok_or(EngineError::SeatNotFound)?;
    if seat.has_folded {
        return Err(EngineError::AlreadyFolded);
    }
    let to_call = runtime.current_bet.saturating_sub(seat.bet);
    let stack = seat.stack;
    let current_bet_before = seat.bet;

    match action {
        Action::Fold => {
            let seat = runtime.seat_mut(seat_no).expect("seat checked above");
            seat.has_folded = true;
            seat.acted_this_round = true;
        }
        Action::Check => {
            if to_call != 0 {
                return Err(EngineError::CannotCheck);
            }
            let seat = runtime.seat_mut(seat_no).expect("seat checked above");
            seat.acted_this_round = true;
        }
        Action::Call => {
            let call_amount = to_call.min(stack);
            commit(runtime, seat_no, call_amount);
            let seat = runtime.seat_mut(seat_no).expect("seat checked above");
            seat.acted_this_round = true;
        }
        Action::Raise => {
            let requested = amount.ok_or(EngineError::InvalidAmount)?;
            if requested <= current_bet_before {
                return Err(EngineError::InvalidAmount);
            }
            let needed = requested - current_bet_before;
            // A raise that names more than the seat can cover is a shove:
            // clamp to all-in rather than rejecting it outright.
            let (raise_to, needed) = if needed > stack {
                (current_bet_before + stack, stack)
            } else {
                (requested, needed)
            };
            if raise_to <= runtime.current_bet {
                return Err(EngineError::InvalidAmount);
            }
            let is_all_in = needed == stack;
            let raise_size = raise_to - runtime.current_bet;
            if !is_all_in && raise_size < runtime.min_raise {
                return Err(EngineError::RaiseTooSmall);
            }
            // A short all-in below the minimum raise commits chips but does
            // not reopen the action: min_raise and last_aggressor only move
            // when the raise clears the full minimum.
            let reopens = raise_size >= runtime.min_raise;
            commit(runtime, seat_no, needed);
            if reopens {
                runtime.min_raise = raise_size;
                runtime.current_bet = raise_to;
                runtime.last_aggressor_seat = Some(seat_no);
                clear_acted_except(runtime, seat_no);
            } else {
                runtime.current_bet = runtime.current_bet.max(raise_to);
            }
            let seat = runtime.seat_mut(seat_no).expect("seat checked above");
            seat.acted_this_round = true;
        }
    }

    if !runtime.invariant_pot_matches_committed() {
        return Err(EngineError::InvalidAmount);
    }

    let contenders = runtime.contender_seats();
    if contenders.len() == 1 {
        let winner_seat = contenders[0];
        let pot_total = runtime.pot.total;
        let winner = runtime.seat_mut(winner_seat).expect("sole contender has a seat");
        winner.stack += pot_total;
        runtime.pot.total = 0;
        runtime.current_turn_seat = None;
        runtime.turn_ends_at = None;
        return Ok(ApplyOutcome::WonByFold { winner_seat });
    }

    if is_round_settled(runtime) {
        let next_round = runtime.round.next();
        let auto_runout = should_auto_runout(runtime);
        runtime.round = next_round;
        reset_for_new_round(runtime);
        runtime.current_turn_seat = None;
        if auto_runout {
            runtime.auto_runout = true;
            runtime.turn_ends_at = None;
        }
        return Ok(ApplyOutcome::RoundSettled { next_round, auto_runout });
    }

    let occupied: BTreeSet<u32> = runtime.players.keys().copied().collect();
    let mut next_seat = next_in(&occupied, seat_no, seat_count);
    while !runtime
        .seat(next_seat)
        .map(|s| s.is_actionable())
        .unwrap_or(false)
        && next_seat != seat_no
    {
        next_seat = next_in(&occupied, next_seat, seat_count);
    }
    runtime.current_turn_seat = Some(next_seat);
    runtime.turn_ends_at = Some(now_ms + config.turn_time_ms as i64);
    Ok(ApplyOutcome::Continue { next_turn_seat: next_seat })
}

fn commit(runtime: &mut TableRuntime, seat_no: u32, amount: u64) {
    let seat = runtime.seat_mut(seat_no).expect("seat exists");
    seat.stack -= amount;
    seat.bet += amount;
    seat.committed += amount;
    seat.recompute_all_in();
    runtime.pot.total += amount;
}

fn clear_acted_except(runtime: &mut TableRuntime, seat_no: u32) {
    for (&no, seat) in runtime.players.iter_mut() {
        if no != seat_no {
            seat.acted_this_round = false;
        }
    }
}

/// Moving to a new street starts its betting from scratch (spec.md §4.4
/// step 2): street-local `bet` and the last aggressor reset, and every
/// seat's `actedThisRound` clears so the first check doesn't look settled.
pub fn reset_for_new_round(runtime: &mut TableRuntime) {
    runtime.current_bet = 0;
    runtime.last_aggressor_seat = None;
    for seat in runtime.players.values_mut() {
        seat.bet = 0;
        seat.acted_this_round = false;
    }
}

/// A betting round is settled once every contender still able to act has
/// matched `current_bet` (or is all-in) and has acted at least once since
/// the last raise.
pub fn is_round_settled(runtime: &TableRuntime) -> bool {
    let mut any_actionable = false;
    for seat in runtime.contenders() {
        if seat.is_actionable() {
            any_actionable = true;
            if !seat.acted_this_round || seat.bet != runtime.current_bet {
                return false;
            }
        }
    }
    let _ = any_actionable;
    true
}

/// A hand should be auto-run-out once at most one contender can still act
/// voluntarily and at least one contender is all-in; a lone actionable
/// contender facing only sitting-out-with-chips opponents must still get
/// to act on future streets.
pub fn should_auto_runout(runtime: &TableRuntime) -> bool {
    let actionable = runtime.contenders().filter(|s| s.is_actionable()).count();
    let any_all_in = runtime.contenders().any(|s| s.is_all_in);
    runtime.contenders().count() >= 2 && any_all_in && actionable <= 1
}
