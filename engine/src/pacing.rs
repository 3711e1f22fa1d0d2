//! Pacing Orchestrator (spec.md §4.7): pure decisions about board-reveal
//! sequencing and auto-runout looping. The actual sleeps and broadcasts are
//! driven by the gateway; this module hands back one card at a time and
//! says when the sequence is done.

use crate::cards::Card;
use crate::config::Config;
use crate::runtime::{Round, TableRuntime};

/// Guard bound on auto-runout iterations (spec.md §4.7), far above any real
/// hand (at most 3 streets remain once all-in).
pub const AUTO_RUNOUT_MAX_ITERATIONS: u32 = 10;

/// One step of revealing `pending_board` onto `board`. Returns the popped
/// card, or `None` once the sequence is exhausted.
pub fn reveal_next_card(runtime: &mut TableRuntime) -> Option<Card> {
    if runtime.pending_board.is_empty() {
        return None;
    }
    let card = runtime.pending_board.remove(0);
    runtime.board.push(card);
    Some(card)
}

/// Call once `pending_board` is empty: clears the dealing flag and, unless
/// the hand is auto-running out, puts the next actionable seat on the clock
/// (spec.md §4.4 step 2 — `currentTurnSeat` stays `None` for the whole
/// dealing suspension, per the data-model invariant in §3).
pub fn finish_reveal(runtime: &mut TableRuntime, config: &Config, seat_count: u32, now_ms: i64) {
    debug_assert!(runtime.pending_board.is_empty());
    runtime.is_dealing_board = false;
    if !runtime.auto_runout {
        runtime.current_turn_seat = runtime.postflop_first_actor(seat_count);
        runtime.turn_ends_at = Some(now_ms + config.turn_time_ms as i64);
    }
}

/// How long to hold the table after a hand ends before the next hand may
/// start, per the terminal reason.
pub enum HandEndReason {
    WonByFold,
    Showdown,
}

pub fn post_hand_hold_ms(config: &Config, reason: HandEndReason) -> u64 {
    match reason {
        HandEndReason::WonByFold => config.win_by_fold_hold_ms,
        HandEndReason::Showdown => config.showdown_hold_ms,
    }
}

/// Whether the auto-runout loop should keep advancing streets.
pub fn should_continue_auto_runout(runtime: &TableRuntime, iterations: u32) -> bool {
    runtime.auto_runout && runtime.round != Round::Showdown && iterations < AUTO_RUNOUT_MAX_ITERATIONS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::tests_support::sample_runtime;

    #[test]
    fn reveal_next_card_moves_one_card_from_pending_to_board() {
        let mut runtime = sample_runtime();
        runtime.pending_board = runtime.deck.draw(3).0;
        let first = runtime.pending_board[0];
        let card = reveal_next_card(&mut runtime).unwrap();
        assert_eq!(card, first);
        assert_eq!(runtime.board.len(), 1);
        assert_eq!(runtime.pending_board.len(), 2);
    }

    #[test]
    fn reveal_next_card_returns_none_once_pending_board_is_empty() {
        let mut runtime = sample_runtime();
        assert!(reveal_next_card(&mut runtime).is_none());
    }

    #[test]
    fn finish_reveal_arms_the_turn_clock_unless_auto_running_out() {
        let mut runtime = sample_runtime();
        let config = Config::default();
        runtime.is_dealing_board = true;
        finish_reveal(&mut runtime, &config, 6, 1_000);
        assert!(!runtime.is_dealing_board);
        assert_eq!(runtime.turn_ends_at, Some(1_000 + config.turn_time_ms as i64));
        // sample_runtime is dealt heads-up, so the dealer (small blind) acts
        // first postflop rather than the next seat clockwise.
        assert_eq!(runtime.current_turn_seat, Some(runtime.dealer_seat));

        runtime.is_dealing_board = true;
        runtime.auto_runout = true;
        runtime.turn_ends_at = None;
        finish_reveal(&mut runtime, &config, 6, 2_000);
        assert_eq!(runtime.turn_ends_at, None);
    }

    #[test]
    fn auto_runout_loop_respects_the_iteration_guard() {
        let mut runtime = sample_runtime();
        runtime.auto_runout = true;
        assert!(should_continue_auto_runout(&runtime, 0));
        assert!(!should_continue_auto_runout(&runtime, AUTO_RUNOUT_MAX_ITERATIONS));
    }
}
