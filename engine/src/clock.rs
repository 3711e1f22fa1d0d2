//! Turn Clock & Away Policy (spec.md §4.6): pure scheduling and default-action
//! logic. The actual timer task (a `tokio::time::sleep_until`) lives in the
//! gateway; this module only decides *what* to schedule and *what* firing
//! means.

use crate::runtime::TableRuntime;

/// The identity of one logical timer. Rescheduling with an identical key is
/// a no-op; any other key supersedes and cancels the previous timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerKey {
    pub hand_id_hash: u64,
    pub turn_seat: u32,
    pub turn_ends_at: i64,
}

impl TimerKey {
    pub fn from_runtime(runtime: &TableRuntime) -> Option<Self> {
        let turn_seat = runtime.current_turn_seat?;
        let turn_ends_at = runtime.turn_ends_at?;
        Some(Self {
            hand_id_hash: hash_hand_id(&runtime.hand_id),
            turn_seat,
            turn_ends_at,
        })
    }
}

fn hash_hand_id(hand_id: &str) -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    let mut hasher = DefaultHasher::new();
    hand_id.hash(&mut hasher);
    hasher.finish()
}

/// Whether a timer should be scheduled at all for the current state.
pub fn should_schedule(runtime: &TableRuntime) -> bool {
    !runtime.is_dealing_board && !runtime.auto_runout && runtime.turn_ends_at.is_some()
}

/// Delay in milliseconds until the timer should fire, clamped to zero for
/// past-due deadlines (the recovery path, spec.md §4.8 / S6).
pub fn fire_delay_ms(runtime: &TableRuntime, now_ms: i64) -> u64 {
    match runtime.turn_ends_at {
        Some(ends_at) => (ends_at - now_ms).max(0) as u64,
        None => 0,
    }
}

/// The action taken automatically when a turn clock expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultAction {
    Check,
    Fold,
}

/// What to do by default for `seat_no` given the current runtime — `CHECK`
/// if nothing is owed, `FOLD` otherwise.
pub fn default_action(runtime: &TableRuntime, seat_no: u32) -> DefaultAction {
    let to_call = runtime
        .seat(seat_no)
        .map(|s| runtime.current_bet.saturating_sub(s.bet))
        .unwrap_or(0);
    if to_call == 0 {
        DefaultAction::Check
    } else {
        DefaultAction::Fold
    }
}

/// Per-`(tableId, userId)` strike tracking for the away-kick policy. Lives
/// process-local in the gateway; this type is the pure state-transition
/// logic over it.
#[derive(Debug, Default, Clone, Copy)]
pub struct StrikeCounter {
    pub timeouts_in_row: u32,
}

impl StrikeCounter {
    /// Records one forced timeout. Returns `true` once the strike count
    /// reaches `away_timeouts_in_row`, meaning the seat should be queued
    /// into `pendingAwayKicks`.
    pub fn record_timeout(&mut self, away_timeouts_in_row: u32) -> bool {
        self.timeouts_in_row += 1;
        self.timeouts_in_row >= away_timeouts_in_row
    }

    /// Any manual (non-timeout) action resets the strike counter.
    pub fn record_manual_action(&mut self) {
        self.timeouts_in_row = 0;
    }
}
