//! The canonical per-table state (§3 of the spec): this is what gets
//! serialized to the shared KV under `runtime:{tableId}` and is the only
//! thing a fresh process needs to resume a table.

use crate::cards::{Card, Deck};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Round {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Round {
    pub fn next(self) -> Self {
        match self {
            Round::Preflop => Round::Flop,
            Round::Flop => Round::Turn,
            Round::Turn => Round::River,
            Round::River => Round::Showdown,
            Round::Showdown => Round::Showdown,
        }
    }

    /// How many cards are dealt into `pendingBoard` when entering this round.
    pub fn cards_to_deal(self) -> usize {
        match self {
            Round::Flop => 3,
            Round::Turn | Round::River => 1,
            Round::Preflop | Round::Showdown => 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatRuntime {
    pub seat_no: u32,
    pub user_id: String,
    pub stack: u64,
    /// Chips committed to the current street only.
    pub bet: u64,
    /// Total chips committed across all streets this hand.
    pub committed: u64,
    pub has_folded: bool,
    pub is_all_in: bool,
    pub is_sitting_out: bool,
    pub timeouts_in_row: u32,
    #[serde(default)]
    pub acted_this_round: bool,
}

impl SeatRuntime {
    pub fn new(seat_no: u32, user_id: String, stack: u64) -> Self {
        Self {
            seat_no,
            user_id,
            stack,
            bet: 0,
            committed: 0,
            has_folded: false,
            is_all_in: false,
            is_sitting_out: false,
            timeouts_in_row: 0,
            acted_this_round: false,
        }
    }

    /// A contender is a seat still live in the hand (has not folded).
    pub fn is_contender(&self) -> bool {
        !self.has_folded
    }

    /// An actionable seat owes a decision: in the hand, not all-in, has chips,
    /// and is not voluntarily sitting out.
    pub fn is_actionable(&self) -> bool {
        !self.has_folded && !self.is_all_in && self.stack > 0 && !self.is_sitting_out
    }

    pub fn recompute_all_in(&mut self) {
        self.is_all_in = self.stack == 0 && !self.has_folded;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pot {
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRuntime {
    pub table_id: String,
    pub hand_id: String,
    pub round: Round,
    pub dealer_seat: u32,
    pub current_turn_seat: Option<u32>,
    /// Wall-clock deadline in ms since epoch, or `None` while dealing/auto-running.
    pub turn_ends_at: Option<i64>,
    pub deck: Deck,
    pub board: Vec<Card>,
    pub pending_board: Vec<Card>,
    pub is_dealing_board: bool,
    pub auto_runout: bool,
    pub pot: Pot,
    pub current_bet: u64,
    pub min_raise: u64,
    pub last_aggressor_seat: Option<u32>,
    pub players: HashMap<u32, SeatRuntime>,
}

impl TableRuntime {
    /// `pot.total` must always equal the sum of every seat's `committed`.
    pub fn invariant_pot_matches_committed(&self) -> bool {
        let sum: u64 = self.players.values().map(|s| s.committed).sum();
        self.pot.total == sum
    }

    pub fn contenders(&self) -> impl Iterator<Item = &SeatRuntime> {
        self.players.values().filter(|s| s.is_contender())
    }

    pub fn contender_seats(&self) -> Vec<u32> {
        let mut seats: Vec<u32> = self.contenders().map(|s| s.seat_no).collect();
        seats.sort_unstable();
        seats
    }

    pub fn seat(&self, seat_no: u32) -> Option<&SeatRuntime> {
        self.players.get(&seat_no)
    }

    pub fn seat_mut(&mut self, seat_no: u32) -> Option<&mut SeatRuntime> {
        self.players.get_mut(&seat_no)
    }

    /// Next occupied seat clockwise starting strictly after `from`, regardless
    /// of whether it can currently act — used to find the next dealer.
    pub fn next_occupied_seat(&self, from: u32, seat_count: u32) -> Option<u32> {
        if seat_count == 0 {
            return None;
        }
        for i in 1..=seat_count {
            let candidate = (from + i - 1) % seat_count + 1;
            if self.players.contains_key(&candidate) {
                return Some(candidate);
            }
        }
        None
    }

    /// Next actionable seat clockwise starting strictly after `from`.
    pub fn next_actionable_seat(&self, from: u32, seat_count: u32) -> Option<u32> {
        if seat_count == 0 {
            return None;
        }
        for i in 1..=seat_count {
            let candidate = (from + i - 1) % seat_count + 1;
            if let Some(seat) = self.players.get(&candidate) {
                if seat.is_actionable() {
                    return Some(candidate);
                }
            }
        }
        None
    }

    /// Postflop first actor (spec.md §4.3): the next actionable seat
    /// clockwise from the dealer, except a hand dealt heads-up, where the
    /// dealer is the small blind and acts first — a deliberate deviation
    /// from ring-game order that otherwise only applies preflop.
    pub fn postflop_first_actor(&self, seat_count: u32) -> Option<u32> {
        if self.players.len() == 2 {
            if let Some(seat) = self.seat(self.dealer_seat) {
                if seat.is_actionable() {
                    return Some(self.dealer_seat);
                }
            }
        }
        self.next_actionable_seat(self.dealer_seat, seat_count)
    }
}
