//! Showdown (spec.md §4.5): side-pot construction from contribution levels
//! and TDA odd-chip distribution.

use crate::cards::Card;
use crate::eval::{evaluate, HandEvaluation};
use crate::lifecycle::next_in;
use crate::runtime::TableRuntime;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal {
    pub seat_no: u32,
    pub user_id: String,
    pub hole: (Card, Card),
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Winner {
    pub seat_no: u32,
    pub user_id: String,
    pub payout: u64,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowdownResult {
    pub reveal: Vec<Reveal>,
    pub winners: Vec<Winner>,
}

struct SidePot {
    total: u64,
    eligible_seats: Vec<u32>,
}

/// `hole_cards` must contain an entry for every non-folded seat in `runtime`.
pub fn resolve(
    runtime: &TableRuntime,
    hole_cards: &std::collections::HashMap<u32, (Card, Card)>,
    seat_count: u32,
) -> ShowdownResult {
    let pots = build_side_pots(runtime);

    let mut hands: std::collections::HashMap<u32, HandEvaluation> = std::collections::HashMap::new();
    for (&seat_no, &hole) in hole_cards {
        hands.insert(seat_no, evaluate(hole, &runtime.board));
    }

    let mut payouts: std::collections::HashMap<u32, u64> = std::collections::HashMap::new();
    for pot in &pots {
        if pot.total == 0 || pot.eligible_seats.is_empty() {
            continue;
        }
        let best = pot
            .eligible_seats
            .iter()
            .filter_map(|s| hands.get(s))
            .max()
            .copied()
            .expect("at least one eligible seat has a hand");
        let mut winners: Vec<u32> = pot
            .eligible_seats
            .iter()
            .copied()
            .filter(|s| hands.get(s) == Some(&best))
            .collect();
        winners.sort_unstable();

        let base = pot.total / winners.len() as u64;
        let rem = (pot.total - base * winners.len() as u64) as usize;

        for &seat in &winners {
            *payouts.entry(seat).or_insert(0) += base;
        }
        for seat in odd_chip_order(&winners, runtime.dealer_seat, seat_count).into_iter().take(rem) {
            *payouts.entry(seat).or_insert(0) += 1;
        }
    }

    let mut reveal: Vec<Reveal> = runtime
        .contenders()
        .filter_map(|seat| {
            hole_cards.get(&seat.seat_no).map(|&hole| Reveal {
                seat_no: seat.seat_no,
                user_id: seat.user_id.clone(),
                hole,
                value: hands.get(&seat.seat_no).map(|h| h.value()).unwrap_or(0),
            })
        })
        .collect();
    reveal.sort_unstable_by_key(|r| r.seat_no);

    let mut winners: Vec<Winner> = payouts
        .into_iter()
        .filter(|&(_, payout)| payout > 0)
        .map(|(seat_no, payout)| {
            let user_id = runtime.seat(seat_no).map(|s| s.user_id.clone()).unwrap_or_default();
            let value = hands.get(&seat_no).map(|h| h.value()).unwrap_or(0);
            Winner { seat_no, user_id, payout, value }
        })
        .collect();
    winners.sort_unstable_by_key(|w| w.seat_no);

    ShowdownResult { reveal, winners }
}

fn build_side_pots(runtime: &TableRuntime) -> Vec<SidePot> {
    let mut levels: Vec<u64> = runtime
        .players
        .values()
        .map(|s| s.committed)
        .filter(|&c| c > 0)
        .collect();
    levels.sort_unstable();
    levels.dedup();

    let mut pots = Vec::new();
    let mut prev = 0u64;
    for &lvl in &levels {
        let contributors: Vec<u32> = runtime
            .players
            .values()
            .filter(|s| s.committed >= lvl)
            .map(|s| s.seat_no)
            .collect();
        let pot_total = (lvl - prev) * contributors.len() as u64;
        let eligible_seats: Vec<u32> = runtime
            .players
            .values()
            .filter(|s| s.committed >= lvl && !s.has_folded)
            .map(|s| s.seat_no)
            .collect();
        pots.push(SidePot { total: pot_total, eligible_seats });
        prev = lvl;
    }
    pots
}

/// Orders `winners` by clockwise distance from the dealer's left, per the
/// TDA/Robert's Rules odd-chip convention.
fn odd_chip_order(winners: &[u32], dealer_seat: u32, seat_count: u32) -> Vec<u32> {
    let occupied: BTreeSet<u32> = winners.iter().copied().collect();
    let mut ordered = Vec::with_capacity(winners.len());
    let mut seat = dealer_seat;
    for _ in 0..seat_count {
        seat = next_in(&occupied, seat, seat_count);
        if ordered.contains(&seat) {
            break;
        }
        ordered.push(seat);
        if ordered.len() == winners.len() {
            break;
        }
    }
    ordered
}
