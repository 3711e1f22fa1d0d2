//! Hand Lifecycle (spec.md §4.3): starts a new hand when at least two seats
//! have chips, derives dealer/blinds/first-actor, shuffles, deals, and posts
//! blinds.

use crate::cards::{Card, Deck};
use crate::collaborators::SeatedPlayer;
use crate::config::Config;
use crate::runtime::{Pot, Round, SeatRuntime, TableRuntime};
use rand::Rng;
use std::collections::{BTreeSet, HashMap};

/// Everything the gateway needs to finish starting a hand: the runtime to
/// persist under `runtime:{tableId}` and the hole cards to persist, one key
/// per player, under `hand:{tableId}:{handId}:{userId}`.
pub struct StartedHand {
    pub runtime: TableRuntime,
    pub hole_cards: HashMap<String, (Card, Card)>,
}

/// Returns `None` ("not started", not an error) when fewer than two seats
/// have chips.
#[allow(clippy::too_many_arguments)]
pub fn start_hand(
    table_id: &str,
    hand_id: String,
    seated: &[SeatedPlayer],
    prior_dealer: Option<u32>,
    seat_count: u32,
    config: &Config,
    now_ms: i64,
    rng: &mut impl Rng,
) -> Option<StartedHand> {
    let active: Vec<&SeatedPlayer> = seated.iter().filter(|s| s.stack > 0).collect();
    if active.len() < 2 {
        return None;
    }

    let occupied: BTreeSet<u32> = active.iter().map(|s| s.seat_no).collect();
    let dealer_seat = match prior_dealer {
        None => *occupied.iter().next().expect("at least two seats occupied"),
        Some(prev) => next_in(&occupied, prev, seat_count),
    };

    let heads_up = active.len() == 2;
    let (sb_seat, bb_seat, first_preflop_actor) = if heads_up {
        let sb = dealer_seat;
        let bb = next_in(&occupied, sb, seat_count);
        (sb, bb, sb)
    } else {
        let sb = next_in(&occupied, dealer_seat, seat_count);
        let bb = next_in(&occupied, sb, seat_count);
        let first = next_in(&occupied, bb, seat_count);
        (sb, bb, first)
    };

    let mut players: HashMap<u32, SeatRuntime> = HashMap::new();
    for p in &active {
        players.insert(p.seat_no, SeatRuntime::new(p.seat_no, p.user_id.clone(), p.stack));
    }

    let mut deck = Deck::shuffled(rng);
    let mut hole_cards: HashMap<String, (Card, Card)> = HashMap::new();
    // Deal two rounds, one card per active seat clockwise from the SB, the
    // way a physical dealer would.
    let mut deal_order = Vec::with_capacity(active.len());
    let mut seat = sb_seat;
    for _ in 0..active.len() {
        deal_order.push(seat);
        seat = next_in(&occupied, seat, seat_count);
    }
    let mut first_cards: HashMap<u32, Card> = HashMap::new();
    for &seat_no in &deal_order {
        let (drawn, rest) = deck.draw(1);
        deck = rest;
        first_cards.insert(seat_no, drawn[0]);
    }
    for &seat_no in &deal_order {
        let (drawn, rest) = deck.draw(1);
        deck = rest;
        let user_id = players[&seat_no].user_id.clone();
        hole_cards.insert(user_id, (first_cards[&seat_no], drawn[0]));
    }

    let mut pot_total: u64 = 0;
    let sb_amount = config.small_blind.min(players[&sb_seat].stack);
    post_chips(&mut players, sb_seat, sb_amount, &mut pot_total);
    let bb_amount = config.big_blind.min(players[&bb_seat].stack);
    post_chips(&mut players, bb_seat, bb_amount, &mut pot_total);

    let runtime = TableRuntime {
        table_id: table_id.to_string(),
        hand_id,
        round: Round::Preflop,
        dealer_seat,
        current_turn_seat: Some(first_preflop_actor),
        turn_ends_at: Some(now_ms + config.turn_time_ms as i64),
        deck,
        board: Vec::new(),
        pending_board: Vec::new(),
        is_dealing_board: false,
        auto_runout: false,
        pot: Pot { total: pot_total },
        current_bet: bb_amount,
        min_raise: config.big_blind,
        last_aggressor_seat: Some(bb_seat),
        players,
    };

    Some(StartedHand { runtime, hole_cards })
}

fn post_chips(players: &mut HashMap<u32, SeatRuntime>, seat_no: u32, amount: u64, pot_total: &mut u64) {
    let seat = players.get_mut(&seat_no).expect("seat exists");
    seat.stack -= amount;
    seat.bet += amount;
    seat.committed += amount;
    seat.recompute_all_in();
    *pot_total += amount;
}

/// Next seat in `occupied` strictly after `from`, wrapping through
/// `1..=seat_count`. Falls back to `from` itself if nothing else qualifies.
pub fn next_in(occupied: &BTreeSet<u32>, from: u32, seat_count: u32) -> u32 {
    for i in 1..=seat_count {
        let candidate = (from - 1 + i) % seat_count + 1;
        if occupied.contains(&candidate) {
            return candidate;
        }
    }
    from
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seated(stacks: &[(u32, u64)]) -> Vec<SeatedPlayer> {
        stacks
            .iter()
            .map(|&(seat_no, stack)| SeatedPlayer {
                seat_no,
                user_id: format!("u{seat_no}"),
                stack,
            })
            .collect()
    }

    #[test]
    fn fewer_than_two_seated_does_not_start() {
        let config = Config::default();
        let mut rng = StdRng::seed_from_u64(1);
        let result = start_hand("t1", "h1".into(), &seated(&[(1, 1000)]), None, 6, &config, 0, &mut rng);
        assert!(result.is_none());
    }

    #[test]
    fn heads_up_dealer_is_small_blind_and_acts_first() {
        let config = Config { small_blind: 5, big_blind: 10, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(1);
        let started = start_hand("t1", "h1".into(), &seated(&[(1, 1000), (2, 1000)]), None, 6, &config, 0, &mut rng).unwrap();
        let rt = started.runtime;
        assert_eq!(rt.dealer_seat, 1);
        assert_eq!(rt.current_turn_seat, Some(1));
        assert_eq!(rt.players[&1].bet, 5);
        assert_eq!(rt.players[&2].bet, 10);
        assert_eq!(rt.pot.total, 15);
        assert_eq!(rt.current_bet, 10);
    }

    #[test]
    fn three_handed_first_actor_is_utg() {
        let config = Config { small_blind: 5, big_blind: 10, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(1);
        let started = start_hand(
            "t1",
            "h1".into(),
            &seated(&[(1, 1000), (2, 1000), (3, 1000)]),
            None,
            6,
            &config,
            0,
            &mut rng,
        )
        .unwrap();
        let rt = started.runtime;
        assert_eq!(rt.dealer_seat, 1);
        assert_eq!(rt.players[&2].bet, 5); // SB
        assert_eq!(rt.players[&3].bet, 10); // BB
        assert_eq!(rt.current_turn_seat, Some(1)); // UTG, next after BB, wraps to dealer
    }

    #[test]
    fn blinds_clamp_to_a_short_stack_and_go_all_in() {
        let config = Config { small_blind: 5, big_blind: 10, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(1);
        let started = start_hand("t1", "h1".into(), &seated(&[(1, 1000), (2, 3)]), None, 6, &config, 0, &mut rng).unwrap();
        let rt = started.runtime;
        let bb_seat = rt.players.values().find(|s| s.bet == 3).unwrap();
        assert!(bb_seat.is_all_in);
    }

    #[test]
    fn dealer_rotates_to_the_next_occupied_seat() {
        let config = Config::default();
        let mut rng = StdRng::seed_from_u64(1);
        let started = start_hand("t1", "h1".into(), &seated(&[(1, 1000), (2, 1000), (4, 1000)]), Some(1), 6, &config, 0, &mut rng).unwrap();
        assert_eq!(started.runtime.dealer_seat, 2);
    }

    #[test]
    fn each_player_gets_exactly_two_distinct_hole_cards() {
        let config = Config::default();
        let mut rng = StdRng::seed_from_u64(7);
        let started = start_hand("t1", "h1".into(), &seated(&[(1, 1000), (2, 1000), (3, 1000)]), None, 6, &config, 0, &mut rng).unwrap();
        assert_eq!(started.hole_cards.len(), 3);
        let mut all_cards = Vec::new();
        for (c1, c2) in started.hole_cards.values() {
            assert_ne!(c1, c2);
            all_cards.push(*c1);
            all_cards.push(*c2);
        }
        let unique: std::collections::HashSet<_> = all_cards.iter().collect();
        assert_eq!(unique.len(), all_cards.len());
    }
}
