//! Seven-card hand evaluation.
//!
//! `evaluate` folds two hole cards and up to five board cards into a single
//! [`HandValue`] whose `Ord` implementation is the entire contract: higher
//! beats lower, equal values tie. The specific packing is an implementation
//! detail callers must not depend on.

use crate::cards::{Card, Rank};
use itertools::Itertools;
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum HandCategory {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandEvaluation {
    pub category: HandCategory,
    /// Tiebreak ranks in descending priority, each in `2..=14`. Unused trailing
    /// slots are zero and never compared because `category` already differs
    /// whenever fewer than 5 kickers matter.
    pub kickers: [u8; 5],
}

impl PartialOrd for HandEvaluation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandEvaluation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.category
            .cmp(&other.category)
            .then_with(|| self.kickers.cmp(&other.kickers))
    }
}

impl HandEvaluation {
    /// Packs into a single totally-ordered integer, per the evaluator contract:
    /// `value(a) > value(b)` iff hand `a` beats hand `b`.
    pub fn value(&self) -> u32 {
        let mut v = self.category as u32;
        for k in self.kickers {
            v = (v << 4) | k as u32;
        }
        v
    }
}

/// Evaluates the best 5-card hand from 2 hole cards plus the board (0..=5 cards).
pub fn evaluate(hole: (Card, Card), board: &[Card]) -> HandEvaluation {
    let mut all = vec![hole.0, hole.1];
    all.extend_from_slice(board);

    if all.len() <= 5 {
        return evaluate_five(&all);
    }

    all.iter()
        .copied()
        .combinations(5)
        .map(|five| evaluate_five(&five))
        .max()
        .expect("at least one 5-card combination exists")
}

fn evaluate_five(cards: &[Card]) -> HandEvaluation {
    assert_eq!(cards.len(), 5, "evaluate_five takes exactly 5 cards");

    let mut ranks: Vec<u8> = cards.iter().map(|c| c.rank.value()).collect();
    ranks.sort_unstable_by(|a, b| b.cmp(a));

    let mut counts: HashMap<u8, u8> = HashMap::new();
    for &r in &ranks {
        *counts.entry(r).or_insert(0) += 1;
    }

    let is_flush = cards.iter().all(|c| c.suit == cards[0].suit);
    let straight_high = straight_high_card(&ranks);

    if is_flush && straight_high.is_some() {
        return HandEvaluation {
            category: HandCategory::StraightFlush,
            kickers: pad([straight_high.unwrap()]),
        };
    }

    if let Some(quad) = rank_with_count(&counts, 4) {
        let kicker = ranks.iter().copied().find(|&r| r != quad).unwrap_or(0);
        return HandEvaluation {
            category: HandCategory::FourOfAKind,
            kickers: pad([quad, kicker]),
        };
    }

    if let Some(trips) = rank_with_count(&counts, 3) {
        if let Some(pair) = ranks_with_count_at_least(&counts, 2)
            .into_iter()
            .find(|&r| r != trips)
        {
            return HandEvaluation {
                category: HandCategory::FullHouse,
                kickers: pad([trips, pair]),
            };
        }
    }

    if is_flush {
        return HandEvaluation {
            category: HandCategory::Flush,
            kickers: pad5(&ranks),
        };
    }

    if let Some(high) = straight_high {
        return HandEvaluation {
            category: HandCategory::Straight,
            kickers: pad([high]),
        };
    }

    if let Some(trips) = rank_with_count(&counts, 3) {
        let rest: Vec<u8> = ranks.iter().copied().filter(|&r| r != trips).take(2).collect();
        return HandEvaluation {
            category: HandCategory::ThreeOfAKind,
            kickers: pad([trips, rest[0], rest[1]]),
        };
    }

    let mut pairs = ranks_with_count_at_least(&counts, 2);
    pairs.sort_unstable_by(|a, b| b.cmp(a));
    if pairs.len() >= 2 {
        let (high_pair, low_pair) = (pairs[0], pairs[1]);
        let kicker = ranks
            .iter()
            .copied()
            .find(|&r| r != high_pair && r != low_pair)
            .unwrap_or(0);
        return HandEvaluation {
            category: HandCategory::TwoPair,
            kickers: pad([high_pair, low_pair, kicker]),
        };
    }

    if let Some(pair) = pairs.first().copied() {
        let rest: Vec<u8> = ranks.iter().copied().filter(|&r| r != pair).take(3).collect();
        return HandEvaluation {
            category: HandCategory::OnePair,
            kickers: pad([pair, rest[0], rest[1], rest[2]]),
        };
    }

    HandEvaluation {
        category: HandCategory::HighCard,
        kickers: pad5(&ranks),
    }
}

fn rank_with_count(counts: &HashMap<u8, u8>, n: u8) -> Option<u8> {
    counts
        .iter()
        .filter(|&(_, &c)| c == n)
        .map(|(&r, _)| r)
        .max()
}

fn ranks_with_count_at_least(counts: &HashMap<u8, u8>, n: u8) -> Vec<u8> {
    counts.iter().filter(|&(_, &c)| c >= n).map(|(&r, _)| r).collect()
}

/// Returns the high card of a straight among the given ranks (descending, may
/// contain duplicates), treating an Ace as low for the wheel (A-2-3-4-5).
fn straight_high_card(ranks_desc: &[u8]) -> Option<u8> {
    let mut values: Vec<u8> = ranks_desc.to_vec();
    if values.contains(&(Rank::Ace.value())) {
        values.push(1);
    }
    let mut uniq = values;
    uniq.sort_unstable();
    uniq.dedup();

    let mut run_start = 0;
    for i in 1..uniq.len() {
        if uniq[i] != uniq[i - 1] + 1 {
            run_start = i;
        }
        if i - run_start >= 4 {
            return Some(uniq[i]);
        }
    }
    None
}

fn pad(vals: impl IntoIterator<Item = u8>) -> [u8; 5] {
    let mut out = [0u8; 5];
    for (slot, v) in out.iter_mut().zip(vals) {
        *slot = v;
    }
    out
}

fn pad5(ranks_desc: &[u8]) -> [u8; 5] {
    let mut out = [0u8; 5];
    out.copy_from_slice(&ranks_desc[..5]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_card;

    fn ev(hole: (&str, &str), board: &[&str]) -> HandEvaluation {
        evaluate(
            (parse_card(hole.0), parse_card(hole.1)),
            &board.iter().map(|s| parse_card(s)).collect::<Vec<_>>(),
        )
    }

    #[test]
    fn royal_flush_beats_everything() {
        let royal = ev(("Ah", "Kh"), &["Qh", "Jh", "Th", "2d", "3c"]);
        assert_eq!(royal.category, HandCategory::StraightFlush);
        assert_eq!(royal.kickers[0], Rank::Ace.value());
    }

    #[test]
    fn wheel_straight_is_five_high() {
        let wheel = ev(("Ah", "2d"), &["3c", "4s", "5h", "9d", "Kc"]);
        assert_eq!(wheel.category, HandCategory::Straight);
        assert_eq!(wheel.kickers[0], 5);
    }

    #[test]
    fn full_house_beats_flush() {
        let boat = ev(("Ah", "Ad"), &["As", "Kh", "Kd", "2c", "3c"]);
        assert_eq!(boat.category, HandCategory::FullHouse);
    }

    #[test]
    fn two_pair_kicker_breaks_tie() {
        let a = ev(("Qd", "3c"), &["Ah", "Ad", "Kc", "7c", "2s"]);
        let b = ev(("Jd", "4c"), &["Ah", "Ad", "Kc", "7c", "2s"]);
        assert_eq!(a.category, HandCategory::TwoPair);
        assert!(a > b);
    }

    #[test]
    fn ordering_is_total_and_transitive_across_categories() {
        let high = ev(("2h", "7d"), &["9c", "Jc", "Ks", "3d", "4h"]);
        let pair = ev(("2h", "2d"), &["9c", "Jc", "Ks", "3d", "4h"]);
        let straight = ev(("Th", "Jh"), &["Qc", "Kd", "As", "3d", "4h"]);
        assert!(straight > pair);
        assert!(pair > high);
    }
}
