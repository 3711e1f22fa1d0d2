//! Black-box seven-card hand ranking: every category reachable from two
//! hole cards plus a five-card board, using the crate's public API only.

use holdem_engine::cards::parse_card;
use holdem_engine::eval::{evaluate, HandCategory};
use rstest::rstest;

fn cards(raw: &[&str]) -> Vec<holdem_engine::Card> {
    raw.iter().map(|s| parse_card(s)).collect()
}

#[rstest]
#[case::royal_flush(&["Ah", "Kh"], &["Qh", "Jh", "Th", "2d", "3c"], HandCategory::StraightFlush)]
#[case::straight_flush(&["9s", "8s"], &["7s", "6s", "5s", "Kd", "Qc"], HandCategory::StraightFlush)]
#[case::four_of_a_kind(&["Ah", "Ad"], &["Ac", "As", "Kh", "2d", "3c"], HandCategory::FourOfAKind)]
#[case::full_house(&["Kh", "Kd"], &["Kc", "Qs", "Qh", "2d", "3c"], HandCategory::FullHouse)]
#[case::flush(&["Ah", "Th"], &["Kh", "Qh", "Jd", "2h", "3c"], HandCategory::Flush)]
#[case::straight(&["Th", "9d"], &["8c", "7s", "6h", "2d", "3c"], HandCategory::Straight)]
#[case::wheel_straight(&["Ah", "2d"], &["3c", "4s", "5h", "9d", "Kc"], HandCategory::Straight)]
#[case::three_of_a_kind(&["Jh", "Jd"], &["Jc", "Ts", "9h", "2d", "3c"], HandCategory::ThreeOfAKind)]
#[case::two_pair(&["Qh", "Qd"], &["Tc", "Ts", "9h", "2d", "3c"], HandCategory::TwoPair)]
#[case::one_pair(&["Ah", "Ad"], &["Kc", "Qs", "Jh", "2d", "3c"], HandCategory::OnePair)]
#[case::high_card(&["Ah", "Kd"], &["Qc", "Js", "9h", "2d", "3c"], HandCategory::HighCard)]
fn evaluates_the_expected_category(#[case] hole: &[&str; 2], #[case] board: &[&str], #[case] expected: HandCategory) {
    let hole_cards = cards(hole);
    let board_cards = cards(board);
    let result = evaluate((hole_cards[0], hole_cards[1]), &board_cards);
    assert_eq!(result.category, expected);
}

#[test]
fn wheel_straight_ranks_five_high_not_ace_high() {
    let hole = cards(&["Ah", "2d"]);
    let board = cards(&["3c", "4s", "5h", "9d", "Kc"]);
    let evaluation = evaluate((hole[0], hole[1]), &board);
    assert_eq!(evaluation.category, HandCategory::Straight);
    assert_eq!(evaluation.kickers[0], 5);
}

#[test]
fn a_better_kicker_breaks_a_tie_within_the_same_category() {
    let board = cards(&["Ah", "Ad", "Kc", "7c", "2s"]);
    let better = cards(&["Qd", "3c"]);
    let worse = cards(&["Jd", "4c"]);
    let a = evaluate((better[0], better[1]), &board);
    let b = evaluate((worse[0], worse[1]), &board);
    assert_eq!(a.category, HandCategory::TwoPair);
    assert!(a > b);
}

#[test]
fn category_always_outranks_kickers_across_boundaries() {
    let board = cards(&["9c", "Jc", "Ks", "3d", "4h"]);
    let high = evaluate((parse_card("2h"), parse_card("7d")), &board);
    let pair = evaluate((parse_card("2h"), parse_card("2d")), &board);
    assert!(pair > high);
}

#[test]
fn value_is_a_single_total_order_consistent_with_comparison() {
    let board = cards(&["2c", "7d", "9h", "Jc", "4s"]);
    let worse = evaluate((parse_card("2d"), parse_card("3d")), &board);
    let better = evaluate((parse_card("Ah"), parse_card("Ad")), &board);
    assert!(better > worse);
    assert!(better.value() > worse.value());
}
