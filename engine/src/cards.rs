use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    S,
    H,
    D,
    C,
}

impl Display for Suit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let c = match self {
            Suit::S => 's',
            Suit::H => 'h',
            Suit::D => 'd',
            Suit::C => 'c',
        };
        write!(f, "{c}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Two = 2,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    pub fn value(self) -> u8 {
        self as u8
    }
}

impl Display for Rank {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let c = match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        };
        write!(f, "{c}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// Parses the literal two-character notation used in tests and logs, e.g. `As`, `Td`.
pub fn parse_card(s: &str) -> Card {
    let bytes = s.as_bytes();
    assert!(bytes.len() == 2, "card like As, Td");
    let rank = match bytes[0] as char {
        '2' => Rank::Two,
        '3' => Rank::Three,
        '4' => Rank::Four,
        '5' => Rank::Five,
        '6' => Rank::Six,
        '7' => Rank::Seven,
        '8' => Rank::Eight,
        '9' => Rank::Nine,
        'T' | 't' => Rank::Ten,
        'J' | 'j' => Rank::Jack,
        'Q' | 'q' => Rank::Queen,
        'K' | 'k' => Rank::King,
        'A' | 'a' => Rank::Ace,
        other => panic!("bad rank: {other}"),
    };
    let suit = match bytes[1] as char {
        's' | 'S' => Suit::S,
        'h' | 'H' => Suit::H,
        'd' | 'D' => Suit::D,
        'c' | 'C' => Suit::C,
        other => panic!("bad suit: {other}"),
    };
    Card { rank, suit }
}

/// The 52-card deck, in fixed build order (rank outer, suit inner) until shuffled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck(pub Vec<Card>);

impl Deck {
    pub fn new() -> Self {
        let mut cards = Vec::with_capacity(52);
        for &rank in &Rank::ALL {
            for &suit in &[Suit::S, Suit::H, Suit::D, Suit::C] {
                cards.push(Card { rank, suit });
            }
        }
        Self(cards)
    }

    pub fn shuffled(rng: &mut impl Rng) -> Self {
        let mut deck = Self::new();
        deck.0.shuffle(rng);
        deck
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the first `n` cards and the remaining deck, without mutating `self`.
    /// Cards are drawn from the end of the vector (cheap pop order).
    pub fn draw(&self, n: usize) -> (Vec<Card>, Deck) {
        let mut remaining = self.0.clone();
        let mut drawn = Vec::with_capacity(n);
        for _ in 0..n {
            if let Some(card) = remaining.pop() {
                drawn.push(card);
            }
        }
        (drawn, Deck(remaining))
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}
