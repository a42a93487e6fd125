use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    /// Number of distinct cards in the fixed deck.
    pub const COUNT: usize = 52;

    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Stable id in `0..52` used for bitset membership.
    pub const fn id(self) -> u8 {
        (self.suit.index() * Rank::COUNT + self.rank.index()) as u8
    }

    pub const fn from_id(id: u8) -> Option<Self> {
        let id = id as usize;
        if id >= Self::COUNT {
            return None;
        }
        match (Rank::from_index(id % Rank::COUNT), Suit::from_index(id / Rank::COUNT)) {
            (Some(rank), Some(suit)) => Some(Self { rank, suit }),
            _ => None,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[cfg(test)]
mod tests {
    use super::{Card, Rank, Suit};

    #[test]
    fn id_roundtrip_covers_the_deck() {
        for id in 0..Card::COUNT as u8 {
            let card = Card::from_id(id).expect("valid card id");
            assert_eq!(card.id(), id);
        }
        assert_eq!(Card::from_id(52), None);
    }

    #[test]
    fn identity_is_rank_and_suit() {
        let a = Card::new(Rank::Ace, Suit::Spades);
        let b = Card::new(Rank::Ace, Suit::Spades);
        assert_eq!(a, b);
        assert_ne!(a, Card::new(Rank::Ace, Suit::Hearts));
    }

    #[test]
    fn display_concatenates_rank_and_suit() {
        assert_eq!(Card::new(Rank::Ten, Suit::Diamonds).to_string(), "10D");
        assert_eq!(Card::new(Rank::Queen, Suit::Spades).to_string(), "QS");
    }
}
