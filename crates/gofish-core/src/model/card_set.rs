use crate::model::card::Card;
use crate::model::rank::Rank;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Bitset over the stable `0..52` card-id space.
///
/// Cards are value types, so set membership is the only sharing between
/// knowledge buckets; every membership test and update is O(1).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CardSet(u64);

impl CardSet {
    pub const EMPTY: Self = Self(0);

    pub fn single(card: Card) -> Self {
        Self(1 << card.id())
    }

    pub fn insert(&mut self, card: Card) {
        self.0 |= 1 << card.id();
    }

    /// Returns whether the card was present.
    pub fn remove(&mut self, card: Card) -> bool {
        let bit = 1 << card.id();
        let present = self.0 & bit != 0;
        self.0 &= !bit;
        present
    }

    pub fn contains(self, card: Card) -> bool {
        self.0 & (1 << card.id()) != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    pub fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// The single member, when the set holds exactly one card.
    pub fn sole_member(self) -> Option<Card> {
        if self.0.count_ones() == 1 {
            Card::from_id(self.0.trailing_zeros() as u8)
        } else {
            None
        }
    }

    pub fn iter(self) -> impl Iterator<Item = Card> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let id = bits.trailing_zeros() as u8;
            bits &= bits - 1;
            Card::from_id(id)
        })
    }
}

impl FromIterator<Card> for CardSet {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for card in iter {
            set.insert(card);
        }
        set
    }
}

impl fmt::Debug for CardSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Bitset over the 13 rank indices.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RankSet(u16);

impl RankSet {
    pub const EMPTY: Self = Self(0);

    pub fn all() -> Self {
        Self((1 << Rank::COUNT) - 1)
    }

    pub fn single(rank: Rank) -> Self {
        Self(1 << rank.index())
    }

    pub fn insert(&mut self, rank: Rank) {
        self.0 |= 1 << rank.index();
    }

    pub fn remove(&mut self, rank: Rank) -> bool {
        let bit = 1 << rank.index();
        let present = self.0 & bit != 0;
        self.0 &= !bit;
        present
    }

    pub fn contains(self, rank: Rank) -> bool {
        self.0 & (1 << rank.index()) != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn sole_member(self) -> Option<Rank> {
        if self.0.count_ones() == 1 {
            Rank::from_index(self.0.trailing_zeros() as usize)
        } else {
            None
        }
    }

    pub fn iter(self) -> impl Iterator<Item = Rank> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let index = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Rank::from_index(index)
        })
    }
}

impl FromIterator<Rank> for RankSet {
    fn from_iter<I: IntoIterator<Item = Rank>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for rank in iter {
            set.insert(rank);
        }
        set
    }
}

impl fmt::Debug for RankSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
