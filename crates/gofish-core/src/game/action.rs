use crate::model::rank::Rank;
use core::fmt;
use serde::{Deserialize, Serialize};

/// One request: ask the player `target_offset` seats to the left for every
/// card of `rank`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub target_offset: usize,
    pub rank: Rank,
}

impl Action {
    pub const fn new(target_offset: usize, rank: Rank) -> Self {
        Self { target_offset, rank }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.target_offset, self.rank)
    }
}

/// The fixed `(num_players − 1) × 13` enumeration of requests, offset-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSpace {
    num_players: usize,
}

impl ActionSpace {
    pub const fn new(num_players: usize) -> Self {
        Self { num_players }
    }

    pub const fn len(self) -> usize {
        (self.num_players - 1) * Rank::COUNT
    }

    pub const fn is_empty(self) -> bool {
        self.num_players <= 1
    }

    pub fn encode(self, action: Action) -> Option<usize> {
        if action.target_offset == 0 || action.target_offset >= self.num_players {
            return None;
        }
        Some((action.target_offset - 1) * Rank::COUNT + action.rank.index())
    }

    pub fn decode(self, id: usize) -> Option<Action> {
        if id >= self.len() {
            return None;
        }
        let rank = Rank::from_index(id % Rank::COUNT)?;
        Some(Action::new(id / Rank::COUNT + 1, rank))
    }

    pub fn iter(self) -> impl Iterator<Item = Action> {
        (0..self.len()).filter_map(move |id| self.decode(id))
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, ActionSpace};
    use crate::model::rank::Rank;

    #[test]
    fn space_size_scales_with_opponents() {
        assert_eq!(ActionSpace::new(2).len(), 13);
        assert_eq!(ActionSpace::new(4).len(), 39);
    }

    #[test]
    fn encode_decode_roundtrip() {
        let space = ActionSpace::new(4);
        for id in 0..space.len() {
            let action = space.decode(id).expect("valid id");
            assert_eq!(space.encode(action), Some(id));
        }
        assert_eq!(space.decode(space.len()), None);
    }

    #[test]
    fn offsets_outside_the_table_do_not_encode() {
        let space = ActionSpace::new(3);
        assert_eq!(space.encode(Action::new(0, Rank::Two)), None);
        assert_eq!(space.encode(Action::new(3, Rank::Two)), None);
    }

    #[test]
    fn display_matches_offset_dash_rank() {
        assert_eq!(Action::new(2, Rank::Ace).to_string(), "2-A");
        assert_eq!(Action::new(1, Rank::Ten).to_string(), "1-10");
    }
}
