mod book_builder;
mod expectation;
mod public_claim;

pub use book_builder::BookBuilderPolicy;
pub use expectation::ExpectationPolicy;
pub use public_claim::PublicClaimPolicy;

use gofish_core::game::action::Action;
use gofish_core::game::snapshot::StateSnapshot;

/// Context provided to policies for decision-making. Everything a policy
/// may consult is in the public-state snapshot.
pub struct PolicyContext<'a> {
    pub snapshot: &'a StateSnapshot,
}

impl<'a> PolicyContext<'a> {
    pub fn new(snapshot: &'a StateSnapshot) -> Self {
        Self { snapshot }
    }

    /// Absolute seat of the opponent `offset` seats to the left.
    pub fn target_seat(&self, offset: usize) -> usize {
        (self.snapshot.current_player + offset) % self.snapshot.card_counts.len()
    }
}

/// Unified interface for request decision-making.
pub trait Policy: Send {
    /// Choose a request from the snapshot's legal actions.
    fn choose_request(&mut self, ctx: &PolicyContext) -> Action;
}

#[cfg(test)]
pub(crate) mod test_support {
    use gofish_core::game::action::Action;
    use gofish_core::game::snapshot::StateSnapshot;
    use gofish_core::model::card_set::RankSet;
    use gofish_core::model::rank::Rank;

    /// Builds a snapshot for a table of `num_players` with the given hand
    /// counts for the viewing player; all knowledge rows start empty.
    pub fn snapshot(num_players: usize, hand_rank_counts: [u8; 13]) -> StateSnapshot {
        let hand_size: u8 = hand_rank_counts.iter().sum();
        let mut legal_actions = Vec::new();
        for offset in 1..num_players {
            for rank in Rank::ORDERED {
                if hand_rank_counts[rank.index()] > 0 {
                    legal_actions.push(Action::new(offset, rank));
                }
            }
        }
        StateSnapshot {
            current_player: 0,
            legal_actions,
            card_counts: vec![hand_size as usize; num_players],
            book_counts: vec![0; num_players],
            public_rank_counts: vec![[0; 13]; num_players],
            possible_rank_counts: vec![[0; 13]; num_players],
            not_possible_rank_counts: vec![[0; 13]; num_players],
            expected_quantities: vec![[0.0; 13]; num_players - 1],
            remaining_ranks: RankSet::all(),
            hand: Vec::new(),
            hand_rank_counts,
            deck_size: 20,
        }
    }

    pub fn counts(entries: &[(Rank, u8)]) -> [u8; 13] {
        let mut row = [0u8; 13];
        for &(rank, count) in entries {
            row[rank.index()] = count;
        }
        row
    }
}
