use crate::game::action::Action;
use crate::model::card::Card;
use crate::model::card_set::RankSet;
use crate::model::rank::Rank;
use serde::{Deserialize, Serialize};

/// Everything an external consumer (encoder, display, rule policy) may see
/// of the game from one player's viewpoint. Computed fresh per request;
/// nothing here is cached across turns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateSnapshot {
    pub current_player: usize,
    pub legal_actions: Vec<Action>,
    /// Hand sizes, one per player.
    pub card_counts: Vec<usize>,
    /// Completed-book counts, one per player.
    pub book_counts: Vec<usize>,
    /// Publicly confirmed cards per rank, one row per player.
    pub public_rank_counts: Vec<[u8; Rank::COUNT]>,
    /// Size of each rank's possible-set per player (0 = no hypothesis).
    pub possible_rank_counts: Vec<[u8; Rank::COUNT]>,
    /// Size of each rank's not-possible-set per player (0 = no proof).
    pub not_possible_rank_counts: Vec<[u8; Rank::COUNT]>,
    /// Expected quantities per opponent (by target offset − 1), per rank.
    pub expected_quantities: Vec<[f64; Rank::COUNT]>,
    pub remaining_ranks: RankSet,
    /// The viewing player's own hand.
    pub hand: Vec<Card>,
    pub hand_rank_counts: [u8; Rank::COUNT],
    pub deck_size: usize,
}

impl StateSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use crate::game::engine::Game;
    use crate::game::snapshot::StateSnapshot;

    #[test]
    fn snapshot_serializes_to_json() {
        let game = Game::with_seed(2, 99).unwrap();
        let snapshot = game.snapshot();
        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"deck_size\": 38"));
        assert!(json.contains("\"current_player\": 0"));
    }

    #[test]
    fn snapshot_roundtrips_through_json() {
        let game = Game::with_seed(3, 7).unwrap();
        let snapshot = game.snapshot();
        let json = snapshot.to_json().unwrap();
        let restored = StateSnapshot::from_json(&json).unwrap();
        assert_eq!(restored, snapshot);
    }
}
