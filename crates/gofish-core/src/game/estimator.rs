//! Expected-value estimation of opponents' rank holdings.
//!
//! Everything here is a pure function of public knowledge: own hand counts,
//! public buckets, the hypothesis sets and the deck size. Recomputed fresh
//! on every state read; there is no hidden randomness and no caching.

use crate::knowledge::Player;
use crate::model::rank::Rank;

/// Per-opponent, per-rank expected quantities from one player's viewpoint.
/// Rows are indexed by target offset minus one.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectationTable {
    rows: Vec<[f64; Rank::COUNT]>,
}

impl ExpectationTable {
    pub fn expected(&self, target_offset: usize, rank: Rank) -> f64 {
        self.rows[target_offset - 1][rank.index()]
    }

    pub fn rows(&self) -> &[[f64; Rank::COUNT]] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<[f64; Rank::COUNT]> {
        self.rows
    }
}

/// Builds the expectation table for `asker` against every opponent.
///
/// Each unseen card of a rank is worth a share of that rank's unknown
/// quantity; a concealed card's share is weighted up when proofs restrict
/// its candidate ranks, and discounted by `1 − 1/k` for every size-`k`
/// possible-set it shares with other cards. The deck competes for the same
/// unknown quantity through `total_points`.
pub fn expectation_table(players: &[Player], asker: usize, deck_size: usize) -> ExpectationTable {
    let num_players = players.len();
    let me = &players[asker];
    let remaining = me.remaining_ranks();

    let mut unknown = [0f64; Rank::COUNT];
    for rank in remaining.iter() {
        let mut seen = me.count_of_rank(rank) as i32;
        for (index, player) in players.iter().enumerate() {
            if index != asker {
                seen += player.public_cards_of_rank(rank).len() as i32;
            }
        }
        unknown[rank.index()] = (4 - seen).max(0) as f64;
    }
    let total_unknown: f64 = unknown.iter().sum();

    let mut rank_points = vec![[0f64; Rank::COUNT]; num_players - 1];
    for offset in 1..num_players {
        let target = &players[(asker + offset) % num_players];
        for card in target.concealed_cards().iter() {
            let candidates = target.candidate_ranks(card);
            let restricted: f64 = candidates.iter().map(|rank| unknown[rank.index()]).sum();
            if restricted == 0.0 {
                continue;
            }
            let mut weight = total_unknown / restricted;
            for rank in Rank::ORDERED {
                if let Some(set) = target.possible_set(rank) {
                    if set.contains(card) {
                        weight *= 1.0 - 1.0 / set.len() as f64;
                    }
                }
            }
            for rank in candidates.iter() {
                rank_points[offset - 1][rank.index()] += weight;
            }
        }
    }

    let mut rows = vec![[0f64; Rank::COUNT]; num_players - 1];
    for rank in remaining.iter() {
        let index = rank.index();
        let total_points: f64 = deck_size as f64
            + rank_points.iter().map(|points| points[index]).sum::<f64>();
        let draw_share = if total_points > 0.0 {
            unknown[index] / total_points
        } else {
            0.0
        };
        for offset in 1..num_players {
            let target = &players[(asker + offset) % num_players];
            let public = target.public_cards_of_rank(rank).len() as f64;
            let mut expected = public + rank_points[offset - 1][index] * draw_share;
            if public == 0.0 {
                expected += draw_share;
            }
            expected += me.count_of_rank(rank) as f64;
            rows[offset - 1][index] = expected;
        }
    }

    ExpectationTable { rows }
}

#[cfg(test)]
mod tests {
    use super::expectation_table;
    use crate::knowledge::Player;
    use crate::model::card::Card;
    use crate::model::card_set::CardSet;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    fn player_with(id: usize, cards: &[(Rank, Suit)], public: bool) -> Player {
        let mut player = Player::new(id);
        let set: CardSet = cards
            .iter()
            .map(|&(rank, suit)| Card::new(rank, suit))
            .collect();
        player.receive_cards(set, public).unwrap();
        player
    }

    #[test]
    fn uninformed_opponent_matches_the_closed_form() {
        let players = vec![
            player_with(0, &[(Rank::Ace, Suit::Spades)], false),
            player_with(1, &[(Rank::Five, Suit::Hearts), (Rank::Nine, Suit::Clubs)], false),
        ];
        let deck_size = 52 - 3;

        let table = expectation_table(&players, 0, deck_size);

        // unknown[A] = 3, eleven other live ranks hold 4 each; with no
        // proofs every concealed card weighs 1 toward every rank, so
        // total_points[A] = 49 + 2 = 51 and the expectation is
        // own(1) + 2·(3/51) + 3/51.
        let expected = 1.0 + 3.0 * (3.0 / 51.0);
        assert!((table.expected(1, Rank::Ace) - expected).abs() < 1e-9);
    }

    #[test]
    fn public_cards_raise_the_expectation_floor() {
        let players = vec![
            Player::new(0),
            player_with(1, &[(Rank::Queen, Suit::Hearts), (Rank::Queen, Suit::Clubs)], true),
        ];

        let table = expectation_table(&players, 0, 48);

        assert!(table.expected(1, Rank::Queen) >= 2.0);
        // No deck contribution once the opponent shows the rank publicly.
        let jack = table.expected(1, Rank::Jack);
        assert!(jack < 1.0);
    }

    #[test]
    fn retired_ranks_read_zero() {
        let mut opponent = player_with(
            1,
            &[(Rank::Five, Suit::Hearts), (Rank::Nine, Suit::Clubs)],
            false,
        );
        opponent.mark_book_completed(Rank::Ace).unwrap();
        let mut me = Player::new(0);
        me.mark_book_completed(Rank::Ace).unwrap();
        let players = vec![me, opponent];

        let table = expectation_table(&players, 0, 40);

        assert_eq!(table.expected(1, Rank::Ace), 0.0);
        assert!(table.expected(1, Rank::Five) > 0.0);
    }

    #[test]
    fn exclusion_proofs_shift_mass_toward_other_ranks() {
        let baseline = vec![
            Player::new(0),
            player_with(1, &[(Rank::Five, Suit::Hearts), (Rank::Nine, Suit::Clubs)], false),
        ];
        let informed = {
            let mut opponent =
                player_with(1, &[(Rank::Five, Suit::Hearts), (Rank::Nine, Suit::Clubs)], false);
            // A failed request proved the concealed cards hold no aces.
            opponent.remove_cards_of_rank(Rank::Ace).unwrap();
            vec![Player::new(0), opponent]
        };

        let before = expectation_table(&baseline, 0, 48);
        let after = expectation_table(&informed, 0, 48);

        assert!(after.expected(1, Rank::Ace) < before.expected(1, Rank::Ace));
        assert!(after.expected(1, Rank::Five) > before.expected(1, Rank::Five));
    }
}
