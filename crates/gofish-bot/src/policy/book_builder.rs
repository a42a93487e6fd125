use super::{Policy, PolicyContext};
use gofish_core::game::action::Action;
use gofish_core::model::rank::Rank;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Chases books from public information: complete a book outright when the
/// table shows one, otherwise press the rank own observers already know
/// the most about, otherwise the most-held rank, against a random opponent.
pub struct BookBuilderPolicy {
    rng: SmallRng,
}

impl BookBuilderPolicy {
    pub fn new() -> Self {
        Self::seeded(rand::random())
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    fn random_offset(&mut self, num_players: usize) -> usize {
        self.rng.gen_range(1..num_players)
    }
}

impl Default for BookBuilderPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for BookBuilderPolicy {
    fn choose_request(&mut self, ctx: &PolicyContext) -> Action {
        let snapshot = ctx.snapshot;
        let num_players = snapshot.card_counts.len();
        let viewer = snapshot.current_player;

        // A held rank plus an opponent's public cards making four wins the
        // book immediately.
        for rank in Rank::ORDERED {
            let held = snapshot.hand_rank_counts[rank.index()];
            if held == 0 {
                continue;
            }
            for offset in 1..num_players {
                let seat = ctx.target_seat(offset);
                let shown = snapshot.public_rank_counts[seat][rank.index()];
                if shown > 0 && shown + held == 4 {
                    let action = Action::new(offset, rank);
                    debug!(target: "gofish_bot::policy", %action, "completing a book");
                    return action;
                }
            }
        }

        // Press the rank observers already know we hold the most of.
        for quantity in (1..=3u8).rev() {
            let ranks: Vec<Rank> = Rank::ORDERED
                .into_iter()
                .filter(|rank| snapshot.public_rank_counts[viewer][rank.index()] == quantity)
                .collect();
            if let Some(&rank) = ranks.choose(&mut self.rng) {
                let action = Action::new(self.random_offset(num_players), rank);
                debug!(target: "gofish_bot::policy", %action, "pressing a public rank");
                return action;
            }
        }

        // Otherwise ask for the most-held rank.
        for quantity in (1..=3u8).rev() {
            let ranks: Vec<Rank> = Rank::ORDERED
                .into_iter()
                .filter(|rank| snapshot.hand_rank_counts[rank.index()] == quantity)
                .collect();
            if let Some(&rank) = ranks.choose(&mut self.rng) {
                let action = Action::new(self.random_offset(num_players), rank);
                debug!(target: "gofish_bot::policy", %action, "asking for the deepest rank");
                return action;
            }
        }

        *snapshot
            .legal_actions
            .first()
            .expect("active player has at least one legal action")
    }
}

#[cfg(test)]
mod tests {
    use super::BookBuilderPolicy;
    use crate::policy::test_support::{counts, snapshot};
    use crate::policy::{Policy, PolicyContext};
    use gofish_core::game::action::Action;
    use gofish_core::model::rank::Rank;

    #[test]
    fn completes_a_visible_book() {
        let mut state = snapshot(3, counts(&[(Rank::Nine, 3), (Rank::Two, 1)]));
        state.public_rank_counts[1][Rank::Nine.index()] = 1;

        let mut policy = BookBuilderPolicy::seeded(1);
        let action = policy.choose_request(&PolicyContext::new(&state));

        assert_eq!(action, Action::new(1, Rank::Nine));
    }

    #[test]
    fn presses_own_most_public_rank() {
        let mut state = snapshot(2, counts(&[(Rank::Five, 2), (Rank::King, 1)]));
        // Observers know about two fives but only one king.
        state.public_rank_counts[0][Rank::Five.index()] = 2;
        state.public_rank_counts[0][Rank::King.index()] = 1;

        let mut policy = BookBuilderPolicy::seeded(4);
        let action = policy.choose_request(&PolicyContext::new(&state));

        assert_eq!(action.rank, Rank::Five);
        assert_eq!(action.target_offset, 1);
    }

    #[test]
    fn falls_back_to_the_deepest_held_rank() {
        let state = snapshot(2, counts(&[(Rank::Queen, 3), (Rank::Two, 1)]));
        let mut policy = BookBuilderPolicy::seeded(2);
        let action = policy.choose_request(&PolicyContext::new(&state));
        assert_eq!(action.rank, Rank::Queen);
    }
}
