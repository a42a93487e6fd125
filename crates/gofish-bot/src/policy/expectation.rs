use super::{Policy, PolicyContext};
use gofish_core::game::action::Action;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use tracing::debug;

/// Greedy consumer of the expected-value table: requests the
/// (opponent, rank) pair with the highest expected quantity, breaking ties
/// at random.
pub struct ExpectationPolicy {
    rng: SmallRng,
}

impl ExpectationPolicy {
    pub fn new() -> Self {
        Self::seeded(rand::random())
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for ExpectationPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for ExpectationPolicy {
    fn choose_request(&mut self, ctx: &PolicyContext) -> Action {
        let snapshot = ctx.snapshot;
        let mut top_actions: Vec<Action> = Vec::new();
        let mut top_value = f64::NEG_INFINITY;

        for &action in &snapshot.legal_actions {
            let expected =
                snapshot.expected_quantities[action.target_offset - 1][action.rank.index()];
            if expected > top_value {
                top_actions.clear();
                top_value = expected;
            }
            if expected == top_value {
                top_actions.push(action);
            }
        }

        let action = *top_actions
            .choose(&mut self.rng)
            .expect("active player has at least one legal action");
        debug!(
            target: "gofish_bot::policy",
            %action,
            expected = top_value,
            "request with the best expectation"
        );
        action
    }
}

#[cfg(test)]
mod tests {
    use super::ExpectationPolicy;
    use crate::policy::test_support::{counts, snapshot};
    use crate::policy::{Policy, PolicyContext};
    use gofish_core::game::action::Action;
    use gofish_core::game::engine::Game;
    use gofish_core::model::rank::Rank;

    #[test]
    fn picks_the_highest_expected_quantity() {
        let mut state = snapshot(3, counts(&[(Rank::Five, 1), (Rank::Jack, 1)]));
        state.expected_quantities[0][Rank::Five.index()] = 1.1;
        state.expected_quantities[1][Rank::Jack.index()] = 2.4;
        state.expected_quantities[0][Rank::Jack.index()] = 1.9;

        let mut policy = ExpectationPolicy::seeded(0);
        let action = policy.choose_request(&PolicyContext::new(&state));

        assert_eq!(action, Action::new(2, Rank::Jack));
    }

    #[test]
    fn ties_are_broken_within_the_top_set() {
        let mut state = snapshot(3, counts(&[(Rank::Five, 1)]));
        state.expected_quantities[0][Rank::Five.index()] = 1.5;
        state.expected_quantities[1][Rank::Five.index()] = 1.5;

        let mut policy = ExpectationPolicy::seeded(3);
        for _ in 0..8 {
            let action = policy.choose_request(&PolicyContext::new(&state));
            assert_eq!(action.rank, Rank::Five);
        }
    }

    #[test]
    fn drives_a_live_game_snapshot() {
        let game = Game::with_seed(2, 12).unwrap();
        let state = game.snapshot();
        let mut policy = ExpectationPolicy::seeded(5);
        let action = policy.choose_request(&PolicyContext::new(&state));
        assert!(state.legal_actions.contains(&action));
    }
}
