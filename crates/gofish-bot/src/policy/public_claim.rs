use super::{Policy, PolicyContext};
use gofish_core::game::action::Action;
use gofish_core::model::rank::Rank;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use tracing::debug;

/// Takes what is already on the table: if a held rank is publicly visible
/// in an opponent's hand, request it; otherwise pick a random legal action.
pub struct PublicClaimPolicy {
    rng: SmallRng,
}

impl PublicClaimPolicy {
    pub fn new() -> Self {
        Self::seeded(rand::random())
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for PublicClaimPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for PublicClaimPolicy {
    fn choose_request(&mut self, ctx: &PolicyContext) -> Action {
        let snapshot = ctx.snapshot;
        for rank in Rank::ORDERED {
            if snapshot.hand_rank_counts[rank.index()] == 0 {
                continue;
            }
            for offset in 1..snapshot.card_counts.len() {
                let seat = ctx.target_seat(offset);
                if snapshot.public_rank_counts[seat][rank.index()] > 0 {
                    let action = Action::new(offset, rank);
                    debug!(target: "gofish_bot::policy", %action, "claiming a public rank");
                    return action;
                }
            }
        }

        let action = *snapshot
            .legal_actions
            .choose(&mut self.rng)
            .expect("active player has at least one legal action");
        debug!(target: "gofish_bot::policy", %action, "no public claim, random request");
        action
    }
}

#[cfg(test)]
mod tests {
    use super::PublicClaimPolicy;
    use crate::policy::test_support::{counts, snapshot};
    use crate::policy::{Policy, PolicyContext};
    use gofish_core::game::action::Action;
    use gofish_core::model::rank::Rank;

    #[test]
    fn prefers_a_rank_the_opponent_shows() {
        let mut state = snapshot(3, counts(&[(Rank::Five, 1), (Rank::Jack, 2)]));
        state.public_rank_counts[2][Rank::Jack.index()] = 1;

        let mut policy = PublicClaimPolicy::seeded(0);
        let action = policy.choose_request(&PolicyContext::new(&state));

        assert_eq!(action, Action::new(2, Rank::Jack));
    }

    #[test]
    fn falls_back_to_a_legal_action() {
        let state = snapshot(2, counts(&[(Rank::Five, 1)]));
        let mut policy = PublicClaimPolicy::seeded(7);
        let action = policy.choose_request(&PolicyContext::new(&state));
        assert!(state.legal_actions.contains(&action));
    }

    #[test]
    fn seeded_choices_are_deterministic() {
        let state = snapshot(4, counts(&[(Rank::Two, 1), (Rank::Nine, 1), (Rank::Ace, 1)]));
        let mut first = PublicClaimPolicy::seeded(99);
        let mut second = PublicClaimPolicy::seeded(99);
        for _ in 0..8 {
            let ctx = PolicyContext::new(&state);
            assert_eq!(first.choose_request(&ctx), second.choose_request(&ctx));
        }
    }
}
