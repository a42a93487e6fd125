use crate::game::action::{Action, ActionSpace};
use crate::game::dealer::{DealError, Dealer};
use crate::game::estimator::expectation_table;
use crate::game::snapshot::StateSnapshot;
use crate::game::stats::RequestStats;
use crate::knowledge::{KnowledgeError, Player};
use crate::model::card_set::RankSet;
use crate::model::rank::Rank;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    InvalidPlayerCount(usize),
    Deal(DealError),
    Knowledge(KnowledgeError),
}

impl From<DealError> for GameError {
    fn from(error: DealError) -> Self {
        GameError::Deal(error)
    }
}

impl From<KnowledgeError> for GameError {
    fn from(error: KnowledgeError) -> Self {
        GameError::Knowledge(error)
    }
}

/// Payoff schemes read off the terminal (or current) book standings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayoffMode {
    /// Continuous signal: books collected minus the fair share `13 / n`.
    Training,
    /// 100 for a sole leader, 50 for each player tied for the lead.
    Evaluation,
}

/// Turn engine: sequences requests, resolves draw outcomes, propagates
/// knowledge events across players, and exposes the public-state snapshot.
///
/// Players and the dealer are created once per game and mutated only
/// through `step`; the single random source is spent on the shuffle, so a
/// game is fully deterministic given its seed and action sequence.
#[derive(Debug, Clone)]
pub struct Game {
    players: Vec<Player>,
    dealer: Dealer,
    action_space: ActionSpace,
    current_player: usize,
    stats: Option<RequestStats>,
    seed: u64,
}

impl Game {
    pub const MIN_PLAYERS: usize = 2;
    pub const MAX_PLAYERS: usize = 6;

    pub fn new(num_players: usize) -> Result<Self, GameError> {
        Self::with_seed(num_players, rand::random())
    }

    pub fn with_seed(num_players: usize, seed: u64) -> Result<Self, GameError> {
        if !(Self::MIN_PLAYERS..=Self::MAX_PLAYERS).contains(&num_players) {
            return Err(GameError::InvalidPlayerCount(num_players));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut game = Self {
            players: (0..num_players).map(Player::new).collect(),
            dealer: Dealer::shuffled(&mut rng),
            action_space: ActionSpace::new(num_players),
            current_player: 0,
            stats: None,
            seed,
        };

        let hand_size = if num_players >= 4 { 5 } else { 7 };
        for _ in 0..hand_size {
            for seat in 0..num_players {
                let (_, completed) = game.dealer.deal_card(&mut game.players[seat])?;
                game.broadcast_books(seat, completed)?;
            }
        }

        Ok(game)
    }

    /// Attaches the request-statistics capability. The estimator prediction
    /// for every request is then scored against the actual netted count.
    pub fn with_request_stats(mut self) -> Self {
        self.stats = Some(RequestStats::new());
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    pub fn current_player(&self) -> usize {
        self.current_player
    }

    pub fn player(&self, index: usize) -> &Player {
        &self.players[index]
    }

    pub fn deck_size(&self) -> usize {
        self.dealer.remaining()
    }

    pub fn action_space(&self) -> ActionSpace {
        self.action_space
    }

    pub fn request_stats(&self) -> Option<&RequestStats> {
        self.stats.as_ref()
    }

    /// All 13 ranks booked: every card is accounted for and no legal moves
    /// remain.
    pub fn is_over(&self) -> bool {
        self.players
            .iter()
            .any(|player| player.remaining_ranks().is_empty())
    }

    /// Requests the current player may make: any opponent offset crossed
    /// with any rank present in their own hand. Actions outside this
    /// enumeration are rejected here; `step` itself trusts its caller.
    pub fn legal_actions(&self) -> Vec<Action> {
        self.legal_actions_for(self.current_player)
    }

    fn legal_actions_for(&self, seat: usize) -> Vec<Action> {
        let player = &self.players[seat];
        let mut actions = Vec::new();
        for offset in 1..self.players.len() {
            for rank in Rank::ORDERED {
                if player.count_of_rank(rank) > 0 {
                    actions.push(Action::new(offset, rank));
                }
            }
        }
        actions
    }

    /// Resolves one request. The asker keeps the turn when the request nets
    /// cards or when the go-fish draw produces the asked rank; otherwise
    /// the turn passes to the next player still holding cards.
    pub fn step(&mut self, action: Action) -> Result<(StateSnapshot, usize), GameError> {
        let asker = self.current_player;
        let num_players = self.players.len();
        let target = (asker + action.target_offset) % num_players;
        let rank = action.rank;
        debug!(asker, target, rank = %rank, "request");

        let predicted = self.stats.as_ref().map(|_| {
            expectation_table(&self.players, asker, self.dealer.remaining())
                .expected(action.target_offset, rank)
        });

        self.players[asker].mark_rank_as_requested(rank);
        let netted = self.players[target].remove_cards_of_rank(rank)?;

        if let (Some(stats), Some(predicted)) = (self.stats.as_mut(), predicted) {
            stats.record(predicted, netted.len());
        }

        let mut keep_turn = false;
        if !netted.is_empty() {
            debug!(asker, netted = netted.len(), "request netted cards");
            keep_turn = true;
            let completed = self.players[asker].receive_cards(netted, true)?;
            self.broadcast_books(asker, completed)?;
        } else if !self.dealer.is_empty() {
            let (card, completed) = self.dealer.deal_card(&mut self.players[asker])?;
            self.broadcast_books(asker, completed)?;
            if card.rank == rank {
                debug!(asker, card = %card, "fished the asked rank");
                keep_turn = true;
                // The fished card is shown, unless the draw itself just
                // finished the book and stripped it from the hand.
                if !completed.contains(rank) {
                    self.players[asker].reveal_card(card)?;
                }
            }
        }

        // Keeping the turn with an empty hand forces one more draw; with
        // the deck also empty the turn passes regardless.
        if keep_turn && !self.players[asker].has_cards() {
            if self.dealer.is_empty() {
                keep_turn = false;
            } else {
                let (_, completed) = self.dealer.deal_card(&mut self.players[asker])?;
                self.broadcast_books(asker, completed)?;
            }
        }

        if !keep_turn {
            self.advance_turn();
        }

        Ok((self.snapshot(), self.current_player))
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.snapshot_for(self.current_player)
    }

    pub fn snapshot_for(&self, viewer: usize) -> StateSnapshot {
        let viewer_player = &self.players[viewer];
        let table = expectation_table(&self.players, viewer, self.dealer.remaining());

        StateSnapshot {
            current_player: self.current_player,
            legal_actions: self.legal_actions_for(viewer),
            card_counts: self.players.iter().map(Player::hand_len).collect(),
            book_counts: self.players.iter().map(|p| p.books().len()).collect(),
            public_rank_counts: self.players.iter().map(public_counts).collect(),
            possible_rank_counts: self.players.iter().map(possible_counts).collect(),
            not_possible_rank_counts: self.players.iter().map(not_possible_counts).collect(),
            expected_quantities: table.into_rows(),
            remaining_ranks: viewer_player.remaining_ranks(),
            hand: viewer_player.hand().iter().collect(),
            hand_rank_counts: viewer_player.hand_rank_counts(),
            deck_size: self.dealer.remaining(),
        }
    }

    pub fn payoffs(&self, mode: PayoffMode) -> Vec<f64> {
        let num_players = self.players.len();
        match mode {
            PayoffMode::Training => {
                let fair_share = Rank::COUNT as f64 / num_players as f64;
                self.players
                    .iter()
                    .map(|player| player.books().len() as f64 - fair_share)
                    .collect()
            }
            PayoffMode::Evaluation => {
                let top = self
                    .players
                    .iter()
                    .map(|player| player.books().len())
                    .max()
                    .unwrap_or(0);
                let leaders = self
                    .players
                    .iter()
                    .filter(|player| player.books().len() == top)
                    .count();
                self.players
                    .iter()
                    .map(|player| {
                        if player.books().len() == top {
                            if leaders == 1 { 100.0 } else { 50.0 }
                        } else {
                            0.0
                        }
                    })
                    .collect()
            }
        }
    }

    fn broadcast_books(&mut self, owner: usize, completed: RankSet) -> Result<(), GameError> {
        for rank in completed.iter() {
            debug!(player = owner, rank = %rank, "book claimed");
            for (index, other) in self.players.iter_mut().enumerate() {
                if index != owner {
                    other.mark_book_completed(rank)?;
                }
            }
        }
        Ok(())
    }

    fn advance_turn(&mut self) {
        let num_players = self.players.len();
        for step in 1..num_players {
            let candidate = (self.current_player + step) % num_players;
            if self.players[candidate].has_cards() {
                self.current_player = candidate;
                return;
            }
        }
        // Every other hand is empty; the turn stays where it is.
    }
}

fn public_counts(player: &Player) -> [u8; Rank::COUNT] {
    let mut row = [0u8; Rank::COUNT];
    for rank in Rank::ORDERED {
        row[rank.index()] = player.public_cards_of_rank(rank).len() as u8;
    }
    row
}

fn possible_counts(player: &Player) -> [u8; Rank::COUNT] {
    let mut row = [0u8; Rank::COUNT];
    for rank in Rank::ORDERED {
        row[rank.index()] = player.possible_set(rank).map_or(0, |set| set.len() as u8);
    }
    row
}

fn not_possible_counts(player: &Player) -> [u8; Rank::COUNT] {
    let mut row = [0u8; Rank::COUNT];
    for rank in Rank::ORDERED {
        row[rank.index()] = player.not_possible_set(rank).map_or(0, |set| set.len() as u8);
    }
    row
}
