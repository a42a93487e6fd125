//! Per-player knowledge tracker and deduction fixpoint.

use crate::model::card::Card;
use crate::model::card_set::{CardSet, RankSet};
use crate::model::rank::Rank;
use tracing::trace;

/// Caller-sequencing bugs surfaced by the tracker. These are fatal for the
/// game in progress; callers propagate them and never retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnowledgeError {
    CardNotConcealed(Card),
    RankAlreadyRetired(Rank),
    ProvenRankContradiction { card: Card, rank: Rank },
}

/// A player's hand together with everything observers can deduce about it.
///
/// Three overlapping set structures are kept per rank: the public bucket
/// (cards whose rank every observer knows), the possible-set (at least one
/// member of this concealed set has the rank) and the not-possible-set (no
/// member of this set has the rank). All membership is index-based over the
/// stable card-id space, so no bucket ever aliases another.
#[derive(Debug, Clone)]
pub struct Player {
    id: usize,
    hand: CardSet,
    hand_by_rank: [u8; Rank::COUNT],
    concealed: CardSet,
    public_cards: [CardSet; Rank::COUNT],
    possible: [Option<CardSet>; Rank::COUNT],
    not_possible: [Option<CardSet>; Rank::COUNT],
    books: RankSet,
    remaining_ranks: RankSet,
}

impl Player {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            hand: CardSet::EMPTY,
            hand_by_rank: [0; Rank::COUNT],
            concealed: CardSet::EMPTY,
            public_cards: [CardSet::EMPTY; Rank::COUNT],
            possible: [None; Rank::COUNT],
            not_possible: [None; Rank::COUNT],
            books: RankSet::EMPTY,
            remaining_ranks: RankSet::all(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn hand(&self) -> CardSet {
        self.hand
    }

    pub fn hand_len(&self) -> usize {
        self.hand.len()
    }

    pub fn has_cards(&self) -> bool {
        !self.hand.is_empty()
    }

    pub fn hand_rank_counts(&self) -> [u8; Rank::COUNT] {
        self.hand_by_rank
    }

    pub fn count_of_rank(&self, rank: Rank) -> u8 {
        self.hand_by_rank[rank.index()]
    }

    pub fn concealed_cards(&self) -> CardSet {
        self.concealed
    }

    pub fn public_cards_of_rank(&self, rank: Rank) -> CardSet {
        self.public_cards[rank.index()]
    }

    pub fn possible_set(&self, rank: Rank) -> Option<CardSet> {
        self.possible[rank.index()]
    }

    pub fn not_possible_set(&self, rank: Rank) -> Option<CardSet> {
        self.not_possible[rank.index()]
    }

    pub fn books(&self) -> RankSet {
        self.books
    }

    pub fn remaining_ranks(&self) -> RankSet {
        self.remaining_ranks
    }

    /// Ranks this card could still be, given the proofs recorded so far.
    pub fn candidate_ranks(&self, card: Card) -> RankSet {
        let mut candidates = self.remaining_ranks;
        for rank in Rank::ORDERED {
            if let Some(set) = self.not_possible[rank.index()] {
                if set.contains(card) {
                    candidates.remove(rank);
                }
            }
        }
        candidates
    }

    /// Adds cards to the hand (revealing each immediately when `public`) and
    /// extracts every rank whose count reached four as a completed book.
    /// Returns the newly completed ranks so the game can broadcast them.
    pub fn receive_cards(&mut self, cards: CardSet, public: bool) -> Result<RankSet, KnowledgeError> {
        for card in cards.iter() {
            trace!(player = self.id, card = %card, public, "receiving card");
            self.add_card_to_hand(card);
            if public {
                self.reveal_card(card)?;
            }
        }

        let mut completed = RankSet::EMPTY;
        for rank in Rank::ORDERED {
            if self.hand_by_rank[rank.index()] == 4 {
                trace!(player = self.id, rank = %rank, "completed a book");
                self.books.insert(rank);
                completed.insert(rank);
                self.mark_book_completed(rank)?;
            }
        }

        Ok(completed)
    }

    /// Surrenders every card of `rank` (this player was the target of a
    /// request) and records the exhaustive-search proof: none of the cards
    /// left concealed can be of `rank`.
    pub fn remove_cards_of_rank(&mut self, rank: Rank) -> Result<CardSet, KnowledgeError> {
        let removed = self.clean_up_rank(rank);

        let survivors = self.concealed;
        for card in survivors.iter() {
            if card.rank == rank {
                return Err(KnowledgeError::ProvenRankContradiction { card, rank });
            }
        }
        trace!(
            player = self.id,
            rank = %rank,
            survivors = survivors.len(),
            "marking concealed cards as not of rank"
        );
        self.not_possible[rank.index()] = Some(survivors);

        self.settle();
        Ok(removed)
    }

    /// Records that this player asked for `rank`: at least one of their
    /// concealed cards is of interest in it. No-op when the rank is already
    /// public or already hypothesized for this player.
    pub fn mark_rank_as_requested(&mut self, rank: Rank) {
        let index = rank.index();
        if self.possible[index].is_some() || !self.public_cards[index].is_empty() {
            return;
        }

        let mut candidates = self.concealed;
        if let Some(excluded) = self.not_possible[index] {
            candidates = candidates.difference(excluded);
        }
        trace!(
            player = self.id,
            rank = %rank,
            candidates = candidates.len(),
            "request commits a possible-set"
        );
        self.possible[index] = Some(candidates);

        self.settle();
    }

    /// Moves a concealed card into its rank's public bucket.
    pub fn reveal_card(&mut self, card: Card) -> Result<(), KnowledgeError> {
        if !self.concealed.contains(card) {
            return Err(KnowledgeError::CardNotConcealed(card));
        }
        self.drain_reveals(vec![card]);
        self.settle();
        Ok(())
    }

    /// Retires a rank claimed as a book (by this player or any other):
    /// removes it from the ranks in play and purges every knowledge-bucket
    /// entry for it. Hypotheses about an exhausted rank are meaningless.
    pub fn mark_book_completed(&mut self, rank: Rank) -> Result<(), KnowledgeError> {
        if !self.remaining_ranks.remove(rank) {
            return Err(KnowledgeError::RankAlreadyRetired(rank));
        }
        let _ = self.clean_up_rank(rank);
        self.settle();
        Ok(())
    }

    fn add_card_to_hand(&mut self, card: Card) {
        self.hand.insert(card);
        self.concealed.insert(card);
        self.hand_by_rank[card.rank.index()] += 1;
    }

    fn remove_card_from_hand(&mut self, card: Card) {
        self.hand.remove(card);
        self.concealed.remove(card);
        let count = &mut self.hand_by_rank[card.rank.index()];
        *count = count.saturating_sub(1);
    }

    /// Removes every record of `rank`: the public bucket, both hypothesis
    /// sets, and all cards of the rank still in the hand. Returns the
    /// removed cards.
    fn clean_up_rank(&mut self, rank: Rank) -> CardSet {
        let index = rank.index();
        self.public_cards[index] = CardSet::EMPTY;
        self.possible[index] = None;
        self.not_possible[index] = None;

        let mut removed = CardSet::EMPTY;
        for card in self.hand.iter() {
            if card.rank == rank {
                self.remove_card_from_hand(card);
                removed.insert(card);
            }
        }

        let mut queue = Vec::new();
        for card in removed.iter() {
            self.scrub_card(card, &mut queue);
        }
        self.drain_reveals(queue);

        removed
    }

    /// Worklist form of "reveal, which may trigger more reveals": each
    /// processed card is promoted to public and scrubbed from the hypothesis
    /// sets, which may queue further singletons. Never recursive.
    fn drain_reveals(&mut self, mut queue: Vec<Card>) {
        while let Some(card) = queue.pop() {
            if !self.concealed.contains(card) {
                continue;
            }
            self.promote_to_public(card, &mut queue);
        }
    }

    fn promote_to_public(&mut self, card: Card, queue: &mut Vec<Card>) {
        let index = card.rank.index();
        trace!(player = self.id, card = %card, "revealing card");
        self.concealed.remove(card);
        self.public_cards[index].insert(card);

        // The hypothesis for the card's own rank is satisfied outright.
        if let Some(set) = self.possible[index] {
            if set.contains(card) {
                self.possible[index] = None;
            }
        }

        self.scrub_card(card, queue);
    }

    /// Removes `card` from every hypothesis set. A possible-set reduced to a
    /// single member is resolved by queueing that member; one reduced to
    /// nothing was a falsified hypothesis and is discarded. Empty
    /// not-possible entries are dropped.
    fn scrub_card(&mut self, card: Card, queue: &mut Vec<Card>) {
        for rank in Rank::ORDERED {
            let index = rank.index();
            if let Some(set) = self.possible[index] {
                let mut set = set;
                set.remove(card);
                if let Some(last) = set.sole_member() {
                    self.possible[index] = None;
                    queue.push(last);
                } else if set.is_empty() {
                    self.possible[index] = None;
                } else {
                    self.possible[index] = Some(set);
                }
            }
            if let Some(set) = self.not_possible[index] {
                let mut set = set;
                set.remove(card);
                self.not_possible[index] = if set.is_empty() { None } else { Some(set) };
            }
        }
    }

    /// Deduction fixpoint: repeats the elimination and matching-pool rules
    /// until a full pass produces no new reveal. Each continuing pass
    /// shrinks the concealed set, so the pass count is bounded by the
    /// concealed-card count.
    fn settle(&mut self) {
        let bound = self.concealed.len() + 1;
        for _ in 0..bound {
            let mut to_reveal = CardSet::EMPTY;

            // Elimination by exhaustion: a concealed card that can only be
            // one remaining rank is forced.
            for card in self.concealed.iter() {
                if self.candidate_ranks(card).sole_member().is_some() {
                    to_reveal.insert(card);
                }
            }

            // Matching-pool counting: k ranks sharing an identical k-card
            // possible-set exhaust that pool between them.
            let sets: Vec<CardSet> = self.possible.iter().flatten().copied().collect();
            for set in &sets {
                let size = set.len();
                if size == 0 {
                    continue;
                }
                let matching = sets.iter().filter(|other| *other == set).count();
                if matching >= size {
                    to_reveal = to_reveal.union(*set);
                }
            }

            let fresh = to_reveal.intersection(self.concealed);
            if fresh.is_empty() {
                break;
            }
            trace!(player = self.id, reveals = fresh.len(), "deduction pass forced reveals");
            self.drain_reveals(fresh.iter().collect());
        }
    }
}
