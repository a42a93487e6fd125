use crate::knowledge::{KnowledgeError, Player};
use crate::model::card::Card;
use crate::model::card_set::{CardSet, RankSet};
use crate::model::deck::Deck;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealError {
    /// A draw was attempted against an empty deck. Callers check
    /// `remaining()` first; the engine never recovers from this.
    EmptyDeck,
    Knowledge(KnowledgeError),
}

/// Owns the shuffled draw pile and feeds cards into player hands.
#[derive(Debug, Clone)]
pub struct Dealer {
    deck: Deck,
}

impl Dealer {
    pub fn new(deck: Deck) -> Self {
        Self { deck }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(Deck::shuffled(rng))
    }

    pub fn remaining(&self) -> usize {
        self.deck.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }

    /// Pops the top card into the player's concealed hand, forwarding any
    /// completed-book event the receipt produced.
    pub fn deal_card(&mut self, player: &mut Player) -> Result<(Card, RankSet), DealError> {
        let card = self.deck.draw().ok_or(DealError::EmptyDeck)?;
        let completed = player
            .receive_cards(CardSet::single(card), false)
            .map_err(DealError::Knowledge)?;
        Ok((card, completed))
    }
}

#[cfg(test)]
mod tests {
    use super::{DealError, Dealer};
    use crate::knowledge::Player;
    use crate::model::deck::Deck;

    #[test]
    fn dealing_moves_the_top_card_into_the_hand() {
        let deck = Deck::shuffled_with_seed(11);
        let top = *deck.cards().last().expect("full deck");
        let mut dealer = Dealer::new(deck);
        let mut player = Player::new(0);

        let (card, completed) = dealer.deal_card(&mut player).unwrap();

        assert_eq!(card, top);
        assert!(completed.is_empty());
        assert_eq!(dealer.remaining(), 51);
        assert!(player.hand().contains(card));
        assert!(player.concealed_cards().contains(card));
    }

    #[test]
    fn dealing_from_an_empty_deck_fails() {
        let mut deck = Deck::standard();
        while deck.draw().is_some() {}
        let mut dealer = Dealer::new(deck);
        let mut player = Player::new(0);

        assert_eq!(dealer.deal_card(&mut player), Err(DealError::EmptyDeck));
    }
}
