use crate::cards::{Card, Rank, Suit};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("deck exhausted")]
    Exhausted,
}

/// A shoe of cards dealt from the top.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Ordered 52-card deck.
    ///
    /// ```
    /// use casino_rs::deck::Deck;
    ///
    /// assert_eq!(Deck::standard().len(), 52);
    /// ```
    pub fn standard() -> Self {
        let cards = Suit::ALL
            .iter()
            .flat_map(|&s| Rank::ALL.iter().map(move |&r| Card::new(r, s)))
            .collect();
        Self { cards }
    }

    /// A shuffled 52-card deck from a ChaCha8 stream seeded with `seed`.
    pub fn shuffled(seed: u64) -> Self {
        let mut deck = Self::standard();
        deck.shuffle_with(&mut ChaCha8Rng::seed_from_u64(seed));
        deck
    }

    /// Stack a deck so `cards[0]` is dealt first. Used for fixtures.
    pub fn stacked(cards: Vec<Card>) -> Self {
        let mut cards = cards;
        cards.reverse();
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn draw(&mut self) -> Result<Card, DeckError> {
        self.cards.pop().ok_or(DeckError::Exhausted)
    }

    /// Draw `n` cards; on failure nothing is removed.
    pub fn draw_n(&mut self, n: usize) -> Result<Vec<Card>, DeckError> {
        if n > self.cards.len() {
            return Err(DeckError::Exhausted);
        }
        let split = self.cards.len() - n;
        let mut drawn = self.cards.split_off(split);
        drawn.reverse();
        Ok(drawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;
    use std::collections::HashSet;

    #[test]
    fn standard_deck_has_unique_cards() {
        let d = Deck::standard();
        let set: HashSet<_> = d.cards.iter().copied().collect();
        assert_eq!(set.len(), 52);
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        assert_eq!(Deck::shuffled(42).cards, Deck::shuffled(42).cards);
        assert_ne!(Deck::shuffled(42).cards, Deck::standard().cards);
    }

    #[test]
    fn stacked_deals_in_order() {
        let cards = parse_cards("As Kd 2c").unwrap();
        let mut d = Deck::stacked(cards.clone());
        assert_eq!(d.draw_n(2).unwrap(), cards[..2].to_vec());
        assert_eq!(d.draw().unwrap(), cards[2]);
        assert_eq!(d.draw(), Err(DeckError::Exhausted));
    }

    #[test]
    fn draw_n_is_all_or_nothing() {
        let mut d = Deck::stacked(parse_cards("As Kd").unwrap());
        assert_eq!(d.draw_n(3), Err(DeckError::Exhausted));
        assert_eq!(d.len(), 2);
    }
}
