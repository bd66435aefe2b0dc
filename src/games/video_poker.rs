use super::{step_bet, TABLE_MIN_BET, TABLE_STARTING_CREDITS};
use crate::cards::{Card, Rank};
use crate::deck::{Deck, DeckError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt;
use tracing::{event, Level};

/// Five-card hand categories, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum PokerHand {
    HighCard,
    Pair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    RoyalFlush,
}

impl PokerHand {
    /// Strongest first, the order a pay table is printed in.
    pub const PAYTABLE: [PokerHand; 10] = [
        PokerHand::RoyalFlush,
        PokerHand::StraightFlush,
        PokerHand::FourOfAKind,
        PokerHand::FullHouse,
        PokerHand::Flush,
        PokerHand::Straight,
        PokerHand::ThreeOfAKind,
        PokerHand::TwoPair,
        PokerHand::Pair,
        PokerHand::HighCard,
    ];

    /// Multiple of the bet returned, stake included.
    pub const fn multiplier(self) -> u64 {
        match self {
            PokerHand::RoyalFlush => 800,
            PokerHand::StraightFlush => 50,
            PokerHand::FourOfAKind => 25,
            PokerHand::FullHouse => 9,
            PokerHand::Flush => 6,
            PokerHand::Straight => 4,
            PokerHand::ThreeOfAKind => 3,
            PokerHand::TwoPair => 2,
            PokerHand::Pair => 1,
            PokerHand::HighCard => 0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PokerHand::RoyalFlush => "Royal Flush",
            PokerHand::StraightFlush => "Straight Flush",
            PokerHand::FourOfAKind => "Four of a Kind",
            PokerHand::FullHouse => "Full House",
            PokerHand::Flush => "Flush",
            PokerHand::Straight => "Straight",
            PokerHand::ThreeOfAKind => "Three of a Kind",
            PokerHand::TwoPair => "Two Pair",
            PokerHand::Pair => "Pair",
            PokerHand::HighCard => "High Card",
        }
    }
}

impl fmt::Display for PokerHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Top rank of a five-card straight, with A-2-3-4-5 topping at Five.
fn straight_top(ranks: &[Rank; 5]) -> Option<Rank> {
    let mut sorted = *ranks;
    sorted.sort_by(|a, b| b.cmp(a));
    if (0..4).all(|i| sorted[i].value() == sorted[i + 1].value() + 1) {
        return Some(sorted[0]);
    }
    if sorted == [Rank::Ace, Rank::Five, Rank::Four, Rank::Three, Rank::Two] {
        return Some(Rank::Five);
    }
    None
}

/// Classify five cards.
///
/// ```
/// use casino_rs::cards::parse_cards;
/// use casino_rs::games::video_poker::{classify, PokerHand};
///
/// let cards: [_; 5] = parse_cards("Ah 2d 3c 4s 5h").unwrap().try_into().unwrap();
/// assert_eq!(classify(&cards), PokerHand::Straight);
/// ```
pub fn classify(cards: &[Card; 5]) -> PokerHand {
    let ranks = cards.map(Card::rank);
    let flush = cards.iter().all(|c| c.suit() == cards[0].suit());
    let straight = straight_top(&ranks);

    let mut counts = [0u8; 15];
    for r in ranks {
        counts[r.value() as usize] += 1;
    }
    let mut groups: Vec<u8> = counts.iter().copied().filter(|&n| n > 0).collect();
    groups.sort_unstable_by(|a, b| b.cmp(a));

    match (straight, flush, groups.as_slice()) {
        (Some(Rank::Ace), true, _) => PokerHand::RoyalFlush,
        (Some(_), true, _) => PokerHand::StraightFlush,
        (_, _, [4, ..]) => PokerHand::FourOfAKind,
        (_, _, [3, 2]) => PokerHand::FullHouse,
        (_, true, _) => PokerHand::Flush,
        (Some(_), _, _) => PokerHand::Straight,
        (_, _, [3, ..]) => PokerHand::ThreeOfAKind,
        (_, _, [2, 2, ..]) => PokerHand::TwoPair,
        (_, _, [2, ..]) => PokerHand::Pair,
        _ => PokerHand::HighCard,
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PokerError {
    #[error("insufficient credits: have {credits}, bet is {bet}")]
    InsufficientCredits { credits: u64, bet: u64 },
    #[error("no hand in play")]
    NoHand,
    #[error("a hand is already in play")]
    HandInPlay,
    #[error("card position {0} is out of range")]
    BadPosition(usize),
    #[error(transparent)]
    Deck(#[from] DeckError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PokerStage {
    Betting,
    Dealt,
    Complete,
}

/// Settled result of one hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PokerOutcome {
    pub cards: [Card; 5],
    pub hand: PokerHand,
    pub bet: u64,
    pub payout: u64,
}

/// A single-hand draw poker machine.
#[derive(Debug, Clone)]
pub struct VideoPoker<R = ChaCha8Rng> {
    rng: R,
    deck: Deck,
    cards: Option<[Card; 5]>,
    held: [bool; 5],
    bet: u64,
    credits: u64,
    stage: PokerStage,
    last: Option<PokerOutcome>,
}

impl VideoPoker<ChaCha8Rng> {
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> VideoPoker<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            deck: Deck::standard(),
            cards: None,
            held: [false; 5],
            bet: TABLE_MIN_BET,
            credits: TABLE_STARTING_CREDITS,
            stage: PokerStage::Betting,
            last: None,
        }
    }

    pub fn with_credits(mut self, credits: u64) -> Self {
        self.credits = credits;
        self
    }

    pub fn credits(&self) -> u64 {
        self.credits
    }

    pub fn bet(&self) -> u64 {
        self.bet
    }

    pub fn stage(&self) -> PokerStage {
        self.stage
    }

    pub fn cards(&self) -> Option<&[Card; 5]> {
        self.cards.as_ref()
    }

    pub fn held(&self) -> [bool; 5] {
        self.held
    }

    pub fn last_outcome(&self) -> Option<&PokerOutcome> {
        self.last.as_ref()
    }

    /// Bets only change between hands.
    pub fn adjust_bet(&mut self, up: bool) -> Result<u64, PokerError> {
        if self.stage == PokerStage::Dealt {
            return Err(PokerError::HandInPlay);
        }
        self.bet = step_bet(self.bet, up);
        Ok(self.bet)
    }

    /// Shuffle a fresh deck and deal five cards.
    pub fn deal(&mut self) -> Result<[Card; 5], PokerError> {
        let mut deck = Deck::standard();
        deck.shuffle_with(&mut self.rng);
        self.deal_from(deck)
    }

    /// Deal from a caller-supplied deck.
    pub fn deal_from(&mut self, mut deck: Deck) -> Result<[Card; 5], PokerError> {
        if self.stage == PokerStage::Dealt {
            return Err(PokerError::HandInPlay);
        }
        if self.credits < self.bet {
            return Err(PokerError::InsufficientCredits { credits: self.credits, bet: self.bet });
        }
        let drawn = deck.draw_n(5)?;
        let cards: [Card; 5] = drawn.try_into().map_err(|_| DeckError::Exhausted)?;

        self.credits -= self.bet;
        self.deck = deck;
        self.cards = Some(cards);
        self.held = [false; 5];
        self.stage = PokerStage::Dealt;
        event!(Level::DEBUG, bet = self.bet, "video poker deal");
        Ok(cards)
    }

    /// Flip the hold flag on one card. Returns the new flag.
    pub fn toggle_hold(&mut self, position: usize) -> Result<bool, PokerError> {
        if self.stage != PokerStage::Dealt {
            return Err(PokerError::NoHand);
        }
        let slot = self.held.get_mut(position).ok_or(PokerError::BadPosition(position))?;
        *slot = !*slot;
        Ok(*slot)
    }

    /// Replace every card not held, then settle.
    pub fn draw(&mut self) -> Result<PokerOutcome, PokerError> {
        let mut cards = match (self.stage, self.cards) {
            (PokerStage::Dealt, Some(c)) => c,
            _ => return Err(PokerError::NoHand),
        };
        let replace = self.held.iter().filter(|&&h| !h).count();
        let mut fresh = self.deck.draw_n(replace)?.into_iter();
        for (card, held) in cards.iter_mut().zip(self.held) {
            if !held {
                if let Some(c) = fresh.next() {
                    *card = c;
                }
            }
        }

        let hand = classify(&cards);
        let payout = hand.multiplier() * self.bet;
        self.credits += payout;
        self.cards = Some(cards);
        self.stage = PokerStage::Complete;
        let outcome = PokerOutcome { cards, hand, bet: self.bet, payout };
        self.last = Some(outcome);
        event!(Level::DEBUG, hand = %hand, payout, credits = self.credits, "video poker settled");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn hand(s: &str) -> [Card; 5] {
        parse_cards(s).unwrap().try_into().unwrap()
    }

    #[test]
    fn classifies_every_category() {
        let cases = [
            ("Ah Kh Qh Jh Th", PokerHand::RoyalFlush),
            ("9s 8s 7s 6s 5s", PokerHand::StraightFlush),
            ("Ad 2d 3d 4d 5d", PokerHand::StraightFlush),
            ("7c 7d 7h 7s 2c", PokerHand::FourOfAKind),
            ("Kc Kd Kh 3s 3c", PokerHand::FullHouse),
            ("2h 9h Jh 4h Kh", PokerHand::Flush),
            ("Tc Jd Qh Ks Ac", PokerHand::Straight),
            ("5c 5d 5h Ks 2c", PokerHand::ThreeOfAKind),
            ("5c 5d Kh Ks 2c", PokerHand::TwoPair),
            ("5c 5d Qh Ks 2c", PokerHand::Pair),
            ("5c 8d Qh Ks 2c", PokerHand::HighCard),
        ];
        for (cards, expected) in cases {
            assert_eq!(classify(&hand(cards)), expected, "{cards}");
        }
    }

    #[test]
    fn wrap_around_is_not_a_straight() {
        assert_eq!(classify(&hand("Qc Kd Ah 2s 3c")), PokerHand::HighCard);
    }

    #[test]
    fn draw_replaces_only_unheld_cards() {
        let deck = Deck::stacked(parse_cards("Ah Ad 3c 8s 9d Ac 4h 5h").unwrap());
        let mut vp = VideoPoker::seeded(1);
        vp.deal_from(deck).unwrap();
        assert_eq!(vp.credits(), 990);
        vp.toggle_hold(0).unwrap();
        vp.toggle_hold(1).unwrap();
        let out = vp.draw().unwrap();
        assert_eq!(out.cards, hand("Ah Ad Ac 4h 5h"));
        assert_eq!(out.hand, PokerHand::ThreeOfAKind);
        assert_eq!(out.payout, 30);
        assert_eq!(vp.credits(), 1020);
        assert_eq!(vp.stage(), PokerStage::Complete);
    }

    #[test]
    fn holds_only_while_dealt() {
        let mut vp = VideoPoker::seeded(2);
        assert_eq!(vp.toggle_hold(0), Err(PokerError::NoHand));
        vp.deal().unwrap();
        assert_eq!(vp.toggle_hold(5), Err(PokerError::BadPosition(5)));
        assert_eq!(vp.deal(), Err(PokerError::HandInPlay));
        assert_eq!(vp.adjust_bet(true), Err(PokerError::HandInPlay));
    }

    #[test]
    fn short_credits_block_the_deal() {
        let mut vp = VideoPoker::seeded(3).with_credits(5);
        assert_eq!(vp.deal(), Err(PokerError::InsufficientCredits { credits: 5, bet: 10 }));
    }
}
