use super::{step_bet, TABLE_MIN_BET, TABLE_STARTING_CREDITS};
use crate::cards::{Card, Rank};
use crate::deck::{Deck, DeckError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{event, Level};

pub const DEALER_STANDS_ON: u32 = 17;

/// Best total for a hand: aces count 11, demoted to 1 one at a time while
/// the total is over 21.
///
/// ```
/// use casino_rs::cards::parse_cards;
/// use casino_rs::games::blackjack::hand_value;
///
/// assert_eq!(hand_value(&parse_cards("As Ad 9c").unwrap()), 21);
/// assert_eq!(hand_value(&parse_cards("Ks Qd 5c").unwrap()), 25);
/// ```
pub fn hand_value(cards: &[Card]) -> u32 {
    let mut total: u32 = cards.iter().map(|c| c.blackjack_value() as u32).sum();
    let mut soft_aces = cards.iter().filter(|c| c.rank() == Rank::Ace).count();
    while total > 21 && soft_aces > 0 {
        total -= 10;
        soft_aces -= 1;
    }
    total
}

/// 21 on exactly two cards.
pub fn is_blackjack(cards: &[Card]) -> bool {
    cards.len() == 2 && hand_value(cards) == 21
}

pub fn is_bust(cards: &[Card]) -> bool {
    hand_value(cards) > 21
}

/// Dealer policy: draw until the total reaches 17.
pub fn play_dealer(hand: &mut Vec<Card>, deck: &mut Deck) -> Result<(), DeckError> {
    while hand_value(hand) < DEALER_STANDS_ON {
        hand.push(deck.draw()?);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Blackjack,
    Win,
    Push,
    Loss,
}

impl Outcome {
    /// Credits returned for `stake`, stake included.
    pub const fn payout(self, stake: u64) -> u64 {
        match self {
            Outcome::Blackjack => stake * 5 / 2,
            Outcome::Win => stake * 2,
            Outcome::Push => stake,
            Outcome::Loss => 0,
        }
    }
}

/// Compare two finished hands. Naturals are handled at the deal.
pub fn settle(player: &[Card], dealer: &[Card]) -> Outcome {
    let p = hand_value(player);
    let d = hand_value(dealer);
    if p > 21 {
        Outcome::Loss
    } else if d > 21 || p > d {
        Outcome::Win
    } else if p == d {
        Outcome::Push
    } else {
        Outcome::Loss
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BlackjackError {
    #[error("insufficient credits: have {credits}, need {needed}")]
    InsufficientCredits { credits: u64, needed: u64 },
    #[error("no round in progress")]
    NotPlaying,
    #[error("a round is already in progress")]
    RoundInProgress,
    #[error("double down needs exactly two cards")]
    CannotDouble,
    #[error(transparent)]
    Deck(#[from] DeckError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlackjackStage {
    Betting,
    PlayerTurn,
    Complete,
}

#[derive(Debug, Clone)]
pub struct Blackjack<R = ChaCha8Rng> {
    rng: R,
    deck: Deck,
    player: Vec<Card>,
    dealer: Vec<Card>,
    bet: u64,
    stake: u64,
    credits: u64,
    stage: BlackjackStage,
    outcome: Option<Outcome>,
}

impl Blackjack<ChaCha8Rng> {
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Blackjack<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            deck: Deck::standard(),
            player: Vec::new(),
            dealer: Vec::new(),
            bet: TABLE_MIN_BET,
            stake: 0,
            credits: TABLE_STARTING_CREDITS,
            stage: BlackjackStage::Betting,
            outcome: None,
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

    /// Amount at risk in the current round (doubles on a double down).
    pub fn stake(&self) -> u64 {
        self.stake
    }

    pub fn stage(&self) -> BlackjackStage {
        self.stage
    }

    pub fn player(&self) -> &[Card] {
        &self.player
    }

    pub fn dealer(&self) -> &[Card] {
        &self.dealer
    }

    /// The dealer card visible during the player's turn.
    pub fn dealer_upcard(&self) -> Option<Card> {
        self.dealer.first().copied()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn adjust_bet(&mut self, up: bool) -> Result<u64, BlackjackError> {
        if self.stage == BlackjackStage::PlayerTurn {
            return Err(BlackjackError::RoundInProgress);
        }
        self.bet = step_bet(self.bet, up);
        Ok(self.bet)
    }

    pub fn deal(&mut self) -> Result<BlackjackStage, BlackjackError> {
        let mut deck = Deck::standard();
        deck.shuffle_with(&mut self.rng);
        self.deal_from(deck)
    }

    /// Two cards each, player first. A natural on either side settles the
    /// round at once.
    pub fn deal_from(&mut self, mut deck: Deck) -> Result<BlackjackStage, BlackjackError> {
        if self.stage == BlackjackStage::PlayerTurn {
            return Err(BlackjackError::RoundInProgress);
        }
        if self.credits < self.bet {
            return Err(BlackjackError::InsufficientCredits {
                credits: self.credits,
                needed: self.bet,
            });
        }
        let player = deck.draw_n(2)?;
        let dealer = deck.draw_n(2)?;

        self.credits -= self.bet;
        self.stake = self.bet;
        self.deck = deck;
        self.player = player;
        self.dealer = dealer;
        self.outcome = None;
        self.stage = BlackjackStage::PlayerTurn;

        match (is_blackjack(&self.player), is_blackjack(&self.dealer)) {
            (true, true) => self.finish(Outcome::Push),
            (true, false) => self.finish(Outcome::Blackjack),
            (false, true) => self.finish(Outcome::Loss),
            (false, false) => {}
        }
        Ok(self.stage)
    }

    pub fn hit(&mut self) -> Result<Card, BlackjackError> {
        self.require_turn()?;
        let card = self.deck.draw()?;
        self.player.push(card);
        if is_bust(&self.player) {
            self.finish(Outcome::Loss);
        }
        Ok(card)
    }

    pub fn stand(&mut self) -> Result<Outcome, BlackjackError> {
        self.require_turn()?;
        play_dealer(&mut self.dealer, &mut self.deck)?;
        let outcome = settle(&self.player, &self.dealer);
        self.finish(outcome);
        Ok(outcome)
    }

    /// Double the stake, take exactly one card, then stand.
    pub fn double_down(&mut self) -> Result<Outcome, BlackjackError> {
        self.require_turn()?;
        if self.player.len() != 2 {
            return Err(BlackjackError::CannotDouble);
        }
        if self.credits < self.bet {
            return Err(BlackjackError::InsufficientCredits {
                credits: self.credits,
                needed: self.bet,
            });
        }
        let card = self.deck.draw()?;
        self.credits -= self.bet;
        self.stake += self.bet;
        self.player.push(card);
        if is_bust(&self.player) {
            self.finish(Outcome::Loss);
            return Ok(Outcome::Loss);
        }
        self.stand()
    }

    fn require_turn(&self) -> Result<(), BlackjackError> {
        if self.stage == BlackjackStage::PlayerTurn {
            Ok(())
        } else {
            Err(BlackjackError::NotPlaying)
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        let paid = outcome.payout(self.stake);
        self.credits += paid;
        self.outcome = Some(outcome);
        self.stage = BlackjackStage::Complete;
        event!(
            Level::DEBUG,
            ?outcome,
            player = hand_value(&self.player),
            dealer = hand_value(&self.dealer),
            paid,
            "blackjack settled"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn stacked(s: &str) -> Deck {
        Deck::stacked(parse_cards(s).unwrap())
    }

    #[test]
    fn aces_demote_one_at_a_time() {
        assert_eq!(hand_value(&parse_cards("As Ad").unwrap()), 12);
        assert_eq!(hand_value(&parse_cards("As 6d").unwrap()), 17);
        assert_eq!(hand_value(&parse_cards("As 6d Kc").unwrap()), 17);
        assert!(is_blackjack(&parse_cards("As Kd").unwrap()));
        assert!(!is_blackjack(&parse_cards("7s 7d 7c").unwrap()));
    }

    #[test]
    fn dealer_draws_to_seventeen() {
        let mut hand = parse_cards("Ts 6d").unwrap();
        let mut deck = stacked("Ac 5h 9s");
        play_dealer(&mut hand, &mut deck).unwrap();
        assert_eq!(hand_value(&hand), 17);
        assert_eq!(hand.len(), 3);
        assert_eq!(deck.len(), 2);
    }

    #[test]
    fn player_natural_pays_three_to_two() {
        let mut bj = Blackjack::seeded(1);
        let stage = bj.deal_from(stacked("As Kd 9c 7h")).unwrap();
        assert_eq!(stage, BlackjackStage::Complete);
        assert_eq!(bj.outcome(), Some(Outcome::Blackjack));
        assert_eq!(bj.credits(), 1000 - 10 + 25);
    }

    #[test]
    fn both_naturals_push() {
        let mut bj = Blackjack::seeded(1);
        bj.deal_from(stacked("As Kd Ah Qc")).unwrap();
        assert_eq!(bj.outcome(), Some(Outcome::Push));
        assert_eq!(bj.credits(), 1000);
    }

    #[test]
    fn stand_beats_dealer_bust() {
        // player 19, dealer 16 then draws a ten
        let mut bj = Blackjack::seeded(1);
        bj.deal_from(stacked("Ts 9d Tc 6h Kd")).unwrap();
        assert_eq!(bj.stand().unwrap(), Outcome::Win);
        assert_eq!(bj.credits(), 1010);
    }

    #[test]
    fn hit_to_bust_loses_immediately() {
        let mut bj = Blackjack::seeded(1);
        bj.deal_from(stacked("Ts 6d 9c 8h Kd")).unwrap();
        bj.hit().unwrap();
        assert_eq!(bj.outcome(), Some(Outcome::Loss));
        assert_eq!(bj.stand(), Err(BlackjackError::NotPlaying));
        assert_eq!(bj.credits(), 990);
    }

    #[test]
    fn double_down_doubles_stake() {
        // player 11 draws a ten; dealer 18 stands
        let mut bj = Blackjack::seeded(1);
        bj.deal_from(stacked("6s 5d Tc 8h Kd")).unwrap();
        assert_eq!(bj.double_down().unwrap(), Outcome::Win);
        assert_eq!(bj.stake(), 20);
        assert_eq!(bj.credits(), 1000 - 20 + 40);
        assert_eq!(bj.player().len(), 3);
    }

    #[test]
    fn double_down_needs_two_cards() {
        let mut bj = Blackjack::seeded(1);
        bj.deal_from(stacked("2s 3d Tc 8h 4d 5c")).unwrap();
        bj.hit().unwrap();
        assert_eq!(bj.double_down(), Err(BlackjackError::CannotDouble));
    }
}
