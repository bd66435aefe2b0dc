use casino_rs::cards::{parse_cards, Card, Rank, Suit};
use casino_rs::deck::Deck;
use casino_rs::games::blackjack::{
    hand_value, Blackjack, BlackjackError, BlackjackStage, Outcome,
};
use casino_rs::games::roulette::{settle_bets, Bet, BetTarget, Roulette, RouletteError};
use casino_rs::games::video_poker::{classify, PokerError, PokerHand, PokerStage, VideoPoker};
use proptest::prelude::*;

fn stacked(cards: &str) -> Deck {
    Deck::stacked(parse_cards(cards).unwrap())
}

fn any_card() -> impl Strategy<Value = Card> {
    (0usize..13, 0usize..4).prop_map(|(r, s)| Card::new(Rank::ALL[r], Suit::ALL[s]))
}

proptest! {
    #[test]
    fn aces_soften_only_when_needed(cards in prop::collection::vec(any_card(), 1..8)) {
        let hard: u32 = cards
            .iter()
            .map(|c| if c.rank() == Rank::Ace { 1 } else { c.blackjack_value() as u32 })
            .sum();
        let v = hand_value(&cards);
        prop_assert!(v >= hard);
        if v > 21 {
            prop_assert_eq!(v, hard);
        }
        prop_assert_eq!((v - hard) % 10, 0);
    }

    #[test]
    fn every_non_zero_pocket_splits_even_money_bets(pocket in 1u8..=36) {
        let pairs = [
            (BetTarget::Red, BetTarget::Black),
            (BetTarget::Even, BetTarget::Odd),
            (BetTarget::Low, BetTarget::High),
        ];
        for (a, b) in pairs {
            prop_assert!(a.wins(pocket) != b.wins(pocket));
        }
        let dozens = (1..=3).filter(|&d| BetTarget::Dozen(d).wins(pocket)).count();
        prop_assert_eq!(dozens, 1);
    }

    #[test]
    fn covering_every_number_returns_thirty_six(pocket in 0u8..37) {
        let bets: Vec<Bet> =
            (0..37).map(|n| Bet { target: BetTarget::Straight(n), amount: 1 }).collect();
        prop_assert_eq!(settle_bets(&bets, pocket), 36);
    }

    #[test]
    fn poker_payout_follows_paytable(seed in any::<u64>()) {
        let mut game = VideoPoker::seeded(seed);
        let dealt = game.deal().unwrap();
        prop_assert_eq!(game.credits(), 990);
        let outcome = game.draw().unwrap();
        prop_assert_eq!(outcome.payout, outcome.hand.multiplier() * 10);
        prop_assert_eq!(game.credits(), 990 + outcome.payout);
        prop_assert_eq!(outcome.hand, classify(&outcome.cards));
        // nothing held, so all five were replaced
        for c in dealt {
            prop_assert!(!outcome.cards.contains(&c));
        }
    }
}

#[test]
fn held_pair_improves_to_trips() {
    let mut game = VideoPoker::seeded(0);
    game.deal_from(stacked("As Ad Kc 7h 2s Ah 3d 4c")).unwrap();
    assert_eq!(game.stage(), PokerStage::Dealt);
    assert!(game.toggle_hold(0).unwrap());
    assert!(game.toggle_hold(1).unwrap());
    assert_eq!(game.toggle_hold(5), Err(PokerError::BadPosition(5)));

    let outcome = game.draw().unwrap();
    assert_eq!(outcome.hand, PokerHand::ThreeOfAKind);
    assert_eq!(outcome.payout, 30);
    assert_eq!(game.credits(), 1020);
    assert_eq!(game.draw(), Err(PokerError::NoHand));
}

#[test]
fn poker_needs_credits_for_the_bet() {
    let mut game = VideoPoker::seeded(3).with_credits(5);
    assert_eq!(game.deal(), Err(PokerError::InsufficientCredits { credits: 5, bet: 10 }));
    assert_eq!(game.stage(), PokerStage::Betting);
}

#[test]
fn dealer_stands_on_seventeen() {
    let mut bj = Blackjack::seeded(0);
    let stage = bj.deal_from(stacked("Ts 9h 7c Kd 5s")).unwrap();
    assert_eq!(stage, BlackjackStage::PlayerTurn);
    assert_eq!(bj.credits(), 990);
    assert_eq!(bj.stand(), Ok(Outcome::Win));
    assert_eq!(bj.dealer().len(), 2);
    assert_eq!(bj.credits(), 1010);
}

#[test]
fn natural_pays_three_to_two() {
    let mut bj = Blackjack::seeded(0);
    let stage = bj.deal_from(stacked("As Kd 9c 7h")).unwrap();
    assert_eq!(stage, BlackjackStage::Complete);
    assert_eq!(bj.outcome(), Some(Outcome::Blackjack));
    assert_eq!(bj.credits(), 1015);
    assert_eq!(bj.hit(), Err(BlackjackError::NotPlaying));
}

#[test]
fn double_down_takes_one_card() {
    let mut bj = Blackjack::seeded(0);
    bj.deal_from(stacked("5s 6h 9c 7d Ts 8c")).unwrap();
    assert_eq!(bj.double_down(), Ok(Outcome::Win));
    assert_eq!(bj.player().len(), 3);
    assert_eq!(bj.stake(), 20);
    // dealer 16 drew the eight and bust
    assert_eq!(bj.dealer().len(), 3);
    assert_eq!(bj.credits(), 1020);
}

#[test]
fn player_bust_ends_the_round() {
    let mut bj = Blackjack::seeded(0);
    bj.deal_from(stacked("Ts 6h 9c 8d Kc")).unwrap();
    let card = bj.hit().unwrap();
    assert_eq!(card.rank(), Rank::King);
    assert_eq!(bj.outcome(), Some(Outcome::Loss));
    assert_eq!(bj.stage(), BlackjackStage::Complete);
    assert_eq!(bj.credits(), 990);
    assert_eq!(bj.stand(), Err(BlackjackError::NotPlaying));
}

#[test]
fn roulette_settles_and_clears() {
    let mut table = Roulette::seeded(11);
    table.place(BetTarget::Red).unwrap();
    assert_eq!(table.place_str("red"), Ok(20));
    table.place_str("17").unwrap();
    assert_eq!(table.credits(), 970);
    assert_eq!(table.total_staked(), 30);

    let outcome = table.spin_to(17).unwrap();
    assert_eq!(outcome.staked, 30);
    assert_eq!(outcome.payout, 360);
    assert_eq!(table.credits(), 1330);
    assert!(table.bets().is_empty());
    assert_eq!(table.results().front(), Some(&17));
    assert_eq!(table.spin(), Err(RouletteError::NoBets));
}

#[test]
fn roulette_rejects_bad_input() {
    let mut table = Roulette::seeded(1).with_credits(15);
    assert!(matches!(table.place_str("purple"), Err(RouletteError::UnknownBet(_))));
    table.place(BetTarget::Odd).unwrap();
    assert_eq!(
        table.place(BetTarget::Even),
        Err(RouletteError::InsufficientCredits { credits: 5, chip: 10 })
    );
    assert_eq!(table.spin_to(40), Err(RouletteError::InvalidPocket(40)));
    assert_eq!(table.clear(), 10);
    assert_eq!(table.credits(), 15);
}

#[test]
fn seeded_wheel_stays_on_the_wheel() {
    let mut table = Roulette::seeded(99).with_credits(10_000);
    for _ in 0..50 {
        table.place(BetTarget::Straight(0)).unwrap();
        let outcome = table.spin().unwrap();
        assert!(outcome.pocket < 37);
    }
    assert_eq!(table.results().len(), 10);
}
