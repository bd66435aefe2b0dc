use super::{step_bet, TABLE_MIN_BET, TABLE_STARTING_CREDITS};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use tracing::{event, Level};

pub const POCKETS: u8 = 37;
pub const RESULT_HISTORY: usize = 10;

const RED: [u8; 18] = [1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PocketColour {
    Green,
    Red,
    Black,
}

/// Colour of a single-zero wheel pocket. Numbers above 36 are not pockets.
pub fn pocket_colour(n: u8) -> Option<PocketColour> {
    match n {
        0 => Some(PocketColour::Green),
        1..=36 if RED.contains(&n) => Some(PocketColour::Red),
        1..=36 => Some(PocketColour::Black),
        _ => None,
    }
}

/// What a bet covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BetTarget {
    Straight(u8),
    Red,
    Black,
    Even,
    Odd,
    Low,
    High,
    /// First, second or third dozen (1..=3).
    Dozen(u8),
}

impl BetTarget {
    /// Multiple of the stake returned on a win, stake included.
    pub const fn multiplier(self) -> u64 {
        match self {
            BetTarget::Straight(_) => 36,
            BetTarget::Dozen(_) => 3,
            _ => 2,
        }
    }

    /// Zero only pays a straight bet on zero.
    pub fn wins(self, pocket: u8) -> bool {
        if pocket == 0 {
            return self == BetTarget::Straight(0);
        }
        match self {
            BetTarget::Straight(n) => n == pocket,
            BetTarget::Red => pocket_colour(pocket) == Some(PocketColour::Red),
            BetTarget::Black => pocket_colour(pocket) == Some(PocketColour::Black),
            BetTarget::Even => pocket % 2 == 0,
            BetTarget::Odd => pocket % 2 == 1,
            BetTarget::Low => (1..=18).contains(&pocket),
            BetTarget::High => (19..=36).contains(&pocket),
            BetTarget::Dozen(d @ 1..=3) => (1 + (d - 1) * 12..=d * 12).contains(&pocket),
            BetTarget::Dozen(_) => false,
        }
    }
}

impl fmt::Display for BetTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetTarget::Straight(n) => write!(f, "{n}"),
            BetTarget::Red => f.write_str("red"),
            BetTarget::Black => f.write_str("black"),
            BetTarget::Even => f.write_str("even"),
            BetTarget::Odd => f.write_str("odd"),
            BetTarget::Low => f.write_str("low"),
            BetTarget::High => f.write_str("high"),
            BetTarget::Dozen(1) => f.write_str("1st12"),
            BetTarget::Dozen(2) => f.write_str("2nd12"),
            BetTarget::Dozen(d) => write!(f, "{d}rd12"),
        }
    }
}

impl FromStr for BetTarget {
    type Err = RouletteError;

    /// ```
    /// use casino_rs::games::roulette::BetTarget;
    ///
    /// assert_eq!("red".parse::<BetTarget>(), Ok(BetTarget::Red));
    /// assert_eq!("2nd12".parse::<BetTarget>(), Ok(BetTarget::Dozen(2)));
    /// assert_eq!("17".parse::<BetTarget>(), Ok(BetTarget::Straight(17)));
    /// assert!("37".parse::<BetTarget>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim().to_ascii_lowercase();
        let target = match t.as_str() {
            "red" => BetTarget::Red,
            "black" => BetTarget::Black,
            "even" => BetTarget::Even,
            "odd" => BetTarget::Odd,
            "low" | "1-18" => BetTarget::Low,
            "high" | "19-36" => BetTarget::High,
            "1st12" | "1-12" => BetTarget::Dozen(1),
            "2nd12" | "13-24" => BetTarget::Dozen(2),
            "3rd12" | "25-36" => BetTarget::Dozen(3),
            n => match n.parse::<u8>() {
                Ok(n) if n < POCKETS => BetTarget::Straight(n),
                _ => return Err(RouletteError::UnknownBet(s.to_string())),
            },
        };
        Ok(target)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bet {
    pub target: BetTarget,
    pub amount: u64,
}

/// Total returned by `bets` when the ball lands on `pocket`.
pub fn settle_bets(bets: &[Bet], pocket: u8) -> u64 {
    bets.iter()
        .filter(|b| b.target.wins(pocket))
        .map(|b| b.amount * b.target.multiplier())
        .sum()
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RouletteError {
    #[error("unknown bet: '{0}'")]
    UnknownBet(String),
    #[error("insufficient credits: have {credits}, chip is {chip}")]
    InsufficientCredits { credits: u64, chip: u64 },
    #[error("no bets placed")]
    NoBets,
    #[error("{0} is not a pocket on a single-zero wheel")]
    InvalidPocket(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouletteOutcome {
    pub pocket: u8,
    pub colour: PocketColour,
    pub staked: u64,
    pub payout: u64,
}

/// A single-zero table. Chips are debited as bets are placed.
#[derive(Debug, Clone)]
pub struct Roulette<R = ChaCha8Rng> {
    rng: R,
    chip: u64,
    credits: u64,
    bets: Vec<Bet>,
    results: VecDeque<u8>,
}

impl Roulette<ChaCha8Rng> {
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Roulette<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            chip: TABLE_MIN_BET,
            credits: TABLE_STARTING_CREDITS,
            bets: Vec::new(),
            results: VecDeque::with_capacity(RESULT_HISTORY),
        }
    }

    pub fn with_credits(mut self, credits: u64) -> Self {
        self.credits = credits;
        self
    }

    pub fn credits(&self) -> u64 {
        self.credits
    }

    pub fn chip(&self) -> u64 {
        self.chip
    }

    pub fn adjust_chip(&mut self, up: bool) -> u64 {
        self.chip = step_bet(self.chip, up);
        self.chip
    }

    pub fn bets(&self) -> &[Bet] {
        &self.bets
    }

    pub fn total_staked(&self) -> u64 {
        self.bets.iter().map(|b| b.amount).sum()
    }

    /// Last results, newest first.
    pub fn results(&self) -> &VecDeque<u8> {
        &self.results
    }

    /// Put one chip on `target`. Repeated bets on a target stack.
    pub fn place(&mut self, target: BetTarget) -> Result<u64, RouletteError> {
        if self.credits < self.chip {
            return Err(RouletteError::InsufficientCredits {
                credits: self.credits,
                chip: self.chip,
            });
        }
        self.credits -= self.chip;
        let amount = match self.bets.iter_mut().find(|b| b.target == target) {
            Some(b) => {
                b.amount += self.chip;
                b.amount
            }
            None => {
                self.bets.push(Bet { target, amount: self.chip });
                self.chip
            }
        };
        Ok(amount)
    }

    pub fn place_str(&mut self, target: &str) -> Result<u64, RouletteError> {
        self.place(target.parse()?)
    }

    /// Take every bet back.
    pub fn clear(&mut self) -> u64 {
        let refund = self.total_staked();
        self.credits += refund;
        self.bets.clear();
        refund
    }

    pub fn spin(&mut self) -> Result<RouletteOutcome, RouletteError> {
        let pocket = self.rng.random_range(0..POCKETS);
        self.spin_to(pocket)
    }

    /// Settle the table as if the ball landed on `pocket`.
    pub fn spin_to(&mut self, pocket: u8) -> Result<RouletteOutcome, RouletteError> {
        if self.bets.is_empty() {
            return Err(RouletteError::NoBets);
        }
        let colour = pocket_colour(pocket).ok_or(RouletteError::InvalidPocket(pocket))?;
        let staked = self.total_staked();
        let payout = settle_bets(&self.bets, pocket);
        self.credits += payout;
        self.bets.clear();
        if self.results.len() == RESULT_HISTORY {
            self.results.pop_back();
        }
        self.results.push_front(pocket);
        event!(Level::DEBUG, pocket, staked, payout, credits = self.credits, "roulette settled");
        Ok(RouletteOutcome { pocket, colour, staked, payout })
    }
}
