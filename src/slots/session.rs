use super::engine::{SlotMachine, SpinError, SpinResult};
use super::random::{RngSource, UniformSource};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{event, Level};

pub const STARTING_CREDITS: f64 = 1000.0;
pub const TOP_UP_CREDITS: f64 = 1000.0;
pub const DEFAULT_BET: u32 = 10;
pub const MIN_BET: u32 = 1;
pub const MAX_BET: u32 = 100;
pub const BET_STEP: u32 = 5;
pub const HISTORY_LEN: usize = 10;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("insufficient credits: have {credits}, bet is {bet}")]
    InsufficientCredits { credits: f64, bet: u32 },
    #[error(transparent)]
    Spin(#[from] SpinError),
}

/// One line of the spin history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinRecord {
    pub number: u64,
    pub bet: u32,
    pub win: f64,
    pub jackpot: bool,
}

/// A player's credit ledger in front of one machine.
///
/// ```
/// use casino_rs::slots::{SlotMachine, SlotSession};
///
/// let mut session = SlotSession::new(SlotMachine::standard(3));
/// let win = session.spin().unwrap().total_win;
/// assert_eq!(session.credits(), 1000.0 - 10.0 + win);
/// assert_eq!(session.history().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SlotSession<S = RngSource<ChaCha8Rng>> {
    machine: SlotMachine<S>,
    credits: f64,
    bet: u32,
    autoplay: bool,
    last_win: f64,
    last_result: Option<SpinResult>,
    history: VecDeque<SpinRecord>,
    spins: u64,
}

impl<S: UniformSource> SlotSession<S> {
    pub fn new(machine: SlotMachine<S>) -> Self {
        Self {
            machine,
            credits: STARTING_CREDITS,
            bet: DEFAULT_BET,
            autoplay: false,
            last_win: 0.0,
            last_result: None,
            history: VecDeque::with_capacity(HISTORY_LEN),
            spins: 0,
        }
    }

    pub fn with_credits(mut self, credits: f64) -> Self {
        self.credits = credits;
        self
    }

    pub fn with_bet(mut self, bet: u32) -> Self {
        self.set_bet(bet);
        self
    }

    pub fn credits(&self) -> f64 {
        self.credits
    }

    pub fn bet(&self) -> u32 {
        self.bet
    }

    /// Set the bet, clamped to the table limits.
    pub fn set_bet(&mut self, bet: u32) {
        self.bet = bet.clamp(MIN_BET, MAX_BET);
    }

    pub fn increase_bet(&mut self) {
        self.set_bet(self.bet.saturating_add(BET_STEP));
    }

    pub fn decrease_bet(&mut self) {
        self.set_bet(self.bet.saturating_sub(BET_STEP));
    }

    pub fn add_credits(&mut self) {
        self.credits += TOP_UP_CREDITS;
        event!(Level::INFO, credits = self.credits, "credits topped up");
    }

    pub fn can_spin(&self) -> bool {
        self.credits >= self.bet as f64
    }

    pub fn autoplay(&self) -> bool {
        self.autoplay
    }

    pub fn set_autoplay(&mut self, on: bool) {
        self.autoplay = on;
    }

    pub fn toggle_autoplay(&mut self) -> bool {
        self.autoplay = !self.autoplay;
        self.autoplay
    }

    pub fn last_win(&self) -> f64 {
        self.last_win
    }

    pub fn last_result(&self) -> Option<&SpinResult> {
        self.last_result.as_ref()
    }

    /// Most recent spins, newest first.
    pub fn history(&self) -> &VecDeque<SpinRecord> {
        &self.history
    }

    pub fn spins(&self) -> u64 {
        self.spins
    }

    pub fn jackpot_value(&self) -> u64 {
        self.machine.jackpot_value()
    }

    pub fn machine(&self) -> &SlotMachine<S> {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut SlotMachine<S> {
        &mut self.machine
    }

    /// Spin at the current bet. The balance changes only if the engine
    /// produced a result; running short turns autoplay off.
    pub fn spin(&mut self) -> Result<&SpinResult, SessionError> {
        if !self.can_spin() {
            self.autoplay = false;
            event!(Level::WARN, credits = self.credits, bet = self.bet, "spin refused");
            return Err(SessionError::InsufficientCredits { credits: self.credits, bet: self.bet });
        }
        let result = match self.machine.spin(self.bet as f64) {
            Ok(r) => r,
            Err(e) => {
                self.autoplay = false;
                return Err(e.into());
            }
        };

        self.spins += 1;
        self.credits = self.credits - self.bet as f64 + result.total_win;
        self.last_win = result.total_win;
        if self.history.len() == HISTORY_LEN {
            self.history.pop_back();
        }
        self.history.push_front(SpinRecord {
            number: self.spins,
            bet: self.bet,
            win: result.total_win,
            jackpot: result.is_jackpot,
        });
        event!(
            Level::DEBUG,
            spin = self.spins,
            bet = self.bet,
            win = result.total_win,
            credits = self.credits,
            "session spin"
        );

        Ok(self.last_result.insert(result))
    }
}
