//! Table games that share the slot machine's credit model: video poker,
//! blackjack and single-zero roulette.
//!
//! Each table owns its credits and a seeded RNG; rule evaluation lives in
//! free functions over plain card/pocket values so it can be tested alone.

pub mod blackjack;
pub mod roulette;
pub mod video_poker;

pub const TABLE_STARTING_CREDITS: u64 = 1000;
pub const TABLE_MIN_BET: u64 = 10;
pub const TABLE_MAX_BET: u64 = 100;
pub const TABLE_BET_STEP: u64 = 10;

/// Move a table bet one step up or down within the table limits.
pub fn step_bet(bet: u64, up: bool) -> u64 {
    let next = if up {
        bet.saturating_add(TABLE_BET_STEP)
    } else {
        bet.saturating_sub(TABLE_BET_STEP)
    };
    next.clamp(TABLE_MIN_BET, TABLE_MAX_BET)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bet_steps_stay_in_limits() {
        assert_eq!(step_bet(10, false), 10);
        assert_eq!(step_bet(10, true), 20);
        assert_eq!(step_bet(100, true), 100);
        assert_eq!(step_bet(0, true), 10);
    }
}
