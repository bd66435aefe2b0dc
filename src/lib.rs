//! casino-rs: slot payout engine with a progressive jackpot
//!
//! - [`slots`]: weighted grid generation, payline evaluation with wilds,
//!   progressive meter, a lock-guarded shared handle and a credit session
//! - [`games`]: video poker, blackjack and single-zero roulette rules
//! - [`tui`]: a Ratatui slot machine
//!
//! Every random draw goes through an injected source, so seeded or scripted
//! sources make spins reproducible.
//!
//! ## Quick start: a scripted spin
//! ```
//! use casino_rs::slots::{MachineConfig, SequenceSource, SlotMachine};
//!
//! // every cell draws the common pool's first symbol (cherry)
//! let source = SequenceSource::cycle(vec![0.5, 0.0]);
//! let mut machine = SlotMachine::new(MachineConfig::default(), source).unwrap();
//!
//! let result = machine.spin(10.0).unwrap();
//! assert_eq!(result.winning_lines.len(), 9);
//! assert_eq!(result.total_win, 375.0);
//! assert_eq!(machine.jackpot_value(), 1001);
//! ```
//!
//! ## TUI
//! Run the interactive slot machine with:
//! ```sh
//! cargo run --bin casino-rs [machine.json]
//! ```

pub mod cards;
pub mod deck;
pub mod games;
pub mod slots;
pub mod tui;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
