//! Slot payout engine.
//!
//! A [`SlotMachine`] draws a grid from weighted rarity pools, scores each
//! [`PayLine`] with wild substitution, and runs a progressive jackpot meter.
//! [`SharedSlotMachine`] puts one engine behind a lock for concurrent callers
//! and [`SlotSession`] keeps a player's credits in front of it.

mod config;
mod engine;
mod grid;
mod paylines;
mod random;
mod session;
mod shared;
mod symbols;

pub use config::{ConfigError, LoadError, MachineConfig, RarityTable};
pub use engine::{SlotMachine, SpinError, SpinResult, WinningLine};
pub use grid::Grid;
pub use paylines::{default_paylines, LineShape, PayLine};
pub use random::{RngSource, SequenceSource, UniformSource};
pub use session::{
    SessionError, SlotSession, SpinRecord, BET_STEP, DEFAULT_BET, HISTORY_LEN, MAX_BET, MIN_BET,
    STARTING_CREDITS, TOP_UP_CREDITS,
};
pub use shared::SharedSlotMachine;
pub use symbols::{default_symbols, Symbol, SymbolKind, SymbolKindParseError};
