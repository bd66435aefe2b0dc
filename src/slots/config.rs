use super::paylines::{default_paylines, PayLine};
use super::symbols::{default_symbols, Symbol};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Pool probabilities for the per-cell rarity draw. The common pool takes
/// whatever probability mass is left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RarityTable {
    /// Jackpot-class symbols.
    pub jackpot: f64,
    /// Every other special symbol (wild, scatter).
    pub special: f64,
    /// Regular symbols whose value is at least `high_value_threshold`.
    pub high_value: f64,
    pub high_value_threshold: u32,
}

impl Default for RarityTable {
    fn default() -> Self {
        Self { jackpot: 0.03, special: 0.07, high_value: 0.30, high_value_threshold: 30 }
    }
}

impl RarityTable {
    /// Cumulative cut points: `[jackpot, +special, +high_value]`.
    pub fn thresholds(&self) -> [f64; 3] {
        let a = self.jackpot;
        let b = a + self.special;
        [a, b, b + self.high_value]
    }

    pub fn common(&self) -> f64 {
        1.0 - self.thresholds()[2]
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, p) in
            [("jackpot", self.jackpot), ("special", self.special), ("high_value", self.high_value)]
        {
            if !p.is_finite() || p < 0.0 {
                return Err(ConfigError::InvalidRarity { pool: name, value: p });
            }
        }
        let total = self.thresholds()[2];
        if total > 1.0 + f64::EPSILON {
            return Err(ConfigError::RarityOverflow(total));
        }
        Ok(())
    }
}

/// Construction parameters for [`SlotMachine`](super::SlotMachine).
///
/// Every field has a default, and a JSON file may give any subset of them.
///
/// ```
/// use casino_rs::slots::MachineConfig;
///
/// let cfg = MachineConfig::from_json_str(r#"{ "initial_jackpot": 5000 }"#).unwrap();
/// assert_eq!(cfg.initial_jackpot, 5000);
/// assert_eq!(cfg.rows, 3);
/// assert_eq!(cfg.paylines.len(), 9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub rows: usize,
    pub cols: usize,
    /// Meter baseline; the meter starts here and resets here after a payout.
    pub initial_jackpot: u64,
    pub wildcard_multiplier: f64,
    /// Fraction of each non-jackpot wager fed into the meter (floored).
    pub jackpot_increment: f64,
    pub min_match: usize,
    /// Share of cells (percent, floored) that must show the jackpot symbol.
    pub jackpot_coverage_percent: u32,
    pub rarity: RarityTable,
    pub symbols: Vec<Symbol>,
    pub paylines: Vec<PayLine>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            rows: 3,
            cols: 5,
            initial_jackpot: 1000,
            wildcard_multiplier: 2.0,
            jackpot_increment: 0.1,
            min_match: 3,
            jackpot_coverage_percent: 80,
            rarity: RarityTable::default(),
            symbols: default_symbols(),
            paylines: default_paylines(),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("symbol catalog is empty")]
    EmptyCatalog,
    #[error("duplicate symbol id: '{0}'")]
    DuplicateSymbol(String),
    #[error("grid must have at least one row and one column, got {rows}x{cols}")]
    ZeroDimension { rows: usize, cols: usize },
    #[error("payline {0} has no positions")]
    EmptyPayline(u32),
    #[error("payline {line} references cell {index}, grid has {cells} cells")]
    PaylineOutOfRange { line: u32, index: usize, cells: usize },
    #[error("payline {line} has invalid multiplier {value}")]
    InvalidLineMultiplier { line: u32, value: f64 },
    #[error("wildcard multiplier must be finite and non-negative, got {0}")]
    InvalidWildcardMultiplier(f64),
    #[error("jackpot increment must be finite and non-negative, got {0}")]
    InvalidIncrement(f64),
    #[error("minimum match must be at least 1")]
    ZeroMinMatch,
    #[error("jackpot coverage must be within 0..=100 percent, got {0}")]
    InvalidCoverage(u32),
    #[error("rarity weight for {pool} pool is invalid: {value}")]
    InvalidRarity { pool: &'static str, value: f64 },
    #[error("rarity weights add up to {0}, more than 1")]
    RarityOverflow(f64),
}

/// Failure to read a configuration file.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum LoadError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(#[from] ConfigError),
}

impl MachineConfig {
    pub fn with_grid(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    pub fn with_symbols(mut self, symbols: Vec<Symbol>) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn with_paylines(mut self, paylines: Vec<PayLine>) -> Self {
        self.paylines = paylines;
        self
    }

    pub fn cells(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    /// Jackpot symbols needed for a jackpot: `floor(cells * coverage / 100)`.
    /// Zero on grids too small for the coverage, where every spin hits.
    pub fn jackpot_threshold(&self) -> usize {
        self.cells().saturating_mul(self.jackpot_coverage_percent as usize) / 100
    }

    /// Check every construction-time invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbols.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        let mut seen = HashSet::with_capacity(self.symbols.len());
        for s in &self.symbols {
            if !seen.insert(s.id()) {
                return Err(ConfigError::DuplicateSymbol(s.id().to_string()));
            }
        }
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::ZeroDimension { rows: self.rows, cols: self.cols });
        }
        let cells = self.cells();
        for line in &self.paylines {
            if line.is_empty() {
                return Err(ConfigError::EmptyPayline(line.id()));
            }
            if let Some(&index) = line.positions().iter().find(|&&i| i >= cells) {
                return Err(ConfigError::PaylineOutOfRange { line: line.id(), index, cells });
            }
            let m = line.multiplier();
            if !m.is_finite() || m < 0.0 {
                return Err(ConfigError::InvalidLineMultiplier { line: line.id(), value: m });
            }
        }
        if !self.wildcard_multiplier.is_finite() || self.wildcard_multiplier < 0.0 {
            return Err(ConfigError::InvalidWildcardMultiplier(self.wildcard_multiplier));
        }
        if !self.jackpot_increment.is_finite() || self.jackpot_increment < 0.0 {
            return Err(ConfigError::InvalidIncrement(self.jackpot_increment));
        }
        if self.min_match == 0 {
            return Err(ConfigError::ZeroMinMatch);
        }
        if self.jackpot_coverage_percent > 100 {
            return Err(ConfigError::InvalidCoverage(self.jackpot_coverage_percent));
        }
        self.rarity.validate()
    }

    /// Parse JSON; absent fields take their defaults. Does not validate.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path)?;
        let cfg = Self::from_json_str(&text)?;
        cfg.validate()?;
        Ok(cfg)
    }
}
