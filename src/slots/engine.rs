use super::config::{ConfigError, MachineConfig};
use super::grid::Grid;
use super::paylines::PayLine;
use super::random::{RngSource, UniformSource};
use super::symbols::{Symbol, SymbolKind};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{event, Level};

/// One payline that paid on a spin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct WinningLine {
    pub payline_id: u32,
    /// The matched run, from the start of the line up to the first break.
    pub symbols: Vec<Arc<Symbol>>,
    /// Flattened cells of the run, in line order.
    pub positions: Vec<usize>,
    /// The first non-wild symbol on the line (or the first symbol if the
    /// whole line is wild).
    pub reference: Arc<Symbol>,
    pub wild: bool,
    pub win: f64,
}

impl WinningLine {
    pub fn run_len(&self) -> usize {
        self.symbols.len()
    }
}

/// Outcome of one spin. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct SpinResult {
    pub grid: Grid,
    pub winning_lines: Vec<WinningLine>,
    /// Sum of line wins, or the whole meter on a jackpot.
    pub total_win: f64,
    pub is_jackpot: bool,
    pub wager: f64,
    /// Meter value once this spin settled.
    pub jackpot_after: u64,
}

impl SpinResult {
    pub fn is_win(&self) -> bool {
        self.total_win > 0.0
    }

    /// Every flattened cell that belongs to a winning run.
    pub fn winning_cells(&self) -> BTreeSet<usize> {
        self.winning_lines.iter().flat_map(|l| l.positions.iter().copied()).collect()
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum SpinError {
    #[error("wager must be a finite positive amount, got {0}")]
    InvalidWager(f64),
    #[error("random source exhausted")]
    SourceExhausted,
    #[error("random source produced {0}, outside [0, 1)")]
    InvalidSample(f64),
}

/// Catalog indices grouped by rarity pool, fixed at construction.
#[derive(Debug, Clone)]
struct Pools {
    jackpot: Vec<usize>,
    special: Vec<usize>,
    high_value: Vec<usize>,
    common: Vec<usize>,
    all: Vec<usize>,
}

impl Pools {
    fn build(symbols: &[Arc<Symbol>], high_value_threshold: u32) -> Self {
        let mut pools = Pools {
            jackpot: Vec::new(),
            special: Vec::new(),
            high_value: Vec::new(),
            common: Vec::new(),
            all: (0..symbols.len()).collect(),
        };
        for (i, s) in symbols.iter().enumerate() {
            match s.kind() {
                SymbolKind::Jackpot => pools.jackpot.push(i),
                k if k.is_special() => pools.special.push(i),
                _ if s.value() >= high_value_threshold => pools.high_value.push(i),
                _ => pools.common.push(i),
            }
        }
        pools
    }

    fn select(&self, sample: f64, cuts: [f64; 3]) -> &[usize] {
        let pool = if sample < cuts[0] {
            &self.jackpot
        } else if sample < cuts[1] {
            &self.special
        } else if sample < cuts[2] {
            &self.high_value
        } else {
            &self.common
        };
        if pool.is_empty() {
            &self.all
        } else {
            pool
        }
    }
}

/// Slot payout engine: weighted grid generation, payline evaluation with
/// wild substitution, and a progressive jackpot meter.
///
/// Every random draw comes from the owned source `S`, so a seeded or
/// scripted source makes spins reproducible.
///
/// ```
/// use casino_rs::slots::SlotMachine;
///
/// let mut machine = SlotMachine::standard(42);
/// let before = machine.jackpot_value();
/// let result = machine.spin(10.0).unwrap();
/// assert_eq!(result.grid.len(), 15);
/// if !result.is_jackpot {
///     assert_eq!(machine.jackpot_value(), before + 1);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SlotMachine<S = RngSource<ChaCha8Rng>> {
    config: MachineConfig,
    symbols: Vec<Arc<Symbol>>,
    pools: Pools,
    jackpot: u64,
    source: S,
    spins: u64,
}

impl SlotMachine<RngSource<ChaCha8Rng>> {
    /// Default configuration on a seeded ChaCha8 stream.
    pub fn standard(seed: u64) -> Self {
        Self::from_validated(MachineConfig::default(), RngSource::seeded(seed))
    }

    pub fn seeded(config: MachineConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::new(config, RngSource::seeded(seed))
    }

    pub fn from_os_rng(config: MachineConfig) -> Result<Self, ConfigError> {
        Self::new(config, RngSource::from_os_rng())
    }
}

impl<S: UniformSource> SlotMachine<S> {
    /// Validate `config` and build the engine. The meter starts at
    /// `config.initial_jackpot`.
    pub fn new(config: MachineConfig, source: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_validated(config, source))
    }

    fn from_validated(config: MachineConfig, source: S) -> Self {
        let symbols: Vec<Arc<Symbol>> = config.symbols.iter().cloned().map(Arc::new).collect();
        let pools = Pools::build(&symbols, config.rarity.high_value_threshold);
        let jackpot = config.initial_jackpot;
        Self { config, symbols, pools, jackpot, source, spins: 0 }
    }

    /// Spin once: draw a grid, evaluate every payline, then settle the
    /// jackpot meter. The meter is untouched if the spin fails.
    pub fn spin(&mut self, wager: f64) -> Result<SpinResult, SpinError> {
        if !wager.is_finite() || wager <= 0.0 {
            return Err(SpinError::InvalidWager(wager));
        }
        let grid = self.generate_grid()?;
        let winning_lines = self.evaluate_grid(&grid);
        let is_jackpot = self.is_jackpot_grid(&grid);

        let total_win = if is_jackpot {
            let paid = self.jackpot;
            self.jackpot = self.config.initial_jackpot;
            event!(Level::INFO, paid, reset_to = self.jackpot, "jackpot paid");
            paid as f64
        } else {
            self.jackpot = self.jackpot.saturating_add(self.contribution(wager));
            winning_lines.iter().map(|l| l.win).sum()
        };
        self.spins += 1;

        event!(
            Level::DEBUG,
            spin = self.spins,
            wager,
            total_win,
            lines = winning_lines.len(),
            meter = self.jackpot,
            "spin settled"
        );

        Ok(SpinResult {
            grid,
            winning_lines,
            total_win,
            is_jackpot,
            wager,
            jackpot_after: self.jackpot,
        })
    }

    /// Meter contribution of a non-jackpot wager.
    pub fn contribution(&self, wager: f64) -> u64 {
        (wager * self.config.jackpot_increment).floor() as u64
    }

    /// Draw a fresh grid, row-major, two samples per cell.
    pub fn generate_grid(&mut self) -> Result<Grid, SpinError> {
        let cells = (0..self.config.cells())
            .map(|_| self.draw_symbol())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Grid::from_row_major(self.config.rows, self.config.cols, cells))
    }

    fn draw_symbol(&mut self) -> Result<Arc<Symbol>, SpinError> {
        let rarity = self.next_sample()?;
        let pick = self.next_sample()?;
        let pool = self.pools.select(rarity, self.config.rarity.thresholds());
        let idx = ((pick * pool.len() as f64) as usize).min(pool.len() - 1);
        Ok(Arc::clone(&self.symbols[pool[idx]]))
    }

    fn next_sample(&mut self) -> Result<f64, SpinError> {
        let v = self.source.next_unit().ok_or(SpinError::SourceExhausted)?;
        if !(0.0..1.0).contains(&v) {
            return Err(SpinError::InvalidSample(v));
        }
        Ok(v)
    }

    /// Evaluate every configured payline against `grid`; only paying lines
    /// are returned, in payline order.
    pub fn evaluate_grid(&self, grid: &Grid) -> Vec<WinningLine> {
        self.config.paylines.iter().filter_map(|line| self.evaluate_line(grid, line)).collect()
    }

    /// Evaluate one payline. `None` when the run is shorter than the minimum
    /// match or the line does not fit the grid. A matched run is recorded even
    /// when its symbol pays nothing (scatters, an all-wild line).
    pub fn evaluate_line(&self, grid: &Grid, line: &PayLine) -> Option<WinningLine> {
        let cols = self.config.cols;
        let on_line = line
            .positions()
            .iter()
            .map(|&i| grid.get(i / cols, i % cols).cloned())
            .collect::<Option<Vec<_>>>()?;
        let reference = on_line.iter().find(|s| !s.is_wild()).or_else(|| on_line.first())?.clone();

        let mut run = 0;
        let mut wild = false;
        for s in &on_line {
            if s.is_wild() {
                wild = true;
            } else if s.id() != reference.id() {
                break;
            }
            run += 1;
        }
        if run < self.config.min_match {
            return None;
        }

        let mut win = reference.value() as f64 * run as f64 * line.multiplier();
        if wild {
            win *= self.config.wildcard_multiplier;
        }
        event!(
            Level::TRACE,
            line = line.id(),
            symbol = reference.id(),
            run,
            wild,
            win,
            "line matched"
        );

        let mut symbols = on_line;
        symbols.truncate(run);
        Some(WinningLine {
            payline_id: line.id(),
            symbols,
            positions: line.positions()[..run].to_vec(),
            reference,
            wild,
            win,
        })
    }

    /// Whether enough cells show the jackpot symbol.
    pub fn is_jackpot_grid(&self, grid: &Grid) -> bool {
        grid.count_kind(SymbolKind::Jackpot) >= self.config.jackpot_threshold()
    }

    pub fn jackpot_value(&self) -> u64 {
        self.jackpot
    }

    /// Override the meter (test setup, administrative reset).
    pub fn set_jackpot_value(&mut self, value: u64) {
        event!(Level::DEBUG, from = self.jackpot, to = value, "jackpot meter overridden");
        self.jackpot = value;
    }

    pub fn symbols(&self) -> &[Arc<Symbol>] {
        &self.symbols
    }

    pub fn paylines(&self) -> &[PayLine] {
        &self.config.paylines
    }

    pub fn symbol(&self, id: &str) -> Option<&Arc<Symbol>> {
        self.symbols.iter().find(|s| s.id() == id)
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn spins_played(&self) -> u64 {
        self.spins
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::random::SequenceSource;

    fn scripted(values: Vec<f64>) -> SlotMachine<SequenceSource> {
        SlotMachine::new(MachineConfig::default(), SequenceSource::cycle(values)).unwrap()
    }

    /// Default-shaped grid with row 0 set from `ids`; rows 1-2 alternate
    /// orange/grapes so they never form a run.
    fn grid_with_top_row(m: &SlotMachine<SequenceSource>, ids: [&str; 5]) -> Grid {
        let filler = [
            "orange", "grapes", "orange", "grapes", "orange", "grapes", "orange", "grapes",
            "orange", "grapes",
        ];
        let cells = ids
            .iter()
            .chain(filler.iter())
            .map(|id| m.symbol(id).unwrap().clone())
            .collect();
        Grid::from_cells(3, 5, cells).unwrap()
    }

    fn top_line(m: &SlotMachine<SequenceSource>) -> PayLine {
        m.paylines()[0].clone()
    }

    #[test]
    fn plain_run_pays_without_wild_multiplier() {
        let m = scripted(vec![0.5]);
        let g = grid_with_top_row(&m, ["lemon", "lemon", "lemon", "cherry", "lemon"]);
        let w = m.evaluate_line(&g, &top_line(&m)).unwrap();
        assert_eq!(w.run_len(), 3);
        assert!(!w.wild);
        assert_eq!(w.win, 10.0 * 3.0);
        assert_eq!(w.positions, vec![0, 1, 2]);
    }

    #[test]
    fn leading_wild_substitutes_and_doubles() {
        let m = scripted(vec![0.5]);
        let g = grid_with_top_row(&m, ["wild", "cherry", "cherry", "lemon", "cherry"]);
        let w = m.evaluate_line(&g, &top_line(&m)).unwrap();
        assert_eq!(w.reference.id(), "cherry");
        assert_eq!(w.run_len(), 3);
        assert!(w.wild);
        assert_eq!(w.win, 5.0 * 3.0 * 2.0);
    }

    #[test]
    fn wild_after_the_break_does_not_count() {
        let m = scripted(vec![0.5]);
        let g = grid_with_top_row(&m, ["bell", "bell", "bell", "lemon", "wild"]);
        let w = m.evaluate_line(&g, &top_line(&m)).unwrap();
        assert!(!w.wild);
        assert_eq!(w.win, 30.0 * 3.0);
    }

    #[test]
    fn short_run_does_not_pay() {
        let m = scripted(vec![0.5]);
        let g = grid_with_top_row(&m, ["lemon", "lemon", "cherry", "lemon", "lemon"]);
        assert!(m.evaluate_line(&g, &top_line(&m)).is_none());
    }

    #[test]
    fn all_wild_line_is_recorded_at_zero() {
        let m = scripted(vec![0.5]);
        let g = grid_with_top_row(&m, ["wild", "wild", "wild", "wild", "wild"]);
        let w = m.evaluate_line(&g, &top_line(&m)).unwrap();
        assert_eq!(w.reference.id(), "wild");
        assert_eq!(w.run_len(), 5);
        assert!(w.wild);
        assert_eq!(w.win, 0.0);
    }

    #[test]
    fn scatter_run_is_recorded_at_zero() {
        let m = scripted(vec![0.5]);
        let g = grid_with_top_row(&m, ["scatter", "scatter", "scatter", "orange", "grapes"]);
        let w = m.evaluate_line(&g, &top_line(&m)).unwrap();
        assert_eq!(w.reference.id(), "scatter");
        assert_eq!(w.positions, vec![0, 1, 2]);
        assert_eq!(w.win, 0.0);
    }

    #[test]
    fn pool_thresholds_pick_expected_symbols() {
        // jackpot pool, then index 0
        let mut m = scripted(vec![0.0, 0.0]);
        assert_eq!(m.draw_symbol().unwrap().id(), "jackpot");
        // special pool: wild, scatter
        let mut m = scripted(vec![0.05, 0.6]);
        assert_eq!(m.draw_symbol().unwrap().id(), "scatter");
        // high-value pool: bell, seven, diamond
        let mut m = scripted(vec![0.2, 0.5]);
        assert_eq!(m.draw_symbol().unwrap().id(), "seven");
        // common pool: cherry..grapes
        let mut m = scripted(vec![0.99, 0.99]);
        assert_eq!(m.draw_symbol().unwrap().id(), "grapes");
    }

    #[test]
    fn empty_pool_falls_back_to_whole_catalog() {
        let cfg = MachineConfig::default()
            .with_symbols(vec![
                Symbol::regular("a", "A", "A", 1),
                Symbol::regular("b", "B", "B", 2),
            ])
            .with_paylines(vec![]);
        let mut m = SlotMachine::new(cfg, SequenceSource::cycle(vec![0.0, 0.75])).unwrap();
        assert_eq!(m.draw_symbol().unwrap().id(), "b");
    }

    #[test]
    fn invalid_wager_is_rejected() {
        let mut m = scripted(vec![0.5]);
        for w in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(m.spin(w), Err(SpinError::InvalidWager(_))));
        }
        assert_eq!(m.spins_played(), 0);
    }

    #[test]
    fn exhausted_source_leaves_meter_alone() {
        let mut m = SlotMachine::new(MachineConfig::default(), SequenceSource::once(vec![0.5; 7]))
            .unwrap();
        let before = m.jackpot_value();
        assert_eq!(m.spin(100.0).unwrap_err(), SpinError::SourceExhausted);
        assert_eq!(m.jackpot_value(), before);
    }

    #[test]
    fn out_of_range_sample_is_rejected() {
        let mut m = scripted(vec![1.0]);
        assert_eq!(m.spin(1.0).unwrap_err(), SpinError::InvalidSample(1.0));
    }

    #[test_log::test]
    fn seeded_machines_agree() {
        let mut a = SlotMachine::standard(99);
        let mut b = SlotMachine::standard(99);
        for _ in 0..20 {
            assert_eq!(a.spin(5.0).unwrap(), b.spin(5.0).unwrap());
        }
        assert_eq!(a.jackpot_value(), b.jackpot_value());
    }
}
