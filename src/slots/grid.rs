use super::symbols::{Symbol, SymbolKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// `rows x cols` symbol references, stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Arc<Symbol>>,
}

impl Grid {
    /// Build a grid from row-major cells. Returns `None` if the cell count
    /// does not match `rows * cols`.
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<Arc<Symbol>>) -> Option<Self> {
        if rows.checked_mul(cols)? != cells.len() {
            return None;
        }
        Some(Self { rows, cols, cells })
    }

    /// Caller guarantees `cells.len() == rows * cols`.
    pub(crate) fn from_row_major(rows: usize, cols: usize, cells: Vec<Arc<Symbol>>) -> Self {
        debug_assert_eq!(cells.len(), rows * cols);
        Self { rows, cols, cells }
    }

    /// A grid where every cell shows `symbol`.
    pub fn filled(rows: usize, cols: usize, symbol: Arc<Symbol>) -> Self {
        Self { rows, cols, cells: vec![symbol; rows * cols] }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Arc<Symbol>> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }

    /// Cell at a flattened row-major index.
    pub fn at(&self, index: usize) -> Option<&Arc<Symbol>> {
        self.cells.get(index)
    }

    pub fn cells(&self) -> &[Arc<Symbol>] {
        &self.cells
    }

    pub fn row(&self, row: usize) -> Option<&[Arc<Symbol>]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        self.cells.get(start..start + self.cols)
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[Arc<Symbol>]> {
        self.cells.chunks(self.cols.max(1))
    }

    pub fn count_kind(&self, kind: SymbolKind) -> usize {
        self.cells.iter().filter(|s| s.kind() == kind).count()
    }

    #[cfg(test)]
    pub(crate) fn set(&mut self, index: usize, symbol: Arc<Symbol>) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = symbol;
        }
    }
}
