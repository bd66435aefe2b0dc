use serde::{Deserialize, Serialize};
use std::fmt;

/// Display classification of a payline path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum LineShape {
    Straight,
    Diagonal,
    V,
    Zigzag,
    #[default]
    Custom,
}

impl fmt::Display for LineShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LineShape::Straight => "Straight",
            LineShape::Diagonal => "Diagonal",
            LineShape::V => "V",
            LineShape::Zigzag => "Zigzag",
            LineShape::Custom => "Custom",
        };
        f.write_str(s)
    }
}

/// A fixed path of flattened (row-major) grid cells plus its payout multiplier.
///
/// ```
/// use casino_rs::slots::{LineShape, PayLine};
///
/// let top = PayLine::new(1, LineShape::Straight, vec![0, 1, 2, 3, 4], 1.0);
/// assert_eq!(top.len(), 5);
/// assert_eq!(top.cell(5, 2), Some((0, 2)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayLine {
    id: u32,
    #[serde(default)]
    shape: LineShape,
    positions: Vec<usize>,
    multiplier: f64,
}

impl PayLine {
    pub fn new(id: u32, shape: LineShape, positions: Vec<usize>, multiplier: f64) -> Self {
        Self { id, shape, positions, multiplier }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn shape(&self) -> LineShape {
        self.shape
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Resolve the `step`-th position of the line to `(row, col)` for a grid
    /// `cols` wide.
    pub fn cell(&self, cols: usize, step: usize) -> Option<(usize, usize)> {
        if cols == 0 {
            return None;
        }
        self.positions.get(step).map(|&i| (i / cols, i % cols))
    }
}

/// The nine built-in paylines for a 3x5 grid.
pub fn default_paylines() -> Vec<PayLine> {
    use LineShape::*;
    vec![
        PayLine::new(1, Straight, vec![0, 1, 2, 3, 4], 1.0),
        PayLine::new(2, Straight, vec![5, 6, 7, 8, 9], 1.0),
        PayLine::new(3, Straight, vec![10, 11, 12, 13, 14], 1.0),
        PayLine::new(4, Diagonal, vec![0, 6, 12, 8, 4], 1.5),
        PayLine::new(5, Diagonal, vec![10, 6, 2, 8, 14], 1.5),
        PayLine::new(6, V, vec![0, 5, 10, 5, 0], 2.0),
        PayLine::new(7, V, vec![4, 9, 14, 9, 4], 2.0),
        PayLine::new(8, Zigzag, vec![0, 6, 2, 8, 4], 2.5),
        PayLine::new(9, Zigzag, vec![10, 6, 12, 8, 14], 2.5),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lines_fit_three_by_five() {
        let lines = default_paylines();
        assert_eq!(lines.len(), 9);
        for line in &lines {
            assert_eq!(line.len(), 5);
            assert!(line.positions().iter().all(|&i| i < 15));
        }
    }

    #[test]
    fn default_multipliers_sum_to_fifteen() {
        let total: f64 = default_paylines().iter().map(PayLine::multiplier).sum();
        assert_eq!(total, 15.0);
    }

    #[test]
    fn cell_resolves_row_major() {
        let diag = &default_paylines()[4];
        assert_eq!(diag.cell(5, 0), Some((2, 0)));
        assert_eq!(diag.cell(5, 2), Some((0, 2)));
        assert_eq!(diag.cell(5, 5), None);
        assert_eq!(diag.cell(0, 0), None);
    }
}
