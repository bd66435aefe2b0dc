//! Uniform `[0, 1)` sample sources for the engine.
//!
//! The engine never touches a global RNG; it pulls every draw from a
//! [`UniformSource`] it owns. Production code wraps a `rand` generator in
//! [`RngSource`]; fixtures replay fixed values with [`SequenceSource`].

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A stream of samples in `[0, 1)`. `None` means the source is exhausted.
pub trait UniformSource {
    fn next_unit(&mut self) -> Option<f64>;
}

impl<S: UniformSource + ?Sized> UniformSource for &mut S {
    fn next_unit(&mut self) -> Option<f64> {
        (**self).next_unit()
    }
}

impl<S: UniformSource + ?Sized> UniformSource for Box<S> {
    fn next_unit(&mut self) -> Option<f64> {
        (**self).next_unit()
    }
}

/// Adapts any `rand` generator. Never exhausts.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl RngSource<ChaCha8Rng> {
    /// Seeded ChaCha8 stream for reproducible runs.
    ///
    /// ```
    /// use casino_rs::slots::{RngSource, UniformSource};
    ///
    /// let mut a = RngSource::seeded(7);
    /// let mut b = RngSource::seeded(7);
    /// assert_eq!(a.next_unit(), b.next_unit());
    /// ```
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_os_rng() -> Self {
        Self::new(ChaCha8Rng::from_os_rng())
    }
}

impl<R: Rng> UniformSource for RngSource<R> {
    fn next_unit(&mut self) -> Option<f64> {
        Some(self.rng.random::<f64>())
    }
}

/// Replays a fixed list of samples, either once or forever.
///
/// ```
/// use casino_rs::slots::{SequenceSource, UniformSource};
///
/// let mut once = SequenceSource::once(vec![0.5]);
/// assert_eq!(once.next_unit(), Some(0.5));
/// assert_eq!(once.next_unit(), None);
///
/// let mut looped = SequenceSource::cycle(vec![0.1, 0.2]);
/// assert_eq!(looped.next_unit(), Some(0.1));
/// assert_eq!(looped.next_unit(), Some(0.2));
/// assert_eq!(looped.next_unit(), Some(0.1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceSource {
    values: Vec<f64>,
    pos: usize,
    cycle: bool,
}

impl SequenceSource {
    pub fn once(values: Vec<f64>) -> Self {
        Self { values, pos: 0, cycle: false }
    }

    pub fn cycle(values: Vec<f64>) -> Self {
        Self { values, pos: 0, cycle: true }
    }

    /// Same value forever.
    pub fn constant(value: f64) -> Self {
        Self::cycle(vec![value])
    }

    /// Samples handed out so far (counting wrap-arounds).
    pub fn consumed(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> Option<usize> {
        if self.cycle {
            None
        } else {
            Some(self.values.len().saturating_sub(self.pos))
        }
    }
}

impl UniformSource for SequenceSource {
    fn next_unit(&mut self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        let idx = if self.cycle { self.pos % self.values.len() } else { self.pos };
        let v = self.values.get(idx).copied()?;
        self.pos += 1;
        Some(v)
    }
}
