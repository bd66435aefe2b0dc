use super::engine::{SlotMachine, SpinError, SpinResult};
use super::paylines::PayLine;
use super::random::{RngSource, UniformSource};
use super::symbols::Symbol;
use parking_lot::{Mutex, MutexGuard};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

/// Cloneable, thread-safe handle to one [`SlotMachine`].
///
/// Each spin holds the lock for its whole read-modify-write of the meter,
/// so concurrent spins never lose a contribution or pay a jackpot twice.
pub struct SharedSlotMachine<S = RngSource<ChaCha8Rng>> {
    inner: Arc<Mutex<SlotMachine<S>>>,
}

impl<S> Clone for SharedSlotMachine<S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S: UniformSource> SharedSlotMachine<S> {
    pub fn new(machine: SlotMachine<S>) -> Self {
        Self { inner: Arc::new(Mutex::new(machine)) }
    }

    pub fn spin(&self, wager: f64) -> Result<SpinResult, SpinError> {
        self.inner.lock().spin(wager)
    }

    pub fn jackpot_value(&self) -> u64 {
        self.inner.lock().jackpot_value()
    }

    pub fn set_jackpot_value(&self, value: u64) {
        self.inner.lock().set_jackpot_value(value);
    }

    pub fn symbols(&self) -> Vec<Arc<Symbol>> {
        self.inner.lock().symbols().to_vec()
    }

    pub fn paylines(&self) -> Vec<PayLine> {
        self.inner.lock().paylines().to_vec()
    }

    /// Exclusive access for several operations in one critical section.
    pub fn lock(&self) -> MutexGuard<'_, SlotMachine<S>> {
        self.inner.lock()
    }
}

impl<S: UniformSource> From<SlotMachine<S>> for SharedSlotMachine<S> {
    fn from(machine: SlotMachine<S>) -> Self {
        Self::new(machine)
    }
}
