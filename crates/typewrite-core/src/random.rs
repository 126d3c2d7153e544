use std::cell::{Cell, RefCell};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform `[0, 1)` source, drawn once per eligible typing tick.
pub trait RandomSource: 'static {
    fn next_unit(&self) -> f64;
}

/// Thread-local OS-seeded generator.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&self) -> f64 {
        rand::rng().random::<f64>()
    }
}

/// Reproducible jitter from a fixed seed.
pub struct SeededRandom {
    rng: RefCell<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&self) -> f64 {
        self.rng.borrow_mut().random::<f64>()
    }
}

/// Always returns the same value; counts draws for assertions.
#[derive(Debug, Default)]
pub struct FixedRandom {
    value: f64,
    draws: Cell<usize>,
}

impl FixedRandom {
    /// `value` is clamped into `[0, 1)`.
    pub fn new(value: f64) -> Self {
        Self {
            value: value.clamp(0.0, 1.0 - f64::EPSILON),
            draws: Cell::new(0),
        }
    }

    pub fn draws(&self) -> usize {
        self.draws.get()
    }
}

impl RandomSource for FixedRandom {
    fn next_unit(&self) -> f64 {
        self.draws.set(self.draws.get() + 1);
        self.value
    }
}
