//! Input data generation.
//!
//! The generator fills a workload's buffers before the ROI opens. It provides:
//! 1. **Seeding:** a fixed seed for reproducible runs, or an entropy-drawn
//!    seed that is still recorded so the run can be replayed.
//! 2. **Distributions:** uniform `[1.0, 2.0)` for floats, `{1, 2}` for
//!    integers, uniform `{0, 1}` for the branch array.
//! 3. **Sieve setup:** `N + 1` flags, all marked prime, with no randomness.
//!
//! Two-source workloads draw `X[i]` then `Y[i]` for each index.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tracing::debug;

use crate::buffer::{Element, InputBuffer, VectorPair, filled, reserve};
use crate::common::constants::{FLOAT_HIGH, FLOAT_LOW};
use crate::common::error::Result;
use crate::workload::{DeterminismMode, ElementType, WorkloadKind, WorkloadSpec};

/// An element type the generator knows how to draw.
pub trait Draw: Element {
    /// Draws one element from the type's declared distribution.
    fn draw<R: RngCore>(rng: &mut R) -> Self;
}

impl Draw for f32 {
    fn draw<R: RngCore>(rng: &mut R) -> Self {
        rng.gen_range(FLOAT_LOW as f32..FLOAT_HIGH as f32)
    }
}

impl Draw for f64 {
    fn draw<R: RngCore>(rng: &mut R) -> Self {
        rng.gen_range(FLOAT_LOW..FLOAT_HIGH)
    }
}

impl Draw for i32 {
    fn draw<R: RngCore>(rng: &mut R) -> Self {
        (rng.next_u32() % 2 + 1) as Self
    }
}

/// Seeded source of workload inputs.
#[derive(Debug)]
pub struct DataGenerator {
    rng: StdRng,
    seed: u64,
}

impl DataGenerator {
    /// Creates a generator for the given determinism mode.
    ///
    /// `Unseeded` draws the seed from OS entropy; the seed is kept so it can
    /// be logged and replayed with `Seeded`.
    pub fn new(mode: DeterminismMode) -> Self {
        let seed = match mode {
            DeterminismMode::Seeded(seed) => seed,
            DeterminismMode::Unseeded => rand::random(),
        };
        debug!(seed, ?mode, "seeding data generator");
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed in use (the drawn one for unseeded runs).
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Produces the input buffer for `spec`.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Allocation`](crate::common::HarnessError::Allocation)
    /// when a buffer cannot be reserved.
    pub fn generate(&mut self, spec: &WorkloadSpec) -> Result<InputBuffer> {
        let n = spec.size();
        let buffer = match (spec.kind, spec.element) {
            (WorkloadKind::Sieve, _) => InputBuffer::Sieve(Self::sieve_flags(n)?),
            (WorkloadKind::RandomBranches, _) => InputBuffer::Branches(self.bernoulli(n)?),
            (kind, ElementType::I32) => InputBuffer::I32(self.vectors(n, kind)?),
            (kind, ElementType::F32) => InputBuffer::F32(self.vectors(n, kind)?),
            (kind, ElementType::F64) => InputBuffer::F64(self.vectors(n, kind)?),
        };
        debug!(workload = spec.name(), len = buffer.len(), "generated {}", buffer.label());
        Ok(buffer)
    }

    /// Draws `X` (and `Y` for two-source kinds) of length `n`.
    ///
    /// Single-source kinds get a zeroed `Y`, which the kernel overwrites.
    pub fn vectors<T: Draw>(&mut self, n: usize, kind: WorkloadKind) -> Result<VectorPair<T>> {
        if kind == WorkloadKind::Axpy {
            let mut x = reserve("x", n)?;
            let mut y = reserve("y", n)?;
            for _ in 0..n {
                x.push(T::draw(&mut self.rng));
                y.push(T::draw(&mut self.rng));
            }
            Ok(VectorPair { x, y })
        } else {
            let mut x = reserve("x", n)?;
            for _ in 0..n {
                x.push(T::draw(&mut self.rng));
            }
            let y = filled("y", n, T::default())?;
            Ok(VectorPair { x, y })
        }
    }

    /// Draws `n` values from `{0, 1}`.
    pub fn bernoulli(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut x = reserve("x", n)?;
        for _ in 0..n {
            x.push((self.rng.next_u32() % 2) as u8);
        }
        Ok(x)
    }

    /// `n + 1` primality flags, all `true`.
    pub fn sieve_flags(n: usize) -> Result<Vec<bool>> {
        filled("sieve", n + 1, true)
    }
}
