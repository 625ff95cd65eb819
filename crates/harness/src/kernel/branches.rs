//! Random-branch kernel.
//!
//! Classifies each element of a random 0/1 array as taken or not taken with a
//! conditional increment. The measured behavior is the data-dependent branch:
//! both counters pass through [`black_box`] inside their arms so the `if`
//! stays a conditional branch instead of a branchless add.

use std::hint::black_box;

use serde::Serialize;

use super::{ComputeKernel, KernelOutput};

/// Outcome counts of the branch kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BranchCounts {
    /// Elements that took the branch (`X[i] != 0`).
    pub taken: u64,
    /// Elements that fell through (`X[i] == 0`).
    pub not_taken: u64,
}

impl BranchCounts {
    /// `taken + not_taken`, always equal to the classified length.
    pub fn total(&self) -> u64 {
        self.taken + self.not_taken
    }
}

/// Counts taken and not-taken outcomes over `x`, ascending.
#[inline(never)]
pub fn classify_branches(x: &[u8]) -> BranchCounts {
    let mut taken: u64 = 0;
    let mut not_taken: u64 = 0;
    for &v in x {
        if v != 0 {
            taken = black_box(taken + 1);
        } else {
            not_taken = black_box(not_taken + 1);
        }
    }
    BranchCounts { taken, not_taken }
}

/// Branch kernel over an owned 0/1 array.
#[derive(Debug)]
pub struct BranchKernel {
    x: Vec<u8>,
    counts: BranchCounts,
}

impl BranchKernel {
    /// Takes ownership of the branch array.
    pub fn new(x: Vec<u8>) -> Self {
        Self {
            x,
            counts: BranchCounts::default(),
        }
    }

    /// Counts from the last execution.
    pub fn counts(&self) -> BranchCounts {
        self.counts
    }
}

impl ComputeKernel for BranchKernel {
    fn execute(&mut self) {
        self.counts = classify_branches(&self.x);
    }

    fn output_len(&self) -> usize {
        self.x.len()
    }

    fn into_output(self) -> KernelOutput {
        KernelOutput::Branches {
            counts: self.counts,
            x: self.x,
        }
    }
}
