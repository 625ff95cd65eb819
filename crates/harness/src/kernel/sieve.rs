//! Sieve of Eratosthenes.
//!
//! Marking is `O(n log log n)` with a serial dependency on earlier marks
//! (`i` is only sieved if nothing smaller struck it out); the count is a
//! linear scan. Both run inside the ROI.

use super::{ComputeKernel, KernelOutput};
use crate::buffer::filled;
use crate::common::constants::MAX_PROBLEM_SIZE;
use crate::common::error::{HarnessError, Result};

/// Strikes out every composite in `flags`, where `flags.len() == n + 1`.
///
/// For each `i` from 2 while `i * i <= n`, if `flags[i]` is still set, marks
/// `i*i, i*i + i, ...` up to `n`. Slots 0 and 1 are left untouched; the count
/// skips them.
pub fn sieve_mark(flags: &mut [bool]) {
    let Some(n) = flags.len().checked_sub(1) else {
        return;
    };
    let mut i = 2;
    while i * i <= n {
        if flags[i] {
            for j in (i * i..=n).step_by(i) {
                flags[j] = false;
            }
        }
        i += 1;
    }
}

/// Counts the set flags at indices `2..=n`.
pub fn count_primes(flags: &[bool]) -> u64 {
    flags.iter().skip(2).filter(|&&p| p).count() as u64
}

/// Number of primes `<= n`; zero for `n < 2`.
///
/// Allocates its own `n + 1` flags.
///
/// # Errors
///
/// [`HarnessError::InvalidSize`] when `n > MAX_PROBLEM_SIZE`, or
/// [`HarnessError::Allocation`] when the flags cannot be allocated.
pub fn prime_count(n: i64) -> Result<u64> {
    let Ok(size) = usize::try_from(n) else {
        return Ok(0);
    };
    if size > MAX_PROBLEM_SIZE {
        return Err(HarnessError::InvalidSize {
            requested: n,
            max: MAX_PROBLEM_SIZE,
        });
    }
    if size < 2 {
        return Ok(0);
    }
    let mut flags = filled("sieve flags", size + 1, true)?;
    sieve_mark(&mut flags);
    Ok(count_primes(&flags))
}

/// Sieve kernel over owned `N + 1` flags.
#[derive(Debug)]
pub struct SieveKernel {
    flags: Vec<bool>,
    count: u64,
}

impl SieveKernel {
    /// Takes ownership of the flags (expected all `true`).
    pub fn new(flags: Vec<bool>) -> Self {
        Self { flags, count: 0 }
    }

    /// Prime count from the last execution.
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl ComputeKernel for SieveKernel {
    fn execute(&mut self) {
        sieve_mark(&mut self.flags);
        self.count = count_primes(&self.flags);
    }

    fn output_len(&self) -> usize {
        self.flags.len()
    }

    fn into_output(self) -> KernelOutput {
        KernelOutput::Primes {
            count: self.count,
            flags: self.flags,
        }
    }
}
