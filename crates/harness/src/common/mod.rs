//! Common types shared by every harness component.
//!
//! 1. **Constants:** default problem size, seed, alphas, and generator ranges.
//! 2. **Error Handling:** the [`HarnessError`] taxonomy and `Result` alias.

/// Harness-wide constants.
pub mod constants;

/// Error types.
pub mod error;

pub use constants::{DEFAULT_PROBLEM_SIZE, DEFAULT_SEED, MAX_PROBLEM_SIZE};
pub use error::{HarnessError, Result};
