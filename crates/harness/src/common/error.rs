//! Harness error definitions.
//!
//! Every failure a workload run can hit is one variant of [`HarnessError`]:
//! 1. **Sizing:** problem sizes outside the supported range.
//! 2. **Resources:** buffer allocation failures.
//! 3. **Sequencing:** driver state machine violations.
//! 4. **I/O and parsing:** result output, JSON configuration, and statistics dumps.
//!
//! There is no retry policy. The binary maps any of these to exit status 1.

use std::collections::TryReserveError;
use std::io;

use thiserror::Error;

/// Result alias used throughout the harness.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Errors raised while preparing, running, or reporting a workload.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The requested problem size exceeds [`MAX_PROBLEM_SIZE`](super::constants::MAX_PROBLEM_SIZE).
    #[error("invalid problem size {requested}: must be at most {max}")]
    InvalidSize {
        /// Size that was requested.
        requested: i64,
        /// Largest size the harness accepts.
        max: usize,
    },

    /// A buffer for the workload could not be reserved.
    #[error("failed to allocate {elements} elements for {buffer}")]
    Allocation {
        /// Name of the buffer being allocated (`"x"`, `"y"`, `"sieve"`).
        buffer: &'static str,
        /// Number of elements requested.
        elements: usize,
        /// Allocator error.
        #[source]
        source: TryReserveError,
    },

    /// An alpha was given that the element type cannot represent exactly.
    #[error("alpha {alpha} is not representable as {element}")]
    InvalidAlpha {
        /// Requested multiplier.
        alpha: f64,
        /// Element type of the workload.
        element: &'static str,
    },

    /// The generated buffer does not fit the workload's kernel.
    #[error("workload '{workload}' cannot run on {buffer}")]
    KernelMismatch {
        /// Preset name of the workload.
        workload: &'static str,
        /// Label of the buffer that was supplied.
        buffer: &'static str,
    },

    /// A command-line or configuration value was not recognized.
    #[error("unknown {option} '{value}'")]
    UnknownOption {
        /// Option being parsed (`"sink"`, `"format"`).
        option: &'static str,
        /// Value that was given.
        value: String,
    },

    /// A workload name did not match any known preset.
    #[error("unknown workload '{0}'")]
    UnknownWorkload(String),

    /// The driver attempted a state transition that is not the next forward step.
    #[error("invalid driver transition from {from} to {to}")]
    InvalidTransition {
        /// State the driver was in.
        from: &'static str,
        /// State it attempted to enter.
        to: &'static str,
    },

    /// Writing the result or reading an input file failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A JSON configuration or energy table could not be decoded.
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// A statistics dump line could not be interpreted.
    #[error("statistics parse error at line {line}: {reason}")]
    StatsParse {
        /// 1-based line number in the dump.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },
}
