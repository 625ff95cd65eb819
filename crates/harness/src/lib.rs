//! ROI-delimited synthetic workloads for microarchitecture simulators.
//!
//! This crate implements the harness every workload runs through:
//! 1. **Generation:** seeded or entropy-seeded input buffers.
//! 2. **Kernels:** AX/AXPY over `i32`, `f32` and `f64`, random branches, and
//!    a sieve of Eratosthenes.
//! 3. **ROI control:** begin/end signals to a pluggable statistics sink
//!    (no-op, host timer, or gem5 pseudo-instructions).
//! 4. **Reporting:** one result line per run, text or JSON.
//! 5. **Post-processing:** gem5 statistics parsing and an O3 CPU power model.

/// Common types (constants, errors).
pub mod common;
/// Run configuration (defaults, sections, preset resolution).
pub mod config;
/// Workload buffers and element arithmetic.
pub mod buffer;
/// One-run state machine tying generator, ROI, kernel and reporter together.
pub mod driver;
/// Input data generation.
pub mod generator;
/// Host-side run setup (CPU pinning).
pub mod host;
/// Compute kernels.
pub mod kernel;
/// O3 CPU power model over gem5 statistics.
pub mod power;
/// Result reduction and reporting.
pub mod report;
/// Region-of-interest control and statistics sinks.
pub mod roi;
/// gem5 statistics dump parsing.
pub mod stats;
/// Workload taxonomy and run specification.
pub mod workload;

/// Error type and result alias of every fallible harness operation.
pub use crate::common::{HarnessError, Result};
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Drives one workload from generation to report.
pub use crate::driver::{RunSummary, WorkloadDriver};
/// Wraps kernels in begin/end signals.
pub use crate::roi::{RoiController, StatsSink};
/// What to run.
pub use crate::workload::{ElementType, WorkloadKind, WorkloadSpec};
