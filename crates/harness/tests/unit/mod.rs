//! # Unit Components
//!
//! One module per harness component, leaf to root.


/// Input generation: ranges, seeding and buffer shapes.
pub mod generator;

/// AX/AXPY, random-branch and sieve kernels.
pub mod kernel;

/// ROI controller and statistics sinks.
///
/// Uses the `mockall` sink to check that each ROI emits exactly one
/// `begin_roi` followed by exactly one `end_roi`.
pub mod roi;

/// Result reduction and line formats.
pub mod report;



/// gem5 statistics dump parsing.
pub mod stats;
