//! Harness-wide constants.

/// Problem size used by every workload in the original corpus.
pub const DEFAULT_PROBLEM_SIZE: usize = 4096;

/// Largest accepted problem size (2^28 elements).
///
/// Keeps two f64 buffers under 4 GiB and every count inside `i64` and the
/// exact-integer range of `f64`.
pub const MAX_PROBLEM_SIZE: usize = 1 << 28;

/// Seed used by seeded runs when none is given.
pub const DEFAULT_SEED: u64 = 42;

/// Multiplier for floating-point AX/AXPY kernels.
pub const DEFAULT_FLOAT_ALPHA: f64 = 0.5;

/// Multiplier for integer AX/AXPY kernels.
pub const DEFAULT_INT_ALPHA: i32 = 2;

/// Lower bound (inclusive) of generated floating-point elements.
pub const FLOAT_LOW: f64 = 1.0;

/// Upper bound (exclusive) of generated floating-point elements.
pub const FLOAT_HIGH: f64 = 2.0;

/// Text inside the banner opening one section of a gem5 statistics dump.
pub const STATS_BEGIN_MARKER: &str = "Begin Simulation Statistics";

/// Text inside the banner closing one section of a gem5 statistics dump.
///
/// gem5 pads this banner with extra spaces, so banners are matched on the
/// text between the dashes rather than on the whole line.
pub const STATS_END_MARKER: &str = "End Simulation Statistics";
