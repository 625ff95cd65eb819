//! Workload taxonomy and run specification.
//!
//! A workload is identified by two independent axes:
//! 1. **Kind:** what the kernel does (single-source AX, two-source AXPY, random
//!    branches, sieve).
//! 2. **Element type:** the arithmetic the AX/AXPY kernels run in (`i32`,
//!    `f32`, `f64`).
//!
//! The familiar BLAS-style names (`sax`, `saxpy`, `daxpy`, `iax`, `iaxpy`) are
//! presets over those axes; see [`PRESETS`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::common::constants::{
    DEFAULT_FLOAT_ALPHA, DEFAULT_INT_ALPHA, DEFAULT_PROBLEM_SIZE, DEFAULT_SEED, MAX_PROBLEM_SIZE,
};
use crate::common::error::{HarnessError, Result};

/// What a workload's kernel computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadKind {
    /// Single source: `Y[i] = alpha * X[i]`.
    Ax,
    /// Two source: `Y[i] = alpha * X[i] + Y[i]`.
    Axpy,
    /// Data-dependent taken/not-taken classification of a 0/1 array.
    RandomBranches,
    /// Sieve of Eratosthenes prime count up to `N`.
    Sieve,
}

impl WorkloadKind {
    /// Whether the kernel's reduced result is produced inside the ROI.
    ///
    /// Branch counts and the sieve count are part of the measured loop; the
    /// AX/AXPY sums are computed after the ROI closes.
    pub fn reduces_in_roi(self) -> bool {
        matches!(self, Self::RandomBranches | Self::Sieve)
    }
}

/// Arithmetic element type of a workload's buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// 32-bit signed integer.
    I32,
    /// 32-bit IEEE-754 float.
    #[default]
    F32,
    /// 64-bit IEEE-754 float.
    F64,
}

impl ElementType {
    /// Rust name of the element type.
    pub fn name(self) -> &'static str {
        match self {
            Self::I32 => "i32",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }

    /// Multiplier used when none is configured.
    pub fn default_alpha(self) -> f64 {
        match self {
            Self::I32 => f64::from(DEFAULT_INT_ALPHA),
            Self::F32 | Self::F64 => DEFAULT_FLOAT_ALPHA,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named workload: the CLI vocabulary.
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    /// Name accepted on the command line.
    pub name: &'static str,
    /// Kernel kind.
    pub kind: WorkloadKind,
    /// Element type.
    pub element: ElementType,
    /// One-line description for `roibench list`.
    pub summary: &'static str,
}

/// All named workloads, in listing order.
pub const PRESETS: &[Preset] = &[
    Preset {
        name: "sax",
        kind: WorkloadKind::Ax,
        element: ElementType::F32,
        summary: "Y = alpha * X, single precision",
    },
    Preset {
        name: "dax",
        kind: WorkloadKind::Ax,
        element: ElementType::F64,
        summary: "Y = alpha * X, double precision",
    },
    Preset {
        name: "iax",
        kind: WorkloadKind::Ax,
        element: ElementType::I32,
        summary: "Y = alpha * X, 32-bit integer",
    },
    Preset {
        name: "saxpy",
        kind: WorkloadKind::Axpy,
        element: ElementType::F32,
        summary: "Y = alpha * X + Y, single precision",
    },
    Preset {
        name: "daxpy",
        kind: WorkloadKind::Axpy,
        element: ElementType::F64,
        summary: "Y = alpha * X + Y, double precision",
    },
    Preset {
        name: "iaxpy",
        kind: WorkloadKind::Axpy,
        element: ElementType::I32,
        summary: "Y = alpha * X + Y, 32-bit integer",
    },
    Preset {
        name: "randombranches",
        kind: WorkloadKind::RandomBranches,
        element: ElementType::I32,
        summary: "count taken/not-taken over a random 0/1 array",
    },
    Preset {
        name: "sieve",
        kind: WorkloadKind::Sieve,
        element: ElementType::I32,
        summary: "Sieve of Eratosthenes prime count up to N",
    },
];

/// Looks up a preset by name (case-insensitive; `branches` aliases `randombranches`).
pub fn find_preset(name: &str) -> Option<&'static Preset> {
    let wanted = name.trim().to_ascii_lowercase();
    let wanted = match wanted.as_str() {
        "branches" | "random_branches" | "random-branches" => "randombranches",
        other => other,
    };
    PRESETS.iter().find(|p| p.name == wanted)
}

/// How input data is seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeterminismMode {
    /// Fixed seed: identical inputs on every run.
    Seeded(u64),
    /// Seed drawn from OS entropy: inputs differ between runs.
    Unseeded,
}

impl Default for DeterminismMode {
    fn default() -> Self {
        Self::Seeded(DEFAULT_SEED)
    }
}

/// Opaque parameters passed to the statistics sink at both ROI boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoiMarker {
    /// Counter id (the first `m5_dump_reset_stats` argument).
    pub id: u64,
    /// Variant selector (the second argument).
    pub variant: u64,
}

/// Everything needed to run one workload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkloadSpec {
    /// Kernel kind.
    pub kind: WorkloadKind,
    /// Element type of the AX/AXPY buffers.
    pub element: ElementType,
    size: usize,
    alpha: f64,
    /// Input seeding.
    pub determinism: DeterminismMode,
    /// Parameters forwarded to the statistics sink.
    pub marker: RoiMarker,
}

impl WorkloadSpec {
    /// Creates a spec with the corpus defaults: `N = 4096`, seed 42, default alpha.
    pub fn new(kind: WorkloadKind, element: ElementType) -> Self {
        Self {
            kind,
            element,
            size: DEFAULT_PROBLEM_SIZE,
            alpha: element.default_alpha(),
            determinism: DeterminismMode::default(),
            marker: RoiMarker::default(),
        }
    }

    /// Sets the problem size.
    ///
    /// Negative sizes are the degenerate size 0, which every kernel handles
    /// with a defined zero result. Sizes above [`MAX_PROBLEM_SIZE`] are rejected.
    ///
    /// # Errors
    ///
    /// [`HarnessError::InvalidSize`] when `requested > MAX_PROBLEM_SIZE`.
    pub fn with_size(mut self, requested: i64) -> Result<Self> {
        if requested < 0 {
            warn!(requested, "negative problem size, running the degenerate size 0");
            self.size = 0;
            return Ok(self);
        }
        match usize::try_from(requested) {
            Ok(n) if n <= MAX_PROBLEM_SIZE => {
                self.size = n;
                Ok(self)
            }
            _ => Err(HarnessError::InvalidSize {
                requested,
                max: MAX_PROBLEM_SIZE,
            }),
        }
    }

    /// Sets the AX/AXPY multiplier.
    ///
    /// # Errors
    ///
    /// [`HarnessError::InvalidAlpha`] when the value is not finite, or when an
    /// integer workload is given a fractional or out-of-range multiplier.
    pub fn with_alpha(mut self, alpha: f64) -> Result<Self> {
        let representable = alpha.is_finite()
            && match self.element {
                ElementType::I32 => {
                    alpha.fract() == 0.0
                        && alpha >= f64::from(i32::MIN)
                        && alpha <= f64::from(i32::MAX)
                }
                ElementType::F32 => alpha.abs() <= f64::from(f32::MAX),
                ElementType::F64 => true,
            };
        if !representable {
            return Err(HarnessError::InvalidAlpha {
                alpha,
                element: self.element.name(),
            });
        }
        self.alpha = alpha;
        Ok(self)
    }

    /// Sets the seeding mode.
    pub fn with_determinism(mut self, mode: DeterminismMode) -> Self {
        self.determinism = mode;
        self
    }

    /// Sets the parameters forwarded to the statistics sink.
    pub fn with_marker(mut self, marker: RoiMarker) -> Self {
        self.marker = marker;
        self
    }

    /// Problem size `N`.
    pub fn size(&self) -> usize {
        self.size
    }

    /// AX/AXPY multiplier.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Preset name of this spec (`saxpy`, `sieve`, ...).
    pub fn name(&self) -> &'static str {
        match (self.kind, self.element) {
            (WorkloadKind::Ax, ElementType::F32) => "sax",
            (WorkloadKind::Ax, ElementType::F64) => "dax",
            (WorkloadKind::Ax, ElementType::I32) => "iax",
            (WorkloadKind::Axpy, ElementType::F32) => "saxpy",
            (WorkloadKind::Axpy, ElementType::F64) => "daxpy",
            (WorkloadKind::Axpy, ElementType::I32) => "iaxpy",
            (WorkloadKind::RandomBranches, _) => "randombranches",
            (WorkloadKind::Sieve, _) => "sieve",
        }
    }
}

impl FromStr for WorkloadSpec {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self> {
        find_preset(s)
            .map(|p| Self::new(p.kind, p.element))
            .ok_or_else(|| HarnessError::UnknownWorkload(s.to_string()))
    }
}

impl fmt::Display for WorkloadSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (N={})", self.name(), self.size)
    }
}
