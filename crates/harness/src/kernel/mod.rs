//! Compute kernels.
//!
//! This module contains the workload kernels the ROI wraps: AX/AXPY over
//! `i32`, `f32` and `f64`, the random-branch classifier, and the sieve.
//! Kernels only touch the buffers they own and know nothing about the ROI
//! or the statistics sink.

pub use self::blas::{BlasKernel, BlasOp};
pub use self::branches::{BranchCounts, BranchKernel};
pub use self::sieve::{SieveKernel, prime_count};

/// AX / AXPY kernels.
pub mod blas;

/// Random-branch classification kernel.
pub mod branches;

/// Sieve of Eratosthenes kernel.
pub mod sieve;

use crate::buffer::{Element, InputBuffer};
use crate::common::error::{HarnessError, Result};
use crate::workload::{ElementType, WorkloadKind, WorkloadSpec};

/// A workload kernel that owns its buffers.
pub trait ComputeKernel {
    /// Runs the kernel once over its buffers. This is the measured region.
    fn execute(&mut self);

    /// Length of the buffer the kernel writes (`N`, or `N + 1` for the sieve).
    fn output_len(&self) -> usize;

    /// Hands the output buffer (and any in-ROI result) to the reporter.
    fn into_output(self) -> KernelOutput;
}

/// What a kernel hands back after its ROI closes.
#[derive(Debug, Clone, PartialEq)]
pub enum KernelOutput {
    /// Integer destination vector.
    I32(Vec<i32>),
    /// Single-precision destination vector.
    F32(Vec<f32>),
    /// Double-precision destination vector.
    F64(Vec<f64>),
    /// Branch outcome counts plus the classified array.
    Branches {
        /// Counts produced inside the ROI.
        counts: BranchCounts,
        /// The classified array.
        x: Vec<u8>,
    },
    /// Prime count plus the marked flags.
    Primes {
        /// Count produced inside the ROI.
        count: u64,
        /// Flags after marking (`N + 1` entries).
        flags: Vec<bool>,
    },
}

impl KernelOutput {
    /// Length of the output buffer.
    pub fn len(&self) -> usize {
        match self {
            Self::I32(y) => y.len(),
            Self::F32(y) => y.len(),
            Self::F64(y) => y.len(),
            Self::Branches { x, .. } => x.len(),
            Self::Primes { flags, .. } => flags.len(),
        }
    }

    /// Returns true when the output buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Enum wrapper for static dispatch over the kernel variants.
///
/// One variant per buffer shape; the driver builds it from a spec and the
/// generator's buffer, then calls [`ComputeKernel::execute`] inside the ROI.
#[derive(Debug)]
pub enum KernelDispatch {
    /// AX/AXPY over `i32`.
    I32(BlasKernel<i32>),
    /// AX/AXPY over `f32`.
    F32(BlasKernel<f32>),
    /// AX/AXPY over `f64`.
    F64(BlasKernel<f64>),
    /// Random branches.
    Branches(BranchKernel),
    /// Sieve.
    Sieve(SieveKernel),
}

impl KernelDispatch {
    /// Builds the kernel for `spec`, taking ownership of `input`.
    ///
    /// # Errors
    ///
    /// [`HarnessError::KernelMismatch`] when the buffer shape does not belong
    /// to the spec's kind and element type.
    pub fn new(spec: &WorkloadSpec, input: InputBuffer) -> Result<Self> {
        let op = BlasOp::from_kind(spec.kind);
        let alpha = spec.alpha();
        match (op, input) {
            (Some(op), InputBuffer::I32(v)) if spec.element == ElementType::I32 => {
                Ok(Self::I32(BlasKernel::new(op, i32::from_alpha(alpha), v)))
            }
            (Some(op), InputBuffer::F32(v)) if spec.element == ElementType::F32 => {
                Ok(Self::F32(BlasKernel::new(op, f32::from_alpha(alpha), v)))
            }
            (Some(op), InputBuffer::F64(v)) if spec.element == ElementType::F64 => {
                Ok(Self::F64(BlasKernel::new(op, f64::from_alpha(alpha), v)))
            }
            (None, InputBuffer::Branches(x)) if spec.kind == WorkloadKind::RandomBranches => {
                Ok(Self::Branches(BranchKernel::new(x)))
            }
            (None, InputBuffer::Sieve(flags)) if spec.kind == WorkloadKind::Sieve => {
                Ok(Self::Sieve(SieveKernel::new(flags)))
            }
            (_, other) => Err(HarnessError::KernelMismatch {
                workload: spec.name(),
                buffer: other.label(),
            }),
        }
    }
}

impl ComputeKernel for KernelDispatch {
    #[inline(always)]
    fn execute(&mut self) {
        match self {
            Self::I32(k) => k.execute(),
            Self::F32(k) => k.execute(),
            Self::F64(k) => k.execute(),
            Self::Branches(k) => k.execute(),
            Self::Sieve(k) => k.execute(),
        }
    }

    fn output_len(&self) -> usize {
        match self {
            Self::I32(k) => k.output_len(),
            Self::F32(k) => k.output_len(),
            Self::F64(k) => k.output_len(),
            Self::Branches(k) => k.output_len(),
            Self::Sieve(k) => k.output_len(),
        }
    }

    fn into_output(self) -> KernelOutput {
        match self {
            Self::I32(k) => k.into_output(),
            Self::F32(k) => k.into_output(),
            Self::F64(k) => k.into_output(),
            Self::Branches(k) => k.into_output(),
            Self::Sieve(k) => k.into_output(),
        }
    }
}
