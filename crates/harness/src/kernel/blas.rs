//! AX / AXPY kernels.
//!
//! `Y[i] = alpha * X[i]` and `Y[i] = alpha * X[i] + Y[i]` over `[0, N)`,
//! ascending, one element per iteration. These are the throughput workloads:
//! the measured behavior is the load/multiply/(add)/store stream.

use super::{ComputeKernel, KernelOutput};
use crate::buffer::{Element, VectorPair};
use crate::workload::WorkloadKind;

/// Which BLAS-style operation a [`BlasKernel`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlasOp {
    /// `Y = alpha * X`.
    Ax,
    /// `Y = alpha * X + Y`.
    Axpy,
}

impl BlasOp {
    /// Maps a workload kind to its operation, if it is a BLAS-style kind.
    pub fn from_kind(kind: WorkloadKind) -> Option<Self> {
        match kind {
            WorkloadKind::Ax => Some(Self::Ax),
            WorkloadKind::Axpy => Some(Self::Axpy),
            WorkloadKind::RandomBranches | WorkloadKind::Sieve => None,
        }
    }
}

/// `Y[i] = alpha * X[i]` for every `i`, ascending.
#[inline(always)]
pub fn ax<T: Element>(alpha: T, x: &[T], y: &mut [T]) {
    debug_assert_eq!(x.len(), y.len());
    for (yi, &xi) in y.iter_mut().zip(x) {
        *yi = T::scale(alpha, xi);
    }
}

/// `Y[i] = alpha * X[i] + Y[i]` for every `i`, ascending.
#[inline(always)]
pub fn axpy<T: Element>(alpha: T, x: &[T], y: &mut [T]) {
    debug_assert_eq!(x.len(), y.len());
    for (yi, &xi) in y.iter_mut().zip(x) {
        *yi = T::scale_add(alpha, xi, *yi);
    }
}

/// AX or AXPY over owned vectors of one element type.
#[derive(Debug)]
pub struct BlasKernel<T: Element> {
    op: BlasOp,
    alpha: T,
    vectors: VectorPair<T>,
}

impl<T: Element> BlasKernel<T> {
    /// Takes ownership of the vectors for the duration of the run.
    pub fn new(op: BlasOp, alpha: T, vectors: VectorPair<T>) -> Self {
        Self { op, alpha, vectors }
    }

    /// Returns the destination vector, consuming the kernel.
    pub fn into_y(self) -> Vec<T> {
        self.vectors.y
    }
}

impl<T: Element> ComputeKernel for BlasKernel<T> {
    fn execute(&mut self) {
        let VectorPair { x, y } = &mut self.vectors;
        match self.op {
            BlasOp::Ax => ax(self.alpha, x, y),
            BlasOp::Axpy => axpy(self.alpha, x, y),
        }
    }

    fn output_len(&self) -> usize {
        self.vectors.len()
    }

    fn into_output(self) -> KernelOutput {
        T::wrap_output(self.into_y())
    }
}
