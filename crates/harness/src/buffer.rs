//! Workload buffers and element arithmetic.
//!
//! Buffers are plain owned vectors. The generator creates them, the kernel
//! takes ownership for the ROI, and the reporter consumes what the kernel
//! hands back. Nothing is global and nothing is shared.

use std::fmt;

use crate::common::error::{HarnessError, Result};
use crate::kernel::KernelOutput;
use crate::workload::ElementType;

/// Arithmetic the AX/AXPY kernels need from an element type.
///
/// Integer arithmetic wraps, so overflow has defined behavior at any `N`.
/// Floating-point `scale_add` is a separate multiply and add (no fused
/// rounding) to keep the two-instruction shape the simulator should see.
pub trait Element: Copy + Default + PartialEq + fmt::Debug + fmt::Display + Send + 'static {
    /// Tag of this element type.
    const TYPE: ElementType;

    /// Converts a configured multiplier into this type.
    fn from_alpha(alpha: f64) -> Self;

    /// `alpha * x`.
    fn scale(alpha: Self, x: Self) -> Self;

    /// `alpha * x + y`.
    fn scale_add(alpha: Self, x: Self, y: Self) -> Self;

    /// `acc + value`, used by the post-ROI reduction.
    fn accumulate(acc: Self, value: Self) -> Self;

    /// Wraps a destination vector in the matching [`KernelOutput`] variant.
    fn wrap_output(y: Vec<Self>) -> KernelOutput;
}

impl Element for i32 {
    const TYPE: ElementType = ElementType::I32;

    fn wrap_output(y: Vec<Self>) -> KernelOutput {
        KernelOutput::I32(y)
    }

    fn from_alpha(alpha: f64) -> Self {
        alpha as Self
    }

    #[inline(always)]
    fn scale(alpha: Self, x: Self) -> Self {
        alpha.wrapping_mul(x)
    }

    #[inline(always)]
    fn scale_add(alpha: Self, x: Self, y: Self) -> Self {
        alpha.wrapping_mul(x).wrapping_add(y)
    }

    #[inline(always)]
    fn accumulate(acc: Self, value: Self) -> Self {
        acc.wrapping_add(value)
    }
}

impl Element for f32 {
    const TYPE: ElementType = ElementType::F32;

    fn wrap_output(y: Vec<Self>) -> KernelOutput {
        KernelOutput::F32(y)
    }

    fn from_alpha(alpha: f64) -> Self {
        alpha as Self
    }

    #[inline(always)]
    fn scale(alpha: Self, x: Self) -> Self {
        alpha * x
    }

    #[inline(always)]
    fn scale_add(alpha: Self, x: Self, y: Self) -> Self {
        alpha * x + y
    }

    #[inline(always)]
    fn accumulate(acc: Self, value: Self) -> Self {
        acc + value
    }
}

impl Element for f64 {
    const TYPE: ElementType = ElementType::F64;

    fn wrap_output(y: Vec<Self>) -> KernelOutput {
        KernelOutput::F64(y)
    }

    fn from_alpha(alpha: f64) -> Self {
        alpha
    }

    #[inline(always)]
    fn scale(alpha: Self, x: Self) -> Self {
        alpha * x
    }

    #[inline(always)]
    fn scale_add(alpha: Self, x: Self, y: Self) -> Self {
        alpha * x + y
    }

    #[inline(always)]
    fn accumulate(acc: Self, value: Self) -> Self {
        acc + value
    }
}

/// Source and destination vectors of an AX/AXPY workload.
///
/// `x` and `y` always have the same length `N`.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorPair<T> {
    /// Source vector (read only during the kernel).
    pub x: Vec<T>,
    /// Destination vector (also a source for AXPY).
    pub y: Vec<T>,
}

impl<T> VectorPair<T> {
    /// Number of elements in each vector.
    pub fn len(&self) -> usize {
        self.y.len()
    }

    /// Returns true when `N == 0`.
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }
}

/// Input of one workload run, as produced by the data generator.
#[derive(Debug, Clone, PartialEq)]
pub enum InputBuffer {
    /// Integer AX/AXPY vectors.
    I32(VectorPair<i32>),
    /// Single-precision AX/AXPY vectors.
    F32(VectorPair<f32>),
    /// Double-precision AX/AXPY vectors.
    F64(VectorPair<f64>),
    /// Random 0/1 array driving the branch kernel.
    Branches(Vec<u8>),
    /// `N + 1` primality flags, all `true`.
    Sieve(Vec<bool>),
}

impl InputBuffer {
    /// Length of the buffer the kernel writes (`N`, or `N + 1` for the sieve).
    pub fn len(&self) -> usize {
        match self {
            Self::I32(v) => v.len(),
            Self::F32(v) => v.len(),
            Self::F64(v) => v.len(),
            Self::Branches(x) => x.len(),
            Self::Sieve(flags) => flags.len(),
        }
    }

    /// Returns true when the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short name of the variant, used in diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::I32(_) => "i32 vectors",
            Self::F32(_) => "f32 vectors",
            Self::F64(_) => "f64 vectors",
            Self::Branches(_) => "branch array",
            Self::Sieve(_) => "sieve flags",
        }
    }
}

/// Reserves an empty vector able to hold `elements` values without reallocating.
///
/// # Errors
///
/// [`HarnessError::Allocation`] when the allocator cannot satisfy the request.
pub fn reserve<T>(buffer: &'static str, elements: usize) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(elements)
        .map_err(|source| HarnessError::Allocation {
            buffer,
            elements,
            source,
        })?;
    Ok(v)
}

/// Allocates a vector of `elements` copies of `value`.
///
/// # Errors
///
/// [`HarnessError::Allocation`] when the allocator cannot satisfy the request.
pub fn filled<T: Clone>(buffer: &'static str, elements: usize, value: T) -> Result<Vec<T>> {
    let mut v = reserve(buffer, elements)?;
    v.resize(elements, value);
    Ok(v)
}
