//! # Kernel Tests
//!
//! AX/AXPY arithmetic, branch classification, the sieve, and dispatch.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use roibench_core::HarnessError;
use roibench_core::buffer::{InputBuffer, VectorPair};
use roibench_core::kernel::blas::{ax, axpy};
use roibench_core::kernel::branches::classify_branches;
use roibench_core::kernel::{
    BlasKernel, BlasOp, BranchKernel, ComputeKernel, KernelDispatch, KernelOutput, SieveKernel,
    prime_count,
};
use roibench_core::workload::WorkloadSpec;

#[test]
fn test_ax_scales_every_element() {
    let x = [1.0_f32, 1.5, 2.0];
    let mut y = [9.0_f32; 3];
    ax(0.5, &x, &mut y);
    assert_eq!(y, [0.5, 0.75, 1.0]);
}

#[test]
fn test_axpy_accumulates_into_y() {
    let x = [1.0_f64, 2.0];
    let mut y = [10.0_f64, 20.0];
    axpy(0.5, &x, &mut y);
    assert_eq!(y, [10.5, 21.0]);
}

#[test]
fn test_integer_axpy_wraps() {
    let x = [i32::MAX];
    let mut y = [1];
    axpy(2, &x, &mut y);
    assert_eq!(y, [-1]);
}

#[test]
fn test_blas_kernel_output_length() {
    let vectors = VectorPair {
        x: vec![1_i32, 2, 1, 2],
        y: vec![0; 4],
    };
    let mut kernel = BlasKernel::new(BlasOp::Ax, 2, vectors);
    kernel.execute();
    assert_eq!(kernel.output_len(), 4);
    assert_eq!(kernel.into_output(), KernelOutput::I32(vec![2, 4, 2, 4]));
}

#[rstest]
#[case(-1, 0)]
#[case(0, 0)]
#[case(1, 0)]
#[case(2, 1)]
#[case(10, 4)]
#[case(100, 25)]
#[case(1000, 168)]
#[case(4096, 564)]
fn test_prime_count(#[case] n: i64, #[case] expected: u64) {
    assert_eq!(prime_count(n).unwrap(), expected);
}

#[rstest]
#[case(i64::MAX)]
#[case((1_i64 << 28) + 1)]
fn test_prime_count_rejects_oversized_n(#[case] n: i64) {
    match prime_count(n) {
        Err(HarnessError::InvalidSize { requested, .. }) => assert_eq!(requested, n),
        other => panic!("expected InvalidSize, got {other:?}"),
    }
}

#[test]
fn test_sieve_kernel_counts_inside_execute() {
    let mut kernel = SieveKernel::new(vec![true; 4097]);
    assert_eq!(kernel.count(), 0);
    kernel.execute();
    assert_eq!(kernel.count(), 564);
    assert_eq!(kernel.output_len(), 4097);
    match kernel.into_output() {
        KernelOutput::Primes { count, flags } => {
            assert_eq!(count, 564);
            assert!(flags[2] && flags[4093] && !flags[4095]);
        }
        other => panic!("unexpected output {other:?}"),
    }
}

#[test]
fn test_branch_classification() {
    let counts = classify_branches(&[1, 0, 1, 1, 0]);
    assert_eq!(counts.taken, 3);
    assert_eq!(counts.not_taken, 2);

    let empty = classify_branches(&[]);
    assert_eq!(empty.total(), 0);
}

#[test]
fn test_branch_kernel_hands_back_array() {
    let mut kernel = BranchKernel::new(vec![0, 1, 1]);
    kernel.execute();
    assert_eq!(kernel.counts().taken, 2);
    let output = kernel.into_output();
    assert_eq!(output.len(), 3);
}

#[test]
fn test_dispatch_rejects_mismatched_buffer() {
    let spec: WorkloadSpec = "sieve".parse().unwrap();
    let err = KernelDispatch::new(&spec, InputBuffer::Branches(vec![1, 0])).unwrap_err();
    assert!(matches!(
        err,
        HarnessError::KernelMismatch {
            workload: "sieve",
            buffer: "branch array"
        }
    ));

    let spec: WorkloadSpec = "saxpy".parse().unwrap();
    let wrong_type = InputBuffer::F64(VectorPair {
        x: vec![1.0],
        y: vec![1.0],
    });
    assert!(KernelDispatch::new(&spec, wrong_type).is_err());
}

#[test]
fn test_dispatch_runs_selected_kernel() {
    let spec: WorkloadSpec = "iax".parse().unwrap();
    let input = InputBuffer::I32(VectorPair {
        x: vec![1, 2, 2],
        y: vec![0; 3],
    });
    let mut kernel = KernelDispatch::new(&spec, input).unwrap();
    kernel.execute();
    assert_eq!(kernel.into_output(), KernelOutput::I32(vec![2, 4, 4]));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_branch_counts_cover_input(x in prop::collection::vec(0u8..=1, 0..4096)) {
        let counts = classify_branches(&x);
        prop_assert_eq!(counts.total(), x.len() as u64);
        prop_assert_eq!(counts.taken, x.iter().filter(|&&v| v != 0).count() as u64);
    }

    #[test]
    fn prop_integer_axpy_is_exact(
        alpha in any::<i32>(),
        pairs in prop::collection::vec((any::<i32>(), any::<i32>()), 0..512),
    ) {
        let x: Vec<i32> = pairs.iter().map(|p| p.0).collect();
        let y0: Vec<i32> = pairs.iter().map(|p| p.1).collect();
        let mut y = y0.clone();
        axpy(alpha, &x, &mut y);
        for i in 0..x.len() {
            prop_assert_eq!(y[i], alpha.wrapping_mul(x[i]).wrapping_add(y0[i]));
        }
    }

    #[test]
    fn prop_float_axpy_matches_formula(
        alpha in 0.0f32..4.0,
        pairs in prop::collection::vec((1.0f32..2.0, 1.0f32..2.0), 0..512),
    ) {
        let x: Vec<f32> = pairs.iter().map(|p| p.0).collect();
        let y0: Vec<f32> = pairs.iter().map(|p| p.1).collect();
        let mut y = y0.clone();
        axpy(alpha, &x, &mut y);
        for i in 0..x.len() {
            let expected = alpha * x[i] + y0[i];
            prop_assert!((y[i] - expected).abs() <= 1e-5 * expected.abs().max(1.0));
        }
    }

    #[test]
    fn prop_sieve_matches_trial_division(n in 0i64..2000) {
        let naive = (2..=n).filter(|&k| (2..k).take_while(|d| d * d <= k).all(|d| k % d != 0)).count();
        prop_assert_eq!(prime_count(n).unwrap(), naive as u64);
    }
}
