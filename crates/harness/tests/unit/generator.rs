//! # Data Generator Tests
//!
//! Distribution ranges, buffer shapes, and seeded reproducibility.

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use roibench_core::buffer::InputBuffer;
use roibench_core::generator::DataGenerator;
use roibench_core::workload::{DeterminismMode, ElementType, WorkloadKind, WorkloadSpec};

fn spec(name: &str, size: i64) -> WorkloadSpec {
    name.parse::<WorkloadSpec>().unwrap().with_size(size).unwrap()
}

fn generate(name: &str, size: i64, seed: u64) -> InputBuffer {
    DataGenerator::new(DeterminismMode::Seeded(seed))
        .generate(&spec(name, size))
        .unwrap()
}

#[test]
fn test_float_elements_in_unit_interval_above_one() {
    let InputBuffer::F32(v) = generate("saxpy", 4096, 42) else {
        panic!("expected f32 vectors");
    };
    assert_eq!(v.x.len(), 4096);
    assert_eq!(v.y.len(), 4096);
    assert!(v.x.iter().chain(&v.y).all(|&e| (1.0..2.0).contains(&e)));

    let InputBuffer::F64(v) = generate("daxpy", 4096, 42) else {
        panic!("expected f64 vectors");
    };
    assert!(v.x.iter().chain(&v.y).all(|&e| (1.0..2.0).contains(&e)));
}

#[test]
fn test_integer_elements_are_one_or_two() {
    let InputBuffer::I32(v) = generate("iaxpy", 4096, 42) else {
        panic!("expected i32 vectors");
    };
    assert!(v.x.iter().chain(&v.y).all(|&e| e == 1 || e == 2));
    assert!(v.x.contains(&1) && v.x.contains(&2));
}

#[test]
fn test_single_source_destination_starts_zeroed() {
    let InputBuffer::F32(v) = generate("sax", 256, 42) else {
        panic!("expected f32 vectors");
    };
    assert!(v.y.iter().all(|&e| e == 0.0));

    let InputBuffer::I32(v) = generate("iax", 256, 42) else {
        panic!("expected i32 vectors");
    };
    assert!(v.y.iter().all(|&e| e == 0));
}

#[test]
fn test_branch_array_is_bernoulli() {
    let InputBuffer::Branches(x) = generate("randombranches", 4096, 42) else {
        panic!("expected branch array");
    };
    assert_eq!(x.len(), 4096);
    assert!(x.iter().all(|&b| b <= 1));
    let ones = x.iter().filter(|&&b| b == 1).count();
    assert!((1024..=3072).contains(&ones), "ones = {ones}");
}

#[test]
fn test_sieve_flags_are_all_prime() {
    let InputBuffer::Sieve(flags) = generate("sieve", 4096, 42) else {
        panic!("expected sieve flags");
    };
    assert_eq!(flags.len(), 4097);
    assert!(flags.iter().all(|&f| f));

    let InputBuffer::Sieve(flags) = generate("sieve", 0, 42) else {
        panic!("expected sieve flags");
    };
    assert_eq!(flags.len(), 1);
}

#[test]
fn test_zero_size_yields_empty_vectors() {
    for name in ["sax", "saxpy", "daxpy", "iax", "iaxpy", "randombranches"] {
        let buffer = generate(name, 0, 42);
        assert!(buffer.is_empty(), "{name}");
    }
}

#[test]
fn test_seeded_runs_are_identical() {
    for name in ["saxpy", "daxpy", "iaxpy", "randombranches"] {
        assert_eq!(generate(name, 1024, 42), generate(name, 1024, 42), "{name}");
    }
}

#[test]
fn test_different_seeds_differ() {
    assert_ne!(generate("saxpy", 1024, 1), generate("saxpy", 1024, 2));
}

#[test]
fn test_unseeded_run_can_be_replayed() {
    let spec = spec("daxpy", 512);
    let mut unseeded = DataGenerator::new(DeterminismMode::Unseeded);
    let first = unseeded.generate(&spec).unwrap();
    let replay = DataGenerator::new(DeterminismMode::Seeded(unseeded.seed()))
        .generate(&spec)
        .unwrap();
    assert_eq!(first, replay);
}

#[test]
fn test_generator_reports_its_seed() {
    let spec = WorkloadSpec::new(WorkloadKind::Axpy, ElementType::F32)
        .with_size(16)
        .unwrap();
    let a = DataGenerator::new(DeterminismMode::Seeded(9)).generate(&spec).unwrap();
    let mut generator = DataGenerator::new(DeterminismMode::Seeded(9));
    assert_eq!(generator.seed(), 9);
    assert_eq!(generator.generate(&spec).unwrap(), a);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_buffer_length_matches_size(size in 0i64..2048, seed in any::<u64>()) {
        for name in ["sax", "saxpy", "daxpy", "iax", "iaxpy", "randombranches"] {
            let buffer = generate(name, size, seed);
            prop_assert_eq!(buffer.len(), size as usize);
        }
        prop_assert_eq!(generate("sieve", size, seed).len(), size as usize + 1);
    }
}
