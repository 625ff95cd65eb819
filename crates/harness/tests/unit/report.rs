//! # Reporter Tests
//!
//! Reduction, line formats, and output failures.

use pretty_assertions::assert_eq;
use rstest::rstest;

use roibench_core::HarnessError;
use roibench_core::kernel::{BranchCounts, KernelOutput};
use roibench_core::report::{ReportFormat, ResultReporter, ResultScalar, reduce};
use roibench_core::workload::WorkloadSpec;

use crate::common::mocks::sink::FailingWriter;

#[rstest]
#[case(ResultScalar::F32 { sum: 3072.5 }, "3072.500000")]
#[case(ResultScalar::F64 { sum: 0.0 }, "0.000000")]
#[case(ResultScalar::F64 { sum: 1.0 / 3.0 }, "0.333333")]
#[case(ResultScalar::I32 { sum: -7 }, "-7")]
#[case(ResultScalar::Primes { count: 564 }, "564")]
#[case(ResultScalar::Branches { taken: 3, not_taken: 1 }, "# taken: 3, # not taken: 1")]
fn test_text_format(#[case] scalar: ResultScalar, #[case] expected: &str) {
    assert_eq!(scalar.to_string(), expected);
}

#[test]
fn test_reduce_sums_vectors() {
    assert_eq!(
        reduce(&KernelOutput::F32(vec![0.5, 0.75, 1.0])),
        ResultScalar::F32 { sum: 2.25 }
    );
    assert_eq!(
        reduce(&KernelOutput::F64(Vec::new())),
        ResultScalar::F64 { sum: 0.0 }
    );
}

#[test]
fn test_integer_sum_wraps() {
    assert_eq!(
        reduce(&KernelOutput::I32(vec![i32::MAX, 1])),
        ResultScalar::I32 { sum: i32::MIN }
    );
}

#[test]
fn test_reduce_passes_in_roi_results_through() {
    let branches = KernelOutput::Branches {
        counts: BranchCounts {
            taken: 10,
            not_taken: 6,
        },
        x: vec![0; 16],
    };
    assert_eq!(
        reduce(&branches),
        ResultScalar::Branches {
            taken: 10,
            not_taken: 6
        }
    );

    let primes = KernelOutput::Primes {
        count: 4,
        flags: vec![true; 11],
    };
    assert_eq!(reduce(&primes), ResultScalar::Primes { count: 4 });
}

#[test]
fn test_text_report_is_one_line() {
    let spec: WorkloadSpec = "iax".parse().unwrap();
    let mut reporter = ResultReporter::new(Vec::new(), ReportFormat::Text);
    let result = reporter
        .report(&spec, 42, &KernelOutput::I32(vec![2, 4, 2]))
        .unwrap();
    assert_eq!(result, ResultScalar::I32 { sum: 8 });
    assert_eq!(String::from_utf8(reporter.into_inner()).unwrap(), "8\n");
}

#[test]
fn test_json_report_fields() {
    let spec: WorkloadSpec = "sieve".parse::<WorkloadSpec>().unwrap().with_size(10).unwrap();
    let mut reporter = ResultReporter::new(Vec::new(), ReportFormat::Json);
    let output = KernelOutput::Primes {
        count: 4,
        flags: vec![true; 11],
    };
    let _ = reporter.report(&spec, 7, &output).unwrap();

    let text = String::from_utf8(reporter.into_inner()).unwrap();
    assert!(text.ends_with('\n'));
    assert_eq!(text.lines().count(), 1);

    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["workload"], "sieve");
    assert_eq!(value["size"], 10);
    assert_eq!(value["seed"], 7);
    assert_eq!(value["result"]["type"], "primes");
    assert_eq!(value["result"]["count"], 4);
}

#[test]
fn test_write_failure_is_io_error() {
    let spec: WorkloadSpec = "sax".parse().unwrap();
    let mut reporter = ResultReporter::new(FailingWriter, ReportFormat::Text);
    let err = reporter
        .report(&spec, 42, &KernelOutput::F32(vec![1.0]))
        .unwrap_err();
    assert!(matches!(err, HarnessError::Io(_)));
}

#[rstest]
#[case("text", ReportFormat::Text)]
#[case("JSON", ReportFormat::Json)]
fn test_format_parsing(#[case] text: &str, #[case] format: ReportFormat) {
    assert_eq!(text.parse::<ReportFormat>().unwrap(), format);
    assert_eq!(format.to_string(), text.to_ascii_lowercase());
}

#[test]
fn test_unknown_format() {
    let err = "yaml".parse::<ReportFormat>().unwrap_err();
    assert!(matches!(err, HarnessError::UnknownOption { option: "format", .. }));
}
