//! # ROI Controller Tests
//!
//! Begin/end pairing and ordering, unwinding, and sink selection.

use std::cell::RefCell;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use mockall::Sequence;
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use rstest::rstest;

use roibench_core::roi::m5::M5OPS_AVAILABLE;
use roibench_core::roi::{
    HostTimerSink, NullSink, RoiController, SinkDispatch, SinkKind, StatsSink,
};
use roibench_core::workload::RoiMarker;

use crate::common::mocks::sink::{Event, MockSink, RecordingSink};

#[test]
fn test_begin_then_end_exactly_once() {
    let mut sink = MockSink::new();
    let mut seq = Sequence::new();
    let _ = sink.expect_name().return_const("mock");
    let _ = sink
        .expect_begin_roi()
        .with(eq(3), eq(1))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    let _ = sink
        .expect_end_roi()
        .with(eq(3), eq(1))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());

    let mut roi = RoiController::new(sink, RoiMarker { id: 3, variant: 1 });
    let value = roi.run_in_roi(|| 7);
    assert_eq!(value, 7);
    assert_eq!(roi.completed(), 1);
}

#[test]
fn test_kernel_runs_between_signals() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = RecordingSink::new(Rc::clone(&log));
    let mut roi = RoiController::new(sink, RoiMarker::default());

    roi.run_in_roi(|| log.borrow_mut().push(Event::Kernel));

    assert_eq!(
        roi.sink().events(),
        vec![Event::Begin(0, 0), Event::Kernel, Event::End(0, 0)]
    );
}

fn failing_kernel() {
    panic!("kernel failure");
}

#[test]
fn test_end_is_emitted_when_kernel_panics() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut roi = RoiController::new(RecordingSink::new(Rc::clone(&log)), RoiMarker::default());

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        roi.run_in_roi(failing_kernel);
    }));

    assert!(outcome.is_err());
    assert_eq!(*log.borrow(), vec![Event::Begin(0, 0), Event::End(0, 0)]);
    assert_eq!(roi.completed(), 0);
}

#[test]
fn test_repeated_rois_pair_up() {
    let mut roi = RoiController::new(RecordingSink::default(), RoiMarker { id: 1, variant: 2 });
    for _ in 0..3 {
        roi.run_in_roi(|| ());
    }
    assert_eq!(roi.completed(), 3);
    let events = roi.into_sink().events();
    assert_eq!(events.len(), 6);
    for pair in events.chunks(2) {
        assert_eq!(pair, [Event::Begin(1, 2), Event::End(1, 2)]);
    }
}

#[test]
fn test_mutable_reference_is_a_sink() {
    let mut sink = RecordingSink::default();
    {
        let mut roi = RoiController::new(&mut sink, RoiMarker::default());
        roi.run_in_roi(|| ());
    }
    assert_eq!(sink.events().len(), 2);
}

#[test]
fn test_null_sink_is_inert() {
    let mut roi = RoiController::new(NullSink, RoiMarker::default());
    assert_eq!(roi.run_in_roi(|| "done"), "done");
    assert_eq!(roi.sink().name(), "null");
}

#[test]
fn test_timer_sink_records_one_sample_per_roi() {
    let mut roi = RoiController::new(HostTimerSink::new(), RoiMarker { id: 5, variant: 6 });
    let sum: u64 = roi.run_in_roi(|| (0..10_000u64).sum());
    assert_eq!(sum, 49_995_000);

    let samples = roi.sink().samples();
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].id, 5);
    assert_eq!(samples[0].variant, 6);
    assert_eq!(roi.sink().last_sample(), Some(samples[0]));
}

#[rstest]
#[case("null", SinkKind::Null)]
#[case("none", SinkKind::Null)]
#[case("timer", SinkKind::Timer)]
#[case("M5", SinkKind::M5)]
#[case("gem5", SinkKind::M5)]
fn test_sink_kind_parsing(#[case] text: &str, #[case] kind: SinkKind) {
    assert_eq!(text.parse::<SinkKind>().unwrap(), kind);
}

#[test]
fn test_unknown_sink_kind() {
    assert!("papi".parse::<SinkKind>().is_err());
}

#[test]
fn test_dispatch_selects_sink() {
    assert_eq!(SinkDispatch::new(SinkKind::Null).name(), "null");
    assert_eq!(SinkDispatch::new(SinkKind::Timer).name(), "timer");
    assert!(SinkDispatch::new(SinkKind::Timer).timer_samples().is_some());
}

#[test]
fn test_unavailable_m5_degrades_to_null() {
    crate::common::init_tracing();
    let sink = SinkDispatch::new(SinkKind::M5);
    let expected = if M5OPS_AVAILABLE { "m5" } else { "null" };
    assert_eq!(sink.name(), expected);
}
