//! Region-of-interest control.
//!
//! This module is the only part of the harness aware of the external
//! statistics collector. It provides:
//! 1. **Sink interface:** [`StatsSink`] with `begin_roi` / `end_roi`, both
//!    fire-and-forget and safe to call with no simulator attached.
//! 2. **Sinks:** a no-op default, a host timer probe, and the gem5
//!    dump-and-reset pseudo-instruction (feature `m5ops`).
//! 3. **Controller:** [`RoiController::run_in_roi`], which emits exactly one
//!    `begin` and one `end` around a kernel invocation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::common::error::HarnessError;
use crate::workload::RoiMarker;

/// gem5 pseudo-instruction sink.
pub mod m5;

/// Host timer probe sink.
pub mod timer;

pub use m5::M5Sink;
pub use timer::{HostTimerSink, RoiSample};

/// External statistics collector controlled at ROI boundaries.
///
/// Both operations take two opaque integers (counter id, variant selector),
/// return nothing, and must never fail the workload.
pub trait StatsSink {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Called immediately before the kernel runs.
    fn begin_roi(&mut self, id: u64, variant: u64);

    /// Called immediately after the kernel returns.
    fn end_roi(&mut self, id: u64, variant: u64);
}

impl<S: StatsSink + ?Sized> StatsSink for &mut S {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn begin_roi(&mut self, id: u64, variant: u64) {
        (**self).begin_roi(id, variant);
    }

    fn end_roi(&mut self, id: u64, variant: u64) {
        (**self).end_roi(id, variant);
    }
}

/// Sink that ignores both signals.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl StatsSink for NullSink {
    fn name(&self) -> &'static str {
        "null"
    }

    fn begin_roi(&mut self, _id: u64, _variant: u64) {}

    fn end_roi(&mut self, _id: u64, _variant: u64) {}
}

/// Which sink a run should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// No-op.
    #[default]
    Null,
    /// Host timer probes.
    Timer,
    /// gem5 dump-and-reset.
    M5,
}

impl FromStr for SinkKind {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "null" | "none" => Ok(Self::Null),
            "timer" | "host" => Ok(Self::Timer),
            "m5" | "gem5" => Ok(Self::M5),
            _ => Err(HarnessError::UnknownOption {
                option: "sink",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Null => "null",
            Self::Timer => "timer",
            Self::M5 => "m5",
        })
    }
}

/// Enum wrapper for static dispatch of the built-in sinks.
#[derive(Debug)]
pub enum SinkDispatch {
    /// No-op.
    Null(NullSink),
    /// Host timer probes.
    Timer(HostTimerSink),
    /// gem5 dump-and-reset.
    M5(M5Sink),
}

impl SinkDispatch {
    /// Builds the requested sink.
    ///
    /// An unavailable gem5 sink degrades to the no-op sink with a warning;
    /// a missing collector is never fatal.
    pub fn new(kind: SinkKind) -> Self {
        match kind {
            SinkKind::Null => Self::Null(NullSink),
            SinkKind::Timer => Self::Timer(HostTimerSink::new()),
            SinkKind::M5 => M5Sink::new().map_or_else(
                || {
                    warn!("m5ops not available in this build, ROI markers are no-ops");
                    Self::Null(NullSink)
                },
                Self::M5,
            ),
        }
    }

    /// Timer samples, when this is the timer sink.
    pub fn timer_samples(&self) -> Option<&[RoiSample]> {
        match self {
            Self::Timer(t) => Some(t.samples()),
            Self::Null(_) | Self::M5(_) => None,
        }
    }
}

impl StatsSink for SinkDispatch {
    fn name(&self) -> &'static str {
        match self {
            Self::Null(s) => s.name(),
            Self::Timer(s) => s.name(),
            Self::M5(s) => s.name(),
        }
    }

    #[inline(always)]
    fn begin_roi(&mut self, id: u64, variant: u64) {
        match self {
            Self::Null(s) => s.begin_roi(id, variant),
            Self::Timer(s) => s.begin_roi(id, variant),
            Self::M5(s) => s.begin_roi(id, variant),
        }
    }

    #[inline(always)]
    fn end_roi(&mut self, id: u64, variant: u64) {
        match self {
            Self::Null(s) => s.end_roi(id, variant),
            Self::Timer(s) => s.end_roi(id, variant),
            Self::M5(s) => s.end_roi(id, variant),
        }
    }
}

/// Closes the ROI when dropped, so `end` is emitted even if the kernel unwinds.
struct RoiGuard<'a, S: StatsSink> {
    sink: &'a mut S,
    marker: RoiMarker,
}

impl<'a, S: StatsSink> RoiGuard<'a, S> {
    fn open(sink: &'a mut S, marker: RoiMarker) -> Self {
        sink.begin_roi(marker.id, marker.variant);
        Self { sink, marker }
    }
}

impl<S: StatsSink> Drop for RoiGuard<'_, S> {
    fn drop(&mut self) {
        self.sink.end_roi(self.marker.id, self.marker.variant);
    }
}

/// Wraps kernel invocations in begin/end signals.
///
/// `run_in_roi` borrows the controller mutably for the whole invocation, so a
/// kernel cannot open a nested ROI.
#[derive(Debug)]
pub struct RoiController<S: StatsSink> {
    sink: S,
    marker: RoiMarker,
    completed: u64,
}

impl<S: StatsSink> RoiController<S> {
    /// Creates a controller that signals `sink` with `marker`.
    pub fn new(sink: S, marker: RoiMarker) -> Self {
        Self {
            sink,
            marker,
            completed: 0,
        }
    }

    /// Runs `kernel` between exactly one `begin_roi` and one `end_roi`.
    pub fn run_in_roi<R>(&mut self, kernel: impl FnOnce() -> R) -> R {
        debug!(sink = self.sink.name(), id = self.marker.id, "roi begin");
        let guard = RoiGuard::open(&mut self.sink, self.marker);
        let result = kernel();
        drop(guard);
        self.completed += 1;
        debug!(sink = self.sink.name(), id = self.marker.id, "roi end");
        result
    }

    /// Number of ROIs closed so far.
    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Marker passed to the sink.
    pub fn marker(&self) -> RoiMarker {
        self.marker
    }

    /// The sink, for reading back timer samples.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consumes the controller and returns the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}
