//! Host timer probe sink.
//!
//! When the workload runs natively (no simulator attached), the ROI markers
//! become timer probes: wall-clock nanoseconds plus the CPU's cycle counter
//! (RDTSCP on x86_64, CNTVCT_EL0 on AArch64, zero elsewhere).

use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use super::StatsSink;

/// Reads the CPU cycle/tick counter.
#[cfg(target_arch = "x86_64")]
#[inline(always)]
fn read_cycles() -> u64 {
    let mut aux: u32 = 0;
    // SAFETY: RDTSCP is available on every x86_64 CPU this harness targets
    // and only writes the provided `aux` slot.
    unsafe { std::arch::x86_64::__rdtscp(&mut aux) }
}

/// Reads the virtual counter timer (comparable to the x86 TSC).
#[cfg(target_arch = "aarch64")]
#[inline(always)]
fn read_cycles() -> u64 {
    let cnt: u64;
    // SAFETY: CNTVCT_EL0 is readable from EL0 on all AArch64 implementations
    // and the read has no side effects.
    unsafe {
        std::arch::asm!("mrs {}, cntvct_el0", out(reg) cnt, options(nostack, nomem));
    }
    cnt
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
#[inline(always)]
fn read_cycles() -> u64 {
    0
}

/// Whether this platform provides a real cycle counter.
pub const HAS_CYCLE_COUNTER: bool = cfg!(target_arch = "x86_64") || cfg!(target_arch = "aarch64");

/// One measured ROI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoiSample {
    /// Marker id the ROI was opened with.
    pub id: u64,
    /// Marker variant the ROI was opened with.
    pub variant: u64,
    /// Wall-clock duration in nanoseconds.
    pub nanos: u64,
    /// Cycle-counter delta (0 without a cycle counter).
    pub cycles: u64,
}

/// Sink that times each ROI on the host.
#[derive(Debug, Default)]
pub struct HostTimerSink {
    open: Option<(Instant, u64)>,
    samples: Vec<RoiSample>,
}

impl HostTimerSink {
    /// Creates a sink with no samples.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every completed ROI, in order.
    pub fn samples(&self) -> &[RoiSample] {
        &self.samples
    }

    /// The most recently completed ROI.
    pub fn last_sample(&self) -> Option<RoiSample> {
        self.samples.last().copied()
    }
}

impl StatsSink for HostTimerSink {
    fn name(&self) -> &'static str {
        "timer"
    }

    fn begin_roi(&mut self, _id: u64, _variant: u64) {
        let cycles = read_cycles();
        self.open = Some((Instant::now(), cycles));
    }

    fn end_roi(&mut self, id: u64, variant: u64) {
        let cycles_end = read_cycles();
        let Some((start, cycles_start)) = self.open.take() else {
            warn!(id, variant, "end_roi without a matching begin_roi");
            return;
        };
        let sample = RoiSample {
            id,
            variant,
            nanos: start.elapsed().as_nanos() as u64,
            cycles: cycles_end.saturating_sub(cycles_start),
        };
        info!(
            id,
            variant,
            nanos = sample.nanos,
            cycles = sample.cycles,
            "roi closed"
        );
        self.samples.push(sample);
    }
}
