//! Workload driver.
//!
//! Sequences one run through `Init → Generate → Execute → Report → Terminate`.
//! Each state is entered exactly once and only from its predecessor; the ROI
//! exists only inside `Execute`, so nothing after the kernel (reduction,
//! formatting, I/O) is measured.

use std::fmt;
use std::io::Write;

use serde::Serialize;
use tracing::{debug, info};

use crate::common::error::{HarnessError, Result};
use crate::generator::DataGenerator;
use crate::kernel::{ComputeKernel, KernelDispatch};
use crate::report::{ResultReporter, ResultScalar};
use crate::roi::{RoiController, StatsSink};
use crate::workload::WorkloadSpec;

/// Lifecycle state of a [`WorkloadDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DriverState {
    /// Constructed, nothing allocated.
    Init,
    /// Filling input buffers.
    Generate,
    /// Kernel running inside the ROI.
    Execute,
    /// ROI closed, result being written.
    Report,
    /// Run finished.
    Terminate,
}

impl DriverState {
    /// Lowercase state name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Generate => "generate",
            Self::Execute => "execute",
            Self::Report => "report",
            Self::Terminate => "terminate",
        }
    }

    /// The only state this one may advance to.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Init => Some(Self::Generate),
            Self::Generate => Some(Self::Execute),
            Self::Execute => Some(Self::Report),
            Self::Report => Some(Self::Terminate),
            Self::Terminate => None,
        }
    }
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a finished run hands back to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    /// Preset name of the workload.
    pub workload: &'static str,
    /// The reported value.
    pub result: ResultScalar,
    /// Seed the inputs were generated with.
    pub seed: u64,
    /// Number of ROIs closed (always 1 for a successful run).
    pub rois: u64,
    /// Length of the kernel's output buffer.
    pub output_len: usize,
}

/// Runs exactly one workload.
#[derive(Debug)]
pub struct WorkloadDriver<S: StatsSink> {
    spec: WorkloadSpec,
    roi: RoiController<S>,
    state: DriverState,
}

impl<S: StatsSink> WorkloadDriver<S> {
    /// Creates a driver in `Init` that will signal `sink` around the kernel.
    pub fn new(spec: WorkloadSpec, sink: S) -> Self {
        let roi = RoiController::new(sink, spec.marker);
        Self {
            spec,
            roi,
            state: DriverState::Init,
        }
    }

    fn advance(&mut self, to: DriverState) -> Result<()> {
        if self.state.next() != Some(to) {
            return Err(HarnessError::InvalidTransition {
                from: self.state.name(),
                to: to.name(),
            });
        }
        debug!(from = %self.state, to = %to, "driver transition");
        self.state = to;
        Ok(())
    }

    /// Generates inputs, runs the kernel inside the ROI, and reports the result.
    ///
    /// # Arguments
    ///
    /// * `reporter` - Receives exactly one result line.
    ///
    /// # Errors
    ///
    /// Allocation and I/O failures abort the run before anything is printed
    /// for it. Calling `run` a second time on the same driver is an
    /// [`HarnessError::InvalidTransition`].
    pub fn run<W: Write>(&mut self, reporter: &mut ResultReporter<W>) -> Result<RunSummary> {
        self.advance(DriverState::Generate)?;
        let mut generator = DataGenerator::new(self.spec.determinism);
        let input = generator.generate(&self.spec)?;
        let seed = generator.seed();
        let mut kernel = KernelDispatch::new(&self.spec, input)?;

        self.advance(DriverState::Execute)?;
        debug!(
            workload = self.spec.name(),
            reduces_in_roi = self.spec.kind.reduces_in_roi(),
            "entering roi"
        );
        self.roi.run_in_roi(|| kernel.execute());

        self.advance(DriverState::Report)?;
        let output_len = kernel.output_len();
        let output = kernel.into_output();
        let result = reporter.report(&self.spec, seed, &output)?;

        self.advance(DriverState::Terminate)?;
        info!(workload = self.spec.name(), size = self.spec.size(), seed, "run complete");
        Ok(RunSummary {
            workload: self.spec.name(),
            result,
            seed,
            rois: self.roi.completed(),
            output_len,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// The workload being run.
    pub fn spec(&self) -> &WorkloadSpec {
        &self.spec
    }

    /// The statistics sink, for reading back what it recorded.
    pub fn sink(&self) -> &S {
        self.roi.sink()
    }

    /// Consumes the driver and returns the sink.
    pub fn into_sink(self) -> S {
        self.roi.into_sink()
    }
}
