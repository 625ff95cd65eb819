//! Result reduction and reporting.
//!
//! After the ROI closes the reporter folds the kernel's output into a single
//! [`ResultScalar`] and writes exactly one line. The line keeps the result
//! observable so the kernel cannot be eliminated as dead code.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::buffer::Element;
use crate::common::error::{HarnessError, Result};
use crate::kernel::KernelOutput;
use crate::workload::WorkloadSpec;

/// The single value a run reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResultScalar {
    /// Wrapping sum of an integer destination vector.
    I32 {
        /// Sum of `Y`.
        sum: i32,
    },
    /// Sum of a single-precision destination vector.
    F32 {
        /// Sum of `Y`.
        sum: f32,
    },
    /// Sum of a double-precision destination vector.
    F64 {
        /// Sum of `Y`.
        sum: f64,
    },
    /// Branch outcome counts.
    Branches {
        /// Taken outcomes.
        taken: u64,
        /// Not-taken outcomes.
        not_taken: u64,
    },
    /// Sieve prime count.
    Primes {
        /// Primes `<= N`.
        count: u64,
    },
}

impl fmt::Display for ResultScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I32 { sum } => write!(f, "{sum}"),
            Self::F32 { sum } => write!(f, "{sum:.6}"),
            Self::F64 { sum } => write!(f, "{sum:.6}"),
            Self::Branches { taken, not_taken } => {
                write!(f, "# taken: {taken}, # not taken: {not_taken}")
            }
            Self::Primes { count } => write!(f, "{count}"),
        }
    }
}

fn sum<T: Element>(y: &[T]) -> T {
    y.iter().fold(T::default(), |acc, &v| T::accumulate(acc, v))
}

/// Reduces a kernel's output to the value that gets reported.
///
/// Vector sums fold left to right in index order, so float results are
/// reproducible for a given input.
pub fn reduce(output: &KernelOutput) -> ResultScalar {
    match output {
        KernelOutput::I32(y) => ResultScalar::I32 { sum: sum(y) },
        KernelOutput::F32(y) => ResultScalar::F32 { sum: sum(y) },
        KernelOutput::F64(y) => ResultScalar::F64 { sum: sum(y) },
        KernelOutput::Branches { counts, .. } => ResultScalar::Branches {
            taken: counts.taken,
            not_taken: counts.not_taken,
        },
        KernelOutput::Primes { count, .. } => ResultScalar::Primes { count: *count },
    }
}

/// Shape of the result line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// The bare value, printf-compatible with the classic workloads.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl FromStr for ReportFormat {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(HarnessError::UnknownOption {
                option: "format",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

#[derive(Serialize)]
struct JsonLine<'a> {
    workload: &'static str,
    size: usize,
    seed: u64,
    result: &'a ResultScalar,
}

/// Writes the result line of a run.
#[derive(Debug)]
pub struct ResultReporter<W: Write> {
    out: W,
    format: ReportFormat,
}

impl<W: Write> ResultReporter<W> {
    /// Creates a reporter writing to `out`.
    pub fn new(out: W, format: ReportFormat) -> Self {
        Self { out, format }
    }

    /// Reduces `output` and writes exactly one line.
    ///
    /// # Arguments
    ///
    /// * `spec` - The workload that produced `output`.
    /// * `seed` - Seed the inputs were generated with.
    /// * `output` - What the kernel handed back.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Io`] if writing or flushing fails, or
    /// [`HarnessError::Config`] if the JSON line cannot be encoded.
    pub fn report(
        &mut self,
        spec: &WorkloadSpec,
        seed: u64,
        output: &KernelOutput,
    ) -> Result<ResultScalar> {
        let result = reduce(output);
        match self.format {
            ReportFormat::Text => writeln!(self.out, "{result}")?,
            ReportFormat::Json => {
                let line = JsonLine {
                    workload: spec.name(),
                    size: spec.size(),
                    seed,
                    result: &result,
                };
                serde_json::to_writer(&mut self.out, &line)?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()?;
        Ok(result)
    }

    /// Consumes the reporter and returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}
