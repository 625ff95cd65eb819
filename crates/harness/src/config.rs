//! Run configuration.
//!
//! This module defines the knobs of one workload run. It provides:
//! 1. **Defaults:** problem size, seed and ROI marker of the classic workloads.
//! 2. **Structures:** `workload`, `roi` and `report` sections.
//! 3. **Resolution:** [`Config::workload_spec`] turns a preset name plus the
//!    configuration into a validated [`WorkloadSpec`].
//!
//! The CLI fills a `Config` from its flags; library users can deserialize one
//! from JSON with [`Config::from_json`]. Every field is optional.

use serde::{Deserialize, Serialize};

use crate::common::error::Result;
use crate::report::ReportFormat;
use crate::roi::SinkKind;
use crate::workload::{DeterminismMode, RoiMarker, WorkloadSpec};

/// Default configuration constants.
mod defaults {
    /// Problem size of every classic workload.
    pub const SIZE: i64 = crate::common::constants::DEFAULT_PROBLEM_SIZE as i64;

    /// Seed of seeded runs.
    pub const SEED: u64 = crate::common::constants::DEFAULT_SEED;

    /// Counter id passed to the sink (`m5_dump_reset_stats(0, 0)`).
    pub const ROI_ID: u64 = 0;

    /// Variant selector passed to the sink.
    pub const ROI_VARIANT: u64 = 0;
}

/// Root configuration of a run.
///
/// # Examples
///
/// ```
/// use roibench_core::config::Config;
/// use roibench_core::roi::SinkKind;
///
/// let json = r#"{
///     "workload": { "size": 1024, "seed": 7 },
///     "roi": { "sink": "timer" }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.workload.size, 1024);
/// assert_eq!(config.roi.sink, SinkKind::Timer);
///
/// let spec = config.workload_spec("saxpy").unwrap();
/// assert_eq!(spec.size(), 1024);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Input generation settings
    #[serde(default)]
    pub workload: WorkloadConfig,
    /// Statistics sink and marker
    #[serde(default)]
    pub roi: RoiConfig,
    /// Result line settings
    #[serde(default)]
    pub report: ReportConfig,
}

impl Config {
    /// Parses a configuration from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Config`](crate::common::HarnessError::Config) on
    /// malformed JSON or mistyped fields.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolves a preset name into a validated spec under this configuration.
    ///
    /// # Errors
    ///
    /// `UnknownWorkload` for an unknown preset, `InvalidSize` for an
    /// oversized `N`, `InvalidAlpha` for a multiplier the element type
    /// cannot hold.
    pub fn workload_spec(&self, preset: &str) -> Result<WorkloadSpec> {
        let mut spec = preset
            .parse::<WorkloadSpec>()?
            .with_size(self.workload.size)?
            .with_determinism(self.workload.determinism())
            .with_marker(self.roi.marker());
        if let Some(alpha) = self.workload.alpha {
            spec = spec.with_alpha(alpha)?;
        }
        Ok(spec)
    }
}

/// Input generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadConfig {
    /// Problem size `N`; negative values run the degenerate size 0
    #[serde(default = "WorkloadConfig::default_size")]
    pub size: i64,

    /// Seed for seeded runs
    #[serde(default = "WorkloadConfig::default_seed")]
    pub seed: u64,

    /// Draw the seed from OS entropy instead of `seed`
    #[serde(default)]
    pub unseeded: bool,

    /// AX/AXPY multiplier override (per-type default when absent)
    #[serde(default)]
    pub alpha: Option<f64>,
}

impl WorkloadConfig {
    fn default_size() -> i64 {
        defaults::SIZE
    }

    fn default_seed() -> u64 {
        defaults::SEED
    }

    /// Seeding mode selected by `seed` and `unseeded`.
    pub fn determinism(&self) -> DeterminismMode {
        if self.unseeded {
            DeterminismMode::Unseeded
        } else {
            DeterminismMode::Seeded(self.seed)
        }
    }
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            size: defaults::SIZE,
            seed: defaults::SEED,
            unseeded: false,
            alpha: None,
        }
    }
}

/// Statistics sink settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoiConfig {
    /// Which sink receives the ROI signals
    #[serde(default)]
    pub sink: SinkKind,

    /// Counter id forwarded to the sink
    #[serde(default = "RoiConfig::default_id")]
    pub id: u64,

    /// Variant selector forwarded to the sink
    #[serde(default = "RoiConfig::default_variant")]
    pub variant: u64,
}

impl RoiConfig {
    fn default_id() -> u64 {
        defaults::ROI_ID
    }

    fn default_variant() -> u64 {
        defaults::ROI_VARIANT
    }

    /// Marker built from `id` and `variant`.
    pub fn marker(&self) -> RoiMarker {
        RoiMarker {
            id: self.id,
            variant: self.variant,
        }
    }
}

impl Default for RoiConfig {
    fn default() -> Self {
        Self {
            sink: SinkKind::default(),
            id: defaults::ROI_ID,
            variant: defaults::ROI_VARIANT,
        }
    }
}

/// Result line settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Text or JSON
    #[serde(default)]
    pub format: ReportFormat,
}
