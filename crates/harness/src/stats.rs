//! gem5 statistics dump parsing.
//!
//! Every dump-and-reset the ROI sink triggers appends one section to
//! `m5out/stats.txt`, framed by `Begin Simulation Statistics` and
//! `End Simulation Statistics` banners. Each line inside is
//! `name value [value...] [# description]`; only the first value is kept.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::common::constants::{STATS_BEGIN_MARKER, STATS_END_MARKER};
use crate::common::error::{HarnessError, Result};

/// Name of the simulated-time statistic (seconds).
pub const SIM_SECONDS: &str = "simSeconds";

/// Name used for simulated time by gem5 releases before 21.
const SIM_SECONDS_LEGACY: &str = "sim_seconds";

/// One dump: statistic name to its first numeric value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsSection {
    values: BTreeMap<String, f64>,
}

impl StatsSection {
    /// Value of `name`, if the section has it.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Value of `name` as an event count; 0 when missing or negative.
    pub fn count(&self, name: &str) -> u64 {
        self.get(name).map_or(0, |v| if v > 0.0 { v as u64 } else { 0 })
    }

    /// Simulated seconds covered by this section.
    pub fn sim_seconds(&self) -> Option<f64> {
        self.get(SIM_SECONDS).or_else(|| self.get(SIM_SECONDS_LEGACY))
    }

    /// Number of statistics in the section.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when no statistic was parsed.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Inserts or replaces one statistic.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        let _ = self.values.insert(name.into(), value);
    }

    /// Records `name` unless the section already has it.
    fn insert_first(&mut self, name: &str, value: f64) {
        let _ = self.values.entry(name.to_string()).or_insert(value);
    }

    /// Every statistic in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.values.iter().map(|(k, &v)| (k.as_str(), v))
    }
}

enum Line<'a> {
    Begin,
    End,
    Entry(&'a str, f64),
    Other,
}

fn is_banner(line: &str, marker: &str) -> bool {
    line.starts_with("----------") && line.contains(marker)
}

fn classify(line: &str) -> Line<'_> {
    let line = line.trim();
    if is_banner(line, STATS_BEGIN_MARKER) {
        return Line::Begin;
    }
    if is_banner(line, STATS_END_MARKER) {
        return Line::End;
    }
    let body = line.split('#').next().unwrap_or_default();
    let mut fields = body.split_whitespace();
    match (fields.next(), fields.next()) {
        (Some(name), Some(value)) => value
            .parse::<f64>()
            .map_or(Line::Other, |v| Line::Entry(name, v)),
        _ => Line::Other,
    }
}

/// Every section of a statistics dump, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsDump {
    sections: Vec<StatsSection>,
}

impl StatsDump {
    /// Parses the text of a `stats.txt`.
    ///
    /// Sections with no parsable statistic are dropped. Statistics outside
    /// any banner pair (a dump truncated by a killed simulation) form a
    /// section of their own. Lines that are not `name value` are skipped.
    /// A statistic repeated within a section keeps its first value.
    ///
    /// # Errors
    ///
    /// [`HarnessError::StatsParse`] when a `Begin` banner appears inside an
    /// open section or an `End` banner closes nothing.
    pub fn parse(text: &str) -> Result<Self> {
        let mut sections = Vec::new();
        let mut current = StatsSection::default();
        let mut open = false;

        for (idx, raw) in text.lines().enumerate() {
            match classify(raw) {
                Line::Begin => {
                    if open {
                        return Err(HarnessError::StatsParse {
                            line: idx + 1,
                            reason: "Begin banner inside an open section".to_string(),
                        });
                    }
                    if !current.is_empty() {
                        warn!(line = idx + 1, "statistics outside a Begin/End pair");
                        sections.push(std::mem::take(&mut current));
                    }
                    open = true;
                }
                Line::End => {
                    if !open {
                        return Err(HarnessError::StatsParse {
                            line: idx + 1,
                            reason: "End banner without a matching Begin".to_string(),
                        });
                    }
                    if !current.is_empty() {
                        sections.push(std::mem::take(&mut current));
                    }
                    open = false;
                }
                Line::Entry(name, value) => current.insert_first(name, value),
                Line::Other => {}
            }
        }
        if !current.is_empty() {
            warn!(open, "statistics dump ends inside a section");
            sections.push(current);
        }
        debug!(sections = sections.len(), "parsed statistics dump");
        Ok(Self { sections })
    }

    /// Reads and parses a `stats.txt` file.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Io`] if the file cannot be read, or any error of
    /// [`StatsDump::parse`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::parse(&text)
    }

    /// Sections in file order.
    pub fn sections(&self) -> &[StatsSection] {
        &self.sections
    }

    /// Section `index` (0-based).
    pub fn section(&self, index: usize) -> Option<&StatsSection> {
        self.sections.get(index)
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns true when the dump had no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
