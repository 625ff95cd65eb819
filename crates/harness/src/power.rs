//! O3 CPU power model.
//!
//! Post-processes the sections of a gem5 statistics dump into power figures.
//! It provides:
//! 1. **Event catalogue:** 37 access events of an out-of-order core, each with
//!    its gem5 statistic and a per-access energy in joules.
//! 2. **Energy tables:** the built-in energies, optionally overridden from JSON.
//! 3. **Grouping:** events rolled up into pipeline-stage subgroups and groups.
//!
//! Power of one event is `count * energy / simSeconds`. A section without a
//! positive `simSeconds` reports zero power instead of dividing by zero.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::common::error::Result;
use crate::stats::{StatsDump, StatsSection};

/// Pipeline stage an event's energy is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Instruction cache and branch prediction.
    Fetch,
    /// Instruction decode.
    Decode,
    /// Register renaming.
    Rename,
    /// Issue, execute and writeback (register file, LSQ, FUs, ROB, L1D).
    #[serde(rename = "issueexecutewriteback")]
    IssueExecuteWriteback,
    /// Unified L2.
    #[serde(rename = "l2cache")]
    L2Cache,
}

/// One countable access event.
#[derive(Debug, Clone, Copy)]
pub struct PowerEvent {
    /// Short key used in energy tables and reports.
    pub key: &'static str,
    /// Stage the energy belongs to.
    pub stage: Stage,
    /// gem5 statistic holding the access count.
    pub stat: &'static str,
    /// Built-in energy per access, in joules.
    pub energy: f64,
}

const fn event(key: &'static str, stage: Stage, stat: &'static str, energy: f64) -> PowerEvent {
    PowerEvent {
        key,
        stage,
        stat,
        energy,
    }
}

/// The event catalogue, in report order.
pub const EVENTS: &[PowerEvent] = &[
    event(
        "icache_tag",
        Stage::Fetch,
        "system.cpu.icache.tags.tagAccesses",
        9.72e-12,
    ),
    event(
        "icache_data",
        Stage::Fetch,
        "system.cpu.icache.tags.dataAccesses",
        2.28e-10,
    ),
    event(
        "bp_lookups",
        Stage::Fetch,
        "system.cpu.branchPred.lookups_0::total",
        6.88e-11,
    ),
    event(
        "bp_squashes",
        Stage::Fetch,
        "system.cpu.branchPred.squashes_0::total",
        5.12e-11,
    ),
    event(
        "btb_lookups",
        Stage::Fetch,
        "system.cpu.branchPred.BTBLookups",
        4.57e-10,
    ),
    event(
        "btb_updates",
        Stage::Fetch,
        "system.cpu.branchPred.BTBUpdates",
        1.73e-9,
    ),
    event(
        "ras_used",
        Stage::Fetch,
        "system.cpu.branchPred.ras.used",
        2.41e-11,
    ),
    event(
        "ras_pushes",
        Stage::Fetch,
        "system.cpu.branchPred.ras.pushes",
        3.54e-11,
    ),
    event(
        "decoded_instructions",
        Stage::Decode,
        "system.cpu.decode.decodedInsts",
        2.83e-10,
    ),
    event(
        "rename_int_lookups",
        Stage::Rename,
        "system.cpu.rename.intLookups",
        6.31e-12,
    ),
    event(
        "rename_fp_lookups",
        Stage::Rename,
        "system.cpu.rename.fpLookups",
        5.18e-12,
    ),
    event(
        "rename_int_writes",
        Stage::Rename,
        "system.cpu.rename.intWrites",
        1.32e-11,
    ),
    event(
        "rename_fp_writes",
        Stage::Rename,
        "system.cpu.rename.fpWrites",
        9.76e-12,
    ),
    event(
        "float_mem_read",
        Stage::IssueExecuteWriteback,
        "system.cpu.statIssuedInstType_0::FloatMemRead",
        8.39e-11,
    ),
    event(
        "float_mem_write",
        Stage::IssueExecuteWriteback,
        "system.cpu.statIssuedInstType_0::FloatMemWrite",
        1.31e-10,
    ),
    event(
        "mem_read",
        Stage::IssueExecuteWriteback,
        "system.cpu.statIssuedInstType_0::MemRead",
        1.12e-10,
    ),
    event(
        "mem_write",
        Stage::IssueExecuteWriteback,
        "system.cpu.statIssuedInstType_0::MemWrite",
        1.84e-10,
    ),
    event(
        "load_store_forwLoads",
        Stage::IssueExecuteWriteback,
        "system.cpu.lsq0.forwLoads",
        2.58e-10,
    ),
    event(
        "load_store_rescheduledLoads",
        Stage::IssueExecuteWriteback,
        "system.cpu.lsq0.rescheduledLoads",
        2.58e-10,
    ),
    event(
        "load_store_write",
        Stage::IssueExecuteWriteback,
        "system.cpu.lsq0.addedLoadsAndStores",
        2.69e-10,
    ),
    event(
        "int_alu",
        Stage::IssueExecuteWriteback,
        "system.cpu.statIssuedInstType_0::IntAlu",
        8.5e-10,
    ),
    event(
        "int_mult",
        Stage::IssueExecuteWriteback,
        "system.cpu.statIssuedInstType_0::IntMult",
        8.5e-10,
    ),
    event(
        "int_div",
        Stage::IssueExecuteWriteback,
        "system.cpu.statIssuedInstType_0::IntDiv",
        8.5e-10,
    ),
    event(
        "float_add",
        Stage::IssueExecuteWriteback,
        "system.cpu.statIssuedInstType_0::FloatAdd",
        2.55e-9,
    ),
    event(
        "float_cmp",
        Stage::IssueExecuteWriteback,
        "system.cpu.statIssuedInstType_0::FloatCmp",
        2.55e-9,
    ),
    event(
        "float_cvt",
        Stage::IssueExecuteWriteback,
        "system.cpu.statIssuedInstType_0::FloatCvt",
        2.55e-9,
    ),
    event(
        "float_mult",
        Stage::IssueExecuteWriteback,
        "system.cpu.statIssuedInstType_0::FloatMult",
        2.55e-9,
    ),
    event(
        "float_mult_acc",
        Stage::IssueExecuteWriteback,
        "system.cpu.statIssuedInstType_0::FloatMultAcc",
        2.55e-9,
    ),
    event(
        "float_div",
        Stage::IssueExecuteWriteback,
        "system.cpu.statIssuedInstType_0::FloatDiv",
        2.55e-9,
    ),
    event(
        "float_misc",
        Stage::IssueExecuteWriteback,
        "system.cpu.statIssuedInstType_0::FloatMisc",
        2.55e-9,
    ),
    event(
        "float_sqrt",
        Stage::IssueExecuteWriteback,
        "system.cpu.statIssuedInstType_0::FloatSqrt",
        2.55e-9,
    ),
    event(
        "rob_reads",
        Stage::IssueExecuteWriteback,
        "system.cpu.rob.reads",
        1.14e-10,
    ),
    event(
        "rob_writes",
        Stage::IssueExecuteWriteback,
        "system.cpu.rob.writes",
        1.74e-10,
    ),
    event(
        "dcache_tag",
        Stage::IssueExecuteWriteback,
        "system.cpu.dcache.tags.tagAccesses",
        9.72e-12,
    ),
    event(
        "dcache_data",
        Stage::IssueExecuteWriteback,
        "system.cpu.dcache.tags.dataAccesses",
        2.28e-10,
    ),
    event(
        "l2cache_tag",
        Stage::L2Cache,
        "system.l2cache.tags.tagAccesses",
        9.4e-11,
    ),
    event(
        "l2cache_data",
        Stage::L2Cache,
        "system.l2cache.tags.dataAccesses",
        1.82e-9,
    ),
];

/// A named set of events summed together.
#[derive(Debug, Clone, Copy)]
pub struct Subgroup {
    /// Display name.
    pub name: &'static str,
    /// Event keys.
    pub events: &'static [&'static str],
}

/// A top-level group of subgroups.
#[derive(Debug, Clone, Copy)]
pub struct Group {
    /// Display name.
    pub name: &'static str,
    /// Subgroups in report order.
    pub subgroups: &'static [Subgroup],
}

/// Grouping of the catalogue, in report order.
pub const GROUPS: &[Group] = &[
    Group {
        name: "Fetch",
        subgroups: &[
            Subgroup {
                name: "Icache",
                events: &["icache_tag", "icache_data"],
            },
            Subgroup {
                name: "Branch Predictor",
                events: &["bp_lookups", "bp_squashes"],
            },
            Subgroup {
                name: "Branch Target Buffer",
                events: &["btb_lookups", "btb_updates"],
            },
            Subgroup {
                name: "Return Address Stack",
                events: &["ras_used", "ras_pushes"],
            },
        ],
    },
    Group {
        name: "Decode",
        subgroups: &[Subgroup {
            name: "InstructionDecode",
            events: &["decoded_instructions"],
        }],
    },
    Group {
        name: "Rename",
        subgroups: &[Subgroup {
            name: "FreeList",
            events: &[
                "rename_int_lookups",
                "rename_fp_lookups",
                "rename_int_writes",
                "rename_fp_writes",
            ],
        }],
    },
    Group {
        name: "Issue Execute Writeback",
        subgroups: &[
            Subgroup {
                name: "Register File",
                events: &["float_mem_read", "float_mem_write", "mem_read", "mem_write"],
            },
            Subgroup {
                name: "Load Store Queue Read",
                events: &["load_store_forwLoads", "load_store_rescheduledLoads"],
            },
            Subgroup {
                name: "Load Store Queue Write",
                events: &["load_store_write"],
            },
            Subgroup {
                name: "Integer Operations",
                events: &["int_alu", "int_mult", "int_div"],
            },
            Subgroup {
                name: "Floating Point Operations",
                events: &[
                    "float_add",
                    "float_cmp",
                    "float_cvt",
                    "float_mult",
                    "float_mult_acc",
                    "float_div",
                    "float_misc",
                    "float_sqrt",
                ],
            },
            Subgroup {
                name: "ROB",
                events: &["rob_reads", "rob_writes"],
            },
            Subgroup {
                name: "Dcache",
                events: &["dcache_tag", "dcache_data"],
            },
        ],
    },
    Group {
        name: "L2Cache",
        subgroups: &[Subgroup {
            name: "L2",
            events: &["l2cache_tag", "l2cache_data"],
        }],
    },
];

/// Looks up an event by key.
pub fn find_event(key: &str) -> Option<&'static PowerEvent> {
    EVENTS.iter().find(|e| e.key == key)
}

/// Energy per access for every catalogue event.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyTable {
    energies: Vec<f64>,
}

impl Default for EnergyTable {
    fn default() -> Self {
        Self {
            energies: EVENTS.iter().map(|e| e.energy).collect(),
        }
    }
}

impl EnergyTable {
    /// Built-in energies overridden by a JSON table.
    ///
    /// The JSON is keyed by stage then event, e.g.
    /// `{"fetch": {"icache_tag": 1.0e-11}}`. Entries for unknown events, or
    /// filed under the wrong stage, are ignored with a warning.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Config`](crate::common::HarnessError::Config) on
    /// malformed JSON or non-numeric energies.
    pub fn from_json(json: &str) -> Result<Self> {
        let overrides: BTreeMap<Stage, BTreeMap<String, f64>> = serde_json::from_str(json)?;
        let mut table = Self::default();
        for (stage, entries) in overrides {
            for (key, energy) in entries {
                match EVENTS.iter().position(|e| e.key == key) {
                    Some(idx) if EVENTS[idx].stage == stage => table.energies[idx] = energy,
                    Some(_) => warn!(key = %key, ?stage, "energy filed under the wrong stage, ignored"),
                    None => warn!(key = %key, ?stage, "unknown event in energy table, ignored"),
                }
            }
        }
        Ok(table)
    }

    /// Energy per access of `key`, in joules.
    pub fn energy(&self, key: &str) -> Option<f64> {
        EVENTS
            .iter()
            .position(|e| e.key == key)
            .map(|idx| self.energies[idx])
    }
}

/// Power of one event in one section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComponentPower {
    /// Event key.
    pub key: &'static str,
    /// Access count read from the section.
    pub count: u64,
    /// Watts.
    pub watts: f64,
}

/// Power of one subgroup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubgroupPower {
    /// Subgroup name.
    pub name: &'static str,
    /// Sum of its events, in watts.
    pub watts: f64,
}

/// Power of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupPower {
    /// Group name.
    pub name: &'static str,
    /// Sum of its subgroups, in watts.
    pub total: f64,
    /// Per-subgroup breakdown.
    pub breakdown: Vec<SubgroupPower>,
}

/// Power figures of one statistics section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionPower {
    /// 1-based section number in the dump.
    pub index: usize,
    /// Simulated seconds of the section (0 when missing).
    pub sim_seconds: f64,
    /// Every catalogue event.
    pub components: Vec<ComponentPower>,
    /// Grouped totals.
    pub groups: Vec<GroupPower>,
}

impl SectionPower {
    /// Sum of every group total, in watts.
    pub fn total(&self) -> f64 {
        self.groups.iter().map(|g| g.total).sum()
    }

    /// Power of one event.
    pub fn component(&self, key: &str) -> Option<&ComponentPower> {
        self.components.iter().find(|c| c.key == key)
    }

    /// Power of one group.
    pub fn group(&self, name: &str) -> Option<&GroupPower> {
        self.groups.iter().find(|g| g.name == name)
    }
}

/// Power figures of a whole dump.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PowerReport {
    /// One entry per analyzed section.
    pub sections: Vec<SectionPower>,
}

/// Turns statistics sections into power figures.
#[derive(Debug, Clone, Default)]
pub struct PowerModel {
    table: EnergyTable,
}

impl PowerModel {
    /// Creates a model using `table` for per-access energies.
    pub fn new(table: EnergyTable) -> Self {
        Self { table }
    }

    /// Analyzes one section; `index` is its 1-based number.
    pub fn analyze_section(&self, index: usize, section: &StatsSection) -> SectionPower {
        let sim_seconds = section.sim_seconds().unwrap_or(0.0);
        let valid_time = sim_seconds.is_finite() && sim_seconds > 0.0;
        if !valid_time {
            warn!(section = index, sim_seconds, "no positive simSeconds, reporting zero power");
        }

        let components: Vec<ComponentPower> = EVENTS
            .iter()
            .zip(&self.table.energies)
            .map(|(event, &energy)| {
                if section.get(event.stat).is_none() {
                    debug!(section = index, stat = event.stat, "statistic missing, counted as 0");
                }
                let count = section.count(event.stat);
                let watts = if valid_time {
                    count as f64 * energy / sim_seconds
                } else {
                    0.0
                };
                ComponentPower {
                    key: event.key,
                    count,
                    watts,
                }
            })
            .collect();

        let watts_of = |key: &str| {
            components
                .iter()
                .find(|c| c.key == key)
                .map_or(0.0, |c| c.watts)
        };
        let groups: Vec<GroupPower> = GROUPS
            .iter()
            .map(|group| {
                let breakdown: Vec<SubgroupPower> = group
                    .subgroups
                    .iter()
                    .map(|sub| SubgroupPower {
                        name: sub.name,
                        watts: sub.events.iter().map(|k| watts_of(k)).sum(),
                    })
                    .collect();
                GroupPower {
                    name: group.name,
                    total: breakdown.iter().map(|s| s.watts).sum(),
                    breakdown,
                }
            })
            .collect();

        SectionPower {
            index,
            sim_seconds: if valid_time { sim_seconds } else { 0.0 },
            components,
            groups,
        }
    }

    /// Analyzes every section of `dump`.
    pub fn analyze(&self, dump: &StatsDump) -> PowerReport {
        PowerReport {
            sections: dump
                .sections()
                .iter()
                .enumerate()
                .map(|(i, s)| self.analyze_section(i + 1, s))
                .collect(),
        }
    }
}

/// `{:.6e}` with a signed exponent of at least two digits (`1.944000e-08`).
struct Sci(f64);

impl fmt::Display for Sci {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plain = format!("{:.6e}", self.0);
        let Some((mantissa, exp)) = plain.split_once('e') else {
            return f.write_str(&plain);
        };
        let (sign, digits) = exp.strip_prefix('-').map_or(("+", exp), |d| ("-", d));
        write!(f, "{mantissa}e{sign}{digits:0>2}")
    }
}

impl fmt::Display for SectionPower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(50);
        writeln!(f, "{rule}")?;
        writeln!(f, "Simulation Section {}", self.index)?;
        writeln!(f, "{rule}")?;
        writeln!(f)?;
        writeln!(f, "## Individual Component Power Consumption (Watts)")?;
        for c in &self.components {
            writeln!(f, "{}: {} W", c.key, Sci(c.watts))?;
        }
        writeln!(f)?;
        writeln!(f, "## Grouped Power Consumption (Watts)")?;
        for g in &self.groups {
            writeln!(f)?;
            writeln!(f, "{} Total: {} W", g.name, Sci(g.total))?;
            for s in &g.breakdown {
                writeln!(f, "  {}: {} W", s.name, Sci(s.watts))?;
            }
        }
        writeln!(f)?;
        writeln!(f, "Total System Power Consumption: {} W", Sci(self.total()))
    }
}

impl fmt::Display for PowerReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# O3CPU Power Analysis Results")?;
        for section in &self.sections {
            writeln!(f)?;
            write!(f, "{section}")?;
        }
        Ok(())
    }
}
