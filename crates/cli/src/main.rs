//! roibench command-line driver.
//!
//! This binary is the single entry point of the workload corpus. It performs:
//! 1. **Run:** one workload per process, delimited by ROI markers, printing
//!    exactly one result line on stdout.
//! 2. **List:** the workload presets.
//! 3. **Power:** O3 CPU power analysis of a gem5 `stats.txt`.
//!
//! Diagnostics go to stderr. Any failure exits with status 1.

use std::path::PathBuf;
use std::{fs, io, process};

use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use roibench_core::config::Config;
use roibench_core::driver::WorkloadDriver;
use roibench_core::host::pin_to_cpu;
use roibench_core::power::{EnergyTable, PowerModel};
use roibench_core::report::{ReportFormat, ResultReporter};
use roibench_core::roi::{SinkDispatch, SinkKind};
use roibench_core::stats::StatsDump;
use roibench_core::workload::PRESETS;
use roibench_core::{HarnessError, Result};

#[derive(Parser, Debug)]
#[command(
    name = "roibench",
    author,
    version,
    about = "ROI-delimited synthetic workloads for microarchitecture simulators",
    long_about = "Run one synthetic kernel between simulator ROI markers, or post-process the resulting gem5 statistics.\n\nExamples:\n  roibench run saxpy\n  roibench run randombranches --size 65536 --sink timer\n  roibench power --stats m5out/stats.txt --output power.txt"
)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one workload and print its result.
    Run(RunArgs),

    /// List the workload presets.
    List,

    /// Compute O3 CPU power from a gem5 statistics dump.
    Power(PowerArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Workload preset (see `roibench list`).
    workload: String,

    /// Problem size N (negative runs the degenerate size 0).
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    size: Option<i64>,

    /// AX/AXPY multiplier.
    #[arg(short, long, allow_negative_numbers = true)]
    alpha: Option<f64>,

    /// Seed for the input data.
    #[arg(long, conflicts_with = "unseeded")]
    seed: Option<u64>,

    /// Draw the seed from OS entropy (logged so the run can be replayed).
    #[arg(long)]
    unseeded: bool,

    /// Statistics sink: null, timer or m5.
    #[arg(long)]
    sink: Option<SinkKind>,

    /// Counter id passed to the sink.
    #[arg(long)]
    roi_id: Option<u64>,

    /// Variant selector passed to the sink.
    #[arg(long)]
    roi_variant: Option<u64>,

    /// Result line format: text or json.
    #[arg(short, long)]
    format: Option<ReportFormat>,

    /// Pin the process to this CPU before running (Linux only).
    #[arg(long)]
    pin_cpu: Option<usize>,
}

impl RunArgs {
    /// Defaults overridden by whatever was given on the command line.
    fn to_config(&self) -> Config {
        let mut config = Config::default();
        if let Some(size) = self.size {
            config.workload.size = size;
        }
        if let Some(seed) = self.seed {
            config.workload.seed = seed;
        }
        config.workload.unseeded = self.unseeded;
        config.workload.alpha = self.alpha;
        if let Some(sink) = self.sink {
            config.roi.sink = sink;
        }
        if let Some(id) = self.roi_id {
            config.roi.id = id;
        }
        if let Some(variant) = self.roi_variant {
            config.roi.variant = variant;
        }
        if let Some(format) = self.format {
            config.report.format = format;
        }
        config
    }
}

#[derive(Args, Debug)]
struct PowerArgs {
    /// gem5 statistics file.
    #[arg(long, default_value = "m5out/stats.txt")]
    stats: PathBuf,

    /// Also write the report to this file.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON energy table overriding the built-in per-access energies.
    #[arg(long)]
    energy: Option<PathBuf>,

    /// Only report this section (1-based).
    #[arg(long)]
    section: Option<usize>,

    /// Report format: text or json.
    #[arg(short, long, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => cmd_run(&args),
        Commands::List => {
            cmd_list();
            Ok(())
        }
        Commands::Power(args) => cmd_power(&args),
    };

    if let Err(e) = result {
        eprintln!("[!] FATAL: {e}");
        process::exit(1);
    }
}

/// Installs the stderr subscriber; `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Runs one workload; the result line is the only stdout output.
fn cmd_run(args: &RunArgs) -> Result<()> {
    let config = args.to_config();
    let spec = config.workload_spec(&args.workload)?;

    if let Some(cpu) = args.pin_cpu {
        match pin_to_cpu(cpu) {
            Ok(()) => info!(cpu, "pinned to cpu"),
            Err(e) => warn!(cpu, error = %e, "could not pin, running unpinned"),
        }
    }

    info!(workload = %spec, sink = %config.roi.sink, "starting run");
    let sink = SinkDispatch::new(config.roi.sink);
    let mut reporter = ResultReporter::new(io::stdout().lock(), config.report.format);
    let mut driver = WorkloadDriver::new(spec, sink);
    let summary = driver.run(&mut reporter)?;

    if config.workload.unseeded {
        info!(seed = summary.seed, "unseeded run, replay with --seed {}", summary.seed);
    }
    if let Some(sample) = driver.sink().timer_samples().and_then(<[_]>::last) {
        info!(nanos = sample.nanos, cycles = sample.cycles, "host timer");
    }
    Ok(())
}

fn cmd_list() {
    println!("{:<16} {:<16} {:<6} DESCRIPTION", "NAME", "KIND", "TYPE");
    for p in PRESETS {
        println!(
            "{:<16} {:<16} {:<6} {}",
            p.name,
            format!("{:?}", p.kind),
            p.element,
            p.summary
        );
    }
}

/// Parses the dump, computes power and prints (and optionally writes) the report.
fn cmd_power(args: &PowerArgs) -> Result<()> {
    let dump = StatsDump::from_path(&args.stats)?;
    if dump.is_empty() {
        warn!(path = %args.stats.display(), "no statistics sections found");
    }
    info!(sections = dump.len(), path = %args.stats.display(), "read statistics");

    let table = match &args.energy {
        Some(path) => EnergyTable::from_json(&fs::read_to_string(path)?)?,
        None => EnergyTable::default(),
    };
    let mut report = PowerModel::new(table).analyze(&dump);

    if let Some(wanted) = args.section {
        report.sections.retain(|s| s.index == wanted);
        if report.sections.is_empty() {
            return Err(HarnessError::UnknownOption {
                option: "section",
                value: wanted.to_string(),
            });
        }
    }

    let rendered = match args.format {
        ReportFormat::Text => report.to_string(),
        ReportFormat::Json => serde_json::to_string_pretty(&report)? + "\n",
    };
    print!("{rendered}");

    if let Some(path) = &args.output {
        fs::write(path, &rendered)?;
        info!(path = %path.display(), "power report written");
    }
    Ok(())
}
