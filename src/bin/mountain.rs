//! Generate the memory mountain: read bandwidth over working-set size and
//! stride, measured with the cold-cache convergence harness.

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use colored::Colorize;

use perflab::mountain::{self, MountainConfig};
use perflab::output::ppm::write_mountain_dat_file;
use perflab::output::terminal::format_mountain;
use perflab::timing::{current_core, pin_to_core};
use perflab::{TimeSource, TimerConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Source {
    /// Monotonic wall clock
    Clock,
    /// x86_64 time-stamp counter
    Cycles,
}

#[derive(Debug, Parser)]
#[command(about = "Memory mountain bandwidth sweep")]
struct Args {
    /// Clock used for the trials
    #[arg(long, value_enum, default_value_t = Source::Clock)]
    source: Source,

    /// Subtract the measured timing overhead from each trial
    #[arg(long)]
    correct_overhead: bool,

    /// Pin the sweep to this core
    #[arg(long)]
    pin: Option<usize>,

    /// Output data file (tab-separated)
    #[arg(long, default_value = "mountain.dat")]
    output: String,

    /// Also write the full report as JSON
    #[arg(long)]
    json: Option<String>,

    /// Use the shrunken quick sweep instead of the full 16 KiB - 128 MiB grid
    #[arg(long)]
    quick: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(core) = args.pin {
        if let Err(err) = pin_to_core(core) {
            eprintln!("{} could not pin to core {core}: {err}", "warning:".yellow());
        }
    }
    if let Some(core) = current_core() {
        println!("running on core {core}");
    }

    let source = match args.source {
        Source::Clock => TimeSource::Monotonic,
        Source::Cycles => TimeSource::Cycles,
    };
    let base = if args.quick {
        TimerConfig::quick()
    } else {
        TimerConfig::default()
    };
    let timer = base.source(source).correct_overhead(args.correct_overhead);

    let sweep = if args.quick {
        MountainConfig::quick()
    } else {
        MountainConfig::new()
    };
    let config = sweep.timer(timer);

    println!(
        "timing using: {}",
        match source {
            TimeSource::Monotonic => "clock",
            TimeSource::Cycles => "cpu cycles",
        }
    );
    println!(
        "sweeping {} KiB down to {} KiB, strides 1..={}",
        config.max_bytes / 1024,
        config.min_bytes / 1024,
        config.max_stride
    );

    let report = mountain::run(&config);
    print!("{}", format_mountain(&report));

    if let Err(err) = write_mountain_dat_file(&args.output, &report) {
        eprintln!("{} {err}", "error:".red().bold());
        return ExitCode::FAILURE;
    }
    println!("Wrote {}", args.output.bold());

    if let Some(path) = &args.json {
        let json = match serde_json::to_string_pretty(&report) {
            Ok(json) => json,
            Err(err) => {
                eprintln!("{} {err}", "error:".red().bold());
                return ExitCode::FAILURE;
            }
        };
        if let Err(err) = std::fs::write(path, json) {
            eprintln!("{} {err}", "error:".red().bold());
            return ExitCode::FAILURE;
        }
        println!("Wrote {}", path.bold());
    }

    ExitCode::SUCCESS
}
