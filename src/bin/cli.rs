//! CLI entry point (§6).
//!
//! ```text
//! ska-scheduler run --num-of-individuals N --generations G \
//!     --heuristics-combination-length L --data-file PATH
//! ```
//!
//! Exit codes: `0` success, `2` invalid arguments, `3` I/O failure.

use std::fs::File;
use std::io::BufReader;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use ska_scheduler::config::SchedulerConfig;
use ska_scheduler::driver::{self, OptimizerKind, RunParams};
use ska_scheduler::ingest;
use ska_scheduler::optimizer::CancellationToken;

#[derive(Parser)]
#[command(name = "ska-scheduler", about = "Astronomical observation scheduling optimizer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the optimizer over a CSV proposal batch and print the resulting
    /// timetable as JSON on stdout.
    Run(RunArgs),
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum OptimizerChoice {
    /// Direct-encoding genetic optimizer (C5).
    #[default]
    Direct,
    /// Hyper-heuristic optimizer over sequences of placement heuristics (C6).
    Hyper,
}

#[derive(Parser)]
struct RunArgs {
    /// Population size.
    #[arg(long = "num-of-individuals", default_value_t = 50)]
    num_of_individuals: usize,

    /// Number of generations to evolve.
    #[arg(long, default_value_t = 200)]
    generations: usize,

    /// Genome length `L` for the hyper-heuristic optimizer; ignored by the
    /// direct encoding.
    #[arg(long = "heuristics-combination-length", default_value_t = 10)]
    heuristics_combination_length: usize,

    /// CSV file of proposals (§6).
    #[arg(long = "data-file")]
    data_file: std::path::PathBuf,

    /// Planning horizon start date, `YYYY-MM-DD`. Defaults to today.
    #[arg(long = "start-date")]
    start_date: Option<chrono::NaiveDate>,

    /// Planning horizon end date, `YYYY-MM-DD`. Defaults to 21 days after
    /// `start-date`.
    #[arg(long = "end-date")]
    end_date: Option<chrono::NaiveDate>,

    /// Which optimizer family to run.
    #[arg(long, value_enum, default_value_t = OptimizerChoice::Direct)]
    optimizer: OptimizerChoice,

    /// Path to a TOML configuration file overriding site/hyper-parameter
    /// defaults.
    #[arg(long = "config")]
    config_file: Option<std::path::PathBuf>,
}

impl std::fmt::Display for OptimizerChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptimizerChoice::Direct => write!(f, "direct"),
            OptimizerChoice::Hyper => write!(f, "hyper"),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run(args),
    }
}

fn run(args: RunArgs) -> ExitCode {
    let config = match &args.config_file {
        Some(path) => match SchedulerConfig::from_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(3);
            }
        },
        None => SchedulerConfig::from_default_location(),
    };

    let file = match File::open(&args.data_file) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error: failed to open {}: {e}", args.data_file.display());
            return ExitCode::from(3);
        }
    };

    let proposals = match ingest::ingest(BufReader::new(file)) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: failed to parse data file: {e}");
            return ExitCode::from(3);
        }
    };

    if proposals.is_empty() {
        eprintln!("error: no valid proposal rows in data file");
        return ExitCode::from(2);
    }

    let start_date = args.start_date.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let end_date = args.end_date.unwrap_or_else(|| start_date + chrono::Duration::days(21));
    if end_date < start_date {
        eprintln!("error: --end-date must not be before --start-date");
        return ExitCode::from(2);
    }

    let kind = match args.optimizer {
        OptimizerChoice::Direct => OptimizerKind::Direct,
        OptimizerChoice::Hyper => OptimizerKind::HyperHeuristic,
    };

    let params = RunParams {
        kind,
        num_individuals: args.num_of_individuals,
        generations: args.generations,
        heuristics_combination_length: args.heuristics_combination_length,
    };

    let cancellation = CancellationToken::new();
    let result = driver::run(start_date, end_date, proposals, &config, params, &cancellation);

    match result {
        Ok(output) => {
            let schedules: Vec<_> = (0..output.schedule.len())
                .map(|i| {
                    let proposal_id = output.schedule.context().proposal(i).id;
                    let binding = output.schedule.binding(i);
                    serde_json::json!({
                        "proposal": proposal_id,
                        "start_datetime": binding.map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
                    })
                })
                .collect();
            let body = serde_json::json!({
                "start_date": output.start_date,
                "end_date": output.end_date,
                "schedules": schedules,
                "dropped_unschedulable": output.dropped_unschedulable,
            });
            println!("{}", serde_json::to_string_pretty(&body).unwrap());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}
