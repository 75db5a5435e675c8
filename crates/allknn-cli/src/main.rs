//! AllKNN benchmark CLI.
//!
//! # Commands
//!
//! - `run`: Time one AllKNN computation on one or two dataset files
//! - `suite`: Run every entry of a TOML or YAML suite file
//!
//! Exit status is 0 when every run produced a timing, 1 otherwise.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use allknn_benchmark::{AllKnnBenchmark, CsvExporter, MarkdownReport, Suite, SuiteResult};
use allknn_config::{DatasetSource, HarnessConfig};
use allknn_core::RunMetrics;

/// All-K-Nearest-Neighbors benchmark harness
#[derive(Parser)]
#[command(name = "allknn")]
#[command(version)]
#[command(about = "Times All-K-Nearest-Neighbors runs under a timeout")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Time one AllKNN run
    ///
    /// Pass `--dataset` once to query the reference set against itself, or
    /// twice for a reference set followed by a query set.
    Run(RunArgs),
    /// Run every entry of a suite file
    Suite(SuiteArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Reference dataset, then optionally the query dataset (CSV)
    #[arg(long = "dataset", value_name = "PATH", required = true)]
    datasets: Vec<PathBuf>,

    /// Benchmark options, e.g. "-k 3 -t kd_tree -l 20"
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    options: String,

    /// Timeout in seconds; 0 disables it
    #[arg(long, value_name = "SECS", default_value_t = 0)]
    timeout: u64,

    /// Suppress progress messages
    #[arg(long)]
    quiet: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SuiteArgs {
    /// Suite file (.toml, .yaml, or .yml)
    config: PathBuf,

    /// Print one JSON object per run
    #[arg(long)]
    json: bool,

    /// Suppress progress messages
    #[arg(long)]
    quiet: bool,

    /// Also write a CSV report
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Also write a Markdown report
    #[arg(long, value_name = "PATH")]
    markdown: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Suite(args) => suite(args),
    }
}

fn init_console(quiet: bool) {
    if quiet {
        allknn_console::init_quiet();
    } else {
        allknn_console::init();
    }
}

fn run(args: RunArgs) -> ExitCode {
    init_console(args.quiet || args.json);

    let source = match DatasetSource::from_paths(args.datasets) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let metrics = AllKnnBenchmark::new(source)
        .with_timeout_secs(args.timeout)
        .with_verbose(!args.quiet)
        .run_metrics(&args.options);

    if args.json {
        match serde_json::to_string(&metrics) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                eprintln!("error: {}", err);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", format_metrics(&metrics));
    }

    exit_code(metrics.is_success())
}

fn suite(args: SuiteArgs) -> ExitCode {
    init_console(args.quiet || args.json);

    let config = match HarnessConfig::load(&args.config) {
        Ok(config) if args.quiet => config.with_verbose(false),
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let result = match Suite::new(config).run() {
        Ok(result) => result,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    for record in &result.runs {
        if args.json {
            match serde_json::to_string(record) {
                Ok(json) => println!("{}", json),
                Err(err) => eprintln!("error: {}", err),
            }
        } else {
            println!("{}: {}", record.name, format_metrics(&record.metrics));
        }
    }

    if let Err(err) = write_reports(&result, &args) {
        eprintln!("error: {}", err);
        return ExitCode::FAILURE;
    }

    exit_code(result.all_succeeded())
}

fn write_reports(result: &SuiteResult, args: &SuiteArgs) -> std::io::Result<()> {
    if let Some(path) = &args.csv {
        CsvExporter::to_file(result, path)?;
    }
    if let Some(path) = &args.markdown {
        MarkdownReport::to_file(result, path)?;
    }
    Ok(())
}

fn format_metrics(metrics: &RunMetrics) -> String {
    match metrics.runtime() {
        Some(seconds) => format!("Runtime: {:.6}", seconds),
        None => format!("{}", metrics.value()),
    }
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use allknn_core::RunOutcome;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_accepts_hyphenated_options() {
        let cli = Cli::try_parse_from([
            "allknn",
            "run",
            "--dataset",
            "ref.csv",
            "--dataset",
            "query.csv",
            "--options",
            "-k 3 -t kd_tree",
            "--timeout",
            "30",
        ])
        .unwrap();

        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.datasets.len(), 2);
        assert_eq!(args.options, "-k 3 -t kd_tree");
        assert_eq!(args.timeout, 30);
        assert!(!args.json);
    }

    #[test]
    fn test_run_requires_dataset() {
        assert!(Cli::try_parse_from(["allknn", "run", "--options", "-k 1"]).is_err());
    }

    #[test]
    fn test_suite_report_paths() {
        let cli = Cli::try_parse_from([
            "allknn",
            "suite",
            "bench.toml",
            "--csv",
            "out.csv",
            "--json",
        ])
        .unwrap();

        let Commands::Suite(args) = cli.command else {
            panic!("expected suite command");
        };
        assert_eq!(args.config, PathBuf::from("bench.toml"));
        assert_eq!(args.csv, Some(PathBuf::from("out.csv")));
        assert!(args.markdown.is_none());
        assert!(args.json);
    }

    #[test]
    fn test_format_metrics() {
        assert_eq!(
            format_metrics(&RunMetrics::from(RunOutcome::Elapsed(0.5))),
            "Runtime: 0.500000"
        );
        assert_eq!(format_metrics(&RunMetrics::from(RunOutcome::Failed)), "-1");
        assert_eq!(format_metrics(&RunMetrics::from(RunOutcome::TimedOut)), "-2");
    }
}
