//! Report generation for suite results.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::result::SuiteResult;

/// CSV exporter for suite results.
///
/// One row per run with columns `name,options,status,runtime_s`. The
/// runtime column carries the negative sentinel for failed runs.
///
/// # Example
///
/// ```
/// use allknn_benchmark::{CsvExporter, RunRecord, SuiteResult};
/// use allknn_core::{RunMetrics, RunOutcome};
///
/// let mut result = SuiteResult::new();
/// result.add_run(RunRecord::new("wine", "-k 3, -t brute", RunMetrics::from(RunOutcome::Failed)));
///
/// let csv = CsvExporter::to_string(&result).unwrap();
/// assert!(csv.starts_with("name,options,status,runtime_s\n"));
/// assert!(csv.contains("wine,\"-k 3, -t brute\",failed,-1\n"));
/// ```
pub struct CsvExporter;

impl CsvExporter {
    /// Writes the suite result as CSV to a writer.
    pub fn write<W: Write>(result: &SuiteResult, writer: W) -> io::Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["name", "options", "status", "runtime_s"])?;
        for run in &result.runs {
            let runtime = run.metrics.value().to_string();
            csv.write_record([
                run.name.as_str(),
                run.options.as_str(),
                run.status(),
                runtime.as_str(),
            ])?;
        }
        csv.flush()
    }

    /// Exports the suite result to a CSV string.
    pub fn to_string(result: &SuiteResult) -> io::Result<String> {
        let mut buffer = Vec::new();
        Self::write(result, &mut buffer)?;
        String::from_utf8(buffer).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }

    /// Exports the suite result to a CSV file.
    pub fn to_file(result: &SuiteResult, path: impl AsRef<Path>) -> io::Result<()> {
        Self::write(result, File::create(path)?)
    }
}

/// Markdown report generator.
///
/// # Example
///
/// ```
/// use allknn_benchmark::{MarkdownReport, SuiteResult};
///
/// let md = MarkdownReport::to_string(&SuiteResult::new());
/// assert!(md.contains("# AllKNN Benchmark"));
/// assert!(md.contains("*No runs.*"));
/// ```
pub struct MarkdownReport;

impl MarkdownReport {
    /// Generates a Markdown report string.
    pub fn to_string(result: &SuiteResult) -> String {
        let mut output = String::new();

        let _ = writeln!(output, "# AllKNN Benchmark");
        let _ = writeln!(output);

        let _ = writeln!(output, "## Summary");
        let _ = writeln!(output);
        if result.runs.is_empty() {
            let _ = writeln!(output, "*No runs.*");
            return output;
        }

        let _ = writeln!(output, "| Metric | Value |");
        let _ = writeln!(output, "|--------|-------|");
        let _ = writeln!(output, "| Runs | {} |", result.run_count());
        let _ = writeln!(output, "| Succeeded | {} |", result.success_count());
        let _ = writeln!(output, "| Failed | {} |", result.failure_count());
        let _ = writeln!(output, "| Total Time | {:.4} s |", result.total_runtime());
        if let Some(fastest) = result.fastest() {
            let _ = writeln!(
                output,
                "| Fastest | {} ({:.4} s) |",
                fastest.name,
                fastest.metrics.value()
            );
        }
        if let Some(slowest) = result.slowest() {
            let _ = writeln!(
                output,
                "| Slowest | {} ({:.4} s) |",
                slowest.name,
                slowest.metrics.value()
            );
        }
        let _ = writeln!(output);

        let _ = writeln!(output, "## Run Details");
        let _ = writeln!(output);
        let _ = writeln!(output, "| Run | Options | Status | Runtime (s) |");
        let _ = writeln!(output, "|-----|---------|--------|-------------|");
        for run in &result.runs {
            let runtime = match run.metrics.runtime() {
                Some(seconds) => format!("{:.4}", seconds),
                None => format!("{}", run.metrics.value()),
            };
            let _ = writeln!(
                output,
                "| {} | `{}` | {} | {} |",
                run.name,
                run.options,
                run.status(),
                runtime
            );
        }

        output
    }

    /// Writes the Markdown report to a file.
    pub fn to_file(result: &SuiteResult, path: impl AsRef<Path>) -> io::Result<()> {
        std::fs::write(path, Self::to_string(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::RunRecord;
    use allknn_core::{RunMetrics, RunOutcome};

    fn sample() -> SuiteResult {
        let mut result = SuiteResult::new();
        result.add_run(RunRecord::new(
            "wine",
            "-k 3",
            RunMetrics::from(RunOutcome::Elapsed(0.25)),
        ));
        result.add_run(RunRecord::new(
            "isolet",
            "-k 3 -t kd_tree",
            RunMetrics::from(RunOutcome::TimedOut),
        ));
        result
    }

    #[test]
    fn test_csv_rows() {
        let csv = CsvExporter::to_string(&sample()).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "wine,-k 3,ok,0.25");
        assert_eq!(lines[2], "isolet,-k 3 -t kd_tree,timeout,-2");
    }

    #[test]
    fn test_csv_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suite.csv");
        CsvExporter::to_file(&sample(), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("wine,-k 3,ok,0.25"));
    }

    #[test]
    fn test_markdown_summary() {
        let md = MarkdownReport::to_string(&sample());
        assert!(md.contains("| Runs | 2 |"));
        assert!(md.contains("| Failed | 1 |"));
        assert!(md.contains("| Fastest | wine (0.2500 s) |"));
        assert!(md.contains("| isolet | `-k 3 -t kd_tree` | timeout | -2 |"));
    }
}
