//! Colorful console output for the AllKNN harness.
//!
//! Provides a `tracing` layer that formats harness events with colors on
//! stderr, leaving stdout free for results.
//!
//! ## Log Levels
//!
//! - **INFO**: Progress messages and run completion
//! - **ERROR**: Fatal validation, dataset, and library errors
//! - **DEBUG**: Run parameters and dataset shapes

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();

/// Package version for banner display.
const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_FILTER: &str = "allknn_benchmark=info,allknn_search=info";

/// Initializes console output and prints the banner.
///
/// Safe to call multiple times - only the first call has effect.
/// `RUST_LOG` overrides the default filter.
pub fn init() {
    install(true);
}

/// Initializes console output without the banner.
pub fn init_quiet() {
    install(false);
}

fn install(banner: bool) {
    INIT.get_or_init(|| {
        EPOCH.get_or_init(Instant::now);
        if banner {
            print_banner();
        }

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(AllKnnConsoleLayer)
            .try_init();
    });
}

// Seconds since the console was initialized.
fn elapsed_secs() -> f64 {
    EPOCH
        .get()
        .map(|epoch| epoch.elapsed().as_secs_f64())
        .unwrap_or(0.0)
}

fn print_banner() {
    let banner = r#"
    _    _ _ _  ___   _ _   _
   / \  | | | |/ / \ | | \ | |
  / _ \ | | | ' /|  \| |  \| |
 / ___ \| | | . \| |\  | |\  |
/_/   \_\_|_|_|\_\_| \_|_| \_|
"#;

    let version_line = format!("     v{} - All-K-Nearest-Neighbors benchmark\n", VERSION);

    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "{}", banner.bright_cyan());
    let _ = writeln!(stderr, "{}", version_line.bright_white().bold());
    let _ = stderr.flush();
}

/// A tracing layer that formats harness events with colors.
pub struct AllKnnConsoleLayer;

impl<S: Subscriber> Layer<S> for AllKnnConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("allknn_") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stderr(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    message: Option<String>,
    status: Option<String>,
    tree_type: Option<String>,
    metric: Option<String>,
    reference_rows: Option<u64>,
    query_rows: Option<u64>,
    k: Option<u64>,
    runtime_us: Option<u64>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        match field.name() {
            "event" => self.event = Some(s.trim_matches('"').to_string()),
            "message" => self.message = Some(s.trim_matches('"').to_string()),
            "status" => self.status = Some(s.trim_matches('"').to_string()),
            "tree_type" => self.tree_type = Some(s),
            "metric" => self.metric = Some(s),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "reference_rows" => self.reference_rows = Some(value),
            "query_rows" => self.query_rows = Some(value),
            "k" => self.k = Some(value),
            "runtime_us" => self.runtime_us = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        if value >= 0 {
            self.record_u64(field, value as u64);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "message" => self.message = Some(value.to_string()),
            "status" => self.status = Some(value.to_string()),
            "tree_type" => self.tree_type = Some(value.to_string()),
            "metric" => self.metric = Some(value.to_string()),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor) -> String {
    match v.event.as_deref().unwrap_or("") {
        "info" => format_info(v),
        "fatal" => format_fatal(v),
        "run_start" => format_run_start(v),
        "run_end" => format_run_end(v),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn format_info(v: &EventVisitor) -> String {
    let message = v.message.as_deref().unwrap_or("");
    format!("{} {} {}", format_elapsed(), "●".bright_cyan(), message)
}

fn format_fatal(v: &EventVisitor) -> String {
    let message = v.message.as_deref().unwrap_or("");
    format!(
        "{} {} {}",
        format_elapsed(),
        "✗".bright_red().bold(),
        message.bright_red()
    )
}

fn format_run_start(v: &EventVisitor) -> String {
    let reference = v.reference_rows.unwrap_or(0);
    let queries = v.query_rows.unwrap_or(0);
    let k = v.k.unwrap_or(0);

    let mut output = format!(
        "{} {} AllKNN │ {} reference │ {} queries │ k={}",
        format_elapsed(),
        "▶".bright_green().bold(),
        reference.to_formatted_string(&Locale::en).bright_yellow(),
        queries.to_formatted_string(&Locale::en).bright_yellow(),
        k.to_formatted_string(&Locale::en).bright_yellow(),
    );

    if let Some(ref tree) = v.tree_type {
        output.push_str(&format!(" │ {}", tree.white().bold()));
    }
    if let Some(ref metric) = v.metric {
        output.push_str(&format!(" │ {}", metric.bright_magenta()));
    }

    output
}

fn format_run_end(v: &EventVisitor) -> String {
    let status = v.status.as_deref().unwrap_or("unknown");
    let (icon, status) = match status {
        "ok" => (
            "■".bright_cyan().bold().to_string(),
            "complete".bright_green().bold().to_string(),
        ),
        "timeout" => (
            "■".yellow().bold().to_string(),
            "timed out".yellow().bold().to_string(),
        ),
        other => (
            "■".bright_red().bold().to_string(),
            other.bright_red().bold().to_string(),
        ),
    };

    let mut output = format!("{} {} AllKNN {}", format_elapsed(), icon, status);
    if let Some(us) = v.runtime_us {
        output.push_str(&format!(" │ {}", format_duration_us(us).yellow()));
    }
    output
}

fn format_duration_us(us: u64) -> String {
    if us < 1_000 {
        format!("{}µs", us)
    } else if us < 1_000_000 {
        format!("{:.2}ms", us as f64 / 1_000.0)
    } else if us < 60_000_000 {
        format!("{:.3}s", us as f64 / 1_000_000.0)
    } else {
        let mins = us / 60_000_000;
        let secs = (us % 60_000_000) / 1_000_000;
        format!("{}m {}s", mins, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visitor(event: &str) -> EventVisitor {
        EventVisitor {
            event: Some(event.to_string()),
            ..EventVisitor::default()
        }
    }

    #[test]
    fn test_info_and_fatal_carry_message() {
        let mut v = visitor("info");
        v.message = Some("Loading dataset".to_string());
        assert!(format_event(&v).contains("Loading dataset"));

        v.event = Some("fatal".to_string());
        v.message = Some("Invalid k: 0".to_string());
        assert!(format_event(&v).contains("Invalid k: 0"));
    }

    #[test]
    fn test_unknown_events_are_skipped() {
        assert!(format_event(&visitor("")).is_empty());
        assert!(format_event(&visitor("progress")).is_empty());
    }

    #[test]
    fn test_run_start_groups_digits() {
        let mut v = visitor("run_start");
        v.reference_rows = Some(12_345);
        v.query_rows = Some(100);
        v.k = Some(3);
        v.tree_type = Some("kd_tree".to_string());

        let output = format_event(&v);
        assert!(output.contains("12,345"));
        assert!(output.contains("k="));
        assert!(output.contains("kd_tree"));
    }

    #[test]
    fn test_run_end_status() {
        let mut v = visitor("run_end");
        v.status = Some("timeout".to_string());
        assert!(format_event(&v).contains("timed out"));

        v.status = Some("ok".to_string());
        v.runtime_us = Some(2_500);
        let output = format_event(&v);
        assert!(output.contains("complete"));
        assert!(output.contains("2.50ms"));
    }

    #[test]
    fn test_format_duration_us() {
        assert_eq!(format_duration_us(999), "999µs");
        assert_eq!(format_duration_us(1_500_000), "1.500s");
        assert_eq!(format_duration_us(125_000_000), "2m 5s");
    }
}
