//! Runner and suite tests.

use std::sync::Arc;
use std::time::{Duration, Instant};

use allknn_config::{DatasetSource, HarnessConfig, RunConfig};
use allknn_core::{RunMetrics, RunOutcome, FAILURE_SENTINEL, TIMEOUT_SENTINEL};
use allknn_test::{
    FailingSearch, PanickingSearch, RecordingLog, RecordingSearch, SleepingSearch, TempDataset,
};

use crate::{AllKnnBenchmark, Suite};

fn benchmark(
    source: DatasetSource,
    search: &Arc<RecordingSearch>,
    log: &Arc<RecordingLog>,
) -> AllKnnBenchmark<RecordingSearch, RecordingLog> {
    AllKnnBenchmark::new(source)
        .with_shared_search(Arc::clone(search))
        .with_shared_log(Arc::clone(log))
}

#[test]
fn test_self_query_requests_one_extra_neighbor() {
    let data = TempDataset::single(20, 3, 1);
    let search = Arc::new(RecordingSearch::new());
    let log = Arc::new(RecordingLog::new());

    let metrics = benchmark(data.source(), &search, &log).run_metrics("-k 3");

    assert!(metrics.is_success());
    let calls = search.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].k, 4);
    assert_eq!(calls[0].query_rows, 20);
}

#[test]
fn test_query_set_requests_exactly_k() {
    let data = TempDataset::pair(20, 5, 3, 2);
    let search = Arc::new(RecordingSearch::new());
    let log = Arc::new(RecordingLog::new());

    let metrics = benchmark(data.source(), &search, &log).run_metrics("-k 3");

    assert!(metrics.is_success());
    let calls = search.calls();
    assert_eq!(calls[0].k, 3);
    assert_eq!(calls[0].reference_rows, 20);
    assert_eq!(calls[0].query_rows, 5);
}

#[test]
fn test_success_returns_runtime_map() {
    let data = TempDataset::single(10, 2, 3);
    let search = Arc::new(RecordingSearch::new());
    let log = Arc::new(RecordingLog::new());

    let metrics = benchmark(data.source(), &search, &log).run_metrics("-k 1 -t brute");

    let runtime = metrics.runtime().unwrap();
    assert!(runtime >= 0.0);
    let json = serde_json::to_value(metrics).unwrap();
    assert!(json["Runtime"].is_f64());
    assert!(log.fatals().is_empty());
}

#[test]
fn test_progress_messages_in_order() {
    let data = TempDataset::single(10, 2, 4);
    let search = Arc::new(RecordingSearch::new());
    let log = Arc::new(RecordingLog::new());

    benchmark(data.source(), &search, &log).run_metrics("-k 2");

    assert_eq!(log.infos(), vec!["Perform ALLKNN.", "Loading dataset"]);
}

#[test]
fn test_quiet_run_suppresses_info() {
    let data = TempDataset::single(10, 2, 5);
    let search = Arc::new(RecordingSearch::new());
    let log = Arc::new(RecordingLog::new());

    let metrics = benchmark(data.source(), &search, &log)
        .with_verbose(false)
        .run_metrics("-k 2");

    assert!(metrics.is_success());
    assert!(log.infos().is_empty());
}

#[test]
fn test_missing_k_fails_without_search() {
    let data = TempDataset::single(10, 2, 6);
    let search = Arc::new(RecordingSearch::new());
    let log = Arc::new(RecordingLog::new());

    let metrics = benchmark(data.source(), &search, &log).run_metrics("-t kd_tree");

    assert_eq!(metrics, RunMetrics::Failed(FAILURE_SENTINEL));
    assert!(search.calls().is_empty());
    assert!(log.has_fatal("Required option: Number of nearest neighbors to find."));
}

#[test]
fn test_k_larger_than_reference_fails() {
    let data = TempDataset::single(10, 2, 7);
    let search = Arc::new(RecordingSearch::new());
    let log = Arc::new(RecordingLog::new());

    let metrics = benchmark(data.source(), &search, &log).run_metrics("-k 11");

    assert_eq!(metrics.value(), FAILURE_SENTINEL);
    assert!(search.calls().is_empty());
    assert!(log.has_fatal("Invalid k: 11"));
}

#[test]
fn test_invalid_tree_type_fails() {
    let data = TempDataset::single(10, 2, 8);
    let search = Arc::new(RecordingSearch::new());
    let log = Arc::new(RecordingLog::new());

    let metrics = benchmark(data.source(), &search, &log).run_metrics("-k 1 -t cover");

    assert_eq!(metrics.value(), FAILURE_SENTINEL);
    assert!(log.has_fatal("Invalid tree type: cover"));
}

#[test]
fn test_missing_dataset_fails() {
    let data = TempDataset::single(5, 2, 9);
    let search = Arc::new(RecordingSearch::new());
    let log = Arc::new(RecordingLog::new());

    let source = DatasetSource::Single(data.missing_path());
    let metrics = benchmark(source, &search, &log).run_metrics("-k 1");

    assert_eq!(metrics.value(), FAILURE_SENTINEL);
    assert_eq!(log.fatals().len(), 1);
    assert!(log.fatals()[0].contains("missing.csv"));
}

#[test]
fn test_malformed_dataset_fails() {
    let data = TempDataset::from_text("1,2\n3,x\n");
    let search = Arc::new(RecordingSearch::new());
    let log = Arc::new(RecordingLog::new());

    let metrics = benchmark(data.source(), &search, &log).run_metrics("-k 1");

    assert_eq!(metrics.value(), FAILURE_SENTINEL);
    assert!(log.has_fatal("is not a number"));
}

#[test]
fn test_backend_error_is_fatal() {
    let data = TempDataset::single(10, 2, 10);
    let log = Arc::new(RecordingLog::new());

    let metrics = AllKnnBenchmark::new(data.source())
        .with_search(FailingSearch::new("index exploded"))
        .with_shared_log(Arc::clone(&log))
        .run_metrics("-k 1");

    assert_eq!(metrics.value(), FAILURE_SENTINEL);
    assert!(log.has_fatal("index exploded"));
}

#[test]
fn test_backend_panic_is_fatal() {
    let data = TempDataset::single(10, 2, 11);
    let log = Arc::new(RecordingLog::new());

    let outcome = AllKnnBenchmark::new(data.source())
        .with_search(PanickingSearch::new("native crash"))
        .with_shared_log(Arc::clone(&log))
        .all_knn("-k 1");

    assert_eq!(outcome, RunOutcome::Failed);
    assert!(log.has_fatal("native crash"));
}

#[test]
fn test_timeout_returns_sentinel_promptly() {
    let data = TempDataset::single(10, 2, 12);
    let log = Arc::new(RecordingLog::new());

    let started = Instant::now();
    let metrics = AllKnnBenchmark::new(data.source())
        .with_timeout_secs(1)
        .with_search(SleepingSearch::new(Duration::from_secs(4)))
        .with_shared_log(Arc::clone(&log))
        .run_metrics("-k 1");

    assert_eq!(metrics, RunMetrics::Failed(TIMEOUT_SENTINEL));
    assert!(started.elapsed() < Duration::from_secs(3));
    assert!(log.fatals().is_empty());
    assert!(log.infos().iter().any(|m| m.contains("timeout")));
}

#[test]
fn test_zero_timeout_waits_for_completion() {
    let data = TempDataset::single(10, 2, 13);
    let search = Arc::new(SleepingSearch::new(Duration::from_millis(50)));

    let metrics = AllKnnBenchmark::new(data.source())
        .with_timeout_secs(0)
        .with_shared_search(Arc::clone(&search))
        .with_log(RecordingLog::new())
        .run_metrics("-k 1");

    assert!(metrics.runtime().unwrap() >= 0.05);
    assert_eq!(search.calls().len(), 1);
}

#[test]
fn test_timed_region_covers_search_only() {
    let data = TempDataset::single(10, 2, 14);

    let metrics = AllKnnBenchmark::new(data.source())
        .with_search(SleepingSearch::new(Duration::from_millis(100)))
        .with_log(RecordingLog::new())
        .run_metrics("-k 1");

    let runtime = metrics.runtime().unwrap();
    assert!(runtime >= 0.1);
    assert!(runtime < 2.0);
}

#[test]
fn test_repeated_runs_are_independent() {
    let data = TempDataset::single(10, 2, 15);
    let search = Arc::new(RecordingSearch::new());
    let log = Arc::new(RecordingLog::new());
    let benchmark = benchmark(data.source(), &search, &log);

    assert!(benchmark.run_metrics("-k 2").is_success());
    assert_eq!(benchmark.run_metrics("-k 0").value(), FAILURE_SENTINEL);
    assert!(benchmark.run_metrics("-k 2").is_success());

    let ks: Vec<_> = search.calls().iter().map(|c| c.k).collect();
    assert_eq!(ks, vec![3, 3]);
    assert_eq!(log.fatals().len(), 1);
}

#[test]
fn test_real_backend_end_to_end() {
    let data = TempDataset::pair(50, 10, 4, 16);

    for tree in ["auto", "ball_tree", "kd_tree", "brute"] {
        let metrics = AllKnnBenchmark::new(data.source())
            .with_log(RecordingLog::new())
            .run_metrics(&format!("-k 5 -t {} -l 8 --n_jobs 2", tree));
        assert!(metrics.is_success(), "tree type {} failed", tree);
    }
}

#[test]
fn test_real_backend_self_query_with_k_equal_n_fails() {
    // k + 1 neighbors cannot exist in a self-query with k == N.
    let data = TempDataset::single(10, 2, 17);
    let log = Arc::new(RecordingLog::new());

    let metrics = AllKnnBenchmark::new(data.source())
        .with_shared_log(Arc::clone(&log))
        .run_metrics("-k 10");

    assert_eq!(metrics.value(), FAILURE_SENTINEL);
    assert_eq!(log.fatals().len(), 1);
}

#[test]
fn test_suite_records_every_run() {
    let good = TempDataset::single(10, 2, 18);
    let config = HarnessConfig::new()
        .with_verbose(false)
        .with_run(RunConfig::new("ok", [good.reference_path()], "-k 2"))
        .with_run(RunConfig::new("bad-k", [good.reference_path()], "-k 0"))
        .with_run(RunConfig::new("missing", [good.missing_path()], "-k 1"));

    let result = Suite::with_collaborators(config, RecordingSearch::new(), RecordingLog::new())
        .run()
        .unwrap();

    assert_eq!(result.run_count(), 3);
    assert_eq!(result.success_count(), 1);
    let statuses: Vec<_> = result.runs.iter().map(|r| r.status()).collect();
    assert_eq!(statuses, vec!["ok", "failed", "failed"]);
}

#[test]
fn test_suite_rejects_bad_dataset_list() {
    let config = HarnessConfig::new().with_run(RunConfig::new(
        "three",
        ["a.csv", "b.csv", "c.csv"],
        "-k 1",
    ));

    let suite = Suite::with_collaborators(config, RecordingSearch::new(), RecordingLog::new());
    assert!(suite.run().is_err());
}
