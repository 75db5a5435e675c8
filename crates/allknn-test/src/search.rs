//! Scripted search backends.
//!
//! Each backend implements [`NeighborSearch`] with fixed behavior so tests
//! can drive the runner down a specific path without real data volumes.

use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use allknn_search::{KnnRequest, NeighborSearch, NeighborTable, SearchError};

/// A recorded search call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchCall {
    /// Neighbors requested.
    pub k: usize,
    /// Reference rows.
    pub reference_rows: usize,
    /// Query rows.
    pub query_rows: usize,
}

/// Backend that records each request and returns placeholder neighbors.
#[derive(Debug, Default)]
pub struct RecordingSearch {
    calls: Mutex<Vec<SearchCall>>,
}

impl RecordingSearch {
    /// Creates a backend with no recorded calls.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every recorded call, in order.
    pub fn calls(&self) -> Vec<SearchCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Returns the `k` of the most recent call.
    pub fn last_k(&self) -> Option<usize> {
        self.calls().last().map(|c| c.k)
    }
}

impl NeighborSearch for RecordingSearch {
    fn k_nearest(&self, request: &KnnRequest<'_>) -> Result<NeighborTable, SearchError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(SearchCall {
                k: request.k,
                reference_rows: request.reference.nrows(),
                query_rows: request.query_count(),
            });
        }
        let rows = (0..request.query_count())
            .map(|_| (0..request.k).map(|j| (j, j as f64)).collect())
            .collect();
        NeighborTable::from_rows(request.k, rows)
    }
}

/// Backend that always fails with the given message.
#[derive(Debug, Clone)]
pub struct FailingSearch {
    message: String,
}

impl FailingSearch {
    /// Creates a backend that reports `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl NeighborSearch for FailingSearch {
    fn k_nearest(&self, _request: &KnnRequest<'_>) -> Result<NeighborTable, SearchError> {
        Err(SearchError::Backend(self.message.clone()))
    }
}

/// Backend that panics with the given message.
#[derive(Debug, Clone)]
pub struct PanickingSearch {
    message: &'static str,
}

impl PanickingSearch {
    /// Creates a backend that panics with `message`.
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

impl NeighborSearch for PanickingSearch {
    fn k_nearest(&self, _request: &KnnRequest<'_>) -> Result<NeighborTable, SearchError> {
        panic!("{}", self.message)
    }
}

/// Backend that sleeps before answering like [`RecordingSearch`].
#[derive(Debug, Default)]
pub struct SleepingSearch {
    delay: Duration,
    inner: RecordingSearch,
}

impl SleepingSearch {
    /// Creates a backend that takes `delay` per call.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            inner: RecordingSearch::new(),
        }
    }

    /// Returns every call that finished sleeping.
    pub fn calls(&self) -> Vec<SearchCall> {
        self.inner.calls()
    }
}

impl NeighborSearch for SleepingSearch {
    fn k_nearest(&self, request: &KnnRequest<'_>) -> Result<NeighborTable, SearchError> {
        thread::sleep(self.delay);
        self.inner.k_nearest(request)
    }
}
