//! Shared test fixtures for AllKNN harness crates.
//!
//! - [`dataset`] - Seeded point matrices and CSV datasets in temp dirs
//! - [`log`] - A log sink that records every message
//! - [`search`] - Scripted search backends (recording, failing, slow)
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! allknn-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```ignore
//! use allknn_test::dataset::TempDataset;
//! use allknn_test::log::RecordingLog;
//! ```

pub mod dataset;
pub mod log;
pub mod search;

pub use dataset::{random_matrix, TempDataset};
pub use log::RecordingLog;
pub use search::{FailingSearch, PanickingSearch, RecordingSearch, SearchCall, SleepingSearch};
