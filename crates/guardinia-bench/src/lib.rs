//! Benchmark: replay a labelled dataset against the webhook and score the verdicts.

pub mod dataset;
mod error;
pub mod labels;
pub mod metrics;
pub mod report;
pub mod runner;

pub use dataset::{DatasetItem, load_dataset};
pub use error::BenchError;
pub use labels::{CLASSES, Label, status_to_label};
pub use metrics::{Metrics, compute_metrics};
pub use report::{BenchReport, ReportMeta, render_report, write_report};
pub use runner::{SampleResult, run_benchmark};
