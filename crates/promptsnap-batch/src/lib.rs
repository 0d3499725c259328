//! # PromptSnap Batch
//!
//! Batch pipeline that drives many image-analysis requests against an
//! external vision API.
//!
//! ## Features
//!
//! - Chunked execution with a concurrency cap
//! - Per-item retry with pluggable backoff
//! - Fixed pause between chunks for rate limiting
//! - Progress and error callbacks
//! - Cooperative cancellation

pub mod analyzer;
pub mod config;
pub mod error;
pub mod estimate;
pub mod item;
pub mod processor;
pub mod retry;

pub use analyzer::{AnalyzeError, Analyzer, FnAnalyzer};
pub use config::BatchConfig;
pub use error::BatchError;
pub use estimate::{estimate_processing_time, ProcessingEstimate};
pub use item::{BatchResult, WorkItem};
pub use processor::{BatchProcessor, ErrorCallback, ProgressCallback, CANCELLED_MESSAGE};
pub use retry::{with_retry, Backoff, ExponentialBackoff, FixedBackoff, Jittered, NoBackoff};
pub use tokio_util::sync::CancellationToken;
