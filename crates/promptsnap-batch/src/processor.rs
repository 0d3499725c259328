//! Chunked batch processor.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::analyzer::{AnalyzeError, Analyzer};
use crate::config::BatchConfig;
use crate::error::BatchError;
use crate::item::{BatchResult, WorkItem};
use crate::retry::{with_retry, Backoff, ExponentialBackoff};

/// Error message recorded for items stopped by cancellation.
pub const CANCELLED_MESSAGE: &str = "Batch cancelled";

/// `(completed, total, current_label)`
pub type ProgressCallback = Arc<dyn Fn(usize, usize, &str) + Send + Sync>;

/// `(message, item_id)`
pub type ErrorCallback = Arc<dyn Fn(&str, &str) + Send + Sync>;

/// Runs an [`Analyzer`] over many items with bounded concurrency.
///
/// Items are split into chunks of `max_concurrent`. A chunk runs
/// concurrently and must fully settle before the next one starts, with
/// `delay_between_batches_ms` in between. Every item is retried with
/// exponential backoff (2s, 4s, ...) until `retry_attempts` is used up.
///
/// Callbacks must not panic; a panic aborts the run.
pub struct BatchProcessor {
    config: BatchConfig,
    backoff: Arc<dyn Backoff>,
    on_progress: Option<ProgressCallback>,
    on_error: Option<ErrorCallback>,
}

impl BatchProcessor {
    /// Create a processor with default backoff and no callbacks.
    pub fn new(config: BatchConfig) -> Self {
        Self {
            config,
            backoff: Arc::new(ExponentialBackoff::default()),
            on_progress: None,
            on_error: None,
        }
    }

    /// Replace the retry backoff policy.
    pub fn with_backoff(mut self, backoff: impl Backoff + 'static) -> Self {
        self.backoff = Arc::new(backoff);
        self
    }

    /// Register the progress callback.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    /// Register the per-item error callback.
    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str, &str) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(callback));
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Process all items; one result per item, in input order.
    ///
    /// Only an invalid configuration fails the call, before any item starts.
    pub async fn process_images<A>(
        &self,
        analyzer: &A,
        items: &[WorkItem],
        variation: &str,
    ) -> Result<Vec<BatchResult>, BatchError>
    where
        A: Analyzer + ?Sized,
    {
        self.process_images_with_cancel(analyzer, items, variation, &CancellationToken::new())
            .await
    }

    /// Like [`process_images`](Self::process_images), stopping early when
    /// `cancel` fires.
    ///
    /// In-flight items settle as failures with [`CANCELLED_MESSAGE`] through
    /// the usual callbacks. Items of chunks that never started are recorded
    /// as failed without invoking callbacks.
    pub async fn process_images_with_cancel<A>(
        &self,
        analyzer: &A,
        items: &[WorkItem],
        variation: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<BatchResult>, BatchError>
    where
        A: Analyzer + ?Sized,
    {
        self.config.validate()?;

        let total = items.len();
        let completed = AtomicUsize::new(0);
        let chunk_count = total.div_ceil(self.config.max_concurrent);
        let mut results = Vec::with_capacity(total);

        info!(
            "Processing {} items in {} chunks (max_concurrent={}, variation={})",
            total, chunk_count, self.config.max_concurrent, variation
        );

        for (index, chunk) in items.chunks(self.config.max_concurrent).enumerate() {
            if cancel.is_cancelled() {
                warn!("Batch cancelled before chunk {}/{}", index + 1, chunk_count);
                break;
            }

            debug!("Starting chunk {}/{} ({} items)", index + 1, chunk_count, chunk.len());
            let settled = join_all(
                chunk
                    .iter()
                    .map(|item| self.process_item(analyzer, item, variation, total, &completed, cancel)),
            )
            .await;
            results.extend(settled);

            if index + 1 < chunk_count && !self.config.delay_between_batches().is_zero() {
                tokio::select! {
                    _ = cancel.cancelled() => {}
                    _ = sleep(self.config.delay_between_batches()) => {}
                }
            }
        }

        for item in &items[results.len()..] {
            results.push(BatchResult::failure(&item.id, CANCELLED_MESSAGE));
        }

        let succeeded = results.iter().filter(|r| r.success).count();
        info!(
            "Batch finished: {} succeeded, {} failed",
            succeeded,
            total - succeeded
        );

        Ok(results)
    }

    async fn process_item<A>(
        &self,
        analyzer: &A,
        item: &WorkItem,
        variation: &str,
        total: usize,
        completed: &AtomicUsize,
        cancel: &CancellationToken,
    ) -> BatchResult
    where
        A: Analyzer + ?Sized,
    {
        self.report_progress(completed.load(Ordering::SeqCst), total, &item.label);

        let attempts = with_retry(
            |attempt| {
                debug!("Analyzing {} (attempt {})", item.id, attempt);
                analyzer.analyze(&item.source, variation)
            },
            self.config.retry_attempts,
            self.backoff.as_ref(),
        );

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AnalyzeError::new(CANCELLED_MESSAGE)),
            outcome = attempts => outcome,
        };

        let result = match outcome {
            Ok(value) => BatchResult::success(&item.id, value),
            Err(e) => {
                error!("Item {} failed: {}", item.id, e);
                if let Some(ref on_error) = self.on_error {
                    on_error(e.message(), &item.id);
                }
                BatchResult::failure(&item.id, e.message())
            }
        };

        let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
        self.report_progress(done, total, &item.label);

        result
    }

    fn report_progress(&self, completed: usize, total: usize, label: &str) {
        if let Some(ref on_progress) = self.on_progress {
            on_progress(completed, total, label);
        }
    }
}

#[cfg(test)]
#[path = "processor_tests.rs"]
mod tests;
