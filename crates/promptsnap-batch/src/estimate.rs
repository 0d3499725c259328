//! Rough wall-clock estimate for a batch, for display only.

use serde::Serialize;

/// Assumed cost of one analysis call.
pub const AVG_MS_PER_ITEM: u64 = 3000;

/// Assumed pause charged once per chunk.
pub const DELAY_MS_PER_CHUNK: u64 = 1000;

/// Estimated duration split into whole minutes and remaining seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessingEstimate {
    pub chunks: u64,
    pub total_ms: u64,
    pub minutes: u64,
    pub seconds: u64,
}

/// Estimate how long `item_count` items take with chunks of `max_concurrent`.
///
/// A `max_concurrent` of zero is treated as one.
pub fn estimate_processing_time(item_count: usize, max_concurrent: usize) -> ProcessingEstimate {
    let items = item_count as u64;
    let chunks = items.div_ceil(max_concurrent.max(1) as u64);
    let total_ms = items * AVG_MS_PER_ITEM + chunks * DELAY_MS_PER_CHUNK;
    let total_seconds = total_ms.div_ceil(1000);

    ProcessingEstimate {
        chunks,
        total_ms,
        minutes: total_seconds / 60,
        seconds: total_seconds % 60,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ten_items_five_wide() {
        let estimate = estimate_processing_time(10, 5);
        assert_eq!(estimate.chunks, 2);
        assert_eq!(estimate.total_ms, 32_000);
        assert_eq!(estimate.minutes, 0);
        assert_eq!(estimate.seconds, 32);
    }

    #[test]
    fn test_partial_last_chunk() {
        // 7 items in chunks of 3: 21s of work plus 3 chunk pauses
        let estimate = estimate_processing_time(7, 3);
        assert_eq!(estimate.chunks, 3);
        assert_eq!(estimate.total_ms, 24_000);
    }

    #[test]
    fn test_rolls_over_to_minutes() {
        let estimate = estimate_processing_time(100, 5);
        // 300s + 20s = 320s
        assert_eq!(estimate.minutes, 5);
        assert_eq!(estimate.seconds, 20);
    }

    #[test]
    fn test_empty_batch() {
        let estimate = estimate_processing_time(0, 5);
        assert_eq!(estimate.chunks, 0);
        assert_eq!(estimate.total_ms, 0);
        assert_eq!((estimate.minutes, estimate.seconds), (0, 0));
    }

    #[test]
    fn test_zero_concurrency_treated_as_one() {
        let estimate = estimate_processing_time(2, 0);
        assert_eq!(estimate.chunks, 2);
        assert_eq!(estimate.total_ms, 8_000);
    }
}
