//! Batch processing with bounded concurrency.
//!
//! Items are split into fixed-size batches processed one after another.
//! Within a batch at most `concurrency` items are in flight at any time:
//! as soon as one finishes the next starts. Results keep input order.

use futures::stream::{self, StreamExt};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Cumulative progress reported after each batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
}

pub type ProgressCallback = Arc<dyn Fn(BatchProgress) + Send + Sync>;

#[derive(Clone)]
pub struct BatchOptions {
    pub batch_size: usize,
    pub concurrency: usize,
    pub on_progress: Option<ProgressCallback>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
            on_progress: None,
        }
    }
}

impl fmt::Debug for BatchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchOptions")
            .field("batch_size", &self.batch_size)
            .field("concurrency", &self.concurrency)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

impl BatchOptions {
    pub fn new(batch_size: usize, concurrency: usize) -> Self {
        Self {
            batch_size,
            concurrency,
            on_progress: None,
        }
    }

    pub fn with_progress(mut self, callback: impl Fn(BatchProgress) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Arc::new(callback));
        self
    }
}

/// Run `processor` over every item, batch by batch.
///
/// Zero sizes are treated as 1. Per-item failures are the processor's
/// business: return them inside `T` (e.g. a `ToolResult`).
pub async fn process_in_batches<I, T, F, Fut>(
    items: Vec<I>,
    processor: F,
    options: &BatchOptions,
) -> Vec<T>
where
    F: Fn(I) -> Fut,
    Fut: Future<Output = T>,
{
    let total = items.len();
    let batch_size = options.batch_size.max(1);
    let concurrency = options.concurrency.max(1);

    let mut results = Vec::with_capacity(total);
    let mut remaining = items.into_iter().peekable();

    while remaining.peek().is_some() {
        let batch: Vec<I> = remaining.by_ref().take(batch_size).collect();
        let outputs: Vec<T> = stream::iter(batch)
            .map(&processor)
            .buffered(concurrency)
            .collect()
            .await;
        results.extend(outputs);

        if let Some(on_progress) = &options.on_progress {
            on_progress(BatchProgress {
                completed: results.len(),
                total,
            });
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_preserves_input_order() {
        let items: Vec<u64> = vec![30, 5, 20, 1, 10];
        let results = process_in_batches(
            items,
            |ms| async move {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                ms * 2
            },
            &BatchOptions::new(3, 3),
        )
        .await;

        assert_eq!(results, vec![60, 10, 40, 2, 20]);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let results = process_in_batches(
            (0..12).collect::<Vec<u32>>(),
            |n| {
                let in_flight = in_flight.clone();
                let peak = peak.clone();
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    n
                }
            },
            &BatchOptions::new(6, 2),
        )
        .await;

        assert_eq!(results.len(), 12);
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_progress_is_cumulative_per_batch() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let options = BatchOptions::new(2, 2).with_progress(move |p| {
            sink.lock().unwrap().push((p.completed, p.total));
        });

        process_in_batches(vec![1, 2, 3, 4, 5], |n| async move { n }, &options).await;

        assert_eq!(*seen.lock().unwrap(), vec![(2, 5), (4, 5), (5, 5)]);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let options = BatchOptions::default().with_progress(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let results: Vec<u8> = process_in_batches(Vec::new(), |n: u8| async move { n }, &options).await;

        assert!(results.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
