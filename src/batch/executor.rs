//! Batch executor.

use futures::StreamExt;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Outcomes of one batch run, in input order.
#[derive(Debug, Clone)]
pub struct BatchRun<R, E> {
    pub results: Vec<Result<R, E>>,
    pub execution_time: Duration,
}

impl<R, E> BatchRun<R, E> {
    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.results.len() - self.success_count()
    }

    /// Fraction in `0.0..=1.0`; 0.0 for an empty run.
    pub fn success_rate(&self) -> f64 {
        if self.results.is_empty() {
            0.0
        } else {
            self.success_count() as f64 / self.results.len() as f64
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStrategy {
    /// Everything at once.
    Parallel,
    Sequential,
    Concurrent { max_concurrency: usize },
}

impl Default for BatchStrategy {
    fn default() -> Self {
        BatchStrategy::Parallel
    }
}

impl BatchStrategy {
    pub fn from_limit(limit: Option<usize>) -> Self {
        match limit {
            None => BatchStrategy::Parallel,
            Some(1) => BatchStrategy::Sequential,
            Some(n) => BatchStrategy::Concurrent {
                max_concurrency: n.max(1),
            },
        }
    }
}

/// Runs one future per item. A failing item never cancels its siblings.
#[derive(Debug, Clone, Default)]
pub struct BatchExecutor {
    strategy: BatchStrategy,
}

impl BatchExecutor {
    pub fn new(strategy: BatchStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> BatchStrategy {
        self.strategy
    }

    pub async fn execute<T, R, E, F, Fut>(&self, items: Vec<T>, executor_fn: F) -> BatchRun<R, E>
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        let start = Instant::now();
        let n = items.len();
        let limit = match self.strategy {
            BatchStrategy::Parallel => n.max(1),
            BatchStrategy::Sequential => 1,
            BatchStrategy::Concurrent { max_concurrency } => max_concurrency.max(1),
        };

        let f = &executor_fn;
        let mut indexed: Vec<(usize, Result<R, E>)> = futures::stream::iter(items.into_iter().enumerate())
            .map(|(idx, item)| async move { (idx, f(item).await) })
            .buffer_unordered(limit)
            .collect()
            .await;
        indexed.sort_by_key(|(idx, _)| *idx);

        BatchRun {
            results: indexed.into_iter().map(|(_, r)| r).collect(),
            execution_time: start.elapsed(),
        }
    }
}
