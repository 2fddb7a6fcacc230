//! Trailing-edge debouncer for async tasks.
//!
//! Every [`Debouncer::call`] schedules the task after a quiet period. A call arriving
//! while one is pending supersedes it, so a burst of calls runs the task once, a
//! quiet period after the last call of the burst.

use std::{
    future::Future,
    pin::Pin,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};
use tracing::trace;

type Task = Arc<dyn Fn() -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Coalesces bursts of calls into a single run of an async task.
///
/// Must be called from within a tokio runtime.
#[derive(Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
    task: Task,
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("generation", &self.generation.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl Debouncer {
    pub fn new<F, Fut>(delay: Duration, task: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            task: Arc::new(move || Box::pin(task())),
        }
    }

    /// Schedules the task, superseding any run still waiting out its delay.
    pub fn call(&self) {
        let scheduled = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = Arc::clone(&self.generation);
        let task = Arc::clone(&self.task);
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if generation.load(Ordering::SeqCst) == scheduled {
                task().await;
            } else {
                trace!("Debounced call {} superseded", scheduled);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting(delay_ms: u64) -> (Debouncer, Arc<AtomicUsize>) {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let debouncer = Debouncer::new(Duration::from_millis(delay_ms), move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        (debouncer, runs)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_runs_once() {
        let (debouncer, runs) = counting(500);

        debouncer.call();
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.call();
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.call();

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separated_calls_each_run() {
        let (debouncer, runs) = counting(500);

        debouncer.call();
        tokio::time::sleep(Duration::from_millis(600)).await;
        debouncer.call();
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }
}
