use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Runs at most one pending task after a quiet period.
///
/// Scheduling a new task aborts the pending one and restarts the delay.
/// Once the delay elapses the task is spawned on its own, so a later
/// [`Debouncer::schedule`] or [`Debouncer::cancel`] never aborts work that
/// has already started.
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(task);
        });

        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = pending.replace(timer) {
            previous.abort();
        }
    }

    /// Abort the pending timer, if any. Returns whether one was still waiting.
    pub fn cancel(&self) -> bool {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        match pending.take() {
            Some(timer) => {
                let waiting = !timer.is_finished();
                timer.abort();
                waiting
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        let pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.as_ref().map_or(false, |timer| !timer.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counter_task(counter: &Arc<AtomicUsize>, value: usize) -> impl Future<Output = ()> + Send + 'static {
        let counter = counter.clone();
        async move {
            counter.store(value, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_quiet_period() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let hits = Arc::new(AtomicUsize::new(0));

        debouncer.schedule(counter_task(&hits, 1));
        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn burst_keeps_only_the_last_task() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let last = Arc::new(AtomicUsize::new(0));
        let runs = Arc::new(AtomicUsize::new(0));

        for value in 1..=5 {
            let last = last.clone();
            let runs = runs.clone();
            debouncer.schedule(async move {
                runs.fetch_add(1, Ordering::SeqCst);
                last.store(value, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(last.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_the_pending_task() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let hits = Arc::new(AtomicUsize::new(0));

        debouncer.schedule(counter_task(&hits, 1));
        assert!(debouncer.cancel());
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(!debouncer.cancel());
    }

    #[tokio::test(start_paused = true)]
    async fn started_task_survives_a_new_schedule() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let finished = Arc::new(AtomicUsize::new(0));

        let done = finished.clone();
        debouncer.schedule(async move {
            tokio::time::sleep(Duration::from_secs(3)).await;
            done.fetch_add(1, Ordering::SeqCst);
        });
        tokio::time::sleep(Duration::from_millis(600)).await;

        debouncer.schedule(async {});
        debouncer.cancel();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_cancels_the_pending_task() {
        let hits = Arc::new(AtomicUsize::new(0));
        {
            let debouncer = Debouncer::new(Duration::from_millis(500));
            debouncer.schedule(counter_task(&hits, 1));
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
