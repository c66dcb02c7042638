//! InMemoryQueue - development queue
//!
//! - Mutex + Condvar for the blocking pop
//! - the blocking wait runs on `spawn_blocking` so it never parks a runtime thread
//! - `close()` wakes every waiter and makes further pops return `Empty`

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::Instant;

use crate::config::PopOptions;
use crate::domain::{FetchResult, Job};
use crate::error::QueueError;
use crate::ports::QueueHandle;

#[derive(Default)]
struct State {
    jobs: VecDeque<Job>,
    closed: bool,
}

#[derive(Default)]
struct Shared {
    state: Mutex<State>,
    condvar: Condvar,
}

impl Shared {
    fn lock(&self) -> Result<MutexGuard<'_, State>, QueueError> {
        self.state
            .lock()
            .map_err(|e| QueueError::OperationFailed(format!("lock poisoned: {e}")))
    }
}

/// FIFO queue held in process memory.
///
/// # Example
/// ```ignore
/// let queue = InMemoryQueue::new("default");
/// queue.push(job)?;
/// let fetched = queue.pop(&PopOptions::new().with_timeout(Duration::from_secs(5))).await?;
/// ```
#[derive(Clone)]
pub struct InMemoryQueue {
    name: String,
    shared: Arc<Shared>,
}

impl InMemoryQueue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shared: Arc::new(Shared::default()),
        }
    }

    /// Append a job and wake one waiting pop.
    pub fn push(&self, job: Job) -> Result<(), QueueError> {
        let mut state = self.shared.lock()?;
        if state.closed {
            return Err(QueueError::Closed);
        }
        state.jobs.push_back(job);
        self.shared.condvar.notify_one();
        Ok(())
    }

    pub fn push_all(&self, jobs: impl IntoIterator<Item = Job>) -> Result<(), QueueError> {
        let mut state = self.shared.lock()?;
        if state.closed {
            return Err(QueueError::Closed);
        }
        state.jobs.extend(jobs);
        self.shared.condvar.notify_all();
        Ok(())
    }

    /// Jobs still waiting. Jobs already popped are not counted.
    pub fn len(&self) -> Result<usize, QueueError> {
        Ok(self.shared.lock()?.jobs.len())
    }

    pub fn is_empty(&self) -> Result<bool, QueueError> {
        Ok(self.len()? == 0)
    }

    /// Reject further pushes and release blocked pops. Pending jobs are
    /// still handed out.
    pub fn close(&self) -> Result<(), QueueError> {
        let mut state = self.shared.lock()?;
        state.closed = true;
        self.shared.condvar.notify_all();
        Ok(())
    }
}

fn take_batch(state: &mut State, batch_size: usize) -> Vec<Job> {
    let n = batch_size.min(state.jobs.len());
    state.jobs.drain(..n).collect()
}

#[async_trait]
impl QueueHandle for InMemoryQueue {
    fn name(&self) -> &str {
        &self.name
    }

    async fn pop(&self, options: &PopOptions) -> Result<FetchResult, QueueError> {
        let batch_size = options.batch_size();

        // No timeout: return whatever is queued right now.
        let Some(timeout) = options.timeout() else {
            let mut state = self.shared.lock()?;
            return Ok(FetchResult::from_jobs(take_batch(&mut state, batch_size)));
        };

        let shared = Arc::clone(&self.shared);
        tokio::task::spawn_blocking(move || {
            let start = Instant::now();
            let mut guard = shared.lock()?;
            loop {
                if !guard.jobs.is_empty() {
                    return Ok(FetchResult::from_jobs(take_batch(&mut guard, batch_size)));
                }
                if guard.closed {
                    return Ok(FetchResult::Empty);
                }
                let elapsed = start.elapsed();
                if elapsed >= timeout {
                    return Ok(FetchResult::Empty);
                }
                let (new_guard, _) = shared
                    .condvar
                    .wait_timeout(guard, timeout - elapsed)
                    .map_err(|e| QueueError::OperationFailed(format!("lock poisoned: {e}")))?;
                guard = new_guard;
            }
        })
        .await
        .map_err(|e| QueueError::OperationFailed(format!("pop failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::JobKind;
    use serde_json::json;
    use std::time::Duration;

    fn job(n: u32) -> Job {
        Job::new(JobKind::new("test"), json!({ "n": n }))
    }

    #[tokio::test]
    async fn test_push_pop_single() {
        let queue = InMemoryQueue::new("default");
        let j = job(1);
        queue.push(j.clone()).unwrap();

        let popped = queue.pop(&PopOptions::new()).await.unwrap();
        assert_eq!(popped, FetchResult::Single(j));
    }

    #[tokio::test]
    async fn test_pop_batch_respects_size() {
        let queue = InMemoryQueue::new("default");
        queue.push_all((0..5).map(job)).unwrap();

        let popped = queue
            .pop(&PopOptions::new().with_batch_size(3))
            .await
            .unwrap();
        assert_eq!(popped.len(), 3);
        assert!(matches!(popped, FetchResult::Batch(_)));
        assert_eq!(queue.len().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_pop_without_timeout_returns_empty_immediately() {
        let queue = InMemoryQueue::new("default");
        let popped = queue.pop(&PopOptions::new()).await.unwrap();
        assert_eq!(popped, FetchResult::Empty);
    }

    #[tokio::test]
    async fn test_pop_timeout() {
        let queue = InMemoryQueue::new("default");
        let start = Instant::now();
        let popped = queue
            .pop(&PopOptions::new().with_timeout(Duration::from_millis(200)))
            .await
            .unwrap();

        assert!(start.elapsed() >= Duration::from_millis(200));
        assert_eq!(popped, FetchResult::Empty);
    }

    #[tokio::test]
    async fn test_push_wakes_pop() {
        let queue = InMemoryQueue::new("default");
        let j = job(1);

        let waiter = tokio::spawn({
            let queue = queue.clone();
            async move {
                queue
                    .pop(&PopOptions::new().with_timeout(Duration::from_secs(5)))
                    .await
                    .unwrap()
            }
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        queue.push(j.clone()).unwrap();

        assert_eq!(waiter.await.unwrap(), FetchResult::Single(j));
    }

    #[tokio::test]
    async fn test_close_releases_waiters_and_rejects_push() {
        let queue = InMemoryQueue::new("default");

        let waiter = tokio::spawn({
            let queue = queue.clone();
            async move {
                queue
                    .pop(&PopOptions::new().with_timeout(Duration::from_secs(5)))
                    .await
                    .unwrap()
            }
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        queue.close().unwrap();

        assert_eq!(waiter.await.unwrap(), FetchResult::Empty);
        assert!(matches!(queue.push(job(1)), Err(QueueError::Closed)));
    }
}
