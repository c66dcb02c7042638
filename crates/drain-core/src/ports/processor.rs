//! JobProcessor port - executes one job.

use async_trait::async_trait;

use super::QueueHandle;
use crate::domain::Job;
use crate::error::JobFailure;

/// Executes one job against the queue it came from.
///
/// Any error returned here ends the current `process` call. Retry, backoff
/// and acknowledgement policy live in the implementation.
#[async_trait]
pub trait JobProcessor: Send + Sync {
    async fn process_job(&self, job: &Job, queue: &dyn QueueHandle) -> Result<(), JobFailure>;

    /// Identifier of the concrete processor, used to scope event subscriptions.
    fn identifier(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
