//! HandlerProcessor - a `JobProcessor` made of per-kind routes
//!
//! Routes are fixed once the processor is handed to a worker. A job whose kind
//! has no route fails, which ends the `process` call like any other failure.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Job, JobKind};
use crate::error::{JobFailure, WorkerError};
use crate::ports::{JobProcessor, QueueHandle};

/// Runs jobs of one kind.
///
/// Gets the same queue handle the worker popped from, so a handler can look
/// at the queue name or hand follow-up work back to its own queue.
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn handle(&self, job: &Job, queue: &dyn QueueHandle) -> Result<(), JobFailure>;
}

#[derive(Default)]
pub struct HandlerProcessor {
    routes: HashMap<JobKind, Arc<dyn JobHandler>>,
}

impl HandlerProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route. A kind can be routed only once.
    ///
    /// ```ignore
    /// let processor = HandlerProcessor::new()
    ///     .route(JobKind::new("mail.send"), Arc::new(SendMail))?
    ///     .route(JobKind::new("mail.bounce"), Arc::new(RecordBounce))?;
    /// ```
    pub fn route(mut self, kind: JobKind, handler: Arc<dyn JobHandler>) -> Result<Self, WorkerError> {
        if self.routes.contains_key(&kind) {
            return Err(WorkerError::DuplicateHandler(kind));
        }
        self.routes.insert(kind, handler);
        Ok(self)
    }
}

#[async_trait]
impl JobProcessor for HandlerProcessor {
    async fn process_job(&self, job: &Job, queue: &dyn QueueHandle) -> Result<(), JobFailure> {
        let Some(handler) = self.routes.get(job.kind()) else {
            return Err(JobFailure::new(format!(
                "no route for kind `{}` (queue `{}`)",
                job.kind(),
                queue.name()
            )));
        };

        tracing::trace!(job_id = %job.id(), kind = %job.kind(), "routing job");
        handler.handle(job, queue).await
    }
}
