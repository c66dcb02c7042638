//! Errors - worker / queue / job failure types

use thiserror::Error;

use crate::domain::{JobId, JobKind};

/// Errors surfaced by [`crate::app::Worker`] and its construction.
///
/// None of these are recovered inside the worker: `process` returns them to
/// the caller as-is.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("queue not found: {0}")]
    QueueNotFound(String),

    #[error("duplicate queue registered under name={0}")]
    DuplicateQueue(String),

    #[error("duplicate handler for kind={0}")]
    DuplicateHandler(JobKind),

    #[error("job {job_id} failed: {source}")]
    JobExecution {
        job_id: JobId,
        #[source]
        source: JobFailure,
    },

    #[error("fetch from queue={queue} failed: {source}")]
    Fetch {
        queue: String,
        #[source]
        source: QueueError,
    },

    #[error("invalid event identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("invalid worker options: {0}")]
    InvalidOptions(String),
}

/// Errors raised by a queue handle's retrieval or push operations.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue is closed")]
    Closed,

    #[error("queue operation failed: {0}")]
    OperationFailed(String),
}

/// Failure raised by a [`crate::ports::JobProcessor`] while executing one job.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct JobFailure {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl JobFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn job_failure_keeps_source() {
        let io = std::io::Error::other("disk gone");
        let failure = JobFailure::with_source("write report", io);

        assert_eq!(failure.message(), "write report");
        assert_eq!(failure.source().unwrap().to_string(), "disk gone");
    }

    #[test]
    fn queue_not_found_mentions_name() {
        let err = WorkerError::QueueNotFound("mail".to_string());
        assert!(err.to_string().contains("mail"));
    }
}
