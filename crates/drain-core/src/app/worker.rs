//! Worker - pulls jobs from one queue until a stop condition holds
//!
//! # Loop
//! 1. resolve the queue name (`QueueNotFound` if unknown)
//! 2. pop with the caller's options; an empty result ends the call
//! 3. dispatch each job in order, then check, after every job:
//!    max runs → memory ceiling → stop flag
//!
//! A job failure or a fetch failure ends the call with an error. There is no
//! retry here; that is the processor's (or an outer supervisor's) business.
//!
//! The stop flag is a `CancellationToken`, so once set it stays set.

use std::sync::{Arc, RwLock};

use tokio_util::sync::CancellationToken;

use super::events::{BASE_IDENTIFIER, EventIdentifiers, EventManager};
use crate::config::{PopOptions, WorkerOptions};
use crate::domain::{Signal, StopReason, WorkerEvent};
use crate::error::WorkerError;
use crate::impls::SysinfoMemoryProbe;
use crate::ports::{JobProcessor, MemoryProbe, QueueSource};

struct Inner {
    queues: Arc<dyn QueueSource>,
    processor: Arc<dyn JobProcessor>,
    options: WorkerOptions,
    memory: Arc<dyn MemoryProbe>,
    shutdown: CancellationToken,
    identifiers: EventIdentifiers,
    events: RwLock<Arc<EventManager>>,
}

/// Cheap to clone; clones share the stop flag and the event manager.
#[derive(Clone)]
pub struct Worker {
    inner: Arc<Inner>,
}

impl Worker {
    /// Worker with default memory probe, fresh stop flag and no subscribers.
    pub fn new(
        queues: Arc<dyn QueueSource>,
        processor: Arc<dyn JobProcessor>,
        options: WorkerOptions,
    ) -> Result<Self, WorkerError> {
        WorkerBuilder::new(queues, processor).options(options).build()
    }

    pub fn builder(
        queues: Arc<dyn QueueSource>,
        processor: Arc<dyn JobProcessor>,
    ) -> WorkerBuilder {
        WorkerBuilder::new(queues, processor)
    }

    /// Process jobs from `queue_name` and return how many were dispatched.
    ///
    /// Jobs left in a batch when a stop condition fires are not dispatched;
    /// the queue is responsible for redelivering them.
    #[tracing::instrument(skip_all, fields(queue = %queue_name))]
    pub async fn process(&self, queue_name: &str, options: &PopOptions) -> Result<u64, WorkerError> {
        let queue = self
            .inner
            .queues
            .get(queue_name)
            .ok_or_else(|| WorkerError::QueueNotFound(queue_name.to_string()))?;

        tracing::info!("processing queue");
        self.trigger(&WorkerEvent::ProcessStarted {
            queue: queue_name.to_string(),
        });

        let mut count: u64 = 0;
        loop {
            let fetched = queue
                .pop(options)
                .await
                .map_err(|source| WorkerError::Fetch {
                    queue: queue_name.to_string(),
                    source,
                })?;

            // Timed out or drained: a normal end.
            if fetched.is_empty() {
                return Ok(self.finish(queue_name, count, StopReason::QueueDrained));
            }

            for job in fetched.into_jobs() {
                self.inner
                    .processor
                    .process_job(&job, queue.as_ref())
                    .await
                    .map_err(|source| WorkerError::JobExecution {
                        job_id: job.id(),
                        source,
                    })?;
                count += 1;
                tracing::debug!(job_id = %job.id(), kind = %job.kind(), count, "job processed");

                if let Some(reason) = self.stop_reason(count) {
                    return Ok(self.finish(queue_name, count, reason));
                }
            }
        }
    }

    /// Checked in this order, first hit wins.
    fn stop_reason(&self, count: u64) -> Option<StopReason> {
        if self.inner.options.max_runs().is_reached(count) {
            return Some(StopReason::MaxRuns);
        }
        if self.inner.memory.usage_bytes() > self.inner.options.max_memory() {
            return Some(StopReason::MaxMemory);
        }
        if self.is_stopped() {
            return Some(StopReason::Stopped);
        }
        None
    }

    fn finish(&self, queue_name: &str, count: u64, reason: StopReason) -> u64 {
        tracing::info!(count, %reason, "stopped processing queue");
        self.trigger(&WorkerEvent::ProcessStopped {
            queue: queue_name.to_string(),
            count,
            reason,
        });
        count
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    /// Set the stop flag without publishing anything.
    pub fn stop(&self) {
        self.inner.shutdown.cancel();
    }

    /// React to a raw signal number.
    ///
    /// SIGTERM and SIGINT publish a `handle_signal` event and set the stop
    /// flag; the in-flight job still finishes. Other numbers are ignored.
    pub fn handle_signal(&self, signo: i32) {
        let signal = Signal::from_raw(signo);
        if !signal.is_termination() {
            tracing::debug!(%signal, "ignoring signal");
            return;
        }

        tracing::warn!(%signal, "termination requested; stopping after the current job");
        self.trigger(&WorkerEvent::SignalReceived { signal });
        self.inner.shutdown.cancel();
    }

    /// The token backing the stop flag.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.inner.shutdown.clone()
    }

    pub fn options(&self) -> &WorkerOptions {
        &self.inner.options
    }

    pub fn identifiers(&self) -> &EventIdentifiers {
        &self.inner.identifiers
    }

    pub fn event_manager(&self) -> Arc<EventManager> {
        let guard = self
            .inner
            .events
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Install a new event manager. The worker's identifiers replace whatever
    /// identifiers `manager` carried.
    pub fn set_event_manager(&self, mut manager: EventManager) {
        manager.set_identifiers(self.inner.identifiers.clone());
        let mut guard = self
            .inner
            .events
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(manager);
    }

    fn trigger(&self, event: &WorkerEvent) {
        self.event_manager().trigger(event);
    }
}

/// Builds a [`Worker`], validating options and identifiers up front.
///
/// # Example
/// ```ignore
/// let worker = Worker::builder(queues, processor)
///     .options(WorkerOptions::new(MaxRuns::Limit(500), 256 * 1024 * 1024)?)
///     .identifier("app.mailer")
///     .build()?;
/// ```
pub struct WorkerBuilder {
    queues: Arc<dyn QueueSource>,
    processor: Arc<dyn JobProcessor>,
    options: WorkerOptions,
    memory: Option<Arc<dyn MemoryProbe>>,
    shutdown: Option<CancellationToken>,
    events: Option<EventManager>,
    extra_identifiers: Vec<String>,
}

impl WorkerBuilder {
    pub fn new(queues: Arc<dyn QueueSource>, processor: Arc<dyn JobProcessor>) -> Self {
        Self {
            queues,
            processor,
            options: WorkerOptions::default(),
            memory: None,
            shutdown: None,
            events: None,
            extra_identifiers: Vec::new(),
        }
    }

    pub fn options(mut self, options: WorkerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn memory_probe(mut self, probe: Arc<dyn MemoryProbe>) -> Self {
        self.memory = Some(probe);
        self
    }

    /// Share a stop flag with the caller (tests, supervisors).
    pub fn shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    pub fn event_manager(mut self, manager: EventManager) -> Self {
        self.events = Some(manager);
        self
    }

    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.extra_identifiers.push(identifier.into());
        self
    }

    pub fn identifiers<I, S>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_identifiers
            .extend(identifiers.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Result<Worker, WorkerError> {
        self.options.validate()?;

        let mut identifiers = EventIdentifiers::new();
        identifiers.insert(BASE_IDENTIFIER)?;
        identifiers.insert(self.processor.identifier())?;
        for id in self.extra_identifiers {
            identifiers.insert(id)?;
        }

        let mut events = self.events.unwrap_or_default();
        events.set_identifiers(identifiers.clone());

        let memory = self
            .memory
            .unwrap_or_else(|| Arc::new(SysinfoMemoryProbe::new()));

        Ok(Worker {
            inner: Arc::new(Inner {
                queues: self.queues,
                processor: self.processor,
                options: self.options,
                memory,
                shutdown: self.shutdown.unwrap_or_default(),
                identifiers,
                events: RwLock::new(Arc::new(events)),
            }),
        })
    }
}
