//! EventListener port - subscribers for worker events.

use crate::domain::WorkerEvent;

/// Receives events published by a worker.
///
/// Listeners run inline on the publishing task, so keep them short. They
/// cannot fail the worker.
pub trait EventListener: Send + Sync {
    fn on_event(&self, event: &WorkerEvent);
}

impl<F> EventListener for F
where
    F: Fn(&WorkerEvent) + Send + Sync,
{
    fn on_event(&self, event: &WorkerEvent) {
        self(event)
    }
}
