//! TracingListener - logs every worker event.

use crate::domain::WorkerEvent;
use crate::ports::EventListener;

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingListener;

impl EventListener for TracingListener {
    fn on_event(&self, event: &WorkerEvent) {
        tracing::info!(
            target: "drain::events",
            event = event.name(),
            payload = %event.payload(),
            "worker event"
        );
    }
}
