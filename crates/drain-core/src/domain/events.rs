//! Events - lifecycle notifications published by the worker.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;

use super::Signal;

/// Why a `process` call returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// `max_runs` jobs were dispatched.
    MaxRuns,
    /// Process memory went above `max_memory`.
    MaxMemory,
    /// The stop flag was set (signal or explicit stop).
    Stopped,
    /// The queue returned an empty result.
    QueueDrained,
}

impl StopReason {
    pub fn as_str(self) -> &'static str {
        match self {
            StopReason::MaxRuns => "max_runs",
            StopReason::MaxMemory => "max_memory",
            StopReason::Stopped => "stopped",
            StopReason::QueueDrained => "queue_drained",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event published to the worker's event manager.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEvent {
    /// A tracked termination signal arrived.
    SignalReceived { signal: Signal },
    /// A `process` call resolved its queue and is about to fetch.
    ProcessStarted { queue: String },
    /// A `process` call is returning normally.
    ProcessStopped {
        queue: String,
        count: u64,
        reason: StopReason,
    },
}

impl WorkerEvent {
    pub const HANDLE_SIGNAL: &'static str = "handle_signal";
    pub const PROCESS_QUEUE_START: &'static str = "process_queue.start";
    pub const PROCESS_QUEUE_STOP: &'static str = "process_queue.stop";

    pub fn name(&self) -> &'static str {
        match self {
            WorkerEvent::SignalReceived { .. } => Self::HANDLE_SIGNAL,
            WorkerEvent::ProcessStarted { .. } => Self::PROCESS_QUEUE_START,
            WorkerEvent::ProcessStopped { .. } => Self::PROCESS_QUEUE_STOP,
        }
    }

    pub fn payload(&self) -> Value {
        match self {
            WorkerEvent::SignalReceived { signal } => json!({ "signo": signal }),
            WorkerEvent::ProcessStarted { queue } => json!({ "queue": queue }),
            WorkerEvent::ProcessStopped {
                queue,
                count,
                reason,
            } => json!({ "queue": queue, "count": count, "reason": reason }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SIGTERM;

    #[test]
    fn signal_event_carries_signal_number() {
        let event = WorkerEvent::SignalReceived {
            signal: Signal::Terminate,
        };
        assert_eq!(event.name(), "handle_signal");
        assert_eq!(event.payload(), json!({ "signo": SIGTERM }));
    }

    #[test]
    fn stop_event_payload() {
        let event = WorkerEvent::ProcessStopped {
            queue: "default".to_string(),
            count: 2,
            reason: StopReason::MaxRuns,
        };
        let payload = event.payload();
        assert_eq!(payload["count"], 2);
        assert_eq!(payload["reason"], "max_runs");
    }
}
