//! SignalBridge - OS termination signals -> `Worker::handle_signal`
//!
//! The bridge only flips the worker's stop flag (through `handle_signal`). It
//! never interrupts a job; the loop notices the flag at its next check.

use std::io;

use tokio::task::JoinHandle;

use super::Worker;
#[cfg(not(unix))]
use crate::domain::SIGINT;
#[cfg(unix)]
use crate::domain::{SIGINT, SIGTERM};

/// Background task forwarding signals to a worker. Dropping it stops forwarding.
pub struct SignalBridge {
    join: JoinHandle<()>,
}

impl SignalBridge {
    /// Listen for SIGTERM and SIGINT and forward every delivery.
    ///
    /// Must be called from within a tokio runtime.
    #[cfg(unix)]
    pub fn install(worker: Worker) -> io::Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        let join = tokio::spawn(async move {
            loop {
                let signo = tokio::select! {
                    Some(()) = sigterm.recv() => SIGTERM,
                    Some(()) = sigint.recv() => SIGINT,
                    else => break,
                };
                worker.handle_signal(signo);
            }
        });

        tracing::info!("signal bridge listening for SIGTERM, SIGINT");
        Ok(Self { join })
    }

    /// Only Ctrl-C is available here; it is forwarded as SIGINT.
    #[cfg(not(unix))]
    pub fn install(worker: Worker) -> io::Result<Self> {
        let join = tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                worker.handle_signal(SIGINT);
            }
        });

        tracing::info!("signal bridge listening for Ctrl-C");
        Ok(Self { join })
    }
}

impl Drop for SignalBridge {
    fn drop(&mut self) {
        self.join.abort();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::app::{EventManager, WILDCARD_SCOPE};
    use crate::domain::WorkerEvent;
    use crate::impls::{FixedMemoryProbe, HandlerProcessor, QueueRegistry};
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::signal::unix::{SignalKind, signal};

    // Signals are process-wide: tests that raise one must not overlap.
    static SIGNAL_TESTS: Mutex<()> = Mutex::new(());

    fn worker_recording_signals() -> (Worker, Arc<Mutex<Vec<Value>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let manager = EventManager::new().with_listener(
            WILDCARD_SCOPE,
            Arc::new(move |event: &WorkerEvent| {
                if event.name() == WorkerEvent::HANDLE_SIGNAL {
                    sink.lock().unwrap().push(event.payload());
                }
            }),
        );

        let worker = Worker::builder(
            Arc::new(QueueRegistry::new()),
            Arc::new(HandlerProcessor::new()),
        )
        .memory_probe(Arc::new(FixedMemoryProbe::new(0)))
        .event_manager(manager)
        .build()
        .unwrap();
        (worker, seen)
    }

    fn raise_sigterm() {
        let status = std::process::Command::new("kill")
            .arg("-TERM")
            .arg(std::process::id().to_string())
            .status()
            .unwrap();
        assert!(status.success());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn sigterm_reaches_the_worker() {
        let _serial = SIGNAL_TESTS.lock().unwrap_or_else(|p| p.into_inner());
        let (worker, seen) = worker_recording_signals();
        let _bridge = SignalBridge::install(worker.clone()).unwrap();
        assert!(!worker.is_stopped());

        raise_sigterm();

        tokio::time::timeout(Duration::from_secs(5), async {
            while !worker.is_stopped() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("worker was not stopped by SIGTERM");

        assert_eq!(*seen.lock().unwrap(), vec![json!({ "signo": 15 })]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn dropped_bridge_forwards_nothing() {
        let _serial = SIGNAL_TESTS.lock().unwrap_or_else(|p| p.into_inner());
        let (worker, seen) = worker_recording_signals();
        let bridge = SignalBridge::install(worker.clone()).unwrap();
        drop(bridge);

        // Independent listener, so we know the signal was actually delivered.
        let mut witness = signal(SignalKind::terminate()).unwrap();
        raise_sigterm();
        tokio::time::timeout(Duration::from_secs(5), witness.recv())
            .await
            .expect("SIGTERM was not delivered");
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!worker.is_stopped());
        assert!(seen.lock().unwrap().is_empty());
    }
}
