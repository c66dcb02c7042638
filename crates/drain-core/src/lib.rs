//! drain-core
//!
//! A worker that drains one named queue per `process` call and stops on
//! max runs, a memory ceiling, or a termination signal.
//!
//! # Modules
//! - **domain**: jobs, fetch results, signals, events
//! - **ports**: traits for the external collaborators (queue, processor, listener, memory)
//! - **impls**: in-memory queue, handler-based processor, memory probes
//! - **app**: `Worker`, `EventManager`, `SignalBridge`

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod impls;
pub mod ports;

pub use app::{SignalBridge, Worker, WorkerBuilder};
pub use config::{MaxRuns, PopOptions, WorkerOptions};
pub use error::{JobFailure, QueueError, WorkerError};
