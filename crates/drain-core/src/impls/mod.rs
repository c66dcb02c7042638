//! Impls - development and default implementations of the ports
//!
//! - **InMemoryQueue** / **QueueRegistry**: queue side
//! - **HandlerProcessor**: per-kind routes to `JobHandler`s
//! - **SysinfoMemoryProbe** / **FixedMemoryProbe**: memory sampling
//! - **TracingListener**: logs worker events

pub mod handler;
pub mod inmem_queue;
pub mod memory;
pub mod registry;
pub mod tracing_listener;

pub use self::handler::{HandlerProcessor, JobHandler};
pub use self::inmem_queue::InMemoryQueue;
pub use self::memory::{FixedMemoryProbe, SysinfoMemoryProbe};
pub use self::registry::QueueRegistry;
pub use self::tracing_listener::TracingListener;
