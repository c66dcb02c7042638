//! Ports - seams to the worker's external collaborators.
//!
//! The worker only depends on these traits:
//! - queue resolution and retrieval (`QueueSource`, `QueueHandle`)
//! - job execution (`JobProcessor`)
//! - event subscribers (`EventListener`)
//! - memory sampling (`MemoryProbe`)

pub mod event_sink;
pub mod memory;
pub mod processor;
pub mod queue;

pub use self::event_sink::EventListener;
pub use self::memory::MemoryProbe;
pub use self::processor::JobProcessor;
pub use self::queue::{QueueHandle, QueueSource};
