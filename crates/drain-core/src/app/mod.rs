//! App - the worker and the pieces wired around it
//!
//! - **Worker** / **WorkerBuilder**: the processing loop and its stop state
//! - **EventManager**: identifier-scoped event dispatch
//! - **SignalBridge**: OS signals -> worker stop flag

pub mod events;
pub mod signals;
pub mod worker;

pub use self::events::{BASE_IDENTIFIER, EventIdentifiers, EventManager, WILDCARD_SCOPE};
pub use self::signals::SignalBridge;
pub use self::worker::{Worker, WorkerBuilder};
