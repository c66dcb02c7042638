//! Domain model (ids, jobs, fetch results, signals, events).

pub mod events;
pub mod fetch;
pub mod ids;
pub mod job;
pub mod signal;

pub use self::events::{StopReason, WorkerEvent};
pub use self::fetch::FetchResult;
pub use self::ids::JobId;
pub use self::job::{Job, JobKind};
pub use self::signal::{SIGINT, SIGTERM, Signal};
