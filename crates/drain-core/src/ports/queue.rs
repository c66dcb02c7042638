//! Queue ports - name resolution and blocking retrieval.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::PopOptions;
use crate::domain::FetchResult;
use crate::error::QueueError;

/// A resolved queue.
///
/// `pop` may block (up to whatever timeout the implementation honours) and
/// returns zero, one or many jobs. Redelivery and acknowledgement belong to
/// the implementation, not to the worker.
#[async_trait]
pub trait QueueHandle: Send + Sync {
    fn name(&self) -> &str;

    async fn pop(&self, options: &PopOptions) -> Result<FetchResult, QueueError>;
}

/// Maps a queue name to its handle. `None` means the name is not registered.
pub trait QueueSource: Send + Sync {
    fn get(&self, name: &str) -> Option<Arc<dyn QueueHandle>>;
}
