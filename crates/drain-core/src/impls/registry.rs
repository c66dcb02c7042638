//! QueueRegistry - name -> queue handle
//!
//! Built during initialization (mutable), read during processing (immutable).

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::WorkerError;
use crate::ports::{QueueHandle, QueueSource};

#[derive(Default)]
pub struct QueueRegistry {
    queues: HashMap<String, Arc<dyn QueueHandle>>,
}

impl QueueRegistry {
    pub fn new() -> Self {
        Self {
            queues: HashMap::new(),
        }
    }

    /// Register a queue under its own name.
    pub fn register(&mut self, queue: Arc<dyn QueueHandle>) -> Result<(), WorkerError> {
        let name = queue.name().to_string();
        if self.queues.contains_key(&name) {
            return Err(WorkerError::DuplicateQueue(name));
        }
        self.queues.insert(name, queue);
        Ok(())
    }
}

impl QueueSource for QueueRegistry {
    fn get(&self, name: &str) -> Option<Arc<dyn QueueHandle>> {
        self.queues.get(name).cloned()
    }
}
