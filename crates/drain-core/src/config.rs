//! Config - worker options and per-call pop options.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

use crate::error::WorkerError;

const DEFAULT_MAX_RUNS: u64 = 100_000;
const DEFAULT_MAX_MEMORY_BYTES: u64 = 100 * 1024 * 1024;

/// How many jobs one `process` call may dispatch.
///
/// Serialized as `null` (unbounded) or a positive integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<u64>", into = "Option<u64>")]
pub enum MaxRuns {
    Unbounded,
    Limit(u64),
}

impl MaxRuns {
    /// Has `count` reached the limit? Always false when unbounded.
    pub fn is_reached(self, count: u64) -> bool {
        match self {
            MaxRuns::Unbounded => false,
            MaxRuns::Limit(limit) => count == limit,
        }
    }
}

impl Default for MaxRuns {
    fn default() -> Self {
        MaxRuns::Limit(DEFAULT_MAX_RUNS)
    }
}

impl From<Option<u64>> for MaxRuns {
    fn from(value: Option<u64>) -> Self {
        value.map_or(MaxRuns::Unbounded, MaxRuns::Limit)
    }
}

impl From<MaxRuns> for Option<u64> {
    fn from(value: MaxRuns) -> Self {
        match value {
            MaxRuns::Unbounded => None,
            MaxRuns::Limit(n) => Some(n),
        }
    }
}

/// Stop conditions for a worker. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerOptions {
    max_runs: MaxRuns,
    /// Byte threshold for process memory usage.
    max_memory: u64,
}

impl WorkerOptions {
    pub fn new(max_runs: MaxRuns, max_memory: u64) -> Result<Self, WorkerError> {
        let options = Self {
            max_runs,
            max_memory,
        };
        options.validate()?;
        Ok(options)
    }

    /// Deserialized options skip `new`, so callers loading from JSON run this.
    pub fn validate(&self) -> Result<(), WorkerError> {
        if self.max_runs == MaxRuns::Limit(0) {
            return Err(WorkerError::InvalidOptions(
                "max_runs must be positive or unbounded".to_string(),
            ));
        }
        Ok(())
    }

    pub fn max_runs(&self) -> MaxRuns {
        self.max_runs
    }

    pub fn max_memory(&self) -> u64 {
        self.max_memory
    }
}

impl Default for WorkerOptions {
    fn default() -> Self {
        Self {
            max_runs: MaxRuns::default(),
            max_memory: DEFAULT_MAX_MEMORY_BYTES,
        }
    }
}

/// Per-call options handed to the queue's `pop`.
///
/// `timeout_ms` and `batch_size` are understood by the bundled in-memory
/// queue. Anything else lands in `extra` and is passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PopOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// At least 1.
    pub fn batch_size(&self) -> usize {
        self.batch_size.unwrap_or(1).max(1)
    }
}
