//! Job - the unit of work pulled from a queue.
//!
//! The worker never looks inside a job. `kind` and `payload` exist for the
//! processor; `metadata` is free-form bookkeeping a queue may attach
//! (delivery counts, receipt handles, ...).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::JobId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobKind(String);

impl JobKind {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    id: JobId,
    kind: JobKind,
    payload: Value,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    metadata: Map<String, Value>,
}

impl Job {
    pub fn new(kind: JobKind, payload: Value) -> Self {
        Self {
            id: JobId::generate(),
            kind,
            payload,
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn kind(&self) -> &JobKind {
        &self.kind
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }
}
