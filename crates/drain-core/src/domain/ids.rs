//! Domain identifiers.
//!
//! Job IDs are ULIDs: sortable by creation time and generated without
//! coordination, so any queue implementation can mint them locally.

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Identifier of a Job (one unit of work handed to the processor).
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(Ulid);

impl JobId {
    /// Mint a fresh ID from the current time.
    pub fn generate() -> Self {
        Self(Ulid::new())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_has_job_prefix() {
        let id = JobId::generate();
        assert!(id.to_string().starts_with("job-"));
    }

    #[test]
    fn ids_sort_by_creation_time() {
        let id1 = JobId::generate();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = JobId::generate();

        assert!(id1 < id2);
    }

    #[test]
    fn serializes_as_bare_ulid() {
        let id = JobId::generate();
        let v = serde_json::to_value(id).unwrap();

        assert_eq!(v.as_str().map(str::len), Some(26));
        assert!(!v.as_str().unwrap().starts_with("job-"));
    }
}
