//! MemoryProbe port - process-wide memory snapshot.

/// Samples current memory usage of the whole process, in bytes.
///
/// The worker calls this after every dispatched job.
pub trait MemoryProbe: Send + Sync {
    fn usage_bytes(&self) -> u64;
}
