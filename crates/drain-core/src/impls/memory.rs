//! Memory probes - process RSS via sysinfo, and a fixed value for tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use sysinfo::{Pid, System};

use crate::ports::MemoryProbe;

/// Reads the resident memory of the current process.
///
/// If the process cannot be sampled the probe reports 0 bytes, so the memory
/// predicate never fires on a sampling failure.
pub struct SysinfoMemoryProbe {
    pid: Option<Pid>,
    system: Mutex<System>,
}

impl SysinfoMemoryProbe {
    pub fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                tracing::warn!(error = e, "cannot resolve current pid; memory probe disabled");
                None
            }
        };
        Self {
            pid,
            system: Mutex::new(System::new()),
        }
    }
}

impl Default for SysinfoMemoryProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProbe for SysinfoMemoryProbe {
    fn usage_bytes(&self) -> u64 {
        let Some(pid) = self.pid else {
            return 0;
        };
        let Ok(mut system) = self.system.lock() else {
            return 0;
        };
        if !system.refresh_process(pid) {
            return 0;
        }
        system.process(pid).map_or(0, |p| p.memory())
    }
}

/// Reports whatever value it was last set to.
#[derive(Debug, Default)]
pub struct FixedMemoryProbe {
    bytes: AtomicU64,
}

impl FixedMemoryProbe {
    pub fn new(bytes: u64) -> Self {
        Self {
            bytes: AtomicU64::new(bytes),
        }
    }

    pub fn set(&self, bytes: u64) {
        self.bytes.store(bytes, Ordering::Relaxed);
    }
}

impl MemoryProbe for FixedMemoryProbe {
    fn usage_bytes(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sysinfo_probe_sees_this_process() {
        let probe = SysinfoMemoryProbe::new();
        assert!(probe.usage_bytes() > 0);
    }

    #[test]
    fn fixed_probe_reports_last_value() {
        let probe = FixedMemoryProbe::new(10);
        assert_eq!(probe.usage_bytes(), 10);
        probe.set(20);
        assert_eq!(probe.usage_bytes(), 20);
    }
}
