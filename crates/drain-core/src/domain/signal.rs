//! Signal - OS termination requests as seen by the worker.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Interrupt request (Ctrl-C).
pub const SIGINT: i32 = 2;
/// Termination request (`kill`, Docker/Kubernetes stop).
pub const SIGTERM: i32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", from = "i32")]
pub enum Signal {
    Interrupt,
    Terminate,
    /// Any other signal number. Never stops the worker.
    Other(i32),
}

impl Signal {
    pub fn from_raw(signo: i32) -> Self {
        match signo {
            SIGINT => Signal::Interrupt,
            SIGTERM => Signal::Terminate,
            other => Signal::Other(other),
        }
    }

    pub fn as_raw(self) -> i32 {
        match self {
            Signal::Interrupt => SIGINT,
            Signal::Terminate => SIGTERM,
            Signal::Other(n) => n,
        }
    }

    /// Is this one of the signals that stop the worker?
    pub fn is_termination(self) -> bool {
        matches!(self, Signal::Interrupt | Signal::Terminate)
    }
}

impl From<i32> for Signal {
    fn from(signo: i32) -> Self {
        Signal::from_raw(signo)
    }
}

impl From<Signal> for i32 {
    fn from(signal: Signal) -> Self {
        signal.as_raw()
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Interrupt => write!(f, "SIGINT"),
            Signal::Terminate => write!(f, "SIGTERM"),
            Signal::Other(n) => write!(f, "signal {n}"),
        }
    }
}
