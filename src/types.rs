// SPDX-License-Identifier: MIT
use std::fmt;

use serde::{Deserialize, Serialize};

/// CPU the profiled application ran on when the samples were captured.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CpuInfo {
    pub cpu_id: String,
    pub frequency_hz: u64,
}

impl CpuInfo {
    #[must_use]
    pub fn new(cpu_id: impl Into<String>, frequency_hz: u64) -> Self {
        Self {
            cpu_id: cpu_id.into(),
            frequency_hz,
        }
    }
}

impl fmt::Display for CpuInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[allow(clippy::cast_precision_loss)]
        let ghz = self.frequency_hz as f64 / 1_000_000_000.0;
        write!(f, "{} @ {ghz:.2} GHz", self.cpu_id)
    }
}

/// A PMU event programmed while the benchmark was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub uarch_name: String,
    pub user: bool,
    pub kernel: bool,
}

impl Event {
    /// Creates an event counted in user space only, named the same for
    /// display and for the micro-architecture.
    #[must_use]
    pub fn user(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            uarch_name: name.clone(),
            name,
            user: true,
            kernel: false,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ring = match (self.user, self.kernel) {
            (true, true) => "u+k",
            (true, false) => "u",
            (false, true) => "k",
            (false, false) => "-",
        };
        write!(f, "{} ({ring})", self.name)
    }
}
