// SPDX-License-Identifier: MIT
//! Creation, discovery and loading of benchmarks.
//!
//! A benchmark is a frozen profiling session stored as
//!
//! ```text
//! <root>/benchmark/
//!     benchmark.info      identity: name, cpu info, legend, events
//!     appinfo.txt         application info shared by every run
//!     <run-id>/...        raw sample files of one run
//! ```

pub mod collector;
pub mod info;
pub mod writer;

use std::fmt;
use std::path::PathBuf;

use crate::datasource::DataSource;
use crate::types::{CpuInfo, Event};
use info::BenchmarkInfo;

pub const BENCHMARK_DIR_NAME: &str = "benchmark";
pub const BENCHMARK_APPINFO_FILE_NAME: &str = "appinfo.txt";

#[derive(Debug, thiserror::Error)]
pub enum BenchmarkError {
    #[error("failed to make benchmark - path {} already exists", .0.display())]
    Conflict(PathBuf),
    #[error(transparent)]
    Io(#[from] anyhow::Error),
}

#[derive(Clone, Debug)]
pub struct Benchmark {
    pub name: String,
    pub cpu_info: CpuInfo,
    pub path: PathBuf,
    pub legend: String,
    pub events: Vec<Event>,
    pub data_sources: Vec<DataSource>,
}

impl Benchmark {
    /// Builds a benchmark with no data sources from decoded identity.
    #[must_use]
    pub fn from_info(info: BenchmarkInfo, path: PathBuf) -> Self {
        Self {
            name: info.name,
            cpu_info: info.cpu_info,
            path,
            legend: info.legend,
            events: info.events,
            data_sources: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.data_sources.is_empty()
    }
}

impl fmt::Display for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Benchmark {}: [", self.name)?;
        for (i, source) in self.data_sources.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{source}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;

    #[test]
    fn benchmark_from_info_has_no_data_sources() {
        let info = BenchmarkInfo {
            name: "baseline".to_string(),
            cpu_info: CpuInfo::new("GenuineIntel-6-55-4", 2_000_000_000),
            legend: "nightly".to_string(),
            events: vec![Event::user("cycles")],
            created: SystemTime::UNIX_EPOCH,
        };

        let benchmark = Benchmark::from_info(info, PathBuf::from("/tmp/baseline/benchmark"));

        assert_eq!(benchmark.name, "baseline");
        assert_eq!(benchmark.legend, "nightly");
        assert_eq!(benchmark.events.len(), 1);
        assert!(!benchmark.is_usable());
        assert_eq!(benchmark.to_string(), "Benchmark baseline: []");
    }

    #[test]
    fn conflict_error_names_the_path() {
        let err = BenchmarkError::Conflict(PathBuf::from("/data/run/benchmark"));
        assert_eq!(
            err.to_string(),
            "failed to make benchmark - path /data/run/benchmark already exists"
        );
    }
}
