// SPDX-License-Identifier: MIT
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{Dispatch, debug, warn};

use super::info::load_benchmark_info;
use super::{BENCHMARK_APPINFO_FILE_NAME, BENCHMARK_DIR_NAME, Benchmark};
use crate::datasource::DataSource;
use crate::txn::collector::{Collector, Loader};
use crate::txn::{CounterFilter, TransactionRepo};

/// Scans candidate directories for benchmarks.
pub struct BenchmarksCollector {
    benchmark_paths: Vec<PathBuf>,
    log: Dispatch,
}

impl BenchmarksCollector {
    /// Creates a collector that logs to the current default subscriber.
    #[must_use]
    pub fn new(benchmark_paths: Vec<PathBuf>) -> Self {
        Self::with_dispatch(benchmark_paths, Dispatch::default())
    }

    #[must_use]
    pub fn with_dispatch(benchmark_paths: Vec<PathBuf>, log: Dispatch) -> Self {
        Self {
            benchmark_paths,
            log,
        }
    }

    /// Returns the first `max_count` usable benchmarks, in candidate order.
    ///
    /// Candidates without a benchmark directory or with unusable metadata
    /// are skipped with a warning; candidates without any run directory are
    /// skipped silently. Never fails.
    #[must_use]
    pub fn gather_benchmarks(&self, max_count: usize) -> Vec<Benchmark> {
        tracing::dispatcher::with_default(&self.log, || self.scan(max_count))
    }

    fn scan(&self, max_count: usize) -> Vec<Benchmark> {
        let mut benchmarks = Vec::new();
        if max_count == 0 {
            debug!("benchmark limit is zero, nothing to gather");
            return benchmarks;
        }

        for (i, path) in self.benchmark_paths.iter().enumerate() {
            let benchmark_path = path.join(BENCHMARK_DIR_NAME);
            if !benchmark_path.is_dir() {
                warn!(
                    "skip processing benchmark {}. failed to locate benchmark files",
                    path.display()
                );
                continue;
            }

            let Some(info) = load_benchmark_info(&benchmark_path) else {
                warn!(
                    "skip processing benchmark {}. failed to load benchmark info",
                    path.display()
                );
                continue;
            };

            let mut benchmark = Benchmark::from_info(info, benchmark_path);
            benchmark.data_sources = Self::gather_data_sources(&benchmark.path);
            if !benchmark.is_usable() {
                continue;
            }
            benchmarks.push(benchmark);

            if benchmarks.len() >= max_count {
                let remaining = &self.benchmark_paths[i + 1..];
                if !remaining.is_empty() {
                    debug!(
                        "skip processing {:?} benchmarks. limit reached.",
                        remaining
                    );
                }
                break;
            }
        }
        benchmarks
    }

    /// Pairs every run directory under `path` with the shared app-info file.
    ///
    /// Runs are ordered by directory name. Returns nothing if the app-info
    /// file is missing or the directory cannot be read.
    #[must_use]
    pub fn gather_data_sources(path: &Path) -> Vec<DataSource> {
        let app_info_path = path.join(BENCHMARK_APPINFO_FILE_NAME);
        if !app_info_path.is_file() {
            return Vec::new();
        }
        let Ok(read_dir) = fs::read_dir(path) else {
            return Vec::new();
        };

        let mut run_dirs: Vec<PathBuf> = read_dir
            .flatten()
            .map(|entry| entry.path())
            .filter(|run| run.is_dir())
            .collect();
        run_dirs.sort_unstable();

        run_dirs
            .into_iter()
            .filter_map(|run| DataSource::new(&app_info_path, run).ok())
            .collect()
    }

    /// Loads every benchmark through its own loader and adds the result to
    /// `repo`, in order.
    ///
    /// # Errors
    ///
    /// Stops at the first benchmark that fails to load. Benchmarks added
    /// before the failure stay in `repo`.
    pub fn load_txns<F>(
        repo: &mut TransactionRepo,
        counter_filter: &CounterFilter,
        benchmarks: &[Benchmark],
        mut loader_factory: F,
    ) -> Result<()>
    where
        F: FnMut(&Benchmark) -> Box<dyn Loader>,
    {
        for benchmark in benchmarks {
            let mut loader = loader_factory(benchmark);
            let collector = Collector::new(counter_filter.clone());
            collector.load_data_sources(&benchmark.data_sources, loader.as_mut())?;
            repo.add_benchmark(loader.data());
        }
        Ok(())
    }
}
