// SPDX-License-Identifier: MIT
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result, anyhow};
use tracing::{Dispatch, debug, info};
use walkdir::WalkDir;

use super::info::{BenchmarkInfo, encode_benchmark_info};
use super::{BENCHMARK_APPINFO_FILE_NAME, BENCHMARK_DIR_NAME, BenchmarkError};
use crate::session::ProfileSession;

/// Freezes profiling sessions into benchmark directories.
pub struct BenchmarkWriter {
    log: Dispatch,
}

impl Default for BenchmarkWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BenchmarkWriter {
    /// Creates a writer that logs to the current default subscriber.
    #[must_use]
    pub fn new() -> Self {
        Self::with_dispatch(Dispatch::default())
    }

    #[must_use]
    pub fn with_dispatch(log: Dispatch) -> Self {
        Self { log }
    }

    /// Persists the current collection of `session` under
    /// `destination_root/benchmark` and returns that directory.
    ///
    /// The benchmark is named after the last segment of `destination_root`.
    /// Every run directory is copied recursively; the app-info files of all
    /// runs land on the same `appinfo.txt`, so the last data source wins.
    ///
    /// # Errors
    ///
    /// Returns [`BenchmarkError::Conflict`] if the benchmark directory already
    /// exists, and [`BenchmarkError::Io`] for any copy or serialization
    /// failure. A failed write is not rolled back.
    pub fn make_benchmark(
        &self,
        session: &ProfileSession,
        destination_root: &Path,
    ) -> Result<PathBuf, BenchmarkError> {
        tracing::dispatcher::with_default(&self.log, || {
            write_benchmark(session, destination_root)
        })
    }
}

fn write_benchmark(
    session: &ProfileSession,
    destination_root: &Path,
) -> Result<PathBuf, BenchmarkError> {
    let name = destination_root
        .file_name()
        .ok_or_else(|| {
            anyhow!(
                "cannot derive benchmark name from {}",
                destination_root.display()
            )
        })?
        .to_str()
        .ok_or_else(|| {
            anyhow!(
                "benchmark name is not valid UTF-8: {}",
                destination_root.display()
            )
        })?
        .to_string();

    let path = destination_root.join(BENCHMARK_DIR_NAME);
    if path.exists() {
        return Err(BenchmarkError::Conflict(path));
    }

    let collection = session.transaction_repo.current();
    if collection.data_sources.is_empty() {
        return Err(anyhow!("session has no data sources to persist").into());
    }

    fs::create_dir_all(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    let app_info_dest = path.join(BENCHMARK_APPINFO_FILE_NAME);
    let mut last_app_info: Option<&Path> = None;
    let mut copied_runs: HashMap<&OsStr, &Path> = HashMap::new();

    for data_source in &collection.data_sources {
        let samples = data_source.samples_path();
        let run_id = samples
            .file_name()
            .ok_or_else(|| anyhow!("samples path has no name: {}", samples.display()))?;
        if let Some(earlier) = copied_runs.insert(run_id, samples) {
            return Err(anyhow!(
                "run {} collides with {}: both map to {}",
                samples.display(),
                earlier.display(),
                path.join(run_id).display()
            )
            .into());
        }
        copy_dir(samples, &path.join(run_id))?;

        if let Some(previous) = last_app_info
            && previous != data_source.app_info_path()
        {
            debug!(
                "app info {} replaces {} in benchmark {name}",
                data_source.app_info_path().display(),
                previous.display()
            );
        }
        fs::copy(data_source.app_info_path(), &app_info_dest).with_context(|| {
            format!(
                "failed to copy {} to {}",
                data_source.app_info_path().display(),
                app_info_dest.display()
            )
        })?;
        last_app_info = Some(data_source.app_info_path());
    }

    let info = BenchmarkInfo {
        legend: session.legend.clone().unwrap_or_else(|| name.clone()),
        name,
        cpu_info: session.cpu_info.clone(),
        events: session.events.clone(),
        created: SystemTime::now(),
    };
    encode_benchmark_info(&info, &path)?;

    info!(
        "created benchmark {} with {} run(s) at {}",
        info.name,
        collection.data_sources.len(),
        path.display()
    );
    Ok(path)
}

fn copy_dir(source: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(source).follow_links(true) {
        let entry = entry.with_context(|| format!("failed to walk {}", source.display()))?;
        let from = entry.path();
        let to = dest.join(from.strip_prefix(source)?);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&to)
                .with_context(|| format!("failed to create {}", to.display()))?;
        } else {
            fs::copy(from, &to).with_context(|| {
                format!("failed to copy {} to {}", from.display(), to.display())
            })?;
        }
    }
    Ok(())
}
