// SPDX-License-Identifier: MIT
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use walkdir::WalkDir;

use super::{CounterFilter, TransactionCollection};
use crate::datasource::DataSource;

/// A raw sample file handed to a [`Loader`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleFile {
    pub path: PathBuf,
    pub len: u64,
}

/// Receives the contents of data sources and accumulates transactions.
pub trait Loader {
    /// Called once per data source before any of its sample files.
    ///
    /// # Errors
    ///
    /// Returns an error if the loader cannot accept this data source.
    fn begin_data_source(
        &mut self,
        data_source: &DataSource,
        counter_filter: &CounterFilter,
    ) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the sample file cannot be loaded.
    fn load_sample_file(&mut self, sample: &SampleFile) -> Result<()>;

    fn data(self: Box<Self>) -> TransactionCollection;
}

pub struct Collector {
    counter_filter: CounterFilter,
}

impl Collector {
    #[must_use]
    pub fn new(counter_filter: CounterFilter) -> Self {
        Self { counter_filter }
    }

    /// Feeds every sample file of every data source into `loader`, in
    /// data-source order and file-name order within a data source.
    ///
    /// # Errors
    ///
    /// Returns an error if a data source disappeared, a samples directory
    /// cannot be walked, or the loader rejects a file.
    pub fn load_data_sources(
        &self,
        data_sources: &[DataSource],
        loader: &mut dyn Loader,
    ) -> Result<()> {
        for data_source in data_sources {
            if !data_source.app_info_path().is_file() {
                bail!(
                    "app info file missing: {}",
                    data_source.app_info_path().display()
                );
            }
            loader.begin_data_source(data_source, &self.counter_filter)?;

            let samples = data_source.samples_path();
            for entry in WalkDir::new(samples).sort_by_file_name() {
                let entry = entry
                    .with_context(|| format!("failed to walk samples in {}", samples.display()))?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let len = entry
                    .metadata()
                    .with_context(|| format!("failed to stat {}", entry.path().display()))?
                    .len();
                loader.load_sample_file(&SampleFile {
                    path: entry.into_path(),
                    len,
                })?;
            }
        }
        Ok(())
    }
}
