// SPDX-License-Identifier: MIT
pub mod collector;
pub mod loader;

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::datasource::DataSource;

/// Excludes performance counters by name from loading.
#[derive(Clone, Debug, Default)]
pub struct CounterFilter {
    excluded: BTreeSet<String>,
}

impl CounterFilter {
    #[must_use]
    pub fn new<I, S>(excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded: excluded.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn allows(&self, counter: &str) -> bool {
        !self.excluded.contains(counter)
    }
}

/// Raw transaction data gathered from one or more data sources.
#[derive(Clone, Debug, Default)]
pub struct TransactionCollection {
    pub name: String,
    pub legend: String,
    pub data_sources: Vec<DataSource>,
    pub sample_files: Vec<PathBuf>,
    pub sample_bytes: u64,
    pub counters: Vec<String>,
}

impl TransactionCollection {
    #[must_use]
    pub fn new(name: impl Into<String>, data_sources: Vec<DataSource>) -> Self {
        Self {
            name: name.into(),
            data_sources,
            ..Self::default()
        }
    }
}

/// The collection under profiling plus every benchmark loaded next to it.
/// Benchmarks are only ever appended.
#[derive(Debug, Default)]
pub struct TransactionRepo {
    current: TransactionCollection,
    benchmarks: Vec<TransactionCollection>,
}

impl TransactionRepo {
    #[must_use]
    pub fn new(current: TransactionCollection) -> Self {
        Self {
            current,
            benchmarks: Vec::new(),
        }
    }

    #[must_use]
    pub fn current(&self) -> &TransactionCollection {
        &self.current
    }

    pub fn add_benchmark(&mut self, collection: TransactionCollection) {
        self.benchmarks.push(collection);
    }

    #[must_use]
    pub fn benchmarks(&self) -> &[TransactionCollection] {
        &self.benchmarks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_allows_everything() {
        let filter = CounterFilter::default();
        assert!(filter.allows("cycles"));
        assert!(filter.allows("instructions"));
    }

    #[test]
    fn filter_excludes_named_counters() {
        let filter = CounterFilter::new(["cycles"]);
        assert!(!filter.allows("cycles"));
        assert!(filter.allows("instructions"));
    }

    #[test]
    fn repo_appends_benchmarks_in_order() {
        let mut repo = TransactionRepo::new(TransactionCollection::new("live", Vec::new()));
        repo.add_benchmark(TransactionCollection::new("baseline-a", Vec::new()));
        repo.add_benchmark(TransactionCollection::new("baseline-b", Vec::new()));

        assert_eq!(repo.current().name, "live");
        let names: Vec<&str> = repo.benchmarks().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["baseline-a", "baseline-b"]);
    }
}
