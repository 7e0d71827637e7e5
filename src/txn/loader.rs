// SPDX-License-Identifier: MIT
use anyhow::Result;

use super::collector::{Loader, SampleFile};
use super::{CounterFilter, TransactionCollection};
use crate::benchmark::Benchmark;
use crate::datasource::DataSource;
use crate::types::Event;

/// Loads the runs of one benchmark into a collection named after it.
pub struct BenchmarkLoader {
    events: Vec<Event>,
    data: TransactionCollection,
}

impl BenchmarkLoader {
    #[must_use]
    pub fn new(benchmark: &Benchmark) -> Self {
        let mut data = TransactionCollection::new(benchmark.name.clone(), Vec::new());
        data.legend.clone_from(&benchmark.legend);
        Self {
            events: benchmark.events.clone(),
            data,
        }
    }
}

impl Loader for BenchmarkLoader {
    fn begin_data_source(
        &mut self,
        data_source: &DataSource,
        counter_filter: &CounterFilter,
    ) -> Result<()> {
        if self.data.data_sources.is_empty() {
            self.data.counters = self
                .events
                .iter()
                .filter(|event| counter_filter.allows(&event.name))
                .map(|event| event.name.clone())
                .collect();
        }
        self.data.data_sources.push(data_source.clone());
        Ok(())
    }

    fn load_sample_file(&mut self, sample: &SampleFile) -> Result<()> {
        self.data.sample_files.push(sample.path.clone());
        self.data.sample_bytes += sample.len;
        Ok(())
    }

    fn data(self: Box<Self>) -> TransactionCollection {
        self.data
    }
}
