// SPDX-License-Identifier: MIT
use crate::txn::TransactionRepo;
use crate::types::{CpuInfo, Event};

/// A completed profiling session whose current collection can be frozen
/// into a benchmark.
#[derive(Debug)]
pub struct ProfileSession {
    pub cpu_info: CpuInfo,
    pub events: Vec<Event>,
    pub legend: Option<String>,
    pub transaction_repo: TransactionRepo,
}
