// SPDX-License-Identifier: MIT
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod benchmark;
pub mod datasource;
pub mod session;
pub mod txn;
pub mod types;

#[cfg(test)]
mod testutil;
