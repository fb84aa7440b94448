//! Assign employees to leader-anchored groups under a per-group salary limit.
//!
//! - `grouping`: the greedy least-loaded assignment and result export
//! - `data`: manual entry normalisation, workbook/CSV import, input checks
//! - `config`: limit and leader-count defaults
//! - `server`: local form page and JSON/CSV API
//! - `cli`: command-line entry point

pub mod cli;
pub mod config;
pub mod data;
pub mod grouping;
pub mod logging;
pub mod server;
