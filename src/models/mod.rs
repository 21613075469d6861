//! Data models for suite runs
//!
//! Fault records, per-test outcomes and the aggregate run result.

mod fault;
mod test_result;

pub use fault::{FaultKind, FaultRecord, Frame, Site, CASCADE_MESSAGE};
pub use test_result::{RunResult, TestOutcome, TestStatus};
