//! Output module
//!
//! Fault report blocks written during a run, and result formats for the
//! end of a run.

mod formatter;
mod report;

pub use formatter::{write_result_to_file, OutputFormat, ResultFormatter};
pub use report::{render_failure, render_fault, Reporter, SEPARATOR};
