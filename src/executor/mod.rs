//! Test execution engine
//!
//! Sequential execution of one suite ([`run`]) or many ([`Suites`]).

mod registry;
mod runner;

pub use registry::Suites;
pub use runner::run;
