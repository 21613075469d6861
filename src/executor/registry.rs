//! Multi-suite driver
//!
//! Runs several suites one after another through the same sink and
//! configuration, folding their results into one [`RunResult`].

use regex::Regex;
use tracing::info;

use super::runner::RunState;
use crate::config::RunConf;
use crate::models::RunResult;
use crate::output::Reporter;
use crate::suite::{Suite, SuiteDescriptor};

/// Type-erased view of a suite
trait SuiteEntry {
    fn name(&self) -> String;
    fn test_names(&self, filter: Option<&Regex>) -> Vec<String>;
    fn run_in(&mut self, state: &mut RunState<'_>);
}

impl<S: Suite> SuiteEntry for S {
    fn name(&self) -> String {
        self.suite_name()
    }

    fn test_names(&self, filter: Option<&Regex>) -> Vec<String> {
        SuiteDescriptor::build(self, filter)
            .tests()
            .iter()
            .map(|test| test.name().to_string())
            .collect()
    }

    fn run_in(&mut self, state: &mut RunState<'_>) {
        state.run_suite(self);
    }
}

/// An ordered collection of suites
#[derive(Default)]
pub struct Suites {
    entries: Vec<Box<dyn SuiteEntry>>,
}

impl Suites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<S: Suite>(mut self, suite: S) -> Self {
        self.entries.push(Box::new(suite));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.name()).collect()
    }

    /// Suite names with their eligible test cases, in run order
    pub fn listing(&self, filter: Option<&Regex>) -> Vec<(String, Vec<String>)> {
        self.entries
            .iter()
            .map(|entry| (entry.name(), entry.test_names(filter)))
            .collect()
    }

    /// Run every suite in insertion order
    pub fn run_all(&mut self, conf: RunConf<'_>) -> RunResult {
        let RunConf {
            output,
            filter,
            verbose,
        } = conf;
        info!("Running {} suites", self.entries.len());

        let entries = &mut self.entries;
        RunConf::with_sink(output, |sink| {
            let mut state = RunState::new(Reporter::new(sink), filter, verbose);
            for entry in entries.iter_mut() {
                entry.run_in(&mut state);
            }
            state.finish()
        })
    }
}
