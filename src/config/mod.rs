//! Configuration module
//!
//! [`RunConf`] carries the options of a single run. [`Settings`] and
//! [`EnvConfig`] feed it from files and the environment.

pub mod env;
pub mod file;

use regex::Regex;
use std::fmt;
use std::io::{self, Write};

pub use env::{print_env_help, EnvBuilder, EnvConfig, EnvGuard};
pub use file::Settings;

/// Options for one run
#[derive(Default)]
pub struct RunConf<'a> {
    /// Report destination; stdout when unset
    pub output: Option<&'a mut dyn Write>,
    /// Restricts which test cases are eligible
    pub filter: Option<Regex>,
    /// Report passing and missed tests too
    pub verbose: bool,
}

impl<'a> RunConf<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, output: &'a mut dyn Write) -> Self {
        self.output = Some(output);
        self
    }

    pub fn with_filter(mut self, filter: Regex) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Run `body` with the configured sink, falling back to stdout
    pub(crate) fn with_sink<R>(
        output: Option<&mut dyn Write>,
        body: impl FnOnce(&mut dyn Write) -> R,
    ) -> R {
        match output {
            Some(sink) => body(sink),
            None => {
                let stdout = io::stdout();
                let mut lock = stdout.lock();
                body(&mut lock)
            }
        }
    }
}

impl fmt::Debug for RunConf<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConf")
            .field("output", &self.output.as_ref().map(|_| "<sink>"))
            .field("filter", &self.filter.as_ref().map(Regex::as_str))
            .field("verbose", &self.verbose)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_conf() {
        let conf = RunConf::new();
        assert!(conf.output.is_none());
        assert!(conf.filter.is_none());
        assert!(!conf.verbose);
    }

    #[test]
    fn test_builder() {
        let mut sink = Vec::new();
        let conf = RunConf::new()
            .with_output(&mut sink)
            .with_filter(Regex::new("Push").unwrap())
            .verbose(true);
        assert!(conf.output.is_some());
        assert!(format!("{conf:?}").contains("Push"));
        assert!(conf.verbose);
    }

    #[test]
    fn test_with_sink_uses_configured_output() {
        let mut sink = Vec::new();
        RunConf::with_sink(Some(&mut sink), |out| out.write_all(b"block").unwrap());
        assert_eq!(sink, b"block");
    }
}
