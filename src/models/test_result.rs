//! Test result models
//!
//! Defines per-test outcomes and the aggregate result of a run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::fault::FaultRecord;

/// Final status of one test case
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
    Panicked,
    /// Never ran because a fixture panicked
    Missed,
}

impl TestStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            TestStatus::Passed => "✓",
            TestStatus::Failed => "✗",
            TestStatus::Panicked => "!",
            TestStatus::Missed => "○",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Passed => write!(f, "PASS"),
            TestStatus::Failed => write!(f, "FAIL"),
            TestStatus::Panicked => write!(f, "PANIC"),
            TestStatus::Missed => write!(f, "MISS"),
        }
    }
}

/// Outcome of a single test case
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestOutcome {
    pub name: String,
    pub status: TestStatus,
    pub duration_ms: u64,
    pub messages: Vec<String>,
}

impl TestOutcome {
    pub fn new(name: impl Into<String>, status: TestStatus, duration_ms: u64) -> Self {
        Self {
            name: name.into(),
            status,
            duration_ms,
            messages: Vec::new(),
        }
    }

    pub fn missed(name: impl Into<String>) -> Self {
        Self::new(name, TestStatus::Missed, 0)
    }

    pub fn with_messages(mut self, messages: Vec<String>) -> Self {
        self.messages = messages;
        self
    }
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} [{}ms]",
            self.status.symbol(),
            self.status,
            self.name,
            self.duration_ms
        )
    }
}

/// Aggregate result of a run over one or more suites
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunResult {
    /// Suites that had at least one eligible test
    pub suites: usize,
    pub passed: usize,
    pub failed: usize,
    pub panicked: usize,
    pub missed: usize,
    pub fixture_failed: usize,
    pub fixture_panicked: usize,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub outcomes: Vec<TestOutcome>,
    pub faults: Vec<FaultRecord>,
}

impl RunResult {
    pub fn new() -> Self {
        Self {
            suites: 0,
            passed: 0,
            failed: 0,
            panicked: 0,
            missed: 0,
            fixture_failed: 0,
            fixture_panicked: 0,
            started_at: Utc::now(),
            duration_ms: 0,
            outcomes: Vec::new(),
            faults: Vec::new(),
        }
    }

    /// Fold one test outcome into the counters
    pub fn record(&mut self, outcome: TestOutcome) {
        match outcome.status {
            TestStatus::Passed => self.passed += 1,
            TestStatus::Failed => self.failed += 1,
            TestStatus::Panicked => self.panicked += 1,
            TestStatus::Missed => self.missed += 1,
        }
        self.outcomes.push(outcome);
    }

    /// Tests whose body was entered or whose signature was checked
    pub fn tests_run(&self) -> usize {
        self.passed + self.failed + self.panicked
    }

    pub fn tests_failed(&self) -> usize {
        self.failed + self.panicked
    }

    pub fn is_ok(&self) -> bool {
        self.tests_failed() == 0
            && self.missed == 0
            && self.fixture_failed == 0
            && self.fixture_panicked == 0
    }

    pub fn outcome(&self, name: &str) -> Option<&TestOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }
}

impl Default for RunResult {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ok() {
            return write!(f, "OK: {} passed", self.passed);
        }

        let mut parts = vec![format!("{} passed", self.passed)];
        let groups = [
            (self.failed, "FAILED"),
            (self.panicked, "PANICKED"),
            (self.fixture_failed, "FIXTURE-FAILED"),
            (self.fixture_panicked, "FIXTURE-PANICKED"),
            (self.missed, "MISSED"),
        ];
        for (count, label) in groups {
            if count > 0 {
                parts.push(format!("{count} {label}"));
            }
        }
        write!(f, "OOPS: {}", parts.join(", "))
    }
}
