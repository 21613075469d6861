//! Suite execution runner
//!
//! Drives one suite through its fixture hooks and test cases. A panic in a
//! test body is isolated to that test; a panic in a fixture hook stops the
//! remaining work at the hook's scope, with suite tear-down always honoured
//! once suite set-up has been attempted.

use regex::Regex;
use tracing::{debug, info};

use crate::config::RunConf;
use crate::context::{F, T};
use crate::fault::{capture, RaisedFault};
use crate::models::{FaultRecord, RunResult, Site, TestOutcome, TestStatus};
use crate::output::Reporter;
use crate::suite::{signature, Hook, MethodHandle, Suite, SuiteDescriptor};
use crate::utils::Timer;

/// Run a single suite and return its result.
///
/// Reports are appended to the configured sink as the run proceeds.
pub fn run<S: Suite>(suite: &mut S, conf: RunConf<'_>) -> RunResult {
    let RunConf {
        output,
        filter,
        verbose,
    } = conf;

    RunConf::with_sink(output, |sink| {
        let mut state = RunState::new(Reporter::new(sink), filter, verbose);
        state.run_suite(suite);
        state.finish()
    })
}

/// State shared by every suite of one run
pub(crate) struct RunState<'w> {
    reporter: Reporter<'w>,
    filter: Option<Regex>,
    verbose: bool,
    result: RunResult,
    timer: Timer,
}

impl<'w> RunState<'w> {
    pub(crate) fn new(reporter: Reporter<'w>, filter: Option<Regex>, verbose: bool) -> Self {
        Self {
            reporter,
            filter,
            verbose,
            result: RunResult::new(),
            timer: Timer::start("run"),
        }
    }

    pub(crate) fn run_suite<S: Suite>(&mut self, suite: &mut S) {
        let descriptor = SuiteDescriptor::build(suite, self.filter.as_ref());
        SuiteRun::new(suite, descriptor, self).execute();
    }

    pub(crate) fn finish(mut self) -> RunResult {
        self.result.duration_ms = self.timer.stop();
        info!("{}", self.result);
        self.result
    }

    fn emit(&mut self, record: FaultRecord) {
        self.reporter.fault(&record);
        self.result.faults.push(record);
    }

    fn emit_failure(&mut self, site: &Site, qualified_name: &str, messages: &[String]) {
        self.reporter.failure(site, qualified_name, messages);
    }

    fn record(&mut self, site: &Site, outcome: TestOutcome) {
        if self.verbose {
            match outcome.status {
                TestStatus::Passed => self.reporter.status("PASS", site, &outcome.name),
                TestStatus::Missed => self.reporter.status("MISS", site, &outcome.name),
                TestStatus::Failed | TestStatus::Panicked => {}
            }
        }
        self.result.record(outcome);
    }
}

/// Position of a suite run in its life cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    NotStarted,
    SuiteSetUp,
    TestLoop,
    SuiteTearDown,
    Done,
}

/// How a fixture hook invocation ended
#[derive(Debug)]
enum HookOutcome {
    Absent,
    Passed,
    Failed,
    Panicked,
}

impl HookOutcome {
    fn panicked(&self) -> bool {
        matches!(self, HookOutcome::Panicked)
    }
}

struct SuiteRun<'r, 'w, S> {
    suite: &'r mut S,
    descriptor: SuiteDescriptor<S>,
    state: &'r mut RunState<'w>,
    phase: Phase,
    aborted: bool,
}

impl<'r, 'w, S: Suite> SuiteRun<'r, 'w, S> {
    fn new(suite: &'r mut S, descriptor: SuiteDescriptor<S>, state: &'r mut RunState<'w>) -> Self {
        Self {
            suite,
            descriptor,
            state,
            phase: Phase::NotStarted,
            aborted: false,
        }
    }

    fn execute(mut self) {
        if self.descriptor.is_empty() {
            debug!("{}: no test cases, skipping", self.descriptor.suite_name());
            return;
        }
        self.state.result.suites += 1;

        if let Err(record) = self.descriptor.validate_hooks() {
            debug!("{}: {}", self.descriptor.suite_name(), record.message);
            self.state.emit(record);
            self.state.result.fixture_panicked += 1;
            self.miss_from(0);
            self.enter(Phase::Done);
            return;
        }

        self.enter(Phase::SuiteSetUp);
        if self.run_hook(Hook::SetUpSuite, None).panicked() {
            self.miss_from(0);
        } else {
            self.enter(Phase::TestLoop);
            for index in 0..self.descriptor.tests().len() {
                if self.aborted {
                    self.miss_from(index);
                    break;
                }
                self.run_test(index);
            }
        }

        self.enter(Phase::SuiteTearDown);
        self.run_hook(Hook::TearDownSuite, None);
        self.enter(Phase::Done);
    }

    fn enter(&mut self, phase: Phase) {
        debug!(
            "{}: {:?} -> {:?}",
            self.descriptor.suite_name(),
            self.phase,
            phase
        );
        self.phase = phase;
    }

    /// Set-up, body and tear-down of one test case
    fn run_test(&mut self, index: usize) {
        let test = &self.descriptor.tests()[index];
        let name = test.qualified_name().to_string();
        let site = test.site().clone();
        let timer = Timer::start(&name);

        let mut status = match signature::validate(test) {
            Ok(()) => None,
            Err(record) => {
                self.state.emit(record);
                Some(TestStatus::Panicked)
            }
        };

        if self.run_hook(Hook::SetUpTest, Some(index)).panicked() {
            self.aborted = true;
            status.get_or_insert(TestStatus::Missed);
        }

        let (status, messages) = match status {
            Some(status) => (status, Vec::new()),
            None => self.run_body(index),
        };

        if self.run_hook(Hook::TearDownTest, Some(index)).panicked() {
            self.aborted = true;
        }

        let outcome = TestOutcome::new(name, status, timer.stop()).with_messages(messages);
        self.state.record(&site, outcome);
    }

    /// Invoke a test body, returning its status and context log
    fn run_body(&mut self, index: usize) -> (TestStatus, Vec<String>) {
        let test = &self.descriptor.tests()[index];
        let mut t = T::new(test.qualified_name());
        let suite = &mut *self.suite;

        let status = match capture(|| test.invoke_test(suite, &mut t)) {
            Ok(true) if t.failed() => {
                self.state
                    .emit_failure(test.site(), test.qualified_name(), t.messages());
                debug!("{}: failed", test.qualified_name());
                TestStatus::Failed
            }
            Ok(true) => TestStatus::Passed,
            Ok(false) => {
                self.state.emit(signature::signature_fault(test));
                TestStatus::Panicked
            }
            Err(fault) => {
                debug!("{}: panicked: {}", test.qualified_name(), fault.message);
                self.state.emit(raised_record(test, fault));
                TestStatus::Panicked
            }
        };

        (status, t.into_inner().into_messages())
    }

    /// Invoke a fixture hook if present.
    ///
    /// `test` is the test case a test-scoped hook brackets; a panic there
    /// also emits a cascade record for that test.
    fn run_hook(&mut self, hook: Hook, test: Option<usize>) -> HookOutcome {
        let Some(handle) = self.descriptor.hook(hook) else {
            return HookOutcome::Absent;
        };
        let mut f = F::new(handle.qualified_name());
        let suite = &mut *self.suite;

        let record = match capture(|| handle.invoke_fixture(suite, &mut f)) {
            Ok(true) if f.failed() => {
                self.state
                    .emit_failure(handle.site(), handle.qualified_name(), f.messages());
                self.state.result.fixture_failed += 1;
                return HookOutcome::Failed;
            }
            Ok(true) => return HookOutcome::Passed,
            Ok(false) => signature::signature_fault(handle),
            Err(fault) => {
                debug!("{}: panicked: {}", handle.qualified_name(), fault.message);
                raised_record(handle, fault)
            }
        };

        self.state.emit(record);
        self.state.result.fixture_panicked += 1;

        // One cascade per test, even when both of its hooks panic.
        match test {
            Some(index) if !self.aborted => {
                let test = &self.descriptor.tests()[index];
                self.state.emit(FaultRecord::cascade(
                    test.site().clone(),
                    test.qualified_name(),
                ));
            }
            _ => {}
        }
        HookOutcome::Panicked
    }

    /// Record every test from `index` on as missed
    fn miss_from(&mut self, index: usize) {
        for test in &self.descriptor.tests()[index..] {
            let outcome = TestOutcome::missed(test.qualified_name());
            self.state.record(test.site(), outcome);
        }
    }
}

fn raised_record<S>(handle: &MethodHandle<S>, fault: RaisedFault) -> FaultRecord {
    FaultRecord::raised(
        handle.site().clone(),
        handle.qualified_name(),
        fault.message,
        fault.token,
        fault.origin,
        fault.frames,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FaultKind;
    use crate::suite::Methods;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
        fail_body: bool,
    }

    impl Recorder {
        fn set_up_suite(&mut self, _f: &mut F) {
            self.calls.push("SetUpSuite");
        }

        fn set_up_test(&mut self, _f: &mut F) {
            self.calls.push("SetUpTest");
        }

        fn tear_down_test(&mut self, _f: &mut F) {
            self.calls.push("TearDownTest");
        }

        fn tear_down_suite(&mut self, _f: &mut F) {
            self.calls.push("TearDownSuite");
        }

        fn test_b(&mut self, t: &mut T) {
            self.calls.push("TestB");
            if self.fail_body {
                t.error("body failed");
            }
        }

        fn test_a(&mut self, _t: &mut T) {
            self.calls.push("TestA");
        }
    }

    impl Suite for Recorder {
        fn register(methods: &mut Methods<Self>) {
            methods
                .add("TestB", Self::test_b)
                .add("TestA", Self::test_a)
                .add("SetUpSuite", Self::set_up_suite)
                .add("SetUpTest", Self::set_up_test)
                .add("TearDownTest", Self::tear_down_test)
                .add("TearDownSuite", Self::tear_down_suite);
        }
    }

    fn run_to_string<S: Suite>(
        suite: &mut S,
        filter: Option<&str>,
        verbose: bool,
    ) -> (RunResult, String) {
        let mut sink = Vec::new();
        let mut conf = RunConf::new().with_output(&mut sink).verbose(verbose);
        if let Some(pattern) = filter {
            conf = conf.with_filter(Regex::new(pattern).unwrap());
        }
        let result = run(suite, conf);
        (result, String::from_utf8(sink).unwrap())
    }

    #[test]
    fn test_sorted_order_with_all_hooks() {
        let mut suite = Recorder::default();
        let (result, output) = run_to_string(&mut suite, None, false);

        assert_eq!(
            suite.calls,
            vec![
                "SetUpSuite",
                "SetUpTest",
                "TestA",
                "TearDownTest",
                "SetUpTest",
                "TestB",
                "TearDownTest",
                "TearDownSuite"
            ]
        );
        assert_eq!(result.passed, 2);
        assert_eq!(result.suites, 1);
        assert!(result.is_ok());
        assert!(output.is_empty());
    }

    #[test]
    fn test_non_fatal_failure_does_not_abort() {
        let mut suite = Recorder {
            fail_body: true,
            ..Default::default()
        };
        let (result, output) = run_to_string(&mut suite, None, false);

        assert_eq!(result.passed, 1);
        assert_eq!(result.failed, 1);
        assert_eq!(suite.calls.last(), Some(&"TearDownSuite"));
        assert!(output.contains("FAIL: runner.rs:"));
        assert!(output.contains(": Recorder.TestB\n\nbody failed\n"));
    }

    #[test]
    fn test_outcome_keeps_context_log() {
        let mut suite = Recorder {
            fail_body: true,
            ..Default::default()
        };
        let (result, _) = run_to_string(&mut suite, None, false);

        let failed = result.outcome("Recorder.TestB").unwrap();
        assert_eq!(failed.status, TestStatus::Failed);
        assert_eq!(failed.messages, vec!["body failed".to_string()]);
        assert!(result.outcome("Recorder.TestA").unwrap().messages.is_empty());

        let json = serde_json::to_value(&result.outcomes).unwrap();
        assert_eq!(json[1]["messages"][0], "body failed");
    }

    #[test]
    fn test_verbose_pass_lines() {
        let mut suite = Recorder::default();
        let (_, output) = run_to_string(&mut suite, None, true);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("PASS: runner.rs:"));
        assert!(lines[0].ends_with(": Recorder.TestA"));
    }

    #[test]
    fn test_filter_leaves_out_tests() {
        let mut suite = Recorder::default();
        let (result, _) = run_to_string(&mut suite, Some("TestB"), false);
        assert_eq!(result.passed, 1);
        assert!(!suite.calls.contains(&"TestA"));

        let mut suite = Recorder::default();
        let (result, _) = run_to_string(&mut suite, Some("Nothing"), false);
        assert!(suite.calls.is_empty());
        assert_eq!(result.suites, 0);
    }

    struct BodyPanics {
        calls: Vec<&'static str>,
    }

    impl BodyPanics {
        fn test_1(&mut self, _t: &mut T) {
            self.calls.push("Test1");
            panic!("Test1");
        }

        fn test_2(&mut self, _t: &mut T) {
            self.calls.push("Test2");
        }

        fn tear_down_test(&mut self, _f: &mut F) {
            self.calls.push("TearDownTest");
        }
    }

    impl Suite for BodyPanics {
        fn register(methods: &mut Methods<Self>) {
            methods
                .add("Test1", Self::test_1)
                .add("Test2", Self::test_2)
                .add("TearDownTest", Self::tear_down_test);
        }
    }

    #[test]
    fn test_body_panic_is_isolated() {
        let mut suite = BodyPanics { calls: Vec::new() };
        let (result, output) = run_to_string(&mut suite, None, false);

        assert_eq!(
            suite.calls,
            vec!["Test1", "TearDownTest", "Test2", "TearDownTest"]
        );
        assert_eq!(result.panicked, 1);
        assert_eq!(result.passed, 1);
        assert_eq!(result.faults.len(), 1);
        assert!(matches!(result.faults[0].kind, FaultKind::Raised { .. }));
        assert!(output.contains("... Panic: Test1 (PC=0x"));
        assert!(!output.contains("Fixture has panicked"));
    }

    struct SetUpPanics;

    impl SetUpPanics {
        fn set_up_test(&mut self, _f: &mut F) {
            panic!("SetUpTest");
        }

        fn test(&mut self, _t: &mut T) {}
    }

    impl Suite for SetUpPanics {
        fn register(methods: &mut Methods<Self>) {
            methods
                .add("SetUpTest", Self::set_up_test)
                .add("Test1", Self::test)
                .add("Test2", Self::test);
        }
    }

    #[test]
    fn test_set_up_panic_cascades_and_aborts() {
        let (result, output) = run_to_string(&mut SetUpPanics, None, true);

        assert_eq!(result.fixture_panicked, 1);
        assert_eq!(result.missed, 2);
        assert_eq!(result.faults.len(), 2);
        assert_eq!(result.faults[0].qualified_name, "SetUpPanics.SetUpTest");
        assert_eq!(result.faults[1].kind, FaultKind::Cascade);
        assert_eq!(result.faults[1].qualified_name, "SetUpPanics.Test1");
        assert_eq!(output.matches("MISS: ").count(), 2);
        assert!(!result.is_ok());
    }

    struct BadHook;

    impl BadHook {
        fn set_up_suite(&mut self, _t: &mut T) {}
        fn test(&mut self, _t: &mut T) {}
    }

    impl Suite for BadHook {
        fn register(methods: &mut Methods<Self>) {
            methods
                .add("SetUpSuite", Self::set_up_suite)
                .add("Test1", Self::test);
        }
    }

    #[test]
    fn test_invalid_hook_runs_nothing() {
        let (result, output) = run_to_string(&mut BadHook, None, false);
        assert_eq!(result.tests_run(), 0);
        assert_eq!(result.missed, 1);
        assert_eq!(result.faults.len(), 1);
        assert_eq!(result.faults[0].kind, FaultKind::Signature);
        assert!(output.contains(
            "... Panic: BadHook.SetUpSuite argument should be &mut suitecheck::F\n"
        ));
    }

    struct WrongShape;

    impl WrongShape {
        fn test_1(&mut self, _f: &mut F) {}
    }

    impl Suite for WrongShape {
        fn register(methods: &mut Methods<Self>) {
            methods.add("Test1", Self::test_1);
        }
    }

    #[test]
    fn test_uncallable_body_is_reported() {
        let mut sink = Vec::new();
        let mut state = RunState::new(Reporter::new(&mut sink), None, false);
        let mut suite = WrongShape;
        let descriptor = SuiteDescriptor::build(&suite, None);

        let (status, messages) = SuiteRun::new(&mut suite, descriptor, &mut state).run_body(0);
        assert_eq!(status, TestStatus::Panicked);
        assert!(messages.is_empty());

        let result = state.finish();
        assert_eq!(result.faults.len(), 1);
        assert_eq!(result.faults[0].kind, FaultKind::Signature);
        let output = String::from_utf8(sink).unwrap();
        assert!(output.contains(
            "... Panic: WrongShape.Test1 argument should be &mut suitecheck::T\n"
        ));
    }
}
