//! Suite descriptors
//!
//! Classifies the registered methods of a suite once per run.

use regex::Regex;
use std::fmt;

use super::method::{ContextKind, MethodHandle, Methods};
use super::{signature, Suite, TEST_PREFIX};
use crate::models::FaultRecord;

/// The four fixture hooks, in the order the runner calls them
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hook {
    SetUpSuite,
    SetUpTest,
    TearDownTest,
    TearDownSuite,
}

impl Hook {
    pub const ALL: [Hook; 4] = [
        Hook::SetUpSuite,
        Hook::SetUpTest,
        Hook::TearDownTest,
        Hook::TearDownSuite,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Hook::SetUpSuite => "SetUpSuite",
            Hook::SetUpTest => "SetUpTest",
            Hook::TearDownTest => "TearDownTest",
            Hook::TearDownSuite => "TearDownSuite",
        }
    }

    pub fn from_name(name: &str) -> Option<Hook> {
        Hook::ALL.into_iter().find(|hook| hook.name() == name)
    }

    fn index(self) -> usize {
        match self {
            Hook::SetUpSuite => 0,
            Hook::SetUpTest => 1,
            Hook::TearDownTest => 2,
            Hook::TearDownSuite => 3,
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shape of a suite: its sorted test cases and optional fixture hooks
pub struct SuiteDescriptor<S> {
    suite_name: String,
    tests: Vec<MethodHandle<S>>,
    hooks: [Option<MethodHandle<S>>; 4],
}

impl<S: Suite> SuiteDescriptor<S> {
    /// Discover the methods of `suite`.
    ///
    /// Test cases not matched by `filter` are left out. A filter matches a
    /// test by its bare name or its `Suite.Method` name.
    pub fn build(suite: &S, filter: Option<&Regex>) -> Self {
        let suite_name = suite.suite_name();
        let mut methods = Methods::new();
        S::register(&mut methods);

        let mut tests = Vec::new();
        let mut hooks: [Option<MethodHandle<S>>; 4] = [None, None, None, None];

        for method in methods.into_entries() {
            if let Some(hook) = Hook::from_name(&method.name) {
                hooks[hook.index()] =
                    Some(MethodHandle::new(&suite_name, method, ContextKind::Suite));
            } else if method.name.starts_with(TEST_PREFIX) {
                let handle = MethodHandle::new(&suite_name, method, ContextKind::Test);
                let selected = filter
                    .map(|re| re.is_match(handle.name()) || re.is_match(handle.qualified_name()))
                    .unwrap_or(true);
                if selected {
                    tests.push(handle);
                }
            }
        }

        tests.sort_by(|a, b| a.name().as_bytes().cmp(b.name().as_bytes()));

        Self {
            suite_name,
            tests,
            hooks,
        }
    }
}

impl<S> SuiteDescriptor<S> {
    pub fn suite_name(&self) -> &str {
        &self.suite_name
    }

    pub fn tests(&self) -> &[MethodHandle<S>] {
        &self.tests
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    pub fn hook(&self, hook: Hook) -> Option<&MethodHandle<S>> {
        self.hooks[hook.index()].as_ref()
    }

    /// Present hooks in call order
    pub fn hooks(&self) -> impl Iterator<Item = (Hook, &MethodHandle<S>)> + '_ {
        Hook::ALL
            .into_iter()
            .filter_map(move |hook| self.hook(hook).map(|handle| (hook, handle)))
    }

    /// Fault for the first present hook with a wrong shape
    pub fn validate_hooks(&self) -> Result<(), FaultRecord> {
        self.hooks()
            .try_for_each(|(_, handle)| signature::validate(handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{F, T};

    #[derive(Default)]
    struct Mixed;

    impl Mixed {
        fn fixture(&mut self, _f: &mut F) {}
        fn test(&mut self, _t: &mut T) {}
        fn bad_fixture(&mut self, _t: &mut T) {}
    }

    impl Suite for Mixed {
        fn register(methods: &mut Methods<Self>) {
            methods
                .add("TestZeta", Self::test)
                .add("SetUpTest", Self::fixture)
                .add("TestAlpha", Self::test)
                .add("helper", Self::test)
                .add("TearDownSuite", Self::bad_fixture)
                .add("Testbeta", Self::test);
        }
    }

    #[test]
    fn test_tests_sorted_bytewise() {
        let descriptor = SuiteDescriptor::build(&Mixed, None);
        let names: Vec<_> = descriptor.tests().iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["TestAlpha", "TestZeta", "Testbeta"]);
        assert_eq!(descriptor.suite_name(), "Mixed");
    }

    #[test]
    fn test_hooks_classified() {
        let descriptor = SuiteDescriptor::build(&Mixed, None);
        assert!(descriptor.hook(Hook::SetUpTest).is_some());
        assert!(descriptor.hook(Hook::SetUpSuite).is_none());
        let present: Vec<_> = descriptor.hooks().map(|(hook, _)| hook).collect();
        assert_eq!(present, vec![Hook::SetUpTest, Hook::TearDownSuite]);
        assert_eq!(
            descriptor.hook(Hook::SetUpTest).map(|h| h.expected()),
            Some(ContextKind::Suite)
        );
    }

    #[test]
    fn test_validate_hooks_reports_bad_hook() {
        let descriptor = SuiteDescriptor::build(&Mixed, None);
        let fault = descriptor.validate_hooks().unwrap_err();
        assert_eq!(fault.qualified_name, "Mixed.TearDownSuite");
        assert_eq!(
            fault.message,
            "Mixed.TearDownSuite argument should be &mut suitecheck::F"
        );
    }

    #[test]
    fn test_filter_by_name_or_qualified_name() {
        let filter = Regex::new("Alpha$").unwrap();
        let descriptor = SuiteDescriptor::build(&Mixed, Some(&filter));
        assert_eq!(descriptor.tests().len(), 1);

        let filter = Regex::new(r"^Mixed\.TestZ").unwrap();
        let descriptor = SuiteDescriptor::build(&Mixed, Some(&filter));
        assert_eq!(descriptor.tests()[0].name(), "TestZeta");

        let filter = Regex::new("Nothing").unwrap();
        assert!(SuiteDescriptor::build(&Mixed, Some(&filter)).is_empty());
    }

    #[test]
    fn test_hook_names_round_trip() {
        for hook in Hook::ALL {
            assert_eq!(Hook::from_name(hook.name()), Some(hook));
        }
        assert_eq!(Hook::from_name("SetUp"), None);
    }
}
