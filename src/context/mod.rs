//! Execution contexts
//!
//! Every fixture hook receives a fresh [`F`] and every test case a fresh
//! [`T`]. Both wrap a [`Context`] that records non-fatal failures; the
//! runner reads the terminal state back once the call returns.

use std::fmt::Debug;
use std::ops::{Deref, DerefMut};
use std::panic::Location;

/// Failure state shared by both context kinds
#[derive(Debug)]
pub struct Context {
    name: String,
    failed: bool,
    log: Vec<String>,
}

impl Context {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            failed: false,
            log: Vec::new(),
        }
    }

    /// Qualified name of the method being run
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a message to the log shown if the method fails
    pub fn log(&mut self, message: impl Into<String>) {
        self.log.push(message.into());
    }

    /// Mark the method as failed without stopping it
    pub fn fail(&mut self) {
        self.failed = true;
    }

    /// Log a message and mark the method as failed
    pub fn error(&mut self, message: impl Into<String>) {
        self.log(message);
        self.fail();
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    pub fn messages(&self) -> &[String] {
        &self.log
    }

    /// Record a failure when `condition` is false
    #[track_caller]
    pub fn check(&mut self, condition: bool, message: impl AsRef<str>) -> bool {
        if !condition {
            let site = Location::caller();
            self.error(format!(
                "{}:{}:\n... check failed: {}",
                site.file(),
                site.line(),
                message.as_ref()
            ));
        }
        condition
    }

    /// Record a failure when `obtained != expected`
    #[track_caller]
    pub fn check_equal<A, B>(&mut self, obtained: A, expected: B) -> bool
    where
        A: PartialEq<B> + Debug,
        B: Debug,
    {
        let equal = obtained == expected;
        if !equal {
            let site = Location::caller();
            self.error(format!(
                "{}:{}:\n... check_equal(obtained, expected):\n... obtained = {:?}\n... expected = {:?}",
                site.file(),
                site.line(),
                obtained,
                expected
            ));
        }
        equal
    }

    pub(crate) fn into_messages(self) -> Vec<String> {
        self.log
    }
}

/// Context handed to fixture hooks
#[derive(Debug)]
pub struct F(Context);

impl F {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self(Context::new(name))
    }

    pub(crate) fn into_inner(self) -> Context {
        self.0
    }
}

impl Deref for F {
    type Target = Context;

    fn deref(&self) -> &Context {
        &self.0
    }
}

impl DerefMut for F {
    fn deref_mut(&mut self) -> &mut Context {
        &mut self.0
    }
}

/// Context handed to test cases
#[derive(Debug)]
pub struct T(Context);

impl T {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self(Context::new(name))
    }

    pub(crate) fn into_inner(self) -> Context {
        self.0
    }
}

impl Deref for T {
    type Target = Context;

    fn deref(&self) -> &Context {
        &self.0
    }
}

impl DerefMut for T {
    fn deref_mut(&mut self) -> &mut Context {
        &mut self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_context_passes() {
        let t = T::new("Helper.Test1");
        assert_eq!(t.name(), "Helper.Test1");
        assert!(!t.failed());
        assert!(t.messages().is_empty());
    }

    #[test]
    fn test_log_does_not_fail() {
        let mut f = F::new("Helper.SetUpTest");
        f.log("preparing");
        assert!(!f.failed());
        assert_eq!(f.messages().to_vec(), vec!["preparing".to_string()]);
    }

    #[test]
    fn test_check_equal_records_failure() {
        let mut t = T::new("Helper.Test1");
        assert!(t.check_equal(2 + 2, 4));
        assert!(!t.failed());

        assert!(!t.check_equal("left", "right"));
        assert!(t.failed());
        let message = &t.messages()[0];
        assert!(message.contains("mod.rs:"));
        assert!(message.contains("obtained = \"left\""));
        assert!(message.contains("expected = \"right\""));
    }

    #[test]
    fn test_check_and_error() {
        let mut t = T::new("Helper.Test1");
        assert!(t.check(true, "never shown"));
        assert!(!t.check(false, "value out of range"));
        t.error("explicit");

        let messages = t.into_inner().into_messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].ends_with("check failed: value out of range"));
        assert_eq!(messages[1], "explicit");
    }
}
