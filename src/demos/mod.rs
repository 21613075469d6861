//! Demonstration suites
//!
//! Small suites run by the `suitecheck` binary. They exercise every hook and
//! both context kinds, and all of them pass.

use crate::context::{F, T};
use crate::executor::Suites;
use crate::suite::{Methods, Suite};

/// Integer parsing and arithmetic
#[derive(Default)]
pub struct Calculator {
    inputs: Vec<String>,
    accumulator: i64,
}

impl Calculator {
    fn set_up_suite(&mut self, f: &mut F) {
        self.inputs = ["17", "-4", "25"].iter().map(|s| s.to_string()).collect();
        f.log(format!("loaded {} inputs", self.inputs.len()));
    }

    fn set_up_test(&mut self, _f: &mut F) {
        self.accumulator = 0;
    }

    fn test_parse(&mut self, t: &mut T) {
        let parsed: Result<Vec<i64>, _> = self.inputs.iter().map(|s| s.parse::<i64>()).collect();
        t.check(parsed.is_ok(), "inputs parse as integers");
        t.check_equal(parsed.map(|v| v.len()).unwrap_or(0), self.inputs.len());
    }

    fn test_sum(&mut self, t: &mut T) {
        for input in &self.inputs {
            self.accumulator += input.parse::<i64>().unwrap_or(0);
        }
        t.check_equal(self.accumulator, 38_i64);
    }

    fn test_checked_overflow(&mut self, t: &mut T) {
        self.accumulator = i64::MAX;
        t.check(self.accumulator.checked_add(1).is_none(), "overflow detected");
    }
}

impl Suite for Calculator {
    fn register(methods: &mut Methods<Self>) {
        methods
            .add("SetUpSuite", Self::set_up_suite)
            .add("SetUpTest", Self::set_up_test)
            .add("TestParse", Self::test_parse)
            .add("TestSum", Self::test_sum)
            .add("TestCheckedOverflow", Self::test_checked_overflow);
    }
}

/// A bounded stack reset around every test
pub struct BoundedStack {
    items: Vec<u32>,
    capacity: usize,
    tear_downs: usize,
}

impl BoundedStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
            tear_downs: 0,
        }
    }

    fn push(&mut self, value: u32) -> bool {
        if self.items.len() >= self.capacity {
            return false;
        }
        self.items.push(value);
        true
    }

    fn set_up_test(&mut self, f: &mut F) {
        f.check(self.items.is_empty(), "stack starts empty");
    }

    fn tear_down_test(&mut self, _f: &mut F) {
        self.items.clear();
        self.tear_downs += 1;
    }

    fn tear_down_suite(&mut self, f: &mut F) {
        f.log(format!("{} tests cleaned up", self.tear_downs));
    }

    fn test_push_pop(&mut self, t: &mut T) {
        t.check(self.push(1), "push into empty stack");
        t.check(self.push(2), "push second value");
        t.check_equal(self.items.pop(), Some(2_u32));
        t.check_equal(self.items.pop(), Some(1_u32));
        t.check_equal(self.items.pop(), None::<u32>);
    }

    fn test_capacity(&mut self, t: &mut T) {
        for value in 0..self.capacity as u32 {
            self.push(value);
        }
        t.check(!self.push(99), "push beyond capacity is refused");
        t.check_equal(self.items.len(), self.capacity);
    }
}

impl Suite for BoundedStack {
    fn register(methods: &mut Methods<Self>) {
        methods
            .add("SetUpTest", Self::set_up_test)
            .add("TearDownTest", Self::tear_down_test)
            .add("TearDownSuite", Self::tear_down_suite)
            .add("TestPushPop", Self::test_push_pop)
            .add("TestCapacity", Self::test_capacity);
    }

    fn suite_name(&self) -> String {
        "Stack".to_string()
    }
}

/// The suites run by the binary
pub fn suites() -> Suites {
    Suites::new()
        .add(Calculator::default())
        .add(BoundedStack::new(4))
}
