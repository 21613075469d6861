//! suitecheck - fixture-based test suites with panic reports
//!
//! A suite is a value whose methods are registered by name: test cases start
//! with `Test`, and the four fixture hooks `SetUpSuite`, `SetUpTest`,
//! `TearDownTest` and `TearDownSuite` bracket them. The runner validates
//! method shapes, runs everything in a fixed order, and turns panics into
//! `PANIC` blocks with a trimmed call stack.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use suitecheck::{run, Methods, RunConf, Suite, F, T};
//!
//! #[derive(Default)]
//! struct Parser {
//!     input: String,
//! }
//!
//! impl Parser {
//!     fn set_up_test(&mut self, _f: &mut F) {
//!         self.input = "1,2,3".to_string();
//!     }
//!
//!     fn test_split(&mut self, t: &mut T) {
//!         t.check_equal(self.input.split(',').count(), 3_usize);
//!     }
//! }
//!
//! impl Suite for Parser {
//!     fn register(methods: &mut Methods<Self>) {
//!         methods
//!             .add("SetUpTest", Self::set_up_test)
//!             .add("TestSplit", Self::test_split);
//!     }
//! }
//!
//! let result = run(&mut Parser::default(), RunConf::new());
//! assert!(result.is_ok());
//! ```

pub mod config;
pub mod context;
pub mod demos;
pub mod error;
pub mod executor;
pub mod fault;
pub mod models;
pub mod output;
pub mod suite;
pub mod utils;

pub use config::RunConf;
pub use context::{Context, F, T};
pub use error::{Error, Result};
pub use executor::{run, Suites};
pub use models::{FaultRecord, RunResult, TestStatus};
pub use suite::{Methods, Suite};
