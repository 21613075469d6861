//! Suite discovery
//!
//! A suite is any type implementing [`Suite`]. It registers its methods by
//! name; the runner classifies them into test cases (names starting with
//! `Test`) and the four fixture hooks, and checks their parameter shapes.
//!
//! ```rust,ignore
//! impl Suite for MySuite {
//!     fn register(methods: &mut Methods<Self>) {
//!         methods
//!             .add("SetUpTest", Self::set_up_test)
//!             .add("TestParse", Self::test_parse);
//!     }
//! }
//! ```

mod descriptor;
mod method;
pub mod signature;

pub use descriptor::{Hook, SuiteDescriptor};
pub use method::{Arg, ContextKind, IntoMethod, MethodHandle, Methods, ParamType, Shape};

/// Prefix that marks a registered method as a test case
pub const TEST_PREFIX: &str = "Test";

/// A value grouping test cases and fixture hooks
pub trait Suite: 'static {
    /// Register every method the runner may discover
    fn register(methods: &mut Methods<Self>)
    where
        Self: Sized;

    /// Name used to qualify methods in reports
    fn suite_name(&self) -> String {
        short_type_name(std::any::type_name::<Self>()).to_string()
    }
}

/// `a::b::Name<c::D>` becomes `Name`
pub(crate) fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
