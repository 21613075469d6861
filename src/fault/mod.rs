//! Fault capture
//!
//! Runs suite code under panic interception and turns panics into
//! structured faults with a trimmed call stack.

mod capture;
mod stack;

pub use capture::{capture, RaisedFault};
