//! Signature validation
//!
//! A method is callable by the runner only when it takes exactly one
//! parameter of the context kind its role expects.

use super::method::{MethodHandle, ParamType};
use crate::models::FaultRecord;

/// Check a handle against its expected context kind
pub fn validate<S>(handle: &MethodHandle<S>) -> Result<(), FaultRecord> {
    match handle.params() {
        [ParamType::Context(kind)] if *kind == handle.expected() => Ok(()),
        _ => Err(signature_fault(handle)),
    }
}

/// Synthetic record reported for a method with the wrong shape
pub fn signature_fault<S>(handle: &MethodHandle<S>) -> FaultRecord {
    FaultRecord::signature(
        handle.site().clone(),
        handle.qualified_name(),
        format!(
            "{} argument should be {}",
            handle.qualified_name(),
            handle.expected().type_name()
        ),
    )
}
