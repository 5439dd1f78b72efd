//! AWS-oriented adapters and handlers for spot interruption remediation.
//!
//! This crate owns runtime integration details: the adapter seams for EC2,
//! Auto Scaling and SSM, the interruption handler itself, and logging setup
//! for the Lambda binary. Domain primitives live in `nlb_interruption_core`.

pub mod adapters;
pub mod error;
pub mod handlers;
pub mod logging;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
