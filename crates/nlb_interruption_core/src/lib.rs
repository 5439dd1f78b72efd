//! Domain primitives for spot interruption remediation of NLB nodes.
//!
//! This crate owns the event/response contracts, tag inspection, the bounded
//! polling helper and environment configuration. It intentionally excludes
//! AWS SDK and Lambda runtime concerns.

pub mod config;
pub mod contract;
pub mod polling;
pub mod tags;
