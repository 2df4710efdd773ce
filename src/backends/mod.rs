//! Abstract backend contracts and their HTTP-backed implementations.
//!
//! [`RuleBackend`] and [`ModelBackend`] exist so that [`crate::validator`]
//! and [`crate::pipeline`] depend on a contract shape, not a concrete HTTP
//! client -- a test harness substitutes an in-memory fake for either without
//! touching the network.

mod model;
mod rule;

pub use model::{decode, Decoded, ModelBackend, ModelClient};
pub use rule::{RuleBackend, RuleClient};
