//! Access decision engine
//!
//! Evaluates one normalized request descriptor against the policy snapshot,
//! the token subsystem, and RBAC, producing a single allow or deny verdict
//! with a reason. The engine never proxies traffic itself; callers act on
//! the verdict.

pub mod engine;
pub mod types;

pub use engine::DecisionEngine;
pub use types::{AccessRequest, DecisionRecord, DenyReason, Outcome};
