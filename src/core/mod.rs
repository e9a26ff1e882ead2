//! Core functionality for the gateway
//!
//! This module contains the access decision engine: path-pattern policies,
//! principals, and the per-request decision orchestration.

pub mod decision;
pub mod policy;
pub mod principal;

pub use decision::{AccessRequest, DecisionEngine, DecisionRecord, DenyReason, Outcome};
pub use policy::{MethodFilter, PathPattern, PermissionMode, Policy, PolicyCache};
pub use principal::{Principal, PrincipalKind, Service, User};
