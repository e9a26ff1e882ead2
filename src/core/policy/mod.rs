//! Path-pattern policies and their resolution
//!
//! A policy maps a path pattern to authentication and authorization
//! requirements. The resolver picks the single governing policy for a
//! request; the cache keeps the active set close to the hot path with
//! bounded staleness.

mod cache;
mod pattern;
mod resolver;
mod types;

pub use cache::PolicyCache;
pub use pattern::PathPattern;
pub use resolver::resolve;
pub use types::{MethodFilter, PermissionMode, Policy};
