//! Role-based access control
//!
//! Permissions are granted transitively through role assignment. The
//! resolver computes a user's effective permission set as the union over
//! their roles, with superusers exempt from explicit checks (but never
//! from authentication).

mod resolver;
mod types;

pub use resolver::RbacResolver;
pub use types::{Permission, Role};
