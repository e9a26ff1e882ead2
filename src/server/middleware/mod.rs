//! HTTP middleware implementations
//!
//! This module provides middleware for request processing:
//! - Login throttling for the credential endpoints
//! - Request ID tracking
//! - Request inspection helpers shared with the route handlers

mod helpers;
mod login_throttle;
mod request_id;


// Re-export all middleware
pub use helpers::{bearer_token, client_addr};
pub use login_throttle::LoginThrottle;
pub use request_id::{RequestIdMiddleware, RequestIdMiddlewareService};
