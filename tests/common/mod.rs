//! Common test utilities for gatehouse-rs
//!
//! This module provides shared test infrastructure for all tests:
//! - A fully wired in-memory gateway (storage, auth, policies, engine)
//! - Seed data helpers and policy factories
//! - Custom assertions and helpers
//!
//! # Usage
//!
//! ```rust
//! use crate::common::TestGateway;
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let gw = TestGateway::seeded().await;
//!     let pair = gw.login("alice").await;
//!     // ...
//! }
//! ```

pub mod assertions;
pub mod fixtures;

// Re-export commonly used items
pub use fixtures::{PASSWORD, PolicyFactory, SERVICE_SECRET, TestGateway};

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
