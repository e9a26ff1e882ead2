//! Integration tests for gatehouse-rs
//!
//! These tests verify the interaction between multiple components
//! and test real system behavior without mocking.

pub mod decision_flow_tests;
pub mod policy_reload_tests;
pub mod token_rotation_tests;
