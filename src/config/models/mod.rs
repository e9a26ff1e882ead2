//! Configuration data models
//!
//! This module defines all configuration structures used throughout the gateway.

#![allow(missing_docs)]

pub mod auth;
pub mod decision;
pub mod gateway;
pub mod seed;
pub mod server;

// Re-export all configuration types
pub use auth::*;
pub use decision::*;
pub use gateway::*;
pub use seed::*;
pub use server::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8080
}

/// Default request timeout in seconds
pub fn default_timeout() -> u64 {
    30
}

/// Default maximum body size in bytes
pub fn default_max_body_size() -> usize {
    1024 * 1024 // 1MB, auth payloads are small
}

pub fn default_issuer() -> String {
    "gatehouse".to_string()
}

pub fn default_audience() -> String {
    "gatehouse-api".to_string()
}

pub fn default_access_ttl_minutes() -> u64 {
    15
}

pub fn default_refresh_ttl_days() -> u64 {
    7
}

pub fn default_service_ttl_minutes() -> u64 {
    60
}

pub fn default_policy_refresh_secs() -> u64 {
    30
}

pub fn default_principal_cache_capacity() -> u64 {
    10_000
}

pub fn default_principal_cache_ttl_secs() -> u64 {
    30
}

pub fn default_throttle_max_attempts() -> u32 {
    5
}

pub fn default_throttle_window_secs() -> u64 {
    300
}

pub fn default_throttle_lockout_base_secs() -> u64 {
    60
}

pub fn default_true() -> bool {
    true
}
