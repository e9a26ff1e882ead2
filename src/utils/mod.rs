//! Utility modules for the gatehouse gateway
//!
//! - **crypto**: password hashing and credential generation
//! - **error**: error handling and HTTP error responses

pub mod crypto;
pub mod error;

pub use error::{GatewayError, Result};

use uuid::Uuid;

/// Generate a unique request ID
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}
