//! JWT issuance and verification
//!
//! Self-contained HS256 tokens carrying the principal id, kind, and
//! rotation chain. Access tokens verify with signature and expiry alone;
//! rotation state lives in the token store, never in this layer.

mod handler;
pub mod types;


pub use types::{Claims, JwtHandler, TokenKind, TokenPair};
