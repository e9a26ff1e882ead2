//! Password hashing and credential generation

mod password;
mod secrets;

pub use password::{hash_password, verify_password};
pub use secrets::{
    generate_client_id, generate_client_secret, generate_signing_secret, hash_secret,
    redact_credential,
};
