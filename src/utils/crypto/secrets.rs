//! Credential generation and hashing for service principals

use base64::{Engine as _, engine::general_purpose};
use rand::{Rng, distributions::Alphanumeric};
use sha2::{Digest, Sha256};

/// Generate a service client identifier
pub fn generate_client_id() -> String {
    let prefix = "svc";
    let random_part: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect();

    format!("{}-{}", prefix, random_part)
}

/// Generate a service client secret
pub fn generate_client_secret() -> String {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..32).map(|_| rng.r#gen()).collect();
    general_purpose::URL_SAFE_NO_PAD.encode(&bytes)
}

/// Generate a token signing secret
pub fn generate_signing_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Hash a client secret for storage
///
/// Secrets are stored hashed; exchange compares the hash of the presented
/// secret against the stored set.
pub fn hash_secret(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Shorten a credential for log lines
pub fn redact_credential(credential: &str) -> String {
    if credential.len() >= 8 {
        format!(
            "{}...{}",
            &credential[..4],
            &credential[credential.len() - 4..]
        )
    } else {
        credential.to_string()
    }
}
