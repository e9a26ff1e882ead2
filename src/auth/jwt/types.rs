//! JWT types and data structures

use crate::core::principal::PrincipalKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Signs and verifies the gateway's tokens
#[derive(Clone)]
pub struct JwtHandler {
    /// Encoding key for signing tokens
    pub(super) encoding_key: EncodingKey,
    /// Decoding key for verifying tokens
    pub(super) decoding_key: DecodingKey,
    /// JWT algorithm
    pub(super) algorithm: Algorithm,
    /// Access-token lifetime in seconds
    pub(super) access_ttl: u64,
    /// Refresh-token lifetime in seconds
    pub(super) refresh_ttl: u64,
    /// Service-token lifetime in seconds
    pub(super) service_ttl: u64,
    /// Token issuer
    pub(super) issuer: String,
    /// Token audience
    pub(super) audience: String,
}

impl std::fmt::Debug for JwtHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtHandler")
            .field("algorithm", &self.algorithm)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("service_ttl", &self.service_ttl)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

/// Claims carried by every gateway token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Principal id
    pub sub: Uuid,
    /// Principal kind
    pub kind: PrincipalKind,
    /// What this token may be presented for
    pub token_use: TokenKind,
    /// Token id; keys the rotation record for refresh tokens
    pub jti: Uuid,
    /// Rotation chain shared by tokens issued together
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<Uuid>,
    /// Display label of the principal, carried for audit records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Issued at timestamp
    pub iat: u64,
    /// Expiration timestamp
    pub exp: u64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
}

/// Token use enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Access token presented on protected routes
    Access,
    /// Refresh token redeemed for a new pair
    Refresh,
    /// Service token obtained through credential exchange
    Service,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
            TokenKind::Service => write!(f, "service"),
        }
    }
}

/// Token pair (access + refresh)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Access token
    pub access_token: String,
    /// Refresh token
    pub refresh_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Access-token lifetime in seconds
    pub expires_in: u64,
}
