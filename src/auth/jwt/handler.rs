//! Core JWT handler implementation

use super::types::{Claims, JwtHandler, TokenKind};
use crate::auth::tokens::TokenError;
use crate::config::AuthConfig;
use crate::core::principal::PrincipalKind;
use crate::utils::error::{GatewayError, Result};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;
use uuid::Uuid;

impl JwtHandler {
    /// Create a new JWT handler from the auth configuration
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            access_ttl: config.access_ttl_minutes * 60,
            refresh_ttl: config.refresh_ttl_days * 86_400,
            service_ttl: config.service_ttl_minutes * 60,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        }
    }

    /// Sign a user access token
    pub fn issue_access(
        &self,
        sub: Uuid,
        kind: PrincipalKind,
        label: &str,
        chain: Option<Uuid>,
    ) -> Result<String> {
        let now = unix_now()?;
        let claims = Claims {
            sub,
            kind,
            token_use: TokenKind::Access,
            jti: Uuid::new_v4(),
            chain,
            label: Some(label.to_string()),
            iat: now,
            exp: now + self.access_ttl,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };

        debug!("Signed access token for principal: {}", sub);
        self.sign(&claims)
    }

    /// Sign a refresh token under a caller-chosen jti
    ///
    /// The jti keys the rotation record, so the caller picks it before the
    /// record and the token exist. Services are re-exchanged rather than
    /// refreshed, so refresh tokens always belong to users.
    pub fn issue_refresh(&self, sub: Uuid, label: &str, jti: Uuid, chain: Uuid) -> Result<String> {
        let now = unix_now()?;
        let claims = Claims {
            sub,
            kind: PrincipalKind::User,
            token_use: TokenKind::Refresh,
            jti,
            chain: Some(chain),
            label: Some(label.to_string()),
            iat: now,
            exp: now + self.refresh_ttl,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };

        debug!("Signed refresh token for principal: {}", sub);
        self.sign(&claims)
    }

    /// Sign a service access token; short-lived, no rotation chain
    pub fn issue_service(&self, sub: Uuid, label: &str) -> Result<String> {
        let now = unix_now()?;
        let claims = Claims {
            sub,
            kind: PrincipalKind::Service,
            token_use: TokenKind::Service,
            jti: Uuid::new_v4(),
            chain: None,
            label: Some(label.to_string()),
            iat: now,
            exp: now + self.service_ttl,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };

        debug!("Signed service token for principal: {}", sub);
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String> {
        let header = Header::new(self.algorithm);
        encode(&header, claims, &self.encoding_key).map_err(GatewayError::Jwt)
    }

    /// Decode and check signature, expiry, issuer, and audience
    pub fn verify(&self, token: &str) -> std::result::Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(err) => {
                debug!("Token verification failed: {}", err);
                Err(match err.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
                    _ => TokenError::Malformed(err.to_string()),
                })
            }
        }
    }

    /// Verify and require a specific token use
    pub fn verify_kind(
        &self,
        token: &str,
        expected: TokenKind,
    ) -> std::result::Result<Claims, TokenError> {
        let claims = self.verify(token)?;
        if claims.token_use != expected {
            return Err(TokenError::WrongKind {
                expected,
                got: claims.token_use,
            });
        }
        Ok(claims)
    }

    /// Extract the credential from an Authorization header value
    pub fn extract_bearer(header_value: &str) -> Option<&str> {
        header_value.strip_prefix("Bearer ")
    }

    /// Access-token lifetime in seconds
    pub fn access_ttl(&self) -> u64 {
        self.access_ttl
    }

    /// Refresh-token lifetime in seconds
    pub fn refresh_ttl(&self) -> u64 {
        self.refresh_ttl
    }

    /// Service-token lifetime in seconds
    pub fn service_ttl(&self) -> u64 {
        self.service_ttl
    }
}

fn unix_now() -> Result<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| GatewayError::internal(format!("System time error: {}", e)))
}
