//! Token lifecycle service
//!
//! Sits between the JWT layer and the token store: issues pairs, rotates
//! refresh tokens through the store's conditional supersede, and contains
//! theft by revoking a whole chain when a redeemed token is replayed.

use crate::auth::chains::{RefreshRecord, SupersedeOutcome};
use crate::auth::jwt::{Claims, JwtHandler, TokenKind, TokenPair};
use crate::core::principal::{PrincipalKind, Service, User};
use crate::storage::TokenStore;
use crate::utils::error::Result;
use chrono::Duration;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

/// Outcomes of the token state machine
///
/// `AlreadySuperseded` and `Revoked` never leave the process in this form;
/// the HTTP layer collapses them into a generic invalid-token response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("malformed token: {0}")]
    Malformed(String),
    #[error("token signature invalid")]
    SignatureInvalid,
    #[error("wrong token kind: expected {expected}, got {got}")]
    WrongKind {
        expected: TokenKind,
        got: TokenKind,
    },
    #[error("refresh token already redeemed")]
    AlreadySuperseded,
    #[error("token revoked")]
    Revoked,
}

/// Issues, verifies, rotates, and revokes the gateway's tokens
#[derive(Clone)]
pub struct TokenService {
    jwt: JwtHandler,
    store: Arc<dyn TokenStore>,
}

impl TokenService {
    pub fn new(jwt: JwtHandler, store: Arc<dyn TokenStore>) -> Self {
        Self { jwt, store }
    }

    /// Issue an access and refresh pair, opening a fresh rotation chain
    ///
    /// Both tokens carry the chain id, so revoking the chain catches the
    /// access-token sibling on strict verification paths.
    pub async fn issue(&self, user: &User) -> Result<TokenPair> {
        let chain = Uuid::new_v4();
        let jti = Uuid::new_v4();

        let access = self
            .jwt
            .issue_access(user.id, PrincipalKind::User, &user.username, Some(chain))?;
        let refresh = self.jwt.issue_refresh(user.id, &user.username, jti, chain)?;

        let record =
            RefreshRecord::open_chain(jti, chain, user.id, self.refresh_duration());
        self.store.insert(record).await?;

        debug!(user = %user.username, %chain, "opened refresh chain");
        Ok(self.pair(access, refresh))
    }

    /// Stateless access-token verification: signature, expiry, and kind
    pub fn verify_access(&self, token: &str) -> std::result::Result<Claims, TokenError> {
        self.jwt.verify_kind(token, TokenKind::Access)
    }

    /// Verify a service token
    pub fn verify_service(&self, token: &str) -> std::result::Result<Claims, TokenError> {
        self.jwt.verify_kind(token, TokenKind::Service)
    }

    /// Verify any token a caller may present on a protected route
    ///
    /// Accepts user access tokens and service tokens; refresh tokens are
    /// redeemable, not presentable.
    pub fn verify_caller(&self, token: &str) -> std::result::Result<Claims, TokenError> {
        let claims = self.jwt.verify(token)?;
        match claims.token_use {
            TokenKind::Access | TokenKind::Service => Ok(claims),
            TokenKind::Refresh => Err(TokenError::WrongKind {
                expected: TokenKind::Access,
                got: TokenKind::Refresh,
            }),
        }
    }

    /// Strict verification: stateless checks plus a rotation-chain lookup
    ///
    /// Slower than `verify_access`, reserved for callers that must observe
    /// revocation immediately.
    pub async fn verify_access_checked(&self, token: &str) -> Result<Claims> {
        let claims = self.verify_access(token)?;
        if let Some(chain) = claims.chain {
            if self.store.is_chain_revoked(chain).await? {
                return Err(TokenError::Revoked.into());
            }
        }
        Ok(claims)
    }

    /// Redeem a refresh token for a new pair, superseding it atomically
    ///
    /// The supersede is a conditional update keyed by jti: of two
    /// concurrent rotations of one token, exactly one wins. Replay of an
    /// already-redeemed token revokes the whole chain before the error
    /// returns.
    pub async fn rotate(&self, refresh_token: &str) -> Result<TokenPair> {
        let claims = self.jwt.verify_kind(refresh_token, TokenKind::Refresh)?;

        let current = match self.store.get(claims.jti).await? {
            Some(record) => record,
            // A validly signed token we have no record of reads as revoked
            None => return Err(TokenError::Revoked.into()),
        };

        let next_jti = Uuid::new_v4();
        match self.store.try_supersede(claims.jti, next_jti).await? {
            SupersedeOutcome::Superseded => {}
            SupersedeOutcome::AlreadySuperseded => {
                let revoked = self.store.revoke_chain(current.chain_id).await?;
                warn!(
                    chain = %current.chain_id,
                    revoked,
                    "refresh token replayed, chain revoked"
                );
                return Err(TokenError::AlreadySuperseded.into());
            }
            SupersedeOutcome::Revoked | SupersedeOutcome::NotFound => {
                return Err(TokenError::Revoked.into());
            }
        }

        let replacement = current.replacement(next_jti, self.refresh_duration());
        self.store.insert(replacement).await?;

        let label = claims.label.as_deref().unwrap_or_default();
        let access =
            self.jwt
                .issue_access(claims.sub, PrincipalKind::User, label, Some(current.chain_id))?;
        let refresh = self
            .jwt
            .issue_refresh(claims.sub, label, next_jti, current.chain_id)?;

        debug!(principal = %claims.sub, chain = %current.chain_id, "rotated refresh token");
        Ok(self.pair(access, refresh))
    }

    /// Revoke every refresh record of the token's owner
    ///
    /// Idempotent: an invalid or expired token has nothing to revoke and
    /// reports no error. Returns the owner's id when the token named one.
    pub async fn revoke(&self, refresh_token: &str) -> Result<Option<Uuid>> {
        let claims = match self.jwt.verify_kind(refresh_token, TokenKind::Refresh) {
            Ok(claims) => claims,
            Err(err) => {
                debug!("logout with unusable refresh token: {}", err);
                return Ok(None);
            }
        };

        let revoked = self.store.revoke_all_for(claims.sub).await?;
        debug!(principal = %claims.sub, revoked, "logout revoked refresh records");
        Ok(Some(claims.sub))
    }

    /// Sign a short-lived service token; no refresh token, no chain
    pub fn issue_service_token(&self, service: &Service) -> Result<(String, u64)> {
        let token = self.jwt.issue_service(service.id, &service.client_id)?;
        Ok((token, self.jwt.service_ttl()))
    }

    fn refresh_duration(&self) -> Duration {
        Duration::seconds(self.jwt.refresh_ttl() as i64)
    }

    fn pair(&self, access_token: String, refresh_token: String) -> TokenPair {
        TokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.access_ttl(),
        }
    }
}
