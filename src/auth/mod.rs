//! Authentication and authorization system
//!
//! The facade over the token subsystem, the RBAC resolver, and the
//! principal directory. Routes and the decision engine talk to this type;
//! the pieces underneath stay independently testable.

pub mod chains;
pub mod jwt;
pub mod rbac;
pub mod tokens;

use crate::auth::jwt::{Claims, JwtHandler, TokenPair};
use crate::auth::rbac::RbacResolver;
use crate::auth::tokens::TokenService;
use crate::config::{AuthConfig, PrincipalCacheConfig};
use crate::core::principal::{Principal, PrincipalKind};
use crate::storage::{DirectoryStore, StorageLayer};
use crate::utils::crypto::{hash_secret, verify_password};
use crate::utils::error::{GatewayError, Result};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Main authentication system
#[derive(Clone)]
pub struct AuthSystem {
    /// Authentication configuration
    config: Arc<AuthConfig>,
    /// Token issuance, rotation, and revocation
    tokens: TokenService,
    /// Role and permission resolution
    rbac: RbacResolver,
    /// Principal directory
    directory: Arc<dyn DirectoryStore>,
    /// TTL cache in front of principal lookups on the decision path
    principals: moka::future::Cache<Uuid, Principal>,
}

/// What a strict token introspection reveals about the caller
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub principal_id: Uuid,
    pub label: String,
    pub kind: PrincipalKind,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    /// Unix timestamp the presented token stops being valid
    pub expires_at: u64,
}

impl AuthSystem {
    /// Create a new authentication system
    pub fn new(
        config: &AuthConfig,
        cache_config: &PrincipalCacheConfig,
        storage: &StorageLayer,
    ) -> Self {
        info!("Initializing authentication system");

        let jwt = JwtHandler::new(config);
        let principals = moka::future::Cache::builder()
            .max_capacity(cache_config.capacity)
            .time_to_live(Duration::from_secs(cache_config.ttl_secs))
            .build();

        Self {
            config: Arc::new(config.clone()),
            tokens: TokenService::new(jwt, Arc::clone(&storage.tokens)),
            rbac: RbacResolver::new(Arc::clone(&storage.directory)),
            directory: Arc::clone(&storage.directory),
            principals,
        }
    }

    /// Authenticate a user by username or email and password
    ///
    /// Unknown accounts and wrong passwords fail with one identical
    /// message, so the endpoint cannot be used to enumerate accounts.
    pub async fn login(&self, login: &str, password: &str) -> Result<TokenPair> {
        info!("User login attempt: {}", login);

        let user = self
            .directory
            .find_user_by_login(login)
            .await?
            .ok_or_else(|| GatewayError::auth("Invalid username or password"))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(GatewayError::auth("Invalid username or password"));
        }

        if !user.is_active {
            return Err(GatewayError::authorization("Account is not active"));
        }

        let pair = self.tokens.issue(&user).await?;

        // Last-login bookkeeping happens off the response path
        let directory = Arc::clone(&self.directory);
        let user_id = user.id;
        tokio::spawn(async move {
            if let Err(err) = directory.touch_last_login(user_id).await {
                warn!("Failed to record last login: {}", err);
            }
        });

        info!("User logged in successfully: {}", user.username);
        Ok(pair)
    }

    /// Rotate a refresh token into a fresh pair
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        self.tokens.rotate(refresh_token).await
    }

    /// Log out: revoke the caller's refresh chains and drop the cached
    /// principal
    ///
    /// Idempotent, and silent about whether the token was usable.
    pub async fn logout(&self, refresh_token: &str) -> Result<Option<Uuid>> {
        let owner = self.tokens.revoke(refresh_token).await?;
        if let Some(id) = owner {
            self.principals.invalidate(&id).await;
            info!("User logged out: {}", id);
        }
        Ok(owner)
    }

    /// Exchange client credentials for a short-lived service token
    ///
    /// Every failure reads the same to the caller; the real reason only
    /// reaches the logs.
    pub async fn exchange_client_credentials(
        &self,
        client_id: &str,
        secret: &str,
    ) -> Result<(String, u64)> {
        let service = self
            .directory
            .find_service_by_client_id(client_id)
            .await?
            .ok_or_else(|| {
                debug!("Credential exchange for unknown client: {}", client_id);
                GatewayError::auth("Invalid client credentials")
            })?;

        let presented = hash_secret(secret);
        if !service.secret_hashes.iter().any(|h| h == &presented) {
            debug!("Credential exchange with bad secret: {}", client_id);
            return Err(GatewayError::auth("Invalid client credentials"));
        }

        if !service.is_active {
            debug!("Credential exchange for inactive service: {}", client_id);
            return Err(GatewayError::auth("Invalid client credentials"));
        }

        let issued = self.tokens.issue_service_token(&service)?;
        info!("Service token issued for: {}", service.client_id);
        Ok(issued)
    }

    /// Look up the live principal behind verified claims
    ///
    /// `None` means the principal is gone or deactivated and the token
    /// must be treated as invalid. Hits go through the TTL cache, so a
    /// deactivation shows up within one cache lifetime; only live
    /// principals are ever cached.
    pub async fn resolve_principal(&self, claims: &Claims) -> Result<Option<Principal>> {
        if let Some(principal) = self.principals.get(&claims.sub).await {
            return Ok(Some(principal));
        }

        let principal = match claims.kind {
            PrincipalKind::User => self
                .directory
                .find_user_by_id(claims.sub)
                .await?
                .map(Principal::from),
            PrincipalKind::Service => self
                .directory
                .find_service_by_id(claims.sub)
                .await?
                .map(Principal::from),
        };

        match principal {
            Some(principal) if principal.is_active() => {
                self.principals.insert(claims.sub, principal.clone()).await;
                Ok(Some(principal))
            }
            Some(_) => {
                debug!("Principal is deactivated: {}", claims.sub);
                Ok(None)
            }
            None => {
                debug!("Principal not found: {}", claims.sub);
                Ok(None)
            }
        }
    }

    /// Strict access-token introspection for outer gateways
    ///
    /// Bypasses the principal cache and checks the rotation chain, so a
    /// logout or theft revocation is visible immediately.
    pub async fn validate_strict(&self, token: &str) -> Result<SessionInfo> {
        let claims = self.tokens.verify_access_checked(token).await?;

        let user = self
            .directory
            .find_user_by_id(claims.sub)
            .await?
            .ok_or_else(|| GatewayError::auth("Invalid token"))?;
        if !user.is_active {
            debug!("Introspection for deactivated user: {}", user.username);
            return Err(GatewayError::auth("Invalid token"));
        }

        let roles = self.rbac.role_codes(&user).await?;
        let mut permissions: Vec<String> = self
            .rbac
            .effective_permissions(&user)
            .await?
            .into_iter()
            .collect();
        permissions.sort();

        Ok(SessionInfo {
            principal_id: user.id,
            label: user.username,
            kind: PrincipalKind::User,
            roles,
            permissions,
            expires_at: claims.exp,
        })
    }

    /// Get the auth configuration
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Get the token service
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Get the RBAC resolver
    pub fn rbac(&self) -> &RbacResolver {
        &self.rbac
    }
}
