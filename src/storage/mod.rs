//! Storage seams for the gateway
//!
//! The engine reads principals, roles, and policies through collaborator
//! traits and records refresh-token rotation state through them. The
//! management surface owns the data; the engine never writes anything
//! except rotation-chain state. In-memory reference implementations back
//! the default wiring and the test suite.

pub mod memory;

use crate::auth::chains::{RefreshRecord, SupersedeOutcome};
use crate::auth::rbac::{Permission, Role};
use crate::config::SeedConfig;
use crate::core::decision::DecisionRecord;
use crate::core::policy::Policy;
use crate::core::principal::{Service, User};
use crate::utils::crypto::{hash_password, hash_secret};
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Read access to the active policy set
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Load the current policy set, enabled or not
    async fn load_policies(&self) -> Result<Vec<Policy>>;
}

/// Read access to principals, roles, and permissions
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Look a user up by username or email
    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>>;

    async fn find_service_by_id(&self, id: Uuid) -> Result<Option<Service>>;

    async fn find_service_by_client_id(&self, client_id: &str) -> Result<Option<Service>>;

    async fn roles_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Role>>;

    async fn permissions_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Permission>>;

    /// Record a successful login; called off the response path
    async fn touch_last_login(&self, user_id: Uuid) -> Result<()>;
}

/// Durable record of refresh-token rotation chains
///
/// `try_supersede` is the single serialization point of the engine: it must
/// behave as a conditional update keyed by token id, so that two concurrent
/// rotations of one token produce exactly one success.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn insert(&self, record: RefreshRecord) -> Result<()>;

    async fn get(&self, jti: Uuid) -> Result<Option<RefreshRecord>>;

    /// Atomically mark `jti` superseded by `replacement` iff it is still
    /// active, returning what state the record was found in
    async fn try_supersede(&self, jti: Uuid, replacement: Uuid) -> Result<SupersedeOutcome>;

    /// Mark one record revoked; idempotent
    async fn revoke(&self, jti: Uuid) -> Result<()>;

    /// Revoke every record sharing a rotation chain; returns how many
    /// records changed state
    async fn revoke_chain(&self, chain_id: Uuid) -> Result<usize>;

    /// Revoke every live record belonging to a principal; returns how many
    /// records changed state
    async fn revoke_all_for(&self, principal_id: Uuid) -> Result<usize>;

    /// Whether any record of the chain has been revoked
    async fn is_chain_revoked(&self, chain_id: Uuid) -> Result<bool>;
}

/// Receiver for decision records
///
/// The engine hands records off without waiting for persistence; a failing
/// sink never blocks or fails a decision.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record_decision(&self, record: DecisionRecord) -> Result<()>;
}

/// Bundle of the storage collaborators the engine needs
#[derive(Clone)]
pub struct StorageLayer {
    pub policies: Arc<dyn PolicyStore>,
    pub directory: Arc<dyn DirectoryStore>,
    pub tokens: Arc<dyn TokenStore>,
    pub audit: Arc<dyn AuditSink>,
}

impl StorageLayer {
    /// All-in-memory wiring, used by the default server setup and tests
    pub fn in_memory() -> Self {
        Self {
            policies: Arc::new(memory::MemoryPolicyStore::new()),
            directory: Arc::new(memory::MemoryDirectory::new()),
            tokens: Arc::new(memory::MemoryTokenStore::new()),
            audit: Arc::new(memory::TracingAuditSink),
        }
    }

    /// In-memory wiring populated from seed data
    ///
    /// Plaintext passwords and secrets are hashed here; only hashes reach
    /// the directory.
    pub fn from_seed(seed: &SeedConfig) -> Result<Self> {
        let policies = memory::MemoryPolicyStore::new();
        policies.set_policies(seed.policies.clone());

        let directory = memory::MemoryDirectory::new();

        let mut permission_ids: HashMap<&str, Uuid> = HashMap::new();
        for entry in &seed.permissions {
            let permission = Permission {
                id: Uuid::new_v4(),
                code: entry.code.clone(),
                name: entry.name.clone().unwrap_or_else(|| entry.code.clone()),
            };
            permission_ids.insert(entry.code.as_str(), permission.id);
            directory.add_permission(permission);
        }

        let mut role_ids: HashMap<&str, Uuid> = HashMap::new();
        for entry in &seed.roles {
            let granted = entry
                .permissions
                .iter()
                .map(|code| {
                    permission_ids.get(code.as_str()).copied().ok_or_else(|| {
                        GatewayError::config(format!(
                            "Role {} references unknown permission: {}",
                            entry.code, code
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            let role = Role {
                id: Uuid::new_v4(),
                code: entry.code.clone(),
                name: entry.name.clone().unwrap_or_else(|| entry.code.clone()),
                permission_ids: granted,
            };
            role_ids.insert(entry.code.as_str(), role.id);
            directory.add_role(role);
        }

        for entry in &seed.users {
            let assigned = entry
                .roles
                .iter()
                .map(|code| {
                    role_ids.get(code.as_str()).copied().ok_or_else(|| {
                        GatewayError::config(format!(
                            "User {} references unknown role: {}",
                            entry.username, code
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            directory.add_user(User {
                id: Uuid::new_v4(),
                username: entry.username.clone(),
                email: entry.email.clone(),
                password_hash: hash_password(&entry.password)?,
                is_active: entry.active,
                is_superuser: entry.superuser,
                role_ids: assigned,
                last_login_at: None,
            });
        }

        for entry in &seed.services {
            directory.add_service(Service {
                id: Uuid::new_v4(),
                client_id: entry.client_id.clone(),
                secret_hashes: vec![hash_secret(&entry.secret)],
                is_active: entry.active,
            });
        }

        Ok(Self {
            policies: Arc::new(policies),
            directory: Arc::new(directory),
            tokens: Arc::new(memory::MemoryTokenStore::new()),
            audit: Arc::new(memory::TracingAuditSink),
        })
    }
}
