//! In-memory storage backends
//!
//! Reference implementations of the storage seams. They back the default
//! server wiring and the test suite. `MemoryTokenStore` relies on the
//! sharded map holding its shard lock across `get_mut`, which makes the
//! conditional supersede a single atomic step.

use crate::auth::chains::{RefreshRecord, RefreshState, SupersedeOutcome};
use crate::auth::rbac::{Permission, Role};
use crate::core::decision::DecisionRecord;
use crate::core::policy::Policy;
use crate::core::principal::{Service, User};
use crate::storage::{AuditSink, DirectoryStore, PolicyStore, TokenStore};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

// ==================== Policy Store ====================

/// Policy set held behind a read-write lock
#[derive(Default)]
pub struct MemoryPolicyStore {
    policies: RwLock<Vec<Policy>>,
}

impl MemoryPolicyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole policy set
    pub fn set_policies(&self, policies: Vec<Policy>) {
        *self.policies.write() = policies;
    }
}

#[async_trait]
impl PolicyStore for MemoryPolicyStore {
    async fn load_policies(&self) -> Result<Vec<Policy>> {
        Ok(self.policies.read().clone())
    }
}

// ==================== Directory ====================

/// Principals, roles, and permissions in sharded maps
#[derive(Default)]
pub struct MemoryDirectory {
    users: DashMap<Uuid, User>,
    services: DashMap<Uuid, Service>,
    roles: DashMap<Uuid, Role>,
    permissions: DashMap<Uuid, Permission>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, user: User) {
        self.users.insert(user.id, user);
    }

    pub fn add_service(&self, service: Service) {
        self.services.insert(service.id, service);
    }

    pub fn add_role(&self, role: Role) {
        self.roles.insert(role.id, role);
    }

    pub fn add_permission(&self, permission: Permission) {
        self.permissions.insert(permission.id, permission);
    }
}

#[async_trait]
impl DirectoryStore for MemoryDirectory {
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.username == login || u.email == login)
            .map(|u| u.clone()))
    }

    async fn find_service_by_id(&self, id: Uuid) -> Result<Option<Service>> {
        Ok(self.services.get(&id).map(|s| s.clone()))
    }

    async fn find_service_by_client_id(&self, client_id: &str) -> Result<Option<Service>> {
        Ok(self
            .services
            .iter()
            .find(|s| s.client_id == client_id)
            .map(|s| s.clone()))
    }

    async fn roles_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Role>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.roles.get(id).map(|r| r.clone()))
            .collect())
    }

    async fn permissions_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Permission>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.permissions.get(id).map(|p| p.clone()))
            .collect())
    }

    async fn touch_last_login(&self, user_id: Uuid) -> Result<()> {
        if let Some(mut user) = self.users.get_mut(&user_id) {
            user.last_login_at = Some(Utc::now());
        }
        Ok(())
    }
}

// ==================== Token Store ====================

/// Refresh-token records keyed by token id
#[derive(Default)]
pub struct MemoryTokenStore {
    records: DashMap<Uuid, RefreshRecord>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn insert(&self, record: RefreshRecord) -> Result<()> {
        self.records.insert(record.jti, record);
        Ok(())
    }

    async fn get(&self, jti: Uuid) -> Result<Option<RefreshRecord>> {
        Ok(self.records.get(&jti).map(|r| r.clone()))
    }

    async fn try_supersede(&self, jti: Uuid, replacement: Uuid) -> Result<SupersedeOutcome> {
        // get_mut keeps the shard locked from the state check through the
        // write, so concurrent rotations of one token see exactly one
        // Superseded outcome.
        match self.records.get_mut(&jti) {
            None => Ok(SupersedeOutcome::NotFound),
            Some(mut record) => match record.state {
                RefreshState::Active => {
                    record.state = RefreshState::Superseded;
                    record.replaced_by = Some(replacement);
                    Ok(SupersedeOutcome::Superseded)
                }
                RefreshState::Superseded => Ok(SupersedeOutcome::AlreadySuperseded),
                RefreshState::Revoked => Ok(SupersedeOutcome::Revoked),
            },
        }
    }

    async fn revoke(&self, jti: Uuid) -> Result<()> {
        if let Some(mut record) = self.records.get_mut(&jti) {
            record.state = RefreshState::Revoked;
        }
        Ok(())
    }

    async fn revoke_chain(&self, chain_id: Uuid) -> Result<usize> {
        let mut changed = 0;
        for mut entry in self.records.iter_mut() {
            if entry.chain_id == chain_id && entry.state != RefreshState::Revoked {
                entry.state = RefreshState::Revoked;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn revoke_all_for(&self, principal_id: Uuid) -> Result<usize> {
        let mut changed = 0;
        for mut entry in self.records.iter_mut() {
            if entry.principal_id == principal_id && entry.state != RefreshState::Revoked {
                entry.state = RefreshState::Revoked;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn is_chain_revoked(&self, chain_id: Uuid) -> Result<bool> {
        Ok(self
            .records
            .iter()
            .any(|r| r.chain_id == chain_id && r.state == RefreshState::Revoked))
    }
}

// ==================== Audit Sinks ====================

/// Emits decision records as structured log events under the `audit` target
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record_decision(&self, record: DecisionRecord) -> Result<()> {
        info!(
            target: "audit",
            request_id = %record.request_id,
            principal = record.principal.as_deref().unwrap_or("-"),
            client_addr = %record.client_addr,
            method = %record.method,
            path = %record.path,
            policy_id = record.policy_id,
            outcome = %record.outcome,
            reason = record.deny_reason.map(|r| r.as_str()).unwrap_or("-"),
            latency_micros = record.latency.as_micros() as u64,
            "access decision"
        );
        Ok(())
    }
}

/// Collects decision records for assertions in tests
#[derive(Default)]
pub struct MemoryAuditSink {
    records: Mutex<Vec<DecisionRecord>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<DecisionRecord> {
        self.records.lock().clone()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record_decision(&self, record: DecisionRecord) -> Result<()> {
        self.records.lock().push(record);
        Ok(())
    }
}
