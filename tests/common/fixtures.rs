//! Test fixtures and data factories
//!
//! Provides a fully wired in-memory gateway plus factory methods for
//! policies. All fixtures build real objects, not mocks.

use gatehouse_rs::auth::AuthSystem;
use gatehouse_rs::auth::jwt::TokenPair;
use gatehouse_rs::config::{AuthConfig, DefaultDecision, PrincipalCacheConfig, SeedConfig};
use gatehouse_rs::core::decision::{AccessRequest, DecisionEngine, DecisionRecord};
use gatehouse_rs::core::policy::{MethodFilter, PathPattern, Policy, PolicyCache};
use gatehouse_rs::storage::StorageLayer;
use gatehouse_rs::storage::memory::MemoryAuditSink;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Password shared by every seeded user
pub const PASSWORD: &str = "correct-horse-battery";

/// Secret of the seeded `svc-billing` service
pub const SERVICE_SECRET: &str = "billing-secret-billing-secret";

/// Default seed: three active users (one superuser), one inactive user,
/// one service, and six policies spanning every policy feature
pub const DEFAULT_SEED: &str = r#"
permissions:
  - code: "reports:read"
  - code: "reports:write"
  - code: "admin:ops"
roles:
  - code: analyst
    permissions: ["reports:read"]
  - code: editor
    permissions: ["reports:read", "reports:write"]
users:
  - username: alice
    email: alice@example.com
    password: correct-horse-battery
    roles: [analyst]
  - username: edith
    email: edith@example.com
    password: correct-horse-battery
    roles: [editor]
  - username: root
    email: root@example.com
    password: correct-horse-battery
    superuser: true
  - username: dormant
    email: dormant@example.com
    password: correct-horse-battery
    active: false
services:
  - client_id: svc-billing
    secret: billing-secret-billing-secret
policies:
  - id: 1
    name: reports
    pattern: "/reports/**"
    required_permissions: ["reports:read"]
  - id: 2
    name: report-export
    pattern: "/reports/export/**"
    priority: 5
    required_permissions: ["reports:write"]
  - id: 3
    name: public-status
    pattern: "/status/**"
    auth_required: false
  - id: 4
    name: internal-s2s
    pattern: "/internal/**"
    s2s_required: true
  - id: 5
    name: admin
    pattern: "/admin/**"
    required_permissions: ["admin:ops"]
  - id: 6
    name: upload-posts
    pattern: "/uploads/**"
    methods: [POST]
"#;

fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test_secret_key_for_testing_only_0123456789".to_string(),
        ..AuthConfig::default()
    }
}

/// A wired gateway: seeded storage, auth system, policy cache, and
/// decision engine, with audit records captured in memory
pub struct TestGateway {
    pub auth: Arc<AuthSystem>,
    pub engine: Arc<DecisionEngine>,
    pub policies: Arc<PolicyCache>,
    pub storage: StorageLayer,
    pub audit: Arc<MemoryAuditSink>,
}

impl TestGateway {
    /// Gateway over [`DEFAULT_SEED`] with deny-by-default
    pub async fn seeded() -> Self {
        Self::build(DEFAULT_SEED, DefaultDecision::Deny).await
    }

    /// Gateway over a caller-provided seed with deny-by-default
    pub async fn with_seed(seed_yaml: &str) -> Self {
        Self::build(seed_yaml, DefaultDecision::Deny).await
    }

    /// Gateway over [`DEFAULT_SEED`] with allow-by-default
    pub async fn with_default_allow() -> Self {
        Self::build(DEFAULT_SEED, DefaultDecision::Allow).await
    }

    async fn build(seed_yaml: &str, default_decision: DefaultDecision) -> Self {
        let seed: SeedConfig = serde_yaml::from_str(seed_yaml).expect("seed yaml parses");
        let mut storage = StorageLayer::from_seed(&seed).expect("seed loads");

        let audit = Arc::new(MemoryAuditSink::new());
        storage.audit = audit.clone();

        let config = auth_config();
        let auth = Arc::new(AuthSystem::new(
            &config,
            &PrincipalCacheConfig::default(),
            &storage,
        ));

        let policies = Arc::new(
            PolicyCache::new(Arc::clone(&storage.policies), Duration::from_secs(3600))
                .await
                .expect("initial policy load"),
        );

        let engine = Arc::new(DecisionEngine::new(
            Arc::clone(&auth),
            Arc::clone(&policies),
            Arc::clone(&storage.audit),
            default_decision,
        ));

        Self {
            auth,
            engine,
            policies,
            storage,
            audit,
        }
    }

    /// Log a seeded user in with the shared test password
    pub async fn login(&self, username: &str) -> TokenPair {
        self.auth
            .login(username, PASSWORD)
            .await
            .expect("seeded login succeeds")
    }

    /// Run one request through the decision engine
    pub async fn decide(&self, method: &str, path: &str, bearer: Option<&str>) -> DecisionRecord {
        self.engine
            .decide(AccessRequest {
                method: method.to_string(),
                path: path.to_string(),
                client_addr: Some("203.0.113.9".to_string()),
                bearer: bearer.map(|t| t.to_string()),
                request_id: Uuid::new_v4().to_string(),
            })
            .await
    }

    /// Audit records written so far
    ///
    /// Audit writes are fire-and-forget, so this yields to the runtime
    /// before collecting.
    pub async fn audit_records(&self) -> Vec<DecisionRecord> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.audit.records()
    }
}

/// Factory for creating policies directly
pub struct PolicyFactory;

impl PolicyFactory {
    /// A policy requiring authentication and nothing else
    pub fn protected(id: u64, pattern: &str) -> Policy {
        Policy {
            id,
            name: format!("policy-{}", id),
            pattern: pattern.parse::<PathPattern>().expect("valid pattern"),
            priority: 0,
            methods: MethodFilter::all(),
            auth_required: true,
            s2s_required: false,
            permission_mode: Default::default(),
            required_permissions: vec![],
            enabled: true,
            description: None,
        }
    }

    /// A policy open to anonymous callers
    pub fn public(id: u64, pattern: &str) -> Policy {
        Policy {
            auth_required: false,
            ..Self::protected(id, pattern)
        }
    }

    /// A policy demanding specific permission codes
    pub fn with_permissions(id: u64, pattern: &str, permissions: &[&str]) -> Policy {
        Policy {
            required_permissions: permissions.iter().map(|p| p.to_string()).collect(),
            ..Self::protected(id, pattern)
        }
    }

    /// A policy restricted to service principals
    pub fn s2s(id: u64, pattern: &str) -> Policy {
        Policy {
            s2s_required: true,
            ..Self::protected(id, pattern)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_seed_parses() {
        let seed: SeedConfig = serde_yaml::from_str(DEFAULT_SEED).unwrap();
        assert!(seed.validate().is_ok());
        assert_eq!(seed.users.len(), 4);
        assert_eq!(seed.policies.len(), 6);
    }

    #[test]
    fn test_policy_factory() {
        let policy = PolicyFactory::with_permissions(9, "/x/**", &["a:b"]);
        assert_eq!(policy.id, 9);
        assert!(policy.auth_required);
        assert_eq!(policy.required_permissions, vec!["a:b".to_string()]);
    }
}
