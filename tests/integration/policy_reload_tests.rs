//! Policy reload integration tests
//!
//! Drives the policy cache against a live store and watches decisions
//! change only when a refresh lands, never mid-snapshot.

#[cfg(test)]
mod tests {
    use crate::common::assertions::DecisionRecordAssertions;
    use crate::common::PolicyFactory;
    use crate::{assert_duration_within, assert_ok};
    use gatehouse_rs::auth::AuthSystem;
    use gatehouse_rs::config::{AuthConfig, DefaultDecision, PrincipalCacheConfig};
    use gatehouse_rs::core::decision::DecisionEngine;
    use gatehouse_rs::core::policy::{Policy, PolicyCache};
    use gatehouse_rs::storage::StorageLayer;
    use gatehouse_rs::storage::memory::{
        MemoryAuditSink, MemoryDirectory, MemoryPolicyStore, MemoryTokenStore,
    };
    use gatehouse_rs::{AccessRequest, DecisionRecord, DenyReason};
    use std::sync::Arc;
    use std::time::Duration;

    struct Fixture {
        store: Arc<MemoryPolicyStore>,
        cache: Arc<PolicyCache>,
        engine: DecisionEngine,
    }

    impl Fixture {
        /// Wire a cache and engine over a policy store the test can mutate
        async fn with_policies(policies: Vec<Policy>) -> Self {
            let store = Arc::new(MemoryPolicyStore::new());
            store.set_policies(policies);

            let audit = Arc::new(MemoryAuditSink::new());
            let storage = StorageLayer {
                policies: store.clone(),
                directory: Arc::new(MemoryDirectory::new()),
                tokens: Arc::new(MemoryTokenStore::new()),
                audit: audit.clone(),
            };

            let config = AuthConfig {
                jwt_secret: "test_secret_key_for_testing_only_0123456789".to_string(),
                ..AuthConfig::default()
            };
            let auth = Arc::new(AuthSystem::new(
                &config,
                &PrincipalCacheConfig::default(),
                &storage,
            ));
            // A long interval keeps the background task out of the picture;
            // the tests refresh by hand
            let cache = Arc::new(
                PolicyCache::new(Arc::clone(&storage.policies), Duration::from_secs(3600))
                    .await
                    .unwrap(),
            );
            let engine = DecisionEngine::new(
                auth,
                Arc::clone(&cache),
                audit,
                DefaultDecision::Deny,
            );

            Self {
                store,
                cache,
                engine,
            }
        }

        async fn decide(&self, path: &str) -> DecisionRecord {
            self.engine.decide(AccessRequest::new("GET", path)).await
        }
    }

    // ==================== Snapshot Stability Tests ====================

    /// Test that decisions follow the snapshot, not the live store
    #[tokio::test]
    async fn test_decisions_follow_the_refreshed_snapshot() {
        let fx = Fixture::with_policies(vec![PolicyFactory::public(1, "/status/**")]).await;

        fx.decide("/status/ping").await.assert_allowed();

        // The store changes; the served snapshot does not
        fx.store.set_policies(vec![]);
        fx.decide("/status/ping").await.assert_allowed();

        assert_ok!(fx.cache.refresh().await);
        fx.decide("/status/ping")
            .await
            .assert_denied(DenyReason::NoPolicyMatched);
    }

    /// Test that refresh reports how many policies it loaded
    #[tokio::test]
    async fn test_refresh_reports_the_loaded_count() {
        let fx = Fixture::with_policies(vec![]).await;
        assert_eq!(fx.cache.snapshot().policies.len(), 0);

        fx.store.set_policies(vec![
            PolicyFactory::public(1, "/a/**"),
            PolicyFactory::protected(2, "/b/**"),
            PolicyFactory::s2s(3, "/c/**"),
        ]);

        let loaded = assert_ok!(fx.cache.refresh().await);
        assert_eq!(loaded, 3);
        assert_eq!(fx.cache.snapshot().policies.len(), 3);
    }

    // ==================== Policy Change Tests ====================

    /// Test that disabling a policy takes effect on the next refresh
    #[tokio::test]
    async fn test_disabling_a_policy_takes_effect_on_refresh() {
        let fx = Fixture::with_policies(vec![PolicyFactory::public(1, "/status/**")]).await;
        fx.decide("/status/ping").await.assert_allowed();

        let mut disabled = PolicyFactory::public(1, "/status/**");
        disabled.enabled = false;
        fx.store.set_policies(vec![disabled]);
        assert_ok!(fx.cache.refresh().await);

        // A disabled policy governs nothing, not even as a deny
        fx.decide("/status/ping")
            .await
            .assert_denied(DenyReason::NoPolicyMatched);
    }

    /// Test that a new higher-priority overlay wins after a refresh
    #[tokio::test]
    async fn test_priority_overlay_arrives_with_refresh() {
        let guarded = PolicyFactory::protected(1, "/api/**");
        let fx = Fixture::with_policies(vec![guarded.clone()]).await;

        fx.decide("/api/health")
            .await
            .assert_denied(DenyReason::AuthRequired);

        let mut overlay = PolicyFactory::public(2, "/api/health");
        overlay.priority = 10;
        fx.store.set_policies(vec![guarded, overlay]);
        assert_ok!(fx.cache.refresh().await);

        let record = fx.decide("/api/health").await;
        record.assert_allowed();
        assert_eq!(record.policy_id, Some(2));
    }

    // ==================== Snapshot Age Tests ====================

    /// Test that the snapshot age resets when a refresh lands
    #[tokio::test]
    async fn test_snapshot_age_resets_on_refresh() {
        let fx = Fixture::with_policies(vec![]).await;

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(fx.cache.age() >= Duration::from_millis(40));

        assert_ok!(fx.cache.refresh().await);
        assert_duration_within!(fx.cache.age(), 1000);
    }
}
