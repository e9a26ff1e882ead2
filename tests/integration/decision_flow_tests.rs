//! Decision flow integration tests
//!
//! Runs full requests through a gateway seeded from configuration YAML:
//! seed loading, password hashing, policy resolution, both authentication
//! legs, RBAC, and the audit trail working together.

#[cfg(test)]
mod tests {
    use crate::common::assertions::DecisionRecordAssertions;
    use crate::common::{SERVICE_SECRET, TestGateway};
    use gatehouse_rs::core::principal::PrincipalKind;
    use gatehouse_rs::{DenyReason, Outcome};

    // ==================== Anonymous Traffic Tests ====================

    /// Test that anonymous callers reach the public status pages and nothing else
    #[tokio::test]
    async fn test_anonymous_reaches_status_but_nothing_else() {
        let gw = TestGateway::seeded().await;

        let record = gw.decide("GET", "/status/health", None).await;
        record.assert_allowed();
        assert_eq!(record.policy_id, Some(3));
        assert_eq!(record.principal, None);

        let record = gw.decide("GET", "/reports/q3", None).await;
        record.assert_denied(DenyReason::AuthRequired);
        assert_eq!(record.policy_id, Some(1));

        let record = gw.decide("GET", "/nowhere", None).await;
        record.assert_denied(DenyReason::NoPolicyMatched);
        assert_eq!(record.policy_id, None);
    }

    // ==================== Permission Tier Tests ====================

    /// Test that an analyst can read reports but the export overlay stops them
    #[tokio::test]
    async fn test_analyst_reads_reports_but_cannot_export() {
        let gw = TestGateway::seeded().await;
        let pair = gw.login("alice").await;

        let record = gw
            .decide("GET", "/reports/q3", Some(&pair.access_token))
            .await;
        record.assert_allowed();
        assert_eq!(record.policy_id, Some(1));
        assert_eq!(record.principal.as_deref(), Some("alice"));
        assert_eq!(record.principal_kind, Some(PrincipalKind::User));

        // The export subtree carries a higher-priority policy that wants
        // reports:write, which the analyst role does not grant
        let record = gw
            .decide("GET", "/reports/export/q3", Some(&pair.access_token))
            .await;
        record.assert_denied(DenyReason::PermissionDenied);
        assert_eq!(record.policy_id, Some(2));
    }

    /// Test that the editor role spans both report tiers
    #[tokio::test]
    async fn test_editor_spans_both_report_tiers() {
        let gw = TestGateway::seeded().await;
        let pair = gw.login("edith").await;

        gw.decide("GET", "/reports/q3", Some(&pair.access_token))
            .await
            .assert_allowed();
        gw.decide("GET", "/reports/export/q3", Some(&pair.access_token))
            .await
            .assert_allowed();
    }

    /// Test that only the superuser clears a permission no role grants
    #[tokio::test]
    async fn test_superuser_clears_admin_gate_nobody_else_does() {
        let gw = TestGateway::seeded().await;

        let root = gw.login("root").await;
        let record = gw
            .decide("DELETE", "/admin/audit", Some(&root.access_token))
            .await;
        record.assert_allowed();
        assert_eq!(record.policy_id, Some(5));

        let alice = gw.login("alice").await;
        gw.decide("DELETE", "/admin/audit", Some(&alice.access_token))
            .await
            .assert_denied(DenyReason::PermissionDenied);

        // Superuser status never stands in for a credential
        gw.decide("DELETE", "/admin/audit", None)
            .await
            .assert_denied(DenyReason::AuthRequired);
    }

    /// Test that permission modes combine requirements from seed YAML
    #[tokio::test]
    async fn test_all_mode_requires_every_permission() {
        let gw = TestGateway::with_seed(
            r#"
            permissions:
              - code: "reports:read"
              - code: "reports:write"
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
            policies:
              - id: 1
                name: ops
                pattern: "/ops/**"
                permission_mode: all
                required_permissions: ["reports:read", "reports:write"]
            "#,
        )
        .await;

        let alice = gw.login("alice").await;
        gw.decide("GET", "/ops/rollout", Some(&alice.access_token))
            .await
            .assert_denied(DenyReason::PermissionDenied);

        let edith = gw.login("edith").await;
        gw.decide("GET", "/ops/rollout", Some(&edith.access_token))
            .await
            .assert_allowed();
    }

    // ==================== Method Filter Tests ====================

    /// Test that a method-filtered policy only governs its listed methods
    #[tokio::test]
    async fn test_uploads_accept_posts_only() {
        let gw = TestGateway::seeded().await;
        let pair = gw.login("alice").await;

        let record = gw
            .decide("POST", "/uploads/avatar", Some(&pair.access_token))
            .await;
        record.assert_allowed();
        assert_eq!(record.policy_id, Some(6));

        // GET is outside the filter, no other policy covers /uploads
        let record = gw
            .decide("GET", "/uploads/avatar", Some(&pair.access_token))
            .await;
        record.assert_denied(DenyReason::NoPolicyMatched);
        assert_eq!(record.policy_id, None);

        gw.decide("POST", "/uploads/avatar", None)
            .await
            .assert_denied(DenyReason::AuthRequired);
    }

    // ==================== Service Lane Tests ====================

    /// Test that the internal subtree only admits service credentials
    #[tokio::test]
    async fn test_internal_lane_is_service_to_service() {
        let gw = TestGateway::seeded().await;

        gw.decide("POST", "/internal/sync", None)
            .await
            .assert_denied(DenyReason::ServiceAuthRequired);

        // A user access token is the wrong credential kind here
        let pair = gw.login("alice").await;
        gw.decide("POST", "/internal/sync", Some(&pair.access_token))
            .await
            .assert_denied(DenyReason::ServiceAuthInvalid);

        let (token, _) = gw
            .auth
            .exchange_client_credentials("svc-billing", SERVICE_SECRET)
            .await
            .unwrap();
        let record = gw.decide("POST", "/internal/sync", Some(&token)).await;
        record.assert_allowed();
        assert_eq!(record.principal.as_deref(), Some("svc-billing"));
        assert_eq!(record.principal_kind, Some(PrincipalKind::Service));
    }

    /// Test that service tokens cross user policies without RBAC checks
    #[tokio::test]
    async fn test_service_token_crosses_user_policies() {
        let gw = TestGateway::seeded().await;
        let (token, _) = gw
            .auth
            .exchange_client_credentials("svc-billing", SERVICE_SECRET)
            .await
            .unwrap();

        let record = gw.decide("GET", "/reports/q3", Some(&token)).await;
        record.assert_allowed();
        assert_eq!(record.principal_kind, Some(PrincipalKind::Service));
    }

    // ==================== Default Decision Tests ====================

    /// Test that a default-allow gateway only inverts the unmatched case
    #[tokio::test]
    async fn test_default_allow_inverts_unmatched_only() {
        let gw = TestGateway::with_default_allow().await;

        let record = gw.decide("GET", "/nowhere", None).await;
        record.assert_allowed();
        assert_eq!(record.policy_id, None);

        // Matched policies still govern
        gw.decide("GET", "/reports/q3", None)
            .await
            .assert_denied(DenyReason::AuthRequired);
    }

    // ==================== Audit Trail Tests ====================

    /// Test that every decision lands in the audit log with its verdict
    #[tokio::test]
    async fn test_every_decision_lands_in_the_audit_log() {
        let gw = TestGateway::seeded().await;
        let pair = gw.login("alice").await;

        let allowed = gw
            .decide("GET", "/reports/q3", Some(&pair.access_token))
            .await;
        let denied = gw.decide("GET", "/reports/q3", None).await;

        let records = gw.audit_records().await;
        assert_eq!(records.len(), 2);

        let sunk = records
            .iter()
            .find(|r| r.request_id == allowed.request_id)
            .unwrap();
        assert_eq!(sunk.outcome, Outcome::Allow);
        assert_eq!(sunk.principal.as_deref(), Some("alice"));
        assert_eq!(sunk.client_addr, "203.0.113.9");

        let sunk = records
            .iter()
            .find(|r| r.request_id == denied.request_id)
            .unwrap();
        assert_eq!(sunk.outcome, Outcome::Deny);
        assert_eq!(sunk.deny_reason, Some(DenyReason::AuthRequired));
    }
}
