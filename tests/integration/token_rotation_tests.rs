//! Token lifecycle integration tests
//!
//! Exercises login, rotation, revocation, and credential exchange through
//! the seeded gateway, with the decision engine and strict introspection
//! observing the same sessions.

#[cfg(test)]
mod tests {
    use crate::common::assertions::DecisionRecordAssertions;
    use crate::common::{PASSWORD, SERVICE_SECRET, TestGateway};
    use crate::{assert_err, assert_ok};
    use gatehouse_rs::core::principal::PrincipalKind;
    use std::sync::Arc;

    // ==================== Rotation Tests ====================

    /// Test that a rotated session keeps deciding under its new pair
    #[tokio::test]
    async fn test_rotation_keeps_the_session_deciding() {
        let gw = TestGateway::seeded().await;
        let first = gw.login("alice").await;

        let second = assert_ok!(gw.auth.refresh(&first.refresh_token).await);
        assert_ne!(second.access_token, first.access_token);
        assert_ne!(second.refresh_token, first.refresh_token);

        let record = gw
            .decide("GET", "/reports/q3", Some(&second.access_token))
            .await;
        record.assert_allowed();
        assert_eq!(record.principal.as_deref(), Some("alice"));

        // Rotation is not revocation: the outgoing access token rides out
        // its lifetime on the stateless hot path
        gw.decide("GET", "/reports/q3", Some(&first.access_token))
            .await
            .assert_allowed();
        assert_ok!(gw.auth.validate_strict(&second.access_token).await);
    }

    /// Test that replaying a redeemed refresh token poisons the chain
    #[tokio::test]
    async fn test_replay_containment_shuts_out_strict_callers() {
        let gw = TestGateway::seeded().await;
        let first = gw.login("alice").await;
        let second = assert_ok!(gw.auth.refresh(&first.refresh_token).await);

        // Replay of the redeemed token is treated as theft
        assert_err!(gw.auth.refresh(&first.refresh_token).await);

        // The whole chain is revoked: its live refresh token is dead and
        // strict introspection refuses the sibling access token
        assert_err!(gw.auth.refresh(&second.refresh_token).await);
        assert_err!(gw.auth.validate_strict(&second.access_token).await);

        // The stateless decision path keeps honoring the access token
        // until it expires; that is the documented tradeoff
        gw.decide("GET", "/reports/q3", Some(&second.access_token))
            .await
            .assert_allowed();
    }

    /// Test that two concurrent rotations of one token admit one winner
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_refresh_admits_one_winner() {
        let gw = Arc::new(TestGateway::seeded().await);
        let pair = gw.login("alice").await;

        let a = {
            let gw = Arc::clone(&gw);
            let token = pair.refresh_token.clone();
            tokio::spawn(async move { gw.auth.refresh(&token).await })
        };
        let b = {
            let gw = Arc::clone(&gw);
            let token = pair.refresh_token.clone();
            tokio::spawn(async move { gw.auth.refresh(&token).await })
        };

        let outcomes = [a.await.unwrap(), b.await.unwrap()];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    }

    // ==================== Logout Tests ====================

    /// Test that logout is visible to strict callers immediately
    #[tokio::test]
    async fn test_logout_is_visible_to_strict_callers() {
        let gw = TestGateway::seeded().await;
        let pair = gw.login("alice").await;
        assert_ok!(gw.auth.validate_strict(&pair.access_token).await);

        let owner = assert_ok!(gw.auth.logout(&pair.refresh_token).await);
        assert!(owner.is_some());

        assert_err!(gw.auth.validate_strict(&pair.access_token).await);
        assert_err!(gw.auth.refresh(&pair.refresh_token).await);

        // Logging out again, or with garbage, stays quiet
        assert_ok!(gw.auth.logout(&pair.refresh_token).await);
        assert_eq!(assert_ok!(gw.auth.logout("not.a.jwt").await), None);
    }

    /// Test that logout severs every session of the account
    #[tokio::test]
    async fn test_logout_severs_every_session_of_the_account() {
        let gw = TestGateway::seeded().await;
        let desktop = gw.login("alice").await;
        let laptop = gw.login("alice").await;

        assert_ok!(gw.auth.logout(&desktop.refresh_token).await);
        assert_err!(gw.auth.refresh(&laptop.refresh_token).await);
    }

    // ==================== Login Edge Tests ====================

    /// Test that a deactivated seeded account cannot log in
    #[tokio::test]
    async fn test_dormant_account_cannot_login() {
        let gw = TestGateway::seeded().await;
        assert_err!(gw.auth.login("dormant", PASSWORD).await);
    }

    /// Test that unknown accounts and wrong passwords read identically
    #[tokio::test]
    async fn test_login_failures_read_identically() {
        let gw = TestGateway::seeded().await;

        let unknown = assert_err!(gw.auth.login("mallory", PASSWORD).await);
        let wrong = assert_err!(gw.auth.login("alice", "wrong-password").await);
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    // ==================== Introspection Tests ====================

    /// Test that introspection reports the roles and permissions seeded in YAML
    #[tokio::test]
    async fn test_session_introspection_reflects_seeded_rbac() {
        let gw = TestGateway::seeded().await;

        let alice = gw.login("alice").await;
        let session = assert_ok!(gw.auth.validate_strict(&alice.access_token).await);
        assert_eq!(session.label, "alice");
        assert_eq!(session.kind, PrincipalKind::User);
        assert_eq!(session.roles, vec!["analyst"]);
        assert_eq!(session.permissions, vec!["reports:read"]);

        let edith = gw.login("edith").await;
        let session = assert_ok!(gw.auth.validate_strict(&edith.access_token).await);
        assert_eq!(session.permissions, vec!["reports:read", "reports:write"]);
    }

    // ==================== Credential Exchange Tests ====================

    /// Test the client credentials flow end to end
    #[tokio::test]
    async fn test_client_credentials_flow() {
        let gw = TestGateway::seeded().await;

        let (token, ttl) = assert_ok!(
            gw.auth
                .exchange_client_credentials("svc-billing", SERVICE_SECRET)
                .await
        );
        assert!(ttl > 0);

        let claims = assert_ok!(gw.auth.tokens().verify_service(&token));
        assert_eq!(claims.label.as_deref(), Some("svc-billing"));
        assert!(claims.chain.is_none());

        // Service tokens are not refreshable and carry no session
        assert_err!(gw.auth.refresh(&token).await);
        assert_err!(gw.auth.validate_strict(&token).await);

        assert_err!(
            gw.auth
                .exchange_client_credentials("svc-billing", "bad-secret")
                .await
        );
    }
}
