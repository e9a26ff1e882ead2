//! Access decision orchestration
//!
//! One entry point, `decide`, takes a normalized request and produces a
//! `DecisionRecord`: governing policy, authentication legs, permission
//! check, audit handoff. Every failure inside the engine degrades to a
//! deny verdict; the engine itself never errors per request.

use crate::auth::AuthSystem;
use crate::auth::rbac::RbacResolver;
use crate::auth::tokens::TokenError;
use crate::config::DefaultDecision;
use crate::core::decision::types::{AccessRequest, DecisionRecord, DenyReason, Outcome};
use crate::core::policy::{Policy, PolicyCache, resolve};
use crate::core::principal::{Principal, PrincipalKind, User};
use crate::storage::AuditSink;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// The access decision engine
pub struct DecisionEngine {
    auth: Arc<AuthSystem>,
    policies: Arc<PolicyCache>,
    audit: Arc<dyn AuditSink>,
    default_decision: DefaultDecision,
}

/// Where an evaluation landed before the record is assembled
struct Evaluation {
    policy_id: Option<u64>,
    principal: Option<String>,
    principal_kind: Option<PrincipalKind>,
    outcome: Outcome,
    deny_reason: Option<DenyReason>,
}

impl Evaluation {
    fn deny(policy_id: Option<u64>, reason: DenyReason) -> Self {
        Self {
            policy_id,
            principal: None,
            principal_kind: None,
            outcome: Outcome::Deny,
            deny_reason: Some(reason),
        }
    }

    fn deny_as(mut self, reason: DenyReason) -> Self {
        self.outcome = Outcome::Deny;
        self.deny_reason = Some(reason);
        self
    }
}

impl DecisionEngine {
    pub fn new(
        auth: Arc<AuthSystem>,
        policies: Arc<PolicyCache>,
        audit: Arc<dyn AuditSink>,
        default_decision: DefaultDecision,
    ) -> Self {
        Self {
            auth,
            policies,
            audit,
            default_decision,
        }
    }

    /// Decide one access request
    ///
    /// Always returns a record; the caller reads the outcome and reason
    /// from it. The record is handed to the audit sink without waiting
    /// for persistence.
    pub async fn decide(&self, request: AccessRequest) -> DecisionRecord {
        let started = Instant::now();

        let snapshot = self.policies.snapshot();
        let policy = resolve(&request.path, &request.method, &snapshot.policies);
        let evaluation = self.evaluate(policy, &request).await;

        let record = DecisionRecord {
            request_id: request.request_id.clone(),
            timestamp: Utc::now(),
            principal: evaluation.principal,
            principal_kind: evaluation.principal_kind,
            client_addr: request
                .client_addr
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            method: request.method.clone(),
            path: request.path.clone(),
            policy_id: evaluation.policy_id,
            outcome: evaluation.outcome,
            deny_reason: evaluation.deny_reason,
            latency: started.elapsed(),
        };

        debug!(
            request_id = %record.request_id,
            path = %record.path,
            outcome = %record.outcome,
            reason = record.deny_reason.map(|r| r.as_str()).unwrap_or("-"),
            "access decision"
        );

        let audit = Arc::clone(&self.audit);
        let handoff = record.clone();
        tokio::spawn(async move {
            if let Err(err) = audit.record_decision(handoff).await {
                warn!("Failed to record decision: {}", err);
            }
        });

        record
    }

    async fn evaluate(&self, policy: Option<&Policy>, request: &AccessRequest) -> Evaluation {
        let Some(policy) = policy else {
            return match self.default_decision {
                DefaultDecision::Allow => Evaluation {
                    policy_id: None,
                    principal: None,
                    principal_kind: None,
                    outcome: Outcome::Allow,
                    deny_reason: None,
                },
                DefaultDecision::Deny => Evaluation::deny(None, DenyReason::NoPolicyMatched),
            };
        };

        let mut evaluation = Evaluation {
            policy_id: Some(policy.id),
            principal: None,
            principal_kind: None,
            outcome: Outcome::Allow,
            deny_reason: None,
        };

        // A policy that requires permissions needs an identity to check
        // them against, whether or not it says auth_required.
        let needs_user_auth = policy.auth_required || !policy.required_permissions.is_empty();
        let mut user: Option<User> = None;
        let mut service_caller = false;

        if policy.s2s_required {
            let Some(bearer) = request.bearer.as_deref() else {
                return evaluation.deny_as(DenyReason::ServiceAuthRequired);
            };
            match self.auth.tokens().verify_service(bearer) {
                Ok(claims) => {
                    evaluation.principal = claims.label.clone();
                    evaluation.principal_kind = Some(PrincipalKind::Service);
                    service_caller = true;
                }
                Err(err) => {
                    debug!("Service credential rejected: {}", err);
                    return evaluation.deny_as(DenyReason::ServiceAuthInvalid);
                }
            }
        } else if needs_user_auth {
            let Some(bearer) = request.bearer.as_deref() else {
                return evaluation.deny_as(DenyReason::AuthRequired);
            };
            let claims = match self.auth.tokens().verify_caller(bearer) {
                Ok(claims) => claims,
                Err(TokenError::Expired) => {
                    return evaluation.deny_as(DenyReason::AuthExpired);
                }
                Err(err) => {
                    debug!("Credential rejected: {}", err);
                    return evaluation.deny_as(DenyReason::AuthInvalid);
                }
            };

            match claims.kind {
                // Service tokens are short-lived and self-contained; the
                // claims are the principal.
                PrincipalKind::Service => {
                    evaluation.principal = claims.label.clone();
                    evaluation.principal_kind = Some(PrincipalKind::Service);
                    service_caller = true;
                }
                PrincipalKind::User => match self.auth.resolve_principal(&claims).await {
                    Ok(Some(Principal::User(resolved))) => {
                        evaluation.principal = Some(resolved.username.clone());
                        evaluation.principal_kind = Some(PrincipalKind::User);
                        user = Some(resolved);
                    }
                    Ok(_) => {
                        // Gone or deactivated reads the same as a bad token
                        return evaluation.deny_as(DenyReason::AuthInvalid);
                    }
                    Err(err) => {
                        warn!("Principal lookup failed: {}", err);
                        return evaluation.deny_as(DenyReason::PolicyUnavailable);
                    }
                },
            }
        }

        // Authenticated services pass the s2s leg and are not subject to
        // user RBAC.
        if !policy.required_permissions.is_empty() && !service_caller {
            match &user {
                None => return evaluation.deny_as(DenyReason::AuthRequired),
                Some(user) if user.is_superuser => {}
                Some(user) => match self.auth.rbac().effective_permissions(user).await {
                    Ok(held) => {
                        if !RbacResolver::check(
                            &held,
                            &policy.required_permissions,
                            policy.permission_mode,
                        ) {
                            return evaluation.deny_as(DenyReason::PermissionDenied);
                        }
                    }
                    Err(err) => {
                        warn!("Permission resolution failed: {}", err);
                        return evaluation.deny_as(DenyReason::PolicyUnavailable);
                    }
                },
            }
        }

        evaluation
    }
}
