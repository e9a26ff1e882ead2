//! Decision inputs and outputs

use crate::core::principal::PrincipalKind;
use crate::utils::generate_request_id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One access check, normalized by the transport layer
#[derive(Debug, Clone)]
pub struct AccessRequest {
    pub method: String,
    pub path: String,
    pub client_addr: Option<String>,
    /// Bearer credential as presented, scheme prefix already stripped
    pub bearer: Option<String>,
    pub request_id: String,
}

impl AccessRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            client_addr: None,
            bearer: None,
            request_id: generate_request_id(),
        }
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    pub fn with_client_addr(mut self, addr: impl Into<String>) -> Self {
        self.client_addr = Some(addr.into());
        self
    }
}

/// Terminal verdict of a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Allow,
    Deny,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Allow => "allow",
            Outcome::Deny => "deny",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a request was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// The policy requires a user credential and none was presented
    AuthRequired,
    /// A credential was presented but failed verification
    AuthInvalid,
    AuthExpired,
    /// The policy requires a service credential and none was presented
    ServiceAuthRequired,
    ServiceAuthInvalid,
    PermissionDenied,
    /// No policy governed the path and the default decision is deny
    NoPolicyMatched,
    /// Policy or directory data could not be read; degrade to deny
    PolicyUnavailable,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::AuthRequired => "auth_required",
            DenyReason::AuthInvalid => "auth_invalid",
            DenyReason::AuthExpired => "auth_expired",
            DenyReason::ServiceAuthRequired => "service_auth_required",
            DenyReason::ServiceAuthInvalid => "service_auth_invalid",
            DenyReason::PermissionDenied => "permission_denied",
            DenyReason::NoPolicyMatched => "no_policy_matched",
            DenyReason::PolicyUnavailable => "policy_unavailable",
        }
    }

    /// HTTP status a forward-auth caller should surface for this reason
    pub fn status_code(&self) -> u16 {
        match self {
            DenyReason::AuthRequired
            | DenyReason::AuthInvalid
            | DenyReason::AuthExpired
            | DenyReason::ServiceAuthRequired
            | DenyReason::ServiceAuthInvalid => 401,
            DenyReason::PermissionDenied | DenyReason::NoPolicyMatched => 403,
            DenyReason::PolicyUnavailable => 503,
        }
    }
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What one decision concluded, and why
///
/// Produced by the engine for every request, returned to the transport
/// layer and handed to the audit sink. Not persisted by the engine itself.
#[derive(Debug, Clone)]
pub struct DecisionRecord {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    /// Label of the authenticated principal, if any
    pub principal: Option<String>,
    pub principal_kind: Option<PrincipalKind>,
    pub client_addr: String,
    pub method: String,
    pub path: String,
    /// Id of the governing policy; `None` when the default decision applied
    pub policy_id: Option<u64>,
    pub outcome: Outcome,
    pub deny_reason: Option<DenyReason>,
    pub latency: Duration,
}

impl DecisionRecord {
    pub fn is_allowed(&self) -> bool {
        self.outcome == Outcome::Allow
    }
}
