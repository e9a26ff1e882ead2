//! Principals known to the gateway
//!
//! A principal is either a human user or a backend service. The two kinds
//! share a stable id and an active flag but differ in what they may do:
//! services authenticate with client credentials and never hold refresh
//! tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discriminates the two principal kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    User,
    Service,
}

impl std::fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrincipalKind::User => write!(f, "user"),
            PrincipalKind::Service => write!(f, "service"),
        }
    }
}

/// A human user account
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_superuser: bool,
    /// Roles assigned to this user, resolved to permissions at decision time
    pub role_ids: Vec<Uuid>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// A backend service account
#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    pub id: Uuid,
    /// Client identifier presented during credential exchange
    pub client_id: String,
    /// Hashes of the secrets currently accepted for this service
    pub secret_hashes: Vec<String>,
    pub is_active: bool,
}

/// An authenticated actor, user or service
#[derive(Debug, Clone, PartialEq)]
pub enum Principal {
    User(User),
    Service(Service),
}

impl Principal {
    pub fn id(&self) -> Uuid {
        match self {
            Principal::User(user) => user.id,
            Principal::Service(service) => service.id,
        }
    }

    pub fn kind(&self) -> PrincipalKind {
        match self {
            Principal::User(_) => PrincipalKind::User,
            Principal::Service(_) => PrincipalKind::Service,
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            Principal::User(user) => user.is_active,
            Principal::Service(service) => service.is_active,
        }
    }

    /// Human-readable identifier for audit records and logs
    pub fn label(&self) -> &str {
        match self {
            Principal::User(user) => &user.username,
            Principal::Service(service) => &service.client_id,
        }
    }
}

impl From<User> for Principal {
    fn from(user: User) -> Self {
        Principal::User(user)
    }
}

impl From<Service> for Principal {
    fn from(service: Service) -> Self {
        Principal::Service(service)
    }
}
