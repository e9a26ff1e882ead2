//! Seed data for the in-memory stores
//!
//! The management surface owns principals, roles, and policies; this build
//! of the gateway reads them from configuration at startup. Passwords and
//! service secrets arrive in plaintext here and are hashed before they
//! reach a store.

use super::*;
use crate::core::policy::Policy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Seed data loaded at startup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedConfig {
    #[serde(default)]
    pub permissions: Vec<SeedPermission>,
    #[serde(default)]
    pub roles: Vec<SeedRole>,
    #[serde(default)]
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub services: Vec<SeedService>,
    #[serde(default)]
    pub policies: Vec<Policy>,
}

/// A permission definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedPermission {
    /// Colon-structured permission code, e.g. "reports:read"
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A role definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedRole {
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Permission codes granted by this role
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// A user account definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedUser {
    pub username: String,
    pub email: String,
    /// Plaintext password, hashed at load time
    pub password: String,
    #[serde(default)]
    pub superuser: bool,
    #[serde(default = "default_true")]
    pub active: bool,
    /// Role codes assigned to this user
    #[serde(default)]
    pub roles: Vec<String>,
}

/// A service account definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedService {
    pub client_id: String,
    /// Plaintext secret, hashed at load time
    pub secret: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl SeedConfig {
    /// Validate seed data for duplicates and dangling references
    pub fn validate(&self) -> Result<(), String> {
        let mut permission_codes = HashSet::new();
        for permission in &self.permissions {
            if permission.code.is_empty() {
                return Err("Permission code cannot be empty".to_string());
            }
            if !permission_codes.insert(&permission.code) {
                return Err(format!("Duplicate permission code: {}", permission.code));
            }
        }

        let mut role_codes = HashSet::new();
        for role in &self.roles {
            if !role_codes.insert(&role.code) {
                return Err(format!("Duplicate role code: {}", role.code));
            }
            for code in &role.permissions {
                if !permission_codes.contains(code) {
                    return Err(format!(
                        "Role {} references unknown permission: {}",
                        role.code, code
                    ));
                }
            }
        }

        let mut usernames = HashSet::new();
        for user in &self.users {
            if user.password.is_empty() {
                return Err(format!("User {} has an empty password", user.username));
            }
            if !usernames.insert(&user.username) {
                return Err(format!("Duplicate username: {}", user.username));
            }
            for code in &user.roles {
                if !role_codes.contains(code) {
                    return Err(format!(
                        "User {} references unknown role: {}",
                        user.username, code
                    ));
                }
            }
        }

        let mut client_ids = HashSet::new();
        for service in &self.services {
            if service.secret.is_empty() {
                return Err(format!("Service {} has an empty secret", service.client_id));
            }
            if !client_ids.insert(&service.client_id) {
                return Err(format!("Duplicate service client_id: {}", service.client_id));
            }
        }

        let mut policy_ids = HashSet::new();
        for policy in &self.policies {
            if !policy_ids.insert(policy.id) {
                return Err(format!("Duplicate policy id: {}", policy.id));
            }
        }

        Ok(())
    }
}
