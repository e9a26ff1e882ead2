//! Effective-permission resolution

use crate::core::policy::PermissionMode;
use crate::core::principal::User;
use crate::storage::DirectoryStore;
use crate::utils::error::Result;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Resolves role assignments into permission sets
#[derive(Clone)]
pub struct RbacResolver {
    directory: Arc<dyn DirectoryStore>,
}

impl RbacResolver {
    pub fn new(directory: Arc<dyn DirectoryStore>) -> Self {
        Self { directory }
    }

    /// Union of permission codes across every role assigned to the user
    pub async fn effective_permissions(&self, user: &User) -> Result<HashSet<String>> {
        let roles = self.directory.roles_by_ids(&user.role_ids).await?;

        let mut permission_ids = Vec::new();
        for role in &roles {
            permission_ids.extend(role.permission_ids.iter().copied());
        }

        let permissions = self.directory.permissions_by_ids(&permission_ids).await?;
        let codes: HashSet<String> = permissions.into_iter().map(|p| p.code).collect();

        debug!(
            user = %user.username,
            roles = roles.len(),
            permissions = codes.len(),
            "resolved effective permissions"
        );
        Ok(codes)
    }

    /// Role codes assigned to the user, for introspection responses
    pub async fn role_codes(&self, user: &User) -> Result<Vec<String>> {
        let roles = self.directory.roles_by_ids(&user.role_ids).await?;
        Ok(roles.into_iter().map(|r| r.code).collect())
    }

    /// Whether the user holds a single permission code
    ///
    /// Superusers pass every check without a directory lookup.
    pub async fn has_permission(&self, user: &User, code: &str) -> Result<bool> {
        if user.is_superuser {
            return Ok(true);
        }
        let permissions = self.effective_permissions(user).await?;
        Ok(Self::grants(&permissions, code))
    }

    /// Test a resolved permission set against a policy's requirements
    pub fn check(permissions: &HashSet<String>, required: &[String], mode: PermissionMode) -> bool {
        if required.is_empty() {
            return true;
        }
        match mode {
            PermissionMode::Any => required.iter().any(|code| Self::grants(permissions, code)),
            PermissionMode::All => required.iter().all(|code| Self::grants(permissions, code)),
        }
    }

    /// Membership test with wildcard grants
    ///
    /// A held code grants a required code when equal, when it is the bare
    /// "*", or segment-wise on colon-structured codes where each held
    /// segment is "*" or equal ("reports:*" grants "reports:read").
    fn grants(permissions: &HashSet<String>, code: &str) -> bool {
        if permissions.contains(code) || permissions.contains("*") {
            return true;
        }

        let required_parts: Vec<&str> = code.split(':').collect();
        permissions.iter().any(|held| {
            let held_parts: Vec<&str> = held.split(':').collect();
            held_parts.len() == required_parts.len()
                && held_parts
                    .iter()
                    .zip(&required_parts)
                    .all(|(h, r)| *h == "*" || h == r)
        })
    }
}
