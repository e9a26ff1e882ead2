//! RBAC type definitions

use uuid::Uuid;

/// Role definition
#[derive(Debug, Clone, PartialEq)]
pub struct Role {
    pub id: Uuid,
    /// Unique machine-readable code, e.g. "auditor"
    pub code: String,
    pub name: String,
    /// Permissions granted by this role
    pub permission_ids: Vec<Uuid>,
}

/// Permission definition
///
/// An atomic capability unit; never composed of other permissions. Codes
/// may be colon-structured ("reports:read") to allow wildcard grants.
#[derive(Debug, Clone, PartialEq)]
pub struct Permission {
    pub id: Uuid,
    /// Unique machine-readable code
    pub code: String,
    pub name: String,
}
