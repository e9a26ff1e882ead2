//! Policy data model

use super::pattern::PathPattern;
use serde::{Deserialize, Serialize};

/// Permission combination mode for policies carrying several codes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionMode {
    /// Any one of the required permissions grants access
    #[default]
    Any,
    /// Every required permission must be held
    All,
}

/// HTTP method filter carried as policy metadata
///
/// `None` means the policy applies to every method. The filter is an exact
/// membership test applied before pattern matching; it is not part of the
/// path pattern itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MethodFilter(Option<Vec<String>>);

impl MethodFilter {
    /// Filter that lets every method through
    pub fn all() -> Self {
        Self(None)
    }

    /// Filter restricted to the given methods
    pub fn only<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(Some(
            methods
                .into_iter()
                .map(|m| m.into().to_ascii_uppercase())
                .collect(),
        ))
    }

    pub fn allows(&self, method: &str) -> bool {
        match &self.0 {
            None => true,
            Some(methods) => methods.iter().any(|m| m.eq_ignore_ascii_case(method)),
        }
    }
}

/// An access policy binding a path pattern to auth requirements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub id: u64,
    pub name: String,
    pub pattern: PathPattern,
    /// Higher priority wins when several policies match a path
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub methods: MethodFilter,
    /// Whether the caller must present a valid bearer token
    #[serde(default = "default_true")]
    pub auth_required: bool,
    /// Whether the caller must be an authenticated service
    #[serde(default)]
    pub s2s_required: bool,
    #[serde(default)]
    pub permission_mode: PermissionMode,
    /// Permission codes required on top of authentication
    #[serde(default)]
    pub required_permissions: Vec<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_true() -> bool {
    true
}
