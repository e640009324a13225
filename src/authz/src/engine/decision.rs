//! Authorization decision types

use crate::types::{PermissionId, RoleId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason for a denied decision
///
/// `None` is reserved for allowed decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// Decision was allowed
    #[default]
    None,

    /// Principal has no assignments at all
    NoAssignments,

    /// No grant of any active role covers the permission
    NoMatchingPermission,

    /// A grant covers the permission but not in the requested scope
    ScopeMismatch,

    /// Principal has assignments but none is active now
    AssignmentNotActive,

    /// The governing grant's condition returned false or faulted
    AttributeEvaluationFailed,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::None => "none",
            Self::NoAssignments => "no_assignments",
            Self::NoMatchingPermission => "no_matching_permission",
            Self::ScopeMismatch => "scope_mismatch",
            Self::AssignmentNotActive => "assignment_not_active",
            Self::AttributeEvaluationFailed => "attribute_evaluation_failed",
        };
        f.write_str(text)
    }
}

/// Authorization decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationDecision {
    allowed: bool,
    deny_reason: DenyReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    matched_role: Option<RoleId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    matched_permission: Option<PermissionId>,
}

impl AuthorizationDecision {
    /// Allow decision naming the role and the granted permission that matched
    pub(crate) fn allow(role: RoleId, permission: PermissionId) -> Self {
        Self {
            allowed: true,
            deny_reason: DenyReason::None,
            matched_role: Some(role),
            matched_permission: Some(permission),
        }
    }

    /// Deny decision; `reason` is never `DenyReason::None`
    pub(crate) fn deny(reason: DenyReason) -> Self {
        debug_assert_ne!(reason, DenyReason::None, "deny requires a reason");
        Self {
            allowed: false,
            deny_reason: reason,
            matched_role: None,
            matched_permission: None,
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    pub fn deny_reason(&self) -> DenyReason {
        self.deny_reason
    }

    pub fn matched_role(&self) -> Option<&RoleId> {
        self.matched_role.as_ref()
    }

    pub fn matched_permission(&self) -> Option<&PermissionId> {
        self.matched_permission.as_ref()
    }
}

impl fmt::Display for AuthorizationDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.matched_role, &self.matched_permission) {
            (Some(role), Some(permission)) if self.allowed => {
                write!(f, "ALLOW via {} ({})", role, permission)
            }
            _ => write!(f, "DENY ({})", self.deny_reason),
        }
    }
}
