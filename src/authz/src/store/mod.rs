//! Role and assignment storage interfaces
//!
//! The engine only ever reads through [`RoleStore::get_role`] and
//! [`AssignmentStore::assignments_for_principal`]. The management methods
//! exist for the runtime host; their default implementations fail with
//! [`AuthzError::UnsupportedOperation`] so custom stores never silently
//! drop writes.

mod memory;

pub use memory::{InMemoryAssignmentStore, InMemoryRoleStore};

use crate::assignment::Assignment;
use crate::error::{AuthzError, Result};
use crate::role::Role;
use crate::types::{PrincipalId, RoleId};
use async_trait::async_trait;
use std::sync::Arc;

/// Role lookup by id
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Get a role by id; `Ok(None)` when the role is unknown
    async fn get_role(&self, id: &RoleId) -> Result<Option<Arc<Role>>>;

    /// Store a role, replacing any role with the same id
    async fn add_role(&self, _role: Role) -> Result<()> {
        Err(AuthzError::UnsupportedOperation(
            "add_role is only supported by InMemoryRoleStore".to_string(),
        ))
    }
}

/// Assignment lookup by principal
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// All assignments for a principal, in store order (possibly empty)
    async fn assignments_for_principal(&self, principal: &PrincipalId) -> Result<Vec<Assignment>>;

    /// Append an assignment
    async fn add_assignment(&self, _assignment: Assignment) -> Result<()> {
        Err(AuthzError::UnsupportedOperation(
            "add_assignment is only supported by InMemoryAssignmentStore".to_string(),
        ))
    }

    /// Revoke the first assignment binding `principal` to `role`; a no-op
    /// when none exists
    async fn revoke(&self, _principal: &PrincipalId, _role: &RoleId) -> Result<()> {
        Err(AuthzError::UnsupportedOperation(
            "revoke is only supported by InMemoryAssignmentStore".to_string(),
        ))
    }
}
