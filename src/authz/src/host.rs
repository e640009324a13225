//! Authorization host: a built engine plus runtime management of its stores

use crate::assignment::Assignment;
use crate::engine::{AuthorizationCheck, AuthorizationEngine};
use crate::error::Result;
use crate::role::Role;
use crate::store::{AssignmentStore, RoleStore};
use crate::types::{PrincipalId, RoleId};
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Shared handle to an engine and the stores it reads
///
/// Cloning is cheap. Changes made through the host are visible to the
/// next evaluation; evaluations already running keep the snapshot they read.
#[derive(Clone)]
pub struct AuthorizationHost {
    engine: Arc<AuthorizationEngine>,
    role_store: Arc<dyn RoleStore>,
    assignment_store: Arc<dyn AssignmentStore>,
}

impl AuthorizationHost {
    pub(crate) fn new(
        engine: Arc<AuthorizationEngine>,
        role_store: Arc<dyn RoleStore>,
        assignment_store: Arc<dyn AssignmentStore>,
    ) -> Self {
        Self {
            engine,
            role_store,
            assignment_store,
        }
    }

    pub fn engine(&self) -> &Arc<AuthorizationEngine> {
        &self.engine
    }

    /// Shorthand for `engine().for_principal(..)`
    pub fn for_principal(&self, principal: PrincipalId) -> AuthorizationCheck<'_> {
        self.engine.for_principal(principal)
    }

    /// Add or replace a role
    pub async fn add_role(&self, role: Role) -> Result<()> {
        info!("Adding role: {}", role.id());
        self.role_store.add_role(role).await
    }

    pub async fn add_assignment(&self, assignment: Assignment) -> Result<()> {
        info!(
            "Adding assignment: {} -> {}",
            assignment.principal(),
            assignment.role()
        );
        self.assignment_store.add_assignment(assignment).await
    }

    /// Revoke the first assignment binding `principal` to `role`
    pub async fn revoke(&self, principal: &PrincipalId, role: &RoleId) -> Result<()> {
        info!("Revoking role {} for {}", role, principal);
        self.assignment_store.revoke(principal, role).await
    }
}

impl fmt::Debug for AuthorizationHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationHost")
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}
