//! Fluent construction of an authorization host

use crate::assignment::Assignment;
use crate::clock::Clock;
use crate::condition::Condition;
use crate::config::EngineConfig;
use crate::engine::AuthorizationEngine;
use crate::error::Result;
use crate::host::AuthorizationHost;
use crate::role::{PermissionGrant, Role};
use crate::store::{AssignmentStore, InMemoryAssignmentStore, InMemoryRoleStore, RoleStore};
use crate::types::{PermissionId, PrincipalId, RoleId, ScopeBag};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

/// Fluent definition of a single role
///
/// Permission strings are parsed eagerly; the first parse error is
/// reported by [`RoleBuilder::build`].
#[derive(Debug)]
pub struct RoleBuilder {
    id: RoleId,
    name: Option<String>,
    grants: Result<Vec<PermissionGrant>>,
}

impl RoleBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: RoleId::new(id),
            name: None,
            grants: Ok(Vec::new()),
        }
    }

    /// Display name, defaults to the id
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Unscoped, unconditional grant
    pub fn grant(self, permission: &str) -> Self {
        self.grant_with(permission, ScopeBag::new(), None)
    }

    /// Grant limited to requests carrying `scope`
    pub fn grant_in(self, permission: &str, scope: ScopeBag) -> Self {
        self.grant_with(permission, scope, None)
    }

    /// Grant guarded by a condition
    pub fn grant_when(self, permission: &str, condition: impl Condition + 'static) -> Self {
        self.grant_with(permission, ScopeBag::new(), Some(Arc::new(condition)))
    }

    pub fn grant_with(
        mut self,
        permission: &str,
        scope: ScopeBag,
        condition: Option<Arc<dyn Condition>>,
    ) -> Self {
        if self.grants.is_err() {
            return self;
        }

        match PermissionId::parse(permission) {
            Ok(permission) => {
                let mut grant = PermissionGrant::new(permission).with_scope(scope);
                if let Some(condition) = condition {
                    grant = grant.with_shared_condition(condition);
                }
                if let Ok(grants) = &mut self.grants {
                    grants.push(grant);
                }
            }
            Err(e) => self.grants = Err(e),
        }
        self
    }

    pub fn build(self) -> Result<Role> {
        let name = self.name.unwrap_or_else(|| self.id.as_str().to_string());
        Ok(Role::new(self.id, name, self.grants?))
    }
}

/// Builder for an [`AuthorizationHost`]
///
/// Pending roles, assignments and revocations are written to the stores in
/// that order when [`build`](Self::build) runs. Stores default to the
/// in-memory implementations; a custom store receives the pending writes
/// through its management methods and fails the build if it does not
/// support them.
#[derive(Default)]
pub struct AuthorizationBuilder {
    roles: Vec<Result<Role>>,
    assignments: Vec<Assignment>,
    revocations: Vec<(PrincipalId, RoleId)>,
    role_store: Option<Arc<dyn RoleStore>>,
    assignment_store: Option<Arc<dyn AssignmentStore>>,
    clock: Option<Arc<dyn Clock>>,
    config: EngineConfig,
}

impl AuthorizationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a role with a [`RoleBuilder`]
    pub fn add_role<F>(mut self, id: impl Into<String>, define: F) -> Self
    where
        F: FnOnce(RoleBuilder) -> RoleBuilder,
    {
        self.roles.push(define(RoleBuilder::new(id)).build());
        self
    }

    /// Add an already constructed role
    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.push(Ok(role));
        self
    }

    /// Unbounded assignment
    pub fn assign(self, principal: impl Into<String>, role: impl Into<String>) -> Self {
        self.add_assignment(Assignment::new(PrincipalId::new(principal), RoleId::new(role)))
    }

    /// Assignment active on `[not_before, not_after)`
    pub fn assign_between(
        self,
        principal: impl Into<String>,
        role: impl Into<String>,
        not_before: Option<DateTime<Utc>>,
        not_after: Option<DateTime<Utc>>,
    ) -> Self {
        self.add_assignment(
            Assignment::new(PrincipalId::new(principal), RoleId::new(role))
                .with_window(not_before, not_after),
        )
    }

    pub fn add_assignment(mut self, assignment: Assignment) -> Self {
        self.assignments.push(assignment);
        self
    }

    /// Revoke a (principal, role) pair after all assignments are stored
    pub fn revoke(mut self, principal: impl Into<String>, role: impl Into<String>) -> Self {
        self.revocations
            .push((PrincipalId::new(principal), RoleId::new(role)));
        self
    }

    pub fn use_role_store(mut self, store: Arc<dyn RoleStore>) -> Self {
        self.role_store = Some(store);
        self
    }

    pub fn use_assignment_store(mut self, store: Arc<dyn AssignmentStore>) -> Self {
        self.assignment_store = Some(store);
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Write pending definitions and assemble the host
    ///
    /// # Errors
    /// - `InvalidPermission` from a role definition
    /// - `UnsupportedOperation` when a custom store cannot accept pending writes
    pub async fn build(self) -> Result<AuthorizationHost> {
        let role_store: Arc<dyn RoleStore> = match self.role_store {
            Some(store) => store,
            None => Arc::new(InMemoryRoleStore::new()),
        };
        let assignment_store: Arc<dyn AssignmentStore> = match self.assignment_store {
            Some(store) => store,
            None => Arc::new(InMemoryAssignmentStore::new()),
        };

        let role_count = self.roles.len();
        for role in self.roles {
            role_store.add_role(role?).await?;
        }

        let assignment_count = self.assignments.len();
        for assignment in self.assignments {
            assignment_store.add_assignment(assignment).await?;
        }

        for (principal, role) in &self.revocations {
            assignment_store.revoke(principal, role).await?;
        }

        let mut engine = AuthorizationEngine::new(Arc::clone(&role_store), Arc::clone(&assignment_store))
            .with_config(self.config);
        if let Some(clock) = self.clock {
            engine = engine.with_clock(clock);
        }

        info!(
            "Authorization host built: {} roles, {} assignments, {} revocations",
            role_count,
            assignment_count,
            self.revocations.len()
        );

        Ok(AuthorizationHost::new(Arc::new(engine), role_store, assignment_store))
    }
}
