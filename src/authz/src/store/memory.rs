//! In-memory reference stores
//!
//! Synchronization:
//! - roles live in a `DashMap` (sharded locks); lookups clone the `Arc<Role>`
//! - assignments live behind a `tokio::sync::RwLock`; reads return cloned
//!   snapshots so no caller enumerates while a writer mutates

use super::{AssignmentStore, RoleStore};
use crate::assignment::Assignment;
use crate::error::Result;
use crate::role::Role;
use crate::types::{PrincipalId, RoleId};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory role store
#[derive(Debug, Clone, Default)]
pub struct InMemoryRoleStore {
    roles: Arc<DashMap<RoleId, Arc<Role>>>,
}

impl InMemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored roles
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn contains(&self, id: &RoleId) -> bool {
        self.roles.contains_key(id)
    }
}

#[async_trait]
impl RoleStore for InMemoryRoleStore {
    async fn get_role(&self, id: &RoleId) -> Result<Option<Arc<Role>>> {
        Ok(self.roles.get(id).map(|entry| Arc::clone(entry.value())))
    }

    async fn add_role(&self, role: Role) -> Result<()> {
        debug!("Storing role {} ({} grants)", role.id(), role.grants().len());
        self.roles.insert(role.id().clone(), Arc::new(role));
        Ok(())
    }
}

/// In-memory assignment store preserving insertion order
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssignmentStore {
    assignments: Arc<RwLock<Vec<Assignment>>>,
}

impl InMemoryAssignmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored assignments, revoked ones included
    pub async fn len(&self) -> usize {
        self.assignments.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.assignments.read().await.is_empty()
    }
}

#[async_trait]
impl AssignmentStore for InMemoryAssignmentStore {
    async fn assignments_for_principal(&self, principal: &PrincipalId) -> Result<Vec<Assignment>> {
        let assignments = self.assignments.read().await;
        Ok(assignments
            .iter()
            .filter(|a| a.principal() == principal)
            .cloned()
            .collect())
    }

    async fn add_assignment(&self, assignment: Assignment) -> Result<()> {
        debug!(
            "Assigning role {} to principal {}",
            assignment.role(),
            assignment.principal()
        );
        self.assignments.write().await.push(assignment);
        Ok(())
    }

    async fn revoke(&self, principal: &PrincipalId, role: &RoleId) -> Result<()> {
        let mut assignments = self.assignments.write().await;
        match assignments.iter_mut().find(|a| a.binds(principal, role)) {
            Some(assignment) => {
                assignment.revoke();
                debug!("Revoked role {} for principal {}", role, principal);
            }
            None => debug!("No assignment of role {} to principal {} to revoke", role, principal),
        }
        Ok(())
    }
}
