//! Builder and runtime host integration tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use warden_authz::{
    Assignment, AssignmentStore, AuthorizationBuilder, AuthzError, DenyReason,
    InMemoryAssignmentStore, InMemoryRoleStore, PermissionGrant, PermissionId, PrincipalId,
    Result, Role, RoleId, RoleStore,
};

fn user(id: &str) -> PrincipalId {
    PrincipalId::new(id)
}

/// Read-only role store over a fixed map
struct StaticRoleStore {
    roles: HashMap<RoleId, Arc<Role>>,
}

impl StaticRoleStore {
    fn with(roles: Vec<Role>) -> Self {
        Self {
            roles: roles
                .into_iter()
                .map(|role| (role.id().clone(), Arc::new(role)))
                .collect(),
        }
    }
}

#[async_trait]
impl RoleStore for StaticRoleStore {
    async fn get_role(&self, id: &RoleId) -> Result<Option<Arc<Role>>> {
        Ok(self.roles.get(id).cloned())
    }
}

/// Read-only assignment store over a fixed list
struct StaticAssignmentStore {
    assignments: Vec<Assignment>,
}

#[async_trait]
impl AssignmentStore for StaticAssignmentStore {
    async fn assignments_for_principal(&self, principal: &PrincipalId) -> Result<Vec<Assignment>> {
        Ok(self
            .assignments
            .iter()
            .filter(|a| a.principal() == principal)
            .cloned()
            .collect())
    }
}

// ============================================================================
// RUNTIME MANAGEMENT
// ============================================================================

#[tokio::test]
async fn test_runtime_add_and_revoke() {
    let host = AuthorizationBuilder::new().build().await.unwrap();

    let before = host
        .for_principal(user("user:7"))
        .try_on("ticket:close")
        .unwrap()
        .evaluate()
        .await
        .unwrap();
    assert_eq!(before.deny_reason(), DenyReason::NoAssignments);

    host.add_role(Role::new(
        RoleId::new("role:support"),
        "Support",
        vec![PermissionGrant::new(PermissionId::new("ticket", "*"))],
    ))
    .await
    .unwrap();
    host.add_assignment(Assignment::new(user("user:7"), RoleId::new("role:support")))
        .await
        .unwrap();

    let granted = host
        .for_principal(user("user:7"))
        .try_on("ticket:close")
        .unwrap()
        .evaluate()
        .await
        .unwrap();
    assert!(granted.is_allowed());

    host.revoke(&user("user:7"), &RoleId::new("role:support"))
        .await
        .unwrap();

    let revoked = host
        .for_principal(user("user:7"))
        .try_on("ticket:close")
        .unwrap()
        .evaluate()
        .await
        .unwrap();
    assert_eq!(revoked.deny_reason(), DenyReason::AssignmentNotActive);
}

#[tokio::test]
async fn test_revoke_leaves_duplicate_assignment_active() {
    let host = AuthorizationBuilder::new()
        .add_role("role:r", |r| r.grant("doc:read"))
        .assign("user:1", "role:r")
        .assign("user:1", "role:r")
        .revoke("user:1", "role:r")
        .build()
        .await
        .unwrap();

    let decision = host
        .for_principal(user("user:1"))
        .try_on("doc:read")
        .unwrap()
        .evaluate()
        .await
        .unwrap();
    assert!(decision.is_allowed());
    assert_eq!(decision.matched_role(), Some(&RoleId::new("role:r")));
}

#[tokio::test]
async fn test_revoke_is_idempotent() {
    let host = AuthorizationBuilder::new()
        .add_role("role:a", |r| r.grant("a:b"))
        .assign("user:1", "role:a")
        .build()
        .await
        .unwrap();

    host.revoke(&user("user:1"), &RoleId::new("role:a")).await.unwrap();
    host.revoke(&user("user:1"), &RoleId::new("role:a")).await.unwrap();
    host.revoke(&user("user:404"), &RoleId::new("role:none")).await.unwrap();
}

#[tokio::test]
async fn test_reassignment_after_revoke() {
    let host = AuthorizationBuilder::new()
        .add_role("role:a", |r| r.grant("a:b"))
        .assign("user:1", "role:a")
        .revoke("user:1", "role:a")
        .build()
        .await
        .unwrap();

    host.add_assignment(Assignment::new(user("user:1"), RoleId::new("role:a")))
        .await
        .unwrap();

    let decision = host
        .for_principal(user("user:1"))
        .try_on("a:b")
        .unwrap()
        .evaluate()
        .await
        .unwrap();
    assert!(decision.is_allowed());
}

#[tokio::test]
async fn test_role_replacement_is_visible() {
    let host = AuthorizationBuilder::new()
        .add_role("role:a", |r| r.grant("doc:read"))
        .assign("user:1", "role:a")
        .build()
        .await
        .unwrap();

    host.add_role(Role::new(
        RoleId::new("role:a"),
        "A",
        vec![PermissionGrant::new(PermissionId::new("doc", "write"))],
    ))
    .await
    .unwrap();

    let read = host
        .for_principal(user("user:1"))
        .try_on("doc:read")
        .unwrap()
        .evaluate()
        .await
        .unwrap();
    assert_eq!(read.deny_reason(), DenyReason::NoMatchingPermission);
}

// ============================================================================
// CUSTOM STORES
// ============================================================================

#[tokio::test]
async fn test_custom_stores_are_used() {
    let roles = StaticRoleStore::with(vec![Role::new(
        RoleId::new("role:auditor"),
        "Auditor",
        vec![PermissionGrant::new(PermissionId::new("*", "read"))],
    )]);
    let assignments = StaticAssignmentStore {
        assignments: vec![Assignment::new(user("user:1"), RoleId::new("role:auditor"))],
    };

    let host = AuthorizationBuilder::new()
        .use_role_store(Arc::new(roles))
        .use_assignment_store(Arc::new(assignments))
        .build()
        .await
        .unwrap();

    let decision = host
        .for_principal(user("user:1"))
        .try_on("ledger:read")
        .unwrap()
        .evaluate()
        .await
        .unwrap();
    assert!(decision.is_allowed());
}

#[tokio::test]
async fn test_pending_roles_against_read_only_store_fail() {
    let result = AuthorizationBuilder::new()
        .use_role_store(Arc::new(StaticRoleStore::with(vec![])))
        .add_role("role:a", |r| r.grant("a:b"))
        .build()
        .await;

    assert!(matches!(result, Err(AuthzError::UnsupportedOperation(_))));
}

#[tokio::test]
async fn test_pending_assignments_against_read_only_store_fail() {
    let result = AuthorizationBuilder::new()
        .use_assignment_store(Arc::new(StaticAssignmentStore { assignments: vec![] }))
        .assign("user:1", "role:a")
        .build()
        .await;

    assert!(matches!(result, Err(AuthzError::UnsupportedOperation(_))));
}

#[tokio::test]
async fn test_runtime_management_on_read_only_stores_fails() {
    let host = AuthorizationBuilder::new()
        .use_role_store(Arc::new(StaticRoleStore::with(vec![])))
        .use_assignment_store(Arc::new(StaticAssignmentStore { assignments: vec![] }))
        .build()
        .await
        .unwrap();

    let add_role = host
        .add_role(Role::new(RoleId::new("role:a"), "A", vec![]))
        .await;
    let add_assignment = host
        .add_assignment(Assignment::new(user("user:1"), RoleId::new("role:a")))
        .await;
    let revoke = host.revoke(&user("user:1"), &RoleId::new("role:a")).await;

    assert!(matches!(add_role, Err(AuthzError::UnsupportedOperation(_))));
    assert!(matches!(add_assignment, Err(AuthzError::UnsupportedOperation(_))));
    assert!(matches!(revoke, Err(AuthzError::UnsupportedOperation(_))));
}

#[tokio::test]
async fn test_shared_in_memory_stores() {
    let roles = InMemoryRoleStore::new();
    let assignments = InMemoryAssignmentStore::new();

    let host = AuthorizationBuilder::new()
        .use_role_store(Arc::new(roles.clone()))
        .use_assignment_store(Arc::new(assignments.clone()))
        .add_role("role:a", |r| r.grant("a:b"))
        .assign("user:1", "role:a")
        .build()
        .await
        .unwrap();

    assert!(roles.contains(&RoleId::new("role:a")));
    assert_eq!(assignments.len().await, 1);

    assignments.revoke(&user("user:1"), &RoleId::new("role:a")).await.unwrap();
    let decision = host
        .for_principal(user("user:1"))
        .try_on("a:b")
        .unwrap()
        .evaluate()
        .await
        .unwrap();
    assert_eq!(decision.deny_reason(), DenyReason::AssignmentNotActive);
}
