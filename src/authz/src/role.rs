//! Roles and the permission grants they bundle

use crate::condition::{Condition, ConditionResult};
use crate::types::{AttributeBag, PermissionId, RoleId, ScopeBag};
use std::sync::Arc;

/// One permission offered by a role, optionally narrowed by scope and condition
#[derive(Debug, Clone)]
pub struct PermissionGrant {
    permission: PermissionId,
    scope: ScopeBag,
    condition: Option<Arc<dyn Condition>>,
}

impl PermissionGrant {
    /// Unscoped, unconditional grant
    pub fn new(permission: PermissionId) -> Self {
        Self {
            permission,
            scope: ScopeBag::new(),
            condition: None,
        }
    }

    /// Restrict the grant to requests carrying this scope
    pub fn with_scope(mut self, scope: ScopeBag) -> Self {
        self.scope = scope;
        self
    }

    /// Attach an ABAC condition
    pub fn with_condition(mut self, condition: impl Condition + 'static) -> Self {
        self.condition = Some(Arc::new(condition));
        self
    }

    /// Attach an already shared ABAC condition
    pub fn with_shared_condition(mut self, condition: Arc<dyn Condition>) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn permission(&self) -> &PermissionId {
        &self.permission
    }

    pub fn scope(&self) -> &ScopeBag {
        &self.scope
    }

    pub fn condition(&self) -> Option<&dyn Condition> {
        self.condition.as_deref()
    }

    /// Structural match: permission and scope both hold
    pub fn applies_to(&self, permission: &PermissionId, scope: &ScopeBag) -> bool {
        self.permission.matches(permission) && self.scope.is_satisfied_by(scope)
    }

    /// Evaluate the condition, treating an absent condition as satisfied
    pub fn evaluate_condition(&self, attributes: &AttributeBag) -> ConditionResult {
        match &self.condition {
            Some(condition) => condition.evaluate(attributes),
            None => Ok(true),
        }
    }
}

/// Named, reusable bundle of grants
///
/// Grant order is significant: the engine commits to the first grant that
/// structurally matches a request.
#[derive(Debug, Clone)]
pub struct Role {
    id: RoleId,
    name: String,
    grants: Vec<PermissionGrant>,
}

impl Role {
    pub fn new(id: RoleId, name: impl Into<String>, grants: Vec<PermissionGrant>) -> Self {
        Self {
            id,
            name: name.into(),
            grants,
        }
    }

    pub fn id(&self) -> &RoleId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grants(&self) -> &[PermissionGrant] {
        &self.grants
    }

    /// Whether any grant covers the permission, ignoring scope and condition
    pub fn grants_permission(&self, permission: &PermissionId) -> bool {
        self.grants.iter().any(|g| g.permission.matches(permission))
    }
}
