//! Authorization requests and the fluent check surface

use super::decision::AuthorizationDecision;
use super::AuthorizationEngine;
use crate::error::Result;
use crate::types::{AttributeBag, PermissionId, PrincipalId, ScopeBag};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Authorization request: principal, permission, scope and attributes
///
/// The permission is optional here so a request can be assembled
/// incrementally; evaluating without one is a usage error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationRequest {
    /// Who is asking
    pub principal: PrincipalId,

    /// What they want to do
    #[serde(default)]
    pub permission: Option<PermissionId>,

    /// Where (tenant, project, ...)
    #[serde(default)]
    pub scope: ScopeBag,

    /// Runtime facts for ABAC conditions
    #[serde(default)]
    pub attributes: AttributeBag,
}

impl AuthorizationRequest {
    pub fn new(principal: PrincipalId) -> Self {
        Self {
            principal,
            permission: None,
            scope: ScopeBag::new(),
            attributes: AttributeBag::new(),
        }
    }

    pub fn with_permission(mut self, permission: PermissionId) -> Self {
        self.permission = Some(permission);
        self
    }

    pub fn with_scope(mut self, scope: ScopeBag) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_attributes(mut self, attributes: AttributeBag) -> Self {
        self.attributes = attributes;
        self
    }
}

/// Fluent authorization check bound to an engine
///
/// ```
/// # use warden_authz::{AuthorizationBuilder, PermissionId, PrincipalId, DenyReason};
/// # async fn example() -> warden_authz::Result<()> {
/// let host = AuthorizationBuilder::new()
///     .add_role("role:reader", |r| r.grant("invoice:read"))
///     .assign("user:42", "role:reader")
///     .build()
///     .await?;
///
/// let decision = host
///     .engine()
///     .for_principal(PrincipalId::new("user:42"))
///     .try_on("invoice:delete")?
///     .evaluate()
///     .await?;
///
/// assert_eq!(decision.deny_reason(), DenyReason::NoMatchingPermission);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
#[must_use = "an authorization check does nothing until evaluated"]
pub struct AuthorizationCheck<'a> {
    engine: &'a AuthorizationEngine,
    request: AuthorizationRequest,
}

impl<'a> AuthorizationCheck<'a> {
    pub(crate) fn new(engine: &'a AuthorizationEngine, principal: PrincipalId) -> Self {
        Self {
            engine,
            request: AuthorizationRequest::new(principal),
        }
    }

    /// Permission being requested
    pub fn on(mut self, permission: PermissionId) -> Self {
        self.request.permission = Some(permission);
        self
    }

    /// Permission being requested, parsed from `resource:action` form
    pub fn try_on(self, permission: &str) -> Result<Self> {
        Ok(self.on(PermissionId::parse(permission)?))
    }

    /// Context the request is made in; defaults to the empty scope
    pub fn in_scope(mut self, scope: ScopeBag) -> Self {
        self.request.scope = scope;
        self
    }

    /// Runtime attributes for conditions; defaults to the empty bag
    pub fn with_attributes(mut self, attributes: AttributeBag) -> Self {
        self.request.attributes = attributes;
        self
    }

    pub fn request(&self) -> &AuthorizationRequest {
        &self.request
    }

    pub fn into_request(self) -> AuthorizationRequest {
        self.request
    }

    /// Evaluate the check
    pub async fn evaluate(self) -> Result<AuthorizationDecision> {
        self.engine.evaluate(&self.request).await
    }

    /// Evaluate the check, giving up with `AuthzError::Cancelled` once the
    /// token is cancelled
    pub async fn evaluate_with_cancellation(
        self,
        token: &CancellationToken,
    ) -> Result<AuthorizationDecision> {
        self.engine
            .evaluate_with_cancellation(&self.request, token)
            .await
    }
}
