//! Decision engine
//!
//! Combines assignment validity, permission matching, scope matching and
//! ABAC conditions into a single evaluation pass.
//!
//! # Pipeline
//!
//! ```text
//! Request → AssignmentStore → validity filter → RoleStore → grant scan → Decision
//!              ↓ (empty)          ↓ (none active)             ↓ (no structural match)
//!        NoAssignments    AssignmentNotActive      ScopeMismatch / NoMatchingPermission
//! ```
//!
//! The first grant that matches both permission and scope governs the
//! outcome. If its condition is false or faults the evaluation ends with
//! `AttributeEvaluationFailed`; later grants and roles are not consulted.

pub mod decision;
pub mod request;

pub use decision::{AuthorizationDecision, DenyReason};
pub use request::{AuthorizationCheck, AuthorizationRequest};

use crate::assignment::Assignment;
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::{AuthzError, Result};
use crate::role::Role;
use crate::store::{AssignmentStore, RoleStore};
use crate::types::{PermissionId, PrincipalId};

use futures::future::try_join_all;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Authorization engine
///
/// Stateless between evaluations; share it behind an `Arc` and evaluate
/// concurrently as long as the stores tolerate concurrent reads.
#[derive(Clone)]
pub struct AuthorizationEngine {
    role_store: Arc<dyn RoleStore>,
    assignment_store: Arc<dyn AssignmentStore>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
}

impl AuthorizationEngine {
    /// Create an engine over the given stores with the system clock and
    /// default configuration
    pub fn new(role_store: Arc<dyn RoleStore>, assignment_store: Arc<dyn AssignmentStore>) -> Self {
        Self {
            role_store,
            assignment_store,
            clock: Arc::new(SystemClock),
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Start a fluent check for a principal
    pub fn for_principal(&self, principal: PrincipalId) -> AuthorizationCheck<'_> {
        AuthorizationCheck::new(self, principal)
    }

    /// Evaluate a request
    ///
    /// Every deny is returned as `Ok`; errors are usage faults (missing
    /// permission) or faults raised by the stores.
    pub async fn evaluate(&self, request: &AuthorizationRequest) -> Result<AuthorizationDecision> {
        let permission = request
            .permission
            .as_ref()
            .ok_or(AuthzError::PermissionNotSpecified)?;

        debug!(
            "Authorization request: principal={}, permission={}",
            request.principal, permission
        );

        let assignments = self
            .assignment_store
            .assignments_for_principal(&request.principal)
            .await?;

        if assignments.is_empty() {
            return Ok(self.finalize(request, AuthorizationDecision::deny(DenyReason::NoAssignments)));
        }

        let now = self.clock.now();
        let active: Vec<&Assignment> = assignments.iter().filter(|a| a.is_active_at(now)).collect();

        if active.is_empty() {
            return Ok(self.finalize(
                request,
                AuthorizationDecision::deny(DenyReason::AssignmentNotActive),
            ));
        }

        trace!("{} of {} assignments active", active.len(), assignments.len());

        let mut permission_granted = false;

        if self.config.parallel_role_lookup {
            for role in self.resolve_all_roles(&active).await?.into_iter().flatten() {
                if let Some(decision) = scan_role(&role, request, permission, &mut permission_granted) {
                    return Ok(self.finalize(request, decision));
                }
            }
        } else {
            for assignment in &active {
                let Some(role) = self.role_store.get_role(assignment.role()).await? else {
                    trace!("Role {} not found, skipping assignment", assignment.role());
                    continue;
                };
                if let Some(decision) = scan_role(&role, request, permission, &mut permission_granted) {
                    return Ok(self.finalize(request, decision));
                }
            }
        }

        let reason = if permission_granted {
            DenyReason::ScopeMismatch
        } else {
            DenyReason::NoMatchingPermission
        };

        Ok(self.finalize(request, AuthorizationDecision::deny(reason)))
    }

    /// Evaluate a request, returning `AuthzError::Cancelled` as soon as the
    /// token fires
    pub async fn evaluate_with_cancellation(
        &self,
        request: &AuthorizationRequest,
        token: &CancellationToken,
    ) -> Result<AuthorizationDecision> {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!("Authorization evaluation cancelled for {}", request.principal);
                Err(AuthzError::Cancelled)
            }
            result = self.evaluate(request) => result,
        }
    }

    /// Look up the roles of all active assignments concurrently, in
    /// assignment order
    ///
    /// Every lookup is issued before any grant is scanned, so a store fault
    /// on any assignment fails the evaluation even when an earlier role
    /// would have allowed it.
    async fn resolve_all_roles(&self, active: &[&Assignment]) -> Result<Vec<Option<Arc<Role>>>> {
        try_join_all(active.iter().map(|a| self.role_store.get_role(a.role()))).await
    }

    fn finalize(
        &self,
        request: &AuthorizationRequest,
        decision: AuthorizationDecision,
    ) -> AuthorizationDecision {
        debug!("Decision for {}: {}", request.principal, decision);
        decision
    }
}

/// Scan a role's grants in order
///
/// Returns the decision of the first grant matching both permission and
/// scope. `permission_granted` records whether any grant covered the
/// permission regardless of scope.
fn scan_role(
    role: &Role,
    request: &AuthorizationRequest,
    permission: &PermissionId,
    permission_granted: &mut bool,
) -> Option<AuthorizationDecision> {
    for grant in role.grants() {
        if !grant.permission().matches(permission) {
            continue;
        }
        *permission_granted = true;

        if !grant.scope().is_satisfied_by(&request.scope) {
            continue;
        }

        return Some(match grant.evaluate_condition(&request.attributes) {
            Ok(true) => AuthorizationDecision::allow(role.id().clone(), grant.permission().clone()),
            Ok(false) | Err(_) => AuthorizationDecision::deny(DenyReason::AttributeEvaluationFailed),
        });
    }
    None
}

impl fmt::Debug for AuthorizationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
