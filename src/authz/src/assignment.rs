//! Time-bounded, revocable role assignments

use crate::types::{PrincipalId, RoleId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Binding of a role to a principal for a validity window
///
/// The window is half-open: an assignment is active for
/// `not_before <= now < not_after`, with either bound optional. Revocation
/// is permanent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    principal: PrincipalId,
    role: RoleId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    not_before: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    not_after: Option<DateTime<Utc>>,
    #[serde(default)]
    revoked: bool,
}

impl Assignment {
    /// Unbounded, non-revoked assignment
    pub fn new(principal: PrincipalId, role: RoleId) -> Self {
        Self {
            principal,
            role,
            not_before: None,
            not_after: None,
            revoked: false,
        }
    }

    /// Set the earliest instant at which the assignment is active
    pub fn not_before(mut self, at: DateTime<Utc>) -> Self {
        self.not_before = Some(at);
        self
    }

    /// Set the instant from which the assignment is no longer active
    pub fn not_after(mut self, at: DateTime<Utc>) -> Self {
        self.not_after = Some(at);
        self
    }

    /// Set both bounds of the validity window
    pub fn with_window(
        mut self,
        not_before: Option<DateTime<Utc>>,
        not_after: Option<DateTime<Utc>>,
    ) -> Self {
        self.not_before = not_before;
        self.not_after = not_after;
        self
    }

    pub fn principal(&self) -> &PrincipalId {
        &self.principal
    }

    pub fn role(&self) -> &RoleId {
        &self.role
    }

    pub fn valid_from(&self) -> Option<DateTime<Utc>> {
        self.not_before
    }

    pub fn valid_until(&self) -> Option<DateTime<Utc>> {
        self.not_after
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked
    }

    /// Revoke the assignment. Idempotent.
    pub fn revoke(&mut self) {
        self.revoked = true;
    }

    /// Whether this assignment binds the given principal to the given role
    pub fn binds(&self, principal: &PrincipalId, role: &RoleId) -> bool {
        self.principal == *principal && self.role == *role
    }

    /// Check whether the assignment is active at `now`
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        let started = self.not_before.map_or(true, |nb| now >= nb);
        let not_expired = self.not_after.map_or(true, |na| now < na);

        !self.revoked && started && not_expired
    }
}
