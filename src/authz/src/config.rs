//! Engine configuration and declarative authorization documents

use crate::assignment::Assignment;
use crate::builder::AuthorizationBuilder;
use crate::cel::CelCompiler;
use crate::error::{AuthzError, Result};
use crate::role::{PermissionGrant, Role};
use crate::types::{PermissionId, RoleId, ScopeBag};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Authorization engine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fetch the roles of all active assignments concurrently before
    /// scanning grants. Decisions match sequential lookup unless a role
    /// lookup fails, which then fails the evaluation even if an earlier
    /// role would have decided it.
    pub parallel_role_lookup: bool,
}

/// Grant entry of a role document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrantConfig {
    /// `resource:action`, either component may be `*`
    pub permission: String,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub scope: HashMap<String, String>,

    /// CEL expression over `attributes`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

/// Role entry of an authorization document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleConfig {
    pub id: String,

    /// Display name, defaults to the id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub grants: Vec<GrantConfig>,
}

/// Declarative authorization document
///
/// ```json
/// {
///   "engine": { "parallel_role_lookup": false },
///   "roles": [
///     { "id": "role:approver",
///       "grants": [{ "permission": "invoice:approve",
///                    "scope": { "tenant": "acme" },
///                    "condition": "attributes.amount < 10000" }] }
///   ],
///   "assignments": [
///     { "principal": "user:42", "role": "role:approver",
///       "not_after": "2027-01-01T00:00:00Z" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizationConfig {
    pub engine: EngineConfig,
    pub roles: Vec<RoleConfig>,
    pub assignments: Vec<Assignment>,
}

impl AuthorizationConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON document from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading authorization config from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Check structural constraints the JSON schema cannot express
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for role in &self.roles {
            if role.id.trim().is_empty() {
                return Err(AuthzError::InvalidConfig("role id must not be empty".to_string()));
            }
            if !seen.insert(role.id.as_str()) {
                return Err(AuthzError::InvalidConfig(format!(
                    "duplicate role id: {}",
                    role.id
                )));
            }
            for grant in &role.grants {
                PermissionId::parse(&grant.permission).map_err(|e| {
                    AuthzError::InvalidConfig(format!("role {}: {}", role.id, e))
                })?;
            }
        }

        for assignment in &self.assignments {
            if assignment.principal().as_str().trim().is_empty()
                || assignment.role().as_str().trim().is_empty()
            {
                return Err(AuthzError::InvalidConfig(
                    "assignment principal and role must not be empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Compile the document into a builder
    ///
    /// CEL conditions are compiled here; a malformed expression fails with
    /// `AuthzError::InvalidCondition`.
    pub fn into_builder(self) -> Result<AuthorizationBuilder> {
        self.validate()?;

        let compiler = CelCompiler::new();
        let mut builder = AuthorizationBuilder::new().with_config(self.engine);

        for role in self.roles {
            let grants = role
                .grants
                .into_iter()
                .map(|grant| -> Result<PermissionGrant> {
                    let mut compiled = PermissionGrant::new(PermissionId::parse(&grant.permission)?)
                        .with_scope(ScopeBag::from(grant.scope));
                    if let Some(expression) = grant.condition {
                        compiled = compiled.with_shared_condition(Arc::new(compiler.compile(&expression)?));
                    }
                    Ok(compiled)
                })
                .collect::<Result<Vec<_>>>()?;

            let name = role.name.unwrap_or_else(|| role.id.clone());
            builder = builder.with_role(Role::new(RoleId::new(role.id), name, grants));
        }

        for assignment in self.assignments {
            builder = builder.add_assignment(assignment);
        }

        debug!("Compiled {} distinct CEL conditions", compiler.len());
        Ok(builder)
    }
}
