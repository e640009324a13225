//! Core authorization types: identifiers, permissions, scope and attribute bags

use crate::condition::ConditionError;
use crate::error::{AuthzError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Literal wildcard token accepted in either permission component
pub const WILDCARD: &str = "*";

/// Principal (user, service, group) being authorized
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(String);

impl PrincipalId {
    /// Create a principal identifier (e.g., "user:42")
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable name of a role
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(String);

impl RoleId {
    /// Create a role identifier (e.g., "role:reader")
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Permission: an action on a resource
///
/// String form is `resource:action`, split on the **last** colon so the
/// resource may itself be hierarchical (`project:task:read` has resource
/// `project:task`). Bare `*` means every resource and every action.
///
/// # Examples
///
/// ```
/// use warden_authz::PermissionId;
///
/// let granted = PermissionId::parse("invoice:*").unwrap();
/// let requested = PermissionId::parse("invoice:read").unwrap();
/// assert!(granted.matches(&requested));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionId {
    resource: String,
    action: String,
}

impl PermissionId {
    /// Create a permission from its components without grammar validation
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
        }
    }

    /// The `*:*` permission
    pub fn all() -> Self {
        Self::new(WILDCARD, WILDCARD)
    }

    /// Parse a permission string
    ///
    /// Rejects strings without a colon and strings whose resource or action
    /// segment is empty or whitespace.
    pub fn parse(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Err(AuthzError::InvalidPermission(
                "Permission string cannot be empty".to_string(),
            ));
        }

        if s == WILDCARD {
            return Ok(Self::all());
        }

        let Some((resource, action)) = s.rsplit_once(':') else {
            return Err(AuthzError::InvalidPermission(format!(
                "Permission string must contain at least one ':', got: {}",
                s
            )));
        };

        if resource.trim().is_empty() || action.trim().is_empty() {
            return Err(AuthzError::InvalidPermission(format!(
                "Permission string must have non-empty resource and action parts, got: {}",
                s
            )));
        }

        Ok(Self::new(resource, action))
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    /// Whether both components are the wildcard token
    pub fn is_all(&self) -> bool {
        self.resource == WILDCARD && self.action == WILDCARD
    }

    /// Check whether this (granted) permission covers a requested one
    ///
    /// Components are compared independently by exact string equality; only
    /// the literal `*` token bypasses the comparison. There is no prefix or
    /// substring wildcarding of resource text.
    pub fn matches(&self, requested: &PermissionId) -> bool {
        let resource_matches = self.resource == WILDCARD || self.resource == requested.resource;
        let action_matches = self.action == WILDCARD || self.action == requested.action;

        resource_matches && action_matches
    }
}

impl fmt::Display for PermissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_all() {
            return f.write_str(WILDCARD);
        }
        write!(f, "{}:{}", self.resource, self.action)
    }
}

impl FromStr for PermissionId {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PermissionId {
    type Error = AuthzError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<PermissionId> for String {
    fn from(permission: PermissionId) -> Self {
        permission.to_string()
    }
}

/// Context constraints (tenant, project, ...) attached to a grant or request
///
/// An empty bag is unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeBag(HashMap<String, String>);

impl ScopeBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a constraint, builder style
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Check whether a requested scope satisfies this (granted) scope
    ///
    /// Every key of the grant must be present in the request with the same
    /// value. The request may carry additional keys.
    pub fn is_satisfied_by(&self, requested: &ScopeBag) -> bool {
        self.0
            .iter()
            .all(|(key, value)| requested.0.get(key) == Some(value))
    }
}

impl From<HashMap<String, String>> for ScopeBag {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ScopeBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Runtime facts supplied at evaluation time for ABAC conditions
///
/// Reading a missing key through the `require*` accessors yields a
/// [`ConditionError`], never a default value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeBag(HashMap<String, Value>);

impl AttributeBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute, builder style
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Read an attribute that a condition depends on
    pub fn require(&self, key: &str) -> std::result::Result<&Value, ConditionError> {
        self.0
            .get(key)
            .ok_or_else(|| ConditionError::MissingAttribute(key.to_string()))
    }

    pub fn require_str(&self, key: &str) -> std::result::Result<&str, ConditionError> {
        self.require(key)?
            .as_str()
            .ok_or_else(|| ConditionError::type_mismatch(key, "string"))
    }

    pub fn require_bool(&self, key: &str) -> std::result::Result<bool, ConditionError> {
        self.require(key)?
            .as_bool()
            .ok_or_else(|| ConditionError::type_mismatch(key, "bool"))
    }

    pub fn require_i64(&self, key: &str) -> std::result::Result<i64, ConditionError> {
        self.require(key)?
            .as_i64()
            .ok_or_else(|| ConditionError::type_mismatch(key, "integer"))
    }
}

impl From<HashMap<String, Value>> for AttributeBag {
    fn from(map: HashMap<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for AttributeBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
