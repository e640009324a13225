//! Error types for the authorization engine

use thiserror::Error;

/// Authorization engine errors
///
/// Only usage faults, store faults and cancellation cross the engine
/// boundary. Denied decisions are ordinary `Ok` values.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// Permission string does not follow the `resource:action` grammar
    #[error("Invalid permission: {0}")]
    InvalidPermission(String),

    /// Evaluation was requested before a permission was specified
    #[error("Permission must be specified with on() before evaluation")]
    PermissionNotSpecified,

    /// Runtime management operation invoked on a store that does not support it
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Condition expression could not be compiled
    #[error("Invalid condition: {0}")]
    InvalidCondition(String),

    /// Declarative configuration is malformed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Fault raised by a role or assignment store
    #[error("Store error: {0}")]
    Store(String),

    /// Evaluation cancelled by the caller
    #[error("Evaluation cancelled")]
    Cancelled,

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for authorization operations
pub type Result<T> = std::result::Result<T, AuthzError>;
