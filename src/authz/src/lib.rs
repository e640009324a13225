//! # Warden Authorization Engine
//!
//! Embeddable RBAC + ABAC authorization decision engine.
//!
//! ## Features
//!
//! - **Wildcard permissions** (`invoice:*`, `*:read`, `*`)
//! - **Scoped grants** narrowed by context key/value pairs
//! - **Time-bounded, revocable assignments** of roles to principals
//! - **ABAC conditions** as closures, custom types or CEL expressions
//! - **Machine-readable deny reasons** for every denied decision
//! - **Async-first design** using Tokio, with pluggable stores
//!
//! ## Example
//!
//! ```rust
//! use warden_authz::{AuthorizationBuilder, PrincipalId, ScopeBag};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let host = AuthorizationBuilder::new()
//!         .add_role("role:billing", |r| {
//!             r.named("Billing")
//!                 .grant("invoice:read")
//!                 .grant_in("invoice:*", ScopeBag::new().with("tenant", "acme"))
//!         })
//!         .assign("user:alice", "role:billing")
//!         .build()
//!         .await?;
//!
//!     let decision = host
//!         .for_principal(PrincipalId::new("user:alice"))
//!         .try_on("invoice:approve")?
//!         .in_scope(ScopeBag::new().with("tenant", "acme"))
//!         .evaluate()
//!         .await?;
//!
//!     assert!(decision.is_allowed());
//!     Ok(())
//! }
//! ```

pub mod assignment;
pub mod builder;
pub mod cel; // CEL conditions
pub mod clock;
pub mod condition;
pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod role;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use assignment::Assignment;
pub use builder::{AuthorizationBuilder, RoleBuilder};
pub use cel::{CelCompiler, CelCondition};
pub use clock::{Clock, FixedClock, SystemClock};
pub use condition::{Condition, ConditionError, ConditionResult};
pub use config::{AuthorizationConfig, EngineConfig, GrantConfig, RoleConfig};
pub use engine::{
    AuthorizationCheck, AuthorizationDecision, AuthorizationEngine, AuthorizationRequest,
    DenyReason,
};
pub use error::{AuthzError, Result};
pub use host::AuthorizationHost;
pub use role::{PermissionGrant, Role};
pub use store::{AssignmentStore, InMemoryAssignmentStore, InMemoryRoleStore, RoleStore};
pub use types::{AttributeBag, PermissionId, PrincipalId, RoleId, ScopeBag, WILDCARD};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
