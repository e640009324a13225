//! Attribute-based conditions attached to permission grants
//!
//! A condition is a boolean predicate over the request's [`AttributeBag`].
//! Faults are reported as `Err(ConditionError)`; the engine converts both a
//! `false` result and a fault into a deny at the grant boundary.

use crate::types::AttributeBag;
use std::fmt;
use thiserror::Error;

/// Condition evaluation faults
#[derive(Debug, Error)]
pub enum ConditionError {
    #[error("Attribute not found: {0}")]
    MissingAttribute(String),

    #[error("Attribute '{key}' is not a {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    #[error("Condition evaluation failed: {0}")]
    Evaluation(String),

    #[error("Condition did not return boolean result")]
    NonBooleanResult,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ConditionError {
    pub(crate) fn type_mismatch(key: &str, expected: &'static str) -> Self {
        Self::TypeMismatch {
            key: key.to_string(),
            expected,
        }
    }
}

/// Result type for condition evaluation
pub type ConditionResult = std::result::Result<bool, ConditionError>;

/// Boolean predicate over runtime attributes
///
/// Implementations must be pure from the engine's perspective. Closures of
/// the shape `Fn(&AttributeBag) -> ConditionResult` implement this trait.
///
/// # Examples
///
/// ```
/// use warden_authz::{AttributeBag, Condition, ConditionResult};
///
/// let finance_only = |attrs: &AttributeBag| -> ConditionResult {
///     Ok(attrs.require_str("department")? == "finance")
/// };
///
/// let attrs = AttributeBag::new().with("department", "finance");
/// assert!(finance_only.evaluate(&attrs).unwrap());
/// assert!(finance_only.evaluate(&AttributeBag::new()).is_err());
/// ```
pub trait Condition: Send + Sync {
    fn evaluate(&self, attributes: &AttributeBag) -> ConditionResult;

    /// Short human-readable description used in debug output
    fn describe(&self) -> String {
        "<condition>".to_string()
    }
}

impl<F> Condition for F
where
    F: Fn(&AttributeBag) -> ConditionResult + Send + Sync,
{
    fn evaluate(&self, attributes: &AttributeBag) -> ConditionResult {
        self(attributes)
    }
}

impl fmt::Debug for dyn Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn department_is_finance(attrs: &AttributeBag) -> ConditionResult {
        Ok(attrs.require_str("department")? == "finance")
    }

    #[test]
    fn test_fn_condition_true_and_false() {
        let allowed = AttributeBag::new().with("department", "finance");
        let other = AttributeBag::new().with("department", "sales");

        assert!(department_is_finance.evaluate(&allowed).unwrap());
        assert!(!department_is_finance.evaluate(&other).unwrap());
    }

    #[test]
    fn test_fn_condition_missing_key_is_fault() {
        let result = department_is_finance.evaluate(&AttributeBag::new());
        assert!(matches!(result, Err(ConditionError::MissingAttribute(_))));
    }

    #[test]
    fn test_closure_condition_with_anyhow() {
        let condition = |attrs: &AttributeBag| -> ConditionResult {
            let raw = attrs.require_str("limit")?;
            let limit: i64 = raw.parse().map_err(anyhow::Error::from)?;
            Ok(limit < 1000)
        };

        assert!(condition.evaluate(&AttributeBag::new().with("limit", "250")).unwrap());
        assert!(matches!(
            condition.evaluate(&AttributeBag::new().with("limit", "lots")),
            Err(ConditionError::Other(_))
        ));
    }

    #[test]
    fn test_trait_object_debug() {
        let condition: Box<dyn Condition> = Box::new(department_is_finance);
        assert_eq!(format!("{:?}", condition), "<condition>");
    }
}
