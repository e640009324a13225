//! Compiled CEL condition

use super::convert::attributes_to_cel;
use crate::condition::{Condition, ConditionError, ConditionResult};
use crate::error::{AuthzError, Result};
use crate::types::AttributeBag;
use cel_interpreter::objects::Value as CelValue;
use cel_interpreter::{Context, Program};
use std::fmt;
use std::sync::Arc;

/// Condition backed by a compiled CEL expression
///
/// ```
/// # use warden_authz::{AttributeBag, CelCondition, Condition};
/// let condition = CelCondition::new("attributes.mfa == true && A.level >= 2").unwrap();
///
/// let attributes = AttributeBag::new().with("mfa", true).with("level", 3);
/// assert_eq!(condition.evaluate(&attributes).unwrap(), true);
/// ```
#[derive(Clone)]
pub struct CelCondition {
    expression: String,
    program: Arc<Program>,
}

impl CelCondition {
    /// Compile an expression
    ///
    /// # Errors
    /// `AuthzError::InvalidCondition` when the expression does not parse
    pub fn new(expression: impl Into<String>) -> Result<Self> {
        let expression = expression.into();
        let program = Program::compile(&expression).map_err(|e| {
            AuthzError::InvalidCondition(format!("{}: {:?}", expression, e))
        })?;

        Ok(Self {
            expression,
            program: Arc::new(program),
        })
    }

    pub(crate) fn from_compiled(expression: String, program: Arc<Program>) -> Self {
        Self { expression, program }
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }
}

impl Condition for CelCondition {
    fn evaluate(&self, attributes: &AttributeBag) -> ConditionResult {
        let mut context = Context::default();
        let bag = attributes_to_cel(attributes);
        let _ = context.add_variable("attributes", bag.clone());
        let _ = context.add_variable("A", bag);

        match self.program.execute(&context) {
            Ok(CelValue::Bool(result)) => Ok(result),
            Ok(_) => Err(ConditionError::NonBooleanResult),
            Err(e) => Err(ConditionError::Evaluation(e.to_string())),
        }
    }

    fn describe(&self) -> String {
        format!("cel({})", self.expression)
    }
}

impl fmt::Debug for CelCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CelCondition")
            .field("expression", &self.expression)
            .finish_non_exhaustive()
    }
}
