//! CEL compiler with compiled program caching

use super::condition::CelCondition;
use crate::error::{AuthzError, Result};
use cel_interpreter::Program;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::trace;

/// Compiles CEL expressions, reusing the program for repeated expressions
#[derive(Debug, Default)]
pub struct CelCompiler {
    programs: DashMap<String, Arc<Program>>,
}

impl CelCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile an expression into a condition
    pub fn compile(&self, expression: &str) -> Result<CelCondition> {
        if let Some(program) = self.programs.get(expression) {
            trace!("CEL cache hit: {}", expression);
            return Ok(CelCondition::from_compiled(
                expression.to_string(),
                Arc::clone(program.value()),
            ));
        }

        let program = Program::compile(expression).map_err(|e| {
            AuthzError::InvalidCondition(format!("{}: {:?}", expression, e))
        })?;
        let program = Arc::new(program);
        self.programs
            .insert(expression.to_string(), Arc::clone(&program));

        Ok(CelCondition::from_compiled(expression.to_string(), program))
    }

    /// Number of distinct compiled expressions
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}
