//! Evaluation context for arithmetic expressions

use rustc_hash::FxHashMap;

use crate::model::Value;

/// Runtime context an expression is evaluated against
///
/// Holds the variable bindings visible to [`Variable`](super::Variable)
/// operands. The same expression may be evaluated against many contexts.
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    /// Variable bindings
    pub variables: FxHashMap<String, Value>,
}

impl EvaluationContext {
    /// Create an empty evaluation context
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variable binding
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_variable(name, value);
        self
    }

    /// Set a variable in the context
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Remove a variable from the context
    pub fn remove_variable(&mut self, name: &str) -> Option<Value> {
        self.variables.remove(name)
    }

    /// Get a variable from the context
    pub fn get_variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }
}
