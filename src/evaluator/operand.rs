//! Operand producers
//!
//! [`Operand`] is what the host's expression framework hands over for each
//! leaf of an arithmetic chain. [`Literal`] and [`Variable`] are the two
//! adapters shipped with this crate.

use std::fmt;

use super::context::EvaluationContext;
use crate::model::{TypeInfo, Value};

/// Producer of an operand value
pub trait Operand: fmt::Display + fmt::Debug + Send + Sync {
    /// Produce the value in the given context; `None` if there is none
    fn get(&self, context: &EvaluationContext) -> Option<Value>;

    /// Declared type, `Unknown` if only known at run time
    fn return_type(&self) -> TypeInfo;

    /// Check if the value is constant and known at parse time
    fn is_literal(&self) -> bool {
        false
    }
}

/// Constant operand
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    value: Value,
}

impl Literal {
    /// Create a new literal
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// The constant value
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl Operand for Literal {
    fn get(&self, _context: &EvaluationContext) -> Option<Value> {
        Some(self.value.clone())
    }

    fn return_type(&self) -> TypeInfo {
        self.value.type_info()
    }

    fn is_literal(&self) -> bool {
        true
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Value::String(s) => write!(f, "\"{s}\""),
            other => write!(f, "{other}"),
        }
    }
}

/// Operand read from a context variable
///
/// An untyped variable declares `Unknown`, deferring operation lookup to run
/// time. A typed variable only yields values assignable to its declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    name: String,
    declared_type: TypeInfo,
}

impl Variable {
    /// Untyped variable
    pub fn new(name: impl Into<String>) -> Self {
        Self::typed(name, TypeInfo::Unknown)
    }

    /// Variable with a declared type
    pub fn typed(name: impl Into<String>, declared_type: TypeInfo) -> Self {
        Self {
            name: name.into(),
            declared_type,
        }
    }

    /// Variable name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Operand for Variable {
    fn get(&self, context: &EvaluationContext) -> Option<Value> {
        context
            .get_variable(&self.name)
            .filter(|value| self.declared_type.is_assignable_from(&value.type_info()))
            .cloned()
    }

    fn return_type(&self) -> TypeInfo {
        self.declared_type
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.name)
    }
}
