//! The `difference between A and B` expression

use std::fmt;
use std::sync::Arc;

use super::context::EvaluationContext;
use super::operand::{Literal, Operand};
use crate::model::{TypeInfo, Value};
use crate::parser::{ParseError, ParseResult};
use crate::registry::{Arithmetics, DifferenceInfo};

/// Difference between two operands
///
/// The difference operation is resolved at construction whenever the operand
/// types allow it. When the declared types are unrelated, one side is
/// converted to the other side's type; when one side's type is erased, it is
/// converted to the known type at evaluation.
#[derive(Debug)]
pub struct DifferenceExpression {
    registry: Arc<Arithmetics>,
    first: Arc<dyn Operand>,
    second: Arc<dyn Operand>,
    first_target: Option<TypeInfo>,
    second_target: Option<TypeInfo>,
    difference_info: Option<Arc<DifferenceInfo>>,
}

impl DifferenceExpression {
    /// Build the expression `difference between first and second`
    pub fn new(
        registry: Arc<Arithmetics>,
        first: Arc<dyn Operand>,
        second: Arc<dyn Operand>,
    ) -> ParseResult<Self> {
        let first_type = first.return_type();
        let second_type = second.return_type();
        let mut super_type = TypeInfo::common_supertype([&first_type, &second_type]);

        let mut first_target = None;
        let mut second_target = None;
        let mut difference_info = None;
        let mut resolved = true;

        if super_type.is_unknown() && !(first_type.is_unknown() && second_type.is_unknown()) {
            if !first_type.is_unknown() && !second_type.is_unknown() {
                let converter = registry.converter();
                if let Some(info) = registry
                    .get_difference_info(first_type)
                    .filter(|_| converter.converter_exists(&second_type, &first_type))
                {
                    difference_info = Some(info);
                    second_target = Some(first_type);
                } else if let Some(info) = registry
                    .get_difference_info(second_type)
                    .filter(|_| converter.converter_exists(&first_type, &second_type))
                {
                    difference_info = Some(info);
                    first_target = Some(second_type);
                } else {
                    resolved = false;
                }
            } else if first_type.is_unknown() {
                first_target = Some(second_type);
                super_type = second_type;
            } else {
                second_target = Some(first_type);
                super_type = first_type;
            }
        }

        if !super_type.is_unknown() {
            difference_info = registry.get_difference_info(super_type);
            resolved = difference_info.is_some();
        }

        if !resolved {
            return Err(ParseError::NoDifference {
                first: first.to_string(),
                second: second.to_string(),
            });
        }

        Ok(Self {
            registry,
            first,
            second,
            first_target,
            second_target,
            difference_info,
        })
    }

    /// Evaluate against a context
    ///
    /// Absent if either operand is absent or no difference applies to the
    /// runtime types.
    pub fn get(&self, context: &EvaluationContext) -> Option<Value> {
        let first = self.operand_value(&self.first, self.first_target, context)?;
        let second = self.operand_value(&self.second, self.second_target, context)?;

        let info = match &self.difference_info {
            Some(info) => Arc::clone(info),
            None => {
                let super_type =
                    TypeInfo::common_supertype([&first.type_info(), &second.type_info()]);
                self.registry.get_difference_info(super_type)?
            }
        };
        info.calculate(&first, &second)
    }

    fn operand_value(
        &self,
        operand: &Arc<dyn Operand>,
        target: Option<TypeInfo>,
        context: &EvaluationContext,
    ) -> Option<Value> {
        let value = operand.get(context)?;
        match target {
            Some(target) => self.registry.converter().convert(&value, &target),
            None => Some(value),
        }
    }

    /// Result type of the resolved difference, or `Unknown`
    pub fn return_type(&self) -> TypeInfo {
        self.difference_info
            .as_ref()
            .map_or(TypeInfo::Unknown, |info| info.return_type())
    }

    /// Check if both operands are constant
    pub fn is_literal(&self) -> bool {
        self.first.is_literal() && self.second.is_literal()
    }

    /// Collapse a constant difference into a literal
    pub fn simplify(self: Arc<Self>) -> Arc<dyn Operand> {
        if self.is_literal() {
            if let Some(value) = self.get(&EvaluationContext::new()) {
                return Arc::new(Literal::new(value));
            }
        }
        self
    }
}

impl Operand for DifferenceExpression {
    fn get(&self, context: &EvaluationContext) -> Option<Value> {
        DifferenceExpression::get(self, context)
    }

    fn return_type(&self) -> TypeInfo {
        DifferenceExpression::return_type(self)
    }

    fn is_literal(&self) -> bool {
        DifferenceExpression::is_literal(self)
    }
}

impl fmt::Display for DifferenceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "difference between {} and {}", self.first, self.second)
    }
}
