//! Arithmetic expressions as seen by the host language
//!
//! An [`ArithmeticExpression`] is one binary operation as written in a
//! script, `first operator second`, where either side may itself be an
//! arithmetic expression. Construction computes the static result type,
//! merges nested chains that are not parenthesized and parses the merged
//! chain, so `1 + 2 * 3` built as `(1 + 2) * 3` without parentheses still
//! evaluates as `1 + (2 * 3)`.

use indexmap::IndexSet;
use std::fmt;
use std::sync::Arc;

use super::context::EvaluationContext;
use super::operand::{Literal, Operand};
use crate::ast::{ArithmeticGettable, ChainElement};
use crate::model::{TypeInfo, Value};
use crate::parser::{OperandSide, ParseError, ParseResult, parse_chain};
use crate::registry::{Arithmetics, Operator};

#[derive(Debug, Clone)]
enum OperandSource {
    Operand(Arc<dyn Operand>),
    Expression(Arc<ArithmeticExpression>),
}

/// One side of an [`ArithmeticExpression`]
#[derive(Debug, Clone)]
pub struct ExpressionOperand {
    source: OperandSource,
    grouped: bool,
}

impl ExpressionOperand {
    /// Wrap an operand producer
    pub fn new(operand: impl Operand + 'static) -> Self {
        Self::shared(Arc::new(operand))
    }

    /// Wrap a shared operand producer
    pub fn shared(operand: Arc<dyn Operand>) -> Self {
        Self {
            source: OperandSource::Operand(operand),
            grouped: false,
        }
    }

    /// Constant operand
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::new(Literal::new(value))
    }

    /// Nested arithmetic expression
    pub fn expression(expression: ArithmeticExpression) -> Self {
        Self {
            source: OperandSource::Expression(Arc::new(expression)),
            grouped: false,
        }
    }

    /// Mark this side as parenthesized
    pub fn grouped(mut self) -> Self {
        self.grouped = true;
        self
    }

    /// Check if this side is parenthesized
    pub fn is_grouped(&self) -> bool {
        self.grouped
    }

    /// Declared type of this side
    pub fn return_type(&self) -> TypeInfo {
        match &self.source {
            OperandSource::Operand(operand) => operand.return_type(),
            OperandSource::Expression(expression) => expression.return_type(),
        }
    }

    /// Check if this side is constant
    pub fn is_literal(&self) -> bool {
        match &self.source {
            OperandSource::Operand(operand) => operand.is_literal(),
            OperandSource::Expression(expression) => expression.is_literal(),
        }
    }

    fn as_operand(&self) -> Arc<dyn Operand> {
        match &self.source {
            OperandSource::Operand(operand) => Arc::clone(operand),
            OperandSource::Expression(expression) => Arc::clone(expression) as Arc<dyn Operand>,
        }
    }

    /// Append this side's chain elements: a nested, non-grouped expression
    /// contributes its whole chain, anything else a single operand
    fn extend_chain(&self, chain: &mut Vec<ChainElement>) {
        match &self.source {
            OperandSource::Expression(expression) if !self.grouped => {
                chain.extend(expression.chain.iter().cloned());
            }
            _ => chain.push(ChainElement::Operand(self.as_operand())),
        }
    }
}

impl fmt::Display for ExpressionOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.as_operand();
        if self.grouped {
            write!(f, "({inner})")
        } else {
            write!(f, "{inner}")
        }
    }
}

/// A binary arithmetic expression with a static result type
#[derive(Debug)]
pub struct ArithmeticExpression {
    registry: Arc<Arithmetics>,
    first: ExpressionOperand,
    operator: Operator,
    second: ExpressionOperand,
    return_type: TypeInfo,
    known_return_types: IndexSet<TypeInfo>,
    chain: Vec<ChainElement>,
    gettable: ArithmeticGettable,
}

impl ArithmeticExpression {
    /// Build the expression `first operator second`
    ///
    /// Fails if no operation can apply to the operand types, or, when one
    /// side's type is erased, if the other side's type takes part in no
    /// operation of `operator` at all.
    pub fn new(
        registry: Arc<Arithmetics>,
        first: ExpressionOperand,
        operator: Operator,
        second: ExpressionOperand,
    ) -> ParseResult<Self> {
        let first_type = first.return_type();
        let second_type = second.return_type();
        let no_operation = || ParseError::NoOperation {
            operator,
            left: first_type,
            right: second_type,
        };

        let mut known_return_types = IndexSet::new();
        let mut return_type = if first_type.is_unknown() && second_type.is_unknown() {
            known_return_types = registry.all_return_types(operator);
            TypeInfo::Unknown
        } else if first_type.is_unknown() || second_type.is_unknown() {
            let (operations, operand, side) = if first_type.is_unknown() {
                (
                    registry.lookup_right_operations(operator, second_type),
                    second_type,
                    OperandSide::Right,
                )
            } else {
                (
                    registry.lookup_left_operations(operator, first_type),
                    first_type,
                    OperandSide::Left,
                )
            };
            if operations.is_empty() {
                return Err(ParseError::NoOperationWith {
                    operator,
                    operand,
                    side,
                });
            }
            known_return_types = operations.iter().map(|info| info.return_type()).collect();
            TypeInfo::common_supertype(&known_return_types)
        } else {
            registry
                .lookup_operation_info(operator, first_type, second_type)
                .ok_or_else(no_operation)?
                .return_type()
        };

        if TypeInfo::Number.is_assignable_from(&return_type) {
            return_type = numeric_return_type(operator, first_type, second_type);
        }

        let mut chain = Vec::new();
        first.extend_chain(&mut chain);
        chain.push(ChainElement::Operator(operator));
        second.extend_chain(&mut chain);

        let gettable = parse_chain(&registry, &chain)?;

        Ok(Self {
            registry,
            first,
            operator,
            second,
            return_type,
            known_return_types,
            chain,
            gettable,
        })
    }

    /// Evaluate against a context
    pub fn get(&self, context: &EvaluationContext) -> Option<Value> {
        self.gettable.evaluate(&self.registry, context)
    }

    /// Static result type
    pub fn return_type(&self) -> TypeInfo {
        self.return_type
    }

    /// Types a value of this expression may have
    pub fn possible_return_types(&self) -> Vec<TypeInfo> {
        if self.return_type.is_unknown() {
            self.known_return_types.iter().copied().collect()
        } else {
            vec![self.return_type]
        }
    }

    /// Check if this expression may produce a value of `value_type`
    pub fn can_return(&self, value_type: TypeInfo) -> bool {
        if self.return_type.is_unknown() && self.known_return_types.contains(&value_type) {
            return true;
        }
        value_type.is_assignable_from(&self.return_type)
            || self
                .possible_return_types()
                .iter()
                .any(|possible| value_type.is_assignable_from(possible))
    }

    /// Operator joining both sides
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Left side as written
    pub fn first(&self) -> &ExpressionOperand {
        &self.first
    }

    /// Right side as written
    pub fn second(&self) -> &ExpressionOperand {
        &self.second
    }

    /// Flat chain this expression was parsed from
    pub fn chain(&self) -> &[ChainElement] {
        &self.chain
    }

    /// Parsed evaluation tree
    pub fn gettable(&self) -> &ArithmeticGettable {
        &self.gettable
    }

    /// Check if every operand of this expression is constant
    pub fn is_literal(&self) -> bool {
        self.first.is_literal() && self.second.is_literal()
    }

    /// Collapse a constant expression into a literal
    ///
    /// Expressions with non-constant operands, or whose constant evaluation
    /// yields nothing, are returned unchanged.
    pub fn simplify(self: Arc<Self>) -> Arc<dyn Operand> {
        if self.is_literal() {
            if let Some(value) = self.get(&EvaluationContext::new()) {
                return Arc::new(Literal::new(value));
            }
        }
        self
    }
}

/// Result type of a numeric operation
///
/// Division and exponentiation always yield decimals; other operators stay
/// integral only when both operands are declared integral.
fn numeric_return_type(operator: Operator, first: TypeInfo, second: TypeInfo) -> TypeInfo {
    match operator {
        Operator::Division | Operator::Exponentiation => TypeInfo::Decimal,
        _ if first.is_integral() && second.is_integral() => TypeInfo::Integer,
        _ => TypeInfo::Decimal,
    }
}

impl Operand for ArithmeticExpression {
    fn get(&self, context: &EvaluationContext) -> Option<Value> {
        ArithmeticExpression::get(self, context)
    }

    fn return_type(&self) -> TypeInfo {
        self.return_type
    }

    fn is_literal(&self) -> bool {
        ArithmeticExpression::is_literal(self)
    }
}

impl fmt::Display for ArithmeticExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.first, self.operator, self.second)
    }
}
