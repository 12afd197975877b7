//! Lazy evaluation of arithmetic trees
//!
//! Every failure during evaluation is expressed as an absent value: missing
//! operands without a default, operations that cannot be resolved for the
//! runtime types and functions outside their domain all yield `None`.

#![warn(missing_docs)]

mod context;
mod difference;
mod expression;
mod operand;

pub use context::EvaluationContext;
pub use difference::DifferenceExpression;
pub use expression::{ArithmeticExpression, ExpressionOperand};
pub use operand::{Literal, Operand, Variable};

use std::sync::Arc;

use crate::ast::{ArithmeticChain, ArithmeticGettable};
use crate::model::{TypeInfo, Value};
use crate::registry::{Arithmetics, OperationInfo};

/// Side of a binary operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Side {
    fn of(self, info: &OperationInfo) -> TypeInfo {
        match self {
            Side::Left => info.left(),
            Side::Right => info.right(),
        }
    }
}

impl ArithmeticGettable {
    /// Evaluate this node against a context
    pub fn evaluate(&self, registry: &Arithmetics, context: &EvaluationContext) -> Option<Value> {
        match self {
            ArithmeticGettable::Leaf(operand) => operand.get(context),
            ArithmeticGettable::Chain(chain) => chain.evaluate(registry, context),
        }
    }
}

impl ArithmeticChain {
    /// Evaluate this operation against a context
    ///
    /// An absent result of a nested operation makes this one absent too;
    /// default values only stand in for absent leaf operands.
    pub fn evaluate(&self, registry: &Arithmetics, context: &EvaluationContext) -> Option<Value> {
        let left = self.left().evaluate(registry, context);
        if left.is_none() && self.left().is_chain() {
            return None;
        }
        let right = self.right().evaluate(registry, context);
        if right.is_none() && self.right().is_chain() {
            return None;
        }

        let left_type = left
            .as_ref()
            .map_or_else(|| self.left().return_type(), Value::type_info);
        let right_type = right
            .as_ref()
            .map_or_else(|| self.right().return_type(), Value::type_info);
        if left_type.is_unknown() && right_type.is_unknown() {
            return None;
        }

        let info = if left.is_none() && left_type.is_unknown() {
            self.lookup_anchored(registry, right_type, Side::Right)
        } else if right.is_none() && right_type.is_unknown() {
            self.lookup_anchored(registry, left_type, Side::Left)
        } else if let Some(info) = self.operation_info() {
            Some(Arc::clone(info))
        } else {
            // unresolved nodes declare `Unknown`, which accepts any result
            registry.lookup_operation_info(self.operator(), left_type, right_type)
        }?;

        let left = match left {
            Some(value) => value,
            None => registry.get_default_value(info.left())?,
        };
        let right = match right {
            Some(value) => value,
            None => registry.get_default_value(info.right())?,
        };

        info.calculate(&left, &right)
    }

    /// Find an operation when only the `side` operand's type is known
    ///
    /// Tries the anchor type on both sides first, then any operation taking
    /// the anchor on that side, preferring one declared for exactly the
    /// anchor type. Only unresolved nodes get here, so any result type will do.
    fn lookup_anchored(
        &self,
        registry: &Arithmetics,
        anchor: TypeInfo,
        side: Side,
    ) -> Option<Arc<OperationInfo>> {
        if let Some(info) = registry.lookup_operation_info(self.operator(), anchor, anchor) {
            return Some(info);
        }

        let mut best: Option<Arc<OperationInfo>> = None;
        for info in registry.get_operations(self.operator()) {
            let anchor_side = side.of(&info);
            if !anchor_side.is_assignable_from(&anchor) {
                continue;
            }
            if best.is_none() || anchor_side == anchor {
                best = Some(info);
            }
        }
        best
    }
}
