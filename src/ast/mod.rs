// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Arithmetic chains and evaluation trees
//!
//! A [`ChainElement`] sequence is the flat form handed over by the host's
//! expression parser: operands and operators alternating, starting and ending
//! with an operand. The chain parser folds it into an [`ArithmeticGettable`]
//! tree whose shape encodes precedence and associativity.

#![warn(missing_docs)]

use std::fmt;
use std::sync::Arc;

use crate::evaluator::Operand;
use crate::model::TypeInfo;
use crate::registry::{OperationInfo, Operator};

/// One element of a flat arithmetic chain
#[derive(Debug, Clone)]
pub enum ChainElement {
    /// Operand producer
    Operand(Arc<dyn Operand>),
    /// Operator between two operands
    Operator(Operator),
}

impl ChainElement {
    /// Create an operand element
    pub fn operand(operand: impl Operand + 'static) -> Self {
        ChainElement::Operand(Arc::new(operand))
    }

    /// Get the operator if this element is one
    pub fn as_operator(&self) -> Option<Operator> {
        match self {
            ChainElement::Operator(op) => Some(*op),
            ChainElement::Operand(_) => None,
        }
    }
}

impl From<Operator> for ChainElement {
    fn from(operator: Operator) -> Self {
        ChainElement::Operator(operator)
    }
}

impl From<Arc<dyn Operand>> for ChainElement {
    fn from(operand: Arc<dyn Operand>) -> Self {
        ChainElement::Operand(operand)
    }
}

impl fmt::Display for ChainElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainElement::Operand(operand) => write!(f, "{operand}"),
            ChainElement::Operator(op) => write!(f, "{op}"),
        }
    }
}

/// Node of an evaluation tree
#[derive(Debug, Clone)]
pub enum ArithmeticGettable {
    /// A single operand producer
    Leaf(Arc<dyn Operand>),
    /// A binary operation over two subtrees
    Chain(Box<ArithmeticChain>),
}

impl ArithmeticGettable {
    /// Static result type known at parse time
    pub fn return_type(&self) -> TypeInfo {
        match self {
            ArithmeticGettable::Leaf(operand) => operand.return_type(),
            ArithmeticGettable::Chain(chain) => chain.return_type(),
        }
    }

    /// Check if this node is a binary operation
    pub fn is_chain(&self) -> bool {
        matches!(self, ArithmeticGettable::Chain(_))
    }

    /// Get the binary operation if this node is one
    pub fn as_chain(&self) -> Option<&ArithmeticChain> {
        match self {
            ArithmeticGettable::Chain(chain) => Some(chain),
            ArithmeticGettable::Leaf(_) => None,
        }
    }
}

/// Fully parenthesized form, e.g. `((8 - 3) - 2)`
impl fmt::Display for ArithmeticGettable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArithmeticGettable::Leaf(operand) => write!(f, "{operand}"),
            ArithmeticGettable::Chain(chain) => {
                write!(f, "({} {} {})", chain.left, chain.operator, chain.right)
            }
        }
    }
}

/// Binary operation node
///
/// `operation_info` is present when both operand types were known at parse
/// time. Otherwise the operation is resolved on every evaluation from the
/// runtime types of the operands.
#[derive(Debug, Clone)]
pub struct ArithmeticChain {
    left: ArithmeticGettable,
    operator: Operator,
    right: ArithmeticGettable,
    operation_info: Option<Arc<OperationInfo>>,
    return_type: TypeInfo,
}

impl ArithmeticChain {
    /// Create a new binary operation node
    pub fn new(
        left: ArithmeticGettable,
        operator: Operator,
        right: ArithmeticGettable,
        operation_info: Option<Arc<OperationInfo>>,
    ) -> Self {
        let return_type = operation_info
            .as_ref()
            .map_or(TypeInfo::Unknown, |info| info.return_type());
        Self {
            left,
            operator,
            right,
            operation_info,
            return_type,
        }
    }

    /// Left subtree
    pub fn left(&self) -> &ArithmeticGettable {
        &self.left
    }

    /// Operator joining both subtrees
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Right subtree
    pub fn right(&self) -> &ArithmeticGettable {
        &self.right
    }

    /// Operation resolved at parse time, if any
    pub fn operation_info(&self) -> Option<&Arc<OperationInfo>> {
        self.operation_info.as_ref()
    }

    /// Result type of the pre-resolved operation, or `Unknown`
    pub fn return_type(&self) -> TypeInfo {
        self.return_type
    }
}

impl From<ArithmeticChain> for ArithmeticGettable {
    fn from(chain: ArithmeticChain) -> Self {
        ArithmeticGettable::Chain(Box::new(chain))
    }
}
