//! Parse-time diagnostics

use std::fmt;
use thiserror::Error;

use crate::model::TypeInfo;
use crate::registry::Operator;

/// Result type for chain parsing and expression construction
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors raised while building an arithmetic expression
///
/// The `Display` form is the diagnostic shown to script authors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No operation (direct or converted) exists for the operand types
    #[error(
        "{} can't be performed on {} and {}",
        .operator.name(),
        .left.with_indefinite_article(),
        .right.with_indefinite_article()
    )]
    NoOperation {
        /// Operator that could not be resolved
        operator: Operator,
        /// Type of the left operand
        left: TypeInfo,
        /// Type of the right operand
        right: TypeInfo,
    },

    /// No operation takes the known operand when the other one is erased
    #[error(
        "{} can't be performed with {} as the {} operand",
        .operator.name(),
        .operand.with_indefinite_article(),
        .side
    )]
    NoOperationWith {
        /// Operator that could not be resolved
        operator: Operator,
        /// Type of the known operand
        operand: TypeInfo,
        /// Side the known operand is on
        side: OperandSide,
    },

    /// No difference operation exists for the operands
    #[error("Can't get the difference of {first} and {second}")]
    NoDifference {
        /// Display form of the first operand
        first: String,
        /// Display form of the second operand
        second: String,
    },

    /// The chain nests deeper than the parser allows
    #[error("Arithmetic chain depth exceeded maximum of {max_depth}")]
    MaxDepthExceeded {
        /// Deepest tree the parser builds
        max_depth: usize,
    },

    /// The chain holds no elements
    #[error("Arithmetic chain is empty")]
    EmptyChain,

    /// The chain does not alternate operands and operators
    #[error("Malformed arithmetic chain at element {index}: {reason}")]
    MalformedChain {
        /// Position of the offending element
        index: usize,
        /// What was wrong with it
        reason: &'static str,
    },
}

/// Side of a binary operation an operand sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandSide {
    /// Left operand
    Left,
    /// Right operand
    Right,
}

impl fmt::Display for OperandSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandSide::Left => f.write_str("left"),
            OperandSide::Right => f.write_str("right"),
        }
    }
}

impl ParseError {
    /// Operator and operand types of an unresolved operation
    pub fn operation_types(&self) -> Option<(Operator, TypeInfo, TypeInfo)> {
        match self {
            ParseError::NoOperation {
                operator,
                left,
                right,
            } => Some((*operator, *left, *right)),
            _ => None,
        }
    }
}
