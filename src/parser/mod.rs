//! Arithmetic chain parser
//!
//! Folds a flat operand/operator chain into an evaluation tree by operator
//! priority, resolving operations eagerly where operand types allow.

#![warn(missing_docs)]

pub mod chain;
pub mod error;

pub use chain::{MAX_CHAIN_DEPTH, operator_groups, parse_chain};
pub use error::{OperandSide, ParseError, ParseResult};
