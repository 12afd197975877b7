//! Arithmetic for dynamically typed scripting languages
//!
//! A registry of type-specific arithmetic operations with converter-based
//! overload resolution, a precedence parser over flat operand/operator
//! chains and a lazy evaluator that tolerates operand types erased until run
//! time.
//!
//! ```
//! use std::sync::Arc;
//! use script_arithmetic::{ArithmeticExpression, EvaluationContext, ExpressionOperand, Operator, Value};
//!
//! let registry = script_arithmetic::create_standard_registry().unwrap();
//! let expr = ArithmeticExpression::new(
//!     Arc::clone(&registry),
//!     ExpressionOperand::literal(7i64),
//!     Operator::Division,
//!     ExpressionOperand::literal(2i64),
//! )
//! .unwrap();
//! assert_eq!(expr.get(&EvaluationContext::new()), Some(Value::Decimal(3.5)));
//! ```

pub mod ast;
pub mod evaluator;
pub mod model;
pub mod parser;
pub mod registry;

// Re-export main types
pub use ast::{ArithmeticChain, ArithmeticGettable, ChainElement};
pub use evaluator::{
    ArithmeticExpression, DifferenceExpression, EvaluationContext, ExpressionOperand, Literal,
    Operand, Variable,
};
pub use model::{Converter, ConverterRegistry, Timespan, TypeInfo, Value, Vector};
pub use parser::{MAX_CHAIN_DEPTH, OperandSide, ParseError, ParseResult, parse_chain};
pub use registry::{
    Arithmetics, CacheConfig, OperationInfo, Operator, Priority, RegistrationError,
    create_standard_registry,
};
