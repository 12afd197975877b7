//! Data model for arithmetic operands
//!
//! Type identities, runtime values and the conversion service used when no
//! operation accepts an operand's type directly.

#![warn(missing_docs)]

pub mod coercion;
pub mod types;
pub mod value;

pub use coercion::{ConvertFn, Converter, ConverterRegistry};
pub use types::TypeInfo;
pub use value::{Timespan, Value, Vector};
