//! Arithmetic operation registry
//!
//! Operators, the operations registered for them, difference operations and
//! default values, with cached overload resolution.

#![warn(missing_docs)]

pub mod arithmetics;
pub mod cache;
pub mod defaults;
pub mod error;
pub mod operation;
pub mod operator;

pub use arithmetics::{Arithmetics, RegistryPhase};
pub use cache::{CacheConfig, CacheSnapshot, CacheStatistics};
pub use defaults::register_default_operations;
pub use error::{RegistrationError, RegistrationResult};
pub use operation::{DefaultValueSupplier, DifferenceInfo, OperandTypes, Operation, OperationInfo};
pub use operator::{Operator, Priority};

use std::sync::Arc;

/// Create a frozen, shareable registry with all built-in operations
pub fn create_standard_registry() -> RegistrationResult<Arc<Arithmetics>> {
    Arithmetics::standard().map(Arc::new)
}
