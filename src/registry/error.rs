//! Registration errors

use thiserror::Error;

use super::operator::Operator;
use crate::model::TypeInfo;

/// Result type for registration calls
pub type RegistrationResult<T = ()> = Result<T, RegistrationError>;

/// Errors raised while populating an [`Arithmetics`](super::Arithmetics) registry
///
/// These indicate a defect in the registering code, not in a script.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// The registry was already frozen
    #[error("Registrations are closed; the registry has already been frozen")]
    RegistrationClosed,

    /// An operation with the exact operand types already exists
    #[error("Duplicate {} operation for types '{left}' and '{right}'", .operator.name())]
    DuplicateOperation {
        /// Operator of the rejected operation
        operator: Operator,
        /// Declared left operand type
        left: TypeInfo,
        /// Declared right operand type
        right: TypeInfo,
    },

    /// A difference for the exact type already exists
    #[error("There's already a difference registered for type '{operand_type}'")]
    DuplicateDifference {
        /// Operand type of the rejected difference
        operand_type: TypeInfo,
    },

    /// A default value for the exact type already exists
    #[error("There's already a default value registered for type '{value_type}'")]
    DuplicateDefaultValue {
        /// Type of the rejected default value
        value_type: TypeInfo,
    },

    /// The erased type cannot appear in a registration
    #[error("Cannot register {what} for the erased type")]
    ErasedType {
        /// What was being registered
        what: &'static str,
    },
}
