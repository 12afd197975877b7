//! Type identities for arithmetic operands

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type information for operands, operation signatures and results
///
/// `Unknown` is the erased type: the static type of an operand whose type is
/// only known at run time. It is the top of the assignable-from order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeInfo {
    /// Erased type, resolved only at evaluation time
    Unknown,
    /// Abstract numeric supertype of `Integer` and `Decimal`
    Number,
    /// Integral numeric value
    Integer,
    /// Floating-point numeric value
    Decimal,
    /// Boolean value (true/false)
    Boolean,
    /// String value
    String,
    /// Non-negative duration
    Timespan,
    /// Point in time
    Date,
    /// Three-component vector
    Vector,
}

impl TypeInfo {
    /// Every concrete (non-erased) type, supertypes first
    pub const KNOWN: [TypeInfo; 8] = [
        TypeInfo::Number,
        TypeInfo::Integer,
        TypeInfo::Decimal,
        TypeInfo::Boolean,
        TypeInfo::String,
        TypeInfo::Timespan,
        TypeInfo::Date,
        TypeInfo::Vector,
    ];

    /// Check if this is the erased type
    pub fn is_unknown(&self) -> bool {
        matches!(self, TypeInfo::Unknown)
    }

    /// Check if a value of type `other` can be used where `self` is expected
    ///
    /// The relation is reflexive, `Unknown` accepts everything and `Number`
    /// accepts both numeric types.
    pub fn is_assignable_from(&self, other: &TypeInfo) -> bool {
        match (self, other) {
            (TypeInfo::Unknown, _) => true,
            (TypeInfo::Number, TypeInfo::Integer | TypeInfo::Decimal) => true,
            _ => self == other,
        }
    }

    /// Check if this type is numeric
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            TypeInfo::Number | TypeInfo::Integer | TypeInfo::Decimal
        )
    }

    /// Check if this type is one of the integral numeric types
    pub fn is_integral(&self) -> bool {
        matches!(self, TypeInfo::Integer)
    }

    /// The direct supertype, if any
    pub fn supertype(&self) -> Option<TypeInfo> {
        match self {
            TypeInfo::Unknown => None,
            TypeInfo::Integer | TypeInfo::Decimal => Some(TypeInfo::Number),
            _ => Some(TypeInfo::Unknown),
        }
    }

    /// Most specific type that every given type is assignable to
    pub fn common_supertype<'a, I>(types: I) -> TypeInfo
    where
        I: IntoIterator<Item = &'a TypeInfo>,
    {
        let mut iter = types.into_iter();
        let Some(first) = iter.next() else {
            return TypeInfo::Unknown;
        };

        iter.fold(*first, |acc, next| {
            let mut candidate = acc;
            loop {
                if candidate.is_assignable_from(next) {
                    return candidate;
                }
                match candidate.supertype() {
                    Some(parent) => candidate = parent,
                    None => return TypeInfo::Unknown,
                }
            }
        })
    }

    /// Get the name of this type for display
    pub fn name(&self) -> &'static str {
        match self {
            TypeInfo::Unknown => "Object",
            TypeInfo::Number => "Number",
            TypeInfo::Integer => "Integer",
            TypeInfo::Decimal => "Decimal",
            TypeInfo::Boolean => "Boolean",
            TypeInfo::String => "String",
            TypeInfo::Timespan => "Timespan",
            TypeInfo::Date => "Date",
            TypeInfo::Vector => "Vector",
        }
    }

    /// Name prefixed with "a" or "an", for diagnostics
    pub fn with_indefinite_article(&self) -> String {
        let name = self.name();
        let article = match name.chars().next() {
            Some(c) if "AEIOUaeiou".contains(c) => "an",
            _ => "a",
        };
        format!("{article} {name}")
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
