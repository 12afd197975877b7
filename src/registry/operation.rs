//! Registered operation records

use log::warn;
use std::fmt;
use std::sync::Arc;

use crate::model::{Converter, TypeInfo, Value};

/// Pure binary function backing an operation
///
/// Returns `None` when the operands are outside the function's domain.
pub type Operation = Arc<dyn Fn(&Value, &Value) -> Option<Value> + Send + Sync>;

/// Zero-argument supplier of a type's default value
pub type DefaultValueSupplier = Arc<dyn Fn() -> Value + Send + Sync>;

/// Operand type pair used as a cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperandTypes {
    /// Type of the left operand
    pub left: TypeInfo,
    /// Type of the right operand
    pub right: TypeInfo,
}

impl OperandTypes {
    /// Create a new operand type pair
    pub const fn new(left: TypeInfo, right: TypeInfo) -> Self {
        Self { left, right }
    }
}

/// A binary operation together with its operand and result types
#[derive(Clone)]
pub struct OperationInfo {
    left: TypeInfo,
    right: TypeInfo,
    return_type: TypeInfo,
    operation: Operation,
}

impl OperationInfo {
    /// Create a new operation info
    pub fn new<F>(left: TypeInfo, right: TypeInfo, return_type: TypeInfo, operation: F) -> Self
    where
        F: Fn(&Value, &Value) -> Option<Value> + Send + Sync + 'static,
    {
        Self::from_operation(left, right, return_type, Arc::new(operation))
    }

    /// Create a new operation info from a shared function
    pub fn from_operation(
        left: TypeInfo,
        right: TypeInfo,
        return_type: TypeInfo,
        operation: Operation,
    ) -> Self {
        Self {
            left,
            right,
            return_type,
            operation,
        }
    }

    /// Declared type of the left operand
    pub fn left(&self) -> TypeInfo {
        self.left
    }

    /// Declared type of the right operand
    pub fn right(&self) -> TypeInfo {
        self.right
    }

    /// Declared result type
    pub fn return_type(&self) -> TypeInfo {
        self.return_type
    }

    /// The function performing the calculation
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    /// Apply the operation
    pub fn calculate(&self, left: &Value, right: &Value) -> Option<Value> {
        (self.operation)(left, right)
    }

    /// Check if the declared operand types equal the given ones
    pub fn matches_exactly(&self, left: &TypeInfo, right: &TypeInfo) -> bool {
        self.left == *left && self.right == *right
    }

    /// Check if operands of the given types are accepted without conversion
    pub fn accepts(&self, left: &TypeInfo, right: &TypeInfo) -> bool {
        self.left.is_assignable_from(left) && self.right.is_assignable_from(right)
    }

    /// Build an operation taking `from_left` and `from_right` operands and
    /// returning `to_return`, by converting around this one
    ///
    /// Fails if either source type is erased or if any of the three
    /// converters is missing.
    pub fn get_converted(
        &self,
        from_left: TypeInfo,
        from_right: TypeInfo,
        to_return: TypeInfo,
        converter: &Arc<dyn Converter>,
    ) -> Option<OperationInfo> {
        if from_left.is_unknown() || from_right.is_unknown() {
            return None;
        }
        if !converter.converter_exists(&from_left, &self.left)
            || !converter.converter_exists(&from_right, &self.right)
            || !converter.converter_exists(&self.return_type, &to_return)
        {
            return None;
        }

        let (left, right) = (self.left, self.right);
        let operation = Arc::clone(&self.operation);
        let converter = Arc::clone(converter);
        let converted = move |l: &Value, r: &Value| {
            let (Some(l), Some(r)) = (converter.convert(l, &left), converter.convert(r, &right))
            else {
                warn!("Conversion of operands ({l}, {r}) to ({left}, {right}) failed");
                return None;
            };
            let result = operation(&l, &r)?;
            converter.convert(&result, &to_return)
        };

        Some(OperationInfo::new(from_left, from_right, to_return, converted))
    }
}

impl fmt::Debug for OperationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationInfo")
            .field("left", &self.left)
            .field("right", &self.right)
            .field("return_type", &self.return_type)
            .finish()
    }
}

/// A difference operation between two values of one type
#[derive(Clone)]
pub struct DifferenceInfo {
    operand_type: TypeInfo,
    return_type: TypeInfo,
    operation: Operation,
}

impl DifferenceInfo {
    /// Create a new difference info
    pub fn new<F>(operand_type: TypeInfo, return_type: TypeInfo, operation: F) -> Self
    where
        F: Fn(&Value, &Value) -> Option<Value> + Send + Sync + 'static,
    {
        Self {
            operand_type,
            return_type,
            operation: Arc::new(operation),
        }
    }

    /// Type of both operands
    pub fn operand_type(&self) -> TypeInfo {
        self.operand_type
    }

    /// Declared result type
    pub fn return_type(&self) -> TypeInfo {
        self.return_type
    }

    /// Apply the difference operation
    pub fn calculate(&self, left: &Value, right: &Value) -> Option<Value> {
        (self.operation)(left, right)
    }
}

impl fmt::Debug for DifferenceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DifferenceInfo")
            .field("operand_type", &self.operand_type)
            .field("return_type", &self.return_type)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConverterRegistry;

    fn decimal_sum() -> OperationInfo {
        OperationInfo::new(
            TypeInfo::Decimal,
            TypeInfo::Decimal,
            TypeInfo::Decimal,
            |l, r| Some(Value::Decimal(l.as_f64()? + r.as_f64()?)),
        )
    }

    #[test]
    fn test_accepts_and_matches() {
        let info = OperationInfo::new(TypeInfo::Number, TypeInfo::Number, TypeInfo::Number, |l, _| {
            Some(l.clone())
        });
        assert!(info.accepts(&TypeInfo::Integer, &TypeInfo::Decimal));
        assert!(!info.accepts(&TypeInfo::String, &TypeInfo::Integer));
        assert!(info.matches_exactly(&TypeInfo::Number, &TypeInfo::Number));
        assert!(!info.matches_exactly(&TypeInfo::Integer, &TypeInfo::Number));
    }

    #[test]
    fn test_get_converted() {
        let converter: Arc<dyn Converter> = Arc::new(ConverterRegistry::with_defaults());
        let info = decimal_sum();

        let converted = info
            .get_converted(TypeInfo::Integer, TypeInfo::Boolean, TypeInfo::Number, &converter)
            .expect("Integer and Boolean both convert to Decimal");
        assert_eq!(converted.left(), TypeInfo::Integer);
        assert_eq!(converted.right(), TypeInfo::Boolean);
        assert_eq!(converted.return_type(), TypeInfo::Number);
        assert_eq!(
            converted.calculate(&Value::Integer(2), &Value::Boolean(true)),
            Some(Value::Decimal(3.0))
        );
    }

    #[test]
    fn test_get_converted_requires_every_converter() {
        let converter: Arc<dyn Converter> = Arc::new(ConverterRegistry::with_defaults());
        let info = decimal_sum();

        assert!(info
            .get_converted(TypeInfo::String, TypeInfo::Integer, TypeInfo::Decimal, &converter)
            .is_none());
        assert!(info
            .get_converted(TypeInfo::Integer, TypeInfo::Integer, TypeInfo::Integer, &converter)
            .is_none());
        assert!(info
            .get_converted(TypeInfo::Unknown, TypeInfo::Integer, TypeInfo::Decimal, &converter)
            .is_none());
    }
}
