//! Type conversion between operand types
//!
//! The arithmetic registry only needs two questions answered by the host's
//! conversion subsystem: whether a converter between two types exists, and
//! what a value looks like after conversion. [`Converter`] is that seam;
//! [`ConverterRegistry`] is the default table-driven implementation.

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

use super::types::TypeInfo;
use super::value::Value;

/// Conversion function from one value to another
pub type ConvertFn = Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>;

/// Conversion service consulted when no exact operation is registered
pub trait Converter: Send + Sync {
    /// Check if values of type `from` can be converted to type `to`
    fn converter_exists(&self, from: &TypeInfo, to: &TypeInfo) -> bool;

    /// Convert a value to the given type, if possible
    fn convert(&self, value: &Value, to: &TypeInfo) -> Option<Value>;
}

#[derive(Clone)]
struct ConverterEntry {
    from: TypeInfo,
    to: TypeInfo,
    convert: ConvertFn,
}

/// Table of registered converters
///
/// Widening to an assignable type never needs an entry: a value is passed
/// through unchanged when its type is already assignable to the target.
#[derive(Default)]
pub struct ConverterRegistry {
    entries: RwLock<Vec<ConverterEntry>>,
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.read();
        f.debug_list()
            .entries(entries.iter().map(|e| format!("{} -> {}", e.from, e.to)))
            .finish()
    }
}

impl ConverterRegistry {
    /// Create an empty converter registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in numeric converters
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register(TypeInfo::Integer, TypeInfo::Decimal, |value| {
            value.as_f64().map(Value::Decimal)
        });
        registry.register(TypeInfo::Boolean, TypeInfo::Integer, |value| match value {
            Value::Boolean(b) => Some(Value::Integer(i64::from(*b))),
            _ => None,
        });
        registry
    }

    /// Register a converter from `from` to `to`
    pub fn register<F>(&self, from: TypeInfo, to: TypeInfo, convert: F)
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        self.entries.write().push(ConverterEntry {
            from,
            to,
            convert: Arc::new(convert),
        });
    }

    fn find(&self, from: &TypeInfo, to: &TypeInfo) -> Option<ConvertFn> {
        self.entries
            .read()
            .iter()
            .find(|entry| entry.from.is_assignable_from(from) && to.is_assignable_from(&entry.to))
            .map(|entry| Arc::clone(&entry.convert))
    }
}

impl Converter for ConverterRegistry {
    fn converter_exists(&self, from: &TypeInfo, to: &TypeInfo) -> bool {
        if to.is_assignable_from(from) {
            return true;
        }
        if from.is_unknown() {
            return false;
        }
        self.find(from, to).is_some()
    }

    fn convert(&self, value: &Value, to: &TypeInfo) -> Option<Value> {
        let from = value.type_info();
        if to.is_assignable_from(&from) {
            return Some(value.clone());
        }
        let convert = self.find(&from, to)?;
        convert(value).filter(|converted| to.is_assignable_from(&converted.type_info()))
    }
}
