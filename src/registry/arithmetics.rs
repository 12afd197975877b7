//! The arithmetic operation registry
//!
//! [`Arithmetics`] owns three tables: binary operations per operator,
//! difference operations per type and default values per type. It has two
//! phases. While open it accepts registrations and refuses lookups; once
//! frozen it refuses registrations and answers lookups, memoizing them.

use indexmap::{IndexMap, IndexSet};
use log::{debug, trace};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

use super::cache::{CacheConfig, CacheSnapshot, LookupCache};
use super::error::{RegistrationError, RegistrationResult};
use super::operation::{DefaultValueSupplier, DifferenceInfo, OperandTypes, OperationInfo};
use super::operator::Operator;
use crate::model::{Converter, ConverterRegistry, TypeInfo, Value};

/// Lifecycle phase of a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryPhase {
    /// Accepting registrations; lookups are a contract violation
    Open,
    /// Registrations closed; lookups allowed
    Frozen,
}

type OperationKey = (Operator, OperandTypes);

/// Registry of arithmetic operations, differences and default values
pub struct Arithmetics {
    phase: RwLock<RegistryPhase>,
    operations: RwLock<FxHashMap<Operator, Vec<Arc<OperationInfo>>>>,
    differences: RwLock<IndexMap<TypeInfo, Arc<DifferenceInfo>>>,
    default_values: RwLock<IndexMap<TypeInfo, DefaultValueSupplier>>,

    cached_operations: LookupCache<OperationKey, Arc<OperationInfo>>,
    cached_converted_operations: LookupCache<OperationKey, Arc<OperationInfo>>,
    cached_differences: LookupCache<TypeInfo, Arc<DifferenceInfo>>,
    cached_default_values: LookupCache<TypeInfo, DefaultValueSupplier>,

    converter: Arc<dyn Converter>,
}

impl fmt::Debug for Arithmetics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arithmetics")
            .field("phase", &*self.phase.read())
            .field(
                "operations",
                &self.operations.read().values().map(Vec::len).sum::<usize>(),
            )
            .field("differences", &self.differences.read().len())
            .field("default_values", &self.default_values.read().len())
            .finish()
    }
}

impl Default for Arithmetics {
    fn default() -> Self {
        Self::new(
            CacheConfig::default(),
            Arc::new(ConverterRegistry::with_defaults()),
        )
    }
}

impl Arithmetics {
    /// Create an empty, open registry
    pub fn new(config: CacheConfig, converter: Arc<dyn Converter>) -> Self {
        Self {
            phase: RwLock::new(RegistryPhase::Open),
            operations: RwLock::new(FxHashMap::default()),
            differences: RwLock::new(IndexMap::new()),
            default_values: RwLock::new(IndexMap::new()),
            cached_operations: LookupCache::new(&config),
            cached_converted_operations: LookupCache::new(&config),
            cached_differences: LookupCache::new(&config),
            cached_default_values: LookupCache::new(&config),
            converter,
        }
    }

    /// Frozen registry holding the built-in operations
    ///
    /// Hosts that register their own operations should use [`Arithmetics::new`],
    /// call [`register_default_operations`](super::defaults::register_default_operations)
    /// and then [`freeze`](Arithmetics::freeze) themselves.
    pub fn standard() -> RegistrationResult<Self> {
        let registry = Self::default();
        super::defaults::register_default_operations(&registry)?;
        registry.freeze();
        Ok(registry)
    }

    /// The converter service used for operation synthesis
    pub fn converter(&self) -> &Arc<dyn Converter> {
        &self.converter
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> RegistryPhase {
        *self.phase.read()
    }

    /// Check if registrations are still accepted
    pub fn is_accepting_registrations(&self) -> bool {
        self.phase() == RegistryPhase::Open
    }

    /// End the registration phase; calling it again has no effect
    pub fn freeze(&self) {
        let mut phase = self.phase.write();
        if *phase == RegistryPhase::Frozen {
            return;
        }
        *phase = RegistryPhase::Frozen;
        debug!(
            "Arithmetic registry frozen with {} operations over {} operators, {} differences, {} default values",
            self.operations.read().values().map(Vec::len).sum::<usize>(),
            self.operations.read().len(),
            self.differences.read().len(),
            self.default_values.read().len()
        );
    }

    #[track_caller]
    fn assert_frozen(&self, what: &str) {
        if self.is_accepting_registrations() {
            panic!("{what} cannot be retrieved until the arithmetic registry has been frozen");
        }
    }

    // ---- registration ----

    /// Register a binary operation
    pub fn register_operation<F>(
        &self,
        operator: Operator,
        left: TypeInfo,
        right: TypeInfo,
        return_type: TypeInfo,
        operation: F,
    ) -> RegistrationResult
    where
        F: Fn(&Value, &Value) -> Option<Value> + Send + Sync + 'static,
    {
        let phase = self.phase.read();
        if *phase == RegistryPhase::Frozen {
            return Err(RegistrationError::RegistrationClosed);
        }
        if left.is_unknown() || right.is_unknown() {
            return Err(RegistrationError::ErasedType { what: "an operation" });
        }

        let mut operations = self.operations.write();
        let infos = operations.entry(operator).or_default();
        if infos.iter().any(|info| info.matches_exactly(&left, &right)) {
            return Err(RegistrationError::DuplicateOperation {
                operator,
                left,
                right,
            });
        }

        trace!("Registered {left} {operator} {right} -> {return_type}");
        infos.push(Arc::new(OperationInfo::new(
            left,
            right,
            return_type,
            operation,
        )));
        Ok(())
    }

    /// Register an operation whose operands and result share one type
    pub fn register_same_type_operation<F>(
        &self,
        operator: Operator,
        value_type: TypeInfo,
        operation: F,
    ) -> RegistrationResult
    where
        F: Fn(&Value, &Value) -> Option<Value> + Send + Sync + 'static,
    {
        self.register_operation(operator, value_type, value_type, value_type, operation)
    }

    /// Register an operation returning its left operand's type
    pub fn register_left_operation<F>(
        &self,
        operator: Operator,
        left: TypeInfo,
        right: TypeInfo,
        operation: F,
    ) -> RegistrationResult
    where
        F: Fn(&Value, &Value) -> Option<Value> + Send + Sync + 'static,
    {
        self.register_operation(operator, left, right, left, operation)
    }

    /// Register an operation for `(left, right)` and its counterpart for `(right, left)`
    pub fn register_commutative_operation<F, G>(
        &self,
        operator: Operator,
        left: TypeInfo,
        right: TypeInfo,
        return_type: TypeInfo,
        operation: F,
        commutative_operation: G,
    ) -> RegistrationResult
    where
        F: Fn(&Value, &Value) -> Option<Value> + Send + Sync + 'static,
        G: Fn(&Value, &Value) -> Option<Value> + Send + Sync + 'static,
    {
        self.register_operation(operator, left, right, return_type, operation)?;
        self.register_operation(operator, right, left, return_type, commutative_operation)
    }

    /// Register a difference operation for values of `operand_type`
    pub fn register_difference<F>(
        &self,
        operand_type: TypeInfo,
        return_type: TypeInfo,
        operation: F,
    ) -> RegistrationResult
    where
        F: Fn(&Value, &Value) -> Option<Value> + Send + Sync + 'static,
    {
        let phase = self.phase.read();
        if *phase == RegistryPhase::Frozen {
            return Err(RegistrationError::RegistrationClosed);
        }
        if operand_type.is_unknown() {
            return Err(RegistrationError::ErasedType { what: "a difference" });
        }

        let mut differences = self.differences.write();
        if differences.contains_key(&operand_type) {
            return Err(RegistrationError::DuplicateDifference { operand_type });
        }
        differences.insert(
            operand_type,
            Arc::new(DifferenceInfo::new(operand_type, return_type, operation)),
        );
        Ok(())
    }

    /// Register the default value substituted for absent operands of `value_type`
    pub fn register_default_value<F>(&self, value_type: TypeInfo, supplier: F) -> RegistrationResult
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        let phase = self.phase.read();
        if *phase == RegistryPhase::Frozen {
            return Err(RegistrationError::RegistrationClosed);
        }
        if value_type.is_unknown() {
            return Err(RegistrationError::ErasedType { what: "a default value" });
        }

        let mut default_values = self.default_values.write();
        if default_values.contains_key(&value_type) {
            return Err(RegistrationError::DuplicateDefaultValue { value_type });
        }
        default_values.insert(value_type, Arc::new(supplier));
        Ok(())
    }

    // ---- operations ----

    /// Check if an operation with exactly these operand types is registered
    ///
    /// Usable in both phases.
    pub fn exact_operation_exists(&self, operator: Operator, left: TypeInfo, right: TypeInfo) -> bool {
        self.operations
            .read()
            .get(&operator)
            .is_some_and(|infos| infos.iter().any(|info| info.matches_exactly(&left, &right)))
    }

    /// Check if an operation accepting these operand types exists
    pub fn operation_exists(&self, operator: Operator, left: TypeInfo, right: TypeInfo) -> bool {
        self.get_operation_info(operator, left, right).is_some()
    }

    /// All operations registered for `operator`, in registration order
    ///
    /// # Panics
    ///
    /// Panics if the registry has not been frozen.
    pub fn get_operations(&self, operator: Operator) -> Vec<Arc<OperationInfo>> {
        self.assert_frozen("Operations");
        self.raw_operations(operator)
    }

    fn raw_operations(&self, operator: Operator) -> Vec<Arc<OperationInfo>> {
        self.operations
            .read()
            .get(&operator)
            .cloned()
            .unwrap_or_default()
    }

    /// Operations whose left type is assignable from `left`, without conversion
    pub fn get_operations_for(&self, operator: Operator, left: TypeInfo) -> Vec<Arc<OperationInfo>> {
        self.get_operations(operator)
            .into_iter()
            .filter(|info| info.left().is_assignable_from(&left))
            .collect()
    }

    /// Find the operation accepting the given operand types, without conversion
    ///
    /// An operation declared for exactly these types wins over one that only
    /// accepts them through assignability. Results, including misses, are cached.
    ///
    /// # Panics
    ///
    /// Panics if the registry has not been frozen.
    pub fn get_operation_info(
        &self,
        operator: Operator,
        left: TypeInfo,
        right: TypeInfo,
    ) -> Option<Arc<OperationInfo>> {
        self.assert_frozen("Operations");
        let key = (operator, OperandTypes::new(left, right));
        self.cached_operations.get_or_compute(key, || {
            let mut best: Option<Arc<OperationInfo>> = None;
            for info in self.raw_operations(operator) {
                if !info.accepts(&left, &right) {
                    continue;
                }
                if best.is_none() || info.matches_exactly(&left, &right) {
                    best = Some(info);
                }
            }
            best
        })
    }

    /// As [`get_operation_info`](Self::get_operation_info), but only if the
    /// operation's result is assignable to `return_type`
    pub fn get_operation_info_returning(
        &self,
        operator: Operator,
        left: TypeInfo,
        right: TypeInfo,
        return_type: TypeInfo,
    ) -> Option<Arc<OperationInfo>> {
        self.get_operation_info(operator, left, right)
            .filter(|info| return_type.is_assignable_from(&info.return_type()))
    }

    /// Find an operation for the given operand types, synthesizing one through
    /// converters if none accepts them directly
    ///
    /// The first registered operation that can be converted wins. Results,
    /// including misses, are cached.
    ///
    /// # Panics
    ///
    /// Panics if the registry has not been frozen.
    pub fn lookup_operation_info(
        &self,
        operator: Operator,
        left: TypeInfo,
        right: TypeInfo,
    ) -> Option<Arc<OperationInfo>> {
        if let Some(info) = self.get_operation_info(operator, left, right) {
            return Some(info);
        }

        let key = (operator, OperandTypes::new(left, right));
        self.cached_converted_operations.get_or_compute(key, || {
            let converted = self.raw_operations(operator).iter().find_map(|info| {
                info.get_converted(left, right, info.return_type(), &self.converter)
            })?;
            debug!(
                "Synthesized {left} {operator} {right} -> {} through converters",
                converted.return_type()
            );
            Some(Arc::new(converted))
        })
    }

    /// As [`lookup_operation_info`](Self::lookup_operation_info), converting
    /// the result to `return_type`
    pub fn lookup_operation_info_returning(
        &self,
        operator: Operator,
        left: TypeInfo,
        right: TypeInfo,
        return_type: TypeInfo,
    ) -> Option<Arc<OperationInfo>> {
        let info = self.lookup_operation_info(operator, left, right)?;
        if info.matches_exactly(&left, &right) && info.return_type() == return_type {
            return Some(info);
        }
        info.get_converted(left, right, return_type, &self.converter)
            .map(Arc::new)
    }

    /// Operations usable with a left operand of type `left`, directly or
    /// through conversion
    pub fn lookup_left_operations(&self, operator: Operator, left: TypeInfo) -> Vec<Arc<OperationInfo>> {
        self.get_operations(operator)
            .into_iter()
            .filter_map(|info| {
                if info.left().is_assignable_from(&left) {
                    return Some(info);
                }
                info.get_converted(left, info.right(), info.return_type(), &self.converter)
                    .map(Arc::new)
            })
            .collect()
    }

    /// Operations usable with a right operand of type `right`, directly or
    /// through conversion
    pub fn lookup_right_operations(
        &self,
        operator: Operator,
        right: TypeInfo,
    ) -> Vec<Arc<OperationInfo>> {
        self.get_operations(operator)
            .into_iter()
            .filter_map(|info| {
                if info.right().is_assignable_from(&right) {
                    return Some(info);
                }
                info.get_converted(info.left(), right, info.return_type(), &self.converter)
                    .map(Arc::new)
            })
            .collect()
    }

    /// Every result type an operation of `operator` may produce
    pub fn all_return_types(&self, operator: Operator) -> IndexSet<TypeInfo> {
        self.operations
            .read()
            .get(&operator)
            .map(|infos| infos.iter().map(|info| info.return_type()).collect())
            .unwrap_or_default()
    }

    /// Operators with at least one registered operation, ordered by priority
    pub fn all_operators(&self) -> IndexSet<Operator> {
        let mut operators: Vec<Operator> = self
            .operations
            .read()
            .iter()
            .filter(|(_, infos)| !infos.is_empty())
            .map(|(operator, _)| *operator)
            .collect();
        operators.sort();
        operators.into_iter().collect()
    }

    /// Apply the operation matching the runtime types of both values,
    /// provided its result is assignable to `return_type`
    pub fn calculate(
        &self,
        operator: Operator,
        left: &Value,
        right: &Value,
        return_type: TypeInfo,
    ) -> Option<Value> {
        self.get_operation_info_returning(operator, left.type_info(), right.type_info(), return_type)?
            .calculate(left, right)
    }

    /// Apply the operation matching the runtime types of both values,
    /// whatever its result type
    pub fn calculate_unchecked(&self, operator: Operator, left: &Value, right: &Value) -> Option<Value> {
        self.get_operation_info(operator, left.type_info(), right.type_info())?
            .calculate(left, right)
    }

    // ---- differences ----

    /// Check if a difference for exactly `operand_type` is registered
    ///
    /// Usable in both phases.
    pub fn exact_difference_exists(&self, operand_type: TypeInfo) -> bool {
        self.differences.read().contains_key(&operand_type)
    }

    /// Check if a difference accepting `operand_type` exists
    pub fn difference_exists(&self, operand_type: TypeInfo) -> bool {
        self.get_difference_info(operand_type).is_some()
    }

    /// Find the difference accepting values of `operand_type`
    ///
    /// # Panics
    ///
    /// Panics if the registry has not been frozen.
    pub fn get_difference_info(&self, operand_type: TypeInfo) -> Option<Arc<DifferenceInfo>> {
        self.assert_frozen("Differences");
        self.cached_differences.get_or_compute(operand_type, || {
            let differences = self.differences.read();
            if let Some(info) = differences.get(&operand_type) {
                return Some(Arc::clone(info));
            }
            differences
                .iter()
                .find(|(ty, _)| ty.is_assignable_from(&operand_type))
                .map(|(_, info)| Arc::clone(info))
        })
    }

    /// As [`get_difference_info`](Self::get_difference_info), but only if the
    /// result is assignable to `return_type`
    pub fn get_difference_info_returning(
        &self,
        operand_type: TypeInfo,
        return_type: TypeInfo,
    ) -> Option<Arc<DifferenceInfo>> {
        self.get_difference_info(operand_type)
            .filter(|info| return_type.is_assignable_from(&info.return_type()))
    }

    /// Difference between two values, provided its result is assignable to `return_type`
    pub fn difference(&self, left: &Value, right: &Value, return_type: TypeInfo) -> Option<Value> {
        self.get_difference_info_returning(left.type_info(), return_type)?
            .calculate(left, right)
    }

    /// Difference between two values, whatever its result type
    pub fn difference_unchecked(&self, left: &Value, right: &Value) -> Option<Value> {
        self.get_difference_info(left.type_info())?
            .calculate(left, right)
    }

    // ---- default values ----

    /// Default value for `value_type`, or for the first registered type it is
    /// assignable to
    ///
    /// # Panics
    ///
    /// Panics if the registry has not been frozen.
    pub fn get_default_value(&self, value_type: TypeInfo) -> Option<Value> {
        self.assert_frozen("Default values");
        let supplier = self.cached_default_values.get_or_compute(value_type, || {
            let default_values = self.default_values.read();
            if let Some(supplier) = default_values.get(&value_type) {
                return Some(Arc::clone(supplier));
            }
            default_values
                .iter()
                .find(|(ty, _)| ty.is_assignable_from(&value_type))
                .map(|(_, supplier)| Arc::clone(supplier))
        })?;
        Some(supplier())
    }

    // ---- caches ----

    /// Combined statistics of every lookup cache
    pub fn cache_stats(&self) -> CacheSnapshot {
        self.cached_operations
            .stats()
            .snapshot()
            .merge(self.cached_converted_operations.stats().snapshot())
            .merge(self.cached_differences.stats().snapshot())
            .merge(self.cached_default_values.stats().snapshot())
    }

    /// Drop every memoized lookup result
    pub fn clear_caches(&self) {
        self.cached_operations.clear();
        self.cached_converted_operations.clear();
        self.cached_differences.clear();
        self.cached_default_values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_sum(l: &Value, r: &Value) -> Option<Value> {
        Some(Value::Integer(l.as_i64()? + r.as_i64()?))
    }

    fn registry() -> Arithmetics {
        Arithmetics::new(
            CacheConfig::testing(),
            Arc::new(ConverterRegistry::with_defaults()),
        )
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let registry = registry();
        registry
            .register_same_type_operation(Operator::Addition, TypeInfo::Integer, int_sum)
            .unwrap();

        let err = registry
            .register_same_type_operation(Operator::Addition, TypeInfo::Integer, int_sum)
            .unwrap_err();
        assert_eq!(
            err,
            RegistrationError::DuplicateOperation {
                operator: Operator::Addition,
                left: TypeInfo::Integer,
                right: TypeInfo::Integer,
            }
        );
        assert!(registry.exact_operation_exists(Operator::Addition, TypeInfo::Integer, TypeInfo::Integer));
    }

    #[test]
    fn test_registration_closed_after_freeze() {
        let registry = registry();
        registry.freeze();
        registry.freeze();
        assert!(!registry.is_accepting_registrations());
        assert_eq!(
            registry.register_same_type_operation(Operator::Addition, TypeInfo::Integer, int_sum),
            Err(RegistrationError::RegistrationClosed)
        );
        assert_eq!(
            registry.register_default_value(TypeInfo::Integer, || Value::Integer(0)),
            Err(RegistrationError::RegistrationClosed)
        );
    }

    #[test]
    fn test_erased_type_rejected() {
        let registry = registry();
        assert!(matches!(
            registry.register_same_type_operation(Operator::Addition, TypeInfo::Unknown, int_sum),
            Err(RegistrationError::ErasedType { .. })
        ));
    }

    #[test]
    #[should_panic(expected = "cannot be retrieved until the arithmetic registry has been frozen")]
    fn test_lookup_before_freeze_panics() {
        let registry = registry();
        registry.get_operation_info(Operator::Addition, TypeInfo::Integer, TypeInfo::Integer);
    }

    #[test]
    fn test_exact_match_preferred() {
        let registry = registry();
        registry
            .register_same_type_operation(Operator::Addition, TypeInfo::Number, |_, _| {
                Some(Value::from("number"))
            })
            .unwrap();
        registry
            .register_same_type_operation(Operator::Addition, TypeInfo::Integer, |_, _| {
                Some(Value::from("integer"))
            })
            .unwrap();
        registry.freeze();

        let info = registry
            .get_operation_info(Operator::Addition, TypeInfo::Integer, TypeInfo::Integer)
            .unwrap();
        assert_eq!(info.left(), TypeInfo::Integer);

        let info = registry
            .get_operation_info(Operator::Addition, TypeInfo::Decimal, TypeInfo::Integer)
            .unwrap();
        assert_eq!(info.left(), TypeInfo::Number);
    }

    #[test]
    fn test_lookup_is_cached() {
        let registry = registry();
        registry
            .register_same_type_operation(Operator::Addition, TypeInfo::Integer, int_sum)
            .unwrap();
        registry.freeze();

        let first = registry
            .get_operation_info(Operator::Addition, TypeInfo::Integer, TypeInfo::Integer)
            .unwrap();
        let second = registry
            .get_operation_info(Operator::Addition, TypeInfo::Integer, TypeInfo::Integer)
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        assert!(registry
            .get_operation_info(Operator::Addition, TypeInfo::String, TypeInfo::Integer)
            .is_none());
        assert!(registry
            .get_operation_info(Operator::Addition, TypeInfo::String, TypeInfo::Integer)
            .is_none());

        let stats = registry.cache_stats();
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.hits, 2);

        registry.clear_caches();
        registry.get_operation_info(Operator::Addition, TypeInfo::Integer, TypeInfo::Integer);
        assert_eq!(registry.cache_stats().misses, 3);
    }

    #[test]
    fn test_conversion_synthesis() {
        let registry = registry();
        registry
            .register_same_type_operation(Operator::Multiplication, TypeInfo::Decimal, |l, r| {
                Some(Value::Decimal(l.as_f64()? * r.as_f64()?))
            })
            .unwrap();
        registry.freeze();

        assert!(registry
            .get_operation_info(Operator::Multiplication, TypeInfo::Integer, TypeInfo::Integer)
            .is_none());
        let info = registry
            .lookup_operation_info(Operator::Multiplication, TypeInfo::Integer, TypeInfo::Integer)
            .unwrap();
        assert!(info.matches_exactly(&TypeInfo::Integer, &TypeInfo::Integer));
        assert_eq!(info.return_type(), TypeInfo::Decimal);
        assert_eq!(
            info.calculate(&Value::Integer(3), &Value::Integer(4)),
            Some(Value::Decimal(12.0))
        );

        let again = registry
            .lookup_operation_info(Operator::Multiplication, TypeInfo::Integer, TypeInfo::Integer)
            .unwrap();
        assert!(Arc::ptr_eq(&info, &again));

        assert!(registry
            .lookup_operation_info(Operator::Multiplication, TypeInfo::String, TypeInfo::Integer)
            .is_none());
        assert!(registry
            .lookup_operation_info(Operator::Multiplication, TypeInfo::Unknown, TypeInfo::Integer)
            .is_none());
    }

    #[test]
    fn test_side_lookups_and_return_types() {
        let registry = registry();
        registry
            .register_left_operation(Operator::Division, TypeInfo::Timespan, TypeInfo::Number, |l, _| {
                Some(l.clone())
            })
            .unwrap();
        registry
            .register_operation(
                Operator::Division,
                TypeInfo::Timespan,
                TypeInfo::Timespan,
                TypeInfo::Number,
                |_, _| Some(Value::Decimal(1.0)),
            )
            .unwrap();
        registry.freeze();

        let left = registry.lookup_left_operations(Operator::Division, TypeInfo::Timespan);
        assert_eq!(left.len(), 2);
        let right = registry.lookup_right_operations(Operator::Division, TypeInfo::Integer);
        assert_eq!(right.len(), 1);
        assert_eq!(right[0].return_type(), TypeInfo::Timespan);
        assert!(registry
            .lookup_left_operations(Operator::Division, TypeInfo::Unknown)
            .is_empty());

        let return_types: Vec<_> = registry
            .all_return_types(Operator::Division)
            .into_iter()
            .collect();
        assert_eq!(return_types, vec![TypeInfo::Timespan, TypeInfo::Number]);
        assert!(registry.all_return_types(Operator::Addition).is_empty());
    }

    #[test]
    fn test_operations_for_left_type() {
        let registry = registry();
        registry
            .register_same_type_operation(Operator::Addition, TypeInfo::Number, int_sum)
            .unwrap();
        registry
            .register_same_type_operation(Operator::Addition, TypeInfo::Integer, int_sum)
            .unwrap();
        registry
            .register_same_type_operation(Operator::Addition, TypeInfo::String, |_, _| None)
            .unwrap();
        registry.freeze();

        let lefts: Vec<_> = registry
            .get_operations_for(Operator::Addition, TypeInfo::Integer)
            .iter()
            .map(|info| info.left())
            .collect();
        assert_eq!(lefts, vec![TypeInfo::Number, TypeInfo::Integer]);

        let lefts: Vec<_> = registry
            .get_operations_for(Operator::Addition, TypeInfo::Decimal)
            .iter()
            .map(|info| info.left())
            .collect();
        assert_eq!(lefts, vec![TypeInfo::Number]);

        // Boolean converts to Integer, but this lookup never converts
        assert!(registry
            .get_operations_for(Operator::Addition, TypeInfo::Boolean)
            .is_empty());
        assert!(registry
            .get_operations_for(Operator::Subtraction, TypeInfo::Integer)
            .is_empty());
    }

    #[test]
    fn test_all_operators_sorted() {
        let registry = registry();
        for operator in [Operator::Exponentiation, Operator::Subtraction, Operator::Division] {
            registry
                .register_same_type_operation(operator, TypeInfo::Integer, int_sum)
                .unwrap();
        }
        let operators: Vec<_> = registry.all_operators().into_iter().collect();
        assert_eq!(
            operators,
            vec![Operator::Subtraction, Operator::Division, Operator::Exponentiation]
        );
    }

    #[test]
    fn test_differences_and_defaults() {
        let registry = registry();
        registry
            .register_difference(TypeInfo::Number, TypeInfo::Number, |l, r| {
                Some(Value::Decimal((l.as_f64()? - r.as_f64()?).abs()))
            })
            .unwrap();
        registry
            .register_default_value(TypeInfo::Number, || Value::Integer(0))
            .unwrap();
        assert!(matches!(
            registry.register_difference(TypeInfo::Number, TypeInfo::Number, |_, _| None),
            Err(RegistrationError::DuplicateDifference { .. })
        ));
        registry.freeze();

        assert!(registry.exact_difference_exists(TypeInfo::Number));
        assert!(!registry.exact_difference_exists(TypeInfo::Integer));
        assert!(registry.difference_exists(TypeInfo::Integer));
        assert!(!registry.difference_exists(TypeInfo::String));
        assert_eq!(
            registry.difference(&Value::Integer(2), &Value::Decimal(5.5), TypeInfo::Number),
            Some(Value::Decimal(3.5))
        );
        assert_eq!(
            registry.difference(&Value::Integer(2), &Value::Integer(5), TypeInfo::String),
            None
        );

        assert_eq!(registry.get_default_value(TypeInfo::Decimal), Some(Value::Integer(0)));
        assert_eq!(registry.get_default_value(TypeInfo::String), None);
    }

    #[test]
    fn test_calculate() {
        let registry = registry();
        registry
            .register_same_type_operation(Operator::Addition, TypeInfo::Integer, int_sum)
            .unwrap();
        registry.freeze();

        let (three, four) = (Value::Integer(3), Value::Integer(4));
        assert_eq!(
            registry.calculate(Operator::Addition, &three, &four, TypeInfo::String),
            None
        );
        assert_eq!(
            registry.calculate(Operator::Addition, &three, &four, TypeInfo::Integer),
            Some(Value::Integer(7))
        );
        assert_eq!(
            registry.calculate_unchecked(Operator::Addition, &three, &four),
            Some(Value::Integer(7))
        );
        assert_eq!(
            registry.calculate_unchecked(Operator::Subtraction, &three, &four),
            None
        );
    }
}
