//! Registration, exact lookup and converter-based synthesis on a host-built registry

mod common;

use common::chain;
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use script_arithmetic::registry::RegistryPhase;
use script_arithmetic::{
    ArithmeticExpression, Arithmetics, CacheConfig, ConverterRegistry, EvaluationContext,
    ExpressionOperand, Operator, ParseError, RegistrationError, TypeInfo, Value, parse_chain,
};
use std::sync::Arc;

fn add(l: &Value, r: &Value) -> Option<Value> {
    Some(Value::Integer(l.as_i64()? + r.as_i64()?))
}

fn divide(l: &Value, r: &Value) -> Option<Value> {
    Some(Value::Decimal(l.as_f64()? / r.as_f64()?))
}

/// Integers only: `+` yields integers, `/` yields decimals
fn open_registry() -> Arithmetics {
    let registry = Arithmetics::new(
        CacheConfig::testing(),
        Arc::new(ConverterRegistry::with_defaults()),
    );
    registry
        .register_same_type_operation(Operator::Addition, TypeInfo::Integer, add)
        .unwrap();
    registry
        .register_operation(
            Operator::Division,
            TypeInfo::Integer,
            TypeInfo::Integer,
            TypeInfo::Decimal,
            divide,
        )
        .unwrap();
    registry
        .register_default_value(TypeInfo::Integer, || Value::Integer(0))
        .unwrap();
    registry
}

#[fixture]
fn registry() -> Arc<Arithmetics> {
    let registry = open_registry();
    registry.freeze();
    Arc::new(registry)
}

#[rstest]
fn test_exact_lookup_is_stable(registry: Arc<Arithmetics>) {
    let first = registry
        .get_operation_info(Operator::Addition, TypeInfo::Integer, TypeInfo::Integer)
        .unwrap();
    let second = registry
        .get_operation_info(Operator::Addition, TypeInfo::Integer, TypeInfo::Integer)
        .unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.left(), TypeInfo::Integer);
    assert_eq!(first.right(), TypeInfo::Integer);
    assert_eq!(first.return_type(), TypeInfo::Integer);

    let stats = registry.cache_stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
}

#[test]
fn test_duplicate_registration_fails() {
    let registry = open_registry();
    let err = registry
        .register_same_type_operation(Operator::Addition, TypeInfo::Integer, add)
        .unwrap_err();
    assert_eq!(
        err,
        RegistrationError::DuplicateOperation {
            operator: Operator::Addition,
            left: TypeInfo::Integer,
            right: TypeInfo::Integer,
        }
    );
    assert!(registry.is_accepting_registrations());
}

#[test]
fn test_registration_after_freeze_fails() {
    let registry = open_registry();
    registry.freeze();
    registry.freeze();
    assert_eq!(registry.phase(), RegistryPhase::Frozen);

    let err = registry
        .register_same_type_operation(Operator::Subtraction, TypeInfo::Integer, add)
        .unwrap_err();
    assert_eq!(err, RegistrationError::RegistrationClosed);
}

#[test]
#[should_panic(expected = "cannot be retrieved until the arithmetic registry has been frozen")]
fn test_lookup_before_freeze_panics() {
    let registry = open_registry();
    registry.get_operation_info(Operator::Addition, TypeInfo::Integer, TypeInfo::Integer);
}

#[rstest]
fn test_conversion_synthesizes_operation(registry: Arc<Arithmetics>) {
    assert!(
        registry
            .get_operation_info(Operator::Addition, TypeInfo::Boolean, TypeInfo::Integer)
            .is_none()
    );

    let synthesized = registry
        .lookup_operation_info(Operator::Addition, TypeInfo::Boolean, TypeInfo::Integer)
        .unwrap();
    assert_eq!(synthesized.left(), TypeInfo::Boolean);
    assert_eq!(synthesized.right(), TypeInfo::Integer);
    assert_eq!(
        synthesized.calculate(&Value::Boolean(true), &Value::Integer(4)),
        Some(Value::Integer(5))
    );

    assert!(
        registry
            .lookup_operation_info(Operator::Addition, TypeInfo::String, TypeInfo::Integer)
            .is_none()
    );
}

#[rstest]
fn test_conversion_to_requested_return_type(registry: Arc<Arithmetics>) {
    let info = registry
        .lookup_operation_info_returning(
            Operator::Addition,
            TypeInfo::Integer,
            TypeInfo::Integer,
            TypeInfo::Decimal,
        )
        .unwrap();
    assert_eq!(info.return_type(), TypeInfo::Decimal);
    assert_eq!(
        info.calculate(&Value::Integer(3), &Value::Integer(4)),
        Some(Value::Decimal(7.0))
    );

    // no converter turns a decimal back into an integer
    assert!(
        registry
            .lookup_operation_info_returning(
                Operator::Division,
                TypeInfo::Integer,
                TypeInfo::Integer,
                TypeInfo::Integer,
            )
            .is_none()
    );
}

#[rstest]
fn test_integer_addition_end_to_end(registry: Arc<Arithmetics>) {
    let expr = ArithmeticExpression::new(
        Arc::clone(&registry),
        ExpressionOperand::literal(3i64),
        Operator::Addition,
        ExpressionOperand::literal(4i64),
    )
    .unwrap();
    assert_eq!(expr.return_type(), TypeInfo::Integer);
    assert_eq!(expr.get(&EvaluationContext::new()), Some(Value::Integer(7)));
}

#[rstest]
fn test_integer_division_end_to_end(registry: Arc<Arithmetics>) {
    let expr = ArithmeticExpression::new(
        Arc::clone(&registry),
        ExpressionOperand::literal(7i64),
        Operator::Division,
        ExpressionOperand::literal(2i64),
    )
    .unwrap();
    assert_eq!(expr.return_type(), TypeInfo::Decimal);
    assert_eq!(expr.get(&EvaluationContext::new()), Some(Value::Decimal(3.5)));
}

#[rstest]
fn test_missing_operation_fails_expression(registry: Arc<Arithmetics>) {
    let err = ArithmeticExpression::new(
        Arc::clone(&registry),
        ExpressionOperand::literal("a"),
        Operator::Addition,
        ExpressionOperand::literal(1i64),
    )
    .unwrap_err();
    assert_eq!(
        err,
        ParseError::NoOperation {
            operator: Operator::Addition,
            left: TypeInfo::String,
            right: TypeInfo::Integer,
        }
    );
}

#[rstest]
fn test_default_value_for_erased_operand(registry: Arc<Arithmetics>) {
    let tree = parse_chain(&registry, &chain("$missing + 5")).unwrap();
    assert_eq!(
        tree.evaluate(&registry, &EvaluationContext::new()),
        Some(Value::Integer(5))
    );
}

#[rstest]
fn test_operator_sets(registry: Arc<Arithmetics>) {
    let operators: Vec<Operator> = registry.all_operators().into_iter().collect();
    assert_eq!(operators, vec![Operator::Addition, Operator::Division]);

    let return_types: Vec<TypeInfo> = registry
        .all_return_types(Operator::Division)
        .into_iter()
        .collect();
    assert_eq!(return_types, vec![TypeInfo::Decimal]);
    assert!(registry.all_return_types(Operator::Exponentiation).is_empty());
}
