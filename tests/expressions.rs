//! Host-facing expressions built the way a script parser assembles them

use pretty_assertions::assert_eq;
use rstest::rstest;
use script_arithmetic::{
    ArithmeticExpression, Arithmetics, DifferenceExpression, EvaluationContext, ExpressionOperand,
    Literal, Operand, Operator, Timespan, TypeInfo, Value, Variable, create_standard_registry,
};
use std::sync::Arc;

fn binary(
    registry: &Arc<Arithmetics>,
    first: ExpressionOperand,
    operator: Operator,
    second: ExpressionOperand,
) -> ArithmeticExpression {
    ArithmeticExpression::new(Arc::clone(registry), first, operator, second).unwrap()
}

#[test]
fn test_grouped_health_expression() {
    let registry = create_standard_registry().unwrap();
    // (health - 2) / 3
    let inner = binary(
        &registry,
        ExpressionOperand::new(Variable::typed("health", TypeInfo::Decimal)),
        Operator::Subtraction,
        ExpressionOperand::literal(2i64),
    );
    let expr = binary(
        &registry,
        ExpressionOperand::expression(inner).grouped(),
        Operator::Division,
        ExpressionOperand::literal(3i64),
    );
    assert_eq!(expr.to_string(), "({health} - 2) / 3");
    assert_eq!(expr.return_type(), TypeInfo::Decimal);

    let context = EvaluationContext::new().with_variable("health", 20.0f64);
    assert_eq!(expr.get(&context), Some(Value::Decimal(6.0)));

    // a missing health falls back to the numeric default
    assert_eq!(
        expr.get(&EvaluationContext::new()),
        Some(Value::Decimal(-2.0 / 3.0))
    );
}

#[test]
fn test_ungrouped_nesting_respects_precedence() {
    let registry = create_standard_registry().unwrap();
    // 10 - 4 / 2 handed over as (10 - 4) / 2 without parentheses
    let inner = binary(
        &registry,
        ExpressionOperand::literal(10i64),
        Operator::Subtraction,
        ExpressionOperand::literal(4i64),
    );
    let expr = binary(
        &registry,
        ExpressionOperand::expression(inner),
        Operator::Division,
        ExpressionOperand::literal(2i64),
    );
    assert_eq!(expr.gettable().to_string(), "(10 - (4 / 2))");
    assert_eq!(expr.get(&EvaluationContext::new()), Some(Value::Decimal(8.0)));
}

#[rstest]
#[case(Value::Timespan(Timespan::from_seconds(90)), Value::Timespan(Timespan::from_seconds(180)))]
#[case(Value::Integer(4), Value::Integer(8))]
#[case(Value::Decimal(1.25), Value::Decimal(2.5))]
fn test_erased_operand_resolves_per_evaluation(#[case] input: Value, #[case] expected: Value) {
    let registry = create_standard_registry().unwrap();
    let expr = binary(
        &registry,
        ExpressionOperand::new(Variable::new("v")),
        Operator::Multiplication,
        ExpressionOperand::literal(2i64),
    );
    let context = EvaluationContext::new().with_variable("v", input);
    assert_eq!(expr.get(&context), Some(expected));
}

#[test]
fn test_expressions_compose_as_operands() {
    let registry = create_standard_registry().unwrap();
    let sum: Arc<dyn Operand> = Arc::new(binary(
        &registry,
        ExpressionOperand::literal(2i64),
        Operator::Addition,
        ExpressionOperand::literal(3i64),
    ));
    let difference = DifferenceExpression::new(
        Arc::clone(&registry),
        Arc::clone(&sum),
        Arc::new(Literal::new(12i64)),
    )
    .unwrap();
    assert_eq!(difference.to_string(), "difference between 2 + 3 and 12");
    assert_eq!(difference.get(&EvaluationContext::new()), Some(Value::Integer(7)));
    assert_eq!(Arc::new(difference).simplify().to_string(), "7");
}
