//! Built-in operations for numbers, vectors, timespans, dates and strings

use chrono::{DateTime, Utc};

use super::arithmetics::Arithmetics;
use super::error::RegistrationResult;
use super::operator::Operator;
use crate::model::{Timespan, TypeInfo, Value, Vector};

fn vector(value: &Value) -> Option<Vector> {
    match value {
        Value::Vector(v) => Some(*v),
        _ => None,
    }
}

fn timespan(value: &Value) -> Option<Timespan> {
    match value {
        Value::Timespan(t) => Some(*t),
        _ => None,
    }
}

fn date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Date(d) => Some(*d),
        _ => None,
    }
}

fn integers(left: &Value, right: &Value) -> Option<(i64, i64)> {
    Some((left.as_i64()?, right.as_i64()?))
}

fn floats(left: &Value, right: &Value) -> Option<(f64, f64)> {
    Some((left.as_f64()?, right.as_f64()?))
}

/// Integer result when both operands are integral and `int_op` does not
/// overflow, decimal result otherwise
fn integral_or_decimal(
    left: &Value,
    right: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Option<Value> {
    if let Some(result) = integers(left, right).and_then(|(l, r)| int_op(l, r)) {
        return Some(Value::Integer(result));
    }
    let (l, r) = floats(left, right)?;
    Some(Value::Decimal(float_op(l, r)))
}

/// Non-negative, non-NaN scalar of a numeric value
fn scalar(value: &Value) -> Option<f64> {
    value.as_f64().filter(|s| !s.is_nan() && *s >= 0.0)
}

/// Register the built-in operation set into an open registry
pub fn register_default_operations(registry: &Arithmetics) -> RegistrationResult {
    register_number_operations(registry)?;
    register_vector_operations(registry)?;
    register_timespan_operations(registry)?;
    register_date_operations(registry)?;
    register_string_operations(registry)
}

fn register_number_operations(registry: &Arithmetics) -> RegistrationResult {
    let number = TypeInfo::Number;

    registry.register_same_type_operation(Operator::Addition, number, |l, r| {
        integral_or_decimal(l, r, i64::checked_add, |a, b| a + b)
    })?;
    registry.register_same_type_operation(Operator::Subtraction, number, |l, r| {
        integral_or_decimal(l, r, i64::checked_sub, |a, b| a - b)
    })?;
    registry.register_same_type_operation(Operator::Multiplication, number, |l, r| {
        integral_or_decimal(l, r, i64::checked_mul, |a, b| a * b)
    })?;
    registry.register_same_type_operation(Operator::Division, number, |l, r| {
        let (l, r) = floats(l, r)?;
        Some(Value::Decimal(l / r))
    })?;
    registry.register_same_type_operation(Operator::Exponentiation, number, |l, r| {
        let (l, r) = floats(l, r)?;
        Some(Value::Decimal(l.powf(r)))
    })?;

    registry.register_difference(number, number, |l, r| {
        if let Some(diff) = integers(l, r).and_then(|(a, b)| a.checked_sub(b)?.checked_abs()) {
            return Some(Value::Integer(diff));
        }
        let (a, b) = floats(l, r)?;
        Some(Value::Decimal((a - b).abs()))
    })?;
    registry.register_default_value(number, || Value::Integer(0))
}

fn register_vector_operations(registry: &Arithmetics) -> RegistrationResult {
    let vec_op = |f: fn(f64, f64) -> f64| {
        move |l: &Value, r: &Value| Some(Value::Vector(vector(l)?.zip_with(&vector(r)?, f)))
    };

    registry.register_same_type_operation(Operator::Addition, TypeInfo::Vector, vec_op(|a, b| a + b))?;
    registry.register_same_type_operation(Operator::Subtraction, TypeInfo::Vector, vec_op(|a, b| a - b))?;
    registry.register_same_type_operation(
        Operator::Multiplication,
        TypeInfo::Vector,
        vec_op(|a, b| a * b),
    )?;
    registry.register_same_type_operation(Operator::Division, TypeInfo::Vector, vec_op(|a, b| a / b))?;
    registry.register_difference(TypeInfo::Vector, TypeInfo::Vector, vec_op(|a, b| (a - b).abs()))?;
    registry.register_default_value(TypeInfo::Vector, || Value::Vector(Vector::default()))?;

    registry.register_commutative_operation(
        Operator::Multiplication,
        TypeInfo::Vector,
        TypeInfo::Number,
        TypeInfo::Vector,
        |l, r| Some(Value::Vector(vector(l)?.scale(r.as_f64()?))),
        |l, r| Some(Value::Vector(Vector::splat(l.as_f64()?).zip_with(&vector(r)?, |a, b| a * b))),
    )?;
    registry.register_commutative_operation(
        Operator::Division,
        TypeInfo::Vector,
        TypeInfo::Number,
        TypeInfo::Vector,
        |l, r| Some(Value::Vector(vector(l)?.zip_with(&Vector::splat(r.as_f64()?), |a, b| a / b))),
        |l, r| Some(Value::Vector(Vector::splat(l.as_f64()?).zip_with(&vector(r)?, |a, b| a / b))),
    )
}

fn register_timespan_operations(registry: &Arithmetics) -> RegistrationResult {
    let timespan_type = TypeInfo::Timespan;

    registry.register_same_type_operation(Operator::Addition, timespan_type, |l, r| {
        Some(Value::Timespan(timespan(l)?.add(&timespan(r)?)))
    })?;
    registry.register_same_type_operation(Operator::Subtraction, timespan_type, |l, r| {
        Some(Value::Timespan(timespan(l)?.subtract(&timespan(r)?)))
    })?;
    registry.register_operation(
        Operator::Division,
        timespan_type,
        timespan_type,
        TypeInfo::Number,
        |l, r| Some(Value::Decimal(timespan(l)?.divide_by(&timespan(r)?))),
    )?;
    registry.register_difference(timespan_type, timespan_type, |l, r| {
        Some(Value::Timespan(timespan(l)?.difference(&timespan(r)?)))
    })?;
    registry.register_default_value(timespan_type, || Value::Timespan(Timespan::default()))?;

    registry.register_commutative_operation(
        Operator::Multiplication,
        timespan_type,
        TypeInfo::Number,
        timespan_type,
        |l, r| timespan(l)?.multiply(scalar(r)?).map(Value::Timespan),
        |l, r| timespan(r)?.multiply(scalar(l)?).map(Value::Timespan),
    )?;
    registry.register_left_operation(Operator::Division, timespan_type, TypeInfo::Number, |l, r| {
        timespan(l)?.divide(scalar(r)?).map(Value::Timespan)
    })
}

fn register_date_operations(registry: &Arithmetics) -> RegistrationResult {
    registry.register_left_operation(Operator::Addition, TypeInfo::Date, TypeInfo::Timespan, |l, r| {
        date(l)?
            .checked_add_signed(timespan(r)?.to_duration())
            .map(Value::Date)
    })?;
    registry.register_left_operation(
        Operator::Subtraction,
        TypeInfo::Date,
        TypeInfo::Timespan,
        |l, r| {
            date(l)?
                .checked_sub_signed(timespan(r)?.to_duration())
                .map(Value::Date)
        },
    )?;
    registry.register_difference(TypeInfo::Date, TypeInfo::Timespan, |l, r| {
        let millis = date(l)?
            .signed_duration_since(date(r)?)
            .num_milliseconds()
            .unsigned_abs();
        Some(Value::Timespan(Timespan::from_millis(millis)))
    })
}

fn register_string_operations(registry: &Arithmetics) -> RegistrationResult {
    registry.register_same_type_operation(Operator::Addition, TypeInfo::String, |l, r| match (l, r) {
        (Value::String(l), Value::String(r)) => Some(Value::String(format!("{l}{r}"))),
        _ => None,
    })
}
