//! Shared helpers for integration tests

#![allow(dead_code)]

use script_arithmetic::{ChainElement, Literal, Operator, Variable};

/// Build a chain from whitespace-separated tokens
///
/// Single-character operator signs become operators, `$name` an untyped
/// variable, numbers integer or decimal literals and anything else a string.
pub fn chain(source: &str) -> Vec<ChainElement> {
    source.split_whitespace().map(element).collect()
}

fn element(token: &str) -> ChainElement {
    let mut chars = token.chars();
    if let (Some(sign), None) = (chars.next(), chars.next()) {
        if let Some(operator) = Operator::from_sign(sign) {
            return operator.into();
        }
    }
    if let Some(name) = token.strip_prefix('$') {
        return ChainElement::operand(Variable::new(name));
    }
    if let Ok(i) = token.parse::<i64>() {
        return ChainElement::operand(Literal::new(i));
    }
    if let Ok(d) = token.parse::<f64>() {
        return ChainElement::operand(Literal::new(d));
    }
    ChainElement::operand(Literal::new(token))
}
