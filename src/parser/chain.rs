//! Precedence parsing of flat arithmetic chains
//!
//! Operators are partitioned into priority groups, lowest priority first.
//! For each slice of the chain the first group with an operator present is
//! chosen and the slice is split at the *last* such operator. Splitting at
//! the rightmost operator of the loosest tier makes same-tier operators
//! left-associative: `8 - 3 - 2` becomes `(8 - 3) - 2`.

use log::trace;
use once_cell::sync::Lazy;
use smallvec::{SmallVec, smallvec};
use std::sync::Arc;

use super::error::{ParseError, ParseResult};
use crate::ast::{ArithmeticChain, ArithmeticGettable, ChainElement};
use crate::registry::{Arithmetics, Operator};

/// Deepest evaluation tree [`parse_chain`] builds
///
/// Same-tier operators nest one level each, so this bounds the number of
/// consecutive operators of one tier as well.
pub const MAX_CHAIN_DEPTH: usize = 512;

/// Operators sharing one priority tier
pub type OperatorGroup = SmallVec<[Operator; 2]>;

static OPERATOR_GROUPS: Lazy<SmallVec<[OperatorGroup; 3]>> = Lazy::new(|| {
    let mut operators = Operator::ALL.to_vec();
    operators.sort();

    let mut groups: SmallVec<[OperatorGroup; 3]> = SmallVec::new();
    for operator in operators {
        match groups.last_mut() {
            Some(group) if group[0].priority() == operator.priority() => group.push(operator),
            _ => groups.push(smallvec![operator]),
        }
    }
    groups
});

/// Priority groups in parsing order, lowest priority first
pub fn operator_groups() -> &'static [OperatorGroup] {
    &OPERATOR_GROUPS
}

/// Parse a flat chain into an evaluation tree
///
/// The chain must alternate operands and operators and start and end with an
/// operand. Wherever both operand types of a node are known, the operation is
/// resolved now; failing to find one fails the whole parse. Chains whose tree
/// would nest deeper than [`MAX_CHAIN_DEPTH`] are rejected.
pub fn parse_chain(registry: &Arithmetics, chain: &[ChainElement]) -> ParseResult<ArithmeticGettable> {
    validate(chain)?;
    parse_slice(registry, chain, 0, 0)
}

fn validate(chain: &[ChainElement]) -> ParseResult<()> {
    if chain.is_empty() {
        return Err(ParseError::EmptyChain);
    }

    for (index, element) in chain.iter().enumerate() {
        match (index % 2 == 0, element) {
            (true, ChainElement::Operator(_)) => {
                return Err(ParseError::MalformedChain {
                    index,
                    reason: "expected an operand",
                });
            }
            (false, ChainElement::Operand(_)) => {
                return Err(ParseError::MalformedChain {
                    index,
                    reason: "expected an operator",
                });
            }
            _ => {}
        }
    }

    if chain.len() % 2 == 0 {
        return Err(ParseError::MalformedChain {
            index: chain.len() - 1,
            reason: "chain must end with an operand",
        });
    }
    Ok(())
}

fn parse_slice(
    registry: &Arithmetics,
    chain: &[ChainElement],
    offset: usize,
    depth: usize,
) -> ParseResult<ArithmeticGettable> {
    if depth > MAX_CHAIN_DEPTH {
        return Err(ParseError::MaxDepthExceeded {
            max_depth: MAX_CHAIN_DEPTH,
        });
    }

    for group in operator_groups() {
        let last = chain.iter().enumerate().rev().find_map(|(index, element)| {
            element
                .as_operator()
                .filter(|op| group.contains(op))
                .map(|op| (index, op))
        });
        let Some((index, operator)) = last else {
            continue;
        };

        trace!(
            "Splitting {} chain elements at '{operator}' (element {})",
            chain.len(),
            offset + index
        );

        let left = parse_slice(registry, &chain[..index], offset, depth + 1)?;
        let right = parse_slice(registry, &chain[index + 1..], offset + index + 1, depth + 1)?;

        let (left_type, right_type) = (left.return_type(), right.return_type());
        let operation_info = if left_type.is_unknown() || right_type.is_unknown() {
            None
        } else {
            let info = registry
                .lookup_operation_info(operator, left_type, right_type)
                .ok_or(ParseError::NoOperation {
                    operator,
                    left: left_type,
                    right: right_type,
                })?;
            Some(info)
        };

        return Ok(ArithmeticChain::new(left, operator, right, operation_info).into());
    }

    match chain {
        [ChainElement::Operand(operand)] => Ok(ArithmeticGettable::Leaf(Arc::clone(operand))),
        _ => Err(ParseError::MalformedChain {
            index: offset,
            reason: "no operator found in a multi-element slice",
        }),
    }
}
