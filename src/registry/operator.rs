//! Arithmetic operators and their priority tiers

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Priority tier of an operator (higher = tighter binding)
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Addition and subtraction
    Additive = 1,
    /// Multiplication and division
    Multiplicative = 2,
    /// Exponentiation
    Exponential = 3,
}

/// Binary arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// `+`
    Addition,
    /// `-`
    Subtraction,
    /// `*`
    Multiplication,
    /// `/`
    Division,
    /// `^`
    Exponentiation,
}

impl Operator {
    /// Every operator, in declaration order
    pub const ALL: [Operator; 5] = [
        Operator::Addition,
        Operator::Subtraction,
        Operator::Multiplication,
        Operator::Division,
        Operator::Exponentiation,
    ];

    /// Symbol used in scripts
    pub const fn sign(self) -> char {
        match self {
            Operator::Addition => '+',
            Operator::Subtraction => '-',
            Operator::Multiplication => '*',
            Operator::Division => '/',
            Operator::Exponentiation => '^',
        }
    }

    /// Human-friendly name used in diagnostics
    pub const fn name(self) -> &'static str {
        match self {
            Operator::Addition => "Addition",
            Operator::Subtraction => "Subtraction",
            Operator::Multiplication => "Multiplication",
            Operator::Division => "Division",
            Operator::Exponentiation => "Exponentiation",
        }
    }

    /// Priority tier of this operator
    pub const fn priority(self) -> Priority {
        match self {
            Operator::Addition | Operator::Subtraction => Priority::Additive,
            Operator::Multiplication | Operator::Division => Priority::Multiplicative,
            Operator::Exponentiation => Priority::Exponential,
        }
    }

    /// Parse an operator from its sign
    pub fn from_sign(sign: char) -> Option<Operator> {
        Operator::ALL.into_iter().find(|op| op.sign() == sign)
    }
}

impl Ord for Operator {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority()
            .cmp(&other.priority())
            .then_with(|| self.sign().cmp(&other.sign()))
    }
}

impl PartialOrd for Operator {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sign())
    }
}
