//! Runtime values produced and consumed by arithmetic operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::types::TypeInfo;

/// Runtime value of an operand or an operation result
///
/// Every value has a concrete runtime type, see [`Value::type_info`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Integer value (64-bit signed)
    Integer(i64),

    /// Floating-point value
    Decimal(f64),

    /// Boolean value
    Boolean(bool),

    /// String value
    String(String),

    /// Duration
    Timespan(Timespan),

    /// Point in time
    Date(DateTime<Utc>),

    /// Three-component vector
    Vector(Vector),
}

impl Value {
    /// Concrete runtime type of this value
    pub fn type_info(&self) -> TypeInfo {
        match self {
            Self::Integer(_) => TypeInfo::Integer,
            Self::Decimal(_) => TypeInfo::Decimal,
            Self::Boolean(_) => TypeInfo::Boolean,
            Self::String(_) => TypeInfo::String,
            Self::Timespan(_) => TypeInfo::Timespan,
            Self::Date(_) => TypeInfo::Date,
            Self::Vector(_) => TypeInfo::Vector,
        }
    }

    /// Numeric view as a float, for either numeric variant
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Integral view; only defined for `Integer`
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Timespan> for Value {
    fn from(value: Timespan) -> Self {
        Self::Timespan(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

impl From<Vector> for Value {
    fn from(value: Vector) -> Self {
        Self::Vector(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Timespan(t) => write!(f, "{t}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d %H:%M:%S")),
            Self::Vector(v) => write!(f, "{v}"),
        }
    }
}

/// Non-negative duration with millisecond resolution
///
/// `u64::MAX` milliseconds is treated as an infinite timespan, which absorbs
/// every addition and subtraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Timespan {
    millis: u64,
}

const TIME_UNITS: [(&str, u64); 4] = [
    ("day", 86_400_000),
    ("hour", 3_600_000),
    ("minute", 60_000),
    ("second", 1_000),
];

impl Timespan {
    /// Timespan of the given milliseconds
    pub const fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    /// Timespan of the given seconds
    pub const fn from_seconds(seconds: u64) -> Self {
        Self::from_millis(seconds.saturating_mul(1_000))
    }

    /// The infinite timespan
    pub const fn infinite() -> Self {
        Self { millis: u64::MAX }
    }

    /// Length in milliseconds
    pub fn millis(&self) -> u64 {
        self.millis
    }

    /// Check if this timespan is infinite
    pub fn is_infinite(&self) -> bool {
        self.millis == u64::MAX
    }

    /// As a chrono duration, saturating at the largest representable one
    pub fn to_duration(&self) -> chrono::Duration {
        i64::try_from(self.millis)
            .ok()
            .and_then(chrono::Duration::try_milliseconds)
            .unwrap_or(chrono::Duration::MAX)
    }

    /// Sum of two timespans, clamped to the infinite timespan
    pub fn add(&self, other: &Timespan) -> Timespan {
        if self.is_infinite() || other.is_infinite() {
            return Timespan::infinite();
        }
        Timespan::from_millis(self.millis.saturating_add(other.millis))
    }

    /// Difference of two timespans, floored at zero
    pub fn subtract(&self, other: &Timespan) -> Timespan {
        if self.is_infinite() || other.is_infinite() {
            return Timespan::infinite();
        }
        Timespan::from_millis(self.millis.saturating_sub(other.millis))
    }

    /// Scale by a non-negative factor; `None` for negative or NaN factors
    pub fn multiply(&self, scalar: f64) -> Option<Timespan> {
        if scalar.is_nan() || scalar < 0.0 {
            return None;
        }
        if scalar.is_infinite() {
            return Some(Timespan::infinite());
        }
        Some(Self::from_f64(self.millis as f64 * scalar))
    }

    /// Divide by a non-negative factor; `None` for negative or NaN factors
    pub fn divide(&self, scalar: f64) -> Option<Timespan> {
        if scalar.is_nan() || scalar < 0.0 {
            return None;
        }
        if self.is_infinite() {
            return Some(Timespan::infinite());
        }
        let value = self.millis as f64 / scalar;
        if value.is_nan() {
            return Some(Timespan::default());
        }
        if value.is_infinite() {
            return Some(Timespan::infinite());
        }
        Some(Self::from_f64(value))
    }

    /// Ratio between two timespans
    pub fn divide_by(&self, other: &Timespan) -> f64 {
        match (self.is_infinite(), other.is_infinite()) {
            (true, true) => f64::NAN,
            (true, false) => f64::INFINITY,
            (false, true) => 0.0,
            (false, false) => self.millis as f64 / other.millis as f64,
        }
    }

    /// Absolute difference between two timespans
    pub fn difference(&self, other: &Timespan) -> Timespan {
        if self.is_infinite() || other.is_infinite() {
            return Timespan::infinite();
        }
        Timespan::from_millis(self.millis.abs_diff(other.millis))
    }

    fn from_f64(millis: f64) -> Timespan {
        if millis >= u64::MAX as f64 {
            Timespan::infinite()
        } else {
            Timespan::from_millis(millis as u64)
        }
    }
}

impl fmt::Display for Timespan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_infinite() {
            return f.write_str("forever");
        }

        let (unit, size) = TIME_UNITS
            .iter()
            .find(|(_, size)| self.millis >= *size)
            .copied()
            .unwrap_or(("millisecond", 1));

        let amount = self.millis as f64 / size as f64;
        let amount = (amount * 100.0).round() / 100.0;
        let plural = if amount == 1.0 { "" } else { "s" };
        write!(f, "{amount} {unit}{plural}")
    }
}

/// Three-component vector of floats
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
}

impl Vector {
    /// Create a new vector
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Vector with every component set to `value`
    pub const fn splat(value: f64) -> Self {
        Self::new(value, value, value)
    }

    /// Combine two vectors component by component
    pub fn zip_with(&self, other: &Vector, f: impl Fn(f64, f64) -> f64) -> Vector {
        Vector::new(f(self.x, other.x), f(self.y, other.y), f(self.z, other.z))
    }

    /// Multiply every component by `scalar`
    pub fn scale(&self, scalar: f64) -> Vector {
        Vector::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x: {}, y: {}, z: {}", self.x, self.y, self.z)
    }
}
