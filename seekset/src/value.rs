//! Column values and the conversions that feed them.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A single column value read from an entity.
///
/// `Null` is only ever produced by nullable columns (see [`KeyValue::NULLABLE`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL `NULL`
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Compare two non-null values.
    ///
    /// Returns `None` only when either side is `Null`. `Int` and `Float`
    /// compare numerically, and `NaN` sorts above every other number (and
    /// equal to itself), as in Postgres. Values of different kinds order by
    /// kind: booleans, then numbers, then strings.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        let ord = match (self, other) {
            (Self::Null, _) | (_, Self::Null) => return None,
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => float_cmp(*a, *b),
            (Self::Int(a), Self::Float(b)) => float_cmp(*a as f64, *b),
            (Self::Float(a), Self::Int(b)) => float_cmp(*a, *b as f64),
            (Self::String(a), Self::String(b)) => a.cmp(b),
            (a, b) => a.kind_rank().cmp(&b.kind_rank()),
        };
        Some(ord)
    }

    const fn kind_rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) | Self::Float(_) => 2,
            Self::String(_) => 3,
        }
    }

    /// Total order used for sorting: `Null` is lower than every other value.
    #[must_use]
    pub fn null_lowest_cmp(&self, other: &Self) -> Ordering {
        match (self.is_null(), other.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.compare(other).unwrap_or(Ordering::Equal),
        }
    }
}

// NaN is the greatest number; `-0.0` and `0.0` are equal.
fn float_cmp(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => write!(f, "'{s}'"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// Types that can act as a keyset column.
///
/// The declared type decides nullability: `Option<V>` columns are nullable,
/// everything else is not.
pub trait KeyValue {
    /// Whether this column type can hold `NULL`.
    const NULLABLE: bool = false;

    /// Convert into a [`Value`].
    fn into_value(self) -> Value;
}

macro_rules! key_value_via_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl KeyValue for $ty {
                #[inline]
                fn into_value(self) -> Value {
                    Value::from(self)
                }
            }
        )*
    };
}

key_value_via_from!(i64, i32, f64, bool, String, &str);

macro_rules! key_value_widening_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl KeyValue for $ty {
                #[inline]
                fn into_value(self) -> Value {
                    Value::Int(i64::from(self))
                }
            }
        )*
    };
}

key_value_widening_int!(i8, i16, u8, u16, u32);

impl KeyValue for f32 {
    #[inline]
    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }
}

impl KeyValue for Value {
    // A raw `Value` column may carry NULL.
    const NULLABLE: bool = true;

    #[inline]
    fn into_value(self) -> Value {
        self
    }
}

impl<V: KeyValue> KeyValue for Option<V> {
    const NULLABLE: bool = true;

    #[inline]
    fn into_value(self) -> Value {
        self.map_or(Value::Null, KeyValue::into_value)
    }
}
