//! Coercion from a declared source representation into a target type
//!
//! A primitive rule declares how its input arrives (its *source
//! representation*) and which type it validates (its *target*). The supported
//! matrix is:
//!
//! | target   | accepted sources                                   |
//! |----------|----------------------------------------------------|
//! | `bool`   | bool                                               |
//! | `i64`    | int, float (truncated toward zero), string (base 10) |
//! | `f64`    | float, int (widened), string (decimal)             |
//! | `String` | string, bool, int, float (shortest round-trip form) |
//!
//! Any other source, or a value whose runtime shape disagrees with the
//! declared source, fails with a [`CoercionError`].

use crate::error::ValidationError;
use crate::value::{Kind, Value};

// ============================================================================
// COERCION ERROR
// ============================================================================

/// A value could not be read as `target` from the `source` representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot coerce {source_kind} into {target}")]
pub struct CoercionError {
    /// The type the rule validates.
    pub target: Kind,
    /// The representation the rule declared for its input.
    pub source_kind: Kind,
}

impl CoercionError {
    const fn new(target: Kind, source_kind: Kind) -> Self {
        Self {
            target,
            source_kind,
        }
    }
}

impl From<CoercionError> for ValidationError {
    fn from(err: CoercionError) -> Self {
        ValidationError::ShouldBe {
            target: err.target,
            from: err.source_kind,
        }
    }
}

// ============================================================================
// COERCE TRAIT
// ============================================================================

/// Types a primitive rule can validate.
pub trait Coerce: Sized {
    /// The shape this type lifts into.
    const TARGET: Kind;

    /// Reads `value` as `Self`, given that it arrives as `from`.
    fn coerce(value: &Value, from: Kind) -> Result<Self, CoercionError>;

    /// Lifts a coerced value back into a [`Value`] of [`Self::TARGET`].
    fn lift(&self) -> Value;
}

impl Coerce for bool {
    const TARGET: Kind = Kind::Bool;

    fn coerce(value: &Value, from: Kind) -> Result<Self, CoercionError> {
        match (from, value) {
            (Kind::Bool, Value::Bool(b)) => Ok(*b),
            _ => Err(CoercionError::new(Self::TARGET, from)),
        }
    }

    fn lift(&self) -> Value {
        Value::Bool(*self)
    }
}

impl Coerce for i64 {
    const TARGET: Kind = Kind::Int;

    fn coerce(value: &Value, from: Kind) -> Result<Self, CoercionError> {
        let fail = || CoercionError::new(Self::TARGET, from);
        match (from, value) {
            (Kind::Int, Value::Int(i)) => Ok(*i),
            (Kind::Float, Value::Float(f)) => truncate(*f).ok_or_else(fail),
            (Kind::String, Value::String(s)) => s.parse::<i64>().map_err(|_| fail()),
            _ => Err(fail()),
        }
    }

    fn lift(&self) -> Value {
        Value::Int(*self)
    }
}

impl Coerce for f64 {
    const TARGET: Kind = Kind::Float;

    fn coerce(value: &Value, from: Kind) -> Result<Self, CoercionError> {
        let fail = || CoercionError::new(Self::TARGET, from);
        match (from, value) {
            (Kind::Float, Value::Float(f)) => Ok(*f),
            (Kind::Int, Value::Int(i)) => Ok(*i as f64),
            (Kind::String, Value::String(s)) => s.parse::<f64>().map_err(|_| fail()),
            _ => Err(fail()),
        }
    }

    fn lift(&self) -> Value {
        Value::Float(*self)
    }
}

impl Coerce for String {
    const TARGET: Kind = Kind::String;

    fn coerce(value: &Value, from: Kind) -> Result<Self, CoercionError> {
        match (from, value) {
            (Kind::String, Value::String(s)) => Ok(s.clone()),
            (Kind::Bool, Value::Bool(b)) => Ok(b.to_string()),
            (Kind::Int, Value::Int(i)) => Ok(i.to_string()),
            // `Display` for f64 is the shortest representation that parses
            // back to the same value, and never uses exponent notation.
            (Kind::Float, Value::Float(f)) => Ok(f.to_string()),
            _ => Err(CoercionError::new(Self::TARGET, from)),
        }
    }

    fn lift(&self) -> Value {
        Value::String(self.clone())
    }
}

/// Truncates toward zero; `None` for NaN, infinities and out-of-range values.
fn truncate(f: f64) -> Option<i64> {
    const MIN: f64 = i64::MIN as f64;
    // 2^63, the first float above i64::MAX.
    const MAX_EXCLUSIVE: f64 = -(i64::MIN as f64);

    let t = f.trunc();
    (t.is_finite() && (MIN..MAX_EXCLUSIVE).contains(&t)).then_some(t as i64)
}

// ============================================================================
// FREE FUNCTIONS
// ============================================================================

/// Coerces `value`, declared as arriving in `from`, into `T`.
///
/// # Examples
///
/// ```
/// use nebula_rules::{coerce, Kind, Value};
///
/// assert_eq!(coerce::<i64>(&Value::from("42"), Kind::String), Ok(42));
/// assert_eq!(coerce::<i64>(&Value::from(-2.9), Kind::Float), Ok(-2));
/// assert!(coerce::<i64>(&Value::from("3.0"), Kind::String).is_err());
/// assert_eq!(coerce::<String>(&Value::from(true), Kind::Bool).as_deref(), Ok("true"));
/// ```
pub fn coerce<T: Coerce>(value: &Value, from: Kind) -> Result<T, CoercionError> {
    T::coerce(value, from)
}

/// Renders a target value in a source representation.
///
/// This is the inverse of [`coerce`] over the supported matrix:
/// `coerce(&render(&v, from)?, from) == Ok(v)` for representable `v`.
/// Returns `None` when `from` cannot carry a `T`, or when the value has no
/// exact rendering there (a fractional float rendered as an int, a string
/// that does not parse as the source type).
pub fn render<T: Coerce>(value: &T, from: Kind) -> Option<Value> {
    let lifted = value.lift();
    let rendered = match (&lifted, from) {
        (_, k) if k == T::TARGET => lifted.clone(),
        (Value::Int(i), Kind::Float) => Value::Float(*i as f64),
        (Value::Int(i), Kind::String) => Value::String(i.to_string()),
        (Value::Float(f), Kind::Int) if f.fract() == 0.0 => Value::Int(truncate(*f)?),
        (Value::Float(f), Kind::String) => Value::String(f.to_string()),
        (Value::String(s), Kind::Bool) => Value::Bool(s.parse().ok()?),
        (Value::String(s), Kind::Int) => Value::Int(s.parse().ok()?),
        (Value::String(s), Kind::Float) => Value::Float(s.parse().ok()?),
        _ => return None,
    };
    Some(rendered)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_only_from_bool() {
        assert_eq!(coerce::<bool>(&true.into(), Kind::Bool), Ok(true));
        assert!(coerce::<bool>(&"true".into(), Kind::String).is_err());
        assert!(coerce::<bool>(&1.into(), Kind::Int).is_err());
    }

    #[test]
    fn int_from_float_truncates_toward_zero() {
        assert_eq!(coerce::<i64>(&3.9.into(), Kind::Float), Ok(3));
        assert_eq!(coerce::<i64>(&(-3.9).into(), Kind::Float), Ok(-3));
        assert!(coerce::<i64>(&f64::NAN.into(), Kind::Float).is_err());
        assert!(coerce::<i64>(&f64::INFINITY.into(), Kind::Float).is_err());
        assert!(coerce::<i64>(&1e19.into(), Kind::Float).is_err());
        assert_eq!(
            coerce::<i64>(&(i64::MIN as f64).into(), Kind::Float),
            Ok(i64::MIN)
        );
    }

    #[test]
    fn int_from_string_is_strict() {
        assert_eq!(coerce::<i64>(&"-17".into(), Kind::String), Ok(-17));
        assert_eq!(coerce::<i64>(&"+17".into(), Kind::String), Ok(17));
        assert!(coerce::<i64>(&"3.0".into(), Kind::String).is_err());
        assert!(coerce::<i64>(&" 3".into(), Kind::String).is_err());
        assert!(coerce::<i64>(&"1e3".into(), Kind::String).is_err());
        assert!(coerce::<i64>(&"".into(), Kind::String).is_err());
    }

    #[test]
    fn float_sources() {
        assert_eq!(coerce::<f64>(&2.5.into(), Kind::Float), Ok(2.5));
        assert_eq!(coerce::<f64>(&7.into(), Kind::Int), Ok(7.0));
        assert_eq!(coerce::<f64>(&"0.125".into(), Kind::String), Ok(0.125));
        assert!(coerce::<f64>(&"abc".into(), Kind::String).is_err());
        assert!(coerce::<f64>(&true.into(), Kind::Bool).is_err());
    }

    #[test]
    fn string_renderings() {
        assert_eq!(
            coerce::<String>(&false.into(), Kind::Bool).as_deref(),
            Ok("false")
        );
        assert_eq!(coerce::<String>(&(-5).into(), Kind::Int).as_deref(), Ok("-5"));
        assert_eq!(coerce::<String>(&2.34.into(), Kind::Float).as_deref(), Ok("2.34"));
        assert_eq!(coerce::<String>(&1.0.into(), Kind::Float).as_deref(), Ok("1"));
        assert_eq!(coerce::<String>(&0.1.into(), Kind::Float).as_deref(), Ok("0.1"));
    }

    #[test]
    fn shape_must_match_declared_source() {
        let err = coerce::<i64>(&"12".into(), Kind::Int).unwrap_err();
        assert_eq!(err.target, Kind::Int);
        assert_eq!(err.source_kind, Kind::Int);

        let err = coerce::<String>(&12.into(), Kind::String).unwrap_err();
        assert_eq!(err.source_kind, Kind::String);
    }

    #[test]
    fn structural_sources_are_unsupported() {
        let seq = Value::from(vec![1, 2]);
        assert!(coerce::<i64>(&seq, Kind::Sequence).is_err());
        assert!(coerce::<String>(&seq, Kind::Sequence).is_err());
    }

    #[test]
    fn coercion_error_becomes_should_be() {
        let err: ValidationError = CoercionError::new(Kind::Float, Kind::String).into();
        assert_eq!(
            err,
            ValidationError::ShouldBe {
                target: Kind::Float,
                from: Kind::String
            }
        );
    }

    #[test]
    fn render_inverts_coerce() {
        for v in [0_i64, -1, i64::MAX, i64::MIN] {
            let rendered = render(&v, Kind::String).unwrap();
            assert_eq!(coerce::<i64>(&rendered, Kind::String), Ok(v));
        }
        assert_eq!(render(&2.5_f64, Kind::Int), None);
        assert_eq!(render(&"yes".to_string(), Kind::Bool), None);
        assert_eq!(render(&true, Kind::Int), None);
    }
}
