//! Error types for rule failures
//!
//! Every failure a rule can report is a [`ValidationError`]. Each variant
//! carries the parameters of the constraint that failed so callers can handle
//! errors programmatically through [`ValidationError::kind`],
//! [`ValidationError::code`] and [`ValidationError::params`], while `Display`
//! gives a stable human-readable message.

use std::borrow::Cow;
use std::fmt;

use smallvec::{SmallVec, smallvec};

use crate::value::Kind;

// ============================================================================
// BOUND
// ============================================================================

/// Which comparison a bound check performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BoundKind {
    /// `value >= bound`
    Gte,
    /// `value <= bound`
    Lte,
    /// `value > bound`
    Gt,
    /// `value < bound`
    Lt,
    /// `value != bound`
    Except,
}

impl BoundKind {
    /// Stable lowercase name (`gte`, `lte`, ...).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            BoundKind::Gte => "gte",
            BoundKind::Lte => "lte",
            BoundKind::Gt => "gt",
            BoundKind::Lt => "lt",
            BoundKind::Except => "except",
        }
    }

    /// The comparison operator as written in messages.
    #[must_use]
    pub const fn operator(self) -> &'static str {
        match self {
            BoundKind::Gte => ">=",
            BoundKind::Lte => "<=",
            BoundKind::Gt => ">",
            BoundKind::Lt => "<",
            BoundKind::Except => "!=",
        }
    }

    /// Returns true when `actual` satisfies this bound.
    #[inline]
    pub fn holds<T: PartialOrd + ?Sized>(self, actual: &T, bound: &T) -> bool {
        match self {
            BoundKind::Gte => actual >= bound,
            BoundKind::Lte => actual <= bound,
            BoundKind::Gt => actual > bound,
            BoundKind::Lt => actual < bound,
            BoundKind::Except => actual != bound,
        }
    }
}

impl fmt::Display for BoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The parameter of a violated bound.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Bound {
    /// Bound on an integer value.
    Int(i64),
    /// Bound on a float value.
    Float(f64),
    /// Bound on a string's byte length.
    Length(usize),
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Int(v) => write!(f, "{v}"),
            Bound::Float(v) => write!(f, "{v}"),
            Bound::Length(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for Bound {
    fn from(v: i64) -> Self {
        Bound::Int(v)
    }
}

impl From<f64> for Bound {
    fn from(v: f64) -> Self {
        Bound::Float(v)
    }
}

// ============================================================================
// ERROR KIND
// ============================================================================

/// Machine-checkable discriminant of a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// [`ValidationError::ShouldBe`]
    ShouldBeType,
    /// [`ValidationError::Bound`]
    BoundViolation,
    /// [`ValidationError::Pattern`]
    PatternMismatch,
    /// [`ValidationError::NotOneOf`]
    NotOneOf,
    /// [`ValidationError::Empty`]
    EmptyDisallowed,
    /// [`ValidationError::Expected`]
    UnexpectedBool,
    /// [`ValidationError::KeyMissing`]
    KeyMissing,
    /// [`ValidationError::TooFewItems`]
    TooFewItems,
    /// [`ValidationError::AlwaysReject`]
    AlwaysReject,
    /// [`ValidationError::Custom`]
    Custom,
    /// [`ValidationError::Unsupported`]
    UnsupportedShape,
}

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// A single rule failure.
///
/// Rules stop at the first failure, so an `apply` call yields at most one of
/// these. User-supplied override errors and custom check failures use
/// [`ValidationError::Custom`].
///
/// # Examples
///
/// ```
/// use nebula_rules::{BoundKind, ErrorKind, Validate, ValidationError, int_rule, Kind};
///
/// let err = int_rule(Kind::Int).gte(5).apply(&4.into()).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::BoundViolation);
/// assert_eq!(err.code(), "bound_violation");
/// assert_eq!(err.param("bound").as_deref(), Some("5"));
/// assert!(matches!(err, ValidationError::Bound { kind: BoundKind::Gte, .. }));
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// The value could not be read as `target`.
    ///
    /// For primitive rules `from` is the declared source representation; the
    /// value either had a different runtime shape or did not convert. For map
    /// and sequence rules `from` is the runtime shape of the rejected value.
    #[error("value should follow: type {from} && convertible to {target}")]
    ShouldBe { target: Kind, from: Kind },

    /// A numeric or length bound was violated.
    #[error("{}", bound_message(.kind, .bound))]
    Bound { kind: BoundKind, bound: Bound },

    /// A regex (or the UUIDv4 grammar) did not match.
    #[error("value should follow: type string && pattern: {pattern}")]
    Pattern { pattern: Cow<'static, str> },

    /// The value is not among the enumerated allowed strings.
    #[error("value should follow: type string && one of [{}]", .allowed.join(", "))]
    NotOneOf { allowed: Vec<String> },

    /// An empty string was rejected.
    #[error("value should follow: type string && non-empty")]
    Empty,

    /// A boolean had the wrong truth value.
    #[error("value should be {expected}")]
    Expected { expected: bool },

    /// A required map key is absent.
    #[error("required key '{key}' is missing")]
    KeyMissing { key: String },

    /// A sequence is shorter than its positional rule list.
    #[error("sequence contains too few items: expected at least {expected}, got {actual}")]
    TooFewItems { expected: usize, actual: usize },

    /// An explicit always-fail check rejected the value.
    #[error("value is rejected unless explicitly allowed")]
    AlwaysReject,

    /// The input had a shape [`Value`](crate::Value) cannot represent
    /// (e.g. a JSON `null`).
    #[error("value of shape {found} is not supported")]
    Unsupported { found: Cow<'static, str> },

    /// A user-defined failure, from a custom check or an override error.
    #[error("{message}")]
    Custom {
        code: Cow<'static, str>,
        message: Cow<'static, str>,
    },
}

fn bound_message(kind: &BoundKind, bound: &Bound) -> String {
    match bound {
        Bound::Int(_) => format!("value should follow: type int && {} {bound}", kind.operator()),
        Bound::Float(_) => format!(
            "value should follow: type float && {} {bound}",
            kind.operator()
        ),
        Bound::Length(_) => format!(
            "value should follow: type string && length {} {bound}",
            kind.operator()
        ),
    }
}

impl ValidationError {
    /// Creates a user-defined error with a code and message.
    ///
    /// This is the usual way to build an override error for
    /// [`with_error`](crate::PrimitiveRule::with_error) or a custom check
    /// failure.
    pub fn custom(
        code: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::Custom {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Creates a "required key missing" error.
    pub fn key_missing(key: impl Into<String>) -> Self {
        Self::KeyMissing { key: key.into() }
    }

    /// Creates a bound violation error.
    pub fn bound(kind: BoundKind, bound: impl Into<Bound>) -> Self {
        Self::Bound {
            kind,
            bound: bound.into(),
        }
    }

    /// Creates a length bound violation error.
    #[must_use]
    pub fn length(kind: BoundKind, bound: usize) -> Self {
        Self::Bound {
            kind,
            bound: Bound::Length(bound),
        }
    }

    /// Returns the discriminant of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ShouldBe { .. } => ErrorKind::ShouldBeType,
            Self::Bound { .. } => ErrorKind::BoundViolation,
            Self::Pattern { .. } => ErrorKind::PatternMismatch,
            Self::NotOneOf { .. } => ErrorKind::NotOneOf,
            Self::Empty => ErrorKind::EmptyDisallowed,
            Self::Expected { .. } => ErrorKind::UnexpectedBool,
            Self::KeyMissing { .. } => ErrorKind::KeyMissing,
            Self::TooFewItems { .. } => ErrorKind::TooFewItems,
            Self::AlwaysReject => ErrorKind::AlwaysReject,
            Self::Custom { .. } => ErrorKind::Custom,
            Self::Unsupported { .. } => ErrorKind::UnsupportedShape,
        }
    }

    /// Returns a stable snake_case code for programmatic handling and i18n.
    ///
    /// Custom errors report the code they were built with.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::ShouldBe { .. } => "should_be_type",
            Self::Bound { .. } => "bound_violation",
            Self::Pattern { .. } => "pattern_mismatch",
            Self::NotOneOf { .. } => "not_one_of",
            Self::Empty => "empty_disallowed",
            Self::Expected { .. } => "unexpected_bool",
            Self::KeyMissing { .. } => "key_missing",
            Self::TooFewItems { .. } => "too_few_items",
            Self::AlwaysReject => "always_reject",
            Self::Custom { code, .. } => code,
            Self::Unsupported { .. } => "unsupported_shape",
        }
    }

    /// Returns the parameters of the violated constraint as ordered
    /// key-value pairs (typically 0-2 entries).
    #[must_use]
    pub fn params(&self) -> SmallVec<[(&'static str, String); 2]> {
        match self {
            Self::ShouldBe { target, from } => smallvec![
                ("target", target.to_string()),
                ("source", from.to_string()),
            ],
            Self::Bound { kind, bound } => {
                smallvec![("kind", kind.to_string()), ("bound", bound.to_string())]
            }
            Self::Pattern { pattern } => smallvec![("pattern", pattern.to_string())],
            Self::NotOneOf { allowed } => smallvec![("allowed", allowed.join(","))],
            Self::Expected { expected } => smallvec![("expected", expected.to_string())],
            Self::KeyMissing { key } => smallvec![("key", key.clone())],
            Self::TooFewItems { expected, actual } => smallvec![
                ("expected", expected.to_string()),
                ("actual", actual.to_string()),
            ],
            Self::Unsupported { found } => smallvec![("found", found.to_string())],
            Self::Empty | Self::AlwaysReject | Self::Custom { .. } => SmallVec::new(),
        }
    }

    /// Looks up a parameter value by key.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<String> {
        self.params()
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ValidationError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let params: std::collections::BTreeMap<&str, String> = self.params().into_iter().collect();
        let mut state = serializer.serialize_struct("ValidationError", 3)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("message", &self.to_string())?;
        state.serialize_field("params", &params)?;
        state.end()
    }
}

// ============================================================================
// OVERRIDE POLICY
// ============================================================================

/// Picks the error a rule surfaces: the first override that is set, else the
/// error the failing step produced. The original error is discarded.
#[inline]
pub(crate) fn or_override(
    error: ValidationError,
    overrides: [Option<&ValidationError>; 2],
) -> ValidationError {
    overrides
        .into_iter()
        .flatten()
        .next()
        .cloned()
        .unwrap_or(error)
}

// ============================================================================
// TESTS
// ============================================================================
