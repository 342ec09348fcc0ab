//! Check primitives
//!
//! A check is one predicate over an already-coerced value. Built-in checks
//! are plain enum variants so they can be inspected and printed; user
//! predicates go through the `Custom` variant.

use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::error::{BoundKind, ValidationError};

/// Canonical lowercase UUIDv4 grammar; matched case-insensitively.
pub const UUID_V4_PATTERN: &str =
    "^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$";

static UUID_V4_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    regex::RegexBuilder::new(UUID_V4_PATTERN)
        .case_insensitive(true)
        .build()
        .expect("UUIDv4 pattern is a valid regex")
});

// ============================================================================
// CHECK TRAIT
// ============================================================================

/// A user-supplied predicate over a coerced value.
pub type CustomCheck<T> = Arc<dyn Fn(&T) -> Result<(), ValidationError> + Send + Sync>;

/// The check set of one primitive type.
pub trait Check<T>: fmt::Debug + Clone + Send + Sync {
    /// Evaluates the check, returning the failure reason if it does not hold.
    fn evaluate(&self, input: &T) -> Result<(), ValidationError>;

    /// Wraps a user predicate.
    fn custom(check: CustomCheck<T>) -> Self;

    /// The always-fail check.
    fn reject() -> Self;
}

struct Opaque;

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<function>")
    }
}

// ============================================================================
// NUMBER CHECK
// ============================================================================

/// Numeric types that support bound checks.
pub trait Number: Copy + PartialOrd + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Additive identity, for `non_zero`.
    const ZERO: Self;

    /// Builds the bound-violation error for this type.
    fn violation(kind: BoundKind, bound: Self) -> ValidationError;
}

impl Number for i64 {
    const ZERO: Self = 0;

    fn violation(kind: BoundKind, bound: Self) -> ValidationError {
        ValidationError::bound(kind, bound)
    }
}

impl Number for f64 {
    const ZERO: Self = 0.0;

    fn violation(kind: BoundKind, bound: Self) -> ValidationError {
        ValidationError::bound(kind, bound)
    }
}

/// Checks over integers and floats.
#[derive(Clone)]
pub enum NumberCheck<N: Number> {
    /// `value <op> bound` must hold.
    Bound { kind: BoundKind, bound: N },
    /// Always fails.
    Reject,
    /// User predicate.
    Custom(CustomCheck<N>),
}

impl<N: Number> Check<N> for NumberCheck<N> {
    fn evaluate(&self, input: &N) -> Result<(), ValidationError> {
        match self {
            Self::Bound { kind, bound } => {
                if kind.holds(input, bound) {
                    Ok(())
                } else {
                    Err(N::violation(*kind, *bound))
                }
            }
            Self::Reject => Err(ValidationError::AlwaysReject),
            Self::Custom(check) => check(input),
        }
    }

    fn custom(check: CustomCheck<N>) -> Self {
        Self::Custom(check)
    }

    fn reject() -> Self {
        Self::Reject
    }
}

impl<N: Number> fmt::Debug for NumberCheck<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bound { kind, bound } => f
                .debug_struct("Bound")
                .field("kind", kind)
                .field("bound", bound)
                .finish(),
            Self::Reject => f.write_str("Reject"),
            Self::Custom(_) => f.debug_tuple("Custom").field(&Opaque).finish(),
        }
    }
}

// ============================================================================
// STRING CHECK
// ============================================================================

/// Checks over strings.
#[derive(Clone)]
pub enum StringCheck {
    /// Byte length `<op> bound` must hold.
    Length { kind: BoundKind, bound: usize },
    /// Must match the regex.
    Pattern(Regex),
    /// Must match the UUIDv4 grammar.
    UuidV4,
    /// Must equal one of the listed strings.
    OneOf(Vec<String>),
    /// Must not be empty.
    NonEmpty,
    /// Always fails.
    Reject,
    /// User predicate.
    Custom(CustomCheck<String>),
}

impl Check<String> for StringCheck {
    fn evaluate(&self, input: &String) -> Result<(), ValidationError> {
        match self {
            Self::Length { kind, bound } => {
                if kind.holds(&input.len(), bound) {
                    Ok(())
                } else {
                    Err(ValidationError::length(*kind, *bound))
                }
            }
            Self::Pattern(regex) => {
                if regex.is_match(input) {
                    Ok(())
                } else {
                    Err(ValidationError::Pattern {
                        pattern: Cow::Owned(regex.as_str().to_owned()),
                    })
                }
            }
            Self::UuidV4 => {
                if UUID_V4_REGEX.is_match(input) {
                    Ok(())
                } else {
                    Err(ValidationError::Pattern {
                        pattern: Cow::Borrowed("uuid_v4"),
                    })
                }
            }
            Self::OneOf(allowed) => {
                if allowed.iter().any(|a| a == input) {
                    Ok(())
                } else {
                    Err(ValidationError::NotOneOf {
                        allowed: allowed.clone(),
                    })
                }
            }
            Self::NonEmpty => {
                if input.is_empty() {
                    Err(ValidationError::Empty)
                } else {
                    Ok(())
                }
            }
            Self::Reject => Err(ValidationError::AlwaysReject),
            Self::Custom(check) => check(input),
        }
    }

    fn custom(check: CustomCheck<String>) -> Self {
        Self::Custom(check)
    }

    fn reject() -> Self {
        Self::Reject
    }
}

impl fmt::Debug for StringCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length { kind, bound } => f
                .debug_struct("Length")
                .field("kind", kind)
                .field("bound", bound)
                .finish(),
            Self::Pattern(regex) => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
            Self::UuidV4 => f.write_str("UuidV4"),
            Self::OneOf(allowed) => f.debug_tuple("OneOf").field(allowed).finish(),
            Self::NonEmpty => f.write_str("NonEmpty"),
            Self::Reject => f.write_str("Reject"),
            Self::Custom(_) => f.debug_tuple("Custom").field(&Opaque).finish(),
        }
    }
}

// ============================================================================
// BOOL CHECK
// ============================================================================

/// Checks over booleans.
#[derive(Clone)]
pub enum BoolCheck {
    /// Must equal the given value.
    Equals(bool),
    /// Always fails.
    Reject,
    /// User predicate.
    Custom(CustomCheck<bool>),
}

impl Check<bool> for BoolCheck {
    fn evaluate(&self, input: &bool) -> Result<(), ValidationError> {
        match self {
            Self::Equals(expected) if input == expected => Ok(()),
            Self::Equals(expected) => Err(ValidationError::Expected {
                expected: *expected,
            }),
            Self::Reject => Err(ValidationError::AlwaysReject),
            Self::Custom(check) => check(input),
        }
    }

    fn custom(check: CustomCheck<bool>) -> Self {
        Self::Custom(check)
    }

    fn reject() -> Self {
        Self::Reject
    }
}

impl fmt::Debug for BoolCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals(b) => f.debug_tuple("Equals").field(b).finish(),
            Self::Reject => f.write_str("Reject"),
            Self::Custom(_) => f.debug_tuple("Custom").field(&Opaque).finish(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
