//! Rules and the validation entry point
//!
//! A rule is built once through its consuming builder and is read-only
//! afterwards: [`Validate::apply`] takes `&self`, so a finished rule can be
//! shared across threads (every rule is `Send + Sync`) and applied
//! concurrently without locking.
//!
//! Rules form a tree. [`MapRule`] and [`SequenceRule`] own their children by
//! value, so a rule can never contain itself and validation always
//! terminates.

mod map;
mod primitive;
mod sequence;

pub use map::{KeyRule, MapRule};
pub use primitive::{BoolRule, FloatRule, IntRule, Primitive, PrimitiveRule, StringRule};
pub use sequence::SequenceRule;

use crate::error::ValidationError;
use crate::value::{Kind, Value};

// ============================================================================
// VALIDATE TRAIT
// ============================================================================

/// The capability every rule provides.
///
/// # Error precedence
///
/// A failing rule reports exactly one error:
///
/// 1. the rule's own override (`with_error`), if set;
/// 2. otherwise the call-site override passed to [`apply_with`](Self::apply_with);
/// 3. otherwise the error produced by the failing step.
///
/// Structural rules have no override slot of their own. They forward the
/// call-site override to their children and propagate a child's error
/// unchanged.
pub trait Validate {
    /// Validates `value`, substituting `error` for any failure unless the
    /// failing rule carries its own override.
    fn apply_with(&self, value: &Value, error: Option<&ValidationError>)
    -> Result<(), ValidationError>;

    /// Validates `value`.
    fn apply(&self, value: &Value) -> Result<(), ValidationError> {
        self.apply_with(value, None)
    }

    /// Converts a decoded JSON document and validates it.
    ///
    /// JSON shapes with no [`Value`] counterpart fail with
    /// [`ValidationError::Unsupported`] before any rule runs.
    #[cfg(feature = "json")]
    fn apply_json(&self, value: &serde_json::Value) -> Result<(), ValidationError> {
        let value = Value::try_from(value)?;
        self.apply(&value)
    }
}

/// Validates `value` against `rule`.
///
/// # Examples
///
/// ```
/// use nebula_rules::{apply, string_rule, Kind};
///
/// let rule = string_rule(Kind::String).non_empty();
/// assert!(apply(&rule, &"Ada".into()).is_ok());
/// assert!(apply(&rule, &"".into()).is_err());
/// ```
pub fn apply<R: Validate + ?Sized>(rule: &R, value: &Value) -> Result<(), ValidationError> {
    rule.apply(value)
}

// ============================================================================
// RULE
// ============================================================================

/// Any rule, as a node of a rule tree.
///
/// Structural rules hold their children as `Rule`s; every concrete rule
/// converts into one with `From`.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Boolean rule.
    Bool(BoolRule),
    /// Integer rule.
    Int(IntRule),
    /// Float rule.
    Float(FloatRule),
    /// String rule.
    String(StringRule),
    /// Keyed map rule.
    Map(MapRule),
    /// Positional sequence rule.
    Sequence(SequenceRule),
}

impl Rule {
    /// The shape this rule validates.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Rule::Bool(_) => Kind::Bool,
            Rule::Int(_) => Kind::Int,
            Rule::Float(_) => Kind::Float,
            Rule::String(_) => Kind::String,
            Rule::Map(_) => Kind::Map,
            Rule::Sequence(_) => Kind::Sequence,
        }
    }
}

impl Validate for Rule {
    fn apply_with(
        &self,
        value: &Value,
        error: Option<&ValidationError>,
    ) -> Result<(), ValidationError> {
        match self {
            Rule::Bool(rule) => rule.apply_with(value, error),
            Rule::Int(rule) => rule.apply_with(value, error),
            Rule::Float(rule) => rule.apply_with(value, error),
            Rule::String(rule) => rule.apply_with(value, error),
            Rule::Map(rule) => rule.apply_with(value, error),
            Rule::Sequence(rule) => rule.apply_with(value, error),
        }
    }
}

macro_rules! impl_into_rule {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        $(
            impl From<$ty> for Rule {
                #[inline]
                fn from(rule: $ty) -> Self {
                    Rule::$variant(rule)
                }
            }
        )+
    };
}

impl_into_rule!(
    Bool(BoolRule),
    Int(IntRule),
    Float(FloatRule),
    String(StringRule),
    Map(MapRule),
    Sequence(SequenceRule),
);

// ============================================================================
// CONSTRUCTORS
// ============================================================================

/// A rule for values that must already be booleans.
#[must_use]
pub fn bool_rule() -> BoolRule {
    PrimitiveRule::new(Kind::Bool)
}

/// A rule for integers arriving as `from` (`Int`, `Float` or `String`).
#[must_use]
pub fn int_rule(from: Kind) -> IntRule {
    PrimitiveRule::new(from)
}

/// A rule for floats arriving as `from` (`Float`, `Int` or `String`).
#[must_use]
pub fn float_rule(from: Kind) -> FloatRule {
    PrimitiveRule::new(from)
}

/// A rule for strings arriving as `from` (`String`, `Bool`, `Int` or `Float`).
#[must_use]
pub fn string_rule(from: Kind) -> StringRule {
    PrimitiveRule::new(from)
}

/// An empty map rule; add keys with [`MapRule::key`].
#[must_use]
pub fn map_rule() -> MapRule {
    MapRule::new()
}

/// A sequence rule validating position `i` of the input with `rules[i]`.
#[must_use]
pub fn sequence_rule(rules: Vec<Rule>) -> SequenceRule {
    SequenceRule::new(rules)
}

// ============================================================================
// TESTS
// ============================================================================
