//! Primitive rules: bool, int, float and string
//!
//! One generic [`PrimitiveRule`] implements the shared algorithm; the
//! type-specific convenience builders are inherent methods on its concrete
//! instantiations.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::check::{BoolCheck, Check, Number, NumberCheck, StringCheck};
use crate::coerce::Coerce;
use crate::error::{BoundKind, ValidationError, or_override};
use crate::rule::Validate;
use crate::value::{Kind, Value};

// ============================================================================
// PRIMITIVE TRAIT
// ============================================================================

/// A scalar type a [`PrimitiveRule`] can validate.
pub trait Primitive: Coerce + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// The check set registered on rules of this type.
    type Check: Check<Self>;
}

impl Primitive for bool {
    type Check = BoolCheck;
}

impl Primitive for i64 {
    type Check = NumberCheck<i64>;
}

impl Primitive for f64 {
    type Check = NumberCheck<f64>;
}

impl Primitive for String {
    type Check = StringCheck;
}

/// Rule over booleans.
pub type BoolRule = PrimitiveRule<bool>;
/// Rule over 64-bit integers.
pub type IntRule = PrimitiveRule<i64>;
/// Rule over 64-bit floats.
pub type FloatRule = PrimitiveRule<f64>;
/// Rule over strings.
pub type StringRule = PrimitiveRule<String>;

// ============================================================================
// PRIMITIVE RULE
// ============================================================================

/// A rule validating one scalar value of type `T`.
///
/// Holds the declared source representation, an ordered list of checks, a
/// whitelist and an optional override error. Checks run in registration order
/// and the first failure wins.
///
/// # Examples
///
/// ```
/// use nebula_rules::{int_rule, Kind, Validate, Value};
///
/// // Integers that arrive as strings, e.g. from a query string.
/// let page = int_rule(Kind::String).gte(1).lte(100);
/// assert!(page.apply(&Value::from("12")).is_ok());
/// assert!(page.apply(&Value::from("0")).is_err());
/// assert!(page.apply(&Value::from("twelve")).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct PrimitiveRule<T: Primitive> {
    from: Kind,
    allowed: Vec<Value>,
    checks: Vec<T::Check>,
    error: Option<ValidationError>,
}

impl<T: Primitive> PrimitiveRule<T> {
    /// Creates a rule for values of type `T` arriving as `from`.
    ///
    /// `from` is fixed for the lifetime of the rule. Unsupported pairs (e.g.
    /// a `bool` target from `Kind::Int`) produce a rule that rejects every
    /// value not on its whitelist.
    #[must_use]
    pub fn new(from: Kind) -> Self {
        Self {
            from,
            allowed: Vec::new(),
            checks: Vec::new(),
            error: None,
        }
    }

    /// Whitelists values. A whitelisted value skips coercion and every check.
    ///
    /// The raw input is compared before coercion, so a non-coercible sentinel
    /// (e.g. `"N/A"` on an int rule) can be allowed through. If the raw input
    /// is not listed but coerces, the coerced value is compared against every
    /// entry read as `T` from its own shape, so `allow([0])` on a float rule
    /// matches `0.0`.
    #[must_use = "builder methods must be chained or built"]
    pub fn allow<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.allowed.extend(values.into_iter().map(Into::into));
        self
    }

    /// Appends a user-defined check.
    ///
    /// # Examples
    ///
    /// ```
    /// use nebula_rules::{int_rule, Kind, Validate, ValidationError};
    ///
    /// let even = int_rule(Kind::Int).add_check(|n: &i64| {
    ///     if n % 2 == 0 {
    ///         Ok(())
    ///     } else {
    ///         Err(ValidationError::custom("even", "value should be even"))
    ///     }
    /// });
    /// assert!(even.apply(&4.into()).is_ok());
    /// assert_eq!(even.apply(&3.into()).unwrap_err().code(), "even");
    /// ```
    #[must_use = "builder methods must be chained or built"]
    pub fn add_check<F>(mut self, check: F) -> Self
    where
        F: Fn(&T) -> Result<(), ValidationError> + Send + Sync + 'static,
    {
        self.checks.push(T::Check::custom(Arc::new(check)));
        self
    }

    /// Sets the error reported for every failure of this rule, replacing the
    /// coercion or check error.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_error(mut self, error: ValidationError) -> Self {
        self.error = Some(error);
        self
    }

    /// Appends a check that always fails.
    ///
    /// Combined with [`allow`](Self::allow) this builds deny-by-default rules.
    #[must_use = "builder methods must be chained or built"]
    pub fn reject(self) -> Self {
        self.check(T::Check::reject())
    }

    /// Appends a pre-built check.
    #[must_use = "builder methods must be chained or built"]
    pub fn check(mut self, check: T::Check) -> Self {
        self.checks.push(check);
        self
    }

    /// The declared source representation.
    #[must_use]
    pub fn source(&self) -> Kind {
        self.from
    }

    /// Registered checks, in evaluation order.
    #[must_use]
    pub fn checks(&self) -> &[T::Check] {
        &self.checks
    }

    /// Whitelisted values.
    #[must_use]
    pub fn allowed(&self) -> &[Value] {
        &self.allowed
    }

    /// The override error, if set.
    #[must_use]
    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    fn is_allowed(&self, value: &Value) -> bool {
        self.allowed.iter().any(|allowed| allowed == value)
    }

    fn is_allowed_coerced(&self, coerced: &T) -> bool {
        self.allowed
            .iter()
            .any(|allowed| T::coerce(allowed, allowed.kind()).is_ok_and(|entry| entry == *coerced))
    }

    fn fail(&self, error: ValidationError, call_site: Option<&ValidationError>) -> ValidationError {
        tracing::trace!(
            kind = %T::TARGET,
            source = %self.from,
            code = error.code(),
            "primitive rule rejected value"
        );
        or_override(error, [self.error.as_ref(), call_site])
    }
}

impl<T: Primitive> Validate for PrimitiveRule<T> {
    fn apply_with(
        &self,
        value: &Value,
        error: Option<&ValidationError>,
    ) -> Result<(), ValidationError> {
        if self.is_allowed(value) {
            tracing::debug!(kind = %T::TARGET, "whitelisted value bypassed checks");
            return Ok(());
        }

        let coerced =
            T::coerce(value, self.from).map_err(|err| self.fail(err.into(), error))?;

        if self.is_allowed_coerced(&coerced) {
            tracing::debug!(kind = %T::TARGET, "whitelisted value bypassed checks");
            return Ok(());
        }

        for check in &self.checks {
            check
                .evaluate(&coerced)
                .map_err(|err| self.fail(err, error))?;
        }
        Ok(())
    }
}

// ============================================================================
// NUMERIC BUILDERS
// ============================================================================

impl<N> PrimitiveRule<N>
where
    N: Primitive<Check = NumberCheck<N>> + Number,
{
    fn bound(self, kind: BoundKind, bound: N) -> Self {
        self.check(NumberCheck::Bound { kind, bound })
    }

    /// Value must be `>= bound`.
    #[must_use = "builder methods must be chained or built"]
    pub fn gte(self, bound: N) -> Self {
        self.bound(BoundKind::Gte, bound)
    }

    /// Value must be `<= bound`.
    #[must_use = "builder methods must be chained or built"]
    pub fn lte(self, bound: N) -> Self {
        self.bound(BoundKind::Lte, bound)
    }

    /// Value must be `> bound`.
    #[must_use = "builder methods must be chained or built"]
    pub fn gt(self, bound: N) -> Self {
        self.bound(BoundKind::Gt, bound)
    }

    /// Value must be `< bound`.
    #[must_use = "builder methods must be chained or built"]
    pub fn lt(self, bound: N) -> Self {
        self.bound(BoundKind::Lt, bound)
    }

    /// Value must differ from `value`.
    #[must_use = "builder methods must be chained or built"]
    pub fn except(self, value: N) -> Self {
        self.bound(BoundKind::Except, value)
    }

    /// Value must not be zero. Same as `except(0)`.
    #[must_use = "builder methods must be chained or built"]
    pub fn non_zero(self) -> Self {
        self.except(N::ZERO)
    }
}

// ============================================================================
// STRING BUILDERS
// ============================================================================

impl PrimitiveRule<String> {
    /// Byte length must be `>= bound`.
    #[must_use = "builder methods must be chained or built"]
    pub fn len_gte(self, bound: usize) -> Self {
        self.check(StringCheck::Length {
            kind: BoundKind::Gte,
            bound,
        })
    }

    /// Byte length must be `<= bound`.
    #[must_use = "builder methods must be chained or built"]
    pub fn len_lte(self, bound: usize) -> Self {
        self.check(StringCheck::Length {
            kind: BoundKind::Lte,
            bound,
        })
    }

    /// Byte length must be `> bound`.
    #[must_use = "builder methods must be chained or built"]
    pub fn len_gt(self, bound: usize) -> Self {
        self.check(StringCheck::Length {
            kind: BoundKind::Gt,
            bound,
        })
    }

    /// Byte length must be `< bound`.
    #[must_use = "builder methods must be chained or built"]
    pub fn len_lt(self, bound: usize) -> Self {
        self.check(StringCheck::Length {
            kind: BoundKind::Lt,
            bound,
        })
    }

    /// Value must match `regex`.
    ///
    /// The regex is not anchored implicitly; use `^...$` for a full match.
    #[must_use = "builder methods must be chained or built"]
    pub fn pattern(self, regex: Regex) -> Self {
        self.check(StringCheck::Pattern(regex))
    }

    /// Compiles `pattern` and adds it as a [`pattern`](Self::pattern) check.
    pub fn try_pattern(self, pattern: &str) -> Result<Self, regex::Error> {
        Ok(self.pattern(Regex::new(pattern)?))
    }

    /// Value must be a UUIDv4 (case-insensitive).
    #[must_use = "builder methods must be chained or built"]
    pub fn uuid_v4(self) -> Self {
        self.check(StringCheck::UuidV4)
    }

    /// Value must equal one of `values`.
    #[must_use = "builder methods must be chained or built"]
    pub fn one_of<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.check(StringCheck::OneOf(
            values.into_iter().map(Into::into).collect(),
        ))
    }

    /// Value must not be empty.
    #[must_use = "builder methods must be chained or built"]
    pub fn non_empty(self) -> Self {
        self.check(StringCheck::NonEmpty)
    }
}

// ============================================================================
// BOOL BUILDERS
// ============================================================================

impl PrimitiveRule<bool> {
    /// Value must be `true`.
    #[must_use = "builder methods must be chained or built"]
    pub fn must_be_true(self) -> Self {
        self.check(BoolCheck::Equals(true))
    }

    /// Value must be `false`.
    #[must_use = "builder methods must be chained or built"]
    pub fn must_be_false(self) -> Self {
        self.check(BoolCheck::Equals(false))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Bound, ErrorKind};
    use crate::rule::{bool_rule, float_rule, int_rule, string_rule};
    use pretty_assertions::assert_eq;

    fn override_error() -> ValidationError {
        ValidationError::custom("bad_input", "bad input")
    }

    #[test]
    fn int_gte() {
        let rule = int_rule(Kind::Int).gte(5);
        assert_eq!(
            rule.apply(&4.into()),
            Err(ValidationError::Bound {
                kind: BoundKind::Gte,
                bound: Bound::Int(5)
            })
        );
        assert!(rule.apply(&5.into()).is_ok());
    }

    #[test]
    fn int_bounds_strict_and_non_strict() {
        let rule = int_rule(Kind::Int).gt(0).lt(10).except(5);
        assert!(rule.apply(&1.into()).is_ok());
        assert!(rule.apply(&9.into()).is_ok());
        assert!(rule.apply(&0.into()).is_err());
        assert!(rule.apply(&10.into()).is_err());
        assert_eq!(
            rule.apply(&5.into()).unwrap_err().param("kind").as_deref(),
            Some("except")
        );
    }

    #[test]
    fn float_bounds() {
        let rule = float_rule(Kind::Float).gte(0.5).lte(1.5).non_zero();
        assert!(rule.apply(&1.0.into()).is_ok());
        assert!(rule.apply(&0.25.into()).is_err());
        assert!(rule.apply(&2.0.into()).is_err());

        let rule = float_rule(Kind::Float).non_zero();
        assert_eq!(
            rule.apply(&0.0.into()),
            Err(ValidationError::bound(BoundKind::Except, 0.0))
        );
    }

    #[test]
    fn float_from_int_widens() {
        let rule = float_rule(Kind::Int).gt(1.5);
        assert!(rule.apply(&2.into()).is_ok());
        assert!(rule.apply(&1.into()).is_err());
    }

    #[test]
    fn coercion_failure_is_should_be() {
        let rule = int_rule(Kind::String).gte(0);
        assert_eq!(
            rule.apply(&"3.0".into()),
            Err(ValidationError::ShouldBe {
                target: Kind::Int,
                from: Kind::String
            })
        );
        // runtime shape disagrees with the declared source
        assert_eq!(
            rule.apply(&3.into()).unwrap_err().kind(),
            ErrorKind::ShouldBeType
        );
    }

    #[test]
    fn short_circuits_on_first_failure() {
        let rule = int_rule(Kind::Int).gte(10).lte(-10);
        assert_eq!(
            rule.apply(&0.into()).unwrap_err().param("kind").as_deref(),
            Some("gte")
        );
    }

    #[test]
    fn later_checks_do_not_run_after_failure() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let rule = string_rule(Kind::String)
            .non_empty()
            .add_check(move |_: &String| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });

        assert!(rule.apply(&"".into()).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(rule.apply(&"x".into()).is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn whitelist_bypasses_checks() {
        let rule = int_rule(Kind::Int).gte(10).allow([0]);
        assert!(rule.apply(&0.into()).is_ok());
        assert!(rule.apply(&1.into()).is_err());
    }

    #[test]
    fn whitelist_precedes_coercion() {
        let rule = int_rule(Kind::String).gte(1).allow(["N/A"]);
        assert!(rule.apply(&"N/A".into()).is_ok());
        assert!(rule.apply(&"n/a".into()).is_err());
    }

    #[test]
    fn whitelist_matches_coerced_value() {
        let rule = int_rule(Kind::String).gte(1).allow([0]);
        assert!(rule.apply(&"0".into()).is_ok());

        let rule = string_rule(Kind::Int).len_gt(3).allow(["7"]);
        assert!(rule.apply(&7.into()).is_ok());
    }

    #[test]
    fn float_whitelist_accepts_int_entries() {
        let rule = float_rule(Kind::String).gt(1.0).allow([0]);
        assert!(rule.apply(&"0".into()).is_ok());
        assert!(rule.apply(&"0.0".into()).is_ok());
        assert_eq!(
            rule.apply(&"0.5".into()),
            Err(ValidationError::Bound {
                kind: BoundKind::Gt,
                bound: Bound::Float(1.0)
            })
        );

        let rule = float_rule(Kind::Float).gt(1.0).allow([0]);
        assert!(rule.apply(&0.0.into()).is_ok());
    }

    #[test]
    fn unreadable_whitelist_entry_matches_only_raw() {
        // "N/A" is not an int; only a raw "N/A" input matches it
        let rule = int_rule(Kind::String).gte(1).allow(["N/A", "zero"]);
        assert!(rule.apply(&"0".into()).is_err());
        assert!(rule.apply(&"N/A".into()).is_ok());
    }

    #[test]
    fn reject_builds_deny_by_default() {
        let rule = string_rule(Kind::String).reject().allow(["admin", "root"]);
        assert!(rule.apply(&"root".into()).is_ok());
        assert_eq!(
            rule.apply(&"guest".into()),
            Err(ValidationError::AlwaysReject)
        );
    }

    #[test]
    fn override_replaces_every_failure() {
        let rule = int_rule(Kind::String)
            .gte(0)
            .lte(10)
            .with_error(override_error());

        assert_eq!(rule.apply(&"x".into()), Err(override_error()));
        assert_eq!(rule.apply(&"-1".into()), Err(override_error()));
        assert_eq!(rule.apply(&"11".into()), Err(override_error()));
        assert!(rule.apply(&"5".into()).is_ok());
    }

    #[test]
    fn rule_override_beats_call_site_override() {
        let call_site = ValidationError::custom("call_site", "call site");
        let plain = int_rule(Kind::Int).gte(0);
        assert_eq!(plain.apply_with(&(-1).into(), Some(&call_site)), Err(call_site.clone()));

        let overridden = plain.with_error(override_error());
        assert_eq!(
            overridden.apply_with(&(-1).into(), Some(&call_site)),
            Err(override_error())
        );
    }

    #[test]
    fn string_length_bounds_are_bytes() {
        let rule = string_rule(Kind::String).len_gte(2).len_lt(4);
        assert!(rule.apply(&"ab".into()).is_ok());
        assert!(rule.apply(&"é".into()).is_ok());
        assert!(rule.apply(&"a".into()).is_err());
        assert_eq!(
            rule.apply(&"abcd".into()),
            Err(ValidationError::length(BoundKind::Lt, 4))
        );
        assert!(string_rule(Kind::String).len_lte(1).apply(&"é".into()).is_err());
    }

    #[test]
    fn string_pattern() {
        let rule = string_rule(Kind::String)
            .try_pattern(r"^\d{3}-\d{4}$")
            .unwrap();
        assert!(rule.apply(&"123-4567".into()).is_ok());
        let err = rule.apply(&"1234567".into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PatternMismatch);
        assert_eq!(err.param("pattern").as_deref(), Some(r"^\d{3}-\d{4}$"));

        assert!(string_rule(Kind::String).try_pattern("(").is_err());
    }

    #[test]
    fn string_from_int_uses_decimal_rendering() {
        let rule = string_rule(Kind::Int).try_pattern("^-?[0-9]+$").unwrap().len_lte(3);
        assert!(rule.apply(&(-12).into()).is_ok());
        assert!(rule.apply(&1234.into()).is_err());
    }

    #[test]
    fn string_uuid_and_one_of() {
        let uuid = string_rule(Kind::String).uuid_v4();
        assert!(uuid.apply(&"123e4567-e89b-42d3-a456-426614174000".into()).is_ok());
        assert!(uuid.apply(&"123e4567-e89b-12d3-a456-426614174000".into()).is_err());

        let color = string_rule(Kind::String).one_of(["red", "green"]);
        assert!(color.apply(&"green".into()).is_ok());
        assert_eq!(
            color.apply(&"blue".into()).unwrap_err().kind(),
            ErrorKind::NotOneOf
        );
    }

    #[test]
    fn bool_checks() {
        assert!(bool_rule().must_be_true().apply(&true.into()).is_ok());
        assert_eq!(
            bool_rule().must_be_true().apply(&false.into()),
            Err(ValidationError::Expected { expected: true })
        );
        assert!(bool_rule().must_be_false().apply(&false.into()).is_ok());
        assert!(bool_rule().apply(&"true".into()).is_err());
    }

    #[test]
    fn unsupported_source_rejects_everything_but_whitelist() {
        let rule = BoolRule::new(Kind::Int).allow([1]);
        assert!(rule.apply(&1.into()).is_ok());
        assert_eq!(
            rule.apply(&0.into()),
            Err(ValidationError::ShouldBe {
                target: Kind::Bool,
                from: Kind::Int
            })
        );
    }

    #[test]
    fn accessors_expose_configuration() {
        let rule = string_rule(Kind::Float)
            .non_empty()
            .allow(["-"])
            .with_error(override_error());
        assert_eq!(rule.source(), Kind::Float);
        assert_eq!(rule.checks().len(), 1);
        assert_eq!(rule.allowed(), &[Value::from("-")]);
        assert_eq!(rule.error(), Some(&override_error()));
    }

    #[test]
    fn apply_is_repeatable() {
        let rule = int_rule(Kind::Int).gte(0);
        for _ in 0..3 {
            assert!(rule.apply(&1.into()).is_ok());
            assert!(rule.apply(&(-1).into()).is_err());
        }
    }
}
