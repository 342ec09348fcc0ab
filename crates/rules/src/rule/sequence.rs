//! Sequence rule: validates elements positionally

use crate::error::{ValidationError, or_override};
use crate::rule::{Rule, Validate};
use crate::value::{Kind, Value};

/// Validates a sequence element by element against a list of rules.
///
/// Rule `i` validates element `i`. The input must have at least as many
/// elements as there are rules; elements past the last rule are accepted
/// without validation, so a `SequenceRule` describes a prefix of the input.
///
/// # Examples
///
/// ```
/// use nebula_rules::{float_rule, sequence_rule, string_rule, ErrorKind, Kind, Validate, Value};
///
/// // [label, latitude, ...]
/// let point = sequence_rule(vec![
///     string_rule(Kind::String).non_empty().into(),
///     float_rule(Kind::Float).gte(-90.0).lte(90.0).into(),
/// ]);
///
/// let value = Value::from(vec![Value::from("home"), Value::from(52.5), Value::from(true)]);
/// assert!(point.apply(&value).is_ok());
///
/// let short = Value::from(vec![Value::from("home")]);
/// assert_eq!(point.apply(&short).unwrap_err().kind(), ErrorKind::TooFewItems);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SequenceRule {
    items: Vec<Rule>,
}

impl SequenceRule {
    /// Creates a rule validating position `i` with `items[i]`.
    #[must_use]
    pub fn new(items: Vec<Rule>) -> Self {
        Self { items }
    }

    /// Appends a rule for the next position.
    #[must_use = "builder methods must be chained or built"]
    pub fn item(mut self, rule: impl Into<Rule>) -> Self {
        self.items.push(rule.into());
        self
    }

    /// Positional rules.
    #[must_use]
    pub fn items(&self) -> &[Rule] {
        &self.items
    }
}

impl Validate for SequenceRule {
    fn apply_with(
        &self,
        value: &Value,
        error: Option<&ValidationError>,
    ) -> Result<(), ValidationError> {
        let fail = |err: ValidationError| {
            tracing::trace!(code = err.code(), "sequence rule rejected value");
            or_override(err, [error, None])
        };

        let Value::Sequence(elements) = value else {
            // structural rules have no declared source; report the actual shape
            return Err(fail(ValidationError::ShouldBe {
                target: Kind::Sequence,
                from: value.kind(),
            }));
        };

        if elements.len() < self.items.len() {
            return Err(fail(ValidationError::TooFewItems {
                expected: self.items.len(),
                actual: elements.len(),
            }));
        }

        self.items
            .iter()
            .zip(elements)
            .try_for_each(|(rule, element)| rule.apply_with(element, error))
    }
}

// ============================================================================
// TESTS
// ============================================================================
