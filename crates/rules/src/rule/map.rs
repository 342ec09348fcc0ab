//! Map rule: validates named fields with nested rules

use crate::error::{ValidationError, or_override};
use crate::rule::{Rule, Validate};
use crate::value::{Kind, Value};

// ============================================================================
// KEY RULE
// ============================================================================

/// One registered key of a [`MapRule`].
#[derive(Debug, Clone)]
pub struct KeyRule {
    name: String,
    required: bool,
    rule: Rule,
}

impl KeyRule {
    /// The key name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the key must be present.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The rule applied to the key's value.
    #[must_use]
    pub fn rule(&self) -> &Rule {
        &self.rule
    }
}

// ============================================================================
// MAP RULE
// ============================================================================

/// Validates a map key by key.
///
/// Keys are checked in registration order and the first failure is reported
/// as produced by the nested rule. Keys present in the input but not
/// registered are ignored.
///
/// # Examples
///
/// ```
/// use nebula_rules::{int_rule, map_rule, string_rule, ErrorKind, Kind, Validate, Value};
///
/// let person = map_rule()
///     .required("name", string_rule(Kind::String).non_empty())
///     .optional("age", int_rule(Kind::Int).gte(0));
///
/// let ada: Value = [("name", "Ada")].into_iter().collect();
/// assert!(person.apply(&ada).is_ok());
///
/// let anonymous: Value = [("age", 30)].into_iter().collect();
/// let err = person.apply(&anonymous).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::KeyMissing);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapRule {
    keys: Vec<KeyRule>,
}

impl MapRule {
    /// Creates a map rule with no keys; it accepts any map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name`, validated by `rule` when present.
    ///
    /// An absent required key fails with
    /// [`KeyMissing`](ValidationError::KeyMissing); an absent optional key is
    /// skipped. Registering the same name twice checks it twice.
    #[must_use = "builder methods must be chained or built"]
    pub fn key(mut self, name: impl Into<String>, required: bool, rule: impl Into<Rule>) -> Self {
        self.keys.push(KeyRule {
            name: name.into(),
            required,
            rule: rule.into(),
        });
        self
    }

    /// Registers a required key.
    #[must_use = "builder methods must be chained or built"]
    pub fn required(self, name: impl Into<String>, rule: impl Into<Rule>) -> Self {
        self.key(name, true, rule)
    }

    /// Registers an optional key.
    #[must_use = "builder methods must be chained or built"]
    pub fn optional(self, name: impl Into<String>, rule: impl Into<Rule>) -> Self {
        self.key(name, false, rule)
    }

    /// Registered keys, in evaluation order.
    #[must_use]
    pub fn keys(&self) -> &[KeyRule] {
        &self.keys
    }
}

impl Validate for MapRule {
    fn apply_with(
        &self,
        value: &Value,
        error: Option<&ValidationError>,
    ) -> Result<(), ValidationError> {
        let fail = |err: ValidationError| {
            tracing::trace!(code = err.code(), "map rule rejected value");
            or_override(err, [error, None])
        };

        let Value::Map(map) = value else {
            // structural rules have no declared source; report the actual shape
            return Err(fail(ValidationError::ShouldBe {
                target: Kind::Map,
                from: value.kind(),
            }));
        };

        for key in &self.keys {
            match map.get(&key.name) {
                Some(field) => key.rule.apply_with(field, error)?,
                None if key.required => return Err(fail(ValidationError::key_missing(&key.name))),
                None => {}
            }
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
