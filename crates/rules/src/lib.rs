//! # nebula-rules
//!
//! Declarative validation rules for untyped values, with type coercion.
//!
//! A rule is built once with a consuming builder and then applied to any
//! number of [`Value`]s. Primitive rules (bool, int, float, string) coerce the
//! incoming value from a declared source representation before running their
//! checks; structural rules (map, sequence) dispatch to nested rules.
//!
//! ## Quick Start
//!
//! ```
//! use nebula_rules::prelude::*;
//!
//! let signup = map_rule()
//!     .required("name", string_rule(Kind::String).non_empty())
//!     // ages arrive as strings from a form
//!     .required("age", int_rule(Kind::String).gte(0))
//!     .optional("id", string_rule(Kind::String).uuid_v4());
//!
//! let form: Value = [("name", "Ada"), ("age", "36")].into_iter().collect();
//! assert!(signup.apply(&form).is_ok());
//!
//! let form: Value = [("name", "Ada"), ("age", "-1")].into_iter().collect();
//! let err = signup.apply(&form).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::BoundViolation);
//! ```
//!
//! ## Evaluation order
//!
//! - A whitelisted value (see [`PrimitiveRule::allow`]) passes immediately,
//!   before coercion.
//! - Checks run in registration order; the first failure is reported.
//! - Map keys are checked in registration order; sequence positions in index
//!   order. The first nested failure is reported unchanged.
//! - An override error replaces whatever the rule would have reported.
//!
//! ## Built-in checks
//!
//! - **Int / Float**: `gte`, `lte`, `gt`, `lt`, `except`, `non_zero`
//! - **String**: `len_gte`, `len_lte`, `len_gt`, `len_lt`, `pattern`,
//!   `uuid_v4`, `one_of`, `non_empty`
//! - **Bool**: `must_be_true`, `must_be_false`
//! - **All primitives**: `add_check` (custom predicate), `reject`, `allow`,
//!   `with_error`

#![allow(clippy::result_large_err)]

pub mod check;
pub mod coerce;
pub mod error;
#[cfg(feature = "json")]
mod json;
pub mod prelude;
pub mod rule;
pub mod value;

pub use check::{BoolCheck, Check, CustomCheck, Number, NumberCheck, StringCheck, UUID_V4_PATTERN};
pub use coerce::{Coerce, CoercionError, coerce, render};
pub use error::{Bound, BoundKind, ErrorKind, ValidationError};
pub use rule::{
    BoolRule, FloatRule, IntRule, KeyRule, MapRule, Primitive, PrimitiveRule, Rule, SequenceRule,
    StringRule, Validate, apply, bool_rule, float_rule, int_rule, map_rule, sequence_rule,
    string_rule,
};
pub use value::{Kind, Value};
