//! Prelude module for convenient imports.
//!
//! `use nebula_rules::prelude::*;` brings in the constructors, the
//! [`Validate`] trait and the types needed to build rules and inspect errors.

pub use crate::error::{BoundKind, ErrorKind, ValidationError};
pub use crate::rule::{
    MapRule, PrimitiveRule, Rule, SequenceRule, Validate, apply, bool_rule, float_rule, int_rule,
    map_rule, sequence_rule, string_rule,
};
pub use crate::value::{Kind, Value};
