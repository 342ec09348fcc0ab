//! Property-based tests for coercion and rule evaluation.

use nebula_rules::prelude::*;
use nebula_rules::{Bound, coerce, render};
use proptest::prelude::*;

// ============================================================================
// COERCION ROUND TRIPS
// ============================================================================

proptest! {
    #[test]
    fn int_renders_and_coerces_back(n in any::<i64>()) {
        for from in [Kind::Int, Kind::String] {
            let rendered = render(&n, from).unwrap();
            prop_assert_eq!(coerce::<i64>(&rendered, from), Ok(n));
        }
    }

    #[test]
    fn finite_float_survives_string_form(f in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
        let rendered = render(&f, Kind::String).unwrap();
        prop_assert_eq!(coerce::<f64>(&rendered, Kind::String), Ok(f));
    }

    #[test]
    fn float_to_int_truncates_toward_zero(f in -1.0e15_f64..1.0e15) {
        let n = coerce::<i64>(&Value::from(f), Kind::Float).unwrap();
        prop_assert_eq!(n, f.trunc() as i64);
        prop_assert!(n.unsigned_abs() as f64 <= f.abs());
    }

    #[test]
    fn float_string_never_coerces_to_int(n in any::<i32>(), frac in 1_u32..1000) {
        let text = format!("{n}.{frac}");
        prop_assert!(coerce::<i64>(&Value::from(text), Kind::String).is_err());
    }

    #[test]
    fn int_string_coerces_like_parse(s in "[+-]?[0-9]{1,20}") {
        prop_assert_eq!(
            coerce::<i64>(&Value::from(s.as_str()), Kind::String).ok(),
            s.parse::<i64>().ok()
        );
    }
}

// ============================================================================
// RULE EVALUATION
// ============================================================================

proptest! {
    #[test]
    fn gte_matches_comparison(n in any::<i64>(), bound in any::<i64>()) {
        let result = int_rule(Kind::Int).gte(bound).apply(&n.into());
        if n >= bound {
            prop_assert!(result.is_ok());
        } else {
            prop_assert_eq!(result, Err(ValidationError::Bound {
                kind: BoundKind::Gte,
                bound: Bound::Int(bound),
            }));
        }
    }

    #[test]
    fn same_rule_same_outcome(n in any::<i64>()) {
        let rule = int_rule(Kind::String).gt(0).lt(1000).except(500);
        let value = Value::from(n.to_string());
        prop_assert_eq!(rule.apply(&value), rule.apply(&value));
    }

    #[test]
    fn whitelist_beats_rejecting_checks(s in ".*") {
        let rule = string_rule(Kind::String).reject().allow([s.as_str()]);
        prop_assert!(rule.apply(&Value::from(s.as_str())).is_ok());
    }

    #[test]
    fn whitelist_matches_coerced_value(n in any::<i64>()) {
        let rule = int_rule(Kind::String).reject().allow([n]);
        prop_assert!(rule.apply(&Value::from(n.to_string())).is_ok());
    }

    #[test]
    fn override_replaces_every_failure(s in ".*") {
        let err = ValidationError::custom("bad_code", "code is invalid");
        let rule = string_rule(Kind::String)
            .len_gte(3)
            .len_lte(8)
            .try_pattern("^[A-Z]+$")
            .unwrap()
            .with_error(err.clone());
        if let Err(actual) = rule.apply(&Value::from(s.as_str())) {
            prop_assert_eq!(actual, err);
        }
    }

    #[test]
    fn sequence_length_gate(len in 0_usize..6, required in 0_usize..6) {
        let rule = sequence_rule((0..required).map(|_| int_rule(Kind::Int).into()).collect());
        let value = Value::from((0..len).map(|i| i as i64).collect::<Vec<_>>());
        let result = rule.apply(&value);
        if len >= required {
            prop_assert!(result.is_ok());
        } else {
            prop_assert_eq!(result, Err(ValidationError::TooFewItems {
                expected: required,
                actual: len,
            }));
        }
    }
}
