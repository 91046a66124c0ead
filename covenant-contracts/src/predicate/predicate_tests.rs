//! Tests for the predicate engine

use super::*;
use covenant_core::value::{TypeTag, Value};

fn bindings_of(entries: &[(&str, Value)]) -> Bindings {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

fn holds(predicate: &Predicate, entries: &[(&str, Value)]) -> bool {
    predicate.evaluate(&bindings_of(entries)).unwrap()
}

// ===== Construction and evaluation =====

#[test]
fn test_fixed_description() {
    let predicate = Predicate::new("x is magic", |_| Ok(true));
    assert_eq!(predicate.description(), "x is magic");
    assert_eq!(predicate.describe(&Bindings::default()), "x is magic");
}

#[test]
fn test_evaluate_reads_bindings() {
    let predicate = Predicate::new("x is 3", |bindings: &Bindings| {
        Ok(bindings["x"] == Value::Integer(3))
    });
    assert!(holds(&predicate, &[("x", Value::Integer(3))]));
    assert!(!holds(&predicate, &[("x", Value::Integer(4))]));
}

#[test]
fn test_renderer_interpolates_bindings() {
    let predicate = Predicate::with_renderer(
        "x is even",
        |bindings: &Bindings| match bindings.get("x") {
            Some(value) => format!("x is even (was {})", value),
            None => "x is even".to_string(),
        },
        |bindings: &Bindings| Ok(bindings["x"].as_integer()? % 2 == 0),
    );
    let env = bindings_of(&[("x", Value::Integer(7))]);
    assert!(!predicate.evaluate(&env).unwrap());
    assert_eq!(predicate.describe(&env), "x is even (was 7)");
    assert_eq!(predicate.describe(&Bindings::default()), "x is even");
}

// ===== Combinators =====

#[test]
fn test_and_combines_descriptions() {
    let combined = greater_than("x", Value::Integer(0)).and(less_than("x", Value::Integer(10)));
    assert_eq!(
        combined.description(),
        "(x is greater than 0) and (x is less than 10)"
    );
}

#[test]
fn test_and_requires_both() {
    let combined = greater_than("x", Value::Integer(0)).and(less_than("x", Value::Integer(10)));
    assert!(holds(&combined, &[("x", Value::Integer(5))]));
    assert!(!holds(&combined, &[("x", Value::Integer(15))]));
    assert!(!holds(&combined, &[("x", Value::Integer(-5))]));
}

#[test]
fn test_or_accepts_either() {
    let either = equals("x", Value::Integer(0)).or(equals("x", Value::Integer(1)));
    assert!(holds(&either, &[("x", Value::Integer(0))]));
    assert!(holds(&either, &[("x", Value::Integer(1))]));
    assert!(!holds(&either, &[("x", Value::Integer(2))]));
    assert_eq!(either.description(), "(x equals 0) or (x equals 1)");
}

#[test]
fn test_negate() {
    let predicate = non_empty("xs").negate();
    assert_eq!(predicate.description(), "not (xs is non-empty)");
    assert!(holds(&predicate, &[("xs", Value::List(vec![]))]));
    assert!(!holds(
        &predicate,
        &[("xs", Value::List(vec![Value::Nil]))]
    ));
}

#[test]
fn test_compound_clears_metadata() {
    let compound = has_type("x", TypeTag::Integer).and(has_type("y", TypeTag::Integer));
    assert_eq!(compound.subject(), None);
    assert!(compound.tag_hint().is_none());
}

// ===== Standard family =====

#[test]
fn test_has_type_records_hint() {
    let predicate = has_type("xs", TypeTag::list(TypeTag::Integer));
    assert_eq!(predicate.subject(), Some("xs"));
    assert_eq!(predicate.tag_hint(), Some(&TypeTag::list(TypeTag::Integer)));
    assert_eq!(predicate.description(), "xs is of type list of integer");
}

#[test]
fn test_has_type_membership() {
    let predicate = has_type("x", TypeTag::Number);
    assert!(holds(&predicate, &[("x", Value::Integer(1))]));
    assert!(holds(&predicate, &[("x", Value::Float(1.5))]));
    assert!(!holds(&predicate, &[("x", Value::Nil)]));
}

#[test]
fn test_missing_binding_is_an_error() {
    let predicate = has_type("x", TypeTag::Integer);
    let err = predicate.evaluate(&Bindings::default()).unwrap_err();
    match err {
        ContractError::VerificationError(msg) => {
            assert_eq!(msg, "Undefined variable in contract: x");
        }
        other => panic!("expected VerificationError, got {:?}", other),
    }
}

#[test]
fn test_all_elements() {
    let predicate = all_elements("xs", "is positive", |value| {
        matches!(value, Value::Integer(n) if *n > 0)
    });
    assert_eq!(predicate.description(), "every element of xs is positive");
    assert!(holds(
        &predicate,
        &[("xs", Value::List(vec![Value::Integer(1), Value::Integer(2)]))]
    ));
    assert!(!holds(
        &predicate,
        &[("xs", Value::List(vec![Value::Integer(1), Value::Integer(0)]))]
    ));
    // Vacuously true on an empty sequence
    assert!(holds(&predicate, &[("xs", Value::List(vec![]))]));
}

#[test]
fn test_all_elements_requires_a_sequence() {
    let predicate = all_elements("xs", "is positive", |_| true);
    assert!(predicate
        .evaluate(&bindings_of(&[("xs", Value::Integer(1))]))
        .is_err());
}

#[test]
fn test_comparisons() {
    let env = &[("x", Value::Integer(5))];
    assert!(holds(&greater_than("x", Value::Integer(4)), env));
    assert!(!holds(&greater_than("x", Value::Integer(5)), env));
    assert!(holds(&at_least("x", Value::Integer(5)), env));
    assert!(holds(&less_than("x", Value::Integer(6)), env));
    assert!(!holds(&at_most("x", Value::Integer(4)), env));
}

#[test]
fn test_comparisons_mix_integer_and_float() {
    let env = &[("x", Value::Float(0.5))];
    assert!(holds(&greater_than("x", Value::Integer(0)), env));
    assert!(holds(&less_than("x", Value::Integer(1)), env));
}

#[test]
fn test_comparison_on_non_number_is_an_error() {
    let env = bindings_of(&[("x", Value::String("5".to_string()))]);
    assert!(greater_than("x", Value::Integer(0)).evaluate(&env).is_err());
}

#[test]
fn test_equals_on_any_value() {
    let env = &[("xs", Value::List(vec![Value::Integer(1)]))];
    assert!(holds(&equals("xs", Value::List(vec![Value::Integer(1)])), env));
    assert!(holds(&not_equals("xs", Value::List(vec![])), env));
}

#[test]
fn test_length_checks() {
    let env = &[("s", Value::String("abc".to_string()))];
    assert!(holds(&length_equals("s", 3), env));
    assert!(!holds(&length_at_most("s", 2), env));
    assert!(holds(&min_length("s", 3), env));
    assert!(holds(&non_empty("s"), env));

    let empty = &[("s", Value::String(String::new()))];
    assert!(!holds(&non_empty("s"), empty));
}

#[test]
fn test_is_sorted() {
    let predicate = is_sorted("xs");
    assert!(holds(
        &predicate,
        &[(
            "xs",
            Value::List(vec![Value::Integer(1), Value::Integer(1), Value::Integer(3)])
        )]
    ));
    assert!(!holds(
        &predicate,
        &[("xs", Value::List(vec![Value::Integer(2), Value::Integer(1)]))]
    ));
    // Non-numeric elements are never sorted
    assert!(!holds(
        &predicate,
        &[("xs", Value::List(vec![Value::Integer(1), Value::Nil]))]
    ));
    assert!(holds(&predicate, &[("xs", Value::List(vec![]))]));
}

#[test]
fn test_satisfies() {
    let predicate = satisfies("n", "n is even", |value| {
        matches!(value, Value::Integer(n) if n % 2 == 0)
    });
    assert_eq!(predicate.subject(), Some("n"));
    assert_eq!(predicate.description(), "n is even");
    assert!(holds(&predicate, &[("n", Value::Integer(4))]));
    assert!(!holds(&predicate, &[("n", Value::Integer(5))]));
}
