//! Tests for contract error types

use super::*;

#[test]
fn test_violation_display_lists_every_failure() {
    let violation = ContractViolation::Precondition {
        function: Some("withdraw".to_string()),
        failures: vec![
            "amount is greater than 0".to_string(),
            "balance is at least 0".to_string(),
        ],
    };
    let message = violation.to_string();
    assert_eq!(
        message,
        "Precondition violated in function 'withdraw': amount is greater than 0; balance is at least 0"
    );
}

#[test]
fn test_violation_display_without_function() {
    let violation = ContractViolation::Postcondition {
        function: None,
        failures: vec!["result is at least 0".to_string()],
    };
    assert_eq!(
        violation.to_string(),
        "Postcondition violated: result is at least 0"
    );
}

#[test]
fn test_violation_new_dispatches_on_kind() {
    let failures = vec!["x is of type integer".to_string()];
    let pre = ContractViolation::new(ContractKind::Precondition, None, failures.clone());
    let post = ContractViolation::new(ContractKind::Postcondition, None, failures.clone());
    let inv = ContractViolation::new(ContractKind::Invariant, None, failures);

    assert_eq!(pre.kind(), ContractKind::Precondition);
    assert_eq!(post.kind(), ContractKind::Postcondition);
    assert_eq!(inv.kind(), ContractKind::Invariant);
}

#[test]
fn test_violation_accessors() {
    let violation = ContractViolation::new(
        ContractKind::Invariant,
        Some("push".to_string()),
        vec!["stack is non-empty".to_string()],
    );
    assert_eq!(violation.function_name(), Some("push"));
    assert_eq!(violation.failures(), &["stack is non-empty".to_string()]);
}

#[test]
fn test_contract_error_wraps_violation() {
    let violation = ContractViolation::new(ContractKind::Precondition, None, vec![]);
    let error: ContractError = violation.into();
    assert!(matches!(error, ContractError::Violation(_)));
    assert!(error.to_string().starts_with("Contract violation:"));
}

#[test]
fn test_value_error_conversion() {
    let err = covenant_core::Value::Nil.as_integer().unwrap_err();
    let error: ContractError = err.into();
    match error {
        ContractError::VerificationError(msg) => {
            assert!(msg.contains("expected integer"));
        }
        other => panic!("expected VerificationError, got {:?}", other),
    }
}

#[test]
fn test_arity_mismatch_display() {
    let error = ContractError::ArityMismatch {
        function: "add".to_string(),
        expected: 2,
        actual: 3,
    };
    assert_eq!(
        error.to_string(),
        "Function 'add' takes 2 arguments but 3 were supplied"
    );
}

#[test]
fn test_unknown_generator_display() {
    let error = ContractError::UnknownGenerator("temperature".to_string());
    assert_eq!(
        error.to_string(),
        "No generator registered for type tag 'temperature'"
    );
}
