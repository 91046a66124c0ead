//! Basic integration tests for covenant-contracts

use covenant_contracts::{
    contract::{Contract, ContractKind},
    errors::{ContractError, ContractViolation},
    predicate::{at_least, has_type, non_empty, Predicate},
    runtime::ensure,
};
use covenant_core::value::{TypeTag, Value};

#[test]
fn test_contract_creation() {
    let contract = Contract::new("test_func", &["a", "b"]);

    assert_eq!(contract.function_name, "test_func");
    assert_eq!(contract.params.len(), 2);
    assert!(contract.preconditions.is_empty());
    assert!(contract.postconditions.is_empty());
    assert!(contract.invariants.is_empty());
    assert!(!contract.has_conditions());
}

#[test]
fn test_add_conditions() {
    let mut contract = Contract::new("test", &["x"]);
    contract.add_precondition(has_type("x", TypeTag::Integer));
    contract.add_postcondition(at_least("result", Value::Integer(0)));

    assert_eq!(contract.conditions_of_kind(ContractKind::Precondition).len(), 1);
    assert_eq!(contract.conditions_of_kind(ContractKind::Postcondition).len(), 1);
    assert!(contract.has_conditions());
}

#[test]
fn test_predicate_descriptions_render_in_violations() {
    let mut contract = Contract::new("head", &["xs"]);
    contract.add_precondition(has_type("xs", TypeTag::list(TypeTag::Integer)));
    contract.add_precondition(non_empty("xs"));

    let head = ensure(contract, |args| {
        Ok(args[0].as_list()?[0].clone())
    })
    .unwrap();

    let err = head.call(&[Value::List(vec![])]).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("xs is non-empty"), "message: {}", message);
}

#[test]
fn test_contract_errors_display() {
    let error = ContractError::VerificationError("Test error".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Verification error"));
}

#[test]
fn test_violation_carries_all_failures() {
    let violation = ContractViolation::new(
        ContractKind::Precondition,
        Some("f".to_string()),
        vec!["first".to_string(), "second".to_string()],
    );
    assert_eq!(violation.failures().len(), 2);
    assert_eq!(violation.kind(), ContractKind::Precondition);
}

#[test]
fn test_wrapped_function_end_to_end() {
    let mut contract = Contract::new("safe_divide", &["dividend", "divisor"]);
    contract.add_precondition(has_type("dividend", TypeTag::Integer));
    contract.add_precondition(has_type("divisor", TypeTag::Integer));
    contract.add_precondition(Predicate::new("divisor does not equal 0", |bindings| {
        Ok(bindings["divisor"] != Value::Integer(0))
    }));

    let safe_divide = ensure(contract, |args| {
        Ok(Value::Integer(
            args[0].as_integer()? / args[1].as_integer()?,
        ))
    })
    .unwrap();

    assert_eq!(
        safe_divide.call(&[Value::Integer(10), Value::Integer(2)]).unwrap(),
        Value::Integer(5)
    );

    let err = safe_divide
        .call(&[Value::Integer(10), Value::Integer(0)])
        .unwrap_err();
    assert!(err.to_string().contains("divisor does not equal 0"));
}
