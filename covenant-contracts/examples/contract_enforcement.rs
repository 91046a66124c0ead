//! Example demonstrating runtime contract enforcement with aggregate
//! diagnostics

use covenant_contracts::contract::Contract;
use covenant_contracts::predicate::{at_least, has_type, less_than};
use covenant_contracts::runtime::ensure;
use covenant_core::value::{TypeTag, Value};

fn main() -> anyhow::Result<()> {
    let mut contract = Contract::new("book_seats", &["requested", "available"]);
    contract.add_precondition(has_type("requested", TypeTag::Integer));
    contract.add_precondition(has_type("available", TypeTag::Integer));
    contract.add_precondition(at_least("requested", Value::Integer(1)));
    contract.add_precondition(less_than("requested", Value::Integer(12)));
    contract.add_postcondition(at_least("result", Value::Integer(0)));
    contract.document_param("requested", "seats the caller wants");
    contract.document_param("available", "seats left on the flight");

    let book_seats = ensure(contract, |args| {
        Ok(Value::Integer(
            args[1].as_integer()? - args[0].as_integer()?,
        ))
    })?;

    println!("=== Valid call ===");
    let left = book_seats.call(&[Value::Integer(2), Value::Integer(10)])?;
    println!("book_seats(2, 10) = {}", left);

    println!("\n=== Two preconditions broken at once ===");
    match book_seats.call(&[Value::Integer(0), Value::Nil]) {
        Ok(_) => println!("unexpectedly passed"),
        Err(err) => println!("{}", err),
    }

    println!("\n=== Postcondition violation (the body already ran) ===");
    match book_seats.call(&[Value::Integer(9), Value::Integer(3)]) {
        Ok(_) => println!("unexpectedly passed"),
        Err(err) => println!("{}", err),
    }

    Ok(())
}
