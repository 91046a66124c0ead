//! Example demonstrating randomized verification of declared contracts

use covenant_contracts::contract::Contract;
use covenant_contracts::predicate::{has_type, Predicate};
use covenant_contracts::quickcheck::{Quickcheck, QuickcheckConfig};
use covenant_contracts::runtime::{ensure, ContractedFunction};
use covenant_core::value::{TypeTag, Value};

fn reversal_contract(name: &str) -> Contract {
    let mut contract = Contract::new(name, &["xs"]);
    contract.add_precondition(has_type("xs", TypeTag::list(TypeTag::Integer)));
    contract.add_postcondition(Predicate::new(
        "result equals the reversal of xs",
        |bindings| {
            let mut expected = bindings["xs"].as_list()?.to_vec();
            expected.reverse();
            Ok(bindings["result"] == Value::List(expected))
        },
    ));
    contract
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== A correct reversal ===");
    let correct: ContractedFunction = ensure(reversal_contract("reverse"), |args| {
        let mut items = args[0].as_list()?.to_vec();
        items.reverse();
        Ok(Value::List(items))
    })?;

    let runner = Quickcheck::with_config(QuickcheckConfig::seeded(7));
    let report = runner.run(&correct)?;
    println!("{}", report.summary("reverse"));

    println!("\n=== A broken reversal ===");
    let broken = ensure(reversal_contract("reverse"), |args| Ok(args[0].clone()))?;

    let report = runner.run(&broken)?;
    println!("{}", report.summary("reverse"));

    // The same seed replays the identical counterexample
    let replay = runner.run(&broken)?;
    assert_eq!(report, replay);
    println!("(replayed identically under seed 7)");

    Ok(())
}
