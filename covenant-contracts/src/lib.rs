//! Covenant Contract System
//!
//! This crate provides design-by-contract programming with randomized
//! verification: functions declare preconditions and postconditions as
//! first-class predicates, the runtime wrapper enforces them on every call
//! with aggregate diagnostics, and the quickcheck runner generates
//! edge-case-biased random inputs to hunt for postcondition
//! counterexamples.
//!
//! # Quick start
//!
//! ```
//! use covenant_contracts::contract::Contract;
//! use covenant_contracts::predicate::has_type;
//! use covenant_contracts::quickcheck::{Quickcheck, QuickcheckConfig};
//! use covenant_contracts::runtime::ensure;
//! use covenant_core::value::{TypeTag, Value};
//!
//! # fn main() -> covenant_contracts::errors::ContractResult<()> {
//! let mut contract = Contract::new("double_reverse", &["xs"]);
//! contract.add_precondition(has_type("xs", TypeTag::list(TypeTag::Integer)));
//! contract.add_postcondition(covenant_contracts::predicate::Predicate::new(
//!     "result equals xs",
//!     |bindings| Ok(bindings["result"] == bindings["xs"]),
//! ));
//!
//! let double_reverse = ensure(contract, |args| {
//!     let mut items = args[0].as_list()?.to_vec();
//!     items.reverse();
//!     items.reverse();
//!     Ok(Value::List(items))
//! })?;
//!
//! let report = Quickcheck::with_config(QuickcheckConfig::seeded(7)).run(&double_reverse)?;
//! assert!(report.is_passed());
//! # Ok(())
//! # }
//! ```

pub mod contract;
pub mod errors;
pub mod generator;
pub mod predicate;
pub mod quickcheck;
pub mod runtime;

pub use contract::{Contract, ContractKind};
pub use errors::{ContractError, ContractResult, ContractViolation};
pub use generator::{
    BiasedGenerator, GeneratorRegistry, RandomSource, ValueGenerator, MAX_GENERATION_DEPTH,
};
pub use predicate::{Bindings, Predicate, RESULT_PARAM};
pub use quickcheck::{
    quickcheck, Candidate, Quickcheck, QuickcheckConfig, RunReport, DEFAULT_POOL_SIZE,
    DEFAULT_SIZE_BOUND,
};
pub use runtime::{ensure, ContractedFunction, VerificationContext, VerificationPhase};
