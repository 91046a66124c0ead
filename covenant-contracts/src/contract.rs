//! Contract representation and core structures
//!
//! This module provides the core types for design-by-contract programming
//! in Covenant. A contract specifies the conditions a function must satisfy;
//! it is enforced at runtime by the wrapper in [`crate::runtime`] and drives
//! input generation in [`crate::quickcheck`].
//!
//! # Contract Semantics
//!
//! ## Preconditions
//! - Evaluated before the function body runs, against the bound arguments
//! - Every precondition is evaluated; all failing descriptions are reported
//!   together in one violation
//! - Failed preconditions indicate a bug in the calling code, and the
//!   function body is never invoked
//!
//! ## Postconditions
//! - Evaluated after the function returns normally
//! - Can reference the return value via the reserved `result` binding,
//!   which does not exist before the function executes
//! - Every postcondition is evaluated; all failing descriptions are
//!   reported together
//! - Failed postconditions indicate a bug in the function implementation;
//!   the function's side effects have already occurred
//!
//! ## Invariants
//! - Parameter-only conditions checked both before and after the call
//! - May not reference `result`
//!
//! # Example
//!
//! ```
//! use covenant_contracts::contract::Contract;
//! use covenant_contracts::predicate::{at_least, has_type};
//! use covenant_core::value::{TypeTag, Value};
//!
//! let mut contract = Contract::new("isqrt", &["n"]);
//! contract.add_precondition(has_type("n", TypeTag::Integer));
//! contract.add_precondition(at_least("n", Value::Integer(0)));
//! contract.add_postcondition(at_least("result", Value::Integer(0)));
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use covenant_core::value::TypeTag;

use crate::predicate::Predicate;

/// Represents a contract specification for a function
///
/// A contract bundles the function's name, its ordered parameter names, and
/// the predicates that constrain its arguments and result. Contracts are
/// built up with the `add_*` methods and become immutable once a wrapped
/// function is constructed from them.
#[derive(Debug, Clone)]
pub struct Contract {
    /// Name of the function this contract applies to
    pub function_name: String,

    /// Declared parameter names, in call order
    ///
    /// Argument values are bound to these names positionally; every
    /// predicate subject must name one of them (postconditions may also
    /// name `result`).
    pub params: Vec<String>,

    /// Preconditions that must hold before function execution
    pub preconditions: Vec<Predicate>,

    /// Postconditions that must hold after function execution
    pub postconditions: Vec<Predicate>,

    /// Invariants checked in both phases
    pub invariants: Vec<Predicate>,

    /// Explicit generator selection per parameter
    ///
    /// When absent, the verification runner falls back to the first
    /// type-membership precondition for the parameter.
    generation_hints: FxHashMap<String, TypeTag>,

    /// Human-readable parameter descriptions
    ///
    /// Attached by documentation tooling; enforcement and generation
    /// ignore them entirely.
    param_docs: FxHashMap<String, String>,
}

/// Types of contract conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractKind {
    /// Checked before function execution; failure blames the caller
    Precondition,

    /// Checked after function execution; failure blames the implementation
    Postcondition,

    /// Checked in both phases; failure indicates corrupted state
    Invariant,
}

impl Contract {
    /// Create a new empty contract for a function
    pub fn new(function_name: impl Into<String>, params: &[&str]) -> Self {
        Self {
            function_name: function_name.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
            preconditions: Vec::new(),
            postconditions: Vec::new(),
            invariants: Vec::new(),
            generation_hints: FxHashMap::default(),
            param_docs: FxHashMap::default(),
        }
    }

    /// Add a precondition to the contract
    pub fn add_precondition(&mut self, predicate: Predicate) {
        self.preconditions.push(predicate);
    }

    /// Add a postcondition to the contract
    pub fn add_postcondition(&mut self, predicate: Predicate) {
        self.postconditions.push(predicate);
    }

    /// Add an invariant to the contract
    pub fn add_invariant(&mut self, predicate: Predicate) {
        self.invariants.push(predicate);
    }

    /// Select the generator for a parameter explicitly
    pub fn add_generation_hint(&mut self, param: impl Into<String>, tag: TypeTag) {
        self.generation_hints.insert(param.into(), tag);
    }

    /// The explicit generator selection for a parameter, if any
    pub fn generation_hint(&self, param: &str) -> Option<&TypeTag> {
        self.generation_hints.get(param)
    }

    /// Attach a human-readable description to a parameter
    pub fn document_param(&mut self, param: impl Into<String>, doc: impl Into<String>) {
        self.param_docs.insert(param.into(), doc.into());
    }

    /// The attached description for a parameter, if any
    pub fn param_doc(&self, param: &str) -> Option<&str> {
        self.param_docs.get(param).map(String::as_str)
    }

    /// Check if this contract has any conditions
    pub fn has_conditions(&self) -> bool {
        !self.preconditions.is_empty()
            || !self.postconditions.is_empty()
            || !self.invariants.is_empty()
    }

    /// Get all conditions of a specific kind
    pub fn conditions_of_kind(&self, kind: ContractKind) -> &[Predicate] {
        match kind {
            ContractKind::Precondition => &self.preconditions,
            ContractKind::Postcondition => &self.postconditions,
            ContractKind::Invariant => &self.invariants,
        }
    }

    /// Whether `name` is one of the declared parameters
    pub fn declares_param(&self, name: &str) -> bool {
        self.params.iter().any(|p| p == name)
    }
}
