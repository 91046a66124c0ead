//! Runtime contract enforcement
//!
//! [`ContractedFunction`] wraps a function body together with its
//! [`Contract`] and enforces the contract on every call: all preconditions
//! are evaluated against the bound arguments (no short-circuit), the body
//! runs only if every one holds, and all postconditions are evaluated
//! against the bound result. Violations carry the rendered description of
//! every failing condition, so a caller that broke two preconditions sees
//! both in a single error.

use std::sync::Arc;

use covenant_core::value::Value;
use tracing::debug;

use crate::contract::{Contract, ContractKind};
use crate::errors::{ContractError, ContractResult, ContractViolation};
use crate::predicate::{Bindings, Predicate, RESULT_PARAM};

/// Phase of contract verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationPhase {
    /// Before the wrapped function executes
    Pre,
    /// After the wrapped function has produced a result
    Post,
}

/// Evaluation context for one call of a wrapped function
///
/// Holds the transient binding environment for the call; it is created
/// when the call starts and discarded when it finishes.
#[derive(Debug, Clone)]
pub struct VerificationContext {
    /// Name of the function being verified
    pub function_name: String,

    /// Parameter bindings, plus `result` in the post phase
    pub bindings: Bindings,

    /// Current phase
    pub phase: VerificationPhase,
}

impl VerificationContext {
    /// Create a pre-call context from bound arguments
    pub fn pre(function_name: impl Into<String>, bindings: Bindings) -> Self {
        Self {
            function_name: function_name.into(),
            bindings,
            phase: VerificationPhase::Pre,
        }
    }

    /// Bind the function's result and move to the post phase
    pub fn bind_result(&mut self, value: Value) {
        self.bindings.insert(RESULT_PARAM.to_string(), value);
        self.phase = VerificationPhase::Post;
    }
}

type BodyFn = Arc<dyn Fn(&[Value]) -> ContractResult<Value> + Send + Sync>;

/// A function body bundled with its enforced contract
#[derive(Clone)]
pub struct ContractedFunction {
    contract: Contract,
    body: BodyFn,
    enabled: bool,
}

/// Wrap a function body in its contract
///
/// Validates the contract against the declared parameter names: every
/// predicate subject must name a declared parameter, except that
/// postconditions may also name `result`.
pub fn ensure<F>(contract: Contract, body: F) -> ContractResult<ContractedFunction>
where
    F: Fn(&[Value]) -> ContractResult<Value> + Send + Sync + 'static,
{
    ContractedFunction::new(contract, body)
}

impl ContractedFunction {
    /// Wrap a function body in its contract, validating parameter references
    pub fn new<F>(contract: Contract, body: F) -> ContractResult<Self>
    where
        F: Fn(&[Value]) -> ContractResult<Value> + Send + Sync + 'static,
    {
        for predicate in contract
            .preconditions
            .iter()
            .chain(contract.invariants.iter())
        {
            if let Some(subject) = predicate.subject() {
                if !contract.declares_param(subject) {
                    return Err(ContractError::UnknownParameter {
                        function: contract.function_name.clone(),
                        parameter: subject.to_string(),
                    });
                }
            }
        }
        for predicate in &contract.postconditions {
            if let Some(subject) = predicate.subject() {
                if subject != RESULT_PARAM && !contract.declares_param(subject) {
                    return Err(ContractError::UnknownParameter {
                        function: contract.function_name.clone(),
                        parameter: subject.to_string(),
                    });
                }
            }
        }
        Ok(Self {
            contract,
            body: Arc::new(body),
            enabled: true,
        })
    }

    /// The wrapped contract
    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    /// Whether contract checks run on calls
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable contract checking
    ///
    /// A disabled wrapper invokes the body directly.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Call the wrapped function, enforcing the contract
    ///
    /// 1. Bind `args` to the declared parameter names.
    /// 2. Evaluate every precondition; if any fail, return a
    ///    `Precondition` violation listing all of them without invoking
    ///    the body. Invariants are checked next, the same way.
    /// 3. Invoke the body; its own errors propagate unmodified.
    /// 4. Bind `result` and evaluate every postcondition; if any fail,
    ///    return a `Postcondition` violation listing all of them. The
    ///    body's side effects have already occurred. Invariants are then
    ///    re-checked.
    /// 5. Return the body's result unchanged.
    pub fn call(&self, args: &[Value]) -> ContractResult<Value> {
        if !self.enabled {
            return (self.body)(args);
        }

        let bindings = self.bind_args(args)?;
        let mut ctx = VerificationContext::pre(self.contract.function_name.clone(), bindings);

        self.enforce(ContractKind::Precondition, &ctx)?;
        self.enforce(ContractKind::Invariant, &ctx)?;

        let result = (self.body)(args)?;
        ctx.bind_result(result.clone());

        self.enforce(ContractKind::Postcondition, &ctx)?;
        self.enforce(ContractKind::Invariant, &ctx)?;

        Ok(result)
    }

    /// Bind positional arguments to the declared parameter names
    pub fn bind_args(&self, args: &[Value]) -> ContractResult<Bindings> {
        if args.len() != self.contract.params.len() {
            return Err(ContractError::ArityMismatch {
                function: self.contract.function_name.clone(),
                expected: self.contract.params.len(),
                actual: args.len(),
            });
        }
        Ok(self
            .contract
            .params
            .iter()
            .cloned()
            .zip(args.iter().cloned())
            .collect())
    }

    /// Invoke the body directly, bypassing all contract checks
    ///
    /// The verification runner uses this on candidates whose preconditions
    /// are already known to hold.
    pub(crate) fn invoke_raw(&self, args: &[Value]) -> ContractResult<Value> {
        (self.body)(args)
    }

    /// Descriptions of every condition of `kind` that evaluates false
    ///
    /// Evaluation errors propagate; a condition that cannot be evaluated
    /// on a real call is a malformed contract, not a failed check.
    pub(crate) fn failing_conditions(
        &self,
        kind: ContractKind,
        bindings: &Bindings,
    ) -> ContractResult<Vec<String>> {
        failing_descriptions(self.contract.conditions_of_kind(kind), bindings)
    }

    fn enforce(&self, kind: ContractKind, ctx: &VerificationContext) -> ContractResult<()> {
        let failures = self.failing_conditions(kind, &ctx.bindings)?;
        if failures.is_empty() {
            return Ok(());
        }
        debug!(
            function = %ctx.function_name,
            ?kind,
            count = failures.len(),
            "contract conditions failed"
        );
        Err(ContractViolation::new(kind, Some(ctx.function_name.clone()), failures).into())
    }
}

impl std::fmt::Debug for ContractedFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractedFunction")
            .field("contract", &self.contract)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

/// Evaluate every predicate and collect the rendered descriptions of those
/// that evaluate false
pub(crate) fn failing_descriptions(
    predicates: &[Predicate],
    bindings: &Bindings,
) -> ContractResult<Vec<String>> {
    let mut failures = Vec::new();
    for predicate in predicates {
        if !predicate.evaluate(bindings)? {
            failures.push(predicate.describe(bindings));
        }
    }
    Ok(failures)
}
