//! Randomized contract verification
//!
//! The runner generates a pool of candidate argument bindings from the
//! contract's type tags, filters them through the precondition set, runs
//! the wrapped body on every survivor in generation order, and stops at
//! the first candidate whose postconditions fail. With a seeded
//! configuration the whole run is reproducible: the same seed and pool
//! size produce the same report, down to the counterexample's values and
//! 1-based generation index.

use std::collections::BTreeMap;

use covenant_core::value::{TypeTag, Value};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::contract::ContractKind;
use crate::errors::{ContractError, ContractResult};
use crate::generator::{BiasedGenerator, GeneratorRegistry, RandomSource};
use crate::predicate::Bindings;
use crate::runtime::ContractedFunction;

/// Candidates generated per run before filtering
pub const DEFAULT_POOL_SIZE: usize = 100;

/// Magnitude/length bound for uniform draws
pub const DEFAULT_SIZE_BOUND: usize = 32;

/// Runner configuration
///
/// An explicit configuration object: the defaults cover ordinary use, and
/// every field is an override point. A `seed` makes the run reproducible;
/// without one the source draws from process entropy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickcheckConfig {
    /// Number of raw candidates generated before filtering
    pub pool_size: usize,

    /// Size/magnitude bound handed to the generators
    pub size_bound: usize,

    /// Seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for QuickcheckConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            size_bound: DEFAULT_SIZE_BOUND,
            seed: None,
        }
    }
}

impl QuickcheckConfig {
    /// Default configuration with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}

/// One fully generated argument binding
///
/// `generation_index` is the candidate's 1-based position in the raw pool;
/// a failure report quotes it so the run can be replayed up to the same
/// position under the same seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// 1-based position in the generation sequence
    pub generation_index: usize,

    /// Generated parameter bindings
    pub bindings: Bindings,
}

impl std::fmt::Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Sorted parameter order keeps the rendering stable
        let sorted: BTreeMap<&String, &Value> = self.bindings.iter().collect();
        for (i, (name, value)) in sorted.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} = {}", name, value)?;
        }
        Ok(())
    }
}

/// Outcome of one verification run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunReport {
    /// Every surviving candidate satisfied the postconditions
    Passed {
        /// Number of candidates that survived filtering and were executed
        surviving: usize,
    },

    /// A surviving candidate falsified a postcondition
    Failed {
        /// The counterexample, exactly as generated (no shrinking)
        candidate: Candidate,
        /// The counterexample's 1-based position in the raw pool
        generation_index: usize,
        /// Descriptions of every failing condition
        failures: Vec<String>,
    },

    /// No generated candidate satisfied the preconditions; the property
    /// was never exercised
    GenerationExhausted {
        /// Candidates generated and rejected
        attempts: usize,
        /// Configured pool size
        pool_size: usize,
    },
}

impl RunReport {
    /// Whether the run passed
    pub fn is_passed(&self) -> bool {
        matches!(self, RunReport::Passed { .. })
    }

    /// Whether the run found a counterexample
    pub fn is_failed(&self) -> bool {
        matches!(self, RunReport::Failed { .. })
    }

    /// Whether the pool was exhausted without a survivor
    pub fn is_exhausted(&self) -> bool {
        matches!(self, RunReport::GenerationExhausted { .. })
    }

    /// One-line rendering for user-facing reporting layers
    pub fn summary(&self, function_name: &str) -> String {
        match self {
            RunReport::Passed { surviving } => format!(
                "Quickcheck for {} passed on {} random examples!",
                function_name, surviving
            ),
            RunReport::Failed {
                candidate,
                generation_index,
                ..
            } => format!(
                "Quickcheck for {} failed on item #{}: {}",
                function_name, generation_index, candidate
            ),
            RunReport::GenerationExhausted { pool_size, .. } => format!(
                "Quickcheck for {} exhausted its pool of {} candidates without a single survivor",
                function_name, pool_size
            ),
        }
    }
}

/// The verification runner
#[derive(Debug, Default)]
pub struct Quickcheck {
    registry: GeneratorRegistry,
    config: QuickcheckConfig,
}

impl Quickcheck {
    /// A runner with the default registry and configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// A runner with an explicit configuration
    pub fn with_config(config: QuickcheckConfig) -> Self {
        Self {
            registry: GeneratorRegistry::new(),
            config,
        }
    }

    /// Replace the generator registry
    pub fn with_registry(mut self, registry: GeneratorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// The registry, for registering custom generators
    pub fn registry_mut(&mut self) -> &mut GeneratorRegistry {
        &mut self.registry
    }

    /// The active configuration
    pub fn config(&self) -> &QuickcheckConfig {
        &self.config
    }

    /// Verify a wrapped function's postconditions against generated inputs
    ///
    /// Generates `pool_size` candidates in order, keeps those satisfying
    /// every precondition and invariant, then executes the body on each
    /// survivor in generation order, stopping at the first counterexample.
    /// Errors raised by the body itself propagate unmodified and abort the
    /// run.
    pub fn run(&self, function: &ContractedFunction) -> ContractResult<RunReport> {
        let contract = function.contract();
        let mut rng = match self.config.seed {
            Some(seed) => RandomSource::seeded(seed),
            None => RandomSource::from_entropy(),
        };

        let mut streams = Vec::with_capacity(contract.params.len());
        for param in &contract.params {
            let tag = self.derive_tag(function, param)?;
            streams.push(BiasedGenerator::new(&self.registry, tag, self.config.size_bound)?);
        }

        // Step 2: the raw pool, in strict 1-based index order
        let mut pool = Vec::with_capacity(self.config.pool_size);
        for index in 1..=self.config.pool_size {
            let mut bindings = Bindings::default();
            for (param, stream) in contract.params.iter().zip(streams.iter_mut()) {
                bindings.insert(param.clone(), stream.next(&self.registry, &mut rng)?);
            }
            pool.push(Candidate {
                generation_index: index,
                bindings,
            });
        }
        debug!(
            function = %contract.function_name,
            pool_size = pool.len(),
            "generated candidate pool"
        );

        // Step 3: filter through the precondition set, preserving order.
        // A candidate whose preconditions cannot even be evaluated is
        // rejected, not fatal: generated values routinely fall outside a
        // predicate's domain.
        let survivors: Vec<&Candidate> = pool
            .iter()
            .filter(|candidate| self.admits(function, candidate))
            .collect();

        if survivors.is_empty() {
            debug!(function = %contract.function_name, "no candidate survived filtering");
            return Ok(RunReport::GenerationExhausted {
                attempts: self.config.pool_size,
                pool_size: self.config.pool_size,
            });
        }

        // Step 5: execute survivors in generation order, stopping at the
        // first falsified postcondition
        for candidate in &survivors {
            let args: Vec<Value> = contract
                .params
                .iter()
                .map(|param| candidate.bindings[param].clone())
                .collect();
            let result = function.invoke_raw(&args)?;

            let mut bindings = candidate.bindings.clone();
            bindings.insert(crate::predicate::RESULT_PARAM.to_string(), result);

            let mut failures =
                function.failing_conditions(ContractKind::Postcondition, &bindings)?;
            failures.extend(function.failing_conditions(ContractKind::Invariant, &bindings)?);

            if !failures.is_empty() {
                debug!(
                    function = %contract.function_name,
                    generation_index = candidate.generation_index,
                    "counterexample found"
                );
                return Ok(RunReport::Failed {
                    candidate: (*candidate).clone(),
                    generation_index: candidate.generation_index,
                    failures,
                });
            }
        }

        Ok(RunReport::Passed {
            surviving: survivors.len(),
        })
    }

    /// Step 1: a parameter's tag comes from an explicit generation hint,
    /// else from its first type-membership precondition
    fn derive_tag(&self, function: &ContractedFunction, param: &str) -> ContractResult<TypeTag> {
        let contract = function.contract();
        if let Some(tag) = contract.generation_hint(param) {
            return Ok(tag.clone());
        }
        contract
            .preconditions
            .iter()
            .find(|predicate| predicate.subject() == Some(param) && predicate.tag_hint().is_some())
            .and_then(|predicate| predicate.tag_hint().cloned())
            .ok_or_else(|| ContractError::UndeterminedType(param.to_string()))
    }

    /// Aggregate precondition + invariant filtering; only pass/fail matters
    fn admits(&self, function: &ContractedFunction, candidate: &Candidate) -> bool {
        for kind in [ContractKind::Precondition, ContractKind::Invariant] {
            match function.failing_conditions(kind, &candidate.bindings) {
                Ok(failures) if failures.is_empty() => {}
                Ok(_) => return false,
                Err(err) => {
                    trace!(
                        generation_index = candidate.generation_index,
                        %err,
                        "candidate rejected: condition not evaluable"
                    );
                    return false;
                }
            }
        }
        true
    }
}

/// Run a wrapped function through the default runner
pub fn quickcheck(function: &ContractedFunction) -> ContractResult<RunReport> {
    Quickcheck::new().run(function)
}
