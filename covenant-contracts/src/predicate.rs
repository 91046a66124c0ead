//! Named boolean checks over a binding environment
//!
//! A [`Predicate`] pairs an evaluation closure with a description renderer
//! at construction time. The description is what violation messages quote,
//! so every constructor in this module produces text that reads as a
//! statement about the bindings ("x is of type integer", "length of result
//! equals n"). Descriptions are diagnostics only and never drive control
//! flow.
//!
//! Predicates compose with [`Predicate::and`] and [`Predicate::or`]. `and`
//! evaluates both branches eagerly: whether to stop at the first failing
//! condition is the contract wrapper's decision, not the predicate's, and
//! eager evaluation is what makes aggregate failure reporting possible.
//!
//! Evaluation must be pure. A predicate receives its bindings by shared
//! reference and reports `true`, `false`, or an evaluation error; it cannot
//! mutate the environment.

use std::sync::Arc;

use covenant_core::value::{TypeTag, Value};
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::errors::{ContractError, ContractResult};

/// Binding environment a predicate is evaluated against: parameter names
/// mapped to values, plus [`RESULT_PARAM`] once the wrapped function has
/// produced a result
pub type Bindings = FxHashMap<String, Value>;

/// Reserved binding name for the wrapped function's return value
///
/// Only postconditions may reference it; it is absent from the environment
/// until the wrapped function has executed.
pub const RESULT_PARAM: &str = "result";

type EvalFn = Arc<dyn Fn(&Bindings) -> ContractResult<bool> + Send + Sync>;
type RenderFn = Arc<dyn Fn(&Bindings) -> String + Send + Sync>;

/// A named boolean check over a binding environment
#[derive(Clone)]
pub struct Predicate {
    /// Fixed textual form, used when no bindings are at hand
    description: String,

    /// Pure evaluation closure
    eval: EvalFn,

    /// Description renderer; may interpolate bindings into the text
    render: RenderFn,

    /// The parameter this predicate reads, when it reads exactly one
    subject: Option<String>,

    /// Type tag recorded by type-membership constructors, used by the
    /// verification runner to derive generators
    tag_hint: Option<TypeTag>,
}

impl Predicate {
    /// Create a predicate with a fixed description
    pub fn new<D, F>(description: D, eval: F) -> Self
    where
        D: Into<String>,
        F: Fn(&Bindings) -> ContractResult<bool> + Send + Sync + 'static,
    {
        let description = description.into();
        let fixed = description.clone();
        Self {
            description,
            eval: Arc::new(eval),
            render: Arc::new(move |_| fixed.clone()),
            subject: None,
            tag_hint: None,
        }
    }

    /// Create a predicate whose description interpolates the bindings
    ///
    /// `description` is the fixed fallback form shown when no bindings are
    /// available (debug output, contract listings).
    pub fn with_renderer<D, R, F>(description: D, render: R, eval: F) -> Self
    where
        D: Into<String>,
        R: Fn(&Bindings) -> String + Send + Sync + 'static,
        F: Fn(&Bindings) -> ContractResult<bool> + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            eval: Arc::new(eval),
            render: Arc::new(render),
            subject: None,
            tag_hint: None,
        }
    }

    /// Evaluate against a binding environment
    pub fn evaluate(&self, bindings: &Bindings) -> ContractResult<bool> {
        let outcome = (self.eval)(bindings);
        trace!(predicate = %self.description, ?outcome, "evaluated predicate");
        outcome
    }

    /// Render the description for diagnostics
    pub fn describe(&self, bindings: &Bindings) -> String {
        (self.render)(bindings)
    }

    /// The fixed textual form
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The single parameter this predicate reads, if it declared one
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// The type tag recorded by a type-membership constructor
    pub fn tag_hint(&self) -> Option<&TypeTag> {
        self.tag_hint.as_ref()
    }

    /// Logical conjunction; both branches are evaluated eagerly
    pub fn and(self, other: Predicate) -> Predicate {
        let description = format!("({}) and ({})", self.description, other.description);
        let (eval_lhs, eval_rhs) = (self.clone(), other.clone());
        Predicate {
            description,
            eval: Arc::new(move |bindings| {
                let lhs = eval_lhs.evaluate(bindings)?;
                let rhs = eval_rhs.evaluate(bindings)?;
                Ok(lhs && rhs)
            }),
            render: Arc::new(move |bindings| {
                format!("({}) and ({})", self.describe(bindings), other.describe(bindings))
            }),
            subject: None,
            tag_hint: None,
        }
    }

    /// Logical disjunction
    pub fn or(self, other: Predicate) -> Predicate {
        let description = format!("({}) or ({})", self.description, other.description);
        let (eval_lhs, eval_rhs) = (self.clone(), other.clone());
        Predicate {
            description,
            eval: Arc::new(move |bindings| {
                let lhs = eval_lhs.evaluate(bindings)?;
                let rhs = eval_rhs.evaluate(bindings)?;
                Ok(lhs || rhs)
            }),
            render: Arc::new(move |bindings| {
                format!("({}) or ({})", self.describe(bindings), other.describe(bindings))
            }),
            subject: None,
            tag_hint: None,
        }
    }

    /// Logical negation
    pub fn negate(self) -> Predicate {
        let description = format!("not ({})", self.description);
        let eval_inner = self.clone();
        Predicate {
            description,
            eval: Arc::new(move |bindings| Ok(!eval_inner.evaluate(bindings)?)),
            render: Arc::new(move |bindings| format!("not ({})", self.describe(bindings))),
            subject: None,
            tag_hint: None,
        }
    }

    fn with_subject(mut self, subject: &str) -> Self {
        self.subject = Some(subject.to_string());
        self
    }
}

impl std::fmt::Debug for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predicate")
            .field("description", &self.description)
            .field("subject", &self.subject)
            .field("tag_hint", &self.tag_hint)
            .finish_non_exhaustive()
    }
}

fn lookup<'a>(bindings: &'a Bindings, name: &str) -> ContractResult<&'a Value> {
    bindings.get(name).ok_or_else(|| {
        ContractError::VerificationError(format!("Undefined variable in contract: {}", name))
    })
}

// ===== Standard predicate family =====

/// Type membership: the parameter's value matches the tag
///
/// Records the tag as a generation hint, so the verification runner can
/// derive a generator for the parameter from this precondition alone.
pub fn has_type(param: &str, tag: TypeTag) -> Predicate {
    let description = format!("{} is of type {}", param, tag.name());
    let name = param.to_string();
    let check = tag.clone();
    let mut predicate = Predicate::new(description, move |bindings| {
        Ok(check.matches(lookup(bindings, &name)?))
    })
    .with_subject(param);
    predicate.tag_hint = Some(tag);
    predicate
}

/// Element-wise membership: every element of a sequence satisfies a check
///
/// `element_description` completes the sentence "every element of xs ...",
/// e.g. `"is positive"`.
pub fn all_elements<F>(param: &str, element_description: &str, check: F) -> Predicate
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    let description = format!("every element of {} {}", param, element_description);
    let name = param.to_string();
    Predicate::new(description, move |bindings| {
        let items = lookup(bindings, &name)?.as_list()?;
        Ok(items.iter().all(&check))
    })
    .with_subject(param)
}

/// Equality against a constant
pub fn equals(param: &str, expected: Value) -> Predicate {
    let description = format!("{} equals {}", param, expected);
    let name = param.to_string();
    Predicate::new(description, move |bindings| {
        Ok(*lookup(bindings, &name)? == expected)
    })
    .with_subject(param)
}

/// Inequality against a constant
pub fn not_equals(param: &str, rejected: Value) -> Predicate {
    let description = format!("{} does not equal {}", param, rejected);
    let name = param.to_string();
    Predicate::new(description, move |bindings| {
        Ok(*lookup(bindings, &name)? != rejected)
    })
    .with_subject(param)
}

fn numeric_comparison(
    param: &str,
    connective: &str,
    bound: Value,
    accepts: fn(std::cmp::Ordering) -> bool,
) -> Predicate {
    let description = format!("{} is {} {}", param, connective, bound);
    let name = param.to_string();
    Predicate::new(description, move |bindings| {
        let ordering = lookup(bindings, &name)?.compare_numeric(&bound)?;
        Ok(accepts(ordering))
    })
    .with_subject(param)
}

/// Strictly greater than a numeric constant
pub fn greater_than(param: &str, bound: Value) -> Predicate {
    numeric_comparison(param, "greater than", bound, |o| o.is_gt())
}

/// Greater than or equal to a numeric constant
pub fn at_least(param: &str, bound: Value) -> Predicate {
    numeric_comparison(param, "at least", bound, |o| o.is_ge())
}

/// Strictly less than a numeric constant
pub fn less_than(param: &str, bound: Value) -> Predicate {
    numeric_comparison(param, "less than", bound, |o| o.is_lt())
}

/// Less than or equal to a numeric constant
pub fn at_most(param: &str, bound: Value) -> Predicate {
    numeric_comparison(param, "at most", bound, |o| o.is_le())
}

/// Exact length of a list or string
pub fn length_equals(param: &str, expected: usize) -> Predicate {
    let description = format!("length of {} equals {}", param, expected);
    let name = param.to_string();
    Predicate::new(description, move |bindings| {
        Ok(lookup(bindings, &name)?.length()? == expected)
    })
    .with_subject(param)
}

/// Maximum length of a list or string
pub fn length_at_most(param: &str, limit: usize) -> Predicate {
    let description = format!("length of {} is at most {}", param, limit);
    let name = param.to_string();
    Predicate::new(description, move |bindings| {
        Ok(lookup(bindings, &name)?.length()? <= limit)
    })
    .with_subject(param)
}

/// Minimum length of a list or string
pub fn min_length(param: &str, minimum: usize) -> Predicate {
    let description = format!("length of {} is at least {}", param, minimum);
    let name = param.to_string();
    Predicate::new(description, move |bindings| {
        Ok(lookup(bindings, &name)?.length()? >= minimum)
    })
    .with_subject(param)
}

/// The list or string has at least one element
pub fn non_empty(param: &str) -> Predicate {
    let description = format!("{} is non-empty", param);
    let name = param.to_string();
    Predicate::new(description, move |bindings| {
        Ok(lookup(bindings, &name)?.length()? > 0)
    })
    .with_subject(param)
}

/// The list's numeric elements are in ascending order
///
/// A list containing non-numeric elements is not sorted. Empty and
/// single-element lists are.
pub fn is_sorted(param: &str) -> Predicate {
    let description = format!("{} is sorted in ascending order", param);
    let name = param.to_string();
    Predicate::new(description, move |bindings| {
        let items = lookup(bindings, &name)?.as_list()?;
        if items.len() <= 1 {
            return Ok(true);
        }
        if !items.iter().all(Value::is_number) {
            return Ok(false);
        }
        for pair in items.windows(2) {
            if pair[0].compare_numeric(&pair[1])?.is_gt() {
                return Ok(false);
            }
        }
        Ok(true)
    })
    .with_subject(param)
}

/// Escape hatch: an arbitrary check on a single parameter
///
/// `description` is quoted verbatim in violation messages; write it as a
/// statement, e.g. `satisfies("n", "n is even", ...)`.
pub fn satisfies<F>(param: &str, description: &str, check: F) -> Predicate
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    let name = param.to_string();
    Predicate::new(description.to_string(), move |bindings| {
        Ok(check(lookup(bindings, &name)?))
    })
    .with_subject(param)
}

#[cfg(test)]
mod predicate_tests;
