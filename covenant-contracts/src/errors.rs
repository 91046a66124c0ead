//! Contract-related error types

use thiserror::Error;

use crate::contract::ContractKind;

/// Main contract error type
#[derive(Error, Debug)]
pub enum ContractError {
    /// Contract violation during execution
    #[error("Contract violation: {0}")]
    Violation(#[from] ContractViolation),

    /// Error while evaluating a contract condition
    #[error("Verification error: {0}")]
    VerificationError(String),

    /// A predicate references a parameter the function does not declare
    #[error("Contract for '{function}' references unknown parameter '{parameter}'")]
    UnknownParameter { function: String, parameter: String },

    /// Call-site argument count does not match the declared parameters
    #[error("Function '{function}' takes {expected} arguments but {actual} were supplied")]
    ArityMismatch {
        function: String,
        expected: usize,
        actual: usize,
    },

    /// No generator registered for a custom type tag
    #[error("No generator registered for type tag '{0}'")]
    UnknownGenerator(String),

    /// No type tag could be derived for a parameter
    #[error("Cannot derive a type tag for parameter '{0}': add a generation hint or a type-membership precondition")]
    UndeterminedType(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl From<covenant_core::ValueError> for ContractError {
    fn from(err: covenant_core::ValueError) -> Self {
        ContractError::VerificationError(err.to_string())
    }
}

/// Represents a contract violation
///
/// Every variant carries the full list of failing predicate descriptions:
/// the wrapper evaluates all conditions of a phase before failing, so a
/// single violation can report several broken conditions at once.
#[derive(Error, Debug, Clone)]
pub enum ContractViolation {
    /// Precondition violation: the caller supplied invalid arguments and
    /// the wrapped function was never invoked
    #[error("Precondition violated{}: {}",
        if let Some(func) = function { format!(" in function '{}'", func) } else { String::new() },
        failures.join("; ")
    )]
    Precondition {
        function: Option<String>,
        failures: Vec<String>,
    },

    /// Postcondition violation: the wrapped function executed (its side
    /// effects have occurred) but its result broke the contract
    #[error("Postcondition violated{}: {}",
        if let Some(func) = function { format!(" in function '{}'", func) } else { String::new() },
        failures.join("; ")
    )]
    Postcondition {
        function: Option<String>,
        failures: Vec<String>,
    },

    /// Invariant violation in either phase
    #[error("Invariant violated{}: {}",
        if let Some(func) = function { format!(" in function '{}'", func) } else { String::new() },
        failures.join("; ")
    )]
    Invariant {
        function: Option<String>,
        failures: Vec<String>,
    },
}

impl ContractViolation {
    /// Create a new contract violation of the given kind
    pub fn new(kind: ContractKind, function: Option<String>, failures: Vec<String>) -> Self {
        match kind {
            ContractKind::Precondition => Self::Precondition { function, failures },
            ContractKind::Postcondition => Self::Postcondition { function, failures },
            ContractKind::Invariant => Self::Invariant { function, failures },
        }
    }

    /// Get the kind of condition that was violated
    pub fn kind(&self) -> ContractKind {
        match self {
            Self::Precondition { .. } => ContractKind::Precondition,
            Self::Postcondition { .. } => ContractKind::Postcondition,
            Self::Invariant { .. } => ContractKind::Invariant,
        }
    }

    /// Get the function name if available
    pub fn function_name(&self) -> Option<&str> {
        match self {
            Self::Precondition { function, .. }
            | Self::Postcondition { function, .. }
            | Self::Invariant { function, .. } => function.as_deref(),
        }
    }

    /// Get the descriptions of every failing condition
    pub fn failures(&self) -> &[String] {
        match self {
            Self::Precondition { failures, .. }
            | Self::Postcondition { failures, .. }
            | Self::Invariant { failures, .. } => failures,
        }
    }
}

/// Result type for contract operations
pub type ContractResult<T> = Result<T, ContractError>;

#[cfg(test)]
mod errors_tests;
