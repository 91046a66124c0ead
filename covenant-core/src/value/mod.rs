//! Runtime value representation

pub mod error;

pub use error::{ValueError, ValueResult};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Runtime value types
///
/// Values are the common currency of the contract system: function
/// arguments, return values, and generated candidates are all `Value`s.
/// The representation is pure data, so values can be cloned, compared,
/// and serialized freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Integer value
    Integer(i64),

    /// Floating point value
    Float(f64),

    /// String value
    String(String),

    /// Boolean value
    Boolean(bool),

    /// Nil/null value
    Nil,

    /// List of values
    List(Vec<Value>),

    /// Hash table with string keys
    Map(FxHashMap<String, Value>),
}

impl Value {
    /// Type checking predicates
    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Value::Boolean(_))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Type conversion helpers
    pub fn as_integer(&self) -> ValueResult<i64> {
        match self {
            Value::Integer(n) => Ok(*n),
            _ => Err(ValueError::TypeError {
                expected: "integer",
                actual: self.type_name(),
            }),
        }
    }

    pub fn as_float(&self) -> ValueResult<f64> {
        match self {
            Value::Float(f) => Ok(*f),
            _ => Err(ValueError::TypeError {
                expected: "float",
                actual: self.type_name(),
            }),
        }
    }

    pub fn as_number(&self) -> ValueResult<f64> {
        match self {
            Value::Integer(n) => Ok(*n as f64),
            Value::Float(f) => Ok(*f),
            _ => Err(ValueError::TypeError {
                expected: "number",
                actual: self.type_name(),
            }),
        }
    }

    pub fn as_string(&self) -> ValueResult<&str> {
        match self {
            Value::String(s) => Ok(s),
            _ => Err(ValueError::TypeError {
                expected: "string",
                actual: self.type_name(),
            }),
        }
    }

    pub fn as_boolean(&self) -> ValueResult<bool> {
        match self {
            Value::Boolean(b) => Ok(*b),
            _ => Err(ValueError::TypeError {
                expected: "boolean",
                actual: self.type_name(),
            }),
        }
    }

    pub fn as_list(&self) -> ValueResult<&[Value]> {
        match self {
            Value::List(items) => Ok(items),
            _ => Err(ValueError::TypeError {
                expected: "list",
                actual: self.type_name(),
            }),
        }
    }

    pub fn as_map(&self) -> ValueResult<&FxHashMap<String, Value>> {
        match self {
            Value::Map(map) => Ok(map),
            _ => Err(ValueError::TypeError {
                expected: "map",
                actual: self.type_name(),
            }),
        }
    }

    /// Get type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Boolean(_) => "boolean",
            Value::Nil => "nil",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Element count for lists, character count for strings
    pub fn length(&self) -> ValueResult<usize> {
        match self {
            Value::List(items) => Ok(items.len()),
            Value::String(s) => Ok(s.chars().count()),
            _ => Err(ValueError::TypeError {
                expected: "list or string",
                actual: self.type_name(),
            }),
        }
    }

    /// Numeric comparison
    pub fn compare_numeric(&self, other: &Value) -> ValueResult<std::cmp::Ordering> {
        use std::cmp::Ordering;

        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Ok(a.cmp(b)),
            (a, b) if a.is_number() && b.is_number() => {
                let a = a.as_number()?;
                let b = b.as_number()?;
                if a < b {
                    Ok(Ordering::Less)
                } else if a > b {
                    Ok(Ordering::Greater)
                } else {
                    Ok(Ordering::Equal)
                }
            }
            _ => Err(ValueError::InvalidOperation(format!(
                "Cannot compare {} and {} numerically",
                self.type_name(),
                other.type_name()
            ))),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Nil => write!(f, "nil"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                // Sorted keys keep the rendering stable across runs
                let sorted: BTreeMap<&String, &Value> = map.iter().collect();
                write!(f, "{{")?;
                for (i, (key, value)) in sorted.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Identifier used to select a generator and a membership check for a value
///
/// `List` and `Map` are composite: they carry the tag of their elements
/// (map values; map keys are always strings). `Number` accepts both
/// integers and floats. `Custom` names a user-registered generator; it has
/// no structural membership of its own, so custom tags always pair with a
/// user-supplied predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeTag {
    /// Integer or float
    Number,
    Integer,
    Float,
    String,
    Boolean,
    Nil,
    /// Homogeneous sequence of the element tag
    List(Box<TypeTag>),
    /// String-keyed table of the value tag
    Map(Box<TypeTag>),
    /// User-registered generator name
    Custom(String),
}

impl TypeTag {
    /// Convenience constructor for `List`
    pub fn list(element: TypeTag) -> Self {
        TypeTag::List(Box::new(element))
    }

    /// Convenience constructor for `Map`
    pub fn map(value: TypeTag) -> Self {
        TypeTag::Map(Box::new(value))
    }

    /// Human-readable tag name for diagnostics
    pub fn name(&self) -> String {
        match self {
            TypeTag::Number => "number".to_string(),
            TypeTag::Integer => "integer".to_string(),
            TypeTag::Float => "float".to_string(),
            TypeTag::String => "string".to_string(),
            TypeTag::Boolean => "boolean".to_string(),
            TypeTag::Nil => "nil".to_string(),
            TypeTag::List(element) => format!("list of {}", element.name()),
            TypeTag::Map(value) => format!("map of {}", value.name()),
            TypeTag::Custom(name) => name.clone(),
        }
    }

    /// Structural type membership
    ///
    /// Composite tags check every element. `Custom` tags never match
    /// structurally; membership for them comes from the predicate supplied
    /// at registration time.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            TypeTag::Number => value.is_number(),
            TypeTag::Integer => value.is_integer(),
            TypeTag::Float => value.is_float(),
            TypeTag::String => value.is_string(),
            TypeTag::Boolean => value.is_boolean(),
            TypeTag::Nil => value.is_nil(),
            TypeTag::List(element) => match value {
                Value::List(items) => items.iter().all(|item| element.matches(item)),
                _ => false,
            },
            TypeTag::Map(value_tag) => match value {
                Value::Map(map) => map.values().all(|v| value_tag.matches(v)),
                _ => false,
            },
            TypeTag::Custom(_) => false,
        }
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
