//! Edge-case-biased value generation
//!
//! Each type tag owns a bias profile: a finite, deterministic catalog of
//! bug-prone fixed values (zero, empty, extremes) plus uniform sampling
//! within a size bound. [`BiasedGenerator`] drains the catalog in order
//! before falling back to uniform draws, which guarantees the edge cases
//! are actually exercised inside a bounded candidate pool instead of being
//! drowned out by random noise.
//!
//! Composite tags (`List`, `Map`) generate recursively with a halved size
//! bound and a hard depth cap, so generation always terminates.
//!
//! The registry is open: a [`ValueGenerator`] registered under a name
//! serves `TypeTag::Custom(name)`.

use std::sync::Arc;

use covenant_core::value::{TypeTag, Value};
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::errors::{ContractError, ContractResult};

/// Recursion cap for composite generation; at the cap, composite tags
/// produce their empty form
pub const MAX_GENERATION_DEPTH: usize = 8;

/// Seedable randomness for generation
///
/// Seeded sources replay the exact same draw sequence, which is what makes
/// a reported counterexample reproducible by position.
pub struct RandomSource {
    rng: StdRng,
}

impl std::fmt::Debug for RandomSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomSource").finish_non_exhaustive()
    }
}

impl RandomSource {
    /// A source drawing from process entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// A reproducible source
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform integer in `lo..=hi`
    pub fn integer_in(&mut self, lo: i64, hi: i64) -> i64 {
        self.rng.gen_range(lo..=hi)
    }

    /// Uniform float in `lo..=hi`
    pub fn float_in(&mut self, lo: f64, hi: f64) -> f64 {
        self.rng.gen_range(lo..=hi)
    }

    /// Uniform length in `0..=bound`
    pub fn length_up_to(&mut self, bound: usize) -> usize {
        self.rng.gen_range(0..=bound)
    }

    /// Fair coin
    pub fn boolean(&mut self) -> bool {
        self.rng.gen()
    }

    /// One alphanumeric character
    pub fn alphanumeric_char(&mut self) -> char {
        char::from(self.rng.sample(Alphanumeric))
    }

    fn string_of(&mut self, len: usize) -> String {
        let mut s = String::with_capacity(len);
        for _ in 0..len {
            s.push(self.alphanumeric_char());
        }
        s
    }
}

/// A generator for one type tag's values
///
/// Implement this to extend the registry with a custom tag. `edge_cases`
/// must be deterministic: the runner drains it in order before uniform
/// sampling begins.
pub trait ValueGenerator: Send + Sync {
    /// The deterministic edge-case catalog
    fn edge_cases(&self, size_bound: usize) -> Vec<Value>;

    /// One uniform draw within the size bound
    fn generate(&self, rng: &mut RandomSource, size_bound: usize) -> ContractResult<Value>;
}

/// Maps type tags to generators
///
/// Builtin tags are handled structurally; `register` extends the registry
/// for `TypeTag::Custom` names.
#[derive(Clone, Default)]
pub struct GeneratorRegistry {
    custom: FxHashMap<String, Arc<dyn ValueGenerator>>,
}

impl GeneratorRegistry {
    /// A registry covering the builtin tags
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a generator for `TypeTag::Custom(name)`
    pub fn register(&mut self, name: impl Into<String>, generator: Arc<dyn ValueGenerator>) {
        let name = name.into();
        debug!(tag = %name, "registered custom generator");
        self.custom.insert(name, generator);
    }

    /// Whether a custom generator is registered under `name`
    pub fn has_generator(&self, name: &str) -> bool {
        self.custom.contains_key(name)
    }

    /// The deterministic edge-case catalog for a tag
    pub fn edge_cases(&self, tag: &TypeTag, size_bound: usize) -> ContractResult<Vec<Value>> {
        Ok(match tag {
            TypeTag::Number => vec![
                Value::Integer(0),
                Value::Integer(1),
                Value::Integer(-1),
                Value::Float(1e308),
                Value::Float(5e-324),
            ],
            TypeTag::Integer => vec![
                Value::Integer(0),
                Value::Integer(1),
                Value::Integer(-1),
                Value::Integer(i64::MAX),
                Value::Integer(i64::MIN),
            ],
            TypeTag::Float => vec![
                Value::Float(0.0),
                Value::Float(-0.0),
                Value::Float(1.0),
                Value::Float(-1.0),
                Value::Float(f64::MAX),
                Value::Float(f64::MIN_POSITIVE),
            ],
            TypeTag::String => vec![
                Value::String(String::new()),
                Value::String(" ".to_string()),
                Value::String("a".to_string()),
                Value::String("\n".to_string()),
                Value::String("λ½".to_string()),
            ],
            TypeTag::Boolean => vec![Value::Boolean(true), Value::Boolean(false)],
            TypeTag::Nil => vec![Value::Nil],
            TypeTag::List(element) => {
                // Empty, singleton, and a two-element list built in reverse
                // catalog order so order-sensitive bugs surface early
                let inner = self.edge_cases(element, size_bound)?;
                let mut cases = vec![Value::List(Vec::new())];
                if let Some(first) = inner.first() {
                    cases.push(Value::List(vec![first.clone()]));
                }
                if inner.len() >= 2 {
                    cases.push(Value::List(vec![inner[1].clone(), inner[0].clone()]));
                }
                cases
            }
            TypeTag::Map(value_tag) => {
                let inner = self.edge_cases(value_tag, size_bound)?;
                let mut cases = vec![Value::Map(FxHashMap::default())];
                if let Some(first) = inner.first() {
                    let mut map = FxHashMap::default();
                    map.insert("a".to_string(), first.clone());
                    cases.push(Value::Map(map));
                }
                cases
            }
            TypeTag::Custom(name) => self.custom_generator(name)?.edge_cases(size_bound),
        })
    }

    /// One uniform draw for a tag
    pub fn generate(
        &self,
        tag: &TypeTag,
        rng: &mut RandomSource,
        size_bound: usize,
    ) -> ContractResult<Value> {
        self.generate_at(tag, rng, size_bound, MAX_GENERATION_DEPTH)
    }

    fn generate_at(
        &self,
        tag: &TypeTag,
        rng: &mut RandomSource,
        size_bound: usize,
        depth: usize,
    ) -> ContractResult<Value> {
        let magnitude = size_bound as i64;
        Ok(match tag {
            TypeTag::Number => {
                if rng.boolean() {
                    Value::Integer(rng.integer_in(-magnitude, magnitude))
                } else {
                    Value::Float(rng.float_in(-(size_bound as f64), size_bound as f64))
                }
            }
            TypeTag::Integer => Value::Integer(rng.integer_in(-magnitude, magnitude)),
            TypeTag::Float => {
                Value::Float(rng.float_in(-(size_bound as f64), size_bound as f64))
            }
            TypeTag::String => {
                let len = rng.length_up_to(size_bound);
                Value::String(rng.string_of(len))
            }
            TypeTag::Boolean => Value::Boolean(rng.boolean()),
            TypeTag::Nil => Value::Nil,
            TypeTag::List(element) => {
                if depth == 0 {
                    return Ok(Value::List(Vec::new()));
                }
                let len = rng.length_up_to(size_bound);
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.generate_at(element, rng, size_bound / 2, depth - 1)?);
                }
                Value::List(items)
            }
            TypeTag::Map(value_tag) => {
                if depth == 0 {
                    return Ok(Value::Map(FxHashMap::default()));
                }
                let entries = rng.length_up_to(size_bound.min(8));
                let mut map = FxHashMap::default();
                for _ in 0..entries {
                    let key_len = rng.length_up_to(3) + 1;
                    let key = rng.string_of(key_len);
                    let value = self.generate_at(value_tag, rng, size_bound / 2, depth - 1)?;
                    map.insert(key, value);
                }
                Value::Map(map)
            }
            TypeTag::Custom(name) => self.custom_generator(name)?.generate(rng, size_bound)?,
        })
    }

    fn custom_generator(&self, name: &str) -> ContractResult<&Arc<dyn ValueGenerator>> {
        self.custom
            .get(name)
            .ok_or_else(|| ContractError::UnknownGenerator(name.to_string()))
    }
}

impl std::fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.custom.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("GeneratorRegistry")
            .field("custom", &names)
            .finish()
    }
}

/// A per-parameter value stream: catalog first, then uniform draws
#[derive(Debug)]
pub struct BiasedGenerator {
    tag: TypeTag,
    size_bound: usize,
    catalog: Vec<Value>,
    cursor: usize,
}

impl BiasedGenerator {
    /// Build the stream for a tag, precomputing its catalog
    pub fn new(registry: &GeneratorRegistry, tag: TypeTag, size_bound: usize) -> ContractResult<Self> {
        let catalog = registry.edge_cases(&tag, size_bound)?;
        Ok(Self {
            tag,
            size_bound,
            catalog,
            cursor: 0,
        })
    }

    /// The tag this stream generates
    pub fn tag(&self) -> &TypeTag {
        &self.tag
    }

    /// The next value: catalog entries in order until exhausted, uniform
    /// draws afterwards
    pub fn next(
        &mut self,
        registry: &GeneratorRegistry,
        rng: &mut RandomSource,
    ) -> ContractResult<Value> {
        if self.cursor < self.catalog.len() {
            let value = self.catalog[self.cursor].clone();
            self.cursor += 1;
            return Ok(value);
        }
        registry.generate(&self.tag, rng, self.size_bound)
    }
}
