//! JSON grammar descriptions.
//!
//! ```json
//! {
//!   "seed": 42,
//!   "parameters": { "step": 2, "angle": 22.5, "start": [0, 0, 90] },
//!   "actions": { "F": "draw", "+": "turnL", "-": "turnR", "[": "push", "]": "pop" },
//!   "axiom": "F",
//!   "rules": { "F": ["F[+F]F", "F[-F]F"] }
//! }
//! ```
//!
//! `seed` and `parameters` are optional; `actions`, `axiom` and `rules` are mandatory.
//! A key may appear only once in `actions` and once in `rules`.

use crate::error::LoadError;
use crate::grammar::Grammar;
use crate::turtle::TurtleSetup;
use glam::DVec2;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use std::marker::PhantomData;
use std::path::Path;

/// A JSON object kept as its entries in document order.
///
/// Unlike a map, repeated keys survive deserialization, so the loader can reject them
/// instead of silently keeping the last one.
#[derive(Clone, Debug, PartialEq)]
pub struct Entries<V>(pub Vec<(String, V)>);

impl<V> Default for Entries<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<V> Entries<V> {
    /// Iterates over `(key, value)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<V: Serialize> Serialize for Entries<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Entries<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
            type Value = Entries<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, V>()? {
                    entries.push(entry);
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

/// Turtle parameters of a grammar file. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    /// Unit turn angle in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    /// `[x, y, heading_degrees]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<[f64; 3]>,
}

/// Raw, unvalidated contents of a grammar file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LSystemSpec {
    /// Seed for rule selection. Signed so that 64-bit seeds from other tools round-trip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Parameters>,
    #[serde(default)]
    pub actions: Option<Entries<String>>,
    #[serde(default)]
    pub axiom: Option<String>,
    #[serde(default)]
    pub rules: Option<Entries<Vec<String>>>,
}

fn symbol_key(key: &str) -> Result<char, LoadError> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(LoadError::InvalidSymbolKey(key.to_string())),
    }
}

fn finite(name: &'static str, value: f64) -> Result<f64, LoadError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LoadError::InvalidParameter {
            name,
            reason: format!("expected a finite number, got {value}"),
        })
    }
}

fn positive(name: &'static str, value: f64) -> Result<f64, LoadError> {
    let value = finite(name, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(LoadError::InvalidParameter {
            name,
            reason: format!("expected a positive number, got {value}"),
        })
    }
}

impl LSystemSpec {
    /// Parses a grammar description without validating it.
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Like [`from_json`](Self::from_json), reading from any `Read`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Reads and parses a grammar file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Turtle placement and units, falling back to [`TurtleSetup::default`] per field.
    ///
    /// Every value must be finite and `step` must be positive.
    pub fn setup(&self) -> Result<TurtleSetup, LoadError> {
        let mut setup = TurtleSetup::default();
        let Some(params) = &self.parameters else {
            return Ok(setup);
        };
        if let Some(step) = params.step {
            setup.step = positive("step", step)?;
        }
        if let Some(angle) = params.angle {
            setup.angle = finite("angle", angle)?;
        }
        if let Some([x, y, heading]) = params.start {
            setup.start = DVec2::new(finite("start", x)?, finite("start", y)?);
            setup.heading = finite("start", heading)?;
        }
        Ok(setup)
    }

    /// Builds the grammar: seed, then actions, axiom and rules, in that order.
    ///
    /// Configuration errors are returned here, before any run. A repeated `actions` key
    /// fails as a duplicate binding and a repeated `rules` key as
    /// [`LoadError::DuplicateKey`]. Symbols that end up with neither an action nor a rule
    /// are only reported.
    pub fn grammar(&self) -> Result<Grammar, LoadError> {
        let mut grammar = match self.seed {
            Some(seed) => Grammar::with_seed(seed as u64),
            None => Grammar::new(),
        };

        let actions = self
            .actions
            .as_ref()
            .ok_or(LoadError::MissingField("actions"))?;
        for (key, name) in actions.iter() {
            grammar.bind_action(symbol_key(key)?, name)?;
        }

        let axiom = self
            .axiom
            .as_deref()
            .ok_or(LoadError::MissingField("axiom"))?;
        grammar.set_axiom(axiom);

        let rules = self.rules.as_ref().ok_or(LoadError::MissingField("rules"))?;
        let mut seen = HashSet::new();
        for (key, expansions) in rules.iter() {
            let lhs = symbol_key(key)?;
            if !seen.insert(lhs) {
                return Err(LoadError::DuplicateKey {
                    section: "rules",
                    key: key.to_string(),
                });
            }
            for expansion in expansions {
                grammar.add_rule(lhs, expansion);
            }
        }

        let inert = grammar.inert_symbols();
        if !inert.is_empty() {
            let listed: String = inert.iter().map(|s| s.as_char()).collect();
            log::warn!("symbols with neither action nor rule are ignored: {listed:?}");
        }

        Ok(grammar)
    }

    /// Validates the description and builds the grammar and turtle setup.
    pub fn load(&self) -> Result<LSystem, LoadError> {
        Ok(LSystem {
            grammar: self.grammar()?,
            setup: self.setup()?,
        })
    }
}

/// A loaded grammar together with the turtle setup it should be drawn with.
#[derive(Clone, Debug)]
pub struct LSystem {
    pub grammar: Grammar,
    pub setup: TurtleSetup,
}

impl LSystem {
    /// Bundles an already built grammar with its setup.
    pub fn new(grammar: Grammar, setup: TurtleSetup) -> Self {
        Self { grammar, setup }
    }

    /// Parses and validates a grammar description in one step.
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        LSystemSpec::from_json(text)?.load()
    }

    /// Reads, parses and validates a grammar file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        LSystemSpec::from_path(path)?.load()
    }
}
