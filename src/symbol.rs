//! Interned grammar symbols.
//!
//! Every distinct character seen by a [`crate::Grammar`] is interned exactly once into a
//! [`SymbolTable`]. The resulting [`Symbol`] is a small `Copy` value carrying a dense ID,
//! so per-symbol data (actions, rules) can live in plain vectors indexed by
//! [`Symbol::id`] instead of hash maps.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Dense identifier assigned to a symbol in first-seen order.
pub type SymbolId = u32;

/// A single character of an L-System alphabet.
///
/// Two symbols compare equal exactly when they wrap the same character: the table never
/// hands out two IDs for one character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Symbol {
    id: SymbolId,
    ch: char,
}

impl Symbol {
    /// The dense index of this symbol inside its table.
    pub fn id(self) -> SymbolId {
        self.id
    }

    /// The character this symbol stands for.
    pub fn as_char(self) -> char {
        self.ch
    }

    pub(crate) fn index(self) -> usize {
        self.id as usize
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ch)
    }
}

/// Arena of interned symbols.
///
/// ASCII characters resolve through a fixed 128-entry table; anything else goes through a
/// sparse map. Symbols are stored in insertion order, so `symbols()[s.id()] == s`.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    ascii: [Option<Symbol>; 128],
    other: HashMap<char, Symbol>,
    symbols: Vec<Symbol>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self {
            ascii: [None; 128],
            other: HashMap::new(),
            symbols: Vec::new(),
        }
    }
}

impl SymbolTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the canonical symbol for `ch`, creating it on first request.
    pub fn intern(&mut self, ch: char) -> Symbol {
        if let Some(sym) = self.resolve(ch) {
            return sym;
        }

        let sym = Symbol {
            id: self.symbols.len() as SymbolId,
            ch,
        };
        self.symbols.push(sym);
        if ch.is_ascii() {
            self.ascii[ch as usize] = Some(sym);
        } else {
            self.other.insert(ch, sym);
        }
        sym
    }

    /// Interns every character of `s`, in order.
    pub fn intern_str(&mut self, s: &str) -> Vec<Symbol> {
        s.chars().map(|c| self.intern(c)).collect()
    }

    /// Looks up `ch` without interning it.
    pub fn resolve(&self, ch: char) -> Option<Symbol> {
        if ch.is_ascii() {
            self.ascii[ch as usize]
        } else {
            self.other.get(&ch).copied()
        }
    }

    /// All symbols, indexed by ID.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Number of interned symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// True until the first symbol is interned.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
