//! The grammar store: action bindings, axiom, rewriting rules and the random source.
//!
//! Per-symbol data lives in vectors indexed by [`Symbol::id`], grown as symbols are
//! interned.

use crate::error::GrammarError;
use crate::rng::RandomSource;
use crate::symbol::{Symbol, SymbolTable};
use crate::turtle::Action;
use std::cell::RefCell;

/// An L-System: alphabet, actions, axiom and (possibly stochastic) rules.
///
/// Rule choice goes through a [`RandomSource`] held in a `RefCell`, which is what lets
/// [`Grammar::rewrite`] hand out borrowed expansions while still advancing the generator.
/// The cell also makes `Grammar` `!Sync`: concurrent runs need one grammar each.
#[derive(Clone, Debug)]
pub struct Grammar {
    symbols: SymbolTable,
    actions: Vec<Option<Action>>,
    rules: Vec<Vec<Vec<Symbol>>>,
    axiom: Vec<Symbol>,
    rng: RefCell<RandomSource>,
}

impl Default for Grammar {
    fn default() -> Self {
        Self::with_random_source(RandomSource::from_entropy())
    }
}

impl Grammar {
    /// Empty grammar whose random source is seeded from system entropy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty grammar with a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_random_source(RandomSource::with_seed(seed))
    }

    /// Empty grammar drawing its rule choices from `rng`.
    pub fn with_random_source(rng: RandomSource) -> Self {
        Self {
            symbols: SymbolTable::new(),
            actions: Vec::new(),
            rules: Vec::new(),
            axiom: Vec::new(),
            rng: RefCell::new(rng),
        }
    }

    /// Canonical symbol for `ch`, interning it if needed.
    pub fn intern(&mut self, ch: char) -> Symbol {
        let sym = self.symbols.intern(ch);
        let len = self.symbols.len();
        if self.actions.len() < len {
            self.actions.resize(len, None);
            self.rules.resize_with(len, Vec::new);
        }
        sym
    }

    fn intern_str(&mut self, s: &str) -> Vec<Symbol> {
        s.chars().map(|c| self.intern(c)).collect()
    }

    /// Looks up the symbol for `ch` without interning it.
    pub fn symbol(&self, ch: char) -> Option<Symbol> {
        self.symbols.resolve(ch)
    }

    /// Every symbol seen so far, in first-seen order.
    pub fn symbols(&self) -> &[Symbol] {
        self.symbols.symbols()
    }

    /// Binds `action` to `ch`. A character can carry at most one action.
    pub fn bind(&mut self, ch: char, action: Action) -> Result<Symbol, GrammarError> {
        let sym = self.intern(ch);
        let slot = &mut self.actions[sym.index()];
        if slot.is_some() {
            return Err(GrammarError::DuplicateAction { symbol: ch });
        }
        *slot = Some(action);
        Ok(sym)
    }

    /// Binds the action named `name` (see [`Action`]'s `FromStr`) to `ch`.
    pub fn bind_action(&mut self, ch: char, name: &str) -> Result<Symbol, GrammarError> {
        if let Some(sym) = self.symbol(ch)
            && self.action(sym).is_some()
        {
            return Err(GrammarError::DuplicateAction { symbol: ch });
        }
        let action: Action = name.parse()?;
        self.bind(ch, action)
    }

    /// Replaces the axiom. An empty string gives an empty axiom.
    pub fn set_axiom(&mut self, axiom: &str) {
        self.axiom = self.intern_str(axiom);
    }

    /// Appends one alternative right-hand side for `lhs`.
    ///
    /// Adding the same expansion twice is allowed and doubles its selection weight.
    pub fn add_rule(&mut self, lhs: char, expansion: &str) {
        let left = self.intern(lhs);
        let rhs = self.intern_str(expansion);
        self.rules[left.index()].push(rhs);
    }

    /// The axiom as interned symbols.
    pub fn axiom(&self) -> &[Symbol] {
        &self.axiom
    }

    /// The action bound to `sym`, if any.
    pub fn action(&self, sym: Symbol) -> Option<Action> {
        self.actions.get(sym.index()).copied().flatten()
    }

    /// All registered right-hand sides for `sym`, in insertion order.
    pub fn alternatives(&self, sym: Symbol) -> &[Vec<Symbol>] {
        self.rules
            .get(sym.index())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// True when `sym` has no rule.
    pub fn is_terminal(&self, sym: Symbol) -> bool {
        self.alternatives(sym).is_empty()
    }

    /// Picks the expansion of `sym` for one rewriting step.
    ///
    /// Returns `None` for terminal symbols, never an empty slice in their place. For a
    /// symbol with rules, exactly one value is drawn from the random source, even when
    /// there is a single alternative.
    pub fn rewrite(&self, sym: Symbol) -> Option<&[Symbol]> {
        let candidates = self.alternatives(sym);
        if candidates.is_empty() {
            return None;
        }
        let k = self.rng.borrow_mut().choose(candidates.len());
        Some(&candidates[k])
    }

    /// Rewinds the random source to its seed.
    pub fn reset_rng(&self) {
        self.rng.borrow_mut().reset();
    }

    /// Stores a new seed and rewinds to it.
    pub fn set_seed(&mut self, seed: u64) {
        self.rng.get_mut().set_seed(seed);
    }

    /// Seed the random source rewinds to.
    pub fn seed(&self) -> u64 {
        self.rng.borrow().seed()
    }

    /// Symbols with neither an action nor a rule. They are legal but never do anything.
    pub fn inert_symbols(&self) -> Vec<Symbol> {
        self.symbols()
            .iter()
            .copied()
            .filter(|&s| self.action(s).is_none() && self.is_terminal(s))
            .collect()
    }

    /// Upper bound on the number of leaf evaluations of `Engine::run(seq, rounds)`.
    ///
    /// Each rule contributes its largest alternative, so the bound holds for every random
    /// choice. Saturates at `u128::MAX`. Work is proportional to `rounds` times the total
    /// rule length, and stops early once the per-symbol counts stop changing.
    pub fn expansion_bound(&self, seq: &[Symbol], rounds: u32) -> u128 {
        let mut counts = vec![1u128; self.symbols.len()];

        for _ in 0..rounds {
            let next: Vec<u128> = self
                .symbols()
                .iter()
                .map(|&s| {
                    let alternatives = self.alternatives(s);
                    if alternatives.is_empty() {
                        return 1;
                    }
                    alternatives
                        .iter()
                        .map(|rhs| {
                            rhs.iter()
                                .fold(0u128, |acc, c| acc.saturating_add(counts[c.index()]))
                        })
                        .max()
                        .unwrap_or(0)
                })
                .collect();

            if next == counts {
                break;
            }
            counts = next;
        }

        seq.iter().fold(0u128, |acc, s| {
            acc.saturating_add(counts.get(s.index()).copied().unwrap_or(1))
        })
    }
}
