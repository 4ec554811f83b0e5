//! The rewrite-and-draw engine.
//!
//! [`Engine::run`] walks a symbol sequence while rewriting it: with rounds left, every
//! symbol with a rule is replaced by one of its expansions and the expansion is walked one
//! round lower; terminal symbols and everything reached at round zero is executed on the
//! turtle. No intermediate string is ever built, so memory is bounded by the recursion
//! depth (`rounds`), but the number of evaluated symbols grows exponentially with
//! `rounds` for any grammar whose expansions are longer than one symbol. Callers should
//! bound both beforehand: [`Grammar::expansion_bound`] for the work and a plain round
//! limit for the depth, as [`crate::render::check_budget`] does.

use crate::geometry::BoundingBox;
use crate::grammar::Grammar;
use crate::symbol::Symbol;
use crate::turtle::Turtle;

/// Interprets a [`Grammar`] on a turtle.
///
/// The engine only borrows the grammar; all mutable state lives in the turtle and in the
/// grammar's random source. Running twice with a reset random source and identically
/// set-up turtles produces the same positions, which is what the dry-run protocol in
/// [`crate::render`] relies on.
#[derive(Clone, Copy, Debug)]
pub struct Engine<'g> {
    grammar: &'g Grammar,
}

impl<'g> Engine<'g> {
    /// Engine over `grammar`. Cheap: it only holds the reference.
    pub fn new(grammar: &'g Grammar) -> Self {
        Self { grammar }
    }

    /// The grammar being interpreted.
    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    /// Runs the grammar's axiom for `rounds` rewriting rounds.
    pub fn run_axiom<T: Turtle + ?Sized>(&self, turtle: &mut T, rounds: u32) -> BoundingBox {
        self.run(turtle, self.grammar.axiom(), rounds)
    }

    /// Rewrites `seq` `rounds` times while driving `turtle`, and returns the bounding box of
    /// every position the turtle occupied, including the one it started from.
    ///
    /// Symbols are processed strictly left to right. A symbol without a rule is executed
    /// immediately whatever the remaining round count; a symbol without a rule or an
    /// action does nothing.
    pub fn run<T: Turtle + ?Sized>(
        &self,
        turtle: &mut T,
        seq: &[Symbol],
        rounds: u32,
    ) -> BoundingBox {
        if rounds == 0 {
            return self.execute(turtle, seq);
        }

        let mut bounds: Option<BoundingBox> = None;
        for &sym in seq {
            let sub = match self.grammar.rewrite(sym) {
                Some(expansion) => self.run(turtle, expansion, rounds - 1),
                None => self.execute(turtle, std::slice::from_ref(&sym)),
            };
            bounds = Some(match bounds {
                Some(b) => b.union(sub),
                None => sub,
            });
        }

        bounds.unwrap_or_else(|| BoundingBox::at(turtle.position()))
    }

    /// Base case: executes every symbol's action, sampling the position after each one.
    fn execute<T: Turtle + ?Sized>(&self, turtle: &mut T, seq: &[Symbol]) -> BoundingBox {
        let mut bounds = BoundingBox::at(turtle.position());
        for &sym in seq {
            if let Some(action) = self.grammar.action(sym) {
                turtle.perform(action);
            }
            bounds.include(turtle.position());
        }
        bounds
    }
}
