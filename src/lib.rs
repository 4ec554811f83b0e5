//! # lindenmayer
//!
//! A turtle-graphics interpreter for L-System grammars.
//!
//! A [`Grammar`] holds the alphabet, the action bound to each symbol, the axiom and the
//! (possibly stochastic) rewriting rules. The [`Engine`] rewrites the axiom for a number
//! of rounds while driving any [`Turtle`], without ever materializing the expanded
//! string, and returns the [`BoundingBox`] of every position the turtle visited.
//!
//! Turtles differ only in their side effects: [`SilentTurtle`] tracks state for dry runs,
//! [`RecordingTurtle`] produces a serializable [`Drawing`], [`PostScriptTurtle`] writes EPS
//! path commands and [`RasterTurtle`] paints pixels. The [`render`] module wires them into
//! the dry-run-then-draw protocol.

pub mod config;
pub mod drawing;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod grammar;
pub mod postscript;
pub mod raster;
pub mod render;
pub mod rng;
pub mod symbol;
pub mod turtle;

pub use config::*;
pub use drawing::*;
pub use engine::*;
pub use error::*;
pub use geometry::*;
pub use grammar::*;
pub use postscript::PostScriptTurtle;
pub use raster::*;
pub use render::RenderOptions;
pub use rng::*;
pub use symbol::*;
pub use turtle::*;
