//! Two-pass rendering.
//!
//! The engine cannot know the extent of a drawing before it has walked it, so every
//! back-end here runs the grammar twice: a dry run with a [`SilentTurtle`] to learn the
//! bounding box, then the real run with a drawing turtle whose output is fitted to the
//! target surface. The random source is reset before each pass so both passes choose the
//! same rule alternatives.

use crate::config::LSystem;
use crate::drawing::{Drawing, RecordingTurtle};
use crate::engine::Engine;
use crate::error::RenderError;
use crate::geometry::{BoundingBox, Viewport};
use crate::postscript::{self, PostScriptTurtle};
use crate::raster::RasterTurtle;
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Output settings shared by the back-ends.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RenderOptions {
    /// EPS page size in points. Default: US letter.
    pub page_size: (f64, f64),
    /// Free border around the drawing on the page, in points.
    pub page_margin: f64,
    /// Stroke width on the page, in points.
    pub line_width: f64,
    /// Raster canvas size in pixels.
    pub canvas_size: (u32, u32),
    /// Free border around the drawing on the canvas, in pixels.
    pub canvas_margin: f64,
    pub background: [u8; 4],
    pub ink: [u8; 4],
    /// Refuse runs whose expansion could evaluate more symbols than this.
    pub max_symbols: u128,
    /// Refuse runs nested deeper than this. Each round is one level of recursion, and a
    /// rule that does not grow keeps `max_symbols` from catching a huge round count.
    pub max_rounds: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page_size: (612.0, 792.0),
            page_margin: 36.0,
            line_width: 1.0,
            canvas_size: (1024, 1024),
            canvas_margin: 16.0,
            background: [255, 255, 255, 255],
            ink: [0, 0, 0, 255],
            max_symbols: 50_000_000,
            max_rounds: 1024,
        }
    }
}

/// Checks a run against the limits in `options` and returns its expansion bound.
///
/// Fails with [`RenderError::TooDeep`] past `max_rounds`, and with
/// [`RenderError::TooLarge`] when the axiom may expand past `max_symbols` symbols.
pub fn check_budget(
    system: &LSystem,
    rounds: u32,
    options: &RenderOptions,
) -> Result<u128, RenderError> {
    if rounds > options.max_rounds {
        return Err(RenderError::TooDeep {
            rounds,
            limit: options.max_rounds,
        });
    }
    let grammar = &system.grammar;
    let bound = grammar.expansion_bound(grammar.axiom(), rounds);
    if bound > options.max_symbols {
        return Err(RenderError::TooLarge {
            bound,
            limit: options.max_symbols,
        });
    }
    Ok(bound)
}

/// Runs the axiom on a silent turtle and returns its bounding box.
///
/// Unchecked: call [`check_budget`] first when `rounds` comes from outside.
pub fn dry_run(system: &LSystem, rounds: u32) -> BoundingBox {
    system.grammar.reset_rng();
    let mut turtle = system.setup.silent();
    let bounds = Engine::new(&system.grammar).run_axiom(&mut turtle, rounds);
    log::debug!(
        "dry run ({rounds} rounds): min=({}, {}) max=({}, {})",
        bounds.min.x,
        bounds.min.y,
        bounds.max.x,
        bounds.max.y
    );
    bounds
}

/// Runs the axiom on a [`RecordingTurtle`]. Unchecked, like [`dry_run`].
pub fn record(system: &LSystem, rounds: u32) -> Drawing {
    system.grammar.reset_rng();
    let mut turtle = RecordingTurtle::new();
    system.setup.apply(&mut turtle);
    let bounds = Engine::new(&system.grammar).run_axiom(&mut turtle, rounds);
    let mut drawing = turtle.into_drawing();
    drawing.bounds = Some(bounds);
    drawing
}

/// Writes the drawing as an EPS document fitted to the page. Returns the dry-run box.
pub fn render_eps<W: Write>(
    system: &LSystem,
    rounds: u32,
    title: &str,
    options: &RenderOptions,
    mut out: W,
) -> Result<BoundingBox, RenderError> {
    check_budget(system, rounds, options)?;
    let bounds = dry_run(system, rounds);

    let (width, height) = options.page_size;
    let viewport = Viewport::fit(&bounds, width, height, options.page_margin);
    log::debug!(
        "page viewport: scale={} translation=({}, {})",
        viewport.scale(),
        viewport.translation().x,
        viewport.translation().y
    );
    postscript::write_prologue(&mut out, title, &bounds, &viewport, options.line_width)?;

    system.grammar.reset_rng();
    let mut turtle = PostScriptTurtle::new(&mut out);
    system.setup.apply(&mut turtle);
    Engine::new(&system.grammar).run_axiom(&mut turtle, rounds);
    turtle.finish()?;

    postscript::write_trailer(&mut out)?;
    out.flush()?;
    Ok(bounds)
}

/// Paints the drawing onto a fresh canvas fitted to the dry-run bounding box.
pub fn render_raster(
    system: &LSystem,
    rounds: u32,
    options: &RenderOptions,
) -> Result<RgbaImage, RenderError> {
    let (width, height) = options.canvas_size;
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyCanvas { width, height });
    }
    check_budget(system, rounds, options)?;
    let bounds = dry_run(system, rounds);

    let viewport = Viewport::fit(
        &bounds,
        f64::from(width),
        f64::from(height),
        options.canvas_margin,
    );

    system.grammar.reset_rng();
    let mut turtle = RasterTurtle::blank(
        width,
        height,
        Rgba(options.background),
        viewport,
        Rgba(options.ink),
    );
    system.setup.apply(&mut turtle);
    Engine::new(&system.grammar).run_axiom(&mut turtle, rounds);
    Ok(turtle.into_image())
}

/// Records the drawing and writes it as pretty-printed JSON.
pub fn render_json<W: Write>(
    system: &LSystem,
    rounds: u32,
    options: &RenderOptions,
    mut out: W,
) -> Result<Drawing, RenderError> {
    check_budget(system, rounds, options)?;
    let drawing = record(system, rounds);
    serde_json::to_writer_pretty(&mut out, &drawing)?;
    writeln!(out)?;
    Ok(drawing)
}
