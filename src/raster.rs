//! Pixel back-end: paints drawn segments into an RGBA canvas.

use crate::geometry::Viewport;
use crate::turtle::{Turtle, TurtleState};
use glam::DVec2;
use image::{Rgba, RgbaImage};

/// Turtle that rasterizes every `draw` into an [`RgbaImage`].
///
/// World coordinates go through a [`Viewport`], normally fitted to the dry-run bounding box
/// so the whole drawing lands on the canvas. Pixels outside the canvas are clipped.
pub struct RasterTurtle {
    state: TurtleState,
    canvas: RgbaImage,
    viewport: Viewport,
    ink: Rgba<u8>,
}

impl RasterTurtle {
    /// Paints onto an existing `canvas`.
    pub fn new(canvas: RgbaImage, viewport: Viewport, ink: Rgba<u8>) -> Self {
        Self {
            state: TurtleState::default(),
            canvas,
            viewport,
            ink,
        }
    }

    /// A `width` x `height` canvas filled with `background`.
    pub fn blank(
        width: u32,
        height: u32,
        background: Rgba<u8>,
        viewport: Viewport,
        ink: Rgba<u8>,
    ) -> Self {
        Self::new(
            RgbaImage::from_pixel(width, height, background),
            viewport,
            ink,
        )
    }

    /// The canvas as painted so far.
    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    /// Consumes the turtle and returns the painted canvas.
    pub fn into_image(self) -> RgbaImage {
        self.canvas
    }

    fn plot(&mut self, p: DVec2) {
        let (x, y) = (p.x.floor(), p.y.floor());
        if x < 0.0 || y < 0.0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x < self.canvas.width() && y < self.canvas.height() {
            self.canvas.put_pixel(x, y, self.ink);
        }
    }

    /// Samples the segment at (at most) one-pixel intervals.
    fn line(&mut self, from: DVec2, to: DVec2) {
        let a = self.viewport.to_pixel(from);
        let b = self.viewport.to_pixel(to);
        let delta = b - a;
        let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0);
        if !steps.is_finite() {
            return;
        }
        let n = steps as u64;
        for i in 0..=n {
            let t = i as f64 / steps;
            self.plot(a + delta * t);
        }
    }
}

impl Turtle for RasterTurtle {
    fn state(&self) -> &TurtleState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TurtleState {
        &mut self.state
    }

    fn draw(&mut self) {
        let from = self.state.advance();
        let to = self.state.position;
        self.line(from, to);
    }
}
