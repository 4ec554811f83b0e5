//! Engine-agnostic drawing output.
//!
//! A [`Drawing`] is the vector result of a run: the visible line segments plus the trace of
//! every position the turtle stood on. It can be serialized as JSON and consumed by any
//! renderer, independent of the PostScript and raster back-ends in this crate.

use crate::geometry::BoundingBox;
use crate::turtle::{Pose, Turtle, TurtleState};
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// One visible line left by a `draw` action.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub from: DVec2,
    pub to: DVec2,
}

impl Segment {
    /// Euclidean length.
    pub fn length(&self) -> f64 {
        self.from.distance(self.to)
    }
}

/// The recorded result of a run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    /// Where the turtle was placed before the run.
    pub start: Option<Pose>,

    /// Visible segments in the order they were drawn.
    pub segments: Vec<Segment>,

    /// Every position the turtle moved to (by `draw`, `move` or `pop`), starting with the
    /// initial position.
    pub trace: Vec<DVec2>,

    /// Bounding box returned by the engine, if the drawing came from a full run.
    pub bounds: Option<BoundingBox>,
}

impl Drawing {
    /// Empty drawing with no start pose.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total length of all visible segments.
    pub fn ink_length(&self) -> f64 {
        self.segments.iter().map(Segment::length).sum()
    }

    /// Bounding box of the trace, computed independently of the engine.
    pub fn trace_bounds(&self) -> Option<BoundingBox> {
        let (first, rest) = self.trace.split_first()?;
        let mut bounds = BoundingBox::at(*first);
        for &p in rest {
            bounds.include(p);
        }
        Some(bounds)
    }
}

/// Turtle that records its path into a [`Drawing`].
#[derive(Clone, Debug, Default)]
pub struct RecordingTurtle {
    state: TurtleState,
    drawing: Drawing,
}

impl RecordingTurtle {
    /// Recorder at the default pose. [`Turtle::init`] starts a fresh drawing.
    pub fn new() -> Self {
        Self::default()
    }

    /// The drawing recorded so far.
    pub fn drawing(&self) -> &Drawing {
        &self.drawing
    }

    /// Consumes the turtle and returns its drawing.
    pub fn into_drawing(self) -> Drawing {
        self.drawing
    }
}

impl Turtle for RecordingTurtle {
    fn state(&self) -> &TurtleState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TurtleState {
        &mut self.state
    }

    fn draw(&mut self) {
        let from = self.state.advance();
        let to = self.state.position;
        self.drawing.segments.push(Segment { from, to });
        self.drawing.trace.push(to);
    }

    fn move_forward(&mut self) {
        self.state.advance();
        self.drawing.trace.push(self.state.position);
    }

    fn pop(&mut self) {
        if self.state.restore().is_some() {
            self.drawing.trace.push(self.state.position);
        }
    }

    fn init(&mut self, position: DVec2, heading: f64) {
        self.state.reset(position, heading);
        self.drawing = Drawing {
            start: Some(self.state.pose()),
            trace: vec![position],
            ..Default::default()
        };
    }
}
