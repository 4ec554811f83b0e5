//! Turtle state, the [`Turtle`] capability trait and the silent state-only turtle.

use crate::error::GrammarError;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of turtle actions a symbol can be bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Advance one unit step and leave a visible line.
    Draw,
    /// Advance one unit step without drawing.
    Move,
    /// Rotate counter-clockwise by the unit angle.
    TurnLeft,
    /// Rotate clockwise by the unit angle.
    TurnRight,
    /// Save position and heading onto the stack (`[`).
    Push,
    /// Restore the most recently pushed position and heading (`]`).
    Pop,
    /// Explicit no-op, distinct from having no action bound at all.
    Stay,
}

impl Action {
    /// Every action, in declaration order.
    pub const ALL: [Action; 7] = [
        Action::Draw,
        Action::Move,
        Action::TurnLeft,
        Action::TurnRight,
        Action::Push,
        Action::Pop,
        Action::Stay,
    ];

    /// Canonical lowercase name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Action::Draw => "draw",
            Action::Move => "move",
            Action::TurnLeft => "turnl",
            Action::TurnRight => "turnr",
            Action::Push => "push",
            Action::Pop => "pop",
            Action::Stay => "stay",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = GrammarError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draw" => Ok(Action::Draw),
            "move" => Ok(Action::Move),
            "turnl" | "turnleft" => Ok(Action::TurnLeft),
            "turnr" | "turnright" => Ok(Action::TurnRight),
            "push" => Ok(Action::Push),
            "pop" => Ok(Action::Pop),
            "stay" => Ok(Action::Stay),
            _ => Err(GrammarError::UnknownAction {
                name: s.to_string(),
            }),
        }
    }
}

/// Position and heading, the part of the state saved by `push`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: DVec2,
    /// Degrees, 0 = facing +x, counter-clockwise positive.
    pub heading: f64,
}

/// The state every turtle variant carries.
///
/// All movement math lives here so that every [`Turtle`] implementation agrees on where
/// the turtle ends up; variants only differ in what they do with the motion.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TurtleState {
    /// Current position on the plane.
    pub position: DVec2,
    /// Current heading in degrees.
    pub heading: f64,
    /// Length of one `draw`/`move`.
    pub step: f64,
    /// Unit turn in degrees.
    pub angle: f64,
    stack: Vec<Pose>,
}

impl Default for TurtleState {
    fn default() -> Self {
        Self {
            position: DVec2::ZERO,
            heading: 0.0,
            step: 1.0,
            angle: 90.0,
            stack: Vec::new(),
        }
    }
}

impl TurtleState {
    /// State at `position` facing `heading` degrees, with default units.
    pub fn new(position: DVec2, heading: f64) -> Self {
        Self {
            position,
            heading,
            ..Default::default()
        }
    }

    /// Unit vector along the current heading.
    pub fn direction(&self) -> DVec2 {
        let rad = self.heading.to_radians();
        DVec2::new(rad.cos(), rad.sin())
    }

    /// Current position and heading.
    pub fn pose(&self) -> Pose {
        Pose {
            position: self.position,
            heading: self.heading,
        }
    }

    /// Moves one unit step forward and returns the position before the move.
    pub fn advance(&mut self) -> DVec2 {
        let from = self.position;
        self.position += self.direction() * self.step;
        from
    }

    /// Rotates by `sign` unit angles (positive is counter-clockwise).
    pub fn turn(&mut self, sign: f64) {
        self.heading += sign * self.angle;
    }

    /// Pushes the current pose.
    pub fn save(&mut self) {
        self.stack.push(self.pose());
    }

    /// Restores the last saved pose.
    ///
    /// An empty stack is reported and leaves the state untouched.
    pub fn restore(&mut self) -> Option<Pose> {
        let pose = match self.stack.pop() {
            Some(p) => p,
            None => {
                log::warn!(
                    "turtle pop with empty stack at ({}, {}); ignored",
                    self.position.x,
                    self.position.y
                );
                return None;
            }
        };
        self.position = pose.position;
        self.heading = pose.heading;
        Some(pose)
    }

    /// Places the turtle and clears the stack. Units are kept.
    pub fn reset(&mut self, position: DVec2, heading: f64) {
        self.position = position;
        self.heading = heading;
        self.stack.clear();
    }

    /// Number of saved poses.
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }
}

/// A 2D pen driven by the [`crate::Engine`].
///
/// Implementors expose their [`TurtleState`]; the provided methods implement the shared
/// movement semantics. Variants override the actions whose side effect they care about
/// (emitting a line, stroking a path) and must still update the state through the
/// [`TurtleState`] helpers.
pub trait Turtle {
    fn state(&self) -> &TurtleState;

    fn state_mut(&mut self) -> &mut TurtleState;

    fn draw(&mut self) {
        self.state_mut().advance();
    }

    fn move_forward(&mut self) {
        self.state_mut().advance();
    }

    fn turn_left(&mut self) {
        self.state_mut().turn(1.0);
    }

    fn turn_right(&mut self) {
        self.state_mut().turn(-1.0);
    }

    fn push(&mut self) {
        self.state_mut().save();
    }

    fn pop(&mut self) {
        self.state_mut().restore();
    }

    fn stay(&mut self) {}

    /// Sets position and heading (degrees) and clears the saved-state stack.
    fn init(&mut self, position: DVec2, heading: f64) {
        self.state_mut().reset(position, heading);
    }

    /// Sets the unit step length and the unit turn angle in degrees.
    fn set_units(&mut self, step: f64, angle: f64) {
        let state = self.state_mut();
        state.step = step;
        state.angle = angle;
    }

    fn position(&self) -> DVec2 {
        self.state().position
    }

    fn heading(&self) -> f64 {
        self.state().heading
    }

    fn unit_step(&self) -> f64 {
        self.state().step
    }

    fn unit_angle(&self) -> f64 {
        self.state().angle
    }

    /// Dispatches a bound action to the matching method.
    fn perform(&mut self, action: Action) {
        match action {
            Action::Draw => self.draw(),
            Action::Move => self.move_forward(),
            Action::TurnLeft => self.turn_left(),
            Action::TurnRight => self.turn_right(),
            Action::Push => self.push(),
            Action::Pop => self.pop(),
            Action::Stay => self.stay(),
        }
    }
}

/// Turtle that only tracks its state. Used for the bounding-box dry run.
#[derive(Clone, Debug, Default)]
pub struct SilentTurtle {
    state: TurtleState,
}

impl SilentTurtle {
    /// Silent turtle at `position` facing `heading` degrees.
    pub fn new(position: DVec2, heading: f64) -> Self {
        Self {
            state: TurtleState::new(position, heading),
        }
    }
}

impl Turtle for SilentTurtle {
    fn state(&self) -> &TurtleState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TurtleState {
        &mut self.state
    }
}

/// Initial placement and units handed to a turtle before a run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurtleSetup {
    /// Starting position.
    pub start: DVec2,
    /// Starting heading in degrees. Default: 90 (facing up).
    pub heading: f64,
    /// Unit step length. Default: 1.
    pub step: f64,
    /// Unit turn angle in degrees. Default: 90.
    pub angle: f64,
}

impl Default for TurtleSetup {
    fn default() -> Self {
        Self {
            start: DVec2::ZERO,
            heading: 90.0,
            step: 1.0,
            angle: 90.0,
        }
    }
}

impl TurtleSetup {
    /// Configures units, then places the turtle.
    pub fn apply<T: Turtle + ?Sized>(&self, turtle: &mut T) {
        turtle.set_units(self.step, self.angle);
        turtle.init(self.start, self.heading);
    }

    /// A fresh [`SilentTurtle`] configured with this setup.
    pub fn silent(&self) -> SilentTurtle {
        let mut turtle = SilentTurtle::default();
        self.apply(&mut turtle);
        turtle
    }
}
