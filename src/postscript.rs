//! Encapsulated PostScript back-end.
//!
//! [`PostScriptTurtle`] writes path operators in world coordinates; the document prologue
//! written by [`write_prologue`] installs the world-to-page transform computed from a dry
//! run, so the turtle never needs to know the page size.

use crate::geometry::{BoundingBox, Viewport};
use crate::turtle::{Turtle, TurtleState};
use glam::DVec2;
use std::fmt;
use std::io::{self, Write};

/// Turtle that emits PostScript path commands.
///
/// The first path is opened by [`init`](Turtle::init), or lazily at the current position
/// by the first action that needs one.
///
/// Turtle actions cannot fail, so the first I/O error is kept and every later write is
/// skipped; [`finish`](Self::finish) reports it.
pub struct PostScriptTurtle<W: Write> {
    state: TurtleState,
    out: W,
    error: Option<io::Error>,
    commands: usize,
    open: bool,
}

impl<W: Write> PostScriptTurtle<W> {
    /// Turtle at the default pose. Nothing is written until the first action.
    pub fn new(out: W) -> Self {
        Self {
            state: TurtleState::default(),
            out,
            error: None,
            commands: 0,
            open: false,
        }
    }

    fn emit(&mut self, line: fmt::Arguments<'_>) {
        if self.error.is_some() {
            return;
        }
        match writeln!(self.out, "{line}") {
            Ok(()) => self.commands += 1,
            Err(e) => self.error = Some(e),
        }
    }

    /// Starts the first path at the current position, once.
    fn open_path(&mut self) {
        if !self.open {
            self.open = true;
            let p = self.state.position;
            self.emit(format_args!("newpath {} moveto", Coord(p)));
        }
    }

    /// Number of command lines written so far.
    pub fn commands(&self) -> usize {
        self.commands
    }

    /// Strokes the pending path and returns the writer, or the first error encountered.
    pub fn finish(mut self) -> io::Result<W> {
        if self.open {
            self.emit(format_args!("stroke"));
        }
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> Turtle for PostScriptTurtle<W> {
    fn state(&self) -> &TurtleState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TurtleState {
        &mut self.state
    }

    fn draw(&mut self) {
        self.open_path();
        self.state.advance();
        let p = self.state.position;
        self.emit(format_args!("{} lineto", Coord(p)));
    }

    fn move_forward(&mut self) {
        self.open_path();
        self.state.advance();
        let p = self.state.position;
        self.emit(format_args!("{} moveto", Coord(p)));
    }

    fn push(&mut self) {
        self.open_path();
        self.state.save();
        self.emit(format_args!("currentpoint stroke newpath moveto"));
    }

    fn pop(&mut self) {
        if self.state.restore().is_some() {
            let p = self.state.position;
            self.emit(format_args!("stroke newpath {} moveto", Coord(p)));
        }
    }

    fn init(&mut self, position: DVec2, heading: f64) {
        self.state.reset(position, heading);
        if self.open {
            self.emit(format_args!("stroke newpath {} moveto", Coord(position)));
        } else {
            self.open_path();
        }
    }
}

/// `x y` with fixed precision.
struct Coord(DVec2);

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} {:.4}", self.0.x, self.0.y)
    }
}

/// Escapes a string for use inside a PostScript `( )` literal.
fn ps_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\n' | '\r' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}

/// Writes the EPS header and installs the world-to-page transform.
///
/// `bounds` is the dry-run bounding box in world coordinates; the `%%BoundingBox` comment
/// is that box mapped through `viewport`, padded by the line width.
pub fn write_prologue<W: Write>(
    out: &mut W,
    title: &str,
    bounds: &BoundingBox,
    viewport: &Viewport,
    line_width: f64,
) -> io::Result<()> {
    // Snapped to 1/1000 pt so rounding noise cannot push the integer box out by a point.
    let snap = |v: f64| (v * 1e3).round() / 1e3;
    let page = viewport.map_box(bounds);
    let pad = line_width;
    let (llx, lly) = (snap(page.min.x - pad), snap(page.min.y - pad));
    let (urx, ury) = (snap(page.max.x + pad), snap(page.max.y + pad));
    let scale = viewport.scale();
    let t = viewport.translation();

    writeln!(out, "%!PS-Adobe-3.0 EPSF-3.0")?;
    writeln!(out, "%%Title: ({})", ps_string(title))?;
    writeln!(out, "%%Creator: (lindenmayer)")?;
    writeln!(
        out,
        "%%BoundingBox: {} {} {} {}",
        llx.floor() as i64,
        lly.floor() as i64,
        urx.ceil() as i64,
        ury.ceil() as i64
    )?;
    writeln!(
        out,
        "%%HiResBoundingBox: {llx:.3} {lly:.3} {urx:.3} {ury:.3}"
    )?;
    writeln!(out, "%%LanguageLevel: 2")?;
    writeln!(out, "%%EndComments")?;
    writeln!(out)?;
    writeln!(out, "{:.4} {:.4} translate", t.x, t.y)?;
    writeln!(out, "{scale:.6} {scale:.6} scale")?;
    writeln!(out, "{:.6} setlinewidth", line_width / scale)?;
    writeln!(out, "1 setlinecap 1 setlinejoin")?;
    Ok(())
}

/// Ends the page and closes the EPS document.
pub fn write_trailer<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "showpage")?;
    writeln!(out, "%%Trailer")?;
    writeln!(out, "%%EOF")?;
    Ok(())
}
