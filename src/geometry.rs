//! Plane geometry shared by the engine and the output back-ends.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle covering a set of turtle positions.
///
/// Degenerate boxes (zero width and/or height) are valid; a box always contains at least
/// the point it was seeded with.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: DVec2,
    pub max: DVec2,
}

impl BoundingBox {
    /// A zero-area box at `point`.
    pub fn at(point: DVec2) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Grows the box so that it contains `point`.
    pub fn include(&mut self, point: DVec2) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(self, other: BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Extent along x.
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Extent along y.
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// `(width, height)`.
    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    /// Midpoint of the box.
    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    /// True when the box has zero area.
    pub fn is_degenerate(&self) -> bool {
        self.width() == 0.0 || self.height() == 0.0
    }

    /// True when `point` lies inside or on the border.
    pub fn contains_point(&self, point: DVec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// True when `other` lies entirely inside this box.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.contains_point(other.min) && self.contains_point(other.max)
    }
}

/// Uniform scale + translation that maps world coordinates onto an output surface.
///
/// Surface coordinates have their origin in the lower-left corner with y pointing up
/// (PostScript convention). [`Viewport::to_pixel`] flips y for raster images.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    scale: f64,
    translation: DVec2,
    surface: DVec2,
}

impl Viewport {
    /// Fits `bounds` into a `width` x `height` surface, keeping `margin` free on every side.
    ///
    /// The aspect ratio of the drawing is preserved and the result is centered. A box with
    /// zero extent along both axes is centered at scale 1.
    pub fn fit(bounds: &BoundingBox, width: f64, height: f64, margin: f64) -> Self {
        let surface = DVec2::new(width, height);
        let available = (surface - DVec2::splat(2.0 * margin)).max(DVec2::ONE);
        let size = bounds.size();
        // Extents this small relative to the other axis are rounding noise from cos/sin.
        let noise = size.max_element() * 1e-9;

        let scale = match (size.x > noise, size.y > noise) {
            (true, true) => (available.x / size.x).min(available.y / size.y),
            (true, false) => available.x / size.x,
            (false, true) => available.y / size.y,
            (false, false) => 1.0,
        };

        let translation = surface * 0.5 - bounds.center() * scale;
        Self {
            scale,
            translation,
            surface,
        }
    }

    /// Identity mapping onto a surface of the given size.
    pub fn identity(width: f64, height: f64) -> Self {
        Self {
            scale: 1.0,
            translation: DVec2::ZERO,
            surface: DVec2::new(width, height),
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn translation(&self) -> DVec2 {
        self.translation
    }

    pub fn surface(&self) -> DVec2 {
        self.surface
    }

    /// World point to surface point (y up).
    pub fn to_surface(&self, point: DVec2) -> DVec2 {
        point * self.scale + self.translation
    }

    /// World point to pixel coordinates (y down).
    pub fn to_pixel(&self, point: DVec2) -> DVec2 {
        let p = self.to_surface(point);
        DVec2::new(p.x, self.surface.y - p.y)
    }

    /// The region of the surface covered by `bounds`.
    pub fn map_box(&self, bounds: &BoundingBox) -> BoundingBox {
        let mut mapped = BoundingBox::at(self.to_surface(bounds.min));
        mapped.include(self.to_surface(bounds.max));
        mapped
    }
}
