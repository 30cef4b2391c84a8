//! Axis-aligned rectangle algebra used by phrase reconstruction.
//!
//! Coordinates are image pixels with `y` growing downward. A well-formed
//! rectangle satisfies `x1 <= x2` and `y1 <= y2`; nothing here re-validates
//! that, so degenerate input produces degenerate output.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// One corner of a provider bounding polygon.
///
/// The Vision API omits zero-valued coordinates, so both fields default to 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vertex {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

impl Vertex {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Rect {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }

    /// Grow `self` to cover `other`.
    pub fn union_in_place(&mut self, other: &Rect) {
        *self = self.union(other);
    }

    /// True unless the rectangles are strictly separated on some axis.
    /// Touching edges count as intersecting.
    pub fn intersects(&self, other: &Rect) -> bool {
        !(other.x1 > self.x2 || other.x2 < self.x1 || other.y1 > self.y2 || other.y2 < self.y1)
    }

    /// Bounding box of a provider polygon.
    ///
    /// `y2` is the maximum of the vertices' `y` coordinates. An empty polygon
    /// reduces to the zero rectangle.
    pub fn from_vertices<'a, I>(vertices: I) -> Rect
    where
        I: IntoIterator<Item = &'a Vertex>,
    {
        let mut iter = vertices.into_iter();
        let Some(first) = iter.next() else {
            return Rect::default();
        };

        iter.fold(Rect::new(first.x, first.y, first.x, first.y), |rect, v| Rect {
            x1: rect.x1.min(v.x),
            y1: rect.y1.min(v.y),
            x2: rect.x2.max(v.x),
            y2: rect.y2.max(v.y),
        })
    }
}
