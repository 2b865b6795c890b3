//! Points, bounds and the binding-geometry collaborator.
//!
//! Where exactly a connector meets a shape is decided by the drawing
//! surface. The engine only asks two questions through [`BindingGeometry`]:
//! which attachment fraction a focus point corresponds to, and where a bound
//! endpoint is rendered given that fraction.

use serde::{Deserialize, Serialize};

use crate::scene::{Binding, Element};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + width,
            max_y: y + height,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center_x(&self) -> f64 {
        (self.min_x + self.max_x) / 2.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.center_x(), (self.min_y + self.max_y) / 2.0)
    }

    pub fn top_center(&self) -> Point {
        Point::new(self.center_x(), self.min_y)
    }

    pub fn bottom_center(&self) -> Point {
        Point::new(self.center_x(), self.max_y)
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Combined bounds of a set; `None` for an empty set.
    pub fn common<I: IntoIterator<Item = Bounds>>(bounds: I) -> Option<Bounds> {
        bounds.into_iter().reduce(|acc, next| acc.union(&next))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowEnd {
    Start,
    End,
}

pub trait BindingGeometry {
    /// Attachment fraction of `focus` relative to `target`.
    fn fixed_point(&self, arrow: &Element, target: &Element, focus: Point) -> [f64; 2];

    /// Rendered endpoint for `end`, in the arrow's local coordinates, or
    /// `None` when the binding cannot be resolved.
    fn bound_point(
        &self,
        arrow: &Element,
        end: ArrowEnd,
        binding: &Binding,
        target: &Element,
    ) -> Option<Point>;
}

/// Attaches connectors to fractions of the target's bounding box.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoxBinding;

impl BindingGeometry for BoxBinding {
    fn fixed_point(&self, _arrow: &Element, target: &Element, focus: Point) -> [f64; 2] {
        let fraction = |offset: f64, extent: f64| {
            if extent <= 0.0 {
                0.5
            } else {
                (offset / extent).clamp(0.0, 1.0)
            }
        };
        [
            fraction(focus.x - target.x, target.width),
            fraction(focus.y - target.y, target.height),
        ]
    }

    fn bound_point(
        &self,
        arrow: &Element,
        _end: ArrowEnd,
        binding: &Binding,
        target: &Element,
    ) -> Option<Point> {
        if target.width <= 0.0 || target.height <= 0.0 {
            return None;
        }
        let [fx, fy] = binding.fixed_point;
        let absolute_x = target.x + fx * target.width;
        let absolute_y = target.y + fy * target.height;
        Some(Point::new(absolute_x - arrow.x, absolute_y - arrow.y))
    }
}
