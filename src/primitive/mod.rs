use crate::errors::Result;

pub mod bounded_funnel;
pub mod circle;
pub mod funnel;
pub mod line_shape;
pub mod point;
pub mod ray;
pub mod segment;
pub mod trapezoid;
pub mod triangle;

pub use bounded_funnel::BoundedFunnel;
pub use circle::Circle;
pub use funnel::{Funnel, Position};
pub use line_shape::Line;
pub use point::{PolyPt, Pt};
pub use ray::Ray;
pub use segment::{Edge, Segment};
pub use trapezoid::Trapezoid;
pub use triangle::Tri;

// Point helpers
pub const fn pt(x: f64, y: f64) -> Pt {
    Pt::new(x, y)
}

// Segment helpers
pub const fn seg(a: Pt, b: Pt) -> Segment {
    Segment::new(a, b)
}

pub const fn edge(a: PolyPt, b: PolyPt) -> Edge {
    Edge::new(a, b)
}

// Line helpers
pub fn line(a: Pt, b: Pt) -> Result<Line> {
    Line::new(a, b)
}

// Ray helpers
pub const fn ray(a: Pt, b: Pt) -> Ray {
    Ray::new(a, b)
}

// Circle helpers
pub fn circ(center: Pt, radius: f64) -> Circle {
    Circle::new(center, radius)
}
