use approx::{AbsDiffEq, RelativeEq};
use auto_ops::{impl_op_ex, impl_op_ex_commutative};
use derive_more::Display;
use nalgebra::{Vector2, vector};
use serde::{Deserialize, Serialize};

use crate::geom::math::{EP, eq};
use crate::primitive::pt;

/// A point in the plane. Two points compare equal when both coordinates
/// agree within the crate tolerance.
#[must_use]
#[derive(Debug, Default, Copy, Clone, Display, Serialize, Deserialize)]
#[display("({x}, {y})")]
pub struct Pt {
    pub x: f64,
    pub y: f64,
}

impl Pt {
    pub const fn new(x: f64, y: f64) -> Self {
        assert!(x.is_finite() && y.is_finite(), "point coordinates must be finite");
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Pt {
        pt(self.x + dx, self.y + dy)
    }

    #[must_use]
    pub fn cross(&self, p: Pt) -> f64 {
        self.x * p.y - self.y * p.x
    }

    #[must_use]
    pub fn dot(&self, p: Pt) -> f64 {
        self.x * p.x + self.y * p.y
    }

    #[must_use]
    pub fn dist(&self, b: Pt) -> f64 {
        self.dist2(b).sqrt()
    }

    // Squared distance; avoids the square root when distances only need to
    // be compared.
    #[must_use]
    pub fn dist2(&self, b: Pt) -> f64 {
        (self.x - b.x) * (self.x - b.x) + (self.y - b.y) * (self.y - b.y)
    }

    /// True if this point lies strictly to the right of `o`.
    #[must_use]
    pub fn is_right_of(&self, o: Pt) -> bool {
        o.x < self.x
    }

    /// True if this point lies strictly to the left of `o`.
    #[must_use]
    pub fn is_left_of(&self, o: Pt) -> bool {
        o.x > self.x
    }
}

impl PartialEq for Pt {
    fn eq(&self, o: &Self) -> bool {
        eq(self.x, o.x) && eq(self.y, o.y)
    }
}

impl AbsDiffEq for Pt {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        EP
    }

    fn abs_diff_eq(&self, o: &Self, epsilon: f64) -> bool {
        f64::abs_diff_eq(&self.x, &o.x, epsilon) && f64::abs_diff_eq(&self.y, &o.y, epsilon)
    }
}

impl RelativeEq for Pt {
    fn default_max_relative() -> f64 {
        EP
    }

    fn relative_eq(&self, o: &Self, epsilon: f64, max_relative: f64) -> bool {
        f64::relative_eq(&self.x, &o.x, epsilon, max_relative)
            && f64::relative_eq(&self.y, &o.y, epsilon, max_relative)
    }
}

impl From<Pt> for Vector2<f64> {
    fn from(p: Pt) -> Self {
        vector![p.x, p.y]
    }
}

impl_op_ex!(-|a: &Pt| -> Pt { pt(-a.x, -a.y) });

impl_op_ex!(+ |a: &Pt, b: &Pt| -> Pt { pt(a.x + b.x, a.y + b.y) });
impl_op_ex!(+= |a: &mut Pt, b: &Pt| { a.x += b.x; a.y += b.y; });
impl_op_ex!(-|a: &Pt, b: &Pt| -> Pt { pt(a.x - b.x, a.y - b.y) });
impl_op_ex!(-= |a: &mut Pt, b: &Pt| { a.x -= b.x; a.y -= b.y; });

impl_op_ex_commutative!(*|a: &Pt, b: &f64| -> Pt { pt(a.x * b, a.y * b) });
impl_op_ex_commutative!(/|a: &Pt, b: &f64| -> Pt { pt(a.x / b, a.y / b) });

/// A point adorned with its position in a polygon: the index of the vertex
/// it coincides with and/or the index of the edge it lies on. A point
/// carrying neither is a free query point.
///
/// Equality is index-aware: when both sides carry an annotation the vertex
/// and edge fields must match in addition to the coordinates; a free point
/// compares against anything by coordinates alone.
#[must_use]
#[derive(Debug, Copy, Clone, Display, Serialize, Deserialize)]
#[display("{p}")]
pub struct PolyPt {
    pub p: Pt,
    pub vertex: Option<usize>,
    pub edge: Option<usize>,
}

impl PolyPt {
    pub const fn free(p: Pt) -> Self {
        Self { p, vertex: None, edge: None }
    }

    pub const fn vertex(p: Pt, index: usize) -> Self {
        Self { p, vertex: Some(index), edge: None }
    }

    pub const fn on_edge(p: Pt, edge: usize) -> Self {
        Self { p, vertex: None, edge: Some(edge) }
    }

    /// A trapezoid corner: either a polygon vertex or a point on a polygon
    /// edge, whichever of the two indices is known.
    pub const fn corner(p: Pt, vertex: Option<usize>, edge: Option<usize>) -> Self {
        Self { p, vertex, edge }
    }

    #[must_use]
    pub const fn is_free(&self) -> bool {
        self.vertex.is_none() && self.edge.is_none()
    }

    #[must_use]
    pub const fn is_vertex(&self) -> bool {
        self.vertex.is_some()
    }

    #[must_use]
    pub const fn is_on_edge(&self) -> bool {
        self.vertex.is_none() && self.edge.is_some()
    }
}

impl PartialEq for PolyPt {
    fn eq(&self, o: &Self) -> bool {
        if self.p != o.p {
            return false;
        }
        if self.is_free() || o.is_free() {
            return true;
        }
        self.vertex == o.vertex && self.edge == o.edge
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn equality_uses_tolerance() {
        assert_eq!(pt(1.0, 2.0), pt(1.0 + EP / 2.0, 2.0 - EP / 2.0));
        assert_ne!(pt(1.0, 2.0), pt(1.0 + 3.0 * EP, 2.0));
    }

    #[test]
    fn arithmetic() {
        assert_eq!(pt(1.0, 2.0) + pt(3.0, 4.0), pt(4.0, 6.0));
        assert_eq!(pt(1.0, 2.0) - pt(3.0, 4.0), pt(-2.0, -2.0));
        assert_eq!(pt(1.0, 2.0) * 2.0, pt(2.0, 4.0));
        assert_eq!(-pt(1.0, 2.0), pt(-1.0, -2.0));
    }

    #[test]
    fn distances() {
        assert_relative_eq!(pt(0.0, 0.0).dist(pt(3.0, 4.0)), 5.0);
        assert_relative_eq!(pt(0.0, 0.0).dist2(pt(3.0, 4.0)), 25.0);
    }

    #[test]
    fn horizontal_order() {
        assert!(pt(2.0, 0.0).is_right_of(pt(1.0, 5.0)));
        assert!(pt(1.0, 0.0).is_left_of(pt(2.0, 5.0)));
        assert!(!pt(1.0, 0.0).is_right_of(pt(1.0, 5.0)));
    }

    #[test]
    fn poly_pt_equality_is_index_aware() {
        let v3 = PolyPt::vertex(pt(1.0, 1.0), 3);
        let v4 = PolyPt::vertex(pt(1.0, 1.0), 4);
        let e3 = PolyPt::on_edge(pt(1.0, 1.0), 3);
        let free = PolyPt::free(pt(1.0, 1.0));

        assert_eq!(v3, v3);
        assert_ne!(v3, v4);
        assert_ne!(v3, e3);
        // A free point compares by coordinates alone.
        assert_eq!(v3, free);
        assert_eq!(free, e3);
        assert_ne!(free, PolyPt::vertex(pt(2.0, 1.0), 3));
        // A corner that knows its vertex matches the plain vertex point.
        assert_eq!(PolyPt::corner(pt(1.0, 1.0), Some(3), None), v3);
    }
}
