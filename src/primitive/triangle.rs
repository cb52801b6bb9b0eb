use derive_more::Display;
use ordered_float::OrderedFloat;

use crate::errors::{GeometryError, Result};
use crate::geom::math::{CCW_TURN, CW_TURN, NO_TURN, turn};
use crate::primitive::point::{PolyPt, Pt};
use crate::primitive::segment::Edge;
use crate::primitive::pt;

/// A triangle of polygon vertices, stored in counterclockwise order with the
/// lexicographically smallest vertex first. The canonical order makes
/// triangle equality a plain field comparison.
#[must_use]
#[derive(Debug, Display, Copy, Clone, PartialEq)]
#[display("Tri[{a}, {b}, {c}]")]
pub struct Tri {
    a: PolyPt,
    b: PolyPt,
    c: PolyPt,
}

impl Tri {
    pub fn new(a: PolyPt, b: PolyPt, c: PolyPt) -> Result<Self> {
        let (mut a, mut b, mut c) = match turn(a.p, b.p, c.p) {
            NO_TURN => return Err(GeometryError::ThreePointsAreCollinear),
            CCW_TURN => (a, b, c),
            _ => (a, c, b),
        };

        let key = |p: &PolyPt| (OrderedFloat(p.p.x), OrderedFloat(p.p.y));
        if key(&b) < key(&a) && key(&b) < key(&c) {
            (a, b, c) = (b, c, a);
        } else if key(&c) < key(&a) && key(&c) < key(&b) {
            (a, b, c) = (c, a, b);
        }
        debug_assert!(key(&a) <= key(&b) && key(&a) <= key(&c));

        Ok(Self { a, b, c })
    }

    pub const fn a(&self) -> PolyPt {
        self.a
    }

    pub const fn b(&self) -> PolyPt {
        self.b
    }

    pub const fn c(&self) -> PolyPt {
        self.c
    }

    pub const fn pts(&self) -> [PolyPt; 3] {
        [self.a, self.b, self.c]
    }

    pub fn edges(&self) -> [Edge; 3] {
        [Edge::new(self.a, self.b), Edge::new(self.b, self.c), Edge::new(self.c, self.a)]
    }

    /// The three edges rotated so that `edge` comes first.
    pub fn edges_from(&self, edge: &Edge) -> [Edge; 3] {
        let edges = self.edges();
        let i = edges
            .iter()
            .position(|e| e == edge)
            .expect("edge must belong to the triangle");
        [edges[i], edges[(i + 1) % 3], edges[(i + 2) % 3]]
    }

    /// The three edges rotated so that `edge` comes last.
    pub fn edges_until(&self, edge: &Edge) -> [Edge; 3] {
        let [first, second, third] = self.edges_from(edge);
        [second, third, first]
    }

    #[must_use]
    pub fn has_pt(&self, p: &PolyPt) -> bool {
        self.a == *p || self.b == *p || self.c == *p
    }

    #[must_use]
    pub fn has_vertex(&self, index: usize) -> bool {
        self.pts().iter().any(|p| p.vertex == Some(index))
    }

    /// Strict containment: points on the triangle boundary are outside.
    #[must_use]
    pub fn contains(&self, p: Pt) -> bool {
        turn(self.a.p, self.b.p, p) == CCW_TURN
            && turn(self.b.p, self.c.p, p) == CCW_TURN
            && turn(self.c.p, self.a.p, p) == CCW_TURN
    }

    /// Closed containment: the boundary belongs to the triangle.
    #[must_use]
    pub fn contains_closed(&self, p: Pt) -> bool {
        turn(self.a.p, self.b.p, p) != CW_TURN
            && turn(self.b.p, self.c.p, p) != CW_TURN
            && turn(self.c.p, self.a.p, p) != CW_TURN
    }

    /// The common edge of two distinct triangles, if any.
    #[must_use]
    pub fn common_edge(&self, o: &Tri) -> Option<Edge> {
        if self == o {
            return None;
        }
        self.edges().into_iter().find(|e| o.edges().contains(e))
    }

    pub fn centroid(&self) -> Pt {
        pt(
            (self.a.p.x + self.b.p.x + self.c.p.x) / 3.0,
            (self.a.p.y + self.b.p.y + self.c.p.y) / 3.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn v(x: f64, y: f64, ix: usize) -> PolyPt {
        PolyPt::vertex(pt(x, y), ix)
    }

    #[test]
    fn canonical_order() {
        // Any input order yields the same triangle.
        let t1 = Tri::new(v(0.0, 0.0, 0), v(2.0, 0.0, 1), v(1.0, 2.0, 2)).unwrap();
        let t2 = Tri::new(v(1.0, 2.0, 2), v(0.0, 0.0, 0), v(2.0, 0.0, 1)).unwrap();
        let t3 = Tri::new(v(2.0, 0.0, 1), v(1.0, 2.0, 2), v(0.0, 0.0, 0)).unwrap();
        assert_eq!(t1, t2);
        assert_eq!(t2, t3);
        assert_eq!(t1.a().vertex, Some(0));
        // The stored order is counterclockwise.
        assert_eq!(turn(t1.a().p, t1.b().p, t1.c().p), CCW_TURN);
    }

    #[test]
    fn collinear_points_are_rejected() {
        let err = Tri::new(v(0.0, 0.0, 0), v(1.0, 1.0, 1), v(2.0, 2.0, 2));
        assert!(matches!(err, Err(GeometryError::ThreePointsAreCollinear)));
    }

    #[test]
    fn containment() {
        let t = Tri::new(v(0.0, 0.0, 0), v(4.0, 0.0, 1), v(0.0, 4.0, 2)).unwrap();
        assert!(t.contains(pt(1.0, 1.0)));
        assert!(!t.contains(pt(2.0, 0.0)));
        assert!(t.contains_closed(pt(2.0, 0.0)));
        assert!(!t.contains_closed(pt(5.0, 5.0)));
    }

    #[test]
    fn common_edge_and_rotation() {
        let t1 = Tri::new(v(0.0, 0.0, 0), v(2.0, 0.0, 1), v(1.0, 2.0, 2)).unwrap();
        let t2 = Tri::new(v(2.0, 0.0, 1), v(3.0, 2.0, 3), v(1.0, 2.0, 2)).unwrap();
        let shared = t1.common_edge(&t2).unwrap();
        assert_eq!(shared, Edge::new(v(2.0, 0.0, 1), v(1.0, 2.0, 2)));
        assert!(t1.common_edge(&t1).is_none());

        let from = t1.edges_from(&shared);
        assert_eq!(from[0], shared);
        let until = t1.edges_until(&shared);
        assert_eq!(until[2], shared);
    }

    #[test]
    fn centroid() {
        let t = Tri::new(v(0.0, 0.0, 0), v(3.0, 0.0, 1), v(0.0, 3.0, 2)).unwrap();
        assert_eq!(t.centroid(), pt(1.0, 1.0));
    }
}
