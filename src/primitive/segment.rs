use approx::{AbsDiffEq, RelativeEq};
use derive_more::Display;

use crate::geom::math::{EP, NO_TURN, eq, turn};
use crate::primitive::point::{PolyPt, Pt};
use crate::primitive::{pt, seg};

/// An oriented line segment.
#[must_use]
#[derive(Debug, Display, Copy, Clone, Default)]
#[display("Seg[{a}, {b}]")]
pub struct Segment {
    pub a: Pt,
    pub b: Pt,
}

impl Segment {
    pub const fn new(a: Pt, b: Pt) -> Self {
        Self { a, b }
    }

    pub fn reversed(&self) -> Segment {
        seg(self.b, self.a)
    }

    /// Whether the segments intersect, touching included.
    #[must_use]
    pub fn intersects(&self, o: &Segment) -> bool {
        turn(self.a, self.b, o.a) != turn(self.a, self.b, o.b)
            && turn(o.a, o.b, self.a) != turn(o.a, o.b, self.b)
    }

    /// Whether the segments cross at a single interior point of both;
    /// touching an endpoint does not count.
    #[must_use]
    pub fn properly_intersects(&self, o: &Segment) -> bool {
        let turn_oa = turn(self.a, self.b, o.a);
        let turn_ob = turn(self.a, self.b, o.b);
        let turn_sa = turn(o.a, o.b, self.a);
        let turn_sb = turn(o.a, o.b, self.b);

        turn_oa != turn_ob
            && turn_oa != NO_TURN
            && turn_ob != NO_TURN
            && turn_sa != turn_sb
            && turn_sa != NO_TURN
            && turn_sb != NO_TURN
    }

    /// The intersection point of the two segments, if any. Parallel and
    /// collinear segments yield `None`, even when they overlap.
    #[must_use]
    pub fn intersection(&self, o: &Segment) -> Option<Pt> {
        let a1 = self.b.x - self.a.x;
        let b1 = o.a.x - o.b.x;
        let c1 = o.a.x - self.a.x;
        let a2 = self.b.y - self.a.y;
        let b2 = o.a.y - o.b.y;
        let c2 = o.a.y - self.a.y;

        let denom = a1 * b2 - a2 * b1;
        if eq(denom, 0.0) {
            return None;
        }

        let s = (c1 * b2 - c2 * b1) / denom;
        let t = (a1 * c2 - a2 * c1) / denom;

        if !(0.0..=1.0).contains(&s) || !(0.0..=1.0).contains(&t) {
            return None;
        }
        if s == 0.0 {
            return Some(self.a);
        }
        if s == 1.0 {
            return Some(self.b);
        }
        if t == 0.0 {
            return Some(o.a);
        }
        if t == 1.0 {
            return Some(o.b);
        }
        Some(pt(self.a.x + s * a1, self.a.y + s * a2))
    }

    #[must_use]
    pub fn rel_eq(&self, o: &Self) -> bool {
        RelativeEq::relative_eq(self, o, EP, EP)
    }
}

impl PartialEq for Segment {
    fn eq(&self, o: &Self) -> bool {
        self.a == o.a && self.b == o.b
    }
}

impl AbsDiffEq for Segment {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        EP
    }

    fn abs_diff_eq(&self, o: &Self, epsilon: f64) -> bool {
        Pt::abs_diff_eq(&self.a, &o.a, epsilon) && Pt::abs_diff_eq(&self.b, &o.b, epsilon)
    }
}

impl RelativeEq for Segment {
    fn default_max_relative() -> f64 {
        EP
    }

    fn relative_eq(&self, o: &Self, epsilon: f64, max_relative: f64) -> bool {
        Pt::relative_eq(&self.a, &o.a, epsilon, max_relative)
            && Pt::relative_eq(&self.b, &o.b, epsilon, max_relative)
    }
}

/// A polygon edge or diagonal: a segment whose endpoints carry polygon
/// indices. Edge equality ignores orientation.
#[must_use]
#[derive(Debug, Display, Copy, Clone)]
#[display("Edge[{a}, {b}]")]
pub struct Edge {
    pub a: PolyPt,
    pub b: PolyPt,
}

impl Edge {
    pub const fn new(a: PolyPt, b: PolyPt) -> Self {
        Self { a, b }
    }

    pub fn seg(&self) -> Segment {
        seg(self.a.p, self.b.p)
    }

    pub fn reversed(&self) -> Edge {
        Edge::new(self.b, self.a)
    }
}

impl PartialEq for Edge {
    fn eq(&self, o: &Self) -> bool {
        (self.a == o.a && self.b == o.b) || (self.a == o.b && self.b == o.a)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    fn symmetric(a: &Segment, b: &Segment, res: bool, proper: bool) {
        assert_eq!(a.intersects(b), res, "{a} {b} intersects? {res}");
        assert_eq!(b.intersects(a), res, "{b} {a} intersects? {res}");
        assert_eq!(a.properly_intersects(b), proper, "{a} {b} properly? {proper}");
        assert_eq!(b.properly_intersects(a), proper, "{b} {a} properly? {proper}");
    }

    #[test]
    fn seg_seg() {
        let tests = &[
            // Crossing at an interior point.
            (seg(pt(1.0, 1.0), pt(3.0, 4.0)), seg(pt(2.0, 4.0), pt(3.0, 1.0)), true, true),
            // Shared endpoint, not parallel.
            (seg(pt(1.0, 1.0), pt(2.0, 3.0)), seg(pt(2.0, 3.0), pt(4.0, 1.0)), true, false),
            // Endpoint abutting the other segment's interior.
            (seg(pt(1.0, 1.0), pt(3.0, 3.0)), seg(pt(2.0, 2.0), pt(4.0, 0.0)), true, false),
            // Parallel, not intersecting.
            (seg(pt(1.0, 3.0), pt(3.0, 1.0)), seg(pt(2.0, 4.0), pt(4.0, 2.0)), false, false),
            // Far apart.
            (seg(pt(0.0, 0.0), pt(1.0, 0.0)), seg(pt(3.0, 1.0), pt(4.0, 2.0)), false, false),
        ];
        for (a, b, res, proper) in tests {
            symmetric(a, b, *res, *proper);
        }
    }

    #[test]
    fn collinear_overlap_is_not_reported() {
        // Collinear overlapping segments have no single intersection point
        // and the predicate reports no crossing.
        let a = seg(pt(1.0, 1.0), pt(3.0, 1.0));
        let b = seg(pt(2.0, 1.0), pt(4.0, 1.0));
        assert!(!a.intersects(&b));
        assert!(!a.properly_intersects(&b));
        assert_eq!(a.intersection(&b), None);
    }

    #[test]
    fn intersection_points() {
        let a = seg(pt(0.0, 0.0), pt(4.0, 4.0));
        let b = seg(pt(0.0, 4.0), pt(4.0, 0.0));
        assert_eq!(a.intersection(&b), Some(pt(2.0, 2.0)));

        // Touching at an endpoint returns that endpoint.
        let c = seg(pt(4.0, 4.0), pt(8.0, 0.0));
        assert_eq!(a.intersection(&c), Some(pt(4.0, 4.0)));

        // Disjoint.
        let d = seg(pt(10.0, 0.0), pt(10.0, 4.0));
        assert_eq!(a.intersection(&d), None);
    }

    #[test]
    fn edge_equality_ignores_orientation() {
        let a = PolyPt::vertex(pt(0.0, 0.0), 0);
        let b = PolyPt::vertex(pt(1.0, 0.0), 1);
        let c = PolyPt::vertex(pt(1.0, 1.0), 2);
        assert_eq!(Edge::new(a, b), Edge::new(b, a));
        assert_ne!(Edge::new(a, b), Edge::new(a, c));
    }

    fn coord() -> impl Strategy<Value = f64> {
        -1e3..1e3
    }

    proptest! {
        #[test]
        fn intersection_is_symmetric(
            (ax, ay, bx, by) in (coord(), coord(), coord(), coord()),
            (cx, cy, dx, dy) in (coord(), coord(), coord(), coord()),
        ) {
            let u = seg(pt(ax, ay), pt(bx, by));
            let v = seg(pt(cx, cy), pt(dx, dy));
            prop_assert_eq!(u.intersects(&v), v.intersects(&u));
            prop_assert_eq!(u.properly_intersects(&v), v.properly_intersects(&u));
        }
    }
}
