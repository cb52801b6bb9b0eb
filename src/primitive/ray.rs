use derive_more::Display;

use crate::geom::math::{NO_TURN, eq, turn};
use crate::primitive::line_shape::Line;
use crate::primitive::point::Pt;
use crate::primitive::segment::Segment;
use crate::primitive::pt;

/// A ray starting at `a` and extending through `b` to infinity.
#[must_use]
#[derive(Debug, Display, Copy, Clone, PartialEq)]
#[display("Ray[{a}, {b}]")]
pub struct Ray {
    pub a: Pt,
    pub b: Pt,
}

impl Ray {
    pub const fn new(a: Pt, b: Pt) -> Self {
        Self { a, b }
    }

    /// Whether the ray intersects the segment, touching included.
    #[must_use]
    pub fn intersects(&self, o: &Segment) -> bool {
        let turn_oa = turn(self.a, self.b, o.a);
        let turn_ob = turn(self.a, self.b, o.b);
        if turn_oa == turn_ob && turn_oa != NO_TURN {
            return false;
        }

        let turn_sa = turn(o.a, o.b, self.a);
        let turn_sb = turn(o.a, o.b, self.b);

        // Both ray points on different sides of the segment's line is the
        // plain segment intersection case.
        if turn_sa != turn_sb {
            return true;
        }

        // Both ray points lie on the same side of the segment's line. The
        // ray reaches the segment iff its direction points towards the
        // segment, i.e. a point moved along the ray direction ends up on
        // the other side.
        let check_point = o.b + (self.b - self.a);
        turn(o.a, o.b, check_point) != turn_sa
    }

    /// Whether the ray crosses the segment's interior without touching
    /// either segment endpoint.
    #[must_use]
    pub fn properly_intersects(&self, o: &Segment) -> bool {
        let turn_oa = turn(self.a, self.b, o.a);
        let turn_ob = turn(self.a, self.b, o.b);
        if turn_oa == NO_TURN || turn_ob == NO_TURN {
            return false;
        }
        self.intersects(o)
    }

    /// The intersection point of the ray with the given segment.
    #[must_use]
    pub fn seg_intersection(&self, o: &Segment) -> Option<Pt> {
        self.intersection_impl(o.a, o.b, true)
    }

    /// The intersection point of the ray with the given line.
    #[must_use]
    pub fn line_intersection(&self, o: &Line) -> Option<Pt> {
        self.intersection_impl(o.a, o.b, false)
    }

    fn intersection_impl(&self, sa: Pt, sb: Pt, bounded: bool) -> Option<Pt> {
        if self.b == sb || self.b == sa {
            return Some(self.b);
        }
        if self.a == sb || self.a == sa {
            return Some(self.a);
        }

        let a1 = self.b.x - self.a.x;
        let b1 = sa.x - sb.x;
        let c1 = sa.x - self.a.x;
        let a2 = self.b.y - self.a.y;
        let b2 = sa.y - sb.y;
        let c2 = sa.y - self.a.y;

        let denom = a1 * b2 - a2 * b1;
        if eq(denom, 0.0) {
            return None;
        }

        let s = (c1 * b2 - c2 * b1) / denom;
        let t = (a1 * c2 - a2 * c1) / denom;

        if s == 0.0 {
            return Some(self.a);
        }
        if s == 1.0 {
            return Some(self.b);
        }
        if t == 0.0 {
            return Some(sa);
        }
        if t == 1.0 {
            return Some(sb);
        }

        // The intersection lies on the wrong side of the ray.
        if s < 0.0 {
            return None;
        }
        // The intersection lies outside of the segment.
        if bounded && !(0.0..=1.0).contains(&t) {
            return None;
        }

        Some(pt(self.a.x + s * a1, self.a.y + s * a2))
    }
}
