use derive_more::Display;

use crate::geom::math::{CCW_TURN, CW_TURN, turn};
use crate::primitive::point::{PolyPt, Pt};
use crate::primitive::ray::Ray;
use crate::primitive::segment::Segment;
use crate::primitive::ray;

/// Where a point lies relative to a funnel.
///
/// Points on the funnel boundary count as `Inside`; points on the extension
/// of a funnel ray beyond the cusp count as `Opposite`. `Behind` only occurs
/// for bounded funnels.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Position {
    Inside,
    LeftOf,
    RightOf,
    Opposite,
    Behind,
}

/// An angular region with its apex at the cusp, bounded by the rays through
/// `first` (right, in counterclockwise order) and `second` (left).
///
/// The funnel is convex when (cusp, first, second) is a left turn, concave
/// when it is a right turn and degenerate when the three points are
/// collinear. A concave funnel covers everything except the reflected wedge,
/// so only `Inside` and `Opposite` positions exist for it.
#[must_use]
#[derive(Debug, Display, Clone, PartialEq)]
#[display("Funnel[cusp={cusp}, first={first}, second={second}]")]
pub struct Funnel {
    cusp: PolyPt,
    first: PolyPt,
    second: PolyPt,
    kind: i32,
}

impl Funnel {
    pub fn new(cusp: PolyPt, first: PolyPt, second: PolyPt) -> Self {
        let kind = turn(cusp.p, first.p, second.p);
        Self { cusp, first, second, kind }
    }

    pub const fn cusp(&self) -> PolyPt {
        self.cusp
    }

    pub const fn first(&self) -> PolyPt {
        self.first
    }

    pub const fn second(&self) -> PolyPt {
        self.second
    }

    pub fn set_cusp(&mut self, cusp: PolyPt) {
        self.cusp = cusp;
        self.kind = turn(self.cusp.p, self.first.p, self.second.p);
    }

    pub fn set_first(&mut self, first: PolyPt) {
        self.first = first;
        self.kind = turn(self.cusp.p, self.first.p, self.second.p);
    }

    pub fn set_second(&mut self, second: PolyPt) {
        self.second = second;
        self.kind = turn(self.cusp.p, self.first.p, self.second.p);
    }

    #[must_use]
    pub const fn is_concave(&self) -> bool {
        self.kind == CW_TURN
    }

    pub fn first_ray(&self) -> Ray {
        ray(self.cusp.p, self.first.p)
    }

    pub fn second_ray(&self) -> Ray {
        ray(self.cusp.p, self.second.p)
    }

    #[must_use]
    pub fn contains_pt(&self, p: Pt) -> bool {
        if self.is_concave() {
            !(turn(self.cusp.p, self.first.p, p) == CW_TURN
                && turn(self.cusp.p, self.second.p, p) == CCW_TURN)
        } else {
            turn(self.cusp.p, self.first.p, p) != CW_TURN
                && turn(self.cusp.p, self.second.p, p) != CCW_TURN
        }
    }

    #[must_use]
    pub fn contains_seg(&self, s: &Segment) -> bool {
        if self.is_concave() {
            // Both endpoints of a segment can lie inside a concave funnel
            // while the segment still crosses the funnel boundary.
            self.contains_pt(s.a)
                && self.contains_pt(s.b)
                && !self.first_ray().properly_intersects(s)
        } else {
            self.contains_pt(s.a) && self.contains_pt(s.b)
        }
    }

    #[must_use]
    pub fn properly_contains_pt(&self, p: Pt) -> bool {
        if self.is_concave() {
            !(turn(self.cusp.p, self.first.p, p) != CCW_TURN
                && turn(self.cusp.p, self.second.p, p) != CW_TURN)
        } else {
            turn(self.cusp.p, self.first.p, p) == CCW_TURN
                && turn(self.cusp.p, self.second.p, p) == CW_TURN
        }
    }

    #[must_use]
    pub fn properly_contains_seg(&self, s: &Segment) -> bool {
        self.properly_contains_pt(s.a)
            && self.properly_contains_pt(s.b)
            && !self.first_ray().intersects(s)
            && !self.second_ray().intersects(s)
    }

    /// Whether the segment crosses both funnel rays.
    #[must_use]
    pub fn is_divided_by(&self, s: &Segment) -> bool {
        self.first_ray().intersects(s) && self.second_ray().intersects(s)
    }

    /// Whether the segment properly crosses both funnel rays.
    #[must_use]
    pub fn is_properly_divided_by(&self, s: &Segment) -> bool {
        self.first_ray().properly_intersects(s) && self.second_ray().properly_intersects(s)
    }

    /// Whether the segment crosses one ray properly while touching the
    /// other.
    #[must_use]
    pub fn is_half_properly_divided_by(&self, s: &Segment) -> bool {
        (self.first_ray().properly_intersects(s) && self.second_ray().intersects(s))
            || (self.first_ray().intersects(s) && self.second_ray().properly_intersects(s))
    }

    pub fn position_of(&self, p: Pt) -> Position {
        // Concave funnels only distinguish inside and opposite.
        if self.is_concave() {
            if self.contains_pt(p) {
                return Position::Inside;
            }
            return Position::Opposite;
        }

        let first_turn = turn(self.cusp.p, self.first.p, p);
        let second_turn = turn(self.cusp.p, self.second.p, p);

        if first_turn != CW_TURN && second_turn != CCW_TURN {
            return Position::Inside;
        }
        if first_turn != CCW_TURN && second_turn != CW_TURN {
            return Position::Opposite;
        }
        // Both turns agree now; a counterclockwise turn against the first
        // ray means the point lies to the left.
        if first_turn == CCW_TURN { Position::LeftOf } else { Position::RightOf }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{pt, seg};

    fn funnel(cusp: Pt, first: Pt, second: Pt) -> Funnel {
        Funnel::new(PolyPt::free(cusp), PolyPt::free(first), PolyPt::free(second))
    }

    #[test]
    fn positions_around_a_convex_funnel() {
        // Wedge opening to the right, apex at the origin.
        let f = funnel(pt(0.0, 0.0), pt(2.0, -1.0), pt(2.0, 1.0));
        assert_eq!(f.position_of(pt(3.0, 0.0)), Position::Inside);
        assert_eq!(f.position_of(pt(2.0, 1.0)), Position::Inside);
        assert_eq!(f.position_of(pt(0.0, 3.0)), Position::LeftOf);
        assert_eq!(f.position_of(pt(0.0, -3.0)), Position::RightOf);
        assert_eq!(f.position_of(pt(-3.0, 0.0)), Position::Opposite);
    }

    #[test]
    fn concave_funnel_has_two_positions() {
        // A right turn at the cusp leaves only the reflected wedge outside.
        let f = funnel(pt(0.0, 0.0), pt(2.0, 1.0), pt(2.0, -1.0));
        assert!(f.is_concave());
        assert_eq!(f.position_of(pt(0.0, 5.0)), Position::Inside);
        assert_eq!(f.position_of(pt(-2.0, 0.0)), Position::Opposite);
    }

    #[test]
    fn containment() {
        let f = funnel(pt(0.0, 0.0), pt(2.0, -1.0), pt(2.0, 1.0));
        assert!(f.contains_pt(pt(4.0, 0.0)));
        assert!(f.contains_pt(pt(4.0, 2.0)));
        assert!(!f.contains_pt(pt(0.0, 4.0)));
        assert!(f.properly_contains_pt(pt(4.0, 0.0)));
        assert!(!f.properly_contains_pt(pt(4.0, 2.0)));
        assert!(f.contains_seg(&seg(pt(3.0, -1.0), pt(3.0, 1.0))));
        assert!(!f.contains_seg(&seg(pt(3.0, -1.0), pt(3.0, 9.0))));
    }

    #[test]
    fn division() {
        let f = funnel(pt(0.0, 0.0), pt(2.0, -1.0), pt(2.0, 1.0));
        // A segment spanning the whole wedge divides the funnel.
        assert!(f.is_divided_by(&seg(pt(3.0, -4.0), pt(3.0, 4.0))));
        assert!(f.is_properly_divided_by(&seg(pt(3.0, -4.0), pt(3.0, 4.0))));
        // Ending exactly on the second ray is only half proper.
        let touching = seg(pt(3.0, -4.0), pt(3.0, 1.5));
        assert!(f.is_divided_by(&touching));
        assert!(!f.is_properly_divided_by(&touching));
        assert!(f.is_half_properly_divided_by(&touching));
        // A segment inside the wedge does not divide it.
        assert!(!f.is_divided_by(&seg(pt(3.0, -0.5), pt(3.0, 0.5))));
    }

    #[test]
    fn updating_endpoints_reclassifies() {
        let mut f = funnel(pt(0.0, 0.0), pt(2.0, -1.0), pt(2.0, 1.0));
        assert!(!f.is_concave());
        f.set_first(PolyPt::free(pt(2.0, 2.0)));
        assert!(f.is_concave());
        f.set_second(PolyPt::free(pt(2.0, 4.0)));
        assert!(!f.is_concave());
    }
}
