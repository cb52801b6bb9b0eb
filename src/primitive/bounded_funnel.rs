use derive_more::Display;

use crate::errors::{GeometryError, Result};
use crate::geom::math::{CCW_TURN, CW_TURN, NO_TURN, turn};
use crate::primitive::funnel::{Funnel, Position};
use crate::primitive::line_shape::Line;
use crate::primitive::point::{PolyPt, Pt};
use crate::primitive::ray::Ray;
use crate::primitive::segment::Segment;

/// A funnel together with an oriented boundary segment lying in front of the
/// cusp. The boundary introduces a fifth point position, `Behind`.
///
/// A bounded funnel must not be concave; construction fails otherwise. The
/// boundary must be oriented counterclockwise around the cusp.
#[must_use]
#[derive(Debug, Display, Clone)]
#[display("BoundedFunnel[{funnel}, boundary=[{boundary_a}, {boundary_b}]]")]
pub struct BoundedFunnel {
    funnel: Funnel,
    boundary_a: Pt,
    boundary_b: Pt,
    boundary: Line,
}

impl BoundedFunnel {
    pub fn new(
        cusp: PolyPt,
        first: PolyPt,
        second: PolyPt,
        boundary_a: Pt,
        boundary_b: Pt,
    ) -> Result<Self> {
        let funnel = Funnel::new(cusp, first, second);
        if funnel.is_concave() {
            return Err(GeometryError::BoundedFunnelMustNotBeConcave);
        }
        assert!(
            turn(boundary_a, boundary_b, cusp.p) != CW_TURN,
            "bounding segment must be oriented counterclockwise around the cusp"
        );
        let boundary = Line::new(boundary_a, boundary_b)?;
        Ok(Self { funnel, boundary_a, boundary_b, boundary })
    }

    pub const fn cusp(&self) -> PolyPt {
        self.funnel.cusp()
    }

    pub const fn first(&self) -> PolyPt {
        self.funnel.first()
    }

    pub const fn second(&self) -> PolyPt {
        self.funnel.second()
    }

    pub fn set_first(&mut self, first: PolyPt) {
        self.funnel.set_first(first);
    }

    pub fn set_second(&mut self, second: PolyPt) {
        self.funnel.set_second(second);
    }

    pub fn first_ray(&self) -> Ray {
        self.funnel.first_ray()
    }

    pub fn second_ray(&self) -> Ray {
        self.funnel.second_ray()
    }

    /// The intersection of the right funnel ray with the boundary line.
    #[must_use]
    pub fn first_vertex(&self) -> Option<Pt> {
        self.first_ray().line_intersection(&self.boundary)
    }

    /// The intersection of the left funnel ray with the boundary line.
    #[must_use]
    pub fn second_vertex(&self) -> Option<Pt> {
        self.second_ray().line_intersection(&self.boundary)
    }

    /// Containment additionally requires the point not to lie past the
    /// boundary.
    #[must_use]
    pub fn contains_pt(&self, p: Pt) -> bool {
        self.funnel.contains_pt(p) && turn(self.boundary_a, self.boundary_b, p) != CW_TURN
    }

    #[must_use]
    pub fn contains_seg(&self, s: &Segment) -> bool {
        self.contains_pt(s.a) && self.contains_pt(s.b)
    }

    #[must_use]
    pub fn properly_contains_pt(&self, p: Pt) -> bool {
        self.funnel.properly_contains_pt(p) && turn(self.boundary_a, self.boundary_b, p) == CCW_TURN
    }

    #[must_use]
    pub fn properly_contains_seg(&self, s: &Segment) -> bool {
        self.properly_contains_pt(s.a) && self.properly_contains_pt(s.b)
    }

    /// Whether the segment crosses both rays on the visible side of the
    /// boundary.
    #[must_use]
    pub fn is_divided_by(&self, s: &Segment) -> bool {
        let (Some(fv), Some(sv)) = (self.first_vertex(), self.second_vertex()) else {
            return false;
        };
        let turn_a = turn(fv, sv, s.a);
        let turn_b = turn(fv, sv, s.b);
        if turn_a == NO_TURN && turn_b == NO_TURN {
            return false;
        }
        self.first_ray().intersects(s)
            && self.second_ray().intersects(s)
            && turn_a != CW_TURN
            && turn_b != CW_TURN
    }

    #[must_use]
    pub fn is_properly_divided_by(&self, s: &Segment) -> bool {
        if !(self.first_ray().properly_intersects(s) && self.second_ray().properly_intersects(s)) {
            return false;
        }
        let (Some(fv), Some(sv)) = (self.first_vertex(), self.second_vertex()) else {
            return false;
        };
        let (oa, ob) = if turn(self.cusp().p, s.a, s.b) == CW_TURN { (s.b, s.a) } else { (s.a, s.b) };
        turn(oa, ob, fv) == CW_TURN && turn(oa, ob, sv) == CW_TURN
    }

    /// Whether the segment shadows the whole boundary while crossing one ray
    /// properly and touching the other. This covers the case of one segment
    /// endpoint resting exactly on a funnel ray.
    #[must_use]
    pub fn is_half_properly_divided_by(&self, s: &Segment) -> bool {
        if turn(s.a, s.b, self.boundary_a) == NO_TURN && turn(s.a, s.b, self.boundary_b) == NO_TURN {
            return false;
        }
        let (Some(fv), Some(sv)) = (self.first_vertex(), self.second_vertex()) else {
            return false;
        };
        let (oa, ob) = if turn(self.cusp().p, s.a, s.b) == CW_TURN { (s.b, s.a) } else { (s.a, s.b) };
        let turn_a = turn(oa, ob, fv);
        let turn_b = turn(oa, ob, sv);

        // If a boundary intersection lies to the left of the segment, the
        // segment does not shadow the boundary.
        if turn_a == CCW_TURN || turn_b == CCW_TURN || (turn_a == NO_TURN && turn_b == NO_TURN) {
            return false;
        }

        (self.first_ray().properly_intersects(s) && self.second_ray().intersects(s))
            || (self.first_ray().intersects(s) && self.second_ray().properly_intersects(s))
    }

    pub fn position_of(&self, p: Pt) -> Position {
        let first_turn = turn(self.cusp().p, self.first().p, p);
        let second_turn = turn(self.cusp().p, self.second().p, p);
        let boundary_turn = turn(self.boundary_a, self.boundary_b, p);

        if first_turn != CW_TURN && second_turn != CCW_TURN {
            // Inside the wedge; the boundary decides between before and
            // behind.
            if boundary_turn != CW_TURN {
                return Position::Inside;
            }
            return Position::Behind;
        }
        if first_turn != CCW_TURN && second_turn != CW_TURN {
            return Position::Opposite;
        }
        if first_turn == CCW_TURN { Position::LeftOf } else { Position::RightOf }
    }
}
