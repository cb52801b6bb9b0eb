use derive_more::Display;
use nalgebra::{Matrix2, Vector2, vector};

use crate::errors::{GeometryError, Result};
use crate::geom::math::{is_collinear, le};
use crate::primitive::point::Pt;
use crate::primitive::pt;

/// A circle stored as centre and squared radius. Containment tests work on
/// squared distances so the radius itself is only computed on demand.
#[must_use]
#[derive(Debug, Display, Copy, Clone, PartialEq)]
#[display("Circle[{center}, r2={radius2}]")]
pub struct Circle {
    center: Pt,
    radius2: f64,
}

impl Circle {
    pub fn new(center: Pt, radius: f64) -> Self {
        assert!(radius.is_finite() && radius >= 0.0, "circle radius must be finite and non-negative");
        Self { center, radius2: radius * radius }
    }

    pub const fn with_radius2(center: Pt, radius2: f64) -> Self {
        assert!(radius2.is_finite() && radius2 >= 0.0, "squared radius must be finite and non-negative");
        Self { center, radius2 }
    }

    /// The circumcircle of three non-collinear points, i.e. the intersection
    /// of two perpendicular bisectors.
    pub fn from_pts(a: Pt, b: Pt, c: Pt) -> Result<Self> {
        if is_collinear(a, b, c) {
            return Err(GeometryError::ThreePointsAreCollinear);
        }

        let m = Matrix2::new(
            2.0 * (a.x - b.x),
            2.0 * (a.y - b.y),
            2.0 * (a.x - c.x),
            2.0 * (a.y - c.y),
        );
        let rhs: Vector2<f64> = vector![
            a.x * a.x - b.x * b.x + a.y * a.y - b.y * b.y,
            a.x * a.x - c.x * c.x + a.y * a.y - c.y * c.y
        ];
        let center =
            m.lu().solve(&rhs).ok_or(GeometryError::ThreePointsAreCollinear)?;
        let center = pt(center.x, center.y);
        Ok(Self { center, radius2: center.dist2(a) })
    }

    pub const fn center(&self) -> Pt {
        self.center
    }

    #[must_use]
    pub const fn radius2(&self) -> f64 {
        self.radius2
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius2.sqrt()
    }

    /// Whether the point lies in the closed disk, up to the crate tolerance.
    #[must_use]
    pub fn contains(&self, p: Pt) -> bool {
        le(self.center.dist2(p), self.radius2)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn circumcircle_of_right_triangle() {
        // The hypotenuse is a diameter.
        let c = Circle::from_pts(pt(0.0, 0.0), pt(4.0, 0.0), pt(0.0, 3.0)).unwrap();
        assert_eq!(c.center(), pt(2.0, 1.5));
        assert_relative_eq!(c.radius(), 2.5, epsilon = 1e-9);
    }

    #[test]
    fn circumcircle_contains_defining_points() {
        let (a, b, c) = (pt(1.0, 2.0), pt(5.0, -1.0), pt(3.0, 7.0));
        let circle = Circle::from_pts(a, b, c).unwrap();
        assert!(circle.contains(a));
        assert!(circle.contains(b));
        assert!(circle.contains(c));
    }

    #[test]
    fn collinear_points_are_rejected() {
        assert_eq!(
            Circle::from_pts(pt(0.0, 0.0), pt(1.0, 1.0), pt(2.0, 2.0)),
            Err(GeometryError::ThreePointsAreCollinear)
        );
    }

    #[test]
    fn containment() {
        let c = Circle::new(pt(0.0, 0.0), 2.0);
        assert!(c.contains(pt(1.0, 1.0)));
        assert!(c.contains(pt(2.0, 0.0)));
        assert!(!c.contains(pt(2.1, 0.0)));
    }

    proptest! {
        #[test]
        fn circumcircle_recovers_the_generating_circle(
            cx in -50.0..50.0,
            cy in -50.0..50.0,
            r in 10.0..50.0,
            th in 0.0..std::f64::consts::TAU,
            d1 in -0.5..0.5,
            d2 in -0.5..0.5,
        ) {
            // Three well-separated points on a known circle; the solve must
            // reproduce centre and radius and satisfy the containment law.
            let at = |ang: f64| pt(cx + r * ang.cos(), cy + r * ang.sin());
            let third = std::f64::consts::TAU / 3.0;
            let (a, b, c) = (at(th), at(th + third + d1), at(th + 2.0 * third + d2));
            let circle = Circle::from_pts(a, b, c).unwrap();
            prop_assert!(circle.center().dist(pt(cx, cy)) < 1e-6);
            prop_assert!(circle.contains(a));
            prop_assert!(circle.contains(b));
            prop_assert!(circle.contains(c));
            // A point clearly beyond the circumscribing disk is outside.
            let dir = (a - circle.center()) * 1.2;
            prop_assert!(!circle.contains(circle.center() + dir));
        }
    }
}
