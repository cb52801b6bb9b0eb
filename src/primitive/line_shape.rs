use derive_more::Display;

use crate::errors::{GeometryError, Result};
use crate::geom::math::turn;
use crate::primitive::point::Pt;

/// An infinite line through two distinct points, oriented from `a` to `b`.
#[must_use]
#[derive(Debug, Display, Copy, Clone, PartialEq)]
#[display("Line[{a}, {b}]")]
pub struct Line {
    pub a: Pt,
    pub b: Pt,
}

impl Line {
    pub fn new(a: Pt, b: Pt) -> Result<Self> {
        if a == b {
            return Err(GeometryError::DegeneratedCase);
        }
        Ok(Self { a, b })
    }

    /// The x-coordinate on the line through `a` and `b` at the given
    /// y-coordinate. Fails for horizontal lines.
    pub fn x_value(a: Pt, b: Pt, y: f64) -> Result<f64> {
        if a.y == b.y {
            return Err(GeometryError::NotInGeneralPosition);
        }
        Ok((a.x - b.x) * (y - b.y) / (a.y - b.y) + b.x)
    }

    /// The y-coordinate on the line through `a` and `b` at the given
    /// x-coordinate. Fails for vertical lines.
    pub fn y_value(a: Pt, b: Pt, x: f64) -> Result<f64> {
        if a.x == b.x {
            return Err(GeometryError::NotInGeneralPosition);
        }
        Ok((a.y - b.y) * (x - b.x) / (a.x - b.x) + b.y)
    }

    pub fn x_at(&self, y: f64) -> Result<f64> {
        Self::x_value(self.a, self.b, y)
    }

    pub fn y_at(&self, x: f64) -> Result<f64> {
        Self::y_value(self.a, self.b, x)
    }

    /// The side of the line the point lies on: `CCW_TURN` on the left,
    /// `NO_TURN` on the line, `CW_TURN` on the right.
    #[must_use]
    pub fn point_side(&self, p: Pt) -> i32 {
        turn(self.a, self.b, p)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::geom::math::{CCW_TURN, CW_TURN, NO_TURN};
    use crate::primitive::pt;

    #[test]
    fn coincident_points_are_rejected() {
        assert_eq!(Line::new(pt(1.0, 1.0), pt(1.0, 1.0)), Err(GeometryError::DegeneratedCase));
    }

    #[test]
    fn evaluation() {
        let l = Line::new(pt(0.0, 0.0), pt(2.0, 4.0)).unwrap();
        assert_relative_eq!(l.y_at(1.0).unwrap(), 2.0);
        assert_relative_eq!(l.x_at(2.0).unwrap(), 1.0);
    }

    #[test]
    fn constant_coordinate_fails() {
        let horizontal = Line::new(pt(0.0, 1.0), pt(5.0, 1.0)).unwrap();
        assert_eq!(horizontal.x_at(3.0), Err(GeometryError::NotInGeneralPosition));
        let vertical = Line::new(pt(1.0, 0.0), pt(1.0, 5.0)).unwrap();
        assert_eq!(vertical.y_at(3.0), Err(GeometryError::NotInGeneralPosition));
    }

    #[test]
    fn point_side() {
        let l = Line::new(pt(0.0, 0.0), pt(1.0, 0.0)).unwrap();
        assert_eq!(l.point_side(pt(0.5, 1.0)), CCW_TURN);
        assert_eq!(l.point_side(pt(0.5, -1.0)), CW_TURN);
        assert_eq!(l.point_side(pt(7.0, 0.0)), NO_TURN);
    }
}
