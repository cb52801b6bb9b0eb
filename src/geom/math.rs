use crate::primitive::point::Pt;

/// Crate-wide tolerance for coordinate comparisons.
pub const EP: f64 = 1e-6;

/// Left (counterclockwise) turn.
pub const CCW_TURN: i32 = 1;
/// No turn at all, the points are collinear.
pub const NO_TURN: i32 = 0;
/// Right (clockwise) turn.
pub const CW_TURN: i32 = -1;

#[must_use]
pub fn eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= EP
}

#[must_use]
pub fn ne(a: f64, b: f64) -> bool {
    !eq(a, b)
}

#[must_use]
pub fn lt(a: f64, b: f64) -> bool {
    a < b - EP
}

#[must_use]
pub fn le(a: f64, b: f64) -> bool {
    a <= b + EP
}

#[must_use]
pub fn gt(a: f64, b: f64) -> bool {
    a > b + EP
}

#[must_use]
pub fn ge(a: f64, b: f64) -> bool {
    a >= b - EP
}

/// Returns the direction of the turn formed by three ordered points.
///
/// The result is the exact sign of the cross product (p2 - p1) × (p3 - p1):
/// `CCW_TURN` for a left turn, `CW_TURN` for a right turn and `NO_TURN` when
/// the points are collinear.
#[must_use]
pub fn turn(p1: Pt, p2: Pt, p3: Pt) -> i32 {
    let cross = (p2.x - p1.x) * (p3.y - p1.y) - (p3.x - p1.x) * (p2.y - p1.y);
    if cross > 0.0 {
        CCW_TURN
    } else if cross < 0.0 {
        CW_TURN
    } else {
        NO_TURN
    }
}

#[must_use]
pub fn is_collinear(p1: Pt, p2: Pt, p3: Pt) -> bool {
    turn(p1, p2, p3) == NO_TURN
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::primitive::pt;

    #[test]
    fn turn_signs() {
        let tests = &[
            (pt(0.0, 0.0), pt(1.0, 0.0), pt(1.0, 1.0), CCW_TURN),
            (pt(0.0, 0.0), pt(1.0, 0.0), pt(1.0, -1.0), CW_TURN),
            (pt(0.0, 0.0), pt(1.0, 0.0), pt(2.0, 0.0), NO_TURN),
            (pt(0.0, 0.0), pt(1.0, 1.0), pt(2.0, 2.0), NO_TURN),
            (pt(-1.0, -1.0), pt(0.0, 0.0), pt(-1.0, 0.0), CCW_TURN),
        ];
        for &(a, b, c, res) in tests {
            assert_eq!(turn(a, b, c), res, "turn({a}, {b}, {c})");
        }
    }

    #[test]
    fn comparators_respect_tolerance() {
        assert!(eq(1.0, 1.0 + EP / 2.0));
        assert!(ne(1.0, 1.0 + 2.0 * EP));
        assert!(lt(1.0, 1.1));
        assert!(!lt(1.0, 1.0 + EP / 2.0));
        assert!(le(1.0 + EP / 2.0, 1.0));
        assert!(gt(1.1, 1.0));
        assert!(ge(1.0, 1.0 + EP / 2.0));
    }

    fn coord() -> impl Strategy<Value = f64> {
        -1e6..1e6
    }

    proptest! {
        #[test]
        fn turn_antisymmetry(
            (ax, ay, bx, by, cx, cy) in (coord(), coord(), coord(), coord(), coord(), coord())
        ) {
            let (a, b, c) = (pt(ax, ay), pt(bx, by), pt(cx, cy));
            // Swapping any two arguments flips the turn direction. Restrict
            // to triples that are clearly non-collinear so floating point
            // rounding cannot flip a near-zero sign.
            let cross = (b - a).cross(c - a);
            prop_assume!(cross.abs() > 1.0);
            prop_assert_eq!(turn(a, b, c), -turn(b, a, c));
            prop_assert_eq!(turn(a, b, c), -turn(a, c, b));
        }
    }
}
