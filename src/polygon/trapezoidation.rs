use log::trace;
use smallvec::SmallVec;

use crate::errors::{GeometryError, Result};
use crate::geom::math::{CW_TURN, turn};
use crate::polygon::Polygon;
use crate::primitive::line_shape::Line;
use crate::primitive::point::{PolyPt, Pt};
use crate::primitive::trapezoid::Trapezoid;
use crate::primitive::pt;

/// Look left of a trapezoid when enumerating neighbours.
pub const LEFT: u8 = 0b10;
/// Look right of a trapezoid when enumerating neighbours.
pub const RIGHT: u8 = 0b01;

/// Probe offset used to step just across a trapezoid wall.
const DIST: f64 = 1e-6;

impl Polygon {
    /// O(n): The indices of the polygon edges directly above and below the
    /// point, in this order. `None` when the point lies outside.
    ///
    /// Vertex hits on the vertical through the point are resolved with the
    /// interior-side rule: a bottom edge must run left to right, a top edge
    /// right to left. A vertex sharing the x-coordinate both above and
    /// below the point violates general position.
    pub(crate) fn find_edges_above_and_below(&self, p: Pt) -> Result<Option<(usize, usize)>> {
        let mut distance_below: Option<f64> = None;
        let mut distance_above: Option<f64> = None;
        let mut top_edge: Option<usize> = None;
        let mut bottom_edge: Option<usize> = None;
        let mut top_node: Option<PolyPt> = None;
        let mut bottom_node: Option<PolyPt> = None;

        for (ix, curr) in self.pts().iter().enumerate() {
            let next = self.point(ix + 1);

            // Ignore edges not covering the x-coordinate of the point.
            if p.x < curr.p.x.min(next.p.x) || p.x > curr.p.x.max(next.p.x) {
                continue;
            }

            if p.x == curr.p.x {
                if curr.p.y < p.y && bottom_node.is_none_or(|b| curr.p.y > b.p.y) {
                    bottom_node = Some(*curr);
                } else if curr.p.y > p.y && top_node.is_none_or(|t| curr.p.y > t.p.y) {
                    top_node = Some(*curr);
                }
            }

            let y_on_edge = Line::y_value(curr.p, next.p, p.x)?;

            if y_on_edge < p.y && distance_below.is_none_or(|d| p.y - y_on_edge < d) {
                // The interior lies left of every edge, so only edges
                // running left to right qualify as bottom edges; a closer
                // wrong-direction edge means the point is outside.
                if curr.p.x < next.p.x {
                    bottom_edge = Some(ix);
                    distance_below = Some(p.y - y_on_edge);
                } else {
                    bottom_edge = None;
                }
            }
            if y_on_edge > p.y && distance_above.is_none_or(|d| y_on_edge - p.y < d) {
                if curr.p.x > next.p.x {
                    top_edge = Some(ix);
                    distance_above = Some(y_on_edge - p.y);
                } else {
                    top_edge = None;
                }
            }
        }

        if top_node.is_some() && bottom_node.is_some() {
            return Err(GeometryError::NotInGeneralPosition);
        }

        if top_edge.is_none() {
            if let Some(tn) = top_node {
                let v = tn.vertex.expect("polygon vertices carry their index");
                top_edge = if turn(tn.p, self.succ(&tn).p, p) != CW_TURN {
                    Some(v)
                } else {
                    Some(self.prev(v))
                };
            }
        }
        if bottom_edge.is_none() {
            if let Some(bn) = bottom_node {
                let v = bn.vertex.expect("polygon vertices carry their index");
                bottom_edge = if turn(self.pred(&bn).p, bn.p, p) != CW_TURN {
                    Some(self.prev(v))
                } else {
                    Some(v)
                };
            }
        }

        match (top_edge, bottom_edge) {
            (Some(top), Some(bot)) => {
                debug_assert!(self.point(top).p.x > self.point(top + 1).p.x);
                debug_assert!(self.point(bot).p.x < self.point(bot + 1).p.x);
                Ok(Some((top, bot)))
            }
            _ => Ok(None),
        }
    }

    /// O(n): The trapezoid of the vertical decomposition containing `p`, or
    /// `None` when `p` lies outside the polygon.
    pub fn trapezoid(&self, p: Pt) -> Result<Option<Trapezoid>> {
        let Some((top_edge, bot_edge)) = self.find_edges_above_and_below(p)? else {
            return Ok(None);
        };

        let v_top_left = self.point(top_edge + 1);
        let v_top_right = self.point(top_edge);
        let v_bot_left = self.point(bot_edge);
        let v_bot_right = self.point(bot_edge + 1);

        // Keep only the edge endpoints that actually bound the trapezoid.
        let mut top_left_ix = None;
        let mut bot_left_ix = None;
        let mut top_right_ix = None;
        let mut bot_right_ix = None;

        let mut left = if v_top_left.p.is_right_of(v_bot_left.p) {
            top_left_ix = v_top_left.vertex;
            v_top_left
        } else if v_bot_left.p.is_right_of(v_top_left.p) {
            bot_left_ix = v_bot_left.vertex;
            v_bot_left
        } else {
            top_left_ix = v_top_left.vertex;
            bot_left_ix = v_bot_left.vertex;
            v_bot_left
        };

        let mut right = if v_top_right.p.is_left_of(v_bot_right.p) {
            top_right_ix = v_top_right.vertex;
            v_top_right
        } else if v_bot_right.p.is_left_of(v_top_right.p) {
            bot_right_ix = v_bot_right.vertex;
            v_bot_right
        } else {
            top_right_ix = v_top_right.vertex;
            bot_right_ix = v_bot_right.vertex;
            v_bot_right
        };

        // Any reflex vertex inside the slab shrinks it from the left or
        // right.
        for (ix, curr) in self.pts().iter().enumerate() {
            let in_band = |c: &PolyPt| -> Result<bool> {
                Ok(Line::y_value(v_bot_left.p, v_bot_right.p, c.p.x)? <= c.p.y
                    && c.p.y <= Line::y_value(v_top_left.p, v_top_right.p, c.p.x)?)
            };
            if curr.p.is_right_of(left.p)
                && curr.p.is_left_of(p)
                && !self.point(self.prev(ix)).p.is_right_of(curr.p)
                && !self.point(ix + 1).p.is_right_of(curr.p)
                && in_band(curr)?
            {
                left = *curr;
                top_left_ix = None;
                bot_left_ix = None;
            }
            if curr.p.is_left_of(right.p)
                && curr.p.is_right_of(p)
                && !self.point(self.prev(ix)).p.is_left_of(curr.p)
                && !self.point(ix + 1).p.is_left_of(curr.p)
                && in_band(curr)?
            {
                right = *curr;
                top_right_ix = None;
                bot_right_ix = None;
            }
        }

        let x_left = left.p.x;
        let x_right = right.p.x;
        let y_left1 = if x_left == v_top_left.p.x {
            v_top_left.p.y
        } else {
            Line::y_value(v_top_left.p, v_top_right.p, x_left)?
        };
        let y_right1 = if x_right == v_top_right.p.x {
            v_top_right.p.y
        } else {
            Line::y_value(v_top_left.p, v_top_right.p, x_right)?
        };
        let y_left2 = if x_left == v_bot_left.p.x {
            v_bot_left.p.y
        } else {
            Line::y_value(v_bot_left.p, v_bot_right.p, x_left)?
        };
        let y_right2 = if x_right == v_bot_right.p.x {
            v_bot_right.p.y
        } else {
            Line::y_value(v_bot_left.p, v_bot_right.p, x_right)?
        };

        Ok(Some(Trapezoid {
            x_left,
            x_right,
            y_left1,
            y_right1,
            y_left2,
            y_right2,
            top_edge,
            bot_edge,
            top_left: top_left_ix,
            bot_left: bot_left_ix,
            top_right: top_right_ix,
            bot_right: bot_right_ix,
        }))
    }

    /// O(n): The up to two trapezoids adjacent to `t` through the sides
    /// selected by `which` (a combination of [`LEFT`] and [`RIGHT`]).
    ///
    /// Neighbours are located by querying points offset slightly past each
    /// corner; collinear x-coordinates on the way surface as a
    /// general-position error.
    pub fn neighbour_trapezoids(
        &self,
        t: &Trapezoid,
        which: u8,
    ) -> Result<SmallVec<[Trapezoid; 4]>> {
        let mut top_left = None;
        let mut bot_left = None;
        let mut top_right = None;
        let mut bot_right = None;

        if which & LEFT != 0 {
            let (a, b) = match t.top_left {
                None => (self.point(t.top_edge), self.point(t.top_edge + 1)),
                Some(v) => (self.point(v), self.point(v + 1)),
            };
            let y = Line::y_value(a.p, b.p, t.x_left - DIST)?;
            top_left = self.trapezoid(pt(t.x_left - DIST, y - DIST))?;

            let (a, b) = match t.bot_left {
                None => (self.point(t.bot_edge), self.point(t.bot_edge + 1)),
                Some(v) => (self.point(self.prev(v)), self.point(v)),
            };
            let y = Line::y_value(a.p, b.p, t.x_left - DIST)?;
            bot_left = self.trapezoid(pt(t.x_left - DIST, y + DIST))?;
        }

        if which & RIGHT != 0 {
            let (a, b) = match t.top_right {
                None => (self.point(t.top_edge), self.point(t.top_edge + 1)),
                Some(v) => (self.point(self.prev(v)), self.point(v)),
            };
            let y = Line::y_value(a.p, b.p, t.x_right + DIST)?;
            top_right = self.trapezoid(pt(t.x_right + DIST, y - DIST))?;

            let (a, b) = match t.bot_right {
                None => (self.point(t.bot_edge), self.point(t.bot_edge + 1)),
                Some(v) => (self.point(v), self.point(v + 1)),
            };
            let y = Line::y_value(a.p, b.p, t.x_right + DIST)?;
            bot_right = self.trapezoid(pt(t.x_right + DIST, y + DIST))?;
        }

        let mut res = SmallVec::new();
        if let Some(tl) = top_left {
            res.push(tl);
        }
        if bot_left.is_some() && bot_left != top_left {
            res.push(bot_left.unwrap());
        }
        if let Some(br) = bot_right {
            res.push(br);
        }
        if top_right.is_some() && top_right != bot_right {
            res.push(top_right.unwrap());
        }
        trace!("{} neighbour(s) of {t} (mask {which:#04b})", res.len());
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::geom::math::eq;
    use crate::polygon::Polygon;

    // A concave polygon in general position (all x-coordinates distinct).
    fn zigzag() -> Polygon {
        Polygon::new(vec![
            pt(0.0, 2.0),
            pt(10.0, 0.0),
            pt(3.0, 2.0),
            pt(9.0, 1.0),
            pt(8.0, 8.0),
            pt(5.0, 3.0),
            pt(4.5, 5.0),
            pt(4.0, 6.0),
        ])
        .unwrap()
    }

    #[test]
    fn outside_points_have_no_trapezoid() {
        let p = zigzag();
        assert_eq!(p.trapezoid(pt(-5.0, 0.0)).unwrap(), None);
        assert_eq!(p.trapezoid(pt(20.0, 0.0)).unwrap(), None);
        // Inside the bounding box but outside the polygon.
        assert_eq!(p.trapezoid(pt(6.0, 7.5)).unwrap(), None);
    }

    #[test]
    fn locates_interior_point() {
        let p = zigzag();
        let t = p.trapezoid(pt(7.0, 4.0)).unwrap().unwrap();
        assert!(t.x_left <= 7.0 && 7.0 <= t.x_right);
        assert_eq!(t.top_edge, 4);
    }

    #[test]
    fn shared_x_with_vertices_violates_general_position() {
        // A diamond: the query shares its x-coordinate with vertices both
        // above and below.
        let p = Polygon::new(vec![pt(0.0, -2.0), pt(2.0, 0.0), pt(0.0, 2.0), pt(-2.0, 0.0)])
            .unwrap();
        assert_eq!(p.trapezoid(pt(0.0, 0.0)), Err(GeometryError::NotInGeneralPosition));
    }

    #[test]
    fn neighbours_across_a_wall() {
        let p = zigzag();
        let t = p.trapezoid(pt(7.0, 4.0)).unwrap().unwrap();
        let right = p.neighbour_trapezoids(&t, RIGHT).unwrap();
        assert!(!right.is_empty());
        for n in &right {
            assert!(eq(n.x_left, t.x_right));
        }
        let left = p.neighbour_trapezoids(&t, LEFT).unwrap();
        assert!(!left.is_empty());
        for n in &left {
            assert!(eq(n.x_right, t.x_left));
        }
    }
}
