use derive_more::Display;

use crate::geom::math::eq;
use crate::primitive::point::PolyPt;
use crate::primitive::segment::Edge;
use crate::primitive::pt;

/// A trapezoid of the vertical decomposition, its left and right sides
/// parallel to the y-axis.
///
/// `y_left1`/`y_right1` are the y-values of the top side, `y_left2`/
/// `y_right2` those of the bottom side. `top_edge` and `bot_edge` are the
/// indices of the polygon edges carrying the top and bottom sides; the four
/// corner indices are set when the corner coincides with a polygon vertex
/// and `None` when it is the intersection of a vertical with a polygon edge.
#[must_use]
#[derive(Debug, Display, Copy, Clone)]
#[display("Trapezoid[x={x_left}..{x_right}, top={top_edge}, bot={bot_edge}]")]
pub struct Trapezoid {
    pub x_left: f64,
    pub x_right: f64,
    pub y_left1: f64,
    pub y_right1: f64,
    pub y_left2: f64,
    pub y_right2: f64,
    pub top_edge: usize,
    pub bot_edge: usize,
    pub top_left: Option<usize>,
    pub bot_left: Option<usize>,
    pub top_right: Option<usize>,
    pub bot_right: Option<usize>,
}

impl Trapezoid {
    /// Whether the trapezoid degenerates to a triangle.
    #[must_use]
    pub fn is_triangle(&self) -> bool {
        eq(self.y_left1, self.y_left2) || eq(self.y_right1, self.y_right2)
    }

    /// True if this trapezoid is reached from `t` by going right. Decided
    /// purely on the cyclic order of the bounding edge indices.
    #[must_use]
    pub fn is_right_of(&self, t: &Trapezoid) -> bool {
        if t.top_edge > t.bot_edge {
            (t.bot_edge..=t.top_edge).contains(&self.top_edge)
                && (t.bot_edge..=t.top_edge).contains(&self.bot_edge)
        } else {
            !((t.top_edge + 1..t.bot_edge).contains(&self.top_edge)
                || (t.top_edge + 1..t.bot_edge).contains(&self.bot_edge))
        }
    }

    /// True if this trapezoid is reached from `t` by going left.
    #[must_use]
    pub fn is_left_of(&self, t: &Trapezoid) -> bool {
        if t.top_edge < t.bot_edge {
            (t.top_edge..=t.bot_edge).contains(&self.top_edge)
                && (t.top_edge..=t.bot_edge).contains(&self.bot_edge)
        } else {
            !((t.bot_edge + 1..t.top_edge).contains(&self.top_edge)
                || (t.bot_edge + 1..t.top_edge).contains(&self.bot_edge))
        }
    }

    /// The shared vertical wall between two adjacent trapezoids, from top to
    /// bottom, or `None` when the trapezoids do not touch. Each endpoint
    /// carries the polygon vertex index when the corner is a vertex, and the
    /// index of the polygon edge it lies on otherwise.
    #[must_use]
    pub fn intersection(&self, t: &Trapezoid) -> Option<Edge> {
        if eq(self.x_right, t.x_left) {
            let (first_index, first_edge) = if t.y_left1 < self.y_right1 {
                (t.top_left, t.top_left.is_none().then_some(t.top_edge))
            } else {
                (self.top_right, self.top_right.is_none().then_some(self.top_edge))
            };
            let (second_index, second_edge) = if t.y_left2 > self.y_right2 {
                (t.bot_left, t.bot_left.is_none().then_some(t.bot_edge))
            } else {
                (self.bot_right, self.bot_right.is_none().then_some(self.bot_edge))
            };

            let first = PolyPt::corner(
                pt(self.x_right, self.y_right1.min(t.y_left1)),
                first_index,
                first_edge,
            );
            let second = PolyPt::corner(
                pt(self.x_right, self.y_right2.max(t.y_left2)),
                second_index,
                second_edge,
            );
            return Some(Edge::new(first, second));
        }

        if eq(self.x_left, t.x_right) {
            let (first_index, first_edge) = if t.y_right1 < self.y_left1 {
                (t.top_right, t.top_right.is_none().then_some(t.top_edge))
            } else {
                (self.top_left, self.top_left.is_none().then_some(self.top_edge))
            };
            let (second_index, second_edge) = if t.y_right2 > self.y_left2 {
                (t.bot_right, t.bot_right.is_none().then_some(t.bot_edge))
            } else {
                (self.bot_left, self.bot_left.is_none().then_some(self.bot_edge))
            };

            let first = PolyPt::corner(
                pt(self.x_left, self.y_left1.min(t.y_right1)),
                first_index,
                first_edge,
            );
            let second = PolyPt::corner(
                pt(self.x_left, self.y_left2.max(t.y_right2)),
                second_index,
                second_edge,
            );
            return Some(Edge::new(first, second));
        }

        None
    }
}

impl PartialEq for Trapezoid {
    fn eq(&self, t: &Self) -> bool {
        eq(self.x_left, t.x_left)
            && eq(self.x_right, t.x_right)
            && eq(self.y_left1, t.y_left1)
            && eq(self.y_left2, t.y_left2)
            && eq(self.y_right1, t.y_right1)
            && eq(self.y_right2, t.y_right2)
    }
}
