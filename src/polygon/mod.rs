use itertools::Itertools;

use crate::errors::{GeometryError, Result};
use crate::geom::math::{CCW_TURN, CW_TURN, NO_TURN, turn};
use crate::primitive::point::{PolyPt, Pt};
use crate::primitive::segment::Edge;

mod delaunay;
mod trapezoidation;
mod triangulated;
mod visibility;

pub use trapezoidation::{LEFT, RIGHT};
pub use triangulated::TriangulatedPolygon;

/// A simple polygon: an immutable sequence of at least three vertices in
/// counterclockwise order. All vertex indexing is modular, and the edge with
/// index `i` runs from vertex `i` to vertex `i + 1`.
#[must_use]
#[derive(Debug, Clone)]
pub struct Polygon {
    pts: Vec<PolyPt>,
}

impl Polygon {
    pub fn new(points: Vec<Pt>) -> Result<Self> {
        if points.len() < 3 {
            return Err(GeometryError::TooFewPoints);
        }
        if points.iter().tuple_combinations().any(|(a, b)| a == b) {
            return Err(GeometryError::DegeneratedCase);
        }
        let pts =
            points.into_iter().enumerate().map(|(ix, p)| PolyPt::vertex(p, ix)).collect();
        Ok(Self { pts })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pts.is_empty()
    }

    pub fn pts(&self) -> &[PolyPt] {
        &self.pts
    }

    /// The vertex at the given index, wrapping around.
    pub fn point(&self, index: usize) -> PolyPt {
        self.pts[index % self.len()]
    }

    /// The index preceding `index`, wrapping around zero.
    #[must_use]
    pub fn prev(&self, index: usize) -> usize {
        (index + self.len() - 1) % self.len()
    }

    /// The index succeeding `index`, wrapping around the highest.
    #[must_use]
    pub fn next(&self, index: usize) -> usize {
        (index + 1) % self.len()
    }

    /// The index `steps` positions away from `index` in either direction.
    #[must_use]
    pub fn offset(&self, index: usize, steps: isize) -> usize {
        (index as isize + steps).rem_euclid(self.len() as isize) as usize
    }

    /// The vertex preceding the given point. For a point resting on edge
    /// `e` this is the edge's start vertex `e`.
    pub fn pred(&self, p: &PolyPt) -> PolyPt {
        if let Some(e) = p.edge {
            return self.point(e);
        }
        let v = p.vertex.expect("predecessor requires a vertex or edge point");
        self.point(self.prev(v))
    }

    /// The vertex succeeding the given point. For a point resting on edge
    /// `e` this is the edge's end vertex `e + 1`.
    pub fn succ(&self, p: &PolyPt) -> PolyPt {
        if let Some(e) = p.edge {
            return self.point(e + 1);
        }
        let v = p.vertex.expect("successor requires a vertex or edge point");
        self.point(v + 1)
    }

    /// The edge starting at vertex `index`.
    pub fn edge(&self, index: usize) -> Edge {
        Edge::new(self.point(index), self.point(index + 1))
    }

    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        (0..self.len()).map(|ix| self.edge(ix))
    }

    /// The polygon's turn at the given vertex.
    #[must_use]
    pub fn point_turn(&self, index: usize) -> i32 {
        turn(self.point(self.prev(index)).p, self.point(index).p, self.point(index + 1).p)
    }

    /// Whether the polygon is concave (reflex) at the given vertex.
    #[must_use]
    pub fn is_concave_point(&self, index: usize) -> bool {
        self.point_turn(index) == CW_TURN
    }

    /// Whether the polygon is convex at the given vertex.
    #[must_use]
    pub fn is_convex_point(&self, index: usize) -> bool {
        self.point_turn(index) == CCW_TURN
    }

    /// All indices from `start` to `stop` inclusive, wrapping around.
    /// `step` must be `1` or `-1`.
    pub fn walk(&self, start: usize, stop: usize, step: isize) -> IndexWalk {
        IndexWalk {
            len: self.len(),
            curr: start % self.len(),
            stop: stop % self.len(),
            step,
            done: false,
        }
    }

    /// All indices starting at zero, in counterclockwise order.
    pub fn indices(&self) -> IndexWalk {
        self.walk(0, self.len() - 1, 1)
    }

    /// O(n³) check that no three vertices are collinear.
    #[must_use]
    pub fn is_in_general_position(&self) -> bool {
        self.pts
            .iter()
            .tuple_combinations()
            .all(|(a, b, c)| turn(a.p, b.p, c.p) != NO_TURN)
    }
}

/// Wrapping inclusive walk over polygon indices.
#[must_use]
pub struct IndexWalk {
    len: usize,
    curr: usize,
    stop: usize,
    step: isize,
    done: bool,
}

impl Iterator for IndexWalk {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.done {
            return None;
        }
        let item = self.curr;
        if self.curr == self.stop {
            self.done = true;
        } else {
            self.curr = (self.curr as isize + self.step).rem_euclid(self.len as isize) as usize;
        }
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::primitive::pt;

    fn square() -> Polygon {
        Polygon::new(vec![pt(0.0, 0.0), pt(4.0, 0.0), pt(4.0, 4.0), pt(0.0, 4.0)]).unwrap()
    }

    #[test]
    fn too_few_points() {
        assert!(matches!(
            Polygon::new(vec![pt(0.0, 0.0), pt(1.0, 0.0)]),
            Err(GeometryError::TooFewPoints)
        ));
    }

    #[test]
    fn duplicate_vertices_are_rejected() {
        assert!(matches!(
            Polygon::new(vec![pt(0.0, 0.0), pt(1.0, 0.0), pt(0.0, 0.0), pt(0.0, 1.0)]),
            Err(GeometryError::DegeneratedCase)
        ));
    }

    #[test]
    fn modular_access() {
        let p = square();
        assert_eq!(p.point(5).vertex, Some(1));
        assert_eq!(p.prev(0), 3);
        assert_eq!(p.next(3), 0);
        assert_eq!(p.offset(0, -1), 3);
        assert_eq!(p.offset(3, 2), 1);
    }

    #[test]
    fn pred_and_succ() {
        let p = square();
        let v0 = p.point(0);
        assert_eq!(p.pred(&v0).vertex, Some(3));
        assert_eq!(p.succ(&v0).vertex, Some(1));
        // A point on edge 2 runs from vertex 2 to vertex 3.
        let on_edge = PolyPt::on_edge(pt(2.0, 4.0), 2);
        assert_eq!(p.pred(&on_edge).vertex, Some(2));
        assert_eq!(p.succ(&on_edge).vertex, Some(3));
    }

    #[test]
    fn vertex_turns() {
        let p = square();
        assert!(p.is_convex_point(0));
        assert!(!p.is_concave_point(0));

        let l_shape = Polygon::new(vec![
            pt(0.0, 0.0),
            pt(6.0, 0.0),
            pt(6.0, 2.0),
            pt(2.0, 2.0),
            pt(2.0, 6.0),
            pt(0.0, 6.0),
        ])
        .unwrap();
        assert!(l_shape.is_concave_point(3));
        assert!(l_shape.is_convex_point(2));
    }

    #[test]
    fn walking_indices() {
        let p = square();
        assert_eq!(p.indices().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(p.walk(2, 1, 1).collect::<Vec<_>>(), vec![2, 3, 0, 1]);
        assert_eq!(p.walk(1, 2, -1).collect::<Vec<_>>(), vec![1, 0, 3, 2]);
        assert_eq!(p.walk(3, 3, 1).collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn general_position() {
        assert!(square().is_in_general_position());
        let collinear = Polygon::new(vec![
            pt(0.0, 0.0),
            pt(2.0, 0.0),
            pt(4.0, 0.0),
            pt(4.0, 4.0),
        ])
        .unwrap();
        assert!(!collinear.is_in_general_position());
    }
}
