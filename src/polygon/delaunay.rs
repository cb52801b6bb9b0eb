use log::trace;

use crate::errors::{GeometryError, Result};
use crate::geom::math::{CCW_TURN, NO_TURN, turn};
use crate::polygon::Polygon;
use crate::primitive::circle::Circle;
use crate::primitive::funnel::Funnel;
use crate::primitive::point::{PolyPt, Pt};
use crate::primitive::segment::Edge;
use crate::primitive::triangle::Tri;
use crate::primitive::{pt, seg};

fn round_to(v: f64, digits: i32) -> f64 {
    let f = 10f64.powi(digits);
    (v * f).round() / f
}

impl Polygon {
    /// O(n²): The missing third vertices of the constrained Delaunay
    /// triangles on either side of the edge (a, b).
    ///
    /// The first result lies left of the oriented edge, the second right of
    /// it; a side facing the polygon exterior yields `None`. A candidate is
    /// rejected when one of its connecting edges crosses the polygon
    /// boundary, and replaced when a later candidate lies inside the
    /// current circumcircle.
    pub fn complete_delaunay_edge(
        &self,
        a: &PolyPt,
        b: &PolyPt,
    ) -> Result<(Option<PolyPt>, Option<PolyPt>)> {
        let a_ix = a.vertex.expect("delaunay edges connect polygon vertices");
        let b_ix = b.vertex.expect("delaunay edges connect polygon vertices");

        // Candidate edges must leave through the interior angle at both
        // endpoints.
        let a_funnel = Funnel::new(*a, self.point(a_ix + 1), self.point(self.prev(a_ix)));
        let b_funnel = Funnel::new(*b, self.point(b_ix + 1), self.point(self.prev(b_ix)));

        let mut best: [Option<PolyPt>; 2] = [None, None];
        let mut best_circle: [Option<Circle>; 2] = [None, None];

        for curr in self.pts() {
            if curr == a || curr == b {
                continue;
            }
            if !a_funnel.contains_pt(curr.p) || !b_funnel.contains_pt(curr.p) {
                continue;
            }

            let position = turn(a.p, b.p, curr.p);
            if position == NO_TURN {
                return Err(GeometryError::ThreePointsAreCollinear);
            }
            let which = usize::from(position != CCW_TURN);

            if best[which].is_none()
                || best_circle[which].as_ref().is_some_and(|c| c.contains(curr.p))
            {
                let a_edge = seg(a.p, curr.p);
                let b_edge = seg(b.p, curr.p);

                // The candidate must be visible from both endpoints.
                let visible = self.edges().all(|border| {
                    !border.seg().properly_intersects(&a_edge)
                        && !border.seg().properly_intersects(&b_edge)
                });

                if visible {
                    if let Ok(circle) = Circle::from_pts(a.p, b.p, curr.p) {
                        best_circle[which] = Some(circle);
                        best[which] = Some(*curr);
                    }
                }
            }
        }

        Ok((best[0], best[1]))
    }

    /// O(n²): The Delaunay triangle on the other side of `edge`, i.e. the
    /// one that is not `triangle`. `None` for polygon boundary edges.
    pub(crate) fn complete_other_delaunay_triangle_of_edge(
        &self,
        edge: &Edge,
        triangle: &Tri,
    ) -> Result<Option<Tri>> {
        let (first, second) = self.complete_delaunay_edge(&edge.a, &edge.b)?;
        let (Some(first), Some(second)) = (first, second) else {
            return Ok(None);
        };

        if triangle.has_pt(&first) {
            return Tri::new(second, edge.a, edge.b).map(Some);
        }
        if triangle.has_pt(&second) {
            return Tri::new(first, edge.a, edge.b).map(Some);
        }
        unreachable!("one completion of a triangle edge belongs to the triangle itself");
    }

    /// O(n²): The first dual neighbour of `triangle` in edge order.
    pub fn delaunay_first_neighbour(&self, triangle: &Tri) -> Result<Option<Tri>> {
        for edge in triangle.edges() {
            if let Some(neighbour) = self.complete_other_delaunay_triangle_of_edge(&edge, triangle)?
            {
                return Ok(Some(neighbour));
            }
        }
        Ok(None)
    }

    /// O(n²): The dual neighbour of `triangle` following `neighbour`,
    /// walking the triangle edges after their common one.
    pub fn delaunay_next_neighbour(
        &self,
        triangle: &Tri,
        neighbour: &Tri,
    ) -> Result<Option<Tri>> {
        let common = triangle
            .common_edge(neighbour)
            .expect("neighbouring triangles share an edge");
        for edge in triangle.edges_until(&common) {
            if let Some(next) = self.complete_other_delaunay_triangle_of_edge(&edge, triangle)? {
                return Ok(Some(next));
            }
        }
        Ok(None)
    }

    /// O(1): How many dual neighbours `triangle` has: one per edge that is
    /// not a polygon boundary edge.
    #[must_use]
    pub fn delaunay_neighbour_number(&self, triangle: &Tri) -> usize {
        triangle
            .edges()
            .iter()
            .filter(|e| {
                let a = e.a.vertex.expect("delaunay triangles consist of polygon vertices");
                let b = e.b.vertex.expect("delaunay triangles consist of polygon vertices");
                let d = (a + self.len() - b) % self.len();
                d != 1 && d != self.len() - 1
            })
            .count()
    }

    /// O(n³): The constrained Delaunay triangle containing `p`, or `None`
    /// when `p` lies outside the polygon.
    ///
    /// Starts from the triangle under the edge directly above `p` and walks
    /// towards `p` through triangle edges covering its x-coordinate.
    pub fn locate_point_in_triangle(&self, p: Pt) -> Result<Option<Tri>> {
        let Some((top_edge, _)) = self.find_edges_above_and_below(p)? else {
            return Ok(None);
        };

        let mut start_edge = self.edge(top_edge);
        let (below, above) = self.complete_delaunay_edge(&start_edge.a, &start_edge.b)?;
        debug_assert!(above.is_none());
        let below = below.expect("an interior slab edge has a triangle below it");

        let mut triangle = Tri::new(self.point(top_edge), self.point(top_edge + 1), below)?;

        while !triangle.contains_closed(p) {
            let next_edge = triangle
                .edges()
                .into_iter()
                .find(|e| {
                    *e != start_edge
                        && ((e.a.p.x <= p.x && p.x <= e.b.p.x)
                            || (e.b.p.x <= p.x && p.x <= e.a.p.x))
                })
                .expect("some triangle edge covers the x-coordinate");
            start_edge = next_edge;
            triangle = self
                .complete_other_delaunay_triangle_of_edge(&next_edge, &triangle)?
                .expect("the walk towards an interior point stays inside");
        }

        trace!("{p} located in {triangle}");
        Ok(Some(triangle))
    }

    /// O(n²): A point strictly inside the polygon near edge `index`.
    ///
    /// The centroid of the Delaunay triangle completing the edge, rounded
    /// to the fewest decimal digits that keep it inside that triangle.
    pub fn point_inside_at(&self, index: usize) -> Result<Pt> {
        let a = self.point(index);
        let b = self.point(index + 1);
        let (c, _) = self.complete_delaunay_edge(&a, &b)?;
        let c = c.expect("every polygon edge completes to an interior triangle");

        let triangle = Tri::new(a, b, c)?;
        let p = triangle.centroid();

        let mut digits = 4;
        loop {
            let q = pt(round_to(p.x, digits), round_to(p.y, digits));
            if triangle.contains(q) {
                return Ok(q);
            }
            digits += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn l_shape() -> Polygon {
        Polygon::new(vec![
            pt(0.0, 0.0),
            pt(6.0, 0.0),
            pt(6.0, 2.0),
            pt(2.0, 2.0),
            pt(2.0, 6.0),
            pt(0.0, 6.0),
        ])
        .unwrap()
    }

    #[test]
    fn completes_a_boundary_edge_inward() {
        let p = l_shape();
        let (left, right) = p.complete_delaunay_edge(&p.point(0), &p.point(1)).unwrap();
        // The bottom edge has a triangle on its interior (left) side only.
        assert!(left.is_some());
        assert_eq!(right, None);
    }

    #[test]
    fn completes_a_diagonal_on_both_sides() {
        let p = l_shape();
        // The diagonal from (0,0) to (2,2) splits two triangles.
        let (left, right) = p.complete_delaunay_edge(&p.point(0), &p.point(3)).unwrap();
        assert!(left.is_some());
        assert!(right.is_some());
        assert_ne!(left, right);
    }

    #[test]
    fn locates_points_in_triangles() {
        let p = l_shape();
        let t1 = p.locate_point_in_triangle(pt(1.0, 0.5)).unwrap().unwrap();
        assert!(t1.contains_closed(pt(1.0, 0.5)));
        let t2 = p.locate_point_in_triangle(pt(1.0, 5.0)).unwrap().unwrap();
        assert!(t2.contains_closed(pt(1.0, 5.0)));
        assert_ne!(t1, t2);
        // Outside the polygon nothing is found.
        assert_eq!(p.locate_point_in_triangle(pt(5.0, 5.0)).unwrap(), None);
    }

    #[test]
    fn neighbour_walks() {
        let p = l_shape();
        let t = p.locate_point_in_triangle(pt(1.0, 0.5)).unwrap().unwrap();
        let first = p.delaunay_first_neighbour(&t).unwrap().unwrap();
        assert!(t.common_edge(&first).is_some());
        assert!(p.delaunay_neighbour_number(&t) >= 1);
    }

    #[test]
    fn interior_points_near_edges() {
        let p = l_shape();
        for ix in p.indices() {
            let q = p.point_inside_at(ix).unwrap();
            // The point is strictly inside: it sees both edge endpoints and
            // lies in some trapezoid.
            assert!(p.trapezoid(q).unwrap().is_some(), "edge {ix}: {q} not inside");
        }
    }
}
