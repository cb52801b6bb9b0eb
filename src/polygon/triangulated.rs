use std::collections::HashMap;
use std::collections::hash_map::Entry;

use earcutr::earcut;
use log::debug;
use smallvec::SmallVec;

use crate::errors::{GeometryError, Result};
use crate::polygon::Polygon;
use crate::primitive::point::Pt;
use crate::primitive::triangle::Tri;
use crate::primitive::pt;

fn round_to(v: f64, digits: i32) -> f64 {
    let f = 10f64.powi(digits);
    (v * f).round() / f
}

/// A polygon together with a precomputed triangulation and its dual graph.
///
/// Triangles live in an arena ordered as produced by the ear clipping;
/// adjacency is stored per triangle as indices of the triangles sharing an
/// interior diagonal, so dual walks are O(1) per hop.
#[must_use]
#[derive(Debug, Clone)]
pub struct TriangulatedPolygon {
    poly: Polygon,
    tris: Vec<Tri>,
    neighbours: Vec<SmallVec<[usize; 3]>>,
}

impl TriangulatedPolygon {
    pub fn new(points: Vec<Pt>) -> Result<Self> {
        Self::from_polygon(Polygon::new(points)?)
    }

    pub fn from_polygon(poly: Polygon) -> Result<Self> {
        let verts: Vec<f64> = poly.pts().iter().flat_map(|v| [v.p.x, v.p.y]).collect();
        let tri_idx = earcut(&verts, &[], 2).map_err(|_| GeometryError::NotInGeneralPosition)?;

        let mut tris: Vec<Tri> = Vec::with_capacity(tri_idx.len() / 3);
        let mut neighbours: Vec<SmallVec<[usize; 3]>> = Vec::with_capacity(tri_idx.len() / 3);
        let mut diagonal_owner: HashMap<(usize, usize), usize> = HashMap::new();

        for chunk in tri_idx.chunks_exact(3) {
            let tri = Tri::new(poly.point(chunk[0]), poly.point(chunk[1]), poly.point(chunk[2]))?;
            let tix = tris.len();
            neighbours.push(SmallVec::new());

            for e in tri.edges() {
                let a = e.a.vertex.expect("triangulation vertices carry their index");
                let b = e.b.vertex.expect("triangulation vertices carry their index");
                let key = (a.min(b), a.max(b));
                match diagonal_owner.entry(key) {
                    Entry::Occupied(other) => {
                        let other = *other.get();
                        neighbours[other].push(tix);
                        neighbours[tix].push(other);
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(tix);
                    }
                }
            }

            tris.push(tri);
        }

        debug!("triangulated {} vertices into {} triangles", poly.len(), tris.len());
        debug_assert_eq!(tris.len(), poly.len() - 2);
        Ok(Self { poly, tris, neighbours })
    }

    pub fn polygon(&self) -> &Polygon {
        &self.poly
    }

    pub fn triangles(&self) -> &[Tri] {
        &self.tris
    }

    pub fn neighbours(&self, index: usize) -> &[usize] {
        &self.neighbours[index]
    }

    /// O(n): The index of the triangle containing `p`, boundary included,
    /// or `None` when `p` lies outside the polygon.
    #[must_use]
    pub fn locate(&self, p: Pt) -> Option<usize> {
        self.tris.iter().position(|t| t.contains_closed(p))
    }

    /// O(n): A point strictly inside the polygon near edge `index`, found
    /// through the precomputed triangulation.
    pub fn point_inside_at(&self, index: usize) -> Result<Pt> {
        let next = self.poly.next(index);
        let triangle = self
            .tris
            .iter()
            .find(|t| t.has_vertex(index) && t.has_vertex(next))
            .expect("every polygon edge belongs to a triangle");

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
    use itertools::Itertools;
    use pretty_assertions::assert_eq;

    use super::*;

    fn pocket() -> TriangulatedPolygon {
        TriangulatedPolygon::new(vec![
            pt(0.0, 0.0),
            pt(10.0, 0.0),
            pt(10.0, 10.0),
            pt(6.0, 10.0),
            pt(6.0, 4.0),
            pt(4.0, 4.0),
            pt(4.0, 10.0),
            pt(0.0, 10.0),
        ])
        .unwrap()
    }

    #[test]
    fn triangle_count_is_n_minus_2() {
        let tp = pocket();
        assert_eq!(tp.triangles().len(), tp.polygon().len() - 2);
        // All triangles are pairwise distinct.
        assert!(tp.triangles().iter().tuple_combinations().all(|(a, b)| a != b));
    }

    #[test]
    fn dual_is_a_tree() {
        let tp = pocket();
        // A tree on n - 2 nodes has n - 3 edges; adjacency lists count each
        // twice.
        let degree_sum: usize = (0..tp.triangles().len()).map(|i| tp.neighbours(i).len()).sum();
        assert_eq!(degree_sum, 2 * (tp.triangles().len() - 1));
        // No triangle has more neighbours than edges.
        assert!((0..tp.triangles().len()).all(|i| tp.neighbours(i).len() <= 3));
    }

    #[test]
    fn locating_points() {
        let tp = pocket();
        let ix = tp.locate(pt(1.0, 5.0)).unwrap();
        assert!(tp.triangles()[ix].contains_closed(pt(1.0, 5.0)));
        assert_eq!(tp.locate(pt(5.0, 8.0)), None);
        assert_eq!(tp.locate(pt(-1.0, -1.0)), None);
    }

    #[test]
    fn interior_points_near_edges() {
        let tp = pocket();
        for ix in tp.polygon().indices() {
            let q = tp.point_inside_at(ix).unwrap();
            assert!(tp.locate(q).is_some(), "edge {ix}: {q} not inside");
        }
    }
}
