use log::trace;
use smallvec::SmallVec;

use crate::errors::Result;
use crate::geom::math::{CCW_TURN, CW_TURN, turn};
use crate::polygon::Polygon;
use crate::primitive::bounded_funnel::BoundedFunnel;
use crate::primitive::funnel::Funnel;
use crate::primitive::point::{PolyPt, Pt};
use crate::primitive::segment::Edge;
use crate::primitive::seg;

impl Polygon {
    /// O(n): Whether `point` can see `edge` inside the polygon.
    ///
    /// On success returns the two points bounding the visibility wedge from
    /// `point` towards the edge, in counterclockwise order; `None` when the
    /// edge is not visible.
    ///
    /// The sweep keeps a list of bounded funnels (usually one; two when a
    /// reflex vertex splits the visibility cone) and shrinks them with every
    /// polygon edge until either none survives or all edges are consumed.
    pub fn point_sees_edge(&self, point: &PolyPt, edge: &Edge) -> Result<Option<(PolyPt, PolyPt)>> {
        // A point trivially sees an edge it is an endpoint of.
        if *point == edge.a {
            return Ok(Some((edge.a, edge.b)));
        }
        if *point == edge.b {
            return Ok(Some((edge.b, edge.a)));
        }

        // Orient the target so that (point, first, second) is a left turn.
        let (edge_first, edge_second) = if turn(point.p, edge.a.p, edge.b.p) == CCW_TURN {
            (edge.a, edge.b)
        } else {
            (edge.b, edge.a)
        };

        // A polygon edge seen from its back side is never visible.
        if let (Some(ai), Some(bi)) = (edge.a.vertex, edge.b.vertex) {
            if (ai == self.next(bi) || ai == self.prev(bi)) && edge_first == edge.b {
                return Ok(None);
            }
        }

        let mut funnel = Funnel::new(*point, edge_first, edge_second);
        let mut funnels: SmallVec<[BoundedFunnel; 2]> = SmallVec::new();

        // A vertex sees through its interior angle only; intersect the
        // wedge with it up front.
        if let Some(pix) = point.vertex {
            let point_funnel = Funnel::new(*point, self.point(pix + 1), self.point(self.prev(pix)));

            if self.is_concave_point(pix)
                && point_funnel.contains_pt(edge_first.p)
                && point_funnel.contains_pt(edge_second.p)
                && !point_funnel.contains_seg(&seg(edge_first.p, edge_second.p))
            {
                // The reflex angle splits visibility: the edge is reachable
                // around either side of the vertex, through two separate
                // cones.
                funnels.push(BoundedFunnel::new(
                    *point,
                    self.point(pix + 1),
                    edge_second,
                    edge_first.p,
                    edge_second.p,
                )?);
                funnels.push(BoundedFunnel::new(
                    *point,
                    edge_first,
                    self.point(self.prev(pix)),
                    edge_first.p,
                    edge_second.p,
                )?);
            } else {
                // At least one wedge must reach into the other.
                if !(point_funnel.contains_pt(funnel.first().p)
                    || point_funnel.contains_pt(funnel.second().p)
                    || funnel.contains_pt(point_funnel.first().p)
                    || funnel.contains_pt(point_funnel.second().p))
                {
                    return Ok(None);
                }
                if funnel.contains_pt(self.point(pix + 1).p) {
                    funnel.set_first(self.point(pix + 1));
                }
                if funnel.contains_pt(self.point(self.prev(pix)).p) {
                    funnel.set_second(self.point(self.prev(pix)));
                }
                if funnel.first() == funnel.second() {
                    return Ok(None);
                }
            }
        }

        if funnels.is_empty() {
            funnels.push(BoundedFunnel::new(
                funnel.cusp(),
                funnel.first(),
                funnel.second(),
                edge_first.p,
                edge_second.p,
            )?);
        }

        // Start the sweep at an edge that no funnel wholly contains, so
        // every subsequent edge can only shrink a funnel, never split it.
        let mut start_ix = self.len() - 1;
        for ix in self.indices() {
            let e = self.edge(ix);
            if funnels.iter().all(|f| !f.contains_seg(&e.seg())) {
                start_ix = ix;
                break;
            }
        }

        for ix in self.walk(start_ix, self.prev(start_ix), 1) {
            let p_edge = self.edge(ix);

            // Orient the edge counterclockwise as seen from the point.
            let (p_first, p_second) = if turn(point.p, p_edge.a.p, p_edge.b.p) == CW_TURN {
                (p_edge.b, p_edge.a)
            } else {
                (p_edge.a, p_edge.b)
            };

            funnels.retain(|f| {
                debug_assert!(!f.properly_contains_seg(&p_edge.seg()));

                if f.properly_contains_pt(p_first.p) {
                    f.set_second(p_first);
                }
                if f.properly_contains_pt(p_second.p) {
                    f.set_first(p_second);
                }

                let mut keep = true;
                if f.is_half_properly_divided_by(&p_edge.seg()) {
                    keep = false;
                }
                // A funnel whose boundary coincides with this edge dies,
                // unless the edge is the target itself.
                if keep
                    && f.first() == p_first
                    && f.second() == p_second
                    && f.contains_pt(p_first.p)
                    && f.contains_pt(p_second.p)
                    && !(p_first == edge_first && p_second == edge_second)
                {
                    keep = false;
                }
                if keep && f.first() == f.second() {
                    keep = false;
                }
                keep
            });

            if funnels.is_empty() {
                trace!("{point} lost sight of {edge} at edge {ix}");
                return Ok(None);
            }
        }

        assert_eq!(funnels.len(), 1, "exactly one visibility funnel survives the sweep");
        Ok(Some((funnels[0].first(), funnels[0].second())))
    }

    /// O(n): Whether the open segment between the two points stays inside
    /// the polygon, i.e. crosses no polygon edge properly.
    #[must_use]
    pub fn point_sees_other_point(&self, point: Pt, other: Pt) -> bool {
        let line_of_sight = seg(point, other);
        self.edges().all(|e| !line_of_sight.properly_intersects(&e.seg()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::pt;

    fn pocket() -> Polygon {
        Polygon::new(vec![
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
    fn sees_across_open_space() {
        let p = pocket();
        assert!(p.point_sees_other_point(pt(1.0, 5.0), pt(3.0, 5.0)));
        assert!(p.point_sees_other_point(pt(1.0, 5.0), pt(4.0, 4.0)));
    }

    #[test]
    fn pocket_blocks_sight() {
        let p = pocket();
        // The pocket walls at x = 4 and x = 6 separate the two halves.
        assert!(!p.point_sees_other_point(pt(1.0, 5.0), pt(9.0, 5.0)));
        assert!(!p.point_sees_other_point(pt(1.0, 9.0), pt(9.0, 9.0)));
    }

    #[test]
    fn vertex_sees_incident_edge() {
        let p = pocket();
        let v = p.point(0);
        let (a, b) = p.point_sees_edge(&v, &p.edge(0)).unwrap().unwrap();
        assert_eq!(a, p.point(0));
        assert_eq!(b, p.point(1));
    }

    #[test]
    fn vertex_sees_nearby_edge() {
        let p = pocket();
        // The bottom-left corner sees the bottom of the pocket.
        let v = p.point(0);
        let seen = p.point_sees_edge(&v, &p.edge(4)).unwrap();
        assert!(seen.is_some());
    }

    #[test]
    fn pocket_hides_far_wall() {
        let p = pocket();
        // From the left chamber the right pocket wall (edge from (6,10) to
        // (6,4)) is hidden behind the left wall.
        let probe = PolyPt::free(pt(1.0, 5.0));
        let seen = p.point_sees_edge(&probe, &p.edge(3)).unwrap();
        assert!(seen.is_none());
    }

    #[test]
    fn free_point_sees_facing_edge() {
        let p = pocket();
        let probe = PolyPt::free(pt(5.0, 2.0));
        // The pocket floor is right above the probe.
        let seen = p.point_sees_edge(&probe, &p.edge(4)).unwrap();
        assert!(seen.is_some());
    }
}
