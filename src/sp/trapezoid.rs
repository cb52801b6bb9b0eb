//! Geodesic shortest paths over the vertical trapezoid decomposition.
//!
//! Asano, Mulzer, Wang: "Constant-Work-Space Algorithms for Shortest Paths
//! in Trees and Simple Polygons", JGAA 15(5), 2011.

use std::collections::VecDeque;
use std::mem;

use log::debug;

use crate::errors::Result;
use crate::geom::math::{CCW_TURN, CW_TURN, NO_TURN, eq, turn};
use crate::polygon::{LEFT, Polygon, RIGHT};
use crate::primitive::funnel::{Funnel, Position};
use crate::primitive::point::{PolyPt, Pt};
use crate::primitive::segment::Edge;
use crate::primitive::trapezoid::Trapezoid;
use crate::primitive::pt;
use crate::sp::Stats;
use crate::sp::march::{MarchParams, jarvis_march};

/// Largest perturbation applied to a query point resting exactly on a
/// trapezoid wall.
const SHIFT: f64 = 2e-5;

/// The geodesic shortest path from `s` to `t` inside `polygon`, emitted
/// lazily from s to t. Constant extra space, O(n²) time. The polygon must
/// be in general position and no two vertices may share an x-coordinate.
pub fn shortest_path(polygon: &Polygon, s: Pt, t: Pt) -> ShortestPath<'_> {
    ShortestPath {
        polygon,
        original_s: s,
        original_t: t,
        stats: Stats::default(),
        pending: VecDeque::new(),
        state: State::Init,
    }
}

#[must_use]
pub struct ShortestPath<'a> {
    polygon: &'a Polygon,
    original_s: Pt,
    original_t: Pt,
    stats: Stats,
    pending: VecDeque<Pt>,
    state: State,
}

enum State {
    Init,
    Walk(Box<Walk>),
    Finish(Box<Walk>),
    Done,
}

struct Walk {
    s: Pt,
    t: Pt,
    cusp: PolyPt,
    funnel: Option<Funnel>,
    current: Trapezoid,
    previous: Option<Trapezoid>,
    boundary: Option<Edge>,
    prev_boundary: Option<Edge>,
    t_trapezoid: Trapezoid,
}

/// Nudge a point resting on a vertical trapezoid wall into the interior
/// and relocate it.
pub(crate) fn shift_off_wall(
    polygon: &Polygon,
    p: Pt,
    trapezoid: &Trapezoid,
) -> Result<Option<(Pt, Trapezoid)>> {
    if !eq(p.x, trapezoid.x_left) && !eq(p.x, trapezoid.x_right) {
        return Ok(Some((p, *trapezoid)));
    }
    let shift = (trapezoid.x_right - trapezoid.x_left).min(SHIFT) / 2.0;
    let shifted = if eq(p.x, trapezoid.x_left) {
        pt(p.x + shift, p.y)
    } else {
        pt(p.x - shift, p.y)
    };
    Ok(polygon.trapezoid(shifted)?.map(|t| (shifted, t)))
}

/// Choose the neighbour of `current` on the way towards `target`.
pub(crate) fn towards(
    polygon: &Polygon,
    current: &Trapezoid,
    target: &Trapezoid,
) -> Result<(bool, Trapezoid)> {
    let go_left = target.is_left_of(current);
    let neighbours =
        polygon.neighbour_trapezoids(current, if go_left { LEFT } else { RIGHT })?;

    // With pairwise distinct x-coordinates a trapezoid side has at most two
    // neighbours, and walking towards the target there is at least one.
    assert!(
        neighbours.len() == 1 || neighbours.len() == 2,
        "a trapezoid wall borders one or two neighbours"
    );

    let next = if neighbours.len() == 1
        || (go_left && target.is_left_of(&neighbours[0]))
        || (!go_left && target.is_right_of(&neighbours[0]))
    {
        neighbours[0]
    } else {
        neighbours[1]
    };
    Ok((go_left, next))
}

/// Orient the wall between two trapezoids counterclockwise around `cusp`.
/// A wall collinear with the cusp runs top to bottom and needs reversing
/// exactly when the walk went right.
pub(crate) fn orient_boundary(mut boundary: Edge, cusp: Pt, go_left: bool) -> Edge {
    match turn(cusp, boundary.a.p, boundary.b.p) {
        CW_TURN => boundary = boundary.reversed(),
        NO_TURN => {
            if !go_left {
                boundary = boundary.reversed();
            }
        }
        _ => {}
    }
    boundary
}

impl<'a> ShortestPath<'a> {
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn collect_points(self) -> Result<Vec<Pt>> {
        self.collect()
    }

    fn step(&mut self, state: State) -> Result<State> {
        match state {
            State::Init => self.init(),
            State::Walk(walk) => self.walk(walk),
            State::Finish(walk) => self.finish(walk),
            State::Done => Ok(State::Done),
        }
    }

    fn init(&mut self) -> Result<State> {
        if self.original_s == self.original_t {
            self.pending.push_back(self.original_s);
            return Ok(State::Done);
        }

        let Some(s_trapezoid) = self.polygon.trapezoid(self.original_s)? else {
            return Ok(State::Done);
        };
        let Some(t_trapezoid) = self.polygon.trapezoid(self.original_t)? else {
            return Ok(State::Done);
        };

        // Points resting on a trapezoid wall are nudged inward; the
        // original coordinates are still the ones emitted.
        let Some((s, s_trapezoid)) = shift_off_wall(self.polygon, self.original_s, &s_trapezoid)?
        else {
            return Ok(State::Done);
        };
        let Some((t, t_trapezoid)) = shift_off_wall(self.polygon, self.original_t, &t_trapezoid)?
        else {
            return Ok(State::Done);
        };
        debug!("tr-sp: s in {s_trapezoid}, t in {t_trapezoid}");

        if s_trapezoid == t_trapezoid {
            self.pending.push_back(self.original_s);
            self.pending.push_back(self.original_t);
            return Ok(State::Done);
        }

        Ok(State::Walk(Box::new(Walk {
            s,
            t,
            cusp: PolyPt::free(s),
            funnel: None,
            current: s_trapezoid,
            previous: None,
            boundary: None,
            prev_boundary: None,
            t_trapezoid,
        })))
    }

    fn walk(&mut self, mut w: Box<Walk>) -> Result<State> {
        if w.current == w.t_trapezoid {
            return Ok(State::Finish(w));
        }

        self.stats.iterations += 1;

        let (go_left, next) = towards(self.polygon, &w.current, &w.t_trapezoid)?;
        let previous = w.current;
        w.previous = Some(previous);
        w.current = next;

        w.prev_boundary = w.boundary.take();
        let boundary = w
            .current
            .intersection(&previous)
            .expect("neighbouring trapezoids share a wall");
        let boundary = orient_boundary(boundary, w.cusp.p, go_left);

        // The first crossed wall only starts the funnel.
        if w.funnel.is_none() {
            w.funnel = Some(Funnel::new(w.cusp, boundary.a, boundary.b));
            w.boundary = Some(boundary);
            return Ok(State::Walk(w));
        }
        let funnel = w.funnel.as_mut().expect("funnel was just ensured");

        let position_of_a = funnel.position_of(boundary.a.p);
        let position_of_b = funnel.position_of(boundary.b.p);
        let both_right = position_of_a == Position::RightOf && position_of_b == Position::RightOf;
        let both_left = position_of_a == Position::LeftOf && position_of_b == Position::LeftOf;

        if both_right || both_left {
            // The cusp lost sight of the wall. Emit it (the original s if
            // the cusp still is the possibly shifted start) and march to
            // the next one.
            if w.cusp == PolyPt::free(w.s) {
                self.pending.push_back(self.original_s);
            } else {
                self.pending.push_back(w.cusp.p);
            }
            self.stats.jarvis_marches += 1;
            debug!("tr-sp: cusp {} lost visibility, marching", w.cusp);

            let params = prepare_jarvis_march(
                self.polygon,
                funnel,
                &w.current,
                both_right,
                go_left,
                Some(&boundary),
            );

            let good_position = if both_right { Position::RightOf } else { Position::LeftOf };
            let x_bound = w.prev_boundary.map_or(boundary.a.p, |pb| pb.a.p);
            let cusp_x = w.cusp.p.x;
            let funnel_snapshot = funnel.clone();
            let ignore = |_first: &PolyPt, second: &PolyPt| {
                second.p.x > cusp_x.max(x_bound.x)
                    || second.p.x < cusp_x.min(x_bound.x)
                    || funnel_snapshot.position_of(second.p) != good_position
            };

            let polygon = self.polygon;
            let ((mut v1, mut v2), cusp) = jarvis_march(
                polygon,
                params,
                &mut self.stats,
                &mut self.pending,
                |p| polygon.point_sees_edge(p, &boundary),
                ignore,
            )?;

            // When the new cusp coincides with a funnel endpoint, advance
            // the endpoint one vertex in the rotation sense given by the
            // trapezoid corner it sits in.
            if v1 == cusp {
                if let Some(vix) = v1.vertex {
                    if Some(vix) == w.current.top_right || Some(vix) == w.current.bot_left {
                        v1 = self.polygon.point(vix + 1);
                    } else if Some(vix) == w.current.bot_right || Some(vix) == w.current.top_left {
                        v1 = self.polygon.point(self.polygon.prev(vix));
                    }
                }
                if turn(cusp.p, v1.p, v2.p) == CW_TURN {
                    mem::swap(&mut v1, &mut v2);
                }
            }

            // Funnel points resting on an edge incident to the cusp are
            // snapped to the edge endpoint in the rotation direction, to
            // keep floating point noise out of later turn tests.
            if let (Some(cix), None, Some(eix)) = (cusp.vertex, v1.vertex, v1.edge) {
                if eix == cix || eix == self.polygon.prev(cix) {
                    v1 = self.polygon.point(eix + 1);
                }
            }
            if let (Some(cix), None, Some(eix)) = (cusp.vertex, v2.vertex, v2.edge) {
                if eix == cix || eix == self.polygon.prev(cix) {
                    v2 = self.polygon.point(eix);
                }
            }

            funnel.set_cusp(cusp);
            funnel.set_first(v1);
            funnel.set_second(v2);
            w.cusp = cusp;
        } else {
            // The wall stays visible; vertex endpoints narrow the funnel.
            if funnel.contains_pt(boundary.a.p) && boundary.a.is_vertex() {
                funnel.set_first(boundary.a);
            }
            if funnel.contains_pt(boundary.b.p) && boundary.b.is_vertex() {
                funnel.set_second(boundary.b);
            }
        }

        w.boundary = Some(boundary);
        Ok(State::Walk(w))
    }

    fn finish(&mut self, w: Box<Walk>) -> Result<State> {
        if w.cusp == PolyPt::free(w.s) {
            self.pending.push_back(self.original_s);
        } else {
            self.pending.push_back(w.cusp.p);
        }

        if !self.polygon.point_sees_other_point(w.cusp.p, w.t) {
            let previous = w.previous.expect("reaching another trapezoid crossed a wall");
            let go_left = previous.is_right_of(&w.current);

            self.stats.jarvis_marches += 1;
            let funnel = w.funnel.as_ref().expect("walking to another trapezoid built a funnel");
            let position_of_t = funnel.position_of(w.t);
            let params = prepare_jarvis_march(
                self.polygon,
                funnel,
                &w.current,
                position_of_t == Position::RightOf,
                go_left,
                None,
            );

            let boundary = w.boundary.expect("walking to another trapezoid crossed a wall");
            let cusp_x = w.cusp.p.x;
            let ignore = |_first: &PolyPt, second: &PolyPt| {
                second.p.x > cusp_x.max(boundary.a.p.x)
                    || second.p.x < cusp_x.min(boundary.a.p.x)
                    || funnel.position_of(second.p) != position_of_t
            };

            let t = w.t;
            let polygon = self.polygon;
            let (_, cusp) = jarvis_march(
                polygon,
                params,
                &mut self.stats,
                &mut self.pending,
                |p| Ok(polygon.point_sees_other_point(p.p, t).then_some(())),
                ignore,
            )?;
            self.pending.push_back(cusp.p);
        }

        self.pending.push_back(self.original_t);
        Ok(State::Done)
    }
}

impl Iterator for ShortestPath<'_> {
    type Item = Result<Pt>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(p) = self.pending.pop_front() {
                return Some(Ok(p));
            }
            if matches!(self.state, State::Done) {
                return None;
            }
            let state = mem::replace(&mut self.state, State::Done);
            match self.step(state) {
                Ok(next) => self.state = next,
                Err(e) => {
                    self.pending.clear();
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Jarvis-march parameters over a trapezoid wall. When the wall endpoint
/// the march runs towards is not a polygon vertex, the march ends at the
/// last vertex of the polygon edge bounding the current trapezoid on the
/// relevant side.
fn prepare_jarvis_march(
    polygon: &Polygon,
    funnel: &Funnel,
    trapezoid: &Trapezoid,
    right_of: bool,
    went_left: bool,
    boundary: Option<&Edge>,
) -> MarchParams {
    if right_of {
        let start_index = funnel.first().vertex.expect("funnel endpoints are polygon vertices");
        let end_index = match boundary.and_then(|b| b.a.vertex) {
            Some(ix) => ix,
            None => {
                if went_left {
                    trapezoid.top_edge
                } else {
                    trapezoid.bot_edge
                }
            }
        };
        MarchParams { start_index, end_index, direction: 1, good_turn: CCW_TURN }
    } else {
        let start_index = funnel.second().vertex.expect("funnel endpoints are polygon vertices");
        let end_index = match boundary.and_then(|b| b.b.vertex) {
            Some(ix) => ix,
            None => {
                let base = if went_left { trapezoid.bot_edge } else { trapezoid.top_edge };
                polygon.next(base)
            }
        };
        MarchParams { start_index, end_index, direction: -1, good_turn: CW_TURN }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // Concave polygon with pairwise distinct x-coordinates.
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

    fn path(polygon: &Polygon, s: Pt, t: Pt) -> Vec<Pt> {
        shortest_path(polygon, s, t).collect_points().unwrap()
    }

    #[test]
    fn same_trapezoid_is_a_straight_line() {
        let p = zigzag();
        assert_eq!(path(&p, pt(7.0, 4.0), pt(7.5, 5.0)), vec![pt(7.0, 4.0), pt(7.5, 5.0)]);
    }

    #[test]
    fn identical_endpoints_collapse() {
        let p = zigzag();
        assert_eq!(path(&p, pt(7.0, 4.0), pt(7.0, 4.0)), vec![pt(7.0, 4.0)]);
    }

    #[test]
    fn outside_points_produce_nothing() {
        let p = zigzag();
        assert_eq!(path(&p, pt(-3.0, 0.0), pt(7.0, 4.0)), Vec::<Pt>::new());
        assert_eq!(path(&p, pt(7.0, 4.0), pt(20.0, 0.0)), Vec::<Pt>::new());
    }

    #[test]
    fn bends_around_a_reflex_vertex() {
        let p = zigzag();
        // The spike rising to (5,3) separates the two query points; the
        // geodesic turns at its tip.
        assert_eq!(
            path(&p, pt(6.5, 5.0), pt(4.2, 5.5)),
            vec![pt(6.5, 5.0), pt(5.0, 3.0), pt(4.2, 5.5)]
        );
    }
}
