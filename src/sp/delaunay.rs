//! Geodesic shortest paths over the constrained Delaunay dual.
//!
//! Asano, Mulzer, Wang: "Constant-Work-Space Algorithms for Shortest Paths
//! in Trees and Simple Polygons", JGAA 15(5), 2011.

use std::collections::VecDeque;
use std::mem;

use log::debug;

use crate::errors::Result;
use crate::geom::math::{CCW_TURN, CW_TURN, NO_TURN, turn};
use crate::polygon::Polygon;
use crate::primitive::funnel::{Funnel, Position};
use crate::primitive::point::{PolyPt, Pt};
use crate::primitive::segment::Edge;
use crate::primitive::triangle::Tri;
use crate::sp::Stats;
use crate::sp::march::{MarchParams, jarvis_march};

/// The geodesic shortest path from `s` to `t` inside `polygon`, emitted
/// lazily from s to t. The polygon must be in general position.
pub fn shortest_path(polygon: &Polygon, s: Pt, t: Pt) -> ShortestPath<'_> {
    ShortestPath {
        polygon,
        s,
        t,
        stats: Stats::default(),
        pending: VecDeque::new(),
        state: State::Init,
    }
}

/// Lazy path iterator: each `next` either pops an already-computed point
/// or advances the dual-tree walk far enough to produce one.
#[must_use]
pub struct ShortestPath<'a> {
    polygon: &'a Polygon,
    s: Pt,
    t: Pt,
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
    cusp: PolyPt,
    funnel: Option<Funnel>,
    current: Tri,
    previous: Tri,
    boundary: Option<Edge>,
    prev_boundary: Option<Edge>,
    start_neighbour: Tri,
    s_triangle: Tri,
    t_triangle: Tri,
}

impl<'a> ShortestPath<'a> {
    /// The per-query statistics gathered so far.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Drains the iterator into the full path, or the first error.
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
        if self.s == self.t {
            self.pending.push_back(self.s);
            return Ok(State::Done);
        }

        let Some(s_triangle) = self.polygon.locate_point_in_triangle(self.s)? else {
            return Ok(State::Done);
        };
        let Some(t_triangle) = self.polygon.locate_point_in_triangle(self.t)? else {
            return Ok(State::Done);
        };
        debug!("dt-sp: s in {s_triangle}, t in {t_triangle}");

        if s_triangle == t_triangle {
            self.pending.push_back(self.s);
            self.pending.push_back(self.t);
            return Ok(State::Done);
        }

        let start_neighbour = self
            .polygon
            .delaunay_first_neighbour(&s_triangle)?
            .expect("the dual tree of a multi-triangle polygon is connected");

        Ok(State::Walk(Box::new(Walk {
            cusp: PolyPt::free(self.s),
            funnel: None,
            current: s_triangle,
            previous: s_triangle,
            boundary: None,
            prev_boundary: None,
            start_neighbour,
            s_triangle,
            t_triangle,
        })))
    }

    fn walk(&mut self, mut w: Box<Walk>) -> Result<State> {
        if w.current == w.t_triangle {
            return Ok(State::Finish(w));
        }

        self.stats.iterations += 1;

        w.previous = w.current;
        w.current = find_feasible_subtree(
            self.polygon,
            &w.previous,
            &w.start_neighbour,
            &w.s_triangle,
            &w.t_triangle,
        )?;

        w.prev_boundary = w.boundary.take();

        // The crossed diagonal, oriented counterclockwise around the cusp.
        let mut boundary =
            w.current.common_edge(&w.previous).expect("adjacent triangles share an edge");
        match turn(w.cusp.p, boundary.a.p, boundary.b.p) {
            CW_TURN => boundary = boundary.reversed(),
            NO_TURN => {
                // The diagonal is aligned with the cusp; judge its
                // orientation from the third vertex of the previous
                // triangle instead.
                let third = w
                    .previous
                    .pts()
                    .into_iter()
                    .find(|p| *p != boundary.a && *p != boundary.b)
                    .expect("a triangle has a vertex besides its diagonal");
                if turn(third.p, boundary.a.p, boundary.b.p) == CW_TURN {
                    boundary = boundary.reversed();
                }
            }
            _ => {}
        }

        if w.funnel.is_none() {
            w.funnel = Some(Funnel::new(w.cusp, boundary.a, boundary.b));
        }
        let funnel = w.funnel.as_mut().expect("funnel was just ensured");

        let position_of_a = funnel.position_of(boundary.a.p);
        let position_of_b = funnel.position_of(boundary.b.p);
        let both_right = position_of_a == Position::RightOf && position_of_b == Position::RightOf;
        let both_left = position_of_a == Position::LeftOf && position_of_b == Position::LeftOf;

        if both_right || both_left {
            // The cusp lost sight of the boundary; it is a path vertex now
            // and a Jarvis march finds its successor.
            self.pending.push_back(w.cusp.p);
            self.stats.jarvis_marches += 1;
            debug!("dt-sp: cusp {} lost visibility, marching", w.cusp);

            let params = prepare_jarvis_march(self.polygon, funnel, both_right, &boundary);

            let good_position = if both_right { Position::RightOf } else { Position::LeftOf };
            let ignore_boundary = w.prev_boundary.unwrap_or(boundary);
            let funnel_snapshot = funnel.clone();
            let ignore = |_first: &PolyPt, p: &PolyPt| {
                turn(ignore_boundary.a.p, ignore_boundary.b.p, p.p) == CW_TURN
                    || funnel_snapshot.position_of(p.p) != good_position
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
            // that endpoint one vertex in the walking direction.
            if v1 == cusp {
                let cusp_ix = cusp.vertex.expect("the march stops at a polygon vertex");
                if params.direction == 1 {
                    v1 = self.polygon.point(cusp_ix + 1);
                } else {
                    v1 = self.polygon.point(self.polygon.prev(cusp_ix));
                    mem::swap(&mut v1, &mut v2);
                }
            }

            funnel.set_cusp(cusp);
            funnel.set_first(v1);
            funnel.set_second(v2);
            w.cusp = cusp;
        } else {
            // The boundary stays visible and can only narrow the funnel.
            if position_of_a == Position::Inside {
                funnel.set_first(boundary.a);
            }
            if position_of_b == Position::Inside {
                funnel.set_second(boundary.b);
            }
        }

        w.boundary = Some(boundary);
        w.start_neighbour = self
            .polygon
            .delaunay_next_neighbour(&w.current, &w.previous)?
            .expect("the dual walk continues past every crossed diagonal");

        Ok(State::Walk(w))
    }

    fn finish(&mut self, w: Box<Walk>) -> Result<State> {
        self.pending.push_back(w.cusp.p);

        if !self.polygon.point_sees_other_point(w.cusp.p, self.t) {
            self.stats.jarvis_marches += 1;
            let funnel = w.funnel.as_ref().expect("walking to another triangle built a funnel");
            let position_of_t = funnel.position_of(self.t);
            let boundary =
                w.current.common_edge(&w.previous).expect("adjacent triangles share an edge");
            let params = prepare_jarvis_march(
                self.polygon,
                funnel,
                position_of_t == Position::RightOf,
                &boundary,
            );

            let ignore_boundary =
                w.boundary.expect("walking to another triangle crossed a diagonal");
            let ignore = |_first: &PolyPt, p: &PolyPt| {
                turn(ignore_boundary.a.p, ignore_boundary.b.p, p.p) == CW_TURN
                    || funnel.position_of(p.p) != position_of_t
            };

            let t = self.t;
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

        self.pending.push_back(self.t);
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

/// Jarvis-march parameters for a funnel that lost sight of `boundary`: the
/// march runs counterclockwise from the right funnel point when the
/// boundary moved right, clockwise from the left funnel point otherwise,
/// and ends at the boundary endpoint nearer to the start in vertex
/// distance.
fn prepare_jarvis_march(
    polygon: &Polygon,
    funnel: &Funnel,
    right_of: bool,
    boundary: &Edge,
) -> MarchParams {
    let n = polygon.len();
    let a_ix = boundary.a.vertex.expect("delaunay diagonals connect polygon vertices");
    let b_ix = boundary.b.vertex.expect("delaunay diagonals connect polygon vertices");

    if right_of {
        let start_index = funnel.first().vertex.expect("funnel endpoints are polygon vertices");
        let end_index =
            if (a_ix + n - start_index) % n < (b_ix + n - start_index) % n { a_ix } else { b_ix };
        MarchParams { start_index, end_index, direction: 1, good_turn: CCW_TURN }
    } else {
        let start_index = funnel.second().vertex.expect("funnel endpoints are polygon vertices");
        let end_index =
            if (start_index + n - a_ix) % n < (start_index + n - b_ix) % n { a_ix } else { b_ix };
        MarchParams { start_index, end_index, direction: -1, good_turn: CW_TURN }
    }
}

/// Advance one step of the Eulerian tour through the subtree rooted at `v`.
fn advance_tour(
    polygon: &Polygon,
    u: &Tri,
    v: &Tri,
    tour_at: &Tri,
    tour_next: &Tri,
    t: &Tri,
) -> Result<(bool, bool, Tri, Tri)> {
    let next = polygon
        .delaunay_next_neighbour(tour_next, tour_at)?
        .expect("the Eulerian tour bounces back at leaves");
    let at = *tour_next;

    if at == *v && next == *u {
        // The tour returned to the subtree root: subtree exhausted.
        return Ok((false, false, at, next));
    }
    if next == *t {
        return Ok((true, false, at, next));
    }
    Ok((false, true, at, next))
}

/// The child of `u` whose subtree contains `t`, found by advancing two
/// Eulerian tours in parallel so the total work stays proportional to the
/// smaller explored subtree.
fn find_feasible_subtree(
    polygon: &Polygon,
    u: &Tri,
    v: &Tri,
    s: &Tri,
    t: &Tri,
) -> Result<Tri> {
    let mut f_neighbour = *v;
    let mut s_neighbour = polygon
        .delaunay_next_neighbour(u, v)?
        .expect("an inner dual node has a further neighbour");
    let mut last_neighbour = s_neighbour;
    let mut remaining = polygon.delaunay_neighbour_number(u) - usize::from(u != s);

    if remaining == 1 || f_neighbour == *t {
        return Ok(f_neighbour);
    }
    if s_neighbour == *t {
        return Ok(s_neighbour);
    }

    let mut one_at = *u;
    let mut one_next = f_neighbour;
    let mut two_at = *u;
    let mut two_next = s_neighbour;

    loop {
        let (found1, continues1, at, next) =
            advance_tour(polygon, u, &f_neighbour, &one_at, &one_next, t)?;
        one_at = at;
        one_next = next;
        let (found2, continues2, at, next) =
            advance_tour(polygon, u, &s_neighbour, &two_at, &two_next, t)?;
        two_at = at;
        two_next = next;

        if found1 {
            return Ok(f_neighbour);
        }
        if found2 {
            return Ok(s_neighbour);
        }

        if !continues1 {
            f_neighbour = polygon
                .delaunay_next_neighbour(u, &last_neighbour)?
                .expect("an unexplored sibling subtree remains");
            one_next = f_neighbour;
            last_neighbour = f_neighbour;
            one_at = *u;
            remaining -= 1;

            if remaining == 1 {
                return Ok(s_neighbour);
            }
            if f_neighbour == *t {
                return Ok(f_neighbour);
            }
        }
        if !continues2 {
            s_neighbour = polygon
                .delaunay_next_neighbour(u, &last_neighbour)?
                .expect("an unexplored sibling subtree remains");
            two_next = s_neighbour;
            last_neighbour = s_neighbour;
            two_at = *u;
            remaining -= 1;

            if remaining == 1 {
                return Ok(f_neighbour);
            }
            if s_neighbour == *t {
                return Ok(s_neighbour);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::primitive::pt;

    fn path(polygon: &Polygon, s: Pt, t: Pt) -> Vec<Pt> {
        shortest_path(polygon, s, t).collect_points().unwrap()
    }

    #[test]
    fn convex_triangle_is_a_straight_line() {
        let p = Polygon::new(vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(0.0, 10.0)]).unwrap();
        assert_eq!(path(&p, pt(1.0, 1.0), pt(2.0, 3.0)), vec![pt(1.0, 1.0), pt(2.0, 3.0)]);
    }

    #[test]
    fn l_shape_bends_once() {
        let p = Polygon::new(vec![
            pt(0.0, 0.0),
            pt(6.0, 0.0),
            pt(6.0, 2.0),
            pt(2.0, 2.0),
            pt(2.0, 6.0),
            pt(0.0, 6.0),
        ])
        .unwrap();
        assert_eq!(
            path(&p, pt(1.0, 5.0), pt(5.0, 1.0)),
            vec![pt(1.0, 5.0), pt(2.0, 2.0), pt(5.0, 1.0)]
        );
    }

    #[test]
    fn stats_are_available_after_consumption() {
        let p = Polygon::new(vec![
            pt(0.0, 0.0),
            pt(6.0, 0.0),
            pt(6.0, 2.0),
            pt(2.0, 2.0),
            pt(2.0, 6.0),
            pt(0.0, 6.0),
        ])
        .unwrap();
        let mut sp = shortest_path(&p, pt(1.0, 5.0), pt(5.0, 1.0));
        let points: Vec<_> = sp.by_ref().map(Result::unwrap).collect();
        assert_eq!(points.len(), 3);
        assert!(sp.stats().iterations > 0);
        assert!(sp.stats().jarvis_marches >= 1);
    }
}
