//! Constant-workspace geodesic shortest paths.
//!
//! Asano, Mulzer, Rote, Wang: "Constant-Work-Space Algorithms for
//! Geometric Problems", JoCG 2(1), 2011.
//!
//! The engine keeps only the triple (p, q1, q2): the current cusp and the
//! two points bounding visibility from it towards t, plus the trapezoid
//! containing t for the subpolygon test.

use std::collections::VecDeque;
use std::mem;

use log::debug;

use crate::errors::Result;
use crate::geom::math::{CCW_TURN, CW_TURN, turn};
use crate::polygon::Polygon;
use crate::primitive::point::{PolyPt, Pt};
use crate::primitive::trapezoid::Trapezoid;
use crate::primitive::ray;
use crate::sp::Stats;
use crate::sp::trapezoid::{orient_boundary, shift_off_wall, towards};

/// The geodesic shortest path from `s` to `t` inside `polygon`, emitted
/// lazily from s to t. O(1) extra space, O(n²) time. The polygon must be
/// in general position and no two vertices may share an x-coordinate.
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
    Step(Box<Advance>),
    Done,
}

struct Advance {
    p: PolyPt,
    q1: PolyPt,
    q2: PolyPt,
    t_trapezoid: Trapezoid,
}

struct MakeStepResult {
    old_cusp: Option<PolyPt>,
    cusp: PolyPt,
    right: PolyPt,
    left: PolyPt,
}

/// O(n): The point where the ray from `p` through `q` first hits the
/// polygon boundary, annotated with the edge it lies on. Edges incident to
/// `p` are skipped so rounding noise near the start cannot produce bogus
/// hits; a ray that hits nothing falls back to `q` itself.
fn hit_polygon_boundary(polygon: &Polygon, p: &PolyPt, q: &PolyPt) -> PolyPt {
    let forbidden = match p.vertex {
        Some(v) => (Some(v), Some(polygon.prev(v))),
        None => (p.edge, None),
    };

    let shot = ray(p.p, q.p);
    let mut hit: Option<PolyPt> = None;
    let mut hit_dist = f64::INFINITY;

    for ix in polygon.indices() {
        if Some(ix) == forbidden.0 || Some(ix) == forbidden.1 {
            continue;
        }
        let edge = polygon.edge(ix);
        if !shot.properly_intersects(&edge.seg()) {
            continue;
        }
        if let Some(point) = shot.seg_intersection(&edge.seg()) {
            let dist = p.p.dist2(point);
            if dist < hit_dist {
                hit = Some(PolyPt::on_edge(point, ix));
                hit_dist = dist;
            }
        }
    }

    hit.unwrap_or(*q)
}

/// O(1): Where the trapezoid lies relative to the subpolygon cut off by
/// the vertices `ix1` and `ix2`: `1` in the right part, `-1` in the left
/// part, `0` when its bounding edges straddle the cut.
fn trapezoid_subpolygon_position(
    polygon: &Polygon,
    ix1: usize,
    ix2: usize,
    trapezoid: &Trapezoid,
) -> i32 {
    let (top, bot) = (trapezoid.top_edge, trapezoid.bot_edge);
    assert_ne!(ix1, ix2, "the cut needs two distinct vertices");
    debug_assert!(ix1 < polygon.len() && ix2 < polygon.len());

    if ix1 < ix2 {
        // Edges of the right part are {ix1, ..., ix2 - 1}.
        if (ix1..ix2).contains(&bot) && (ix1..ix2).contains(&top) {
            return 1;
        }
        if (bot < ix1 || bot >= ix2) && (top < ix1 || top >= ix2) {
            return -1;
        }
        0
    } else {
        // The cut wraps: edges of the right part are
        // {0, ..., ix2 - 1} ∪ {ix1, ..., n - 1}.
        if (bot < ix2 || bot >= ix1) && (top < ix2 || top >= ix1) {
            return 1;
        }
        if (ix2..ix1).contains(&bot) && (ix2..ix1).contains(&top) {
            return -1;
        }
        0
    }
}

/// O(1): Whether `t` lies inside the part of the polygon to the right of
/// the oriented cut (q1, q2), using only the trapezoid containing `t`.
///
/// Edge-resident cut endpoints first contract the vertex range to the
/// smaller subpolygon; an inconclusive answer widens the range and checks
/// again, and the remaining ambiguity is settled by x-order and finally a
/// plain orientation test.
fn in_subpolygon(
    polygon: &Polygon,
    q1: &PolyPt,
    q2: &PolyPt,
    t: Pt,
    t_trapezoid: &Trapezoid,
) -> bool {
    let mut ix1 = match q1.vertex {
        Some(v) => v,
        None => polygon.next(q1.edge.expect("cut endpoints are vertices or edge points")),
    };
    let mut ix2 = match q2.vertex {
        Some(v) => v,
        None => q2.edge.expect("cut endpoints are vertices or edge points"),
    };

    if ix1 == ix2 {
        debug_assert!(q1.is_on_edge());
        return turn(q1.p, q2.p, t) != CCW_TURN;
    }

    let small_position = trapezoid_subpolygon_position(polygon, ix1, ix2, t_trapezoid);
    if small_position == 1 {
        return true;
    }

    // Widen the range past edge-resident endpoints to see whether t is
    // clearly outside even the larger subpolygon.
    if q1.is_on_edge() {
        ix1 = polygon.prev(ix1);
    }
    if q2.is_on_edge() {
        ix2 = polygon.next(ix2);
    }
    if ix1 != ix2 {
        let big_position = trapezoid_subpolygon_position(polygon, ix1, ix2, t_trapezoid);
        if big_position == -1 && small_position == -1 {
            return false;
        }
    }

    // The trapezoid straddles the cut. Try to decide by x-order against
    // the edges carrying the cut endpoints; a plain side test against the
    // cut would be wrong here.
    let on = |q: &PolyPt, e: usize| q.is_on_edge() && q.edge == Some(e);

    if t.is_right_of(q1.p) && t.is_right_of(q2.p) {
        if on(q1, t_trapezoid.bot_edge) || on(q2, t_trapezoid.top_edge) {
            return true;
        }
        if on(q1, t_trapezoid.top_edge) || on(q2, t_trapezoid.bot_edge) {
            return false;
        }
    }
    if t.is_left_of(q1.p) && t.is_left_of(q2.p) {
        if on(q1, t_trapezoid.top_edge) || on(q2, t_trapezoid.bot_edge) {
            return true;
        }
        if on(q1, t_trapezoid.bot_edge) || on(q2, t_trapezoid.top_edge) {
            return false;
        }
    }

    turn(q1.p, q2.p, t) != CCW_TURN
}

/// O(n): Advance the triple (p, q1, q2) one step towards `t`.
fn make_step(
    polygon: &Polygon,
    p: &PolyPt,
    q1: &PolyPt,
    q2: &PolyPt,
    t: Pt,
    t_trapezoid: &Trapezoid,
) -> MakeStepResult {
    // A reflex right bound: either step around it or narrow towards it.
    if q1.is_vertex() && turn(p.p, q1.p, polygon.succ(q1).p) == CW_TURN {
        let q_prime = hit_polygon_boundary(polygon, p, q1);
        if in_subpolygon(polygon, q1, &q_prime, t, t_trapezoid) {
            return MakeStepResult {
                old_cusp: Some(*p),
                cusp: *q1,
                right: polygon.succ(q1),
                left: q_prime,
            };
        }
        return MakeStepResult { old_cusp: None, cusp: *p, right: q_prime, left: *q2 };
    }

    // Mirror rule for the left bound.
    if q2.is_vertex() && turn(p.p, q2.p, polygon.pred(q2).p) == CCW_TURN {
        let q_prime = hit_polygon_boundary(polygon, p, q2);
        if in_subpolygon(polygon, &q_prime, q2, t, t_trapezoid) {
            return MakeStepResult {
                old_cusp: Some(*p),
                cusp: *q2,
                right: q_prime,
                left: polygon.pred(q2),
            };
        }
        return MakeStepResult { old_cusp: None, cusp: *p, right: *q1, left: q_prime };
    }

    // Neither bound is reflex: the window advances along the boundary.
    let succ_q1 = polygon.succ(q1);
    if turn(p.p, q1.p, succ_q1.p) != CW_TURN && turn(p.p, q2.p, succ_q1.p) != CCW_TURN {
        // succ(q1) lies in the wedge (q1, p, q2).
        let mut q_prime = hit_polygon_boundary(polygon, p, &succ_q1);
        if q_prime != *q2 {
            if p.p.dist2(q_prime.p) >= p.p.dist2(succ_q1.p) {
                q_prime = succ_q1;
            }
            let p_anchor =
                if p.is_vertex() { *p } else { hit_polygon_boundary(polygon, &q_prime, p) };
            if in_subpolygon(polygon, &p_anchor, &q_prime, t, t_trapezoid) {
                return MakeStepResult { old_cusp: None, cusp: *p, right: *q1, left: q_prime };
            }
            return MakeStepResult { old_cusp: None, cusp: *p, right: q_prime, left: *q2 };
        }
    }

    let pred_q2 = polygon.pred(q2);
    let mut q_prime = hit_polygon_boundary(polygon, p, &pred_q2);
    if p.p.dist2(q_prime.p) >= p.p.dist2(pred_q2.p) {
        q_prime = pred_q2;
    }
    let p_anchor = if p.is_vertex() { *p } else { hit_polygon_boundary(polygon, &q_prime, p) };
    if in_subpolygon(polygon, &q_prime, &p_anchor, t, t_trapezoid) {
        return MakeStepResult { old_cusp: None, cusp: *p, right: q_prime, left: *q2 };
    }
    MakeStepResult { old_cusp: None, cusp: *p, right: *q1, left: q_prime }
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
            State::Step(adv) => self.advance(adv),
            State::Done => Ok(State::Done),
        }
    }

    fn init(&mut self) -> Result<State> {
        if self.s == self.t {
            self.pending.push_back(self.s);
            return Ok(State::Done);
        }

        let Some(s_trapezoid) = self.polygon.trapezoid(self.s)? else {
            return Ok(State::Done);
        };
        let Some(t_trapezoid) = self.polygon.trapezoid(self.t)? else {
            return Ok(State::Done);
        };

        let Some((_, s_trapezoid)) = shift_off_wall(self.polygon, self.s, &s_trapezoid)? else {
            return Ok(State::Done);
        };
        let Some((_, t_trapezoid)) = shift_off_wall(self.polygon, self.t, &t_trapezoid)? else {
            return Ok(State::Done);
        };
        debug!("ms-sp: s in {s_trapezoid}, t in {t_trapezoid}");

        if s_trapezoid == t_trapezoid {
            self.pending.push_back(self.s);
            self.pending.push_back(self.t);
            return Ok(State::Done);
        }

        // The wall towards t seeds the visibility window (q1, q2).
        let (go_left, next) = towards(self.polygon, &s_trapezoid, &t_trapezoid)?;
        let boundary = next
            .intersection(&s_trapezoid)
            .expect("neighbouring trapezoids share a wall");
        let boundary = orient_boundary(boundary, self.s, go_left);

        Ok(State::Step(Box::new(Advance {
            p: PolyPt::free(self.s),
            q1: boundary.a,
            q2: boundary.b,
            t_trapezoid,
        })))
    }

    fn advance(&mut self, mut adv: Box<Advance>) -> Result<State> {
        if self.polygon.point_sees_other_point(adv.p.p, self.t) {
            if adv.p.p == self.s {
                self.pending.push_back(self.s);
            } else {
                self.pending.push_back(adv.p.p);
            }
            self.pending.push_back(self.t);
            return Ok(State::Done);
        }

        self.stats.iterations += 1;
        let result =
            make_step(self.polygon, &adv.p, &adv.q1, &adv.q2, self.t, &adv.t_trapezoid);
        if let Some(old) = result.old_cusp {
            if old.p == self.s {
                self.pending.push_back(self.s);
            } else {
                self.pending.push_back(old.p);
            }
        }
        adv.p = result.cusp;
        adv.q1 = result.right;
        adv.q2 = result.left;
        Ok(State::Step(adv))
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

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::primitive::pt;

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
    fn shoots_rays_onto_the_boundary() {
        let p = zigzag();
        let from = PolyPt::free(pt(7.5, 4.0));
        let through = p.point(5);
        let hit = hit_polygon_boundary(&p, &from, &through);
        // Shooting from inside the right chamber through the spike tip
        // lands on the far boundary.
        assert!(hit.is_on_edge());
        assert_eq!(hit.edge, Some(0));
    }

    #[test]
    fn subpolygon_test_distinguishes_sides() {
        let p = zigzag();
        let t = pt(4.25, 5.25);
        let t_trapezoid = p.trapezoid(t).unwrap().unwrap();
        let from = PolyPt::free(pt(7.5, 4.0));
        let q1 = p.point(5);
        let q2 = hit_polygon_boundary(&p, &from, &q1);
        assert!(q2.is_on_edge());
        assert_eq!(q2.edge, Some(0));

        assert!(in_subpolygon(&p, &q1, &q2, t, &t_trapezoid));
        assert!(!in_subpolygon(&p, &q2, &q1, t, &t_trapezoid));
    }

    #[test]
    fn walks_around_the_spike() {
        let p = zigzag();
        let path = shortest_path(&p, pt(6.5, 5.0), pt(4.2, 5.5)).collect_points().unwrap();
        assert_eq!(path, vec![pt(6.5, 5.0), pt(5.0, 3.0), pt(4.2, 5.5)]);
    }

    #[test]
    fn trivial_cases() {
        let p = zigzag();
        assert_eq!(
            shortest_path(&p, pt(7.0, 4.0), pt(7.0, 4.0)).collect_points().unwrap(),
            vec![pt(7.0, 4.0)]
        );
        assert_eq!(
            shortest_path(&p, pt(-3.0, 0.0), pt(7.0, 4.0)).collect_points().unwrap(),
            Vec::<Pt>::new()
        );
    }
}
