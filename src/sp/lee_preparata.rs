//! Geodesic shortest paths over a precomputed triangulation.
//!
//! Lee, Preparata: "Euclidean Shortest Paths in the Presence of
//! Rectilinear Barriers", Networks 14(3), 1984.

use std::collections::VecDeque;
use std::mem;

use log::debug;

use crate::errors::Result;
use crate::geom::math::{CCW_TURN, CW_TURN, turn};
use crate::polygon::TriangulatedPolygon;
use crate::primitive::point::{PolyPt, Pt};
use crate::primitive::segment::Edge;
use crate::sp::Stats;

/// The geodesic shortest path from `s` to `t` inside the triangulated
/// polygon, emitted lazily from s to t. O(n) given the triangulation.
pub fn shortest_path(polygon: &TriangulatedPolygon, s: Pt, t: Pt) -> ShortestPath<'_> {
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
    polygon: &'a TriangulatedPolygon,
    s: Pt,
    t: Pt,
    stats: Stats,
    pending: VecDeque<Pt>,
    state: State,
}

enum State {
    Init,
    Walk(Box<Walk>),
    Drain(Box<Walk>),
    Done,
}

struct Walk {
    diagonals: Vec<Edge>,
    next_diagonal: usize,
    funnel: VecDeque<PolyPt>,
    cusp: PolyPt,
}

/// The diagonals crossed on the unique dual-tree path between the two
/// triangles, in crossing order. Iterative depth-first search over the
/// precomputed adjacency lists.
fn crossed_diagonals(
    polygon: &TriangulatedPolygon,
    s_triangle: usize,
    t_triangle: usize,
) -> Vec<Edge> {
    let mut seen = vec![false; polygon.triangles().len()];
    seen[s_triangle] = true;
    let mut stack = vec![s_triangle];
    let mut edges: Vec<Edge> = Vec::new();

    while *stack.last().expect("the dual tree connects the two triangles") != t_triangle {
        let current = *stack.last().expect("stack checked above");
        let mut advanced = false;
        for &neighbour in polygon.neighbours(current) {
            if seen[neighbour] {
                continue;
            }
            seen[neighbour] = true;
            stack.push(neighbour);
            edges.push(
                polygon.triangles()[current]
                    .common_edge(&polygon.triangles()[neighbour])
                    .expect("dual neighbours share a diagonal"),
            );
            advanced = true;
            break;
        }
        if !advanced {
            stack.pop();
            edges.pop();
        }
    }

    edges
}

impl<'a> ShortestPath<'a> {
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn collect_points(self) -> Result<Vec<Pt>> {
        self.collect()
    }

    fn step(&mut self, state: State) -> State {
        match state {
            State::Init => self.init(),
            State::Walk(walk) => self.walk(walk),
            State::Drain(walk) => self.drain(walk),
            State::Done => State::Done,
        }
    }

    fn init(&mut self) -> State {
        if self.s == self.t {
            self.pending.push_back(self.s);
            return State::Done;
        }

        let Some(s_triangle) = self.polygon.locate(self.s) else {
            return State::Done;
        };
        let Some(t_triangle) = self.polygon.locate(self.t) else {
            return State::Done;
        };
        debug!("lp-sp: s in triangle {s_triangle}, t in triangle {t_triangle}");

        if s_triangle == t_triangle {
            self.pending.push_back(self.s);
            self.pending.push_back(self.t);
            return State::Done;
        }

        let mut diagonals = crossed_diagonals(self.polygon, s_triangle, t_triangle);
        // A final pseudo-diagonal through t makes sure the walk ultimately
        // reaches it.
        let last = *diagonals.last().expect("distinct triangles cross at least one diagonal");
        diagonals.push(Edge::new(last.a, PolyPt::free(self.t)));

        let cusp = PolyPt::free(self.s);
        let mut funnel = VecDeque::from([diagonals[0].a, cusp, diagonals[0].b]);
        if turn(self.s, diagonals[0].a.p, diagonals[0].b.p) == CCW_TURN {
            funnel.make_contiguous().reverse();
        }

        State::Walk(Box::new(Walk { diagonals, next_diagonal: 1, funnel, cusp }))
    }

    fn walk(&mut self, mut w: Box<Walk>) -> State {
        if w.next_diagonal >= w.diagonals.len() {
            return State::Drain(w);
        }
        let diagonal = w.diagonals[w.next_diagonal];
        w.next_diagonal += 1;
        self.stats.iterations += 1;

        let (mut left, mut right) = (diagonal.a, diagonal.b);

        // Each new diagonal shares exactly one endpoint with the funnel;
        // swap the labels when they point the wrong way.
        let back = *w.funnel.back().expect("the funnel is never empty");
        if w.funnel[0] == right || back == left {
            mem::swap(&mut left, &mut right);
        }

        if left == w.funnel[0] {
            // The new vertex enters on the right: drop funnel vertices that
            // no longer bend away from it.
            while *w.funnel.back().expect("funnel non-empty") != w.cusp
                && turn(
                    w.funnel[w.funnel.len() - 2].p,
                    w.funnel[w.funnel.len() - 1].p,
                    right.p,
                ) == CCW_TURN
            {
                w.funnel.pop_back();
            }
            if *w.funnel.back().expect("funnel non-empty") == w.cusp {
                // The whole right side went; vertices now popped from the
                // left side become path vertices, and the first survivor is
                // the new cusp.
                while w.funnel.len() > 1
                    && turn(
                        w.funnel[w.funnel.len() - 1].p,
                        w.funnel[w.funnel.len() - 2].p,
                        right.p,
                    ) == CCW_TURN
                {
                    let passed = w.funnel.pop_back().expect("funnel non-empty");
                    self.pending.push_back(passed.p);
                }
                w.cusp = *w.funnel.back().expect("funnel non-empty");
            }
            w.funnel.push_back(right);
        } else {
            // Mirror image of the right-hand case.
            while w.funnel[0] != w.cusp
                && turn(w.funnel[1].p, w.funnel[0].p, left.p) == CW_TURN
            {
                w.funnel.pop_front();
            }
            if w.funnel[0] == w.cusp {
                while w.funnel.len() > 1
                    && turn(w.funnel[0].p, w.funnel[1].p, left.p) == CW_TURN
                {
                    let passed = w.funnel.pop_front().expect("funnel non-empty");
                    self.pending.push_back(passed.p);
                }
                w.cusp = w.funnel[0];
            }
            w.funnel.push_front(left);
        }

        State::Walk(w)
    }

    fn drain(&mut self, mut w: Box<Walk>) -> State {
        // Emit the funnel side that ends in t, cusp first.
        let t = PolyPt::free(self.t);
        if w.funnel[0] == t {
            while *w.funnel.back().expect("funnel non-empty") != w.cusp {
                w.funnel.pop_back();
            }
            while let Some(p) = w.funnel.pop_back() {
                self.pending.push_back(p.p);
            }
        } else if *w.funnel.back().expect("funnel non-empty") == t {
            while w.funnel[0] != w.cusp {
                w.funnel.pop_front();
            }
            while let Some(p) = w.funnel.pop_front() {
                self.pending.push_back(p.p);
            }
        } else {
            self.pending.push_back(w.cusp.p);
            self.pending.push_back(self.t);
        }
        State::Done
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
            self.state = self.step(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::primitive::pt;

    fn path(polygon: &TriangulatedPolygon, s: Pt, t: Pt) -> Vec<Pt> {
        shortest_path(polygon, s, t).collect_points().unwrap()
    }

    #[test]
    fn l_shape_bends_once() {
        let p = TriangulatedPolygon::new(vec![
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
    fn pocket_bends_twice() {
        let p = TriangulatedPolygon::new(vec![
            pt(0.0, 0.0),
            pt(10.0, 0.0),
            pt(10.0, 10.0),
            pt(6.0, 10.0),
            pt(6.0, 4.0),
            pt(4.0, 4.0),
            pt(4.0, 10.0),
            pt(0.0, 10.0),
        ])
        .unwrap();
        assert_eq!(
            path(&p, pt(1.0, 5.0), pt(9.0, 5.0)),
            vec![pt(1.0, 5.0), pt(4.0, 4.0), pt(6.0, 4.0), pt(9.0, 5.0)]
        );
    }

    #[test]
    fn crossed_diagonals_form_a_chain() {
        let p = TriangulatedPolygon::new(vec![
            pt(0.0, 0.0),
            pt(10.0, 0.0),
            pt(10.0, 10.0),
            pt(6.0, 10.0),
            pt(6.0, 4.0),
            pt(4.0, 4.0),
            pt(4.0, 10.0),
            pt(0.0, 10.0),
        ])
        .unwrap();
        let s = p.locate(pt(1.0, 5.0)).unwrap();
        let t = p.locate(pt(9.0, 5.0)).unwrap();
        let diagonals = crossed_diagonals(&p, s, t);
        // Every pair of consecutive diagonals shares a vertex.
        for pair in diagonals.windows(2) {
            let shared = [pair[1].a, pair[1].b];
            assert!(shared.contains(&pair[0].a) || shared.contains(&pair[0].b));
        }
    }
}
