use std::collections::VecDeque;

use crate::errors::Result;
use crate::geom::math::turn;
use crate::polygon::Polygon;
use crate::primitive::point::{PolyPt, Pt};
use crate::sp::Stats;

/// Parameters of one gift-wrapping walk along the polygon boundary.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MarchParams {
    /// Vertex the march starts at.
    pub start_index: usize,
    /// Last vertex the march may visit.
    pub end_index: usize,
    /// Walking direction along the boundary, `1` or `-1`.
    pub direction: isize,
    /// Turn that lets a later vertex replace the current candidate.
    pub good_turn: i32,
}

/// Walk the polygon from `start_index` towards `end_index`, greedily
/// wrapping around the boundary until `predicate` succeeds.
///
/// Every vertex passed on the way is pushed onto `pending`; the vertex
/// satisfying the predicate is returned together with the predicate's
/// result and becomes the caller's new cusp. Candidates forming the good
/// turn replace the lookahead vertex unless `ignore` rejects them.
pub(crate) fn jarvis_march<R>(
    polygon: &Polygon,
    params: MarchParams,
    stats: &mut Stats,
    pending: &mut VecDeque<Pt>,
    mut predicate: impl FnMut(&PolyPt) -> Result<Option<R>>,
    mut ignore: impl FnMut(&PolyPt, &PolyPt) -> bool,
) -> Result<(R, PolyPt)> {
    let mut first = polygon.point(params.start_index);
    loop {
        stats.predicates += 1;
        if let Some(result) = predicate(&first)? {
            return Ok((result, first));
        }

        // Running past the end vertex means no vertex satisfied the
        // predicate, which the caller's preparation rules out.
        assert!(
            first.vertex != Some(params.end_index),
            "jarvis march exhausted its vertex range"
        );

        let first_ix = first.vertex.expect("jarvis march walks polygon vertices");
        let mut second = polygon.point(polygon.offset(first_ix, params.direction));

        if second.vertex != Some(params.end_index) {
            let second_ix = second.vertex.expect("polygon vertices carry their index");
            let scan_start = polygon.offset(second_ix, params.direction);
            for index in polygon.walk(scan_start, params.end_index, params.direction) {
                let point = polygon.point(index);
                stats.ignores_theo += 1;
                if turn(first.p, second.p, point.p) == params.good_turn {
                    stats.ignores += 1;
                    if !ignore(&first, &point) {
                        second = point;
                    }
                }
            }
        }

        pending.push_back(first.p);
        first = second;
    }
}
