//! The four geodesic shortest-path engines.
//!
//! Every engine exposes a `shortest_path` function returning a lazy
//! iterator over the path points from s to t (s first, t last). A query
//! with s or t outside the polygon yields an empty sequence; precondition
//! violations surface as errors through the iterator.

use serde::{Deserialize, Serialize};

pub mod delaunay;
pub mod lee_preparata;
pub mod makestep;
pub mod trapezoid;

mod march;

/// Per-query statistics, available once the path iterator is consumed.
/// All counters live in the iterator itself, so queries running in
/// parallel on a shared polygon never interfere.
#[must_use]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Main-loop iterations (cell steps).
    pub iterations: u64,
    /// Number of Jarvis marches started.
    pub jarvis_marches: u64,
    /// Predicate evaluations inside Jarvis marches.
    pub predicates: u64,
    /// Candidates skipped by the ignore filter.
    pub ignores: u64,
    /// Candidates the ignore filter looked at.
    pub ignores_theo: u64,
}
