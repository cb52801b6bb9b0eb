//! Geodesic shortest paths inside simple polygons.
//!
//! Given a simple polygon in counterclockwise order and two points in its
//! closure, the engines in [`sp`] compute the Euclidean shortest polygonal
//! chain between the points that stays inside the polygon. The chain bends
//! only at polygon vertices and is emitted lazily from s to t.
//!
//! Four engines share the geometric primitives in [`primitive`] and the
//! polygon queries in [`polygon`]:
//!
//! - [`sp::delaunay`] walks the dual tree of the constrained Delaunay
//!   triangulation with a visibility funnel,
//! - [`sp::lee_preparata`] runs the classic deque funnel over a
//!   precomputed triangulation,
//! - [`sp::trapezoid`] walks the vertical trapezoid decomposition,
//! - [`sp::makestep`] advances a constant-workspace triple (p, q1, q2).
//!
//! ```
//! use polypath::primitive::pt;
//! use polypath::polygon::Polygon;
//! use polypath::sp;
//!
//! let polygon = Polygon::new(vec![
//!     pt(0.0, 0.0),
//!     pt(6.0, 0.0),
//!     pt(6.0, 2.0),
//!     pt(2.0, 2.0),
//!     pt(2.0, 6.0),
//!     pt(0.0, 6.0),
//! ])?;
//! let path = sp::delaunay::shortest_path(&polygon, pt(1.0, 5.0), pt(5.0, 1.0))
//!     .collect_points()?;
//! assert_eq!(path, vec![pt(1.0, 5.0), pt(2.0, 2.0), pt(5.0, 1.0)]);
//! # Ok::<(), polypath::GeometryError>(())
//! ```

pub mod errors;
pub mod geom;
pub mod loader;
pub mod polygon;
pub mod primitive;
pub mod sp;

pub use errors::{GeometryError, Result};
