//! Loading polygons and query lists from their text formats.
//!
//! A polygon file carries one `x y` vertex per line in counterclockwise
//! order; a line starting with `%` ends the vertex list and introduces
//! trailing metadata. A `.polytest` file follows the metadata marker with
//! query lines of the form `s->t` naming vertex indices.

use std::fs;
use std::path::Path;

use log::debug;
use thiserror::Error;

use crate::errors::GeometryError;
use crate::geom::math::EP;
use crate::polygon::Polygon;
use crate::primitive::point::Pt;
use crate::primitive::pt;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed polygon data: {0}")]
    Parse(String),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

fn parse_point(line: &str) -> Result<Pt, LoadError> {
    let mut it = line.split_whitespace();
    let (Some(x), Some(y), None) = (it.next(), it.next(), it.next()) else {
        return Err(LoadError::Parse(format!("expected 'x y', got {line:?}")));
    };
    let x = x.parse::<f64>().map_err(|e| LoadError::Parse(format!("{x:?}: {e}")))?;
    let y = y.parse::<f64>().map_err(|e| LoadError::Parse(format!("{y:?}: {e}")))?;
    Ok(pt(x, y))
}

/// Parse the vertex lines of a polygon, stopping at the `%` marker.
pub fn parse_polygon(text: &str) -> Result<Polygon, LoadError> {
    let mut points = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.starts_with('%') {
            break;
        }
        if line.is_empty() {
            continue;
        }
        points.push(parse_point(line)?);
    }
    if points.is_empty() {
        return Err(LoadError::Parse("no vertex data".to_string()));
    }
    debug!("parsed polygon with {} vertices", points.len());
    Ok(Polygon::new(points)?)
}

/// Parse a polygon plus the `s->t` query lines after the `%` marker.
pub fn parse_polytest(text: &str) -> Result<(Polygon, Vec<(usize, usize)>), LoadError> {
    let polygon = parse_polygon(text)?;

    let mut queries = Vec::new();
    let mut in_queries = false;
    for line in text.lines() {
        let line = line.trim();
        if line.starts_with('%') {
            in_queries = true;
            continue;
        }
        if !in_queries || line.is_empty() {
            continue;
        }
        let Some((s, t)) = line.split_once("->") else {
            return Err(LoadError::Parse(format!("expected 's->t', got {line:?}")));
        };
        let s = s.trim().parse::<usize>().map_err(|e| LoadError::Parse(format!("{s:?}: {e}")))?;
        let t = t.trim().parse::<usize>().map_err(|e| LoadError::Parse(format!("{t:?}: {e}")))?;
        queries.push((s, t));
    }
    Ok((polygon, queries))
}

pub fn load_polygon(path: &Path) -> Result<Polygon, LoadError> {
    parse_polygon(&fs::read_to_string(path)?)
}

pub fn load_polytest(path: &Path) -> Result<(Polygon, Vec<(usize, usize)>), LoadError> {
    parse_polytest(&fs::read_to_string(path)?)
}

/// Shear the vertex set so that no two vertices share an x-coordinate.
///
/// The trapezoid engines require pairwise distinct x-coordinates; adding a
/// small multiple of each y-coordinate to its x-coordinate separates
/// duplicates while preserving the polygon's combinatorics. The factor is
/// doubled until all x-coordinates differ.
#[must_use]
pub fn prevent_shared_x(points: &[Pt]) -> Vec<Pt> {
    let shared = |pts: &[Pt]| {
        let mut xs: Vec<f64> = pts.iter().map(|p| p.x).collect();
        xs.sort_by(f64::total_cmp);
        xs.windows(2).any(|w| w[0] == w[1])
    };

    if !shared(points) {
        return points.to_vec();
    }

    let mut factor = EP;
    // Coincident points can never be separated by a shear; give up after a
    // bounded number of attempts and let polygon construction reject them.
    for _ in 0..64 {
        let sheared: Vec<Pt> = points.iter().map(|p| pt(p.x + p.y * factor, p.y)).collect();
        if !shared(&sheared) {
            return sheared;
        }
        factor *= 2.0;
    }
    points.to_vec()
}
