use thiserror::Error;

/// Errors raised by the geometric primitives.
///
/// Primitives fail fast; the shortest-path engines catch nothing and surface
/// these unchanged through their iterators.
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// A primitive was constructed from coincident points, e.g. a line
    /// through two equal points.
    #[error("degenerated case: primitive constructed from coincident points")]
    DegeneratedCase,

    /// An operation requiring general position encountered input that
    /// violates it, e.g. two vertices sharing an x-coordinate during
    /// trapezoidation.
    #[error("polygon is not in general position")]
    NotInGeneralPosition,

    /// Three specific points are collinear where a proper triangle was
    /// required.
    #[error("three points are collinear")]
    ThreePointsAreCollinear,

    /// A bounded funnel was constructed from a concave (cusp, first, second)
    /// triple.
    #[error("bounded funnel must not be concave")]
    BoundedFunnelMustNotBeConcave,

    /// A polygon was constructed from fewer than three vertices.
    #[error("a polygon needs at least three vertices")]
    TooFewPoints,
}

impl GeometryError {
    /// True for both flavours of general-position violation.
    #[must_use]
    pub fn is_general_position_violation(&self) -> bool {
        matches!(self, Self::NotInGeneralPosition | Self::ThreePointsAreCollinear)
    }
}

pub type Result<T, E = GeometryError> = std::result::Result<T, E>;
