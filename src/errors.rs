//! Errors raised by extrusion, boolean operations and mesh export

use crate::float_types::Real;
use nalgebra::{Point3, Vector3};
use std::fmt::Display;

/// All the failures the surface-aware pipeline reports
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CsgError {
    /// (MismatchedFootprint) Bottom and top outlines differ in point count
    MismatchedFootprint { bottom: usize, top: usize },
    /// (MismatchedSurfaces) A footprint names a different #surfaces than it has edges
    MismatchedSurfaces { edges: usize, surfaces: usize },
    /// (TooFewPoints) An outline, border or polygon has fewer than the minimal #points
    TooFewPoints { found: usize, required: usize },
    /// (DegenerateDirection) A texture direction is zero-length or parallel to the plane normal
    DegenerateDirection { normal: Vector3<Real>, direction: Vector3<Real> },
    /// (DegenerateProjection) A texture projection spans no area
    DegenerateProjection { range: [Real; 2] },
    /// (DegeneratePolygon) A polygon collapsed below three distinct corners
    DegeneratePolygon { vertex_count: usize, position: Option<Point3<Real>> },
    /// (UntaggedPolygon) A polygon lost its surface part
    UntaggedPolygon { index: usize, position: Option<Point3<Real>> },
    /// (InvalidDimension) A shape dimension is not strictly positive
    InvalidDimension { name: &'static str, value: Real },
}

impl Display for CsgError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CsgError::MismatchedFootprint { bottom, top } => write!(f, "(MismatchedFootprint) Bottom outline has {} points but top outline has {}", bottom, top),
            CsgError::MismatchedSurfaces { edges, surfaces } => write!(f, "(MismatchedSurfaces) Footprint has {} edges but {} edge surfaces", edges, surfaces),
            CsgError::TooFewPoints { found, required } => write!(f, "(TooFewPoints) Found {} points, at least {} required", found, required),
            CsgError::DegenerateDirection { normal, direction } => write!(f, "(DegenerateDirection) Texture direction {:?} is degenerate against normal {:?}", direction.as_slice(), normal.as_slice()),
            CsgError::DegenerateProjection { range } => write!(f, "(DegenerateProjection) Texture projection range [{}, {}] spans no area", range[0], range[1]),
            CsgError::DegeneratePolygon { vertex_count, position } => {
                if let Some(position) = position {
                    write!(f, "(DegeneratePolygon) Polygon with {} distinct vertices at: {}", vertex_count, position)
                } else {
                    write!(f, "(DegeneratePolygon) Polygon with {} distinct vertices", vertex_count)
                }
            },
            CsgError::UntaggedPolygon { index, position } => {
                if let Some(position) = position {
                    write!(f, "(UntaggedPolygon) Polygon #{} carries no surface part at: {}", index, position)
                } else {
                    write!(f, "(UntaggedPolygon) Polygon #{} carries no surface part", index)
                }
            },
            CsgError::InvalidDimension { name, value } => write!(f, "(InvalidDimension) {} must be positive, got {}", name, value),
        }
    }
}
