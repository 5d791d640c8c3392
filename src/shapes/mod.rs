//! Ready-made surface-aware solids

use crate::errors::CsgError;
use crate::float_types::Real;
use crate::surface::{ExtrudeOptions, Footprint, SurfaceAwareCsg, SurfaceId};

/// Surface identities for the six faces of a box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxSurfaces<S> {
    /// y = 0
    pub front: S,
    /// y = depth
    pub back: S,
    /// x = 0
    pub left: S,
    /// x = width
    pub right: S,
    pub top: S,
    pub bottom: S,
}

impl<S: Clone> BoxSurfaces<S> {
    /// The same surface on all six faces
    pub fn uniform(surface: S) -> Self {
        BoxSurfaces {
            front: surface.clone(),
            back: surface.clone(),
            left: surface.clone(),
            right: surface.clone(),
            top: surface.clone(),
            bottom: surface,
        }
    }
}

impl Default for BoxSurfaces<&'static str> {
    fn default() -> Self {
        BoxSurfaces {
            front: "front",
            back: "back",
            left: "left",
            right: "right",
            top: "top",
            bottom: "bottom",
        }
    }
}

impl<S: SurfaceId> SurfaceAwareCsg<S> {
    /// Axis-aligned box with one corner at the origin.
    ///
    /// ```text
    ///        z (height)
    ///        |   back
    ///        +-------+
    ///       /|      /|
    ///      +-------+ |  right
    ///      | +-----|-+--- y (depth)
    ///      |/      |/
    ///      +-------+--- x (width)
    ///        front
    /// ```
    ///
    /// Side faces get their u axis along the footprint edge and v up, caps
    /// get u along +X.
    pub fn cuboid(
        width: Real,
        height: Real,
        depth: Real,
        surfaces: &BoxSurfaces<S>,
    ) -> Result<Self, CsgError> {
        for (name, value) in [("width", width), ("height", height), ("depth", depth)] {
            if value.is_nan() || value <= 0.0 {
                return Err(CsgError::InvalidDimension { name, value });
            }
        }

        let footprint = Footprint::prism(
            &[[0.0, 0.0], [width, 0.0], [width, depth], [0.0, depth]],
            0.0,
            height,
            vec![
                surfaces.front.clone(),
                surfaces.right.clone(),
                surfaces.back.clone(),
                surfaces.left.clone(),
            ],
            surfaces.top.clone(),
            surfaces.bottom.clone(),
        )?;
        Self::extrude_surfaces(&footprint, &ExtrudeOptions::default())
    }

    pub fn cube(size: Real, surfaces: &BoxSurfaces<S>) -> Result<Self, CsgError> {
        Self::cuboid(size, size, size, surfaces)
    }
}
