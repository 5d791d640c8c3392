//! Normalized texture lookup over a fixed rectangle of a plane

use crate::errors::CsgError;
use crate::float_types::{EPSILON, Real};
use crate::texture::coordinate_system::TextureCoordinateSystem;
use nalgebra::{Isometry3, Point3, Vector2};

/// A coordinate system plus the texture-space rectangle `[min, min + range]`
/// that maps onto `[0, 1] × [0, 1]`.
///
/// The rectangle is fixed when the projection is built, so every fragment
/// cut from the original face keeps continuous coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureProjection {
    coordinate_system: TextureCoordinateSystem,
    min: Vector2<Real>,
    range: Vector2<Real>,
}

impl TextureProjection {
    pub const fn new(
        coordinate_system: TextureCoordinateSystem,
        min: Vector2<Real>,
        range: Vector2<Real>,
    ) -> Self {
        TextureProjection { coordinate_system, min, range }
    }

    /// Fit the rectangle to the texture-space bounds of `points`.
    ///
    /// A single point (or a collinear border) gives a degenerate range; see
    /// [`TextureProjection::is_degenerate`].
    pub fn from_points_border(
        coordinate_system: TextureCoordinateSystem,
        points: &[Point3<Real>],
    ) -> Result<Self, CsgError> {
        let mut mapped = points
            .iter()
            .map(|p| coordinate_system.map_to_texture_coordinate_system(p));
        let first = mapped.next().ok_or(CsgError::TooFewPoints { found: 0, required: 1 })?;
        let (min, max) = mapped.fold((first, first), |(min, max), uv| (min.inf(&uv), max.sup(&uv)));

        let projection = TextureProjection::new(coordinate_system, min, max - min);
        if projection.is_degenerate() {
            tracing::warn!(
                range_x = projection.range.x,
                range_y = projection.range.y,
                "texture projection spans no area; degenerate axes map to 0"
            );
        }
        Ok(projection)
    }

    /// `true` when either axis of the rectangle is (near) empty
    pub fn is_degenerate(&self) -> bool {
        self.range.x <= EPSILON || self.range.y <= EPSILON
    }

    /// Normalized coordinates of `point`: `(map(point) - min) / range`.
    /// An axis with an empty range yields 0.
    pub fn texture_coordinates(&self, point: &Point3<Real>) -> Vector2<Real> {
        let local = self.coordinate_system.map_to_texture_coordinate_system(point) - self.min;
        Vector2::new(
            normalize_axis(local.x, self.range.x),
            normalize_axis(local.y, self.range.y),
        )
    }

    /// A new projection whose minimum moves back by `(min_x, min_y)` and whose
    /// range grows by `(range_x, range_y)`, all in texture-space units.
    pub fn extend(&self, min_x: Real, min_y: Real, range_x: Real, range_y: Real) -> Self {
        TextureProjection {
            coordinate_system: self.coordinate_system.clone(),
            min: self.min - Vector2::new(min_x, min_y),
            range: self.range + Vector2::new(range_x, range_y),
        }
    }

    /// The same projection after the plane has been moved by `isometry`:
    /// every moved point keeps the texture coordinates it had before.
    pub fn transformed(&self, isometry: &Isometry3<Real>) -> Result<Self, CsgError> {
        let coordinate_system = TextureCoordinateSystem::new(
            isometry.rotation * self.coordinate_system.normal(),
            isometry.rotation * self.coordinate_system.direction_x(),
        )?;
        let shift = coordinate_system
            .map_to_texture_coordinate_system(&Point3::from(isometry.translation.vector));
        Ok(TextureProjection::new(coordinate_system, self.min + shift, self.range))
    }

    pub const fn coordinate_system(&self) -> &TextureCoordinateSystem {
        &self.coordinate_system
    }

    pub const fn min(&self) -> Vector2<Real> {
        self.min
    }

    pub const fn range(&self) -> Vector2<Real> {
        self.range
    }
}

#[inline]
fn normalize_axis(value: Real, range: Real) -> Real {
    if range > EPSILON { value / range } else { 0.0 }
}
