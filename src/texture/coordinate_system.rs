//! Flattening of a plane into 2D texture space

use crate::errors::CsgError;
use crate::float_types::{EPSILON, PI, Real};
use nalgebra::{Point3, Rotation3, Vector2, Vector3};

/// A fixed rotation that maps 3D points into the texture space of a plane.
///
/// `normal` is carried onto +Z and `direction_x` onto texture +X; the Z
/// coordinate is then dropped. Texture +Y is therefore the image of
/// `normal × direction_x`: looking at the front of the plane, u grows along
/// `direction_x` and v grows a quarter turn counter-clockwise from it.
///
/// Points off the plane are projected along the normal, and distances
/// between points on any plane parallel to it are preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureCoordinateSystem {
    normal: Vector3<Real>,
    direction_x: Vector3<Real>,
    rotation: Rotation3<Real>,
}

impl TextureCoordinateSystem {
    /// Build the system for `normal` and an in-plane `direction_x`.
    ///
    /// `direction_x` does not have to be perpendicular to `normal`; only its
    /// in-plane component matters. Fails with
    /// [`CsgError::DegenerateDirection`] when either vector is zero-length or
    /// the two are parallel.
    pub fn new(normal: Vector3<Real>, direction_x: Vector3<Real>) -> Result<Self, CsgError> {
        let degenerate = || CsgError::DegenerateDirection { normal, direction: direction_x };

        let unit_normal = normal.try_normalize(EPSILON).ok_or_else(degenerate)?;
        let in_plane = direction_x - unit_normal * unit_normal.dot(&direction_x);
        let unit_x = in_plane.try_normalize(EPSILON).ok_or_else(degenerate)?;

        // rotate the world so the normal lies on +Z
        let to_z = Rotation3::rotation_between(&unit_normal, &Vector3::z())
            .unwrap_or_else(|| Rotation3::from_axis_angle(&Vector3::x_axis(), PI));

        // then spin about Z until direction_x lies on +X
        let rotated_x = to_z * unit_x;
        let angle = rotated_x.y.atan2(rotated_x.x);
        let spin = Rotation3::from_axis_angle(&Vector3::z_axis(), -angle);

        Ok(TextureCoordinateSystem {
            normal: unit_normal,
            direction_x: unit_x,
            rotation: spin * to_z,
        })
    }

    /// Map a 3D point to 2D texture-space coordinates
    pub fn map_to_texture_coordinate_system(&self, point: &Point3<Real>) -> Vector2<Real> {
        let rotated = self.rotation * point.coords;
        Vector2::new(rotated.x, rotated.y)
    }

    /// Unit plane normal
    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    /// Unit texture +X direction in world space
    pub const fn direction_x(&self) -> Vector3<Real> {
        self.direction_x
    }

    /// Unit texture +Y direction in world space: `normal × direction_x`
    pub fn direction_y(&self) -> Vector3<Real> {
        self.normal.cross(&self.direction_x)
    }

    pub const fn rotation(&self) -> &Rotation3<Real> {
        &self.rotation
    }
}
