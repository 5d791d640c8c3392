//! Surface-aware solids: every polygon carries the [`SurfacePart`] it was cut from

use crate::errors::CsgError;
use crate::float_types::{Real, parry3d::bounding_volume::Aabb};
use crate::mesh::{Mesh, polygon::Polygon};
use crate::texture::TextureProjection;
use crate::traits::CSGOps;
use hashbrown::{HashMap, HashSet, hash_map::Entry};
use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub mod export;
pub mod extrude;

pub use export::{ExportOptions, MeshBuffer, SurfaceNames};
pub use extrude::{ExtrudeOptions, Footprint, FootprintProvider};

/// Logical surface label chosen by the caller; only compared and hashed.
pub trait SurfaceId: Clone + Eq + Hash + Debug + Send + Sync {}

impl<T: Clone + Eq + Hash + Debug + Send + Sync> SurfaceId for T {}

/// How degenerate-but-recoverable geometry is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Skip the offending face or polygon and log a warning
    #[default]
    Lenient,
    /// Fail with the matching [`CsgError`]
    Strict,
}

static NEXT_PART_ID: AtomicU64 = AtomicU64::new(1);

/// One uncut piece of a surface together with its texture projection.
///
/// Many parts may share a `surface`; `id` is unique per part.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfacePart<S> {
    id: u64,
    surface: S,
    projection: TextureProjection,
}

impl<S> SurfacePart<S> {
    pub fn new(surface: S, projection: TextureProjection) -> Self {
        SurfacePart {
            id: NEXT_PART_ID.fetch_add(1, Ordering::Relaxed),
            surface,
            projection,
        }
    }

    pub const fn id(&self) -> u64 {
        self.id
    }

    pub const fn surface(&self) -> &S {
        &self.surface
    }

    pub const fn projection(&self) -> &TextureProjection {
        &self.projection
    }

    /// Same part, different projection
    pub fn with_projection(self, projection: TextureProjection) -> Self {
        SurfacePart { projection, ..self }
    }
}

/// Per-polygon metadata of a surface-aware solid: a part shared by all of
/// its fragments.
pub type SurfaceTag<S> = Arc<SurfacePart<S>>;

/// A solid whose polygons are all tagged with a [`SurfacePart`].
#[derive(Debug, Clone)]
pub struct SurfaceAwareCsg<S: SurfaceId> {
    mesh: Mesh<SurfaceTag<S>>,
}

impl<S: SurfaceId> SurfaceAwareCsg<S> {
    /// Wrap a polygon solid, checking that every polygon is tagged.
    pub fn from_mesh(mesh: Mesh<SurfaceTag<S>>) -> Result<Self, CsgError> {
        let solid = SurfaceAwareCsg { mesh };
        solid.validate()?;
        Ok(solid)
    }

    pub fn from_polygons(polygons: Vec<Polygon<SurfaceTag<S>>>) -> Result<Self, CsgError> {
        Self::from_mesh(Mesh::from_polygon_vec(polygons))
    }

    /// An empty solid
    pub fn empty() -> Self {
        SurfaceAwareCsg { mesh: Mesh::new() }
    }

    pub const fn mesh(&self) -> &Mesh<SurfaceTag<S>> {
        &self.mesh
    }

    pub fn into_mesh(self) -> Mesh<SurfaceTag<S>> {
        self.mesh
    }

    pub fn polygons(&self) -> &[Polygon<SurfaceTag<S>>] {
        &self.mesh.polygons
    }

    pub fn is_empty(&self) -> bool {
        self.mesh.polygons.is_empty()
    }

    /// Fails on the first polygon without a surface part.
    pub fn validate(&self) -> Result<(), CsgError> {
        match self.mesh.polygons.iter().position(|p| p.metadata.is_none()) {
            Some(index) => Err(CsgError::UntaggedPolygon {
                index,
                position: self.mesh.polygons[index].vertices.first().map(|v| v.pos),
            }),
            None => Ok(()),
        }
    }

    /// Distinct surface identities in first-seen order
    pub fn surfaces(&self) -> Vec<S> {
        let mut seen = HashSet::new();
        self.mesh
            .polygons
            .iter()
            .filter_map(|p| p.metadata())
            .filter(|part| seen.insert(part.surface().clone()))
            .map(|part| part.surface().clone())
            .collect()
    }

    /// Distinct surface parts (by id) in first-seen order
    pub fn surface_parts(&self) -> Vec<SurfaceTag<S>> {
        let mut seen = HashSet::new();
        self.mesh
            .polygons
            .iter()
            .filter_map(|p| p.metadata())
            .filter(|part| seen.insert(part.id()))
            .cloned()
            .collect()
    }

    /// Number of triangles a fan triangulation of every polygon yields
    pub fn triangle_count(&self) -> usize {
        self.mesh
            .polygons
            .iter()
            .map(|p| p.vertices.len().saturating_sub(2))
            .sum()
    }

    /// Union of the two solids; tags follow every fragment.
    pub fn union(&self, other: &Self) -> Result<Self, CsgError> {
        Self::from_mesh(self.mesh.union(&other.mesh))
    }

    /// This solid minus `other`; faces of `other` that line the cut keep
    /// `other`'s surfaces.
    pub fn difference(&self, other: &Self) -> Result<Self, CsgError> {
        Self::from_mesh(self.mesh.difference(&other.mesh))
    }

    pub fn intersection(&self, other: &Self) -> Result<Self, CsgError> {
        Self::from_mesh(self.mesh.intersection(&other.mesh))
    }

    /// Rigidly move the solid. Every surface part is re-issued with its
    /// projection carried along, so texture coordinates are unchanged.
    pub fn transform(&self, isometry: &Isometry3<Real>) -> Result<Self, CsgError> {
        let moved = self.mesh.transform(&isometry.to_homogeneous());
        let mut retagged: HashMap<u64, SurfaceTag<S>> = HashMap::new();

        let polygons = moved
            .polygons
            .into_iter()
            .map(|mut poly| {
                if let Some(part) = poly.metadata.take() {
                    let tag = match retagged.entry(part.id()) {
                        Entry::Occupied(entry) => entry.get().clone(),
                        Entry::Vacant(entry) => {
                            let projection = part.projection().transformed(isometry)?;
                            let moved_part = SurfacePart::new(part.surface().clone(), projection);
                            entry.insert(Arc::new(moved_part)).clone()
                        },
                    };
                    poly.metadata = Some(tag);
                }
                Ok(poly)
            })
            .collect::<Result<Vec<_>, CsgError>>()?;

        Self::from_polygons(polygons)
    }

    pub fn translate(&self, x: Real, y: Real, z: Real) -> Result<Self, CsgError> {
        self.transform(&Isometry3::translation(x, y, z))
    }

    /// Rotates by x_degrees, y_degrees, z_degrees (applied X, then Y, then Z)
    pub fn rotate(&self, x_deg: Real, y_deg: Real, z_deg: Real) -> Result<Self, CsgError> {
        let rotation = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), z_deg.to_radians())
            * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), y_deg.to_radians())
            * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), x_deg.to_radians());
        self.transform(&Isometry3::from_parts(Translation3::identity(), rotation))
    }

    pub fn bounding_box(&self) -> Aabb {
        self.mesh.bounding_box()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::TextureCoordinateSystem;
    use nalgebra::Point3;

    fn floor_projection() -> TextureProjection {
        let cs = TextureCoordinateSystem::new(Vector3::z(), Vector3::x()).unwrap();
        TextureProjection::from_points_border(cs, &[Point3::origin(), Point3::new(2.0, 2.0, 0.0)])
            .unwrap()
    }

    #[test]
    fn parts_get_distinct_ids() {
        let a = SurfacePart::new("floor", floor_projection());
        let b = SurfacePart::new("floor", floor_projection());
        assert_ne!(a.id(), b.id());
        assert_eq!(a.surface(), b.surface());
    }

    #[test]
    fn with_projection_keeps_identity() {
        let part = SurfacePart::new(3u8, floor_projection());
        let id = part.id();
        let wider = part.projection().extend(1.0, 0.0, 2.0, 0.0);
        let part = part.with_projection(wider.clone());
        assert_eq!(part.id(), id);
        assert_eq!(part.projection(), &wider);
    }

    #[test]
    fn empty_solid_is_valid() {
        let solid: SurfaceAwareCsg<u8> = SurfaceAwareCsg::empty();
        assert!(solid.is_empty());
        assert!(solid.validate().is_ok());
        assert_eq!(solid.triangle_count(), 0);
        assert!(solid.surfaces().is_empty());
        assert!(solid.union(&solid).unwrap().is_empty());
    }
}
