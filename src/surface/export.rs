//! Per-surface triangle buffers with texture coordinates

use crate::errors::CsgError;
use crate::float_types::{EPSILON, Real};
use crate::mesh::polygon::Polygon;
use crate::surface::{Strictness, SurfaceAwareCsg, SurfaceId, SurfaceTag};
use hashbrown::HashMap;
use nalgebra::Point3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Human-facing description of surface identities.
pub trait SurfaceNames<S>: Send + Sync {
    fn name(&self, surface: &S) -> String;

    fn groups(&self, _surface: &S) -> Vec<String> {
        Vec::new()
    }

    /// Material to bind; `None` falls back to the surface name
    fn material(&self, _surface: &S) -> Option<String> {
        None
    }
}

impl<S, F> SurfaceNames<S> for F
where
    F: Fn(&S) -> String + Send + Sync,
{
    fn name(&self, surface: &S) -> String {
        self(surface)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportOptions {
    pub strictness: Strictness,
}

impl ExportOptions {
    pub const fn strict() -> Self {
        ExportOptions { strictness: Strictness::Strict }
    }
}

/// Triangles of one surface identity.
///
/// Every triangle corner owns a fresh vertex and a fresh uv, so
/// `vertices.len() / 3 == uvs.len() / 2 == 3 * triangle_count()`.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshBuffer<S> {
    pub surface: S,
    pub name: String,
    pub groups: Vec<String>,
    pub material: String,
    /// xyz per vertex
    pub vertices: Vec<f32>,
    /// uv per vertex
    pub uvs: Vec<f32>,
    /// `(vertex index, uv index)` per corner, three corners per triangle
    pub faces: Vec<u32>,
    /// Unit normal per triangle
    pub face_normals: Vec<f32>,
    /// Smoothing group per triangle; 0 is flat shading
    pub smoothing_groups: Vec<u32>,
}

impl<S> MeshBuffer<S> {
    fn empty(surface: S, name: String, groups: Vec<String>, material: String) -> Self {
        MeshBuffer {
            surface,
            name,
            groups,
            material,
            vertices: Vec::new(),
            uvs: Vec::new(),
            faces: Vec::new(),
            face_normals: Vec::new(),
            smoothing_groups: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len() / 6
    }

    /// Position of vertex `index`
    pub fn vertex(&self, index: usize) -> [f32; 3] {
        [self.vertices[3 * index], self.vertices[3 * index + 1], self.vertices[3 * index + 2]]
    }

    /// Texture coordinates of uv `index`
    pub fn uv(&self, index: usize) -> [f32; 2] {
        [self.uvs[2 * index], self.uvs[2 * index + 1]]
    }

    fn push_triangle(&mut self, corners: [(Point3<Real>, [Real; 2]); 3]) {
        let [a, b, c] = corners.map(|(p, _)| p);
        let normal = (b - a)
            .cross(&(c - a))
            .try_normalize(EPSILON)
            .unwrap_or_else(nalgebra::Vector3::zeros);

        for (position, uv) in corners {
            let index = self.vertex_count() as u32;
            self.vertices
                .extend([position.x as f32, position.y as f32, position.z as f32]);
            self.uvs.extend([uv[0] as f32, uv[1] as f32]);
            self.faces.extend([index, index]);
        }
        self.face_normals
            .extend([normal.x as f32, normal.y as f32, normal.z as f32]);
        self.smoothing_groups.push(0);
    }
}

/// Everything export needs to know about one surface before triangulating it
struct SurfaceGroup<'a, S: SurfaceId> {
    surface: S,
    name: String,
    groups: Vec<String>,
    material: String,
    polygons: Vec<&'a Polygon<SurfaceTag<S>>>,
}

impl<S: SurfaceId> SurfaceGroup<'_, S> {
    fn into_buffer(self) -> MeshBuffer<S> {
        let mut buffer = MeshBuffer::empty(self.surface, self.name, self.groups, self.material);
        for polygon in self.polygons {
            let Some(part) = polygon.metadata() else {
                continue;
            };
            let projection = part.projection();
            for triangle in polygon.triangulate() {
                buffer.push_triangle(triangle.map(|v| {
                    let uv = projection.texture_coordinates(&v.pos);
                    (v.pos, [uv.x, uv.y])
                }));
            }
        }
        buffer
    }
}

fn fallback_name<S: SurfaceId>(surface: &S) -> String {
    format!("{:?}", surface).trim_matches('"').to_string()
}

impl<S: SurfaceId> SurfaceAwareCsg<S> {
    /// Group polygons by surface identity and emit one triangle buffer per
    /// identity. Fragments of different parts with the same identity share a
    /// buffer, each keeping its own part's texture projection.
    ///
    /// Fails on an untagged polygon; a polygon with fewer than three vertices
    /// is skipped with a warning, or fails when `options` is strict. A part
    /// whose projection spans no area exports with u or v pinned to 0, or
    /// fails when `options` is strict.
    pub fn create_meshes(
        &self,
        names: Option<&dyn SurfaceNames<S>>,
        options: &ExportOptions,
    ) -> Result<HashMap<S, MeshBuffer<S>>, CsgError> {
        let mut order: Vec<SurfaceGroup<'_, S>> = Vec::new();
        let mut index_of: HashMap<S, usize> = HashMap::new();

        for (index, polygon) in self.polygons().iter().enumerate() {
            let position = polygon.vertices.first().map(|v| v.pos);
            let part = polygon
                .metadata()
                .ok_or(CsgError::UntaggedPolygon { index, position })?;

            if polygon.vertices.len() < 3 {
                if options.strictness == Strictness::Strict {
                    return Err(CsgError::DegeneratePolygon {
                        vertex_count: polygon.vertices.len(),
                        position,
                    });
                }
                tracing::warn!(
                    index,
                    vertex_count = polygon.vertices.len(),
                    surface = ?part.surface(),
                    "skipping polygon with fewer than three vertices"
                );
                continue;
            }

            if part.projection().is_degenerate() {
                let range = part.projection().range();
                if options.strictness == Strictness::Strict {
                    return Err(CsgError::DegenerateProjection { range: [range.x, range.y] });
                }
                tracing::warn!(index, surface = ?part.surface(), "exporting polygon through a projection that spans no area");
            }

            let slot = *index_of.entry(part.surface().clone()).or_insert_with(|| {
                let surface = part.surface().clone();
                let name = names.map_or_else(|| fallback_name(&surface), |n| n.name(&surface));
                let groups = names.map(|n| n.groups(&surface)).unwrap_or_default();
                let material = names.and_then(|n| n.material(&surface)).unwrap_or_else(|| name.clone());
                order.push(SurfaceGroup { surface, name, groups, material, polygons: Vec::new() });
                order.len() - 1
            });
            order[slot].polygons.push(polygon);
        }

        #[cfg(feature = "parallel")]
        let buffers: Vec<MeshBuffer<S>> = order.into_par_iter().map(SurfaceGroup::into_buffer).collect();

        #[cfg(not(feature = "parallel"))]
        let buffers: Vec<MeshBuffer<S>> = order.into_iter().map(SurfaceGroup::into_buffer).collect();

        tracing::debug!(
            surfaces = buffers.len(),
            triangles = buffers.iter().map(MeshBuffer::triangle_count).sum::<usize>(),
            "exported surface meshes"
        );

        Ok(buffers
            .into_iter()
            .map(|buffer| (buffer.surface.clone(), buffer))
            .collect())
    }
}
