//! Struct and functions for working with planar `Polygon`s carrying optional metadata

use crate::float_types::{Real, parry3d::bounding_volume::Aabb};
use crate::mesh::plane::Plane;
use crate::mesh::vertex::Vertex;
use nalgebra::Point3;
use std::sync::OnceLock;

/// A convex, planar polygon with an optional piece of metadata.
///
/// The metadata is cloned onto every fragment the BSP engine derives from
/// this polygon, so it survives boolean operations.
#[derive(Debug, Clone)]
pub struct Polygon<S: Clone> {
    /// Vertices, counter-clockwise seen from the front
    pub vertices: Vec<Vertex>,

    /// The plane on which this polygon lies
    pub plane: Plane,

    /// Lazily-computed bounding box
    pub bounding_box: OnceLock<Aabb>,

    /// Generic metadata
    pub metadata: Option<S>,
}

impl<S: Clone + PartialEq> PartialEq for Polygon<S> {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices
            && self.plane == other.plane
            && self.metadata == other.metadata
    }
}

impl<S: Clone + Send + Sync> Polygon<S> {
    /// Create a polygon from vertices; the plane is fitted with Newell's method.
    pub fn new(vertices: Vec<Vertex>, metadata: Option<S>) -> Self {
        let plane = Plane::from_vertices(&vertices);
        Polygon {
            vertices,
            plane,
            bounding_box: OnceLock::new(),
            metadata,
        }
    }

    /// A piece of this polygon: same plane, same metadata, new outline.
    pub(crate) fn fragment(&self, vertices: Vec<Vertex>) -> Self {
        Polygon {
            vertices,
            plane: self.plane.clone(),
            bounding_box: OnceLock::new(),
            metadata: self.metadata.clone(),
        }
    }

    /// Axis-aligned bounds of the vertices
    pub fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
            let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
            for v in &self.vertices {
                mins = mins.inf(&v.pos);
                maxs = maxs.sup(&v.pos);
            }
            Aabb::new(mins, maxs)
        })
    }

    /// Reverse winding order, flip vertex normals and the plane.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.vertices.iter_mut().for_each(Vertex::flip);
        self.plane.flip();
    }

    /// Fan triangulation from vertex 0: `(0, i + 1, i + 2)`.
    /// Polygons with fewer than three vertices yield nothing.
    pub fn triangulate(&self) -> Vec<[Vertex; 3]> {
        if self.vertices.len() < 3 {
            return Vec::new();
        }
        let v0 = self.vertices[0];
        self.vertices
            .windows(2)
            .skip(1)
            .map(|pair| [v0, pair[0], pair[1]])
            .collect()
    }

    pub const fn metadata(&self) -> Option<&S> {
        self.metadata.as_ref()
    }

    pub const fn metadata_mut(&mut self) -> Option<&mut S> {
        self.metadata.as_mut()
    }

    pub fn set_metadata(&mut self, data: S) {
        self.metadata = Some(data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn pentagon() -> Polygon<u8> {
        let verts = (0..5)
            .map(|i| {
                let a = i as Real * crate::float_types::PI * 0.4;
                Vertex::new(Point3::new(a.cos(), a.sin(), 0.0), Vector3::z())
            })
            .collect();
        Polygon::new(verts, Some(7))
    }

    #[test]
    fn fan_triangulation_shares_first_vertex() {
        let poly = pentagon();
        let tris = poly.triangulate();
        assert_eq!(tris.len(), 3);
        assert!(tris.iter().all(|t| t[0] == poly.vertices[0]));
        assert_eq!(tris[2][2], poly.vertices[4]);
    }

    #[test]
    fn flip_reverses_winding_and_keeps_metadata() {
        let mut poly = pentagon();
        let first = poly.vertices[0].pos;
        poly.flip();
        assert_eq!(poly.vertices[4].pos, first);
        assert!(poly.plane.normal.z < 0.0);
        assert!(poly.vertices.iter().all(|v| v.normal == -Vector3::z()));
        assert_eq!(poly.metadata(), Some(&7));
    }

    #[test]
    fn bounding_box_spans_vertices() {
        let bb = pentagon().bounding_box();
        assert!((bb.maxs.x - 1.0).abs() < 1e-12);
        assert!(bb.mins.x < -0.8);
        assert_eq!(bb.mins.z, 0.0);
    }
}
