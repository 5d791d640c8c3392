//! `Mesh` struct and implementations of the `CSGOps` trait for `Mesh`

use crate::float_types::{
    Real,
    parry3d::bounding_volume::{Aabb, BoundingVolume},
};
use crate::mesh::{bsp::Node, polygon::Polygon, vertex::Vertex};
use crate::traits::CSGOps;
use nalgebra::{Matrix3, Matrix4, Point3};
use std::{fmt::Debug, sync::OnceLock};

pub mod bsp;
pub mod plane;
pub mod polygon;
pub mod vertex;

/// A closed solid described by its boundary polygons.
#[derive(Clone, Debug)]
pub struct Mesh<S: Clone + Send + Sync + Debug> {
    /// 3D polygons for volumetric shapes
    pub polygons: Vec<Polygon<S>>,

    /// Lazily calculated AABB that spans `polygons`.
    pub bounding_box: OnceLock<Aabb>,
}

impl<S: Clone + Send + Sync + Debug> Mesh<S> {
    /// Build a Mesh from an existing polygon list
    pub fn from_polygons(polygons: &[Polygon<S>]) -> Self {
        Mesh {
            polygons: polygons.to_vec(),
            bounding_box: OnceLock::new(),
        }
    }

    /// Build a Mesh taking ownership of a polygon list
    pub fn from_polygon_vec(polygons: Vec<Polygon<S>>) -> Self {
        Mesh {
            polygons,
            bounding_box: OnceLock::new(),
        }
    }

    /// `true` when the two solids' bounds overlap or touch, i.e. a boolean
    /// operation may have to split polygons.
    fn may_touch(&self, other: &Mesh<S>) -> bool {
        if self.polygons.is_empty() || other.polygons.is_empty() {
            return false;
        }
        self.bounding_box().intersects(&other.bounding_box())
    }
}

impl<S: Clone + Send + Sync + Debug> CSGOps for Mesh<S> {
    /// Returns a new empty Mesh
    fn new() -> Self {
        Mesh {
            polygons: Vec::new(),
            bounding_box: OnceLock::new(),
        }
    }

    /// Return a new Mesh representing union of the two Meshes.
    ///
    /// ```text
    /// let c = a.union(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |       +----+
    ///     +----+--+    |       +----+       |
    ///          |   b   |            |   c   |
    ///          |       |            |       |
    ///          +-------+            +-------+
    /// ```
    fn union(&self, other: &Mesh<S>) -> Mesh<S> {
        if !self.may_touch(other) {
            let mut polygons = self.polygons.clone();
            polygons.extend_from_slice(&other.polygons);
            return Mesh::from_polygon_vec(polygons);
        }

        let mut a = Node::from_polygons(&self.polygons);
        let mut b = Node::from_polygons(&other.polygons);

        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(&b.all_polygons());

        Mesh::from_polygon_vec(a.all_polygons())
    }

    /// Return a new Mesh representing difference of the two Meshes.
    ///
    /// ```text
    /// let c = a.difference(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |    +--+
    ///     +----+--+    |       +----+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    fn difference(&self, other: &Mesh<S>) -> Mesh<S> {
        if !self.may_touch(other) {
            return Mesh::from_polygons(&self.polygons);
        }

        let mut a = Node::from_polygons(&self.polygons);
        let mut b = Node::from_polygons(&other.polygons);

        a.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(&b.all_polygons());
        a.invert();

        Mesh::from_polygon_vec(a.all_polygons())
    }

    /// Return a new Mesh representing intersection of the two Meshes.
    ///
    /// ```text
    /// let c = a.intersection(b);
    ///     +-------+
    ///     |       |
    ///     |   a   |
    ///     |    +--+----+   =   +--+
    ///     +----+--+    |       +--+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    fn intersection(&self, other: &Mesh<S>) -> Mesh<S> {
        if !self.may_touch(other) {
            return Mesh::new();
        }

        let mut a = Node::from_polygons(&self.polygons);
        let mut b = Node::from_polygons(&other.polygons);

        a.invert();
        b.clip_to(&a);
        b.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        a.build(&b.all_polygons());
        a.invert();

        Mesh::from_polygon_vec(a.all_polygons())
    }

    /// Apply an arbitrary 3D transform (as a 4x4 matrix) to the mesh.
    ///
    /// Normals go through the inverse transpose; a mirroring transform
    /// reverses the winding so faces keep pointing outward.
    fn transform(&self, mat: &Matrix4<Real>) -> Mesh<S> {
        let linear: Matrix3<Real> = mat.fixed_view::<3, 3>(0, 0).into_owned();
        let normal_matrix = linear
            .try_inverse()
            .map(|m| m.transpose())
            .unwrap_or_else(Matrix3::identity);
        let mirrored = linear.determinant() < 0.0;

        let polygons = self
            .polygons
            .iter()
            .map(|poly| {
                let mut vertices: Vec<Vertex> = poly
                    .vertices
                    .iter()
                    .map(|v| {
                        let pos = mat.transform_point(&v.pos);
                        let normal = normal_matrix * v.normal;
                        let normal = normal.try_normalize(0.0).unwrap_or(normal);
                        Vertex::new(pos, normal)
                    })
                    .collect();
                if mirrored {
                    vertices.reverse();
                }
                Polygon::new(vertices, poly.metadata.clone())
            })
            .collect();

        Mesh::from_polygon_vec(polygons)
    }

    /// Bounds of every vertex; an empty mesh yields a zero-size box at the origin.
    fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            let mut iter = self.polygons.iter().map(|p| p.bounding_box());
            match iter.next() {
                Some(first) => iter.fold(first, |acc, bb| acc.merged(&bb)),
                None => Aabb::new(Point3::origin(), Point3::origin()),
            }
        })
    }

    /// Swap inside and outside: every polygon is flipped.
    fn inverse(&self) -> Mesh<S> {
        let polygons = self
            .polygons
            .iter()
            .map(|p| {
                let mut flipped = p.clone();
                flipped.flip();
                flipped
            })
            .collect();
        Mesh::from_polygon_vec(polygons)
    }
}
