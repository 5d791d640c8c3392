//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use nalgebra::{Point3, Vector3};
use std::fmt::Debug;
use surface_csg::{
    SurfaceAwareCsg, SurfaceId,
    float_types::Real,
    mesh::{Mesh, polygon::Polygon, vertex::Vertex},
};

/// Returns the approximate bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]`
/// for a set of polygons.
pub fn bounding_box<S: Clone>(polygons: &[Polygon<S>]) -> [Real; 6] {
    let mut min = [Real::MAX; 3];
    let mut max = [Real::MIN; 3];
    for v in polygons.iter().flat_map(|p| &p.vertices) {
        for axis in 0..3 {
            min[axis] = min[axis].min(v.pos[axis]);
            max[axis] = max[axis].max(v.pos[axis]);
        }
    }
    [min[0], min[1], min[2], max[0], max[1], max[2]]
}

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Helper to make a simple Polygon in 3D with given vertices.
pub fn make_polygon_3d<S: Clone + Send + Sync>(points: &[[Real; 3]], metadata: Option<S>) -> Polygon<S> {
    let verts = points
        .iter()
        .map(|p| Vertex::new(Point3::new(p[0], p[1], p[2]), Vector3::z()))
        .collect();
    Polygon::new(verts, metadata)
}

/// Axis-aligned cube `[min, min + size]^3` with outward winding; every face
/// carries `metadata`.
pub fn cube_mesh<S: Clone + Send + Sync + Debug>(min: [Real; 3], size: Real, metadata: S) -> Mesh<S> {
    let [x0, y0, z0] = min;
    let [x1, y1, z1] = [x0 + size, y0 + size, z0 + size];
    let faces = [
        [[x0, y0, z0], [x0, y1, z0], [x1, y1, z0], [x1, y0, z0]], // bottom
        [[x0, y0, z1], [x1, y0, z1], [x1, y1, z1], [x0, y1, z1]], // top
        [[x0, y0, z0], [x1, y0, z0], [x1, y0, z1], [x0, y0, z1]], // front
        [[x0, y1, z0], [x0, y1, z1], [x1, y1, z1], [x1, y1, z0]], // back
        [[x0, y0, z0], [x0, y0, z1], [x0, y1, z1], [x0, y1, z0]], // left
        [[x1, y0, z0], [x1, y1, z0], [x1, y1, z1], [x1, y0, z1]], // right
    ];
    let polygons = faces
        .iter()
        .map(|face| make_polygon_3d(face, Some(metadata.clone())))
        .collect();
    Mesh::from_polygon_vec(polygons)
}

/// Enclosed volume from the divergence theorem; negative for inside-out solids.
pub fn volume<S: Clone + Send + Sync>(polygons: &[Polygon<S>]) -> Real {
    polygons
        .iter()
        .flat_map(|p| p.triangulate())
        .map(|[a, b, c]| a.pos.coords.dot(&b.pos.coords.cross(&c.pos.coords)) / 6.0)
        .sum()
}

pub fn polygon_area<S: Clone + Send + Sync>(polygon: &Polygon<S>) -> Real {
    polygon
        .triangulate()
        .iter()
        .map(|[a, b, c]| 0.5 * (b.pos - a.pos).cross(&(c.pos - a.pos)).norm())
        .sum()
}

/// Total area of the polygons tagged with `surface`
pub fn surface_area<S: SurfaceId>(solid: &SurfaceAwareCsg<S>, surface: &S) -> Real {
    solid
        .polygons()
        .iter()
        .filter(|p| p.metadata().is_some_and(|part| part.surface() == surface))
        .map(polygon_area)
        .sum()
}

/// Mean of the polygon's vertex positions
pub fn centroid<S: Clone>(polygon: &Polygon<S>) -> Point3<Real> {
    let sum = polygon
        .vertices
        .iter()
        .fold(Vector3::zeros(), |acc, v| acc + v.pos.coords);
    Point3::from(sum / polygon.vertices.len() as Real)
}
