//! Extrusion of a footprint into a solid whose faces carry surface parts
//!
//! The footprint is a bottom outline and a top outline with the same number
//! of points, both counter-clockwise seen from +Z; point `i` of the bottom is
//! joined to point `i` of the top. The result holds:
//! - the top cap (normal +Z) with one surface part,
//! - the bottom cap (normal -Z) with one surface part,
//! - one side face per edge `i` to `i + 1`, each with its own surface part whose
//!   u axis runs along the edge and whose v axis points up the face.

use crate::errors::CsgError;
use crate::float_types::{EPSILON, Real, tolerance};
use crate::mesh::{polygon::Polygon, vertex::Vertex};
use crate::surface::{Strictness, SurfaceAwareCsg, SurfaceId, SurfacePart, SurfaceTag};
use crate::texture::{TextureCoordinateSystem, TextureProjection};
use geo::{LineString, Polygon as GeoPolygon, TriangulateEarcut, coord};
use nalgebra::{Point3, Vector3};
use std::sync::Arc;

/// Supplies the outlines and surface identities of an extrusion.
pub trait FootprintProvider<S> {
    /// Bottom outline, counter-clockwise seen from above
    fn bottom_points_ccw(&self) -> Vec<Point3<Real>>;

    /// Top outline; point `i` sits above bottom point `i`
    fn top_points_ccw(&self) -> Vec<Point3<Real>>;

    /// Texture u direction on the top cap
    fn top_direction_x(&self) -> Vector3<Real> {
        Vector3::x()
    }

    /// Texture u direction on the bottom cap
    fn bottom_direction_x(&self) -> Vector3<Real> {
        Vector3::x()
    }

    /// Surface of the side face between point `edge` and point `edge + 1`
    fn surface_ccw(&self, edge: usize) -> S;

    fn top_surface(&self) -> S;

    fn bottom_surface(&self) -> S;

    /// Edge at which side textures start; only the order of texture
    /// stitching depends on it, never which surface owns an edge.
    fn start_point(&self) -> usize {
        0
    }

    /// Stitch side parts that share a surface into one continuous texture span
    fn continue_surface_textures(&self) -> bool {
        false
    }
}

/// A ready-made [`FootprintProvider`] holding its outlines and surfaces.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint<S> {
    bottom: Vec<Point3<Real>>,
    top: Vec<Point3<Real>>,
    edge_surfaces: Vec<S>,
    top_surface: S,
    bottom_surface: S,
    top_direction_x: Vector3<Real>,
    bottom_direction_x: Vector3<Real>,
    start_point: usize,
    continue_surface_textures: bool,
}

impl<S: SurfaceId> Footprint<S> {
    /// `edge_surfaces[i]` names the side face between point `i` and `i + 1`.
    pub fn new(
        bottom: Vec<Point3<Real>>,
        top: Vec<Point3<Real>>,
        edge_surfaces: Vec<S>,
        top_surface: S,
        bottom_surface: S,
    ) -> Result<Self, CsgError> {
        if bottom.len() != top.len() {
            return Err(CsgError::MismatchedFootprint { bottom: bottom.len(), top: top.len() });
        }
        if edge_surfaces.len() != bottom.len() {
            return Err(CsgError::MismatchedSurfaces {
                edges: bottom.len(),
                surfaces: edge_surfaces.len(),
            });
        }
        Ok(Footprint {
            bottom,
            top,
            edge_surfaces,
            top_surface,
            bottom_surface,
            top_direction_x: Vector3::x(),
            bottom_direction_x: Vector3::x(),
            start_point: 0,
            continue_surface_textures: false,
        })
    }

    /// Straight prism over a 2D outline between `z_bottom` and `z_top`.
    pub fn prism(
        outline: &[[Real; 2]],
        z_bottom: Real,
        z_top: Real,
        edge_surfaces: Vec<S>,
        top_surface: S,
        bottom_surface: S,
    ) -> Result<Self, CsgError> {
        let at = |z: Real| -> Vec<Point3<Real>> { outline.iter().map(|&[x, y]| Point3::new(x, y, z)).collect() };
        Self::new(at(z_bottom), at(z_top), edge_surfaces, top_surface, bottom_surface)
    }

    pub fn with_directions(mut self, top: Vector3<Real>, bottom: Vector3<Real>) -> Self {
        self.top_direction_x = top;
        self.bottom_direction_x = bottom;
        self
    }

    pub fn with_start_point(mut self, start_point: usize) -> Self {
        self.start_point = start_point;
        self
    }

    pub fn with_continued_textures(mut self, continue_surface_textures: bool) -> Self {
        self.continue_surface_textures = continue_surface_textures;
        self
    }
}

impl<S: SurfaceId> FootprintProvider<S> for Footprint<S> {
    fn bottom_points_ccw(&self) -> Vec<Point3<Real>> {
        self.bottom.clone()
    }

    fn top_points_ccw(&self) -> Vec<Point3<Real>> {
        self.top.clone()
    }

    fn top_direction_x(&self) -> Vector3<Real> {
        self.top_direction_x
    }

    fn bottom_direction_x(&self) -> Vector3<Real> {
        self.bottom_direction_x
    }

    fn surface_ccw(&self, edge: usize) -> S {
        self.edge_surfaces[edge % self.edge_surfaces.len()].clone()
    }

    fn top_surface(&self) -> S {
        self.top_surface.clone()
    }

    fn bottom_surface(&self) -> S {
        self.bottom_surface.clone()
    }

    fn start_point(&self) -> usize {
        self.start_point
    }

    fn continue_surface_textures(&self) -> bool {
        self.continue_surface_textures
    }
}

/// Extrusion settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtrudeOptions {
    pub strictness: Strictness,
}

impl ExtrudeOptions {
    pub const fn strict() -> Self {
        ExtrudeOptions { strictness: Strictness::Strict }
    }
}

/// A side face before its part is frozen into polygons
struct SideFace<S> {
    edge: usize,
    part: SurfacePart<S>,
    corners: Vec<Point3<Real>>,
}

impl<S: SurfaceId> SurfaceAwareCsg<S> {
    /// Build a tagged solid from a footprint. See the module docs for the
    /// layout of caps and side faces.
    pub fn extrude_surfaces<P>(provider: &P, options: &ExtrudeOptions) -> Result<Self, CsgError>
    where
        P: FootprintProvider<S> + ?Sized,
    {
        let bottom = provider.bottom_points_ccw();
        let top = provider.top_points_ccw();
        if bottom.len() != top.len() {
            return Err(CsgError::MismatchedFootprint { bottom: bottom.len(), top: top.len() });
        }
        let n = bottom.len();
        if n < 3 {
            return Err(CsgError::TooFewPoints { found: n, required: 3 });
        }
        if signed_area_xy(&bottom) < 0.0 {
            tracing::warn!("footprint is clockwise seen from +Z; faces will point inward");
        }

        let mut polygons = Vec::new();

        let top_part = cap_part(&top, Vector3::z(), provider.top_direction_x(), provider.top_surface(), options)?;
        cap_polygons(&top, Vector3::z(), &top_part, options, &mut polygons)?;

        let mut bottom_reversed = bottom.clone();
        bottom_reversed.reverse();
        let bottom_part = cap_part(
            &bottom_reversed,
            -Vector3::z(),
            provider.bottom_direction_x(),
            provider.bottom_surface(),
            options,
        )?;
        cap_polygons(&bottom_reversed, -Vector3::z(), &bottom_part, options, &mut polygons)?;

        let start = provider.start_point() % n;
        let mut faces = Vec::with_capacity(n);
        for k in 0..n {
            let i = (start + k) % n;
            let j = (i + 1) % n;
            if let Some(face) = side_face(provider, i, [bottom[i], bottom[j], top[j], top[i]], options)? {
                faces.push(face);
            }
        }

        if provider.continue_surface_textures() {
            stitch_side_textures(&mut faces, n);
        }

        let side_count = faces.len();
        for face in faces {
            let tag = Arc::new(face.part);
            side_polygons(&face.corners, &tag, &mut polygons);
        }

        tracing::debug!(
            points = n,
            side_faces = side_count,
            polygons = polygons.len(),
            "extruded footprint"
        );
        Self::from_polygons(polygons)
    }
}

/// Reject (strict) or accept (lenient, already logged) an empty projection.
fn checked_projection(
    projection: TextureProjection,
    options: &ExtrudeOptions,
) -> Result<TextureProjection, CsgError> {
    if options.strictness == Strictness::Strict && projection.is_degenerate() {
        let range = projection.range();
        return Err(CsgError::DegenerateProjection { range: [range.x, range.y] });
    }
    Ok(projection)
}

fn cap_part<S>(
    outline: &[Point3<Real>],
    normal: Vector3<Real>,
    direction_x: Vector3<Real>,
    surface: S,
    options: &ExtrudeOptions,
) -> Result<SurfaceTag<S>, CsgError> {
    let coordinate_system = TextureCoordinateSystem::new(normal, direction_x)?;
    let projection = TextureProjection::from_points_border(coordinate_system, outline)?;
    let projection = checked_projection(projection, options)?;
    Ok(Arc::new(SurfacePart::new(surface, projection)))
}

/// Emit a cap: one polygon when the outline is convex and planar, earcut
/// triangles otherwise. `outline` is already wound around `normal`.
fn cap_polygons<S: SurfaceId>(
    outline: &[Point3<Real>],
    normal: Vector3<Real>,
    tag: &SurfaceTag<S>,
    options: &ExtrudeOptions,
    out: &mut Vec<Polygon<SurfaceTag<S>>>,
) -> Result<(), CsgError> {
    let ring = distinct_ring(outline);
    if ring.len() < 3 {
        return degenerate(ring.len(), outline.first().copied(), options);
    }

    if is_convex(&ring, &normal) && is_planar(&ring) {
        out.push(tagged_polygon(&ring, tag));
        return Ok(());
    }

    let coords: Vec<_> = ring.iter().map(|p| coord! { x: p.x, y: p.y }).collect();
    let triangulation = GeoPolygon::new(LineString::new(coords), Vec::new()).earcut_triangles_raw();
    for tri in triangulation.triangle_indices.chunks_exact(3) {
        // the ring comes back closed, so its last index aliases the first
        let mut corners = [ring[tri[0] % ring.len()], ring[tri[1] % ring.len()], ring[tri[2] % ring.len()]];
        let facing = (corners[1] - corners[0]).cross(&(corners[2] - corners[0]));
        if facing.norm() < EPSILON {
            continue;
        }
        if facing.dot(&normal) < 0.0 {
            corners.swap(1, 2);
        }
        out.push(tagged_polygon(&corners, tag));
    }
    Ok(())
}

/// Build the part of side face `edge`, or `None` when a lenient run skips it.
fn side_face<S, P>(
    provider: &P,
    edge: usize,
    quad: [Point3<Real>; 4],
    options: &ExtrudeOptions,
) -> Result<Option<SideFace<S>>, CsgError>
where
    S: SurfaceId,
    P: FootprintProvider<S> + ?Sized,
{
    let [b_i, b_j, t_j, t_i] = quad;
    let corners = distinct_ring(&quad);
    if corners.len() < 3 {
        degenerate(corners.len(), Some(b_i), options)?;
        return Ok(None);
    }

    let mut normal = (b_j - b_i).cross(&(t_i - b_i));
    if normal.norm() < EPSILON {
        normal = newell_normal(&corners);
    }
    let mut direction_x = b_j - b_i;
    if direction_x.norm() < EPSILON {
        direction_x = t_j - t_i;
    }

    let coordinate_system = match TextureCoordinateSystem::new(normal, direction_x) {
        Ok(cs) => cs,
        Err(err) if options.strictness == Strictness::Lenient => {
            tracing::warn!(edge, error = %err, "skipping side face without a texture direction");
            return Ok(None);
        },
        Err(err) => return Err(err),
    };
    let projection = TextureProjection::from_points_border(coordinate_system, &corners)?;
    let projection = checked_projection(projection, options)?;

    Ok(Some(SideFace {
        edge,
        part: SurfacePart::new(provider.surface_ccw(edge), projection),
        corners,
    }))
}

/// A side face as one polygon, or two triangles when its quad is twisted.
fn side_polygons<S: SurfaceId>(
    corners: &[Point3<Real>],
    tag: &SurfaceTag<S>,
    out: &mut Vec<Polygon<SurfaceTag<S>>>,
) {
    if corners.len() == 4 && !is_planar(corners) {
        out.push(tagged_polygon(&[corners[0], corners[1], corners[2]], tag));
        out.push(tagged_polygon(&[corners[0], corners[2], corners[3]], tag));
    } else {
        out.push(tagged_polygon(corners, tag));
    }
}

/// Re-derive the projections of side parts sharing a surface so that their
/// u ranges concatenate into one span. Only runs of adjacent edges are
/// stitched; a run never wraps past the start point.
fn stitch_side_textures<S: SurfaceId>(faces: &mut [SideFace<S>], edge_count: usize) {
    let mut runs: Vec<Vec<usize>> = Vec::new();
    for (index, face) in faces.iter().enumerate() {
        let continues = index > 0 && {
            let previous = &faces[index - 1];
            previous.part.surface() == face.part.surface() && (previous.edge + 1) % edge_count == face.edge
        };
        match runs.last_mut() {
            Some(run) if continues => run.push(index),
            _ => runs.push(vec![index]),
        }
    }

    for run in runs.iter().filter(|run| run.len() >= 2) {
        let total: Real = run.iter().map(|&k| faces[k].part.projection().range().x).sum();
        let mut offset = 0.0;
        for &k in run {
            let width = faces[k].part.projection().range().x;
            let extended = faces[k].part.projection().extend(offset, 0.0, total - width, 0.0);
            faces[k].part = faces[k].part.clone().with_projection(extended);
            offset += width;
        }
        tracing::trace!(faces = run.len(), width = total, "stitched side textures");
    }
}

fn tagged_polygon<S: SurfaceId>(corners: &[Point3<Real>], tag: &SurfaceTag<S>) -> Polygon<SurfaceTag<S>> {
    let normal = newell_normal(corners);
    let vertices = corners.iter().map(|&p| Vertex::new(p, normal)).collect();
    Polygon::new(vertices, Some(tag.clone()))
}

/// Report a collapsed face: an error when strict, a warning otherwise.
fn degenerate(vertex_count: usize, position: Option<Point3<Real>>, options: &ExtrudeOptions) -> Result<(), CsgError> {
    match options.strictness {
        Strictness::Strict => Err(CsgError::DegeneratePolygon { vertex_count, position }),
        Strictness::Lenient => {
            tracing::warn!(vertex_count, ?position, "skipping face with fewer than three distinct corners");
            Ok(())
        },
    }
}

/// Drop consecutive (cyclically) coincident points.
fn distinct_ring(points: &[Point3<Real>]) -> Vec<Point3<Real>> {
    let mut ring: Vec<Point3<Real>> = Vec::with_capacity(points.len());
    for &p in points {
        if ring.last().is_none_or(|last| (p - last).norm() > EPSILON) {
            ring.push(p);
        }
    }
    while ring.len() > 1 && (ring[0] - ring[ring.len() - 1]).norm() <= EPSILON {
        ring.pop();
    }
    ring
}

fn newell_normal(points: &[Point3<Real>]) -> Vector3<Real> {
    let sum = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .fold(Vector3::zeros(), |acc, (a, b)| acc + a.coords.cross(&b.coords));
    sum.try_normalize(EPSILON).unwrap_or_else(Vector3::zeros)
}

fn signed_area_xy(points: &[Point3<Real>]) -> Real {
    0.5 * points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum::<Real>()
}

/// Every corner turns the same way around `normal`.
fn is_convex(ring: &[Point3<Real>], normal: &Vector3<Real>) -> bool {
    let n = ring.len();
    (0..n).all(|i| {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        let c = ring[(i + 2) % n];
        (b - a).cross(&(c - b)).dot(normal) >= -tolerance()
    })
}

fn is_planar(ring: &[Point3<Real>]) -> bool {
    let normal = newell_normal(ring);
    if normal == Vector3::zeros() {
        return false;
    }
    let centroid = ring.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords) / ring.len() as Real;
    ring.iter().all(|p| normal.dot(&(p.coords - centroid)).abs() <= tolerance())
}
