mod support;

use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use support::{make_polygon_3d, surface_area, volume};
use surface_csg::{
    BoxSurfaces, CsgError, SurfaceAwareCsg, SurfacePart, TextureCoordinateSystem,
    TextureProjection, float_types::Real,
};
use std::sync::Arc;

/// A 4 x 0.2 wall, 3 high, with a 1 x 1 window cut through it.
fn wall_with_window() -> (SurfaceAwareCsg<&'static str>, SurfaceAwareCsg<&'static str>) {
    let wall = SurfaceAwareCsg::cuboid(4.0, 3.0, 0.2, &BoxSurfaces::default()).unwrap();
    let window = SurfaceAwareCsg::cuboid(1.0, 1.0, 1.0, &BoxSurfaces::uniform("reveal"))
        .unwrap()
        .translate(1.5, -0.4, 1.0)
        .unwrap();
    (wall, window)
}

#[test]
fn window_cut_keeps_every_fragment_tagged() {
    let (wall, window) = wall_with_window();
    let cut = wall.difference(&window).unwrap();

    assert!(cut.validate().is_ok());
    assert_relative_eq!(volume(cut.polygons()), 4.0 * 3.0 * 0.2 - 0.2, epsilon = 1e-9);
    assert_relative_eq!(surface_area(&cut, &"front"), 11.0, epsilon = 1e-9);
    assert_relative_eq!(surface_area(&cut, &"back"), 11.0, epsilon = 1e-9);
    // four reveal strips line the opening
    assert_relative_eq!(surface_area(&cut, &"reveal"), 4.0 * 0.2, epsilon = 1e-9);

    let mut surfaces = cut.surfaces();
    surfaces.sort();
    assert_eq!(surfaces, vec!["back", "bottom", "front", "left", "reveal", "right", "top"]);
}

#[test]
fn cut_fragments_share_one_projection() {
    let (wall, window) = wall_with_window();
    let front_part = wall
        .surface_parts()
        .into_iter()
        .find(|part| *part.surface() == "front")
        .unwrap();

    let cut = wall.difference(&window).unwrap();
    let fronts: Vec<_> = cut
        .polygons()
        .iter()
        .filter(|p| p.metadata().is_some_and(|part| *part.surface() == "front"))
        .collect();
    assert!(fronts.len() > 1, "the front face should be split around the window");

    for poly in fronts {
        let part = poly.metadata().unwrap();
        assert_eq!(part.id(), front_part.id());
        for v in &poly.vertices {
            // the uncut face spans [0, 4] x [0, 3]
            let uv = part.projection().texture_coordinates(&v.pos);
            assert_relative_eq!(uv.x, v.pos.x / 4.0, epsilon = 1e-9);
            assert_relative_eq!(uv.y, v.pos.z / 3.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn every_texture_coordinate_stays_in_unit_square() {
    let (wall, window) = wall_with_window();
    let cut = wall.difference(&window).unwrap();
    for poly in cut.polygons() {
        let projection = poly.metadata().unwrap().projection();
        for v in &poly.vertices {
            let uv = projection.texture_coordinates(&v.pos);
            assert!((-1e-9..=1.0 + 1e-9).contains(&uv.x), "u out of range: {}", uv.x);
            assert!((-1e-9..=1.0 + 1e-9).contains(&uv.y), "v out of range: {}", uv.y);
        }
    }
}

#[test]
fn union_and_intersection_keep_both_sides_surfaces() {
    let a = SurfaceAwareCsg::cuboid(2.0, 2.0, 2.0, &BoxSurfaces::uniform('a')).unwrap();
    let b = SurfaceAwareCsg::cuboid(2.0, 2.0, 2.0, &BoxSurfaces::uniform('b'))
        .unwrap()
        .translate(1.0, 1.0, 1.0)
        .unwrap();

    let union = a.union(&b).unwrap();
    assert_relative_eq!(volume(union.polygons()), 15.0, epsilon = 1e-9);
    let mut surfaces = union.surfaces();
    surfaces.sort();
    assert_eq!(surfaces, vec!['a', 'b']);

    let intersection = a.intersection(&b).unwrap();
    assert_relative_eq!(volume(intersection.polygons()), 1.0, epsilon = 1e-9);
    assert_relative_eq!(surface_area(&intersection, &'a'), 3.0, epsilon = 1e-9);
    assert_relative_eq!(surface_area(&intersection, &'b'), 3.0, epsilon = 1e-9);
}

#[test]
fn rigid_moves_keep_texture_coordinates() {
    let solid = SurfaceAwareCsg::cuboid(2.0, 1.0, 3.0, &BoxSurfaces::default()).unwrap();
    let moved = solid.rotate(10.0, -35.0, 80.0).unwrap().translate(4.0, -2.0, 0.5).unwrap();

    assert_eq!(moved.polygons().len(), solid.polygons().len());
    assert_eq!(moved.surfaces(), solid.surfaces());
    for (before, after) in solid.polygons().iter().zip(moved.polygons()) {
        let (p0, p1) = (before.metadata().unwrap(), after.metadata().unwrap());
        assert_ne!(p0.id(), p1.id());
        for (v0, v1) in before.vertices.iter().zip(&after.vertices) {
            assert_relative_eq!(
                p0.projection().texture_coordinates(&v0.pos),
                p1.projection().texture_coordinates(&v1.pos),
                epsilon = 1e-9
            );
        }
    }
}

#[test]
fn untagged_polygons_are_rejected() {
    let cs = TextureCoordinateSystem::new(Vector3::z(), Vector3::x()).unwrap();
    let projection =
        TextureProjection::from_points_border(cs, &[Point3::origin(), Point3::new(1.0, 1.0, 0.0)])
            .unwrap();
    let tag = Arc::new(SurfacePart::new("floor", projection));

    let tagged = make_polygon_3d(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]], Some(tag));
    let untagged = make_polygon_3d(&[[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0]], None);

    let err = SurfaceAwareCsg::from_polygons(vec![tagged, untagged]).unwrap_err();
    assert_eq!(
        err,
        CsgError::UntaggedPolygon { index: 1, position: Some(Point3::new(0.0, 0.0, 1.0)) }
    );
    assert!(err.to_string().contains("#1"));
}

#[test]
fn disjoint_difference_is_unchanged() {
    let a = SurfaceAwareCsg::cube(1.0, &BoxSurfaces::default()).unwrap();
    let far = SurfaceAwareCsg::cube(1.0, &BoxSurfaces::uniform("far"))
        .unwrap()
        .translate(10.0, 0.0, 0.0)
        .unwrap();
    let result = a.difference(&far).unwrap();
    assert_eq!(result.polygons().len(), 6);
    let enclosed: Real = volume(result.polygons());
    assert_relative_eq!(enclosed, 1.0, epsilon = 1e-12);
}
