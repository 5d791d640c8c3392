use approx::assert_relative_eq;
use nalgebra::{Point3, Vector2, Vector3};
use surface_csg::{CsgError, TextureCoordinateSystem, TextureProjection, float_types::Real};

fn sample_points() -> Vec<Point3<Real>> {
    vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.5, -2.0, 0.25),
        Point3::new(-3.0, 4.0, 1.0),
        Point3::new(0.3, 0.7, -5.0),
    ]
}

#[test]
fn mapping_preserves_distances_within_the_plane() {
    let normals = [
        Vector3::new(0.0, 0.0, 1.0),
        Vector3::new(0.0, 0.0, -1.0),
        Vector3::new(1.0, 2.0, 3.0),
        Vector3::new(-0.2, 0.9, 0.1),
    ];
    for normal in normals {
        let cs = TextureCoordinateSystem::new(normal, Vector3::new(0.3, -0.1, 0.5)).unwrap();
        let n = cs.normal();
        // flatten the samples onto the plane through the origin
        let flat: Vec<_> = sample_points()
            .into_iter()
            .map(|p| p - n * n.dot(&p.coords))
            .collect();
        for a in &flat {
            for b in &flat {
                let uv_distance = (cs.map_to_texture_coordinate_system(a)
                    - cs.map_to_texture_coordinate_system(b))
                .norm();
                assert_relative_eq!(uv_distance, (a - b).norm(), epsilon = 1e-9);
            }
        }
    }
}

#[test]
fn basis_is_right_handed() {
    let cs = TextureCoordinateSystem::new(Vector3::new(1.0, 1.0, 0.0), Vector3::z()).unwrap();
    let x = cs.direction_x();
    let y = cs.direction_y();
    assert_relative_eq!(x.dot(&y), 0.0, epsilon = 1e-12);
    assert_relative_eq!(x.cross(&y), cs.normal(), epsilon = 1e-12);

    let origin = Point3::origin();
    assert_relative_eq!(
        cs.map_to_texture_coordinate_system(&(origin + y * 2.0)),
        Vector2::new(0.0, 2.0),
        epsilon = 1e-12
    );
    assert_relative_eq!(
        cs.map_to_texture_coordinate_system(&(origin + x * 3.0)),
        Vector2::new(3.0, 0.0),
        epsilon = 1e-12
    );
}

#[test]
fn border_points_land_in_unit_square() {
    let cs = TextureCoordinateSystem::new(Vector3::new(0.0, -1.0, 0.0), Vector3::x()).unwrap();
    let border = [
        Point3::new(2.0, 0.0, 1.0),
        Point3::new(6.0, 0.0, 1.0),
        Point3::new(6.0, 0.0, 4.0),
        Point3::new(2.0, 0.0, 4.0),
    ];
    let projection = TextureProjection::from_points_border(cs, &border).unwrap();
    let expected = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
    for (p, [u, v]) in border.iter().zip(expected) {
        assert_relative_eq!(projection.texture_coordinates(p), Vector2::new(u, v), epsilon = 1e-12);
    }
}

#[test]
fn extended_projections_join_edge_to_edge() {
    let cs = TextureCoordinateSystem::new(Vector3::z(), Vector3::x()).unwrap();
    let left = TextureProjection::from_points_border(
        cs.clone(),
        &[Point3::new(0.0, 0.0, 0.0), Point3::new(3.0, 1.0, 0.0)],
    )
    .unwrap();
    let right = TextureProjection::from_points_border(
        cs,
        &[Point3::new(3.0, 0.0, 0.0), Point3::new(4.0, 1.0, 0.0)],
    )
    .unwrap();

    let left = left.extend(0.0, 0.0, 1.0, 0.0);
    let right = right.extend(3.0, 0.0, 3.0, 0.0);
    let seam = Point3::new(3.0, 0.5, 0.0);
    assert_relative_eq!(left.texture_coordinates(&seam), right.texture_coordinates(&seam));
    assert_relative_eq!(left.texture_coordinates(&seam).x, 0.75);
    assert_relative_eq!(right.texture_coordinates(&Point3::new(4.0, 0.0, 0.0)).x, 1.0);
}

#[test]
fn degenerate_direction_is_an_error() {
    let err = TextureCoordinateSystem::new(Vector3::z(), Vector3::new(0.0, 0.0, 2.0)).unwrap_err();
    assert!(matches!(err, CsgError::DegenerateDirection { .. }));
    assert!(err.to_string().starts_with("(DegenerateDirection)"));
}
