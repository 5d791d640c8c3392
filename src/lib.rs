//! **Surface-aware Constructive Solid Geometry**: extrude a footprint into a
//! solid whose every face knows which logical surface it belongs to and how to
//! map texture coordinates, cut and merge solids with BSP booleans, then export
//! one textured triangle buffer per surface.
//!
//! ```text
//! footprint --extrude_surfaces--> SurfaceAwareCsg --union/difference--> SurfaceAwareCsg
//!                                                                          |
//!                                                  create_meshes <---------+
//!                                                      |
//!                                              HashMap<S, MeshBuffer<S>>
//! ```
//!
//! Every polygon carries an `Arc<SurfacePart<S>>`. Booleans split polygons
//! but clone the part onto each fragment, so a face cut into pieces keeps one
//! texture projection and continuous coordinates across the cut.
//!
//! # Features
//! #### Optional
//! - **parallel**: build each surface's mesh buffer on a rayon worker

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod errors;
pub mod float_types;
pub mod mesh;
pub mod shapes;
pub mod surface;
pub mod texture;
pub mod traits;

pub use errors::CsgError;
pub use mesh::{Mesh, polygon::Polygon, vertex::Vertex};
pub use shapes::BoxSurfaces;
pub use surface::{
    ExportOptions, ExtrudeOptions, Footprint, FootprintProvider, MeshBuffer, Strictness,
    SurfaceAwareCsg, SurfaceId, SurfaceNames, SurfacePart, SurfaceTag,
};
pub use texture::{TextureCoordinateSystem, TextureProjection};
pub use traits::CSGOps;
