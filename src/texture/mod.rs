//! Texture-space flattening and normalized texture lookup for planar faces

pub mod coordinate_system;
pub mod projection;

pub use coordinate_system::TextureCoordinateSystem;
pub use projection::TextureProjection;
