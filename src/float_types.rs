// Re-export parry for the bounding volumes used across the crate
pub use parry3d_f64 as parry3d;

// Our Real scalar type:
pub type Real = f64;

use core::str::FromStr;
use std::sync::OnceLock;

/// Smallest length treated as non-zero by degenerate-geometry checks
/// (zero-length directions, collapsed edges, empty texture ranges).
pub const EPSILON: Real = 1e-9;

/// Lazily-initialized plane-classification tolerance used by the BSP engine.
/// Defaults to `1e-6`, but can be overridden:
///  1) **Build-time**: set env var `SURFACE_CSG_TOLERANCE` (e.g. `SURFACE_CSG_TOLERANCE=1e-5 cargo build`)
///  2) **Runtime**: call [`set_tolerance`] once before using the library
static TOLERANCE_CELL: OnceLock<Real> = OnceLock::new();

#[inline]
const fn default_tolerance() -> Real {
    1e-6
}

/// Returns the current classification tolerance.
/// If not set yet, it tries `SURFACE_CSG_TOLERANCE` and falls back to a sensible default.
pub fn tolerance() -> Real {
    *TOLERANCE_CELL.get_or_init(|| {
        if let Some(environment_variable) = option_env!("SURFACE_CSG_TOLERANCE") {
            if let Ok(value) = Real::from_str(environment_variable) {
                return value.max(Real::EPSILON);
            }
        }
        default_tolerance()
    })
}

/// Set the tolerance programmatically once (subsequent calls are ignored).
/// Call near program start: `surface_csg::float_types::set_tolerance(1e-5);`
pub fn set_tolerance(value: Real) {
    let _ = TOLERANCE_CELL.set(value.max(Real::EPSILON));
}

// Pi
/// Archimedes' constant (π)
pub const PI: Real = core::f64::consts::PI;
