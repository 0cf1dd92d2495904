//! Rendering: page layout, the 2D context and rasterization onto surfaces

pub mod context;
pub mod layout;
pub mod paint;
pub mod raster;

// Intrinsic size of a surface without width/height attributes, as for an
// HTML canvas.
pub const DEFAULT_SURFACE_WIDTH: u32 = 300;
pub const DEFAULT_SURFACE_HEIGHT: u32 = 150;

/// Largest accepted surface dimension; larger attribute values fall back to
/// the defaults.
pub const MAX_SURFACE_DIMENSION: u32 = 16_384;

/// Largest accepted surface area in pixels (4096x4096, 64 MiB of RGBA).
/// Larger surfaces fall back to the default size.
pub const MAX_SURFACE_AREA: u64 = 4096 * 4096;
