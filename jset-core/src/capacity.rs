//! Fixed capacities of the rendering engine's static tables.
//!
//! The engine owns fixed-size buffers; everything this crate validates or
//! clamps against comes from here.

/// Largest image width the engine's pixel buffer holds.
pub const MAX_PIXEL_WIDTH: u32 = 1920;
/// Largest image height the engine's pixel buffer holds.
pub const MAX_PIXEL_HEIGHT: u32 = 1080;

/// Number of entries in the engine's gradient table.
pub const MAX_GRADIENT_STEPS: usize = 16;
/// Upper bound on a single step's shade count after intake clamping.
pub const MAX_SHADES_PER_STEP: u16 = 255;
/// Largest total shade count across all steps.
///
/// Iteration counts are stored as `u16` and the table length doubles as the
/// iteration limit, so the budget stays below `u16::MAX`.
pub const MAX_TOTAL_SHADES: u32 = 65_534;
/// Length of the engine's expanded color table.
pub const COLOR_TABLE_CAPACITY: usize = 65_536;

/// Polynomial coefficient slots (constant term through the sextic term).
pub const MAX_COEFFICIENTS: usize = 7;
