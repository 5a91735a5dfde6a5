pub mod capacity;
pub mod complex;
pub mod error;
pub mod gradient;
pub mod iterator;
pub mod transform;
pub mod viewport;

// Re-export primary types for convenience.
pub use complex::Complex;
pub use error::{CoreError, GradientError};
pub use gradient::{
    ColorMapBuilder, EngineGradientArrays, GradientLimits, GradientStep, RawGradientStep,
};
pub use iterator::{IteratorKind, IteratorSpec, PolarCoefficient};
pub use transform::{
    incremental_zoom, pixel_click_to_plane_point, recenter_and_zoom, CanvasRect, ClickModifiers,
    PlanePoint, ZoomDirection, ZoomModifier,
};
pub use viewport::ViewportState;

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
