use thiserror::Error;

/// A gradient that breaks one of the color-table bounds.
///
/// Rejection is all-or-nothing: the previously committed color map stays
/// in effect and nothing is sent to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GradientError {
    #[error("too many steps in color map: {count} (max {max})")]
    TooManySteps { count: usize, max: usize },

    #[error("too many shades in color map: {total} (max {max})")]
    TooManyShades { total: u32, max: u32 },
}

/// Errors originating from view-state and parameter validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("invalid viewport: {reason}")]
    InvalidViewport { reason: String },

    #[error("invalid iterator: {reason}")]
    InvalidIterator { reason: String },

    #[error(transparent)]
    Gradient(#[from] GradientError),
}
