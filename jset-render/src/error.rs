use thiserror::Error;

/// Errors originating from render sequencing.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A render or color operation was issued before the engine finished
    /// loading. Only the offending call is rejected.
    #[error("rendering engine is not loaded yet")]
    EngineNotReady,

    /// The engine signalled an unrecoverable fault; no further calls are
    /// issued.
    #[error("rendering engine faulted")]
    EngineFault,

    #[error("engine pixel buffer holds {actual} bytes, {expected} needed")]
    BufferTooSmall { expected: usize, actual: usize },

    #[error(transparent)]
    Gradient(#[from] jset_core::GradientError),

    #[error(transparent)]
    Core(#[from] jset_core::CoreError),
}
