pub mod coordinator;
pub mod engine;
pub mod error;
pub mod log;
pub mod present;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod viewer;

pub use coordinator::{needs_reiterate, RenderCoordinator, RenderPath};
pub use engine::{debug_line, Engine, EngineHost};
pub use error::RenderError;
pub use log::LineBuffer;
pub use present::{PixelFrame, Presenter};
pub use viewer::{SettingsEdits, SettingsOutcome, Viewer};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
