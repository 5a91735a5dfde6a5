pub mod color_table;
pub mod cpu;
pub mod iterate;
pub mod smooth;

pub use color_table::{ColorTable, DEFAULT_COLOR};
pub use cpu::{CpuEngine, EngineStats};
pub use iterate::{Iteration, PlaneGrid, SQ_MOD_LIMIT};
