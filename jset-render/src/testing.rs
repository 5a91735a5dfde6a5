//! Call-recording engine and presenter doubles for exercising the
//! coordinator and viewer without a real engine.

use jset_core::IteratorKind;

use crate::engine::{debug_line, Engine, EngineHost};
use crate::present::{PixelFrame, Presenter};

/// One recorded engine call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Reiterate {
        width: u32,
        height: u32,
        origin_x: f64,
        origin_y: f64,
        plane_width: f64,
        iterator: IteratorKind,
    },
    Recolor(u32, u32),
    SetStep(usize),
    CommitSteps(usize),
    RecomputeTable,
    SetCoefficient { index: usize, re: f64, im: f64 },
    CommitCoefficients(usize),
}

impl Call {
    pub fn is_reiterate(&self) -> bool {
        matches!(self, Call::Reiterate { .. })
    }

    pub fn is_recolor(&self) -> bool {
        matches!(self, Call::Recolor(..))
    }
}

/// Records every call, writes a debug line per reiterate, and can be told
/// to fault on the Nth call.
#[derive(Debug)]
pub struct SpyEngine {
    pub calls: Vec<Call>,
    buffer: Vec<u8>,
    fault_on_call: Option<usize>,
}

impl SpyEngine {
    /// A spy whose buffer fits the largest image.
    pub fn new() -> Self {
        Self::with_buffer_len(
            4 * jset_core::capacity::MAX_PIXEL_WIDTH as usize
                * jset_core::capacity::MAX_PIXEL_HEIGHT as usize,
        )
    }

    pub fn with_buffer_len(len: usize) -> Self {
        Self {
            calls: Vec::new(),
            buffer: vec![0; len],
            fault_on_call: None,
        }
    }

    /// Raise a fault while servicing call number `n` (zero-based).
    pub fn faulting_on_call(mut self, n: usize) -> Self {
        self.fault_on_call = Some(n);
        self
    }

    pub fn reiterate_count(&self) -> usize {
        self.calls.iter().filter(|c| c.is_reiterate()).count()
    }

    pub fn recolor_count(&self) -> usize {
        self.calls.iter().filter(|c| c.is_recolor()).count()
    }

    fn record(&mut self, host: &mut dyn EngineHost, call: Call) {
        let n = self.calls.len();
        self.calls.push(call);
        if self.fault_on_call == Some(n) {
            host.fault();
        }
    }
}

impl Default for SpyEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for SpyEngine {
    fn reiterate_and_render(
        &mut self,
        host: &mut dyn EngineHost,
        pixel_width: u32,
        pixel_height: u32,
        origin_x: f64,
        origin_y: f64,
        plane_width: f64,
        iterator: IteratorKind,
    ) {
        debug_line(host, &format!("reiterate {pixel_width}x{pixel_height}"));
        self.record(
            host,
            Call::Reiterate {
                width: pixel_width,
                height: pixel_height,
                origin_x,
                origin_y,
                plane_width,
                iterator,
            },
        );
    }

    fn recolor(&mut self, host: &mut dyn EngineHost, pixel_width: u32, pixel_height: u32) {
        self.record(host, Call::Recolor(pixel_width, pixel_height));
    }

    fn set_gradient_step(
        &mut self,
        host: &mut dyn EngineHost,
        index: usize,
        _start: [u8; 3],
        _end: [u8; 3],
        _shades: u16,
    ) {
        self.record(host, Call::SetStep(index));
    }

    fn commit_gradient_step_count(&mut self, host: &mut dyn EngineHost, count: usize) {
        self.record(host, Call::CommitSteps(count));
    }

    fn recompute_color_table(&mut self, host: &mut dyn EngineHost) {
        self.record(host, Call::RecomputeTable);
    }

    fn set_polynomial_coefficient(
        &mut self,
        host: &mut dyn EngineHost,
        index: usize,
        re: f64,
        im: f64,
    ) {
        self.record(host, Call::SetCoefficient { index, re, im });
    }

    fn commit_coefficient_count(&mut self, host: &mut dyn EngineHost, count: usize) {
        self.record(host, Call::CommitCoefficients(count));
    }

    fn pixel_buffer(&self) -> &[u8] {
        &self.buffer
    }
}

/// Counts presented frames and remembers the size of the last one.
#[derive(Debug, Default)]
pub struct NullPresenter {
    pub frames: usize,
    pub last_size: Option<(u32, u32)>,
}

impl Presenter for NullPresenter {
    fn present(&mut self, frame: PixelFrame<'_>) {
        self.frames += 1;
        self.last_size = Some((frame.width, frame.height));
    }
}
