use tracing::{debug, error};

use jset_core::{EngineGradientArrays, ViewportState};

use crate::engine::{Engine, EngineHost};
use crate::error::RenderError;
use crate::log::LineBuffer;
use crate::present::{PixelFrame, Presenter};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which kind of pass a settings change required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPath {
    /// Full per-pixel iteration, then coloring.
    Reiterate,
    /// Re-coloring of the existing iteration data only.
    Recolor,
}

/// Receives the engine's signals on behalf of the coordinator.
struct HostBridge {
    log: LineBuffer,
    on_fault: Box<dyn FnMut()>,
    faulted: bool,
}

impl EngineHost for HostBridge {
    fn debug_byte(&mut self, byte: u8) {
        self.log.push(byte);
    }

    fn fault(&mut self) {
        if self.faulted {
            return;
        }
        self.faulted = true;
        error!("Rendering engine faulted; no further engine calls will be made");
        (self.on_fault)();
    }
}

impl HostBridge {
    fn check(&self) -> crate::Result<()> {
        if self.faulted {
            Err(RenderError::EngineFault)
        } else {
            Ok(())
        }
    }
}

/// Reiteration is needed only when the image size or the iterator changed.
/// Zoom-factor edits and gradient edits can always be served by a recolor.
pub fn needs_reiterate(current: &ViewportState, candidate: &ViewportState) -> bool {
    current.iteration_inputs_differ(candidate)
}

// ---------------------------------------------------------------------------
// RenderCoordinator
// ---------------------------------------------------------------------------

/// Sequences calls into the rendering engine and hands each finished frame
/// to the presenter.
///
/// Until [`attach_engine`](Self::attach_engine) is called every operation
/// fails with [`RenderError::EngineNotReady`]. Once the engine faults every
/// operation fails with [`RenderError::EngineFault`] without touching the
/// engine.
pub struct RenderCoordinator<E, P> {
    engine: Option<E>,
    presenter: P,
    host: HostBridge,
}

impl<E: Engine, P: Presenter> RenderCoordinator<E, P> {
    /// `log_sink` receives the engine's debug output one line at a time;
    /// `on_fault` runs once, the first time the engine faults.
    pub fn new(
        presenter: P,
        log_sink: impl FnMut(&str) + 'static,
        on_fault: impl FnMut() + 'static,
    ) -> Self {
        Self {
            engine: None,
            presenter,
            host: HostBridge {
                log: LineBuffer::new(log_sink),
                on_fault: Box::new(on_fault),
                faulted: false,
            },
        }
    }

    /// Install the loaded engine. Operations are accepted from now on.
    pub fn attach_engine(&mut self, engine: E) {
        debug!("Engine attached");
        self.engine = Some(engine);
    }

    pub fn is_ready(&self) -> bool {
        self.engine.is_some() && !self.host.faulted
    }

    pub fn is_faulted(&self) -> bool {
        self.host.faulted
    }

    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Fail fast unless the engine is loaded and healthy.
    pub fn ensure_ready(&self) -> crate::Result<()> {
        self.host.check()?;
        if self.engine.is_none() {
            return Err(RenderError::EngineNotReady);
        }
        Ok(())
    }

    fn parts(&mut self) -> crate::Result<(&mut E, &mut HostBridge)> {
        self.host.check()?;
        let engine = self.engine.as_mut().ok_or(RenderError::EngineNotReady)?;
        Ok((engine, &mut self.host))
    }

    /// Full reiterate-and-display cycle for `viewport`.
    ///
    /// Polynomial coefficients are pushed first, so the engine iterates with
    /// the parameters belonging to this view.
    pub fn apply_viewport_change(&mut self, viewport: &ViewportState) -> crate::Result<()> {
        let (engine, host) = self.parts()?;

        let coefficients = viewport.iterator.engine_coefficients();
        if !coefficients.is_empty() {
            for (n, c) in coefficients.iter().enumerate() {
                engine.set_polynomial_coefficient(host, n, c.re, c.im);
                host.check()?;
            }
            engine.commit_coefficient_count(host, coefficients.len());
            host.check()?;
        }

        debug!(
            width = viewport.pixel_width,
            height = viewport.pixel_height,
            x = viewport.origin_x,
            y = viewport.origin_y,
            plane_width = viewport.plane_width,
            iterator = viewport.iterator.label(),
            "Reiterating"
        );
        engine.reiterate_and_render(
            host,
            viewport.pixel_width,
            viewport.pixel_height,
            viewport.origin_x,
            viewport.origin_y,
            viewport.plane_width,
            viewport.iterator.kind(),
        );
        host.check()?;

        self.display(viewport.pixel_width, viewport.pixel_height)
    }

    /// Push a gradient into the engine and rebuild its color table, without
    /// redrawing anything.
    pub fn load_color_map(&mut self, arrays: &EngineGradientArrays) -> crate::Result<()> {
        let (engine, host) = self.parts()?;
        for (n, step) in arrays.steps().enumerate() {
            engine.set_gradient_step(host, n, step.start, step.end, step.shades);
            host.check()?;
        }
        engine.commit_gradient_step_count(host, arrays.step_count);
        host.check()?;
        engine.recompute_color_table(host);
        host.check()?;
        debug!(steps = arrays.step_count, "Color table recomputed");
        Ok(())
    }

    /// Install a new gradient and recolor the current image with it.
    ///
    /// Never reiterates: the existing per-pixel iteration data is reused.
    pub fn apply_color_map_change(
        &mut self,
        arrays: &EngineGradientArrays,
        viewport: &ViewportState,
    ) -> crate::Result<()> {
        self.load_color_map(arrays)?;
        self.recolor(viewport)
    }

    /// Recolor the current iteration data with the loaded color table and
    /// display it.
    pub fn recolor(&mut self, viewport: &ViewportState) -> crate::Result<()> {
        let (engine, host) = self.parts()?;
        debug!(
            width = viewport.pixel_width,
            height = viewport.pixel_height,
            "Recoloring"
        );
        engine.recolor(host, viewport.pixel_width, viewport.pixel_height);
        host.check()?;

        self.display(viewport.pixel_width, viewport.pixel_height)
    }

    /// Read back the drawn region and hand it to the presenter.
    fn display(&mut self, width: u32, height: u32) -> crate::Result<()> {
        let engine = self.engine.as_ref().ok_or(RenderError::EngineNotReady)?;
        let buffer = engine.pixel_buffer();
        let frame = PixelFrame::from_buffer(buffer, width, height).ok_or(
            RenderError::BufferTooSmall {
                expected: 4 * width as usize * height as usize,
                actual: buffer.len(),
            },
        )?;
        self.presenter.present(frame);
        Ok(())
    }
}

impl<E, P> std::fmt::Debug for RenderCoordinator<E, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderCoordinator")
            .field("engine_loaded", &self.engine.is_some())
            .field("faulted", &self.host.faulted)
            .finish_non_exhaustive()
    }
}
