use tracing::{debug, info, warn};

use jset_core::{
    incremental_zoom, pixel_click_to_plane_point, recenter_and_zoom, CanvasRect, ClickModifiers,
    ColorMapBuilder, GradientError, GradientLimits, IteratorSpec, RawGradientStep,
    ViewportState, ZoomDirection,
};

use crate::coordinator::{needs_reiterate, RenderCoordinator, RenderPath};
use crate::engine::Engine;
use crate::present::Presenter;

// ---------------------------------------------------------------------------
// Settings form types
// ---------------------------------------------------------------------------

/// The view fields edited in the settings panel.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsEdits {
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub zoom_factor: f64,
    pub iterator: IteratorSpec,
}

impl SettingsEdits {
    /// Form contents matching `viewport`, used to seed the panel.
    pub fn from_viewport(viewport: &ViewportState) -> Self {
        Self {
            pixel_width: viewport.pixel_width,
            pixel_height: viewport.pixel_height,
            zoom_factor: viewport.zoom_factor,
            iterator: viewport.iterator.clone(),
        }
    }
}

/// What closing the settings panel did.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsOutcome {
    pub path: RenderPath,
    /// `Err` when the edited gradient was rejected and the previous color
    /// map stayed active.
    pub gradient: Result<(), GradientError>,
}

// ---------------------------------------------------------------------------
// Viewer
// ---------------------------------------------------------------------------

/// The facade handed to the presentation layer.
///
/// Owns the current [`ViewportState`] and the gradient rows of the active
/// color map, and routes every gesture through the coordinate transforms
/// and the [`RenderCoordinator`]. State is replaced only after the engine
/// accepted the corresponding render, so a rejected operation leaves it
/// untouched.
pub struct Viewer<E, P> {
    viewport: ViewportState,
    gradient_rows: Vec<RawGradientStep>,
    builder: ColorMapBuilder,
    coordinator: RenderCoordinator<E, P>,
}

impl<E: Engine, P: Presenter> Viewer<E, P> {
    pub fn new(
        viewport: ViewportState,
        gradient_rows: Vec<RawGradientStep>,
        presenter: P,
        log_sink: impl FnMut(&str) + 'static,
        on_fault: impl FnMut() + 'static,
    ) -> Self {
        Self {
            viewport,
            gradient_rows,
            builder: ColorMapBuilder::default(),
            coordinator: RenderCoordinator::new(presenter, log_sink, on_fault),
        }
    }

    /// Replace the gradient bounds (defaults to the engine's capacity).
    pub fn with_gradient_limits(mut self, limits: GradientLimits) -> Self {
        self.builder = ColorMapBuilder::new(limits);
        self
    }

    /// Attach the freshly loaded engine, load the current gradient and draw
    /// the current view.
    ///
    /// An unusable startup gradient is logged and skipped; the engine then
    /// colors every pixel with its default color.
    pub fn engine_loaded(&mut self, engine: E) -> crate::Result<()> {
        info!(
            width = self.viewport.pixel_width,
            height = self.viewport.pixel_height,
            "Rendering engine loaded"
        );
        self.coordinator.attach_engine(engine);
        match self.builder.build(&self.gradient_rows) {
            Ok(arrays) => self.coordinator.load_color_map(&arrays)?,
            Err(e) => warn!("Startup gradient rejected: {e}"),
        }
        self.coordinator.apply_viewport_change(&self.viewport)
    }

    pub fn current_viewport(&self) -> ViewportState {
        self.viewport.clone()
    }

    /// Borrowing form of [`current_viewport`](Self::current_viewport).
    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    /// The rows of the color map currently loaded in the engine.
    pub fn gradient_rows(&self) -> &[RawGradientStep] {
        &self.gradient_rows
    }

    pub fn is_ready(&self) -> bool {
        self.coordinator.is_ready()
    }

    pub fn is_faulted(&self) -> bool {
        self.coordinator.is_faulted()
    }

    pub fn coordinator(&self) -> &RenderCoordinator<E, P> {
        &self.coordinator
    }

    pub fn presenter(&self) -> &P {
        self.coordinator.presenter()
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        self.coordinator.presenter_mut()
    }

    /// Recenter on the clicked pixel; shift zooms in and ctrl zooms out by
    /// the current zoom factor.
    pub fn on_user_click(
        &mut self,
        pixel_x: f64,
        pixel_y: f64,
        canvas_rect: CanvasRect,
        modifiers: ClickModifiers,
    ) -> crate::Result<()> {
        self.coordinator.ensure_ready()?;
        let point = pixel_click_to_plane_point(pixel_x, pixel_y, canvas_rect, &self.viewport);
        let next = recenter_and_zoom(point, modifiers.zoom_modifier(), &self.viewport);
        self.install_view(next)
    }

    /// Zoom about the view center by the current zoom factor.
    pub fn on_zoom_button(&mut self, direction: ZoomDirection) -> crate::Result<()> {
        self.coordinator.ensure_ready()?;
        let next = incremental_zoom(direction, &self.viewport);
        self.install_view(next)
    }

    /// Apply the settings form.
    ///
    /// Reiterates when the image size or the iterator changed and recolors
    /// otherwise, even when nothing changed. The zoom factor is installed
    /// either way. A rejected gradient is reported in the outcome and keeps
    /// the active rows; on the reiterate path the view change still goes
    /// ahead with the previous color map.
    ///
    /// Edited rows become the active rows as soon as the engine has taken
    /// the color map, so they stay in step with the engine even when the
    /// redraw that follows fails.
    pub fn on_settings_close(
        &mut self,
        edits: SettingsEdits,
        rows: &[RawGradientStep],
    ) -> crate::Result<SettingsOutcome> {
        let candidate = self
            .viewport
            .with_pixel_size(edits.pixel_width, edits.pixel_height)
            .with_zoom_factor(edits.zoom_factor)
            .with_iterator(edits.iterator);
        candidate.validate()?;
        self.coordinator.ensure_ready()?;

        let gradient = self.builder.build(rows);
        if let Err(e) = &gradient {
            warn!("Keeping previous color map: {e}");
        }

        let path = if needs_reiterate(&self.viewport, &candidate) {
            if let Ok(arrays) = &gradient {
                self.coordinator.load_color_map(arrays)?;
                self.gradient_rows = rows.to_vec();
            }
            self.coordinator.apply_viewport_change(&candidate)?;
            RenderPath::Reiterate
        } else {
            if let Ok(arrays) = &gradient {
                self.coordinator.load_color_map(arrays)?;
                self.gradient_rows = rows.to_vec();
                self.coordinator.recolor(&candidate)?;
            }
            RenderPath::Recolor
        };

        debug!(?path, zoom_factor = candidate.zoom_factor, "Settings applied");
        self.viewport = candidate;
        Ok(SettingsOutcome {
            path,
            gradient: gradient.map(|_| ()),
        })
    }

    /// Views that fail validation (a zoom run out to an infinite or zero
    /// width) are refused before reaching the engine.
    fn install_view(&mut self, next: ViewportState) -> crate::Result<()> {
        if let Err(e) = next.validate() {
            warn!("Refusing view change: {e}");
            return Err(e.into());
        }
        self.coordinator.apply_viewport_change(&next)?;
        debug!(
            x = next.origin_x,
            y = next.origin_y,
            plane_width = next.plane_width,
            "View updated"
        );
        self.viewport = next;
        Ok(())
    }
}

impl<E, P> std::fmt::Debug for Viewer<E, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewer")
            .field("viewport", &self.viewport)
            .field("gradient_rows", &self.gradient_rows)
            .field("coordinator", &self.coordinator)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{NullPresenter, SpyEngine};
    use crate::RenderError;
    use jset_core::gradient::default_gradient;

    fn viewer() -> Viewer<SpyEngine, NullPresenter> {
        Viewer::new(
            ViewportState::default(),
            default_gradient(),
            NullPresenter::default(),
            |_| {},
            || {},
        )
    }

    #[test]
    fn click_before_load_is_rejected_and_state_kept() {
        let mut v = viewer();
        let rect = CanvasRect::new(0.0, 0.0, 1200.0, 800.0);
        let err = v
            .on_user_click(10.0, 10.0, rect, ClickModifiers::default())
            .unwrap_err();
        assert!(matches!(err, RenderError::EngineNotReady));
        assert_eq!(v.current_viewport(), ViewportState::default());
    }

    #[test]
    fn engine_loaded_loads_gradient_then_renders() {
        let mut v = viewer();
        v.engine_loaded(SpyEngine::new()).unwrap();
        let engine = v.coordinator().engine().unwrap();
        assert_eq!(engine.reiterate_count(), 1);
        assert_eq!(engine.recolor_count(), 0);
        assert_eq!(v.presenter().frames, 1);
        assert_eq!(v.presenter().last_size, Some((1200, 800)));
    }

    #[test]
    fn settings_edits_seed_from_viewport() {
        let vp = ViewportState::default();
        let edits = SettingsEdits::from_viewport(&vp);
        assert_eq!(edits.pixel_width, 1200);
        assert_eq!(edits.zoom_factor, 2.0);
        assert_eq!(edits.iterator, IteratorSpec::Mandelbrot);
    }
}
