use std::sync::mpsc::{self, TryRecvError};

use eframe::egui;
use tracing::{debug, error, info, warn};

use jset_core::{CanvasRect, ClickModifiers, ZoomDirection};
use jset_engine::CpuEngine;
use jset_render::{RenderError, Viewer};

use crate::config::ViewerConfig;
use crate::engine_loader::spawn_engine_loader;
use crate::presenter::TexturePresenter;
use crate::ui::settings::SettingsForm;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub(crate) const HUD_MARGIN: f32 = 8.0;
pub(crate) const HUD_CORNER_RADIUS: f32 = 6.0;

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub(crate) struct JsetApp {
    pub(crate) viewer: Viewer<CpuEngine, TexturePresenter>,
    engine_rx: Option<mpsc::Receiver<CpuEngine>>,
    pub(crate) config: ViewerConfig,

    /// Settings panel state; `Some` while the panel is open.
    pub(crate) settings: Option<SettingsForm>,
    pub(crate) show_help: bool,

    /// Last user-facing problem, shown in the status bar until the next
    /// successful action.
    pub(crate) notice: Option<String>,
    /// Screen rect of the canvas in the last frame.
    pub(crate) canvas_rect: Option<egui::Rect>,
}

impl JsetApp {
    pub(crate) fn new(ctx: &egui::Context, config: ViewerConfig) -> Self {
        let repaint_ctx = ctx.clone();
        let viewer = Viewer::new(
            config.viewport.clone(),
            config.gradient.clone(),
            TexturePresenter::new(ctx.clone()),
            |line: &str| debug!(target: "jset::engine", "{line}"),
            move || {
                error!("Rendering engine faulted");
                repaint_ctx.request_repaint();
            },
        );
        let engine_rx = Some(spawn_engine_loader(ctx.clone(), config.smoothing));

        Self {
            viewer,
            engine_rx,
            config,
            settings: None,
            show_help: false,
            notice: None,
            canvas_rect: None,
        }
    }

    /// Attach the engine once the loader thread delivers it.
    fn poll_engine(&mut self) {
        let Some(rx) = &self.engine_rx else {
            return;
        };
        match rx.try_recv() {
            Ok(engine) => {
                self.engine_rx = None;
                info!("Engine received, drawing initial view");
                let result = self.viewer.engine_loaded(engine);
                self.report(result);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.engine_rx = None;
                error!("Engine loader exited without delivering an engine");
                self.notice = Some("Rendering engine failed to load; see log.".into());
            }
        }
    }

    /// Record the outcome of a viewer call for the status bar.
    pub(crate) fn report(&mut self, result: jset_render::Result<()>) {
        match result {
            Ok(()) => self.notice = None,
            Err(RenderError::EngineNotReady) => {
                warn!("Ignoring request: engine not loaded yet");
                self.notice = Some("Still loading\u{2026}".into());
            }
            Err(RenderError::EngineFault) => {}
            Err(e) => {
                warn!("Request failed: {e}");
                self.notice = Some(e.to_string());
            }
        }
    }

    pub(crate) fn zoom(&mut self, direction: ZoomDirection) {
        let result = self.viewer.on_zoom_button(direction);
        self.report(result);
    }

    pub(crate) fn status_text(&self) -> String {
        if self.viewer.is_faulted() {
            return "Engine fault".into();
        }
        if !self.viewer.is_ready() {
            return "Loading\u{2026}".into();
        }
        if let Some(notice) = &self.notice {
            return notice.clone();
        }
        let vp = self.viewer.viewport();
        let (cx, cy) = vp.center();
        let sep = " \u{00b7} ";
        format!(
            "{}{sep}{}\u{00d7}{}{sep}center {:.6} {:+.6}i{sep}width {:.3e}{sep}zoom \u{00d7}{}",
            vp.iterator.label(),
            vp.pixel_width,
            vp.pixel_height,
            cx,
            cy,
            vp.plane_width,
            vp.zoom_factor
        )
    }

    // -- Canvas -----------------------------------------------------------

    fn show_canvas(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::from_gray(24)))
            .show(ctx, |ui| {
                egui::ScrollArea::both()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        let vp = self.viewer.viewport();
                        let size = egui::vec2(vp.pixel_width as f32, vp.pixel_height as f32);
                        let (response, painter) = ui.allocate_painter(size, egui::Sense::click());
                        self.canvas_rect = Some(response.rect);

                        let uv =
                            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                        if let Some(tex) = self.viewer.presenter().texture() {
                            painter.image(tex.id(), response.rect, uv, egui::Color32::WHITE);
                        } else {
                            painter.rect_filled(response.rect, 0.0, egui::Color32::BLACK);
                        }

                        if let Some(form) = &self.settings {
                            form.paint_size_outline(&painter, response.rect.min);
                        }

                        if response.clicked() {
                            self.handle_canvas_click(ctx, &response);
                        }
                    });
            });
    }

    fn handle_canvas_click(&mut self, ctx: &egui::Context, response: &egui::Response) {
        let Some(pos) = response.interact_pointer_pos() else {
            return;
        };
        let modifiers = ctx.input(|i| ClickModifiers {
            shift: i.modifiers.shift,
            ctrl: i.modifiers.ctrl,
        });
        let rect = response.rect;
        let canvas = CanvasRect::new(
            rect.left() as f64,
            rect.top() as f64,
            rect.width() as f64,
            rect.height() as f64,
        );
        debug!(x = pos.x, y = pos.y, ?modifiers, "Canvas click");
        let result = self
            .viewer
            .on_user_click(pos.x as f64, pos.y as f64, canvas, modifiers);
        self.report(result);
    }

    // -- Overlays ---------------------------------------------------------

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::Area::new(egui::Id::new("hud_status"))
            .anchor(egui::Align2::LEFT_BOTTOM, [HUD_MARGIN, -HUD_MARGIN])
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_black_alpha(170))
                    .inner_margin(egui::Margin::symmetric(8, 4))
                    .corner_radius(HUD_CORNER_RADIUS)
                    .show(ui, |ui| {
                        ui.label(
                            egui::RichText::new(self.status_text())
                                .monospace()
                                .color(egui::Color32::from_rgb(220, 220, 220)),
                        );
                    });
            });
    }

    /// Blocks the whole window once the engine has faulted.
    fn show_fault_overlay(&self, ctx: &egui::Context) {
        let screen = ctx.screen_rect();
        egui::Area::new(egui::Id::new("fault_overlay"))
            .order(egui::Order::Foreground)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                let (rect, _) =
                    ui.allocate_exact_size(screen.size(), egui::Sense::click_and_drag());
                ui.painter()
                    .rect_filled(rect, 0.0, egui::Color32::from_black_alpha(220));
                ui.scope_builder(
                    egui::UiBuilder::new()
                        .max_rect(rect)
                        .layout(egui::Layout::centered_and_justified(egui::Direction::TopDown)),
                    |ui| {
                        ui.label(
                            egui::RichText::new(
                                "The rendering engine hit an unrecoverable error.\n\
                                 Restart the application to continue.",
                            )
                            .size(20.0)
                            .color(egui::Color32::from_rgb(255, 120, 120)),
                        );
                    },
                );
            });
    }
}

impl eframe::App for JsetApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_engine();

        self.show_canvas(ctx);
        self.show_toolbar(ctx);
        self.show_status_bar(ctx);
        self.show_settings_window(ctx);
        self.show_help_window(ctx);

        if self.viewer.is_faulted() {
            self.show_fault_overlay(ctx);
        }
    }
}
