use eframe::egui;
use tracing::{debug, warn};

use jset_core::capacity::{
    MAX_COEFFICIENTS, MAX_GRADIENT_STEPS, MAX_PIXEL_HEIGHT, MAX_PIXEL_WIDTH, MAX_SHADES_PER_STEP,
    MAX_TOTAL_SHADES,
};
use jset_core::gradient::{format_hex_color, next_default_step, parse_hex_color};
use jset_core::{IteratorSpec, PolarCoefficient, RawGradientStep, ViewportState};
use jset_render::SettingsEdits;

use crate::app::JsetApp;
use crate::config::PolynomialDefaults;

const OUTLINE_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 210, 70);
const KEPT: &str = "The current color map will be kept.";

// ---------------------------------------------------------------------------
// Form state
// ---------------------------------------------------------------------------

/// One editable gradient row.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GradientRow {
    pub(crate) start: [u8; 3],
    pub(crate) shades: i64,
    pub(crate) end: [u8; 3],
}

impl GradientRow {
    fn from_raw(raw: &RawGradientStep) -> Self {
        Self {
            start: parse_hex_color(&raw.start),
            shades: raw.shades,
            end: parse_hex_color(&raw.end),
        }
    }

    fn to_raw(&self) -> RawGradientStep {
        RawGradientStep::new(format_hex_color(self.start), self.shades, format_hex_color(self.end))
    }
}

/// Contents of the settings panel while it is open.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SettingsForm {
    pub(crate) pixel_width: u32,
    pub(crate) pixel_height: u32,
    pub(crate) zoom_factor: f64,
    pub(crate) use_polynomial: bool,
    pub(crate) coefficient_count: usize,
    /// Always `MAX_COEFFICIENTS` slots; only the first `coefficient_count`
    /// are sent.
    pub(crate) coefficients: Vec<PolarCoefficient>,
    pub(crate) rows: Vec<GradientRow>,
    drawn_size: (u32, u32),
}

impl SettingsForm {
    /// Fill the form from the live view and color map. Polynomial inputs
    /// not covered by the active iterator keep their configured defaults.
    pub(crate) fn seed(
        viewport: &ViewportState,
        rows: &[RawGradientStep],
        defaults: &PolynomialDefaults,
    ) -> Self {
        let mut coefficients = defaults.coefficients.clone();
        coefficients.resize(MAX_COEFFICIENTS, PolarCoefficient::new(0.0, 0.0));
        let mut coefficient_count = defaults.count.clamp(1, MAX_COEFFICIENTS);
        let mut use_polynomial = false;

        if let IteratorSpec::Polynomial { coefficients: active } = &viewport.iterator {
            for (slot, c) in coefficients.iter_mut().zip(active) {
                *slot = *c;
            }
            coefficient_count = active.len().clamp(1, MAX_COEFFICIENTS);
            use_polynomial = true;
        }

        Self {
            pixel_width: viewport.pixel_width,
            pixel_height: viewport.pixel_height,
            zoom_factor: viewport.zoom_factor,
            use_polynomial,
            coefficient_count,
            coefficients,
            rows: rows.iter().map(GradientRow::from_raw).collect(),
            drawn_size: (viewport.pixel_width, viewport.pixel_height),
        }
    }

    pub(crate) fn edits(&self) -> SettingsEdits {
        let iterator = if self.use_polynomial {
            IteratorSpec::Polynomial {
                coefficients: self.coefficients[..self.coefficient_count].to_vec(),
            }
        } else {
            IteratorSpec::Mandelbrot
        };
        SettingsEdits {
            pixel_width: self.pixel_width,
            pixel_height: self.pixel_height,
            zoom_factor: self.zoom_factor,
            iterator,
        }
    }

    pub(crate) fn raw_rows(&self) -> Vec<RawGradientStep> {
        self.rows.iter().map(GradientRow::to_raw).collect()
    }

    pub(crate) fn add_row(&mut self) {
        let next = next_default_step(&self.raw_rows());
        self.rows.push(GradientRow::from_raw(&next));
    }

    pub(crate) fn size_changed(&self) -> bool {
        (self.pixel_width, self.pixel_height) != self.drawn_size
    }

    /// Problems that will make the color map be rejected on close.
    pub(crate) fn gradient_warning(&self) -> Option<String> {
        if self.rows.len() > MAX_GRADIENT_STEPS {
            return Some(format!(
                "{} colors; at most {MAX_GRADIENT_STEPS} are allowed. {KEPT}",
                self.rows.len()
            ));
        }
        let total: i64 = self
            .rows
            .iter()
            .map(|r| r.shades.clamp(0, MAX_SHADES_PER_STEP as i64))
            .sum();
        if total > MAX_TOTAL_SHADES as i64 {
            return Some(format!("{total} shades; at most {MAX_TOTAL_SHADES} are allowed. {KEPT}"));
        }
        None
    }

    /// Dashed preview of the new canvas size, anchored at the canvas corner.
    pub(crate) fn paint_size_outline(&self, painter: &egui::Painter, origin: egui::Pos2) {
        if !self.size_changed() {
            return;
        }
        let rect = egui::Rect::from_min_size(
            origin,
            egui::vec2(self.pixel_width as f32, self.pixel_height as f32),
        );
        let points = [
            rect.left_top(),
            rect.right_top(),
            rect.right_bottom(),
            rect.left_bottom(),
            rect.left_top(),
        ];
        painter.extend(egui::Shape::dashed_line(
            &points,
            egui::Stroke::new(1.5, OUTLINE_COLOR),
            6.0,
            4.0,
        ));
    }

    /// Draw the form. Returns true when "Apply" was pressed.
    fn ui(&mut self, ui: &mut egui::Ui) -> bool {
        use egui_material_icons::icons::*;

        ui.heading("Image");
        egui::Grid::new("settings_image")
            .num_columns(2)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                ui.label("Width (px)");
                ui.add(egui::DragValue::new(&mut self.pixel_width).range(1..=MAX_PIXEL_WIDTH));
                ui.end_row();

                ui.label("Height (px)");
                ui.add(egui::DragValue::new(&mut self.pixel_height).range(1..=MAX_PIXEL_HEIGHT));
                ui.end_row();

                ui.label("Zoom factor");
                ui.horizontal(|ui| {
                    ui.add(
                        egui::Slider::new(&mut self.zoom_factor, 1.1..=10.0)
                            .logarithmic(true)
                            .clamping(egui::SliderClamping::Edits)
                            .show_value(false),
                    );
                    ui.add(
                        egui::DragValue::new(&mut self.zoom_factor)
                            .range(0.01..=1000.0)
                            .speed(0.01),
                    );
                });
                ui.end_row();
            });

        ui.add_space(10.0);
        ui.heading("Iterator");
        ui.horizontal(|ui| {
            ui.radio_value(&mut self.use_polynomial, false, "Mandelbrot");
            ui.radio_value(&mut self.use_polynomial, true, "Polynomial");
        });
        ui.add_enabled_ui(self.use_polynomial, |ui| {
            ui.horizontal(|ui| {
                ui.label("Terms:");
                for n in 1..=MAX_COEFFICIENTS {
                    ui.radio_value(&mut self.coefficient_count, n, n.to_string());
                }
            });
            egui::Grid::new("settings_coefficients")
                .num_columns(3)
                .spacing([12.0, 2.0])
                .show(ui, |ui| {
                    ui.label("");
                    ui.label("r");
                    ui.label("t (\u{00d7}\u{03c0})");
                    ui.end_row();
                    for (k, c) in self.coefficients.iter_mut().enumerate() {
                        let active = k < self.coefficient_count;
                        ui.label(format!("z^{k}"));
                        ui.add_enabled(active, egui::DragValue::new(&mut c.r).speed(0.001));
                        ui.add_enabled(active, egui::DragValue::new(&mut c.t).speed(0.001));
                        ui.end_row();
                    }
                });
        });

        ui.add_space(10.0);
        ui.heading("Color map");
        let mut remove = None;
        egui::Grid::new("settings_gradient")
            .num_columns(4)
            .spacing([8.0, 2.0])
            .show(ui, |ui| {
                ui.label("Start");
                ui.label("Shades");
                ui.label("End");
                ui.label("");
                ui.end_row();
                for (n, row) in self.rows.iter_mut().enumerate() {
                    ui.color_edit_button_srgb(&mut row.start);
                    ui.add(
                        egui::DragValue::new(&mut row.shades)
                            .range(0..=MAX_SHADES_PER_STEP as i64),
                    );
                    ui.color_edit_button_srgb(&mut row.end);
                    if ui
                        .small_button(ICON_DELETE)
                        .on_hover_text("Remove color")
                        .clicked()
                    {
                        remove = Some(n);
                    }
                    ui.end_row();
                }
            });
        if let Some(n) = remove {
            self.rows.remove(n);
        }
        if ui.button(format!("{ICON_ADD} Add color")).clicked() {
            self.add_row();
        }
        if let Some(warning) = self.gradient_warning() {
            ui.colored_label(egui::Color32::from_rgb(255, 170, 60), warning);
        }

        ui.add_space(10.0);
        ui.separator();
        ui.button(format!("{ICON_CHECK} Apply")).clicked()
    }
}

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

impl JsetApp {
    pub(crate) fn open_settings(&mut self) {
        self.settings = Some(SettingsForm::seed(
            self.viewer.viewport(),
            self.viewer.gradient_rows(),
            &self.config.polynomial,
        ));
    }

    pub(crate) fn show_settings_window(&mut self, ctx: &egui::Context) {
        let Some(form) = self.settings.as_mut() else {
            return;
        };

        let mut open = true;
        let mut apply = false;
        egui::Window::new("Settings")
            .open(&mut open)
            .resizable(true)
            .default_width(360.0)
            .frame(
                egui::Frame::window(&ctx.style())
                    .fill(egui::Color32::from_rgba_unmultiplied(10, 10, 10, 220)),
            )
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    apply = form.ui(ui);
                });
            });

        if !open || apply {
            self.close_settings();
        }
    }

    /// Closing the panel is what applies it.
    pub(crate) fn close_settings(&mut self) {
        let Some(form) = self.settings.take() else {
            return;
        };
        let rows = form.raw_rows();
        match self.viewer.on_settings_close(form.edits(), &rows) {
            Ok(outcome) => {
                debug!(path = ?outcome.path, "Settings closed");
                match outcome.gradient {
                    Ok(()) => self.notice = None,
                    Err(e) => {
                        warn!("Color map rejected: {e}");
                        self.notice = Some(format!("Color map rejected: {e}"));
                    }
                }
            }
            Err(e) => self.report(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jset_core::gradient::default_gradient;

    fn form() -> SettingsForm {
        SettingsForm::seed(
            &ViewportState::default(),
            &default_gradient(),
            &PolynomialDefaults::default(),
        )
    }

    #[test]
    fn seed_from_mandelbrot_view_uses_polynomial_defaults() {
        let f = form();
        assert!(!f.use_polynomial);
        assert_eq!(f.coefficient_count, 3);
        assert_eq!(f.coefficients.len(), MAX_COEFFICIENTS);
        assert_eq!(f.edits().iterator, IteratorSpec::Mandelbrot);
        assert!(!f.size_changed());
    }

    #[test]
    fn seed_from_polynomial_view_uses_active_coefficients() {
        let it = IteratorSpec::polynomial(vec![
            PolarCoefficient::new(0.25, 0.5),
            PolarCoefficient::new(1.0, 0.0),
        ])
        .unwrap();
        let vp = ViewportState::default().with_iterator(it.clone());
        let f = SettingsForm::seed(&vp, &[], &PolynomialDefaults::default());
        assert!(f.use_polynomial);
        assert_eq!(f.coefficient_count, 2);
        assert_eq!(f.edits().iterator, it);
    }

    #[test]
    fn edits_send_only_active_coefficients() {
        let mut f = form();
        f.use_polynomial = true;
        f.coefficient_count = 2;
        match f.edits().iterator {
            IteratorSpec::Polynomial { coefficients } => {
                assert_eq!(coefficients.len(), 2);
                assert_eq!(coefficients[0], PolarCoefficient::new(0.8151, 0.9387));
            }
            other => panic!("expected polynomial, got {other:?}"),
        }
    }

    #[test]
    fn rows_round_trip_through_hex() {
        let f = form();
        assert_eq!(f.raw_rows(), default_gradient());
    }

    #[test]
    fn add_row_continues_from_last_end_color() {
        let mut f = form();
        f.rows[1].end = [0x12, 0x34, 0x56];
        f.add_row();
        let last = f.rows.last().unwrap();
        assert_eq!(last.start, [0x12, 0x34, 0x56]);
        assert_eq!(last.shades, 256);
        assert_eq!(last.end, [0, 0, 0]);
    }

    #[test]
    fn warns_about_too_many_rows() {
        let mut f = form();
        assert!(f.gradient_warning().is_none());
        while f.rows.len() <= MAX_GRADIENT_STEPS {
            f.add_row();
        }
        assert!(f.gradient_warning().is_some());
    }

    #[test]
    fn size_edit_is_detected() {
        let mut f = form();
        f.pixel_width = 640;
        assert!(f.size_changed());
    }
}
