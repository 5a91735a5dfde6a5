use eframe::egui;

use jset_core::ZoomDirection;

use crate::app::{JsetApp, HUD_CORNER_RADIUS, HUD_MARGIN};

impl JsetApp {
    pub(crate) fn show_toolbar(&mut self, ctx: &egui::Context) {
        use egui_material_icons::icons::*;

        let icon_on = egui::Color32::from_rgb(200, 200, 200);
        let icon_off = egui::Color32::from_rgb(90, 90, 90);
        let mi_state = |icon: &str, active: bool| {
            egui::RichText::new(icon)
                .size(18.0)
                .color(if active { icon_on } else { icon_off })
        };

        let ready = self.viewer.is_ready();
        let zoom_factor = self.viewer.viewport().zoom_factor;
        let cell = egui::vec2(26.0, 22.0);

        let add_icon_btn =
            |ui: &mut egui::Ui, label: egui::RichText, enabled: bool| -> egui::Response {
                ui.allocate_ui_with_layout(
                    cell,
                    egui::Layout::centered_and_justified(egui::Direction::TopDown),
                    |ui| ui.add_enabled(enabled, egui::Button::new(label).frame(false)),
                )
                .inner
            };

        egui::Area::new(egui::Id::new("hud_toolbar"))
            .anchor(egui::Align2::RIGHT_TOP, [-HUD_MARGIN, HUD_MARGIN])
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_black_alpha(160))
                    .inner_margin(egui::Margin::same(4))
                    .corner_radius(HUD_CORNER_RADIUS)
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.spacing_mut().item_spacing.x = 0.0;

                            if add_icon_btn(ui, mi_state(ICON_ZOOM_IN, ready), ready)
                                .on_hover_text(format!("Zoom in \u{00d7}{zoom_factor}"))
                                .clicked()
                            {
                                self.zoom(ZoomDirection::In);
                            }
                            if add_icon_btn(ui, mi_state(ICON_ZOOM_OUT, ready), ready)
                                .on_hover_text(format!("Zoom out \u{00f7}{zoom_factor}"))
                                .clicked()
                            {
                                self.zoom(ZoomDirection::Out);
                            }
                            if add_icon_btn(ui, mi_state(ICON_SETTINGS, true), true)
                                .on_hover_text("Settings (applied on close)")
                                .clicked()
                            {
                                if self.settings.is_some() {
                                    self.close_settings();
                                } else {
                                    self.open_settings();
                                }
                            }
                            if add_icon_btn(ui, mi_state(ICON_HELP_OUTLINE, true), true)
                                .on_hover_text("Controls")
                                .clicked()
                            {
                                self.show_help = !self.show_help;
                            }
                        });
                    });
            });
    }
}
