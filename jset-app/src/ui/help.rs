use eframe::egui;

use jset_core::ClickModifiers;

use crate::app::JsetApp;
use crate::app_dir;

/// Click gestures as listed in the help window, with the modifiers each one
/// stands for.
const MOUSE_ACTIONS: &[(&str, ClickModifiers, &str)] = &[
    (
        "Click",
        ClickModifiers {
            shift: false,
            ctrl: false,
        },
        "Center on point, keep zoom",
    ),
    (
        "Shift+Click",
        ClickModifiers {
            shift: true,
            ctrl: false,
        },
        "Center on point and zoom in",
    ),
    (
        "Ctrl+Click",
        ClickModifiers {
            shift: false,
            ctrl: true,
        },
        "Center on point and zoom out",
    ),
];

impl JsetApp {
    pub(crate) fn show_help_window(&mut self, ctx: &egui::Context) {
        if !self.show_help {
            return;
        }

        let mut open = true;
        egui::Window::new("Controls")
            .open(&mut open)
            .resizable(false)
            .default_width(340.0)
            .frame(
                egui::Frame::window(&ctx.style())
                    .fill(egui::Color32::from_rgba_unmultiplied(10, 10, 10, 210)),
            )
            .show(ctx, |ui| {
                ui.style_mut().visuals.override_text_color =
                    Some(egui::Color32::from_rgb(220, 220, 220));

                ui.heading("Mouse");
                ui.add_space(2.0);
                egui::Grid::new("help_mouse")
                    .num_columns(2)
                    .spacing([12.0, 2.0])
                    .show(ui, |ui| {
                        for &(k, _, d) in MOUSE_ACTIONS {
                            ui.label(
                                egui::RichText::new(k).strong().color(egui::Color32::WHITE),
                            );
                            ui.label(d);
                            ui.end_row();
                        }
                    });

                ui.add_space(8.0);
                ui.heading("Toolbar icons");
                ui.add_space(2.0);
                {
                    use egui_material_icons::icons::*;
                    let icons: &[(&str, &str)] = &[
                        (ICON_ZOOM_IN, "Zoom in about the center"),
                        (ICON_ZOOM_OUT, "Zoom out about the center"),
                        (ICON_SETTINGS, "Image size, zoom factor, iterator, color map"),
                        (ICON_HELP_OUTLINE, "This help window"),
                    ];
                    egui::Grid::new("help_toolbar")
                        .num_columns(2)
                        .spacing([12.0, 2.0])
                        .show(ui, |ui| {
                            for &(k, d) in icons {
                                ui.label(
                                    egui::RichText::new(k)
                                        .size(18.0)
                                        .color(egui::Color32::WHITE),
                                );
                                ui.label(d);
                                ui.end_row();
                            }
                        });
                }

                ui.add_space(8.0);
                ui.label("Settings take effect when the settings window is closed.");
                ui.label(format!(
                    "Startup settings are read from {}",
                    app_dir::config_path().display()
                ));
            });

        if !open {
            self.show_help = false;
        }
    }
}
