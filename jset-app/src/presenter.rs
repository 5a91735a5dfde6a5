use eframe::egui;

use jset_render::{PixelFrame, Presenter};

/// Uploads every presented frame as the canvas texture.
pub(crate) struct TexturePresenter {
    ctx: egui::Context,
    texture: Option<egui::TextureHandle>,
}

impl TexturePresenter {
    pub(crate) fn new(ctx: egui::Context) -> Self {
        Self { ctx, texture: None }
    }

    pub(crate) fn texture(&self) -> Option<&egui::TextureHandle> {
        self.texture.as_ref()
    }
}

impl Presenter for TexturePresenter {
    fn present(&mut self, frame: PixelFrame<'_>) {
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [frame.width as usize, frame.height as usize],
            frame.rgba,
        );
        self.texture = Some(
            self.ctx
                .load_texture("fractal", image, egui::TextureOptions::NEAREST),
        );
        self.ctx.request_repaint();
    }
}
