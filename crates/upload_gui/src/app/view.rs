use eframe::egui;
use upload_core::{ViewModel, WidgetView};

/// Keeps the latest view model for the next frame and owns the preview
/// texture, re-uploading it only when the preview changes.
#[derive(Default)]
pub(crate) struct EguiView {
    model: ViewModel,
    texture: Option<egui::TextureHandle>,
    texture_stale: bool,
}

impl EguiView {
    pub(crate) fn model(&self) -> &ViewModel {
        &self.model
    }

    pub(crate) fn preview_texture(&mut self, ctx: &egui::Context) -> Option<&egui::TextureHandle> {
        if self.texture_stale {
            self.texture_stale = false;
            self.texture = self.model.preview.as_ref().and_then(|preview| {
                let img = preview.image.as_ref()?;
                let size = [img.width as usize, img.height as usize];
                let color = egui::ColorImage::from_rgba_unmultiplied(size, &img.rgba);
                let name = format!("preview:{}", preview.file_name);
                Some(ctx.load_texture(name, color, egui::TextureOptions::LINEAR))
            });
        }
        self.texture.as_ref()
    }
}

impl WidgetView for EguiView {
    fn render(&mut self, model: &ViewModel) {
        if self.model.preview != model.preview {
            self.texture_stale = true;
            if model.preview.is_none() {
                self.texture = None;
            }
        }
        self.model = model.clone();
    }
}
