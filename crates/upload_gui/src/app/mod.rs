//! Desktop front-end: binds the picker, buttons and panels to the widget.

mod settings;
mod view;

use anyhow::{Context, Result};
use directories_next::ProjectDirs;
use eframe::{App, Frame, egui};
use rfd::FileDialog;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use upload_core::view::RESULT_HEADING;
use upload_core::{
    ClientConfig, HttpPredictClient, SelectedFile, SubmissionDispatcher, UploadWidget,
};
use view::EguiView;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];
const PREVIEW_SIZE: f32 = 320.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Panel {
    Upload,
    Settings,
}

pub struct UiApp {
    widget: UploadWidget<EguiView>,
    dispatcher: SubmissionDispatcher,
    config: ClientConfig,
    config_path: Option<PathBuf>,
    panel: Panel,
    status: String,
    app_version: &'static str,
    // Settings form, applied on "Save & apply"
    pending_base_url: String,
    pending_field_name: String,
    pending_timeout_secs: u64,
}

impl UiApp {
    pub fn new() -> Result<Self> {
        let config_path = config_file_path();
        let mut status = String::new();
        let config = match &config_path {
            Some(path) => ClientConfig::load(path).unwrap_or_else(|e| {
                tracing::warn!("Falling back to default config: {e:#}");
                status = format!("Config ignored: {e:#}");
                ClientConfig::default()
            }),
            None => ClientConfig::default(),
        };
        let client = HttpPredictClient::new(&config).context("cannot build HTTP client")?;
        tracing::info!("Predictions go to {}", client.endpoint());

        let mut app = Self {
            widget: UploadWidget::new(EguiView::default()),
            dispatcher: SubmissionDispatcher::new(Arc::new(client)),
            config,
            config_path,
            panel: Panel::Upload,
            status,
            app_version: env!("VERIFY_VERSION"),
            pending_base_url: String::new(),
            pending_field_name: String::new(),
            pending_timeout_secs: 0,
        };
        app.reset_settings_form();
        Ok(app)
    }

    fn pick_image(&mut self) {
        let Some(path) = FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .set_directory(".")
            .pick_file()
        else {
            self.widget.on_file_selected(None);
            self.status.clear();
            return;
        };
        match SelectedFile::from_path(&path) {
            Ok(file) => {
                self.status = format!("Selected {}", path.display());
                self.widget.on_file_selected(Some(file));
            }
            Err(e) => {
                tracing::warn!("{e:#}");
                self.status = format!("Could not read image: {e:#}");
                self.widget.on_file_selected(None);
            }
        }
    }

    fn render_upload_panel(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let vm = self.widget.view().model().clone();

        if !vm.error_message.is_empty() {
            ui.colored_label(egui::Color32::from_rgb(220, 70, 70), &vm.error_message);
            ui.add_space(6.0);
        }

        if let Some(preview) = &vm.preview {
            ui.group(|ui| {
                let desired = egui::Vec2::splat(PREVIEW_SIZE);
                if let Some(tex) = self.widget.view_mut().preview_texture(ctx) {
                    ui.add(egui::Image::from_texture(tex).max_size(desired));
                } else {
                    let (resp, painter) = ui.allocate_painter(desired, egui::Sense::hover());
                    let r = resp.rect;
                    painter.rect_filled(r, 4.0, egui::Color32::from_gray(40));
                    painter.rect_stroke(
                        r,
                        4.0,
                        egui::Stroke::new(1.0, egui::Color32::DARK_GRAY),
                        egui::StrokeKind::Inside,
                    );
                }
                ui.label(&preview.file_name);
            });
            ui.add_space(6.0);
        }

        if let Some(result) = &vm.result {
            ui.group(|ui| {
                ui.heading(RESULT_HEADING);
                ui.label(result.prediction_line());
                ui.label(result.confidence_line());
            });
        }

        if vm.preview.is_none() && vm.result.is_none() && vm.error_message.is_empty() {
            ui.weak("Choose an image, preview it, then upload it for a prediction.");
        }
    }
}

impl App for UiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.dispatcher.poll(&mut self.widget);
        if self.widget.state().is_submitting() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Choose image...").clicked() {
                    self.pick_image();
                }

                if ui.button("Preview").clicked() {
                    self.widget.request_preview();
                }

                let vm = self.widget.view().model();
                let (enabled, label) = (vm.submit_enabled, vm.submit_label);
                if ui
                    .add_enabled(enabled, egui::Button::new(label))
                    .clicked()
                {
                    self.dispatcher.submit(&mut self.widget);
                }

                ui.separator();
                ui.selectable_value(&mut self.panel, Panel::Upload, "Upload");
                if ui
                    .selectable_value(&mut self.panel, Panel::Settings, "Settings")
                    .clicked()
                {
                    self.reset_settings_form();
                }

                if !self.status.is_empty() {
                    ui.label(&self.status);
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.panel {
            Panel::Upload => self.render_upload_panel(ctx, ui),
            Panel::Settings => self.render_settings_panel(ui),
        });
    }
}

fn config_file_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "verify", "Verify").map(|dirs| dirs.config_dir().join("config.toml"))
}
