//! Settings panel for the prediction endpoint.

use super::{Panel, UiApp};
use eframe::egui;
use std::sync::Arc;
use upload_core::{ClientConfig, HttpPredictClient};

impl UiApp {
    /// Renders the endpoint form and version info.
    pub(super) fn render_settings_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Settings");
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.label("Service URL");
            ui.text_edit_singleline(&mut self.pending_base_url);
        });
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label("Image field");
            ui.text_edit_singleline(&mut self.pending_field_name);
        });
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label("Timeout");
            ui.add(
                egui::DragValue::new(&mut self.pending_timeout_secs)
                    .range(0..=600)
                    .speed(1)
                    .suffix(" s"),
            );
            ui.weak("0 waits indefinitely");
        });
        ui.add_space(6.0);
        match self.form_config().endpoint() {
            Ok(url) => ui.label(format!("Requests go to {url}")),
            Err(e) => ui.colored_label(egui::Color32::from_rgb(220, 70, 70), e.to_string()),
        };

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            if ui.button("Save & apply").clicked() {
                self.apply_settings();
            }
            if ui.button("Defaults").clicked() {
                let defaults = ClientConfig::default();
                self.pending_base_url = defaults.base_url;
                self.pending_field_name = defaults.field_name;
                self.pending_timeout_secs = 0;
            }
        });

        ui.add_space(16.0);
        ui.separator();
        ui.add_space(6.0);
        ui.heading("Version");
        ui.label(format!("App version: {}", self.app_version));
        if let Some(path) = &self.config_path {
            ui.label(format!("Config file: {}", path.display()));
        }
    }

    pub(super) fn reset_settings_form(&mut self) {
        self.pending_base_url = self.config.base_url.clone();
        self.pending_field_name = self.config.field_name.clone();
        self.pending_timeout_secs = self.config.timeout_secs.unwrap_or(0);
    }

    fn form_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.pending_base_url.trim().to_string(),
            field_name: self.pending_field_name.trim().to_string(),
            timeout_secs: (self.pending_timeout_secs > 0).then_some(self.pending_timeout_secs),
            ..self.config.clone()
        }
    }

    fn apply_settings(&mut self) {
        let candidate = self.form_config();
        let client = match HttpPredictClient::new(&candidate) {
            Ok(client) => client,
            Err(e) => {
                self.status = format!("Settings not applied: {e}");
                return;
            }
        };
        tracing::info!("Predictions now go to {}", client.endpoint());
        self.dispatcher.set_client(Arc::new(client));
        self.config = candidate;
        self.status = match &self.config_path {
            Some(path) => match self.config.save(path) {
                Ok(()) => "Settings saved.".to_string(),
                Err(e) => {
                    tracing::warn!("{e:#}");
                    format!("Settings applied but not saved: {e:#}")
                }
            },
            None => "Settings applied for this session.".to_string(),
        };
        self.panel = Panel::Upload;
    }
}
