use crate::outcome::Prediction;
use crate::preview::Preview;

pub const SUBMIT_READY_LABEL: &str = "Upload & Get Result";
pub const SUBMIT_BUSY_LABEL: &str = "Processing...";
pub const RESULT_HEADING: &str = "Prediction Result:";

/// Result block contents, only present after a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub prediction: String,
    pub confidence_percent: i64,
}

impl ResultView {
    pub fn prediction_line(&self) -> String {
        format!("Prediction: {}", self.prediction)
    }

    pub fn confidence_line(&self) -> String {
        format!("Confidence: {}%", self.confidence_percent)
    }
}

impl From<&Prediction> for ResultView {
    fn from(p: &Prediction) -> Self {
        Self {
            prediction: p.label.clone(),
            confidence_percent: p.confidence_percent(),
        }
    }
}

/// Everything a renderer needs, derived from the widget state on each change.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    /// `Some` while the preview container is visible.
    pub preview: Option<Preview>,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
    /// Empty unless the last action failed.
    pub error_message: String,
    /// `Some` only while the outcome is a success.
    pub result: Option<ResultView>,
}

impl Default for ViewModel {
    fn default() -> Self {
        Self {
            preview: None,
            submit_enabled: false,
            submit_label: SUBMIT_READY_LABEL,
            error_message: String::new(),
            result: None,
        }
    }
}

/// The elements the widget drives: preview, submit control, error area and
/// result container. Implemented by the GUI and by test doubles.
pub trait WidgetView {
    fn render(&mut self, model: &ViewModel);
}

/// Headless view that keeps every rendered model.
#[derive(Debug, Default)]
pub struct RecordingView {
    pub frames: Vec<ViewModel>,
}

impl RecordingView {
    pub fn last(&self) -> Option<&ViewModel> {
        self.frames.last()
    }
}

impl WidgetView for RecordingView {
    fn render(&mut self, model: &ViewModel) {
        self.frames.push(model.clone());
    }
}
