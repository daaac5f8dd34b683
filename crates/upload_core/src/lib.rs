//! Upload widget for an image prediction service.
//!
//! The widget tracks the picked file, its local preview and the outcome of
//! the last submission, and renders through an injected [`WidgetView`]. The
//! prediction service is reached through a [`PredictClient`];
//! [`HttpPredictClient`] speaks the multipart `POST /api/predict` contract.

pub mod client;
pub mod config;
pub mod error;
pub mod file;
pub mod outcome;
pub mod preview;
pub mod state;
pub mod submission;
pub mod view;
pub mod widget;

pub use client::{HttpPredictClient, PredictClient, interpret_response};
pub use config::ClientConfig;
pub use error::UploadError;
pub use file::SelectedFile;
pub use outcome::{Prediction, RequestOutcome};
pub use preview::{Preview, PreviewImage};
pub use state::{WidgetEvent, WidgetState};
pub use submission::{
    CancellationToken, CompletedSubmission, PendingSubmission, SubmissionDispatcher,
};
pub use view::{RecordingView, ResultView, ViewModel, WidgetView};
pub use widget::UploadWidget;
