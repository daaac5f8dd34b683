//! The upload widget: owns the selected file, preview and request outcome,
//! and re-renders its injected view after every change.

use crate::client::PredictClient;
use crate::error::UploadError;
use crate::file::SelectedFile;
use crate::outcome::{Prediction, RequestOutcome};
use crate::preview::Preview;
use crate::state::{WidgetEvent, WidgetState};
use crate::submission::{CancellationToken, CompletedSubmission, PendingSubmission};
use crate::view::{ResultView, SUBMIT_BUSY_LABEL, SUBMIT_READY_LABEL, ViewModel, WidgetView};

#[derive(Debug)]
struct ActiveSubmission {
    id: u64,
    token: CancellationToken,
}

pub struct UploadWidget<V: WidgetView> {
    view: V,
    state: WidgetState,
    selected: Option<SelectedFile>,
    outcome: RequestOutcome,
    preview: Option<Preview>,
    active: Option<ActiveSubmission>,
    next_submission_id: u64,
}

impl<V: WidgetView> UploadWidget<V> {
    pub fn new(view: V) -> Self {
        let mut widget = Self {
            view,
            state: WidgetState::Idle,
            selected: None,
            outcome: RequestOutcome::NotStarted,
            preview: None,
            active: None,
            next_submission_id: 1,
        };
        widget.render();
        widget
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn outcome(&self) -> &RequestOutcome {
        &self.outcome
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn preview_visible(&self) -> bool {
        self.preview.is_some()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Replaces the selection (`None` when the picker was cancelled) and
    /// resets everything derived from the previous one. An in-flight
    /// submission is cancelled and its result will be discarded.
    pub fn on_file_selected(&mut self, file: Option<SelectedFile>) {
        if let Some(stale) = self.active.take() {
            stale.token.cancel();
            tracing::info!("Submission #{} superseded by a new selection", stale.id);
        }
        let event = if file.is_some() {
            WidgetEvent::FileChosen
        } else {
            WidgetEvent::SelectionCleared
        };
        self.selected = file;
        self.outcome = RequestOutcome::NotStarted;
        self.preview = None;
        self.transition(event);
        self.render();
    }

    /// Shows the local preview of the selected file. Never touches the network.
    pub fn request_preview(&mut self) {
        let Some(file) = self.selected.as_ref() else {
            self.reject_missing_file();
            return;
        };
        self.preview = Some(Preview::for_file(file));
        if matches!(self.outcome, RequestOutcome::Failure(_)) {
            self.outcome = RequestOutcome::NotStarted;
        }
        self.transition(WidgetEvent::PreviewShown);
        self.render();
    }

    /// Submits the selected file and blocks until the client answers.
    ///
    /// The submit control is restored on every exit path, including a
    /// panicking client.
    pub fn submit<C>(&mut self, client: &C)
    where
        C: PredictClient + ?Sized,
    {
        let Some(pending) = self.begin_submit() else {
            return;
        };
        let guard = SubmitGuard {
            widget: self,
            id: pending.id,
            finished: false,
        };
        let result = client.predict(&pending.file);
        guard.finish(result);
    }

    /// Starts a submission whose request runs elsewhere. Returns `None` when
    /// no file is selected (the outcome then shows the input error) or a
    /// submission is already in flight.
    pub fn begin_submit(&mut self) -> Option<PendingSubmission> {
        let Some(file) = self.selected.clone() else {
            self.reject_missing_file();
            return None;
        };
        if self.state.is_submitting() {
            tracing::debug!("Submit ignored, a request is already in flight");
            return None;
        }

        let id = self.next_submission_id;
        self.next_submission_id += 1;
        let token = CancellationToken::new();
        self.active = Some(ActiveSubmission {
            id,
            token: token.clone(),
        });

        self.outcome = RequestOutcome::Pending;
        self.transition(WidgetEvent::SubmitStarted);
        self.render();
        tracing::info!("Submission #{id} started for {}", file.name());

        Some(PendingSubmission { id, file, token })
    }

    /// Applies a finished submission. Returns `false` when it belongs to a
    /// submission that is no longer active; such results are dropped.
    pub fn complete_submission(&mut self, done: CompletedSubmission) -> bool {
        match &self.active {
            Some(active) if active.id == done.id => {}
            _ => {
                tracing::debug!("Discarding stale result of submission #{}", done.id);
                return false;
            }
        }
        self.active = None;
        self.apply_result(done.result);
        true
    }

    pub fn view_model(&self) -> ViewModel {
        ViewModel {
            preview: self.preview.clone(),
            submit_enabled: self.state.submit_enabled(),
            submit_label: if self.state.is_submitting() {
                SUBMIT_BUSY_LABEL
            } else {
                SUBMIT_READY_LABEL
            },
            error_message: self
                .outcome
                .error_message()
                .map(str::to_string)
                .unwrap_or_default(),
            result: self.outcome.prediction().map(ResultView::from),
        }
    }

    fn apply_result(&mut self, result: Result<Prediction, UploadError>) {
        match result {
            Ok(prediction) => {
                tracing::info!(
                    "Prediction received: {} ({:.3})",
                    prediction.label,
                    prediction.confidence
                );
                self.outcome = RequestOutcome::Success(prediction);
                self.transition(WidgetEvent::SubmitSucceeded);
            }
            Err(err) => {
                tracing::warn!("Prediction request failed: {err:?}");
                self.outcome = RequestOutcome::Failure(err.user_message());
                self.transition(WidgetEvent::SubmitFailed);
            }
        }
        self.render();
    }

    fn reject_missing_file(&mut self) {
        self.outcome = RequestOutcome::Failure(UploadError::NoFileSelected.user_message());
        self.render();
    }

    fn transition(&mut self, event: WidgetEvent) {
        let next = self.state.apply(event);
        tracing::debug!("{:?} --{:?}--> {:?}", self.state, event, next);
        self.state = next;
    }

    fn render(&mut self) {
        let model = self.view_model();
        self.view.render(&model);
    }
}

/// Holds the widget for the duration of a blocking request and guarantees
/// the submission is completed, restoring the submit control.
struct SubmitGuard<'a, V: WidgetView> {
    widget: &'a mut UploadWidget<V>,
    id: u64,
    finished: bool,
}

impl<V: WidgetView> SubmitGuard<'_, V> {
    fn finish(mut self, result: Result<Prediction, UploadError>) {
        self.finished = true;
        self.widget.complete_submission(CompletedSubmission {
            id: self.id,
            result,
        });
    }
}

impl<V: WidgetView> Drop for SubmitGuard<'_, V> {
    fn drop(&mut self) {
        if !self.finished {
            self.widget.complete_submission(CompletedSubmission {
                id: self.id,
                result: Err(UploadError::Interrupted),
            });
        }
    }
}
