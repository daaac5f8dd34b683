//! Running prediction requests off the UI thread.
//!
//! The UI calls [`SubmissionDispatcher::submit`], keeps drawing, and calls
//! [`SubmissionDispatcher::poll`] once per frame to fold finished requests
//! back into the widget.

use crate::client::PredictClient;
use crate::error::UploadError;
use crate::file::SelectedFile;
use crate::outcome::Prediction;
use crate::view::WidgetView;
use crate::widget::UploadWidget;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

/// Shared flag flipped when a submission is superseded.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A submission handed out by the widget, waiting for its request to run.
#[derive(Debug)]
pub struct PendingSubmission {
    pub id: u64,
    pub file: SelectedFile,
    pub token: CancellationToken,
}

impl PendingSubmission {
    /// Runs the request unless the submission was cancelled first.
    pub fn run<C>(self, client: &C) -> CompletedSubmission
    where
        C: PredictClient + ?Sized,
    {
        let result = if self.token.is_cancelled() {
            Err(UploadError::Cancelled)
        } else {
            client.predict(&self.file)
        };
        CompletedSubmission {
            id: self.id,
            result,
        }
    }
}

#[derive(Debug)]
pub struct CompletedSubmission {
    pub id: u64,
    pub result: Result<Prediction, UploadError>,
}

/// Sends exactly one completion for its submission, even when the worker
/// unwinds before producing a result.
struct ReplyGuard {
    id: u64,
    tx: Sender<CompletedSubmission>,
    sent: bool,
}

impl ReplyGuard {
    fn send(mut self, done: CompletedSubmission) {
        self.sent = true;
        if self.tx.send(done).is_err() {
            tracing::debug!("Submission #{} finished after the UI went away", self.id);
        }
    }
}

impl Drop for ReplyGuard {
    fn drop(&mut self) {
        if !self.sent {
            let _ = self.tx.send(CompletedSubmission {
                id: self.id,
                result: Err(UploadError::Interrupted),
            });
        }
    }
}

pub struct SubmissionDispatcher {
    client: Arc<dyn PredictClient>,
    tx: Sender<CompletedSubmission>,
    rx: Receiver<CompletedSubmission>,
}

impl SubmissionDispatcher {
    pub fn new(client: Arc<dyn PredictClient>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { client, tx, rx }
    }

    /// Swaps the client used by future submissions. Requests already in
    /// flight keep the client they started with.
    pub fn set_client(&mut self, client: Arc<dyn PredictClient>) {
        self.client = client;
    }

    /// Starts a submission on a background thread. Returns `false` when the
    /// widget refused to start one.
    pub fn submit<V: WidgetView>(&self, widget: &mut UploadWidget<V>) -> bool {
        let Some(pending) = widget.begin_submit() else {
            return false;
        };
        let id = pending.id;
        let client = Arc::clone(&self.client);
        let reply = ReplyGuard {
            id,
            tx: self.tx.clone(),
            sent: false,
        };

        let spawned = thread::Builder::new()
            .name(format!("predict-{id}"))
            .spawn(move || {
                let done = pending.run(client.as_ref());
                reply.send(done);
            });

        if let Err(e) = spawned {
            tracing::warn!("Could not start request thread: {e}");
            widget.complete_submission(CompletedSubmission {
                id,
                result: Err(UploadError::network(e)),
            });
        }
        true
    }

    /// Applies every completion that arrived since the last call. Returns
    /// how many were applied to the widget (stale ones are not counted).
    pub fn poll<V: WidgetView>(&self, widget: &mut UploadWidget<V>) -> usize {
        let mut applied = 0;
        loop {
            match self.rx.try_recv() {
                Ok(done) => {
                    if widget.complete_submission(done) {
                        applied += 1;
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        applied
    }
}
