//! Finite-state machine behind the upload widget.
//!
//! `Idle` means no file is selected. The submit control is enabled only in
//! `Previewed`, `Succeeded` and `Failed`, all of which imply a selected file
//! and no request in flight.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidgetState {
    #[default]
    Idle,
    FileSelected,
    Previewed,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetEvent {
    FileChosen,
    SelectionCleared,
    PreviewShown,
    SubmitStarted,
    SubmitSucceeded,
    SubmitFailed,
}

impl WidgetState {
    /// Next state for `event`. Events that make no sense in the current
    /// state leave it unchanged.
    pub fn apply(self, event: WidgetEvent) -> Self {
        use WidgetEvent as E;
        use WidgetState as S;
        match (self, event) {
            (_, E::FileChosen) => S::FileSelected,
            (_, E::SelectionCleared) => S::Idle,
            (S::FileSelected | S::Previewed | S::Succeeded | S::Failed, E::PreviewShown) => {
                S::Previewed
            }
            (S::FileSelected | S::Previewed | S::Succeeded | S::Failed, E::SubmitStarted) => {
                S::Submitting
            }
            (S::Submitting, E::SubmitSucceeded) => S::Succeeded,
            (S::Submitting, E::SubmitFailed) => S::Failed,
            (state, _) => state,
        }
    }

    pub fn submit_enabled(self) -> bool {
        matches!(self, Self::Previewed | Self::Succeeded | Self::Failed)
    }

    pub fn has_file(self) -> bool {
        self != Self::Idle
    }

    pub fn is_submitting(self) -> bool {
        self == Self::Submitting
    }
}
