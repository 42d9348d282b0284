use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// View states of the create flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UiPageState {
    LetterInput,
    VoiceCategory,
    VoicePick,
    Options,
    InProgress,
    CompletedNavigated,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    LetterAccepted,
    CategoryChosen,
    VoiceChosen,
    Back(UiPageState),
    /// A submission was queued or a persisted handle was resumed.
    JobAccepted,
    JobProgressed,
    JobCompleted,
    JobFailed,
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot apply {event:?} while on the {from} page")]
pub struct InvalidTransition {
    pub from: UiPageState,
    pub event: PageEvent,
}

impl UiPageState {
    pub fn as_str(self) -> &'static str {
        match self {
            UiPageState::LetterInput => "letter-input",
            UiPageState::VoiceCategory => "voice-category",
            UiPageState::VoicePick => "voice-pick",
            UiPageState::Options => "options",
            UiPageState::InProgress => "in-progress",
            UiPageState::CompletedNavigated => "completed-navigated",
            UiPageState::Error => "error",
        }
    }

    /// Position in the wizard, for pages that come before submission.
    fn wizard_step(self) -> Option<u8> {
        match self {
            UiPageState::LetterInput => Some(0),
            UiPageState::VoiceCategory => Some(1),
            UiPageState::VoicePick => Some(2),
            UiPageState::Options => Some(3),
            _ => None,
        }
    }

    pub fn is_editable(self) -> bool {
        self.wizard_step().is_some()
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, UiPageState::CompletedNavigated | UiPageState::Error)
    }

    pub fn transition(self, event: PageEvent) -> Result<UiPageState, InvalidTransition> {
        use PageEvent as E;
        use UiPageState as S;

        let next = match (self, event) {
            (S::LetterInput, E::LetterAccepted) => S::VoiceCategory,
            (S::VoiceCategory, E::CategoryChosen) => S::VoicePick,
            (S::VoicePick, E::VoiceChosen) => S::Options,
            (from, E::Back(target)) => match (from.wizard_step(), target.wizard_step()) {
                (Some(current), Some(wanted)) if wanted < current => target,
                _ => return Err(InvalidTransition { from, event }),
            },
            (from, E::JobAccepted) if from != S::InProgress => S::InProgress,
            (S::InProgress, E::JobProgressed) => S::InProgress,
            (S::InProgress, E::JobCompleted) => S::CompletedNavigated,
            (_, E::JobFailed) => S::Error,
            (S::Error | S::CompletedNavigated, E::Restart) => S::LetterInput,
            (from, event) => return Err(InvalidTransition { from, event }),
        };
        Ok(next)
    }
}

impl fmt::Display for UiPageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
