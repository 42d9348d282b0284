pub mod controller;
pub mod dto;
pub mod error;
pub mod failure;
pub mod job_handle;
pub mod messages;
pub mod page;
pub mod polling;
pub mod usecase;
pub mod wizard;

pub use controller::{
    ControllerSettings, ControllerSnapshot, JobLifecycleController, RejectionReason, SubmitOutcome,
    DEFAULT_POLL_INTERVAL,
};
pub use dto::*;
pub use error::*;
pub use failure::{FailureClassification, FailureKind, FailureReasonTable, FailureRule};
pub use job_handle::{PersistentJobHandle, CURRENT_JOB_KEY};
pub use messages::{SubmitDisposition, SubmitMessages, UserMessages};
pub use page::{InvalidTransition, PageEvent, UiPageState};
pub use polling::{PollFlow, PollingTask};
pub use usecase::{
    split_into_columns, suggested_file_name, GalleryUseCase, GalleryUseCaseImpl, ResultUseCase,
    ResultUseCaseImpl,
};
pub use wizard::{CreateWizard, GenerationDraft};
