use lettervideo_domain::{DomainError, GatewayError};
use thiserror::Error;

use crate::{InvalidTransition, UiPageState};

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Backend error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(#[from] InvalidTransition),

    #[error("The draft cannot be edited while on the {0} page")]
    NotEditable(UiPageState),

    #[error("A submission is already in flight")]
    SubmissionInFlight,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ApplicationError::Validation(_)
                | ApplicationError::Domain(DomainError::Validation(_))
        )
    }
}
