use lettervideo_domain::GatewayError;

/// Backend message strings that discriminate a submission answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitMessages {
    pub queued: String,
    pub invalid_payload: String,
}

pub const BACKEND_QUEUED_MESSAGE: &str = "Видео поставлено в очередь на генерацию";
pub const BACKEND_INVALID_PAYLOAD_MESSAGE: &str = "Неверный формат данных";

impl Default for SubmitMessages {
    fn default() -> Self {
        Self {
            queued: BACKEND_QUEUED_MESSAGE.to_string(),
            invalid_payload: BACKEND_INVALID_PAYLOAD_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitDisposition {
    Queued,
    InvalidPayload,
    Other,
}

impl SubmitMessages {
    pub fn classify(&self, message: &str) -> SubmitDisposition {
        let message = message.trim();
        if message == self.queued.trim() {
            SubmitDisposition::Queued
        } else if message == self.invalid_payload.trim() {
            SubmitDisposition::InvalidPayload
        } else {
            SubmitDisposition::Other
        }
    }
}

/// Texts shown to the user. `{status}` in the templates is replaced by the HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMessages {
    pub queued: String,
    pub processing: String,
    pub submit_status_template: String,
    pub submit_failed: String,
    pub poll_status_template: String,
    pub poll_failed: String,
    pub malformed_acknowledgement: String,
}

impl Default for UserMessages {
    fn default() -> Self {
        Self {
            queued: "Waiting in the queue…".to_string(),
            processing: "Processing…".to_string(),
            submit_status_template: "Error {status}".to_string(),
            submit_failed: "Something went wrong while sending the request".to_string(),
            poll_status_template: "Error: {status}".to_string(),
            poll_failed: "Error: unknown".to_string(),
            malformed_acknowledgement: "The backend accepted the letter but returned no job id"
                .to_string(),
        }
    }
}

impl UserMessages {
    pub fn submit_error(&self, error: &GatewayError) -> String {
        classify(error, &self.submit_status_template, &self.submit_failed)
    }

    pub fn poll_error(&self, error: &GatewayError) -> String {
        classify(error, &self.poll_status_template, &self.poll_failed)
    }
}

/// Structured backend message, then HTTP status, then the generic text.
fn classify(error: &GatewayError, status_template: &str, generic: &str) -> String {
    if let Some(message) = error.backend_message() {
        return message.to_string();
    }
    if let Some(status) = error.status_code() {
        return status_template.replace("{status}", &status.to_string());
    }
    generic.to_string()
}
