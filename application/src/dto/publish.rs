use lettervideo_domain::PublishRequest;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PublishVideoRequest {
    #[validate(length(min = 100, max = 3000))]
    pub letter: String,
    #[validate(length(min = 5, max = 50))]
    pub author: Option<String>,
    #[validate(custom(function = "validate_job_id"))]
    pub job_id: String,
}

impl PublishVideoRequest {
    /// A blank author means "anonymous" and is sent as absent.
    pub fn new(letter: impl Into<String>, author: Option<String>, job_id: impl Into<String>) -> Self {
        Self {
            letter: letter.into().trim().to_string(),
            author: author
                .map(|author| author.trim().to_string())
                .filter(|author| !author.is_empty()),
            job_id: job_id.into().trim().to_string(),
        }
    }
}

impl From<PublishVideoRequest> for PublishRequest {
    fn from(request: PublishVideoRequest) -> Self {
        PublishRequest {
            letter: request.letter,
            author: request.author,
            job_id: request.job_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishVideoResponse {
    pub job_id: String,
    pub message: String,
}

fn validate_job_id(job_id: &str) -> Result<(), ValidationError> {
    Uuid::parse_str(job_id)
        .map(|_| ())
        .map_err(|_| ValidationError::new("job_id_not_uuid"))
}
