use lettervideo_domain::{
    GenerationRequest, JobStatus, JobStatusSnapshot, PublishRequest, PublishedVideoSummary,
    SubmitAcknowledgement,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct GenerateVideoBody<'a> {
    pub letter: &'a str,
    pub speaker: &'a str,
    pub subtitles: bool,
    pub music: bool,
}

impl<'a> From<&'a GenerationRequest> for GenerateVideoBody<'a> {
    fn from(request: &'a GenerationRequest) -> Self {
        Self {
            letter: &request.letter_text,
            speaker: &request.voice_key,
            subtitles: request.include_subtitles,
            music: request.include_music,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitResponseBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub queue_position: Option<u32>,
}

impl From<SubmitResponseBody> for SubmitAcknowledgement {
    fn from(body: SubmitResponseBody) -> Self {
        SubmitAcknowledgement {
            job_id: body.job_id.filter(|id| !id.trim().is_empty()),
            message: body.message.unwrap_or_default(),
            queue_position: body.queue_position.unwrap_or(0),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusBody {
    pub status: String,
    #[serde(default)]
    pub queue_position: Option<u32>,
    #[serde(default)]
    pub error: Option<String>,
}

impl From<StatusBody> for JobStatusSnapshot {
    fn from(body: StatusBody) -> Self {
        JobStatusSnapshot {
            status: parse_status(&body.status),
            queue_position: body.queue_position.unwrap_or(0),
            error_reason: body.error,
        }
    }
}

pub(crate) fn parse_status(status: &str) -> JobStatus {
    match status.trim().to_ascii_lowercase().as_str() {
        "queued" => JobStatus::Queued,
        "processing" => JobStatus::Processing,
        "completed" => JobStatus::Completed,
        "failed" => JobStatus::Failed,
        _ => JobStatus::Other(status.to_string()),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PublishedVideoBody {
    pub id: String,
    pub letter: String,
    #[serde(default)]
    pub video_filename: String,
    #[serde(default)]
    pub preview_filename: String,
    #[serde(default)]
    pub author: Option<String>,
}

impl From<PublishedVideoBody> for PublishedVideoSummary {
    fn from(body: PublishedVideoBody) -> Self {
        PublishedVideoSummary {
            id: body.id,
            letter_text: body.letter,
            video_file: body.video_filename,
            preview_file: body.preview_filename,
            author: body.author.filter(|author| !author.trim().is_empty()),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PublishBody<'a> {
    pub letter: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<&'a str>,
    pub job_id: &'a str,
}

impl<'a> From<&'a PublishRequest> for PublishBody<'a> {
    fn from(request: &'a PublishRequest) -> Self {
        Self {
            letter: &request.letter,
            author: request.author.as_deref(),
            job_id: &request.job_id,
        }
    }
}

/// Error and acknowledgement bodies carry their text under either key.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct MessageBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl MessageBody {
    pub fn parse(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }

    pub fn text(self) -> Option<String> {
        self.message
            .filter(|text| !text.trim().is_empty())
            .or(self.error.filter(|text| !text.trim().is_empty()))
    }
}
