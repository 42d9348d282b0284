use serde::{Deserialize, Serialize};

use crate::{find_voice, DomainError};

pub const DEFAULT_MIN_LETTER_CHARS: usize = 100;
pub const DEFAULT_MAX_LETTER_CHARS: usize = 2_000;

/// Accepted length window for a letter, counted in characters after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterLimits {
    pub min_chars: usize,
    pub max_chars: usize,
}

impl Default for LetterLimits {
    fn default() -> Self {
        Self {
            min_chars: DEFAULT_MIN_LETTER_CHARS,
            max_chars: DEFAULT_MAX_LETTER_CHARS,
        }
    }
}

impl LetterLimits {
    pub fn new(min_chars: usize, max_chars: usize) -> Self {
        Self {
            min_chars,
            max_chars,
        }
    }

    pub fn check(&self, letter: &str) -> Result<(), DomainError> {
        let length = letter.trim().chars().count();
        if length < self.min_chars {
            return Err(DomainError::validation(format!(
                "letter is too short: {length} characters, at least {} required",
                self.min_chars
            )));
        }
        if length > self.max_chars {
            return Err(DomainError::validation(format!(
                "letter is too long: {length} characters, at most {} allowed",
                self.max_chars
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub letter_text: String,
    pub voice_key: String,
    pub include_subtitles: bool,
    pub include_music: bool,
}

impl GenerationRequest {
    pub fn validate(&self, limits: &LetterLimits) -> Result<(), DomainError> {
        limits.check(&self.letter_text)?;
        if self.voice_key.trim().is_empty() {
            return Err(DomainError::validation("no voice selected"));
        }
        if find_voice(&self.voice_key).is_none() {
            return Err(DomainError::validation(format!(
                "unknown voice `{}`",
                self.voice_key
            )));
        }
        Ok(())
    }
}

/// Durable marker that a job exists and should keep being tracked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobHandle {
    pub job_id: String,
}

impl JobHandle {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
    /// A status string this client does not know; treated as still running.
    Other(String),
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatusSnapshot {
    pub status: JobStatus,
    pub queue_position: u32,
    pub error_reason: Option<String>,
}

impl JobStatusSnapshot {
    pub fn new(status: JobStatus, queue_position: u32) -> Self {
        Self {
            status,
            queue_position,
            error_reason: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Failed,
            queue_position: 0,
            error_reason: Some(reason.into()),
        }
    }
}

/// Successful answer to a submission. `message` is the backend's discriminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitAcknowledgement {
    pub job_id: Option<String>,
    pub message: String,
    pub queue_position: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedVideoSummary {
    pub id: String,
    pub letter_text: String,
    pub video_file: String,
    pub preview_file: String,
    pub author: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishRequest {
    pub letter: String,
    pub author: Option<String>,
    pub job_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishAcknowledgement {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(letter: String, voice: &str) -> GenerationRequest {
        GenerationRequest {
            letter_text: letter,
            voice_key: voice.to_string(),
            include_subtitles: true,
            include_music: true,
        }
    }

    #[test]
    fn letter_length_is_measured_after_trimming() {
        let limits = LetterLimits::default();
        let padded = format!("   {}   ", "x".repeat(99));
        assert!(limits.check(&padded).is_err());
        assert!(limits.check(&"x".repeat(100)).is_ok());
        assert!(limits.check(&"x".repeat(2_000)).is_ok());
        assert!(limits.check(&"x".repeat(2_001)).is_err());
    }

    #[test]
    fn letter_length_counts_characters_not_bytes() {
        let limits = LetterLimits::new(100, 120);
        let cyrillic = "я".repeat(110);
        assert!(cyrillic.len() > 120);
        assert!(limits.check(&cyrillic).is_ok());
    }

    #[test]
    fn request_requires_a_catalog_voice() {
        let limits = LetterLimits::default();
        assert!(request("x".repeat(150), "levitan").validate(&limits).is_ok());
        assert!(request("x".repeat(150), "").validate(&limits).is_err());
        assert!(request("x".repeat(150), "nobody").validate(&limits).is_err());
    }

    #[test]
    fn only_completed_and_failed_are_terminal() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(!JobStatus::Other("paused".to_string()).is_terminal());
    }
}
