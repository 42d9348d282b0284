use std::sync::Arc;

use async_trait::async_trait;
use lettervideo_domain::{BackendGateway, PublishRequest};
use validator::Validate;

use crate::{ApplicationError, DownloadedVideo, PublishVideoRequest, PublishVideoResponse};

#[async_trait]
pub trait ResultUseCase: Send + Sync {
    async fn download_video(&self, job_id: &str) -> Result<DownloadedVideo, ApplicationError>;

    /// Validates locally before anything is sent.
    async fn publish(
        &self,
        request: PublishVideoRequest,
    ) -> Result<PublishVideoResponse, ApplicationError>;
}

pub struct ResultUseCaseImpl {
    gateway: Arc<dyn BackendGateway>,
}

impl ResultUseCaseImpl {
    pub fn new(gateway: Arc<dyn BackendGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl ResultUseCase for ResultUseCaseImpl {
    async fn download_video(&self, job_id: &str) -> Result<DownloadedVideo, ApplicationError> {
        let job_id = job_id.trim();
        if job_id.is_empty() {
            return Err(ApplicationError::Validation("job id is empty".to_string()));
        }
        let bytes = self.gateway.fetch_video_binary(job_id).await?;
        tracing::info!(job_id = %job_id, bytes = bytes.len(), "downloaded rendered video");
        Ok(DownloadedVideo {
            file_name: suggested_file_name(job_id),
            bytes,
        })
    }

    async fn publish(
        &self,
        request: PublishVideoRequest,
    ) -> Result<PublishVideoResponse, ApplicationError> {
        request
            .validate()
            .map_err(|err| ApplicationError::Validation(err.to_string()))?;

        let job_id = request.job_id.clone();
        let anonymous = request.author.is_none();
        let acknowledgement = self
            .gateway
            .publish(&PublishRequest::from(request))
            .await
            .map_err(|err| {
                tracing::warn!(job_id = %job_id, error = %err, "publish failed");
                ApplicationError::from(err)
            })?;

        tracing::info!(job_id = %job_id, anonymous, "video published");
        Ok(PublishVideoResponse {
            job_id,
            message: acknowledgement.message,
        })
    }
}

pub fn suggested_file_name(job_id: &str) -> String {
    format!("video_{}.mp4", job_id.trim())
}
